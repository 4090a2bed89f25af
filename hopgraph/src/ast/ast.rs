// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Abstract Syntax Tree (AST) structures for the traversal query language

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed query text: one or more `;`-separated statements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub statements: Vec<Statement>,
}

/// Top-level statement types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    /// `$name = <query>`
    Assignment { variable: String, query: Query },
    Query(Query),
}

/// Composable query forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Query {
    Go(GoStatement),
    FindPath(FindPathStatement),
    Yield(YieldStatement),
    /// `left | right`: the result of `left` is visible to `right` as `$-`
    Pipe { left: Box<Query>, right: Box<Query> },
    SetOperation(SetOperation),
}

/// Set operation between two queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOperation {
    pub left: Box<Query>,
    pub operation: SetOperationType,
    pub right: Box<Query>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOperationType {
    Union,
    UnionAll,
    Minus,
    Intersect,
}

impl fmt::Display for SetOperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOperationType::Union => write!(f, "UNION"),
            SetOperationType::UnionAll => write!(f, "UNION ALL"),
            SetOperationType::Minus => write!(f, "MINUS"),
            SetOperationType::Intersect => write!(f, "INTERSECT"),
        }
    }
}

/// `m TO n STEPS`, or `n STEPS` with `min == max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRange {
    pub min: u32,
    pub max: u32,
}

/// Which input table a reference reads
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// `$-`
    Pipe,
    /// `$name`
    Variable(String),
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Pipe => write!(f, "$-"),
            InputSource::Variable(name) => write!(f, "${}", name),
        }
    }
}

/// Starting (or target) vertices of a traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VertexSource {
    /// Constant id expressions
    Ids(Vec<Expression>),
    /// `$-.col` or `$var.col`
    Column { source: InputSource, column: String },
    /// Bare `$-` or `$var`: the single column of the input
    Input(InputSource),
}

/// Edge types to traverse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeTypeList {
    /// `*`
    All,
    Named(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reversely,
    Bidirect,
}

/// `OVER <edge types> [REVERSELY|BIDIRECT]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverClause {
    pub edge_types: EdgeTypeList,
    pub direction: Direction,
}

/// `GO [steps] FROM ... OVER ... [WHERE ...] [YIELD ...]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoStatement {
    pub steps: Option<StepRange>,
    pub from: VertexSource,
    pub over: OverClause,
    pub where_clause: Option<Expression>,
    pub yield_clause: Option<YieldClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathMode {
    Shortest,
    All,
}

impl fmt::Display for PathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathMode::Shortest => write!(f, "SHORTEST"),
            PathMode::All => write!(f, "ALL"),
        }
    }
}

/// `FIND SHORTEST|ALL PATH FROM ... TO ... OVER ... [UPTO n STEPS]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindPathStatement {
    pub mode: PathMode,
    pub from: VertexSource,
    pub to: VertexSource,
    pub over: OverClause,
    pub upto: Option<u32>,
}

/// Standalone `YIELD [DISTINCT] ... [WHERE ...]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldStatement {
    pub yield_clause: YieldClause,
    pub where_clause: Option<Expression>,
}

/// `YIELD [DISTINCT] col [AS alias], ...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldClause {
    pub distinct: bool,
    pub columns: Vec<YieldColumn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum YieldColumn {
    Expression {
        expression: Expression,
        alias: Option<String>,
    },
    /// `$-.*` or `$var.*`
    Wildcard(InputSource),
}

/// Expressions used in WHERE predicates and YIELD projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),
    List(Vec<Expression>),
    Property(PropertyRef),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    IsNull(IsNullExpression),
}

/// References to data outside the expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyRef {
    /// `$^.tag.prop`
    Source { tag: String, property: String },
    /// `$$.tag.prop`
    Destination { tag: String, property: String },
    /// `$^`
    SourceVertex,
    /// `$$`
    DestinationVertex,
    /// `edge.prop`, including `_src`, `_dst`, `_type` and `_rank`
    Edge { edge_type: String, property: String },
    /// Bare edge type name: the traversed edge itself
    EdgeValue(String),
    /// `$-.col` or `$var.col`
    Input { source: InputSource, column: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Contains,
    Regex,

    // Logical
    And,
    Or,
    Xor,
}

impl BinaryOperator {
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterEqual
                | BinaryOperator::Contains
                | BinaryOperator::Regex
        )
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Star => "*",
            BinaryOperator::Slash => "/",
            BinaryOperator::Percent => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Contains => " CONTAINS ",
            BinaryOperator::Regex => "=~",
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
            BinaryOperator::Xor => " XOR ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsNullExpression {
    pub expression: Box<Expression>,
    pub negated: bool,
}

impl Expression {
    pub fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn unary(operator: UnaryOperator, expression: Expression) -> Self {
        Expression::Unary(UnaryExpression {
            operator,
            expression: Box::new(expression),
        })
    }

    /// Visit this expression and all sub-expressions, depth first
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expression)) {
        visit(self);
        match self {
            Expression::Literal(_) | Expression::Property(_) => {}
            Expression::List(items) => items.iter().for_each(|item| item.walk(visit)),
            Expression::Unary(unary) => unary.expression.walk(visit),
            Expression::Binary(binary) => {
                binary.left.walk(visit);
                binary.right.walk(visit);
            }
            Expression::IsNull(is_null) => is_null.expression.walk(visit),
        }
    }

    /// All property references in this expression
    pub fn property_refs(&self) -> Vec<&PropertyRef> {
        let mut refs = Vec::new();
        self.walk(&mut |expr| {
            if let Expression::Property(property) = expr {
                refs.push(property);
            }
        });
        refs
    }

    /// Name of a result column produced by this expression without an alias
    pub fn column_name(&self) -> String {
        match self {
            Expression::Literal(Literal::String(s)) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(d) => write!(f, "{:?}", d),
            Literal::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyRef::Source { tag, property } => write!(f, "$^.{}.{}", tag, property),
            PropertyRef::Destination { tag, property } => write!(f, "$$.{}.{}", tag, property),
            PropertyRef::SourceVertex => write!(f, "$^"),
            PropertyRef::DestinationVertex => write!(f, "$$"),
            PropertyRef::Edge {
                edge_type,
                property,
            } => write!(f, "{}.{}", edge_type, property),
            PropertyRef::EdgeValue(edge_type) => write!(f, "{}", edge_type),
            PropertyRef::Input { source, column } => write!(f, "{}.{}", source, column),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{}", literal),
            Expression::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Expression::Property(property) => write!(f, "{}", property),
            Expression::Unary(unary) => match unary.operator {
                UnaryOperator::Not => write!(f, "!({})", unary.expression),
                UnaryOperator::Negate => write!(f, "-({})", unary.expression),
            },
            Expression::Binary(binary) => write!(
                f,
                "({}{}{})",
                binary.left,
                binary.operator.symbol(),
                binary.right
            ),
            Expression::IsNull(is_null) => {
                if is_null.negated {
                    write!(f, "{} IS NOT NULL", is_null.expression)
                } else {
                    write!(f, "{} IS NULL", is_null.expression)
                }
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => Ok(()),
            Direction::Reversely => write!(f, " REVERSELY"),
            Direction::Bidirect => write!(f, " BIDIRECT"),
        }
    }
}
