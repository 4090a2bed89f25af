// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Expression evaluation for WHERE predicates and YIELD projections
//!
//! Evaluation is invoked once per row through the [`ExpressionEvaluator`]
//! trait. A [`RowScope`] carries everything an expression may reference:
//! the hop's source vertex, the traversed edge, the reached vertex and the
//! bound input row. Compiled `=~` patterns live in a [`RegexCache`] owned by
//! the query's execution context and dropped with it.

use parking_lot::Mutex;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::error::ExecutionError;
use super::result::{ResultTable, Row};
use crate::ast::{
    BinaryExpression, BinaryOperator, Expression, Literal, PropertyRef, UnaryOperator,
};
use crate::storage::{Edge, Value, Vertex, VertexId};

/// The input row visible to `$-.col` or `$var.col`
#[derive(Debug, Clone, Copy)]
pub struct InputRow<'a> {
    pub table: &'a ResultTable,
    pub row: &'a Row,
}

/// Everything a single evaluation can see
#[derive(Debug, Clone, Copy, Default)]
pub struct RowScope<'a> {
    /// Vertex the hop started from
    pub source_id: Option<&'a VertexId>,
    /// Its properties, when the provider knows the vertex
    pub source: Option<&'a Vertex>,
    pub edge: Option<&'a Edge>,
    /// Vertex the hop reached
    pub destination_id: Option<&'a VertexId>,
    pub destination: Option<&'a Vertex>,
    pub input: Option<InputRow<'a>>,
    /// Pattern cache of the running query; without one patterns compile per use
    pub regexes: Option<&'a RegexCache>,
}

impl<'a> RowScope<'a> {
    pub fn with_source(mut self, id: &'a VertexId, vertex: Option<&'a Vertex>) -> Self {
        self.source_id = Some(id);
        self.source = vertex;
        self
    }

    pub fn with_edge(mut self, edge: &'a Edge) -> Self {
        self.edge = Some(edge);
        self
    }

    pub fn with_destination(mut self, id: &'a VertexId, vertex: Option<&'a Vertex>) -> Self {
        self.destination_id = Some(id);
        self.destination = vertex;
        self
    }

    pub fn with_input(mut self, table: &'a ResultTable, row: &'a Row) -> Self {
        self.input = Some(InputRow { table, row });
        self
    }

    pub fn with_regexes(mut self, regexes: &'a RegexCache) -> Self {
        self.regexes = Some(regexes);
        self
    }
}

/// Distinct patterns one query keeps compiled
pub const REGEX_CACHE_CAPACITY: usize = 64;

/// Compiled `=~` patterns of a single query
///
/// Holds at most [`REGEX_CACHE_CAPACITY`] patterns. Patterns past the bound
/// are compiled on every use.
#[derive(Debug, Default)]
pub struct RegexCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole-string match of `text` against `pattern`
    pub fn is_match(&self, text: &str, pattern: &str) -> Result<bool, ExecutionError> {
        if let Some(regex) = self.compiled.lock().get(pattern) {
            return Ok(regex.is_match(text));
        }
        let regex = compile_pattern(pattern)?;
        let matched = regex.is_match(text);
        let mut compiled = self.compiled.lock();
        if compiled.len() < REGEX_CACHE_CAPACITY {
            compiled.insert(pattern.to_string(), regex);
        }
        Ok(matched)
    }

    pub fn len(&self) -> usize {
        self.compiled.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ExecutionError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        ExecutionError::ExpressionError(format!("invalid regular expression `{}': {}", pattern, e))
    })
}

/// Evaluates expressions against a row scope
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &Expression, scope: &RowScope<'_>)
        -> Result<Value, ExecutionError>;

    /// Evaluate a predicate; null counts as false
    fn evaluate_predicate(
        &self,
        expression: &Expression,
        scope: &RowScope<'_>,
    ) -> Result<bool, ExecutionError> {
        match self.evaluate(expression, scope)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(ExecutionError::TypeError(format!(
                "predicate `{}' evaluated to {} instead of Bool",
                expression,
                other.type_name()
            ))),
        }
    }

    /// Evaluate an expression that references nothing outside itself
    fn evaluate_constant(&self, expression: &Expression) -> Result<Value, ExecutionError> {
        self.evaluate(expression, &RowScope::default())
    }
}

/// Built-in evaluator with null propagation and three-valued logic
#[derive(Debug, Default)]
pub struct DefaultEvaluator;

impl DefaultEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    fn property(&self, property: &PropertyRef, scope: &RowScope<'_>) -> Result<Value, ExecutionError> {
        match property {
            PropertyRef::Source { tag, property } => Ok(scope
                .source
                .and_then(|v| v.tag_property(tag, property))
                .cloned()
                .unwrap_or(Value::Null)),
            PropertyRef::Destination { tag, property } => Ok(scope
                .destination
                .and_then(|v| v.tag_property(tag, property))
                .cloned()
                .unwrap_or(Value::Null)),
            PropertyRef::SourceVertex => {
                let id = scope.source_id.ok_or_else(|| unavailable(property))?;
                Ok(vertex_value(id, scope.source))
            }
            PropertyRef::DestinationVertex => {
                let id = scope.destination_id.ok_or_else(|| unavailable(property))?;
                Ok(vertex_value(id, scope.destination))
            }
            PropertyRef::Edge {
                edge_type,
                property: name,
            } => {
                let edge = scope.edge.ok_or_else(|| unavailable(property))?;
                if &edge.edge_type != edge_type {
                    return Ok(Value::Null);
                }
                Ok(match name.as_str() {
                    "_src" => scope
                        .source_id
                        .map(|id| Value::from(id.clone()))
                        .unwrap_or_else(|| Value::from(edge.src.clone())),
                    "_dst" => scope
                        .destination_id
                        .map(|id| Value::from(id.clone()))
                        .unwrap_or_else(|| Value::from(edge.dst.clone())),
                    "_type" => Value::String(edge.edge_type.clone()),
                    "_rank" => Value::Int(edge.rank),
                    other => edge.property(other).cloned().unwrap_or(Value::Null),
                })
            }
            PropertyRef::EdgeValue(edge_type) => {
                let edge = scope.edge.ok_or_else(|| unavailable(property))?;
                if &edge.edge_type == edge_type {
                    Ok(Value::Edge(edge.clone()))
                } else {
                    Ok(Value::Null)
                }
            }
            PropertyRef::Input { column, .. } => {
                let input = scope.input.ok_or_else(|| unavailable(property))?;
                let position = input.table.column_index(column).ok_or_else(|| {
                    ExecutionError::ExpressionError(format!("unknown input column `{}'", column))
                })?;
                Ok(input.row.get(position).cloned().unwrap_or(Value::Null))
            }
        }
    }

    fn binary(&self, binary: &BinaryExpression, scope: &RowScope<'_>) -> Result<Value, ExecutionError> {
        let operator = binary.operator;
        let left = self.evaluate(&binary.left, scope)?;

        if operator.is_logical() {
            // AND/OR may decide on the left operand alone
            let left = as_logical(&left, operator)?;
            match (operator, left) {
                (BinaryOperator::And, Some(false)) => return Ok(Value::Bool(false)),
                (BinaryOperator::Or, Some(true)) => return Ok(Value::Bool(true)),
                _ => {}
            }
            let right = as_logical(&self.evaluate(&binary.right, scope)?, operator)?;
            return Ok(logical(operator, left, right));
        }

        let right = self.evaluate(&binary.right, scope)?;
        if operator.is_comparison() {
            self.compare(operator, left, right, scope)
        } else {
            arithmetic(operator, left, right)
        }
    }

    fn compare(
        &self,
        operator: BinaryOperator,
        left: Value,
        right: Value,
        scope: &RowScope<'_>,
    ) -> Result<Value, ExecutionError> {
        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }

        match operator {
            BinaryOperator::Equal => Ok(Value::Bool(values_equal(&left, &right))),
            BinaryOperator::NotEqual => Ok(Value::Bool(!values_equal(&left, &right))),
            BinaryOperator::Contains => match (&left, &right) {
                (Value::String(haystack), Value::String(needle)) => {
                    Ok(Value::Bool(haystack.contains(needle.as_str())))
                }
                _ => Err(type_mismatch(operator, &left, &right)),
            },
            BinaryOperator::Regex => match (&left, &right) {
                (Value::String(text), Value::String(pattern)) => {
                    let matched = match scope.regexes {
                        Some(cache) => cache.is_match(text, pattern)?,
                        None => compile_pattern(pattern)?.is_match(text),
                    };
                    Ok(Value::Bool(matched))
                }
                _ => Err(type_mismatch(operator, &left, &right)),
            },
            _ => {
                let ordering =
                    order_values(&left, &right).ok_or_else(|| type_mismatch(operator, &left, &right))?;
                let result = match operator {
                    BinaryOperator::LessThan => ordering == Ordering::Less,
                    BinaryOperator::LessEqual => ordering != Ordering::Greater,
                    BinaryOperator::GreaterThan => ordering == Ordering::Greater,
                    BinaryOperator::GreaterEqual => ordering != Ordering::Less,
                    _ => {
                        return Err(ExecutionError::RuntimeError(format!(
                            "unexpected comparison operator {:?}",
                            operator
                        )))
                    }
                };
                Ok(Value::Bool(result))
            }
        }
    }
}

impl ExpressionEvaluator for DefaultEvaluator {
    fn evaluate(&self, expression: &Expression, scope: &RowScope<'_>) -> Result<Value, ExecutionError> {
        match expression {
            Expression::Literal(literal) => Ok(literal_value(literal)),
            Expression::List(items) => items
                .iter()
                .map(|item| self.evaluate(item, scope))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expression::Property(property) => self.property(property, scope),
            Expression::Unary(unary) => {
                let operand = self.evaluate(&unary.expression, scope)?;
                match (unary.operator, operand) {
                    (_, Value::Null) => Ok(Value::Null),
                    (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOperator::Negate, Value::Int(i)) => i
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| ExecutionError::ExpressionError("integer overflow".to_string())),
                    (UnaryOperator::Negate, Value::Double(d)) => Ok(Value::Double(-d)),
                    (operator, other) => Err(ExecutionError::TypeError(format!(
                        "cannot apply {:?} to {}",
                        operator,
                        other.type_name()
                    ))),
                }
            }
            Expression::Binary(binary) => self.binary(binary, scope),
            Expression::IsNull(is_null) => {
                let value = self.evaluate(&is_null.expression, scope)?;
                Ok(Value::Bool(value.is_null() != is_null.negated))
            }
        }
    }
}

pub fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Integer(i) => Value::Int(*i),
        Literal::Float(d) => Value::Double(*d),
        Literal::String(s) => Value::String(s.clone()),
    }
}

fn vertex_value(id: &VertexId, vertex: Option<&Vertex>) -> Value {
    match vertex {
        Some(vertex) => Value::Vertex(vertex.clone()),
        None => Value::Vertex(Vertex::new(id.clone())),
    }
}

fn unavailable(property: &PropertyRef) -> ExecutionError {
    ExecutionError::ExpressionError(format!("`{}' is not available in this context", property))
}

fn type_mismatch(operator: BinaryOperator, left: &Value, right: &Value) -> ExecutionError {
    ExecutionError::TypeError(format!(
        "cannot apply {:?} to {} and {}",
        operator,
        left.type_name(),
        right.type_name()
    ))
}

fn as_logical(value: &Value, operator: BinaryOperator) -> Result<Option<bool>, ExecutionError> {
    match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        other => Err(ExecutionError::TypeError(format!(
            "{:?} expects Bool operands, got {}",
            operator,
            other.type_name()
        ))),
    }
}

fn logical(operator: BinaryOperator, left: Option<bool>, right: Option<bool>) -> Value {
    let result = match operator {
        BinaryOperator::And => match (left, right) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        BinaryOperator::Or => match (left, right) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        _ => match (left, right) {
            (Some(l), Some(r)) => Some(l != r),
            _ => None,
        },
    };
    result.map(Value::Bool).unwrap_or(Value::Null)
}

/// Equality with numeric promotion between Int and Double
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(i), Value::Double(d)) | (Value::Double(d), Value::Int(i)) => (*i as f64) == *d,
        _ => left == right,
    }
}

fn order_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => match (left.as_double(), right.as_double()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

fn arithmetic(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, ExecutionError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }

    if operator == BinaryOperator::Plus {
        if let (Value::String(_), _) | (_, Value::String(_)) = (&left, &right) {
            return match (&left, &right) {
                (Value::List(_) | Value::Path(_) | Value::Vertex(_) | Value::Edge(_), _)
                | (_, Value::List(_) | Value::Path(_) | Value::Vertex(_) | Value::Edge(_)) => {
                    Err(type_mismatch(operator, &left, &right))
                }
                _ => Ok(Value::String(format!(
                    "{}{}",
                    left.to_plain_string(),
                    right.to_plain_string()
                ))),
            };
        }
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => integer_arithmetic(operator, *a, *b),
        (Value::Int(_) | Value::Double(_), Value::Int(_) | Value::Double(_)) => {
            let (a, b) = match (left.as_double(), right.as_double()) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(type_mismatch(operator, &left, &right)),
            };
            double_arithmetic(operator, a, b)
        }
        _ => Err(type_mismatch(operator, &left, &right)),
    }
}

fn integer_arithmetic(operator: BinaryOperator, a: i64, b: i64) -> Result<Value, ExecutionError> {
    if matches!(operator, BinaryOperator::Slash | BinaryOperator::Percent) && b == 0 {
        return Err(ExecutionError::ExpressionError("division by zero".to_string()));
    }
    let result = match operator {
        BinaryOperator::Plus => a.checked_add(b),
        BinaryOperator::Minus => a.checked_sub(b),
        BinaryOperator::Star => a.checked_mul(b),
        BinaryOperator::Slash => a.checked_div(b),
        BinaryOperator::Percent => a.checked_rem(b),
        other => {
            return Err(ExecutionError::RuntimeError(format!(
                "unexpected arithmetic operator {:?}",
                other
            )))
        }
    };
    result
        .map(Value::Int)
        .ok_or_else(|| ExecutionError::ExpressionError("integer overflow".to_string()))
}

fn double_arithmetic(operator: BinaryOperator, a: f64, b: f64) -> Result<Value, ExecutionError> {
    if matches!(operator, BinaryOperator::Slash | BinaryOperator::Percent) && b == 0.0 {
        return Err(ExecutionError::ExpressionError("division by zero".to_string()));
    }
    let result = match operator {
        BinaryOperator::Plus => a + b,
        BinaryOperator::Minus => a - b,
        BinaryOperator::Star => a * b,
        BinaryOperator::Slash => a / b,
        BinaryOperator::Percent => a % b,
        other => {
            return Err(ExecutionError::RuntimeError(format!(
                "unexpected arithmetic operator {:?}",
                other
            )))
        }
    };
    Ok(Value::Double(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::expression;
    use crate::ast::lexer::tokenize;
    use std::collections::BTreeMap;

    fn parse(text: &str) -> Expression {
        let tokens = tokenize(text).unwrap();
        let (rest, expr) = expression(&tokens).unwrap();
        assert!(rest.len() <= 1, "unparsed tokens: {:?}", rest);
        expr
    }

    fn eval(text: &str) -> Value {
        DefaultEvaluator::new()
            .evaluate_constant(&parse(text))
            .unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3"), Value::Int(7));
        assert_eq!(eval("7 / 2"), Value::Int(3));
        assert_eq!(eval("7 % 4"), Value::Int(3));
        assert_eq!(eval("1 + 0.5"), Value::Double(1.5));
        assert_eq!(eval("\"n\" + 1"), Value::from("n1"));
        assert_eq!(eval("-(2 - 5)"), Value::Int(3));
        assert_eq!(eval("1 + NULL"), Value::Null);
        assert!(DefaultEvaluator::new().evaluate_constant(&parse("1 / 0")).is_err());
        assert!(DefaultEvaluator::new().evaluate_constant(&parse("true + 1")).is_err());
    }

    #[test]
    fn test_comparison_and_strings() {
        assert_eq!(eval("1 == 1.0"), Value::Bool(true));
        assert_eq!(eval("2 <> 3"), Value::Bool(true));
        assert_eq!(eval("\"abc\" < \"abd\""), Value::Bool(true));
        assert_eq!(eval("\"Tim Duncan\" CONTAINS \"Dun\""), Value::Bool(true));
        assert_eq!(eval("\"Tony Parker\" =~ \"T.*r\""), Value::Bool(true));
        assert_eq!(eval("\"Tony Parker\" =~ \"T\""), Value::Bool(false));
        assert_eq!(eval("NULL == NULL"), Value::Null);
        assert_eq!(eval("NULL IS NULL"), Value::Bool(true));
        assert_eq!(eval("1 IS NOT NULL"), Value::Bool(true));
        assert!(DefaultEvaluator::new().evaluate_constant(&parse("1 < \"a\"")).is_err());
    }

    #[test]
    fn test_three_valued_logic() {
        assert_eq!(eval("NULL AND false"), Value::Bool(false));
        assert_eq!(eval("NULL AND true"), Value::Null);
        assert_eq!(eval("NULL OR true"), Value::Bool(true));
        assert_eq!(eval("true XOR true"), Value::Bool(false));
        assert_eq!(eval("NOT NULL"), Value::Null);
        assert_eq!(eval("!false && true"), Value::Bool(true));
        // short circuit: the right side would fail
        assert_eq!(eval("false AND 1 / 0 == 1"), Value::Bool(false));
    }

    #[test]
    fn test_property_lookup() {
        let src_id = VertexId::from("Tim Duncan");
        let dst_id = VertexId::from("Tony Parker");
        let mut props = BTreeMap::new();
        props.insert("age".to_string(), Value::Int(42));
        let src = Vertex::new(src_id.clone()).with_tag("player", props);
        let edge = Edge::new("like", src_id.clone(), dst_id.clone()).with_property("likeness", 95i64);

        let scope = RowScope::default()
            .with_source(&src_id, Some(&src))
            .with_edge(&edge)
            .with_destination(&dst_id, None);
        let evaluator = DefaultEvaluator::new();

        let value = |text: &str| evaluator.evaluate(&parse(text), &scope).unwrap();
        assert_eq!(value("$^.player.age"), Value::Int(42));
        assert_eq!(value("$$.player.age"), Value::Null);
        assert_eq!(value("like.likeness + 1"), Value::Int(96));
        assert_eq!(value("like._dst"), Value::from("Tony Parker"));
        assert_eq!(value("like._type"), Value::from("like"));
        assert_eq!(value("like._rank"), Value::Int(0));
        assert_eq!(value("serve.start_year"), Value::Null);
        assert!(matches!(value("like"), Value::Edge(_)));
        assert!(evaluator
            .evaluate_predicate(&parse("like.likeness > 90 AND $^.player.age == 42"), &scope)
            .unwrap());
    }

    #[test]
    fn test_reverse_hop_pseudo_properties() {
        // Traversing like REVERSELY from Tony reaches Tim over the stored edge Tim->Tony
        let tony = VertexId::from("Tony Parker");
        let tim = VertexId::from("Tim Duncan");
        let edge = Edge::new("like", tim.clone(), tony.clone());
        let scope = RowScope::default()
            .with_source(&tony, None)
            .with_edge(&edge)
            .with_destination(&tim, None);
        let evaluator = DefaultEvaluator::new();
        assert_eq!(
            evaluator.evaluate(&parse("like._dst"), &scope).unwrap(),
            Value::from("Tim Duncan")
        );
        assert_eq!(
            evaluator.evaluate(&parse("like._src"), &scope).unwrap(),
            Value::from("Tony Parker")
        );
    }

    #[test]
    fn test_input_reference() {
        let table = ResultTable::new(vec!["id".to_string(), "n".to_string()]);
        let row = Row::new(vec![Value::from("a"), Value::Int(3)]);
        let scope = RowScope::default().with_input(&table, &row);
        let evaluator = DefaultEvaluator::new();
        assert_eq!(
            evaluator.evaluate(&parse("$-.n * 2"), &scope).unwrap(),
            Value::Int(6)
        );
        assert!(evaluator.evaluate(&parse("$-.missing"), &scope).is_err());
        assert!(evaluator
            .evaluate(&parse("$-.n"), &RowScope::default())
            .is_err());
    }

    #[test]
    fn test_regex_cache_is_bounded() {
        let cache = RegexCache::new();
        let evaluator = DefaultEvaluator::new();
        let scope = RowScope::default().with_regexes(&cache);
        for n in 0..REGEX_CACHE_CAPACITY + 10 {
            let text = format!("\"x{}\" =~ \"x{}\"", n, n);
            assert_eq!(evaluator.evaluate(&parse(&text), &scope).unwrap(), Value::Bool(true));
        }
        assert_eq!(cache.len(), REGEX_CACHE_CAPACITY);

        // uncached patterns still match correctly
        assert!(cache.is_match("x70", "x7.").unwrap());
        assert!(!cache.is_match("y70", "x7.").unwrap());
        assert!(cache.is_match("a", "(").is_err());
    }
}
