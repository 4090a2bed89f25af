// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Semantic analysis
//!
//! Turns a parsed [`Document`] into a [`QueryPlan`]. Every tag, edge type,
//! property, input column and variable is resolved here, and every output
//! column gets a static type, so that a query which passes validation never
//! fails for schema reasons once the provider is called.
//!
//! Scoping rules:
//! - `$-` is the table produced by the stage on the left of the nearest pipe;
//!   inside a parenthesized query on the right of a pipe it is visible to the
//!   leading stage of every branch.
//! - `$name` is the table of the most recent `$name = ...` statement.
//! - A stage reads at most one input. In GO the input is the one FROM reads.
//! - Binding a table with duplicate column names is rejected.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::logical::{
    ColumnDef, FilterStage, FindPathPlan, GoPlan, OutputColumn, PlanNode, PlannedStatement,
    QueryPlan, VertexOrigin, YieldPlan,
};
use crate::ast::{
    BinaryExpression, BinaryOperator, Direction, Document, EdgeTypeList, Expression,
    FindPathStatement, GoStatement, InputSource, Literal, PropertyRef, Query, Statement,
    StepRange, UnaryOperator, VertexSource, YieldColumn, YieldStatement,
};
use crate::catalog::{CatalogError, SchemaCatalog};
use crate::exec::config::EngineConfig;
use crate::exec::expression::ExpressionEvaluator;
use crate::storage::EdgeDirection;
use crate::types::{ColumnType, TypeCoercion};

/// Errors detected before any data is read
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Edge type `{0}' is not in the OVER clause")]
    EdgeNotInOver(String),

    #[error("Invalid step range: {min} TO {max}")]
    InvalidStepRange { min: u32, max: u32 },

    #[error("{steps} steps exceed the limit of {limit}")]
    StepLimitExceeded { steps: u32, limit: u32 },

    #[error("`$-' used without a piped input")]
    MissingPipeInput,

    #[error("Variable `${0}' is not defined")]
    UndefinedVariable(String),

    #[error("Column `{column}' not found in {input}")]
    UnknownColumn { input: String, column: String },

    #[error("Duplicate column `{column}' in {input}")]
    DuplicateColumn { input: String, column: String },

    #[error("A stage can read only one input, found {first} and {second}")]
    MultipleInputs { first: String, second: String },

    #[error("`{input}' has {count} columns, a bare reference needs exactly one")]
    BareInputColumns { input: String, count: usize },

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Vertex id type mismatch: expected {expected}, found {found}")]
    VidTypeMismatch {
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("Invalid vertex id: {0}")]
    InvalidVertexId(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("{operation} operands have {left} and {right} columns")]
    SetColumnCount {
        operation: String,
        left: usize,
        right: usize,
    },

    #[error("Column {index} has incompatible types {left} and {right}")]
    SetColumnType {
        index: usize,
        left: ColumnType,
        right: ColumnType,
    },
}

/// What an expression may reference at its position in the query
struct ExprScope<'s> {
    /// Edge types of the enclosing traversal; `None` outside GO
    edge_types: Option<&'s [String]>,
    input: Option<(InputSource, &'s [ColumnDef])>,
}

pub struct Validator<'a> {
    catalog: &'a dyn SchemaCatalog,
    config: &'a EngineConfig,
    evaluator: &'a dyn ExpressionEvaluator,
    variables: HashMap<String, Vec<ColumnDef>>,
}

impl<'a> Validator<'a> {
    pub fn new(
        catalog: &'a dyn SchemaCatalog,
        config: &'a EngineConfig,
        evaluator: &'a dyn ExpressionEvaluator,
    ) -> Self {
        Self {
            catalog,
            config,
            evaluator,
            variables: HashMap::new(),
        }
    }

    /// Validate all statements in order; variables become visible after their assignment
    pub fn validate_document(mut self, document: &Document) -> Result<QueryPlan, SemanticError> {
        let mut statements = Vec::with_capacity(document.statements.len());
        for statement in &document.statements {
            match statement {
                Statement::Assignment { variable, query } => {
                    let root = self.validate_query(query, None)?;
                    self.variables.insert(variable.clone(), root.schema());
                    statements.push(PlannedStatement {
                        variable: Some(variable.clone()),
                        root,
                    });
                }
                Statement::Query(query) => {
                    let root = self.validate_query(query, None)?;
                    statements.push(PlannedStatement {
                        variable: None,
                        root,
                    });
                }
            }
        }
        Ok(QueryPlan { statements })
    }

    fn validate_query(
        &self,
        query: &Query,
        pipe: Option<&[ColumnDef]>,
    ) -> Result<PlanNode, SemanticError> {
        match query {
            Query::Go(go) => self.validate_go(go, pipe).map(PlanNode::Go),
            Query::FindPath(find) => self.validate_find_path(find, pipe).map(PlanNode::FindPath),
            Query::Yield(stmt) => self.validate_yield(stmt, pipe).map(PlanNode::Yield),
            Query::Pipe { left, right } => {
                let left = self.validate_query(left, pipe)?;
                let schema = left.schema();
                let right = self.validate_query(right, Some(schema.as_slice()))?;
                Ok(PlanNode::Pipe {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            Query::SetOperation(set) => {
                let left = self.validate_query(&set.left, pipe)?;
                let right = self.validate_query(&set.right, pipe)?;
                let (left_schema, right_schema) = (left.schema(), right.schema());
                if left_schema.len() != right_schema.len() {
                    return Err(SemanticError::SetColumnCount {
                        operation: set.operation.to_string(),
                        left: left_schema.len(),
                        right: right_schema.len(),
                    });
                }
                let column_types = left_schema
                    .iter()
                    .zip(&right_schema)
                    .enumerate()
                    .map(|(index, (l, r))| {
                        TypeCoercion::find_common_type(l.column_type, r.column_type).map_err(|_| {
                            SemanticError::SetColumnType {
                                index,
                                left: l.column_type,
                                right: r.column_type,
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PlanNode::SetOperation {
                    operation: set.operation,
                    left: Box::new(left),
                    right: Box::new(right),
                    column_types,
                })
            }
        }
    }

    fn validate_go(
        &self,
        go: &GoStatement,
        pipe: Option<&[ColumnDef]>,
    ) -> Result<GoPlan, SemanticError> {
        let range = go.steps.unwrap_or(StepRange { min: 1, max: 1 });
        self.check_steps(range)?;
        let edge_types = self.edge_types(&go.over.edge_types)?;
        let (origin, input) = self.resolve_origin(&go.from, pipe)?;
        let scope = ExprScope {
            edge_types: Some(&edge_types),
            input,
        };

        let filter = match &go.where_clause {
            Some(condition) => {
                self.check_predicate(condition, &scope)?;
                Some(condition.clone())
            }
            None => None,
        };
        let (columns, distinct) = match &go.yield_clause {
            Some(clause) => (self.project(&clause.columns, &scope)?, clause.distinct),
            None => (self.default_columns(&edge_types), false),
        };

        let refs: Vec<&PropertyRef> = filter
            .iter()
            .chain(columns.iter().map(|c| &c.expression))
            .flat_map(Expression::property_refs)
            .collect();
        let reads_traversal = refs.iter().any(|r| {
            matches!(
                r,
                PropertyRef::Edge { .. }
                    | PropertyRef::EdgeValue(_)
                    | PropertyRef::Destination { .. }
                    | PropertyRef::DestinationVertex
            )
        });
        let needs_source_vertex = refs
            .iter()
            .any(|r| matches!(r, PropertyRef::Source { .. } | PropertyRef::SourceVertex));
        let needs_destination_vertex = refs.iter().any(|r| {
            matches!(
                r,
                PropertyRef::Destination { .. } | PropertyRef::DestinationVertex
            )
        });
        let filter_stage = match &filter {
            Some(condition)
                if condition
                    .property_refs()
                    .iter()
                    .any(|r| matches!(r, PropertyRef::Input { .. })) =>
            {
                FilterStage::AfterJoin
            }
            _ => FilterStage::EveryHop,
        };

        Ok(GoPlan {
            min_steps: range.min,
            max_steps: range.max,
            origin,
            direction: edge_direction(go.over.direction),
            edge_types: edge_types.clone(),
            filter,
            filter_stage,
            columns,
            distinct,
            zero_hop_rows: range.min == 0 && !reads_traversal,
            needs_source_vertex,
            needs_destination_vertex,
        })
    }

    fn validate_find_path(
        &self,
        find: &FindPathStatement,
        pipe: Option<&[ColumnDef]>,
    ) -> Result<FindPathPlan, SemanticError> {
        let max_steps = find.upto.unwrap_or(self.config.default_path_steps);
        self.check_steps(StepRange {
            min: 0,
            max: max_steps,
        })?;
        let edge_types = self.edge_types(&find.over.edge_types)?;
        let (sources, from_input) = self.resolve_origin(&find.from, pipe)?;
        let (targets, to_input) = self.resolve_origin(&find.to, pipe)?;
        if let (Some((first, _)), Some((second, _))) = (&from_input, &to_input) {
            if first != second {
                return Err(SemanticError::MultipleInputs {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }

        Ok(FindPathPlan {
            mode: find.mode,
            sources,
            targets,
            edge_types,
            direction: edge_direction(find.over.direction),
            max_steps,
        })
    }

    fn validate_yield(
        &self,
        stmt: &YieldStatement,
        pipe: Option<&[ColumnDef]>,
    ) -> Result<YieldPlan, SemanticError> {
        let mut sources: Vec<InputSource> = Vec::new();
        let mut note = |source: &InputSource| {
            if !sources.contains(source) {
                sources.push(source.clone());
            }
        };
        for column in &stmt.yield_clause.columns {
            match column {
                YieldColumn::Wildcard(source) => note(source),
                YieldColumn::Expression { expression, .. } => {
                    input_sources(expression).into_iter().for_each(&mut note)
                }
            }
        }
        if let Some(condition) = &stmt.where_clause {
            input_sources(condition).into_iter().for_each(&mut note);
        }
        if let [first, second, ..] = sources.as_slice() {
            return Err(SemanticError::MultipleInputs {
                first: first.to_string(),
                second: second.to_string(),
            });
        }

        // Without an explicit reference a piped YIELD still runs once per input row
        let input = match sources.into_iter().next() {
            Some(source) => {
                let schema = self.bind_input(&source, pipe)?;
                Some((source, schema))
            }
            None => pipe.map(|schema| (InputSource::Pipe, schema)),
        };
        let scope = ExprScope {
            edge_types: None,
            input,
        };

        let filter = match &stmt.where_clause {
            Some(condition) => {
                self.check_predicate(condition, &scope)?;
                Some(condition.clone())
            }
            None => None,
        };
        let columns = self.project(&stmt.yield_clause.columns, &scope)?;

        Ok(YieldPlan {
            input: scope.input.map(|(source, _)| source),
            columns,
            filter,
            distinct: stmt.yield_clause.distinct,
        })
    }

    fn check_steps(&self, range: StepRange) -> Result<(), SemanticError> {
        if range.min > range.max {
            return Err(SemanticError::InvalidStepRange {
                min: range.min,
                max: range.max,
            });
        }
        if range.max > self.config.max_steps {
            return Err(SemanticError::StepLimitExceeded {
                steps: range.max,
                limit: self.config.max_steps,
            });
        }
        Ok(())
    }

    fn edge_types(&self, list: &EdgeTypeList) -> Result<Vec<String>, SemanticError> {
        match list {
            EdgeTypeList::All => Ok(self.catalog.edge_type_names()),
            EdgeTypeList::Named(names) => {
                let mut edge_types: Vec<String> = Vec::with_capacity(names.len());
                for name in names {
                    if !self.catalog.has_edge_type(name) {
                        return Err(CatalogError::EdgeTypeNotFound(name.clone()).into());
                    }
                    if !edge_types.contains(name) {
                        edge_types.push(name.clone());
                    }
                }
                Ok(edge_types)
            }
        }
    }

    /// Table behind `$-` or `$name`, rejected when its column names are not unique
    fn bind_input<'s>(
        &'s self,
        source: &InputSource,
        pipe: Option<&'s [ColumnDef]>,
    ) -> Result<&'s [ColumnDef], SemanticError> {
        let schema = match source {
            InputSource::Pipe => pipe.ok_or(SemanticError::MissingPipeInput)?,
            InputSource::Variable(name) => self
                .variables
                .get(name)
                .map(Vec::as_slice)
                .ok_or_else(|| SemanticError::UndefinedVariable(name.clone()))?,
        };
        let mut seen = HashSet::new();
        if let Some(duplicate) = schema.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(SemanticError::DuplicateColumn {
                input: source.to_string(),
                column: duplicate.name.clone(),
            });
        }
        Ok(schema)
    }

    fn resolve_origin<'s>(
        &'s self,
        from: &VertexSource,
        pipe: Option<&'s [ColumnDef]>,
    ) -> Result<(VertexOrigin, Option<(InputSource, &'s [ColumnDef])>), SemanticError> {
        match from {
            VertexSource::Ids(expressions) => {
                let vid_type = self.catalog.vid_type();
                let mut ids = Vec::with_capacity(expressions.len());
                let mut seen = HashSet::new();
                for expression in expressions {
                    if let Some(property) = expression.property_refs().first() {
                        return Err(SemanticError::InvalidReference(format!(
                            "`{}' is not a constant vertex id",
                            property
                        )));
                    }
                    let value = self
                        .evaluator
                        .evaluate_constant(expression)
                        .map_err(|e| SemanticError::InvalidVertexId(e.to_string()))?;
                    let id = value.to_vertex_id().ok_or_else(|| {
                        SemanticError::InvalidVertexId(format!("{} is not a vertex id", value))
                    })?;
                    let found = value.column_type();
                    if found != vid_type {
                        return Err(SemanticError::VidTypeMismatch {
                            expected: vid_type,
                            found,
                        });
                    }
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
                Ok((VertexOrigin::Constants(ids), None))
            }
            VertexSource::Column { source, column } => {
                let schema = self.bind_input(source, pipe)?;
                let def = schema.iter().find(|c| &c.name == column).ok_or_else(|| {
                    SemanticError::UnknownColumn {
                        input: source.to_string(),
                        column: column.clone(),
                    }
                })?;
                self.check_vid_column(def)?;
                Ok((
                    VertexOrigin::Column {
                        source: source.clone(),
                        column: column.clone(),
                    },
                    Some((source.clone(), schema)),
                ))
            }
            VertexSource::Input(source) => {
                let schema = self.bind_input(source, pipe)?;
                let [def] = schema else {
                    return Err(SemanticError::BareInputColumns {
                        input: source.to_string(),
                        count: schema.len(),
                    });
                };
                self.check_vid_column(def)?;
                Ok((
                    VertexOrigin::Column {
                        source: source.clone(),
                        column: def.name.clone(),
                    },
                    Some((source.clone(), schema)),
                ))
            }
        }
    }

    fn check_vid_column(&self, def: &ColumnDef) -> Result<(), SemanticError> {
        let vid_type = self.catalog.vid_type();
        if def.column_type == ColumnType::Any || def.column_type == vid_type {
            Ok(())
        } else {
            Err(SemanticError::VidTypeMismatch {
                expected: vid_type,
                found: def.column_type,
            })
        }
    }

    /// One `<edge>._dst` column per traversed edge type
    fn default_columns(&self, edge_types: &[String]) -> Vec<OutputColumn> {
        let vid_type = self.catalog.vid_type();
        edge_types
            .iter()
            .map(|edge_type| {
                let expression = Expression::Property(PropertyRef::Edge {
                    edge_type: edge_type.clone(),
                    property: "_dst".to_string(),
                });
                OutputColumn {
                    name: expression.column_name(),
                    expression,
                    column_type: vid_type,
                }
            })
            .collect()
    }

    fn project(
        &self,
        columns: &[YieldColumn],
        scope: &ExprScope<'_>,
    ) -> Result<Vec<OutputColumn>, SemanticError> {
        let mut output = Vec::with_capacity(columns.len());
        for column in columns {
            match column {
                YieldColumn::Expression { expression, alias } => {
                    let column_type = self.infer(expression, scope)?;
                    output.push(OutputColumn {
                        name: alias.clone().unwrap_or_else(|| expression.column_name()),
                        expression: expression.clone(),
                        column_type,
                    });
                }
                YieldColumn::Wildcard(source) => match &scope.input {
                    Some((bound, schema)) if bound == source => {
                        output.extend(schema.iter().map(|def| OutputColumn {
                            name: def.name.clone(),
                            expression: Expression::Property(PropertyRef::Input {
                                source: source.clone(),
                                column: def.name.clone(),
                            }),
                            column_type: def.column_type,
                        }));
                    }
                    Some((bound, _)) => {
                        return Err(SemanticError::MultipleInputs {
                            first: bound.to_string(),
                            second: source.to_string(),
                        })
                    }
                    None => {
                        return Err(SemanticError::InvalidReference(format!(
                            "`{}.*' needs FROM to read {}",
                            source, source
                        )))
                    }
                },
            }
        }
        Ok(output)
    }

    fn check_predicate(
        &self,
        condition: &Expression,
        scope: &ExprScope<'_>,
    ) -> Result<(), SemanticError> {
        match self.infer(condition, scope)? {
            ColumnType::Bool | ColumnType::Any => Ok(()),
            other => Err(SemanticError::TypeMismatch(format!(
                "condition `{}' has type {}, expected bool",
                condition, other
            ))),
        }
    }

    /// Static type of an expression; also resolves every reference in it
    fn infer(&self, expression: &Expression, scope: &ExprScope<'_>) -> Result<ColumnType, SemanticError> {
        match expression {
            Expression::Literal(literal) => Ok(literal_type(literal)),
            Expression::List(items) => {
                for item in items {
                    self.infer(item, scope)?;
                }
                Ok(ColumnType::List)
            }
            Expression::Property(property) => self.property_type(property, scope),
            Expression::Unary(unary) => {
                let operand = self.infer(&unary.expression, scope)?;
                match unary.operator {
                    UnaryOperator::Not if is_boolean(operand) => Ok(ColumnType::Bool),
                    UnaryOperator::Negate if operand.is_numeric() || operand == ColumnType::Any => {
                        Ok(operand)
                    }
                    operator => Err(SemanticError::TypeMismatch(format!(
                        "cannot apply {:?} to {}",
                        operator, operand
                    ))),
                }
            }
            Expression::Binary(binary) => self.binary_type(binary, scope),
            Expression::IsNull(is_null) => {
                self.infer(&is_null.expression, scope)?;
                Ok(ColumnType::Bool)
            }
        }
    }

    fn binary_type(
        &self,
        binary: &BinaryExpression,
        scope: &ExprScope<'_>,
    ) -> Result<ColumnType, SemanticError> {
        let left = self.infer(&binary.left, scope)?;
        let right = self.infer(&binary.right, scope)?;
        let operator = binary.operator;

        let result = if operator.is_logical() {
            (is_boolean(left) && is_boolean(right)).then_some(ColumnType::Bool)
        } else if operator.is_comparison() {
            let valid = match operator {
                BinaryOperator::Equal | BinaryOperator::NotEqual => true,
                BinaryOperator::Contains | BinaryOperator::Regex => {
                    is_textual(left) && is_textual(right)
                }
                _ => is_orderable(left, right),
            };
            valid.then_some(ColumnType::Bool)
        } else {
            arithmetic_type(operator, left, right)
        };

        result.ok_or_else(|| {
            SemanticError::TypeMismatch(format!(
                "cannot apply {:?} to {} and {}",
                operator, left, right
            ))
        })
    }

    fn property_type(
        &self,
        property: &PropertyRef,
        scope: &ExprScope<'_>,
    ) -> Result<ColumnType, SemanticError> {
        match property {
            PropertyRef::Source { tag, property: name }
            | PropertyRef::Destination { tag, property: name } => {
                require_traversal(property, scope)?;
                Ok(self.catalog.tag_property_type(tag, name)?)
            }
            PropertyRef::SourceVertex | PropertyRef::DestinationVertex => {
                require_traversal(property, scope)?;
                Ok(ColumnType::Vertex)
            }
            PropertyRef::Edge {
                edge_type,
                property: name,
            } => {
                self.check_traversed_edge(edge_type, require_traversal(property, scope)?)?;
                match name.as_str() {
                    "_src" | "_dst" => Ok(self.catalog.vid_type()),
                    "_type" => Ok(ColumnType::String),
                    "_rank" => Ok(ColumnType::Int),
                    other => Ok(self.catalog.edge_property_type(edge_type, other)?),
                }
            }
            PropertyRef::EdgeValue(edge_type) => {
                self.check_traversed_edge(edge_type, require_traversal(property, scope)?)?;
                Ok(ColumnType::Edge)
            }
            PropertyRef::Input { source, column } => match &scope.input {
                Some((bound, schema)) if bound == source => schema
                    .iter()
                    .find(|def| &def.name == column)
                    .map(|def| def.column_type)
                    .ok_or_else(|| SemanticError::UnknownColumn {
                        input: source.to_string(),
                        column: column.clone(),
                    }),
                Some((bound, _)) => Err(SemanticError::MultipleInputs {
                    first: bound.to_string(),
                    second: source.to_string(),
                }),
                None => Err(SemanticError::InvalidReference(format!(
                    "`{}' needs FROM to read {}",
                    property, source
                ))),
            },
        }
    }

    fn check_traversed_edge(&self, edge_type: &str, traversed: &[String]) -> Result<(), SemanticError> {
        if !self.catalog.has_edge_type(edge_type) {
            return Err(CatalogError::EdgeTypeNotFound(edge_type.to_string()).into());
        }
        if !traversed.iter().any(|e| e == edge_type) {
            return Err(SemanticError::EdgeNotInOver(edge_type.to_string()));
        }
        Ok(())
    }
}

fn require_traversal<'s>(
    property: &PropertyRef,
    scope: &ExprScope<'s>,
) -> Result<&'s [String], SemanticError> {
    scope.edge_types.ok_or_else(|| {
        SemanticError::InvalidReference(format!("`{}' is only available in GO", property))
    })
}

fn input_sources(expression: &Expression) -> Vec<&InputSource> {
    expression
        .property_refs()
        .into_iter()
        .filter_map(|r| match r {
            PropertyRef::Input { source, .. } => Some(source),
            _ => None,
        })
        .collect()
}

fn edge_direction(direction: Direction) -> EdgeDirection {
    match direction {
        Direction::Forward => EdgeDirection::Forward,
        Direction::Reversely => EdgeDirection::Reverse,
        Direction::Bidirect => EdgeDirection::Both,
    }
}

fn literal_type(literal: &Literal) -> ColumnType {
    match literal {
        Literal::Null => ColumnType::Any,
        Literal::Boolean(_) => ColumnType::Bool,
        Literal::Integer(_) => ColumnType::Int,
        Literal::Float(_) => ColumnType::Double,
        Literal::String(_) => ColumnType::String,
    }
}

fn is_boolean(t: ColumnType) -> bool {
    matches!(t, ColumnType::Bool | ColumnType::Any)
}

fn is_textual(t: ColumnType) -> bool {
    matches!(t, ColumnType::String | ColumnType::Any)
}

fn is_orderable(left: ColumnType, right: ColumnType) -> bool {
    left == ColumnType::Any
        || right == ColumnType::Any
        || (left.is_numeric() && right.is_numeric())
        || (left == right
            && matches!(left, ColumnType::String | ColumnType::Bool))
}

fn arithmetic_type(operator: BinaryOperator, left: ColumnType, right: ColumnType) -> Option<ColumnType> {
    let scalar = |t: ColumnType| {
        matches!(
            t,
            ColumnType::Int | ColumnType::Double | ColumnType::Bool | ColumnType::String | ColumnType::Any
        )
    };
    if operator == BinaryOperator::Plus
        && (left == ColumnType::String || right == ColumnType::String)
    {
        return (scalar(left) && scalar(right)).then_some(ColumnType::String);
    }
    match (left, right) {
        (ColumnType::Int, ColumnType::Int) => Some(ColumnType::Int),
        (l, r) if l.is_numeric() && r.is_numeric() => Some(ColumnType::Double),
        (ColumnType::Any, t) | (t, ColumnType::Any) if t.is_numeric() || t == ColumnType::Any => {
            Some(ColumnType::Any)
        }
        _ => None,
    }
}
