// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Validated query plans
//!
//! A plan is what the validator hands to the executor: every name resolved
//! against the catalog, constant vertex ids evaluated, default projections
//! filled in and every output column statically typed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::{Expression, InputSource, PathMode, SetOperationType};
use crate::storage::{EdgeDirection, VertexId};
use crate::types::ColumnType;

/// Name and static type of one output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A projected output column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputColumn {
    pub name: String,
    pub expression: Expression,
    pub column_type: ColumnType,
}

/// Where the starting vertices of a traversal come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VertexOrigin {
    /// Distinct constant ids
    Constants(Vec<VertexId>),
    /// A column of the bound input; rows are joined back on this column
    Column { source: InputSource, column: String },
}

/// When a GO predicate is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterStage {
    /// Per record at every hop, before the record feeds the next frontier
    EveryHop,
    /// Per output row after joining with the input (predicate reads input columns)
    AfterJoin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoPlan {
    pub min_steps: u32,
    pub max_steps: u32,
    pub origin: VertexOrigin,
    pub edge_types: Vec<String>,
    pub direction: EdgeDirection,
    pub filter: Option<Expression>,
    pub filter_stage: FilterStage,
    pub columns: Vec<OutputColumn>,
    pub distinct: bool,
    /// Emit hop-0 rows for existing origins (only with `min_steps == 0`)
    pub zero_hop_rows: bool,
    pub needs_source_vertex: bool,
    pub needs_destination_vertex: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindPathPlan {
    pub mode: PathMode,
    pub sources: VertexOrigin,
    pub targets: VertexOrigin,
    pub edge_types: Vec<String>,
    pub direction: EdgeDirection,
    pub max_steps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldPlan {
    /// Input read by the projection; `None` yields a single row
    pub input: Option<InputSource>,
    pub columns: Vec<OutputColumn>,
    pub filter: Option<Expression>,
    pub distinct: bool,
}

/// Executable plan tree for one query expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanNode {
    Go(GoPlan),
    FindPath(FindPathPlan),
    Yield(YieldPlan),
    Pipe {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    SetOperation {
        operation: SetOperationType,
        left: Box<PlanNode>,
        right: Box<PlanNode>,
        /// Common type of each column pair
        column_types: Vec<ColumnType>,
    },
}

/// Output column of FIND PATH
pub const PATH_COLUMN: &str = "_path";

impl PlanNode {
    /// Static output schema of this node
    pub fn schema(&self) -> Vec<ColumnDef> {
        match self {
            PlanNode::Go(go) => columns_schema(&go.columns),
            PlanNode::Yield(yield_plan) => columns_schema(&yield_plan.columns),
            PlanNode::FindPath(_) => vec![ColumnDef::new(PATH_COLUMN, ColumnType::Path)],
            PlanNode::Pipe { right, .. } => right.schema(),
            PlanNode::SetOperation {
                left, column_types, ..
            } => left
                .schema()
                .into_iter()
                .zip(column_types)
                .map(|(column, column_type)| ColumnDef::new(column.name, *column_type))
                .collect(),
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema().into_iter().map(|c| c.name).collect()
    }

    fn explain(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            PlanNode::Go(go) => {
                writeln!(
                    f,
                    "{}Go steps={}..{} from={} over={} direction={}",
                    pad,
                    go.min_steps,
                    go.max_steps,
                    go.origin,
                    go.edge_types.join(","),
                    go.direction
                )?;
                if let Some(filter) = &go.filter {
                    let stage = match go.filter_stage {
                        FilterStage::EveryHop => "every hop",
                        FilterStage::AfterJoin => "after join",
                    };
                    writeln!(f, "{}  filter: {} ({})", pad, filter, stage)?;
                }
                explain_columns(f, &pad, &go.columns, go.distinct)?;
                if go.zero_hop_rows && go.min_steps == 0 {
                    writeln!(f, "{}  zero-hop rows", pad)?;
                }
                Ok(())
            }
            PlanNode::FindPath(find) => writeln!(
                f,
                "{}FindPath mode={} from={} to={} over={} direction={} upto={}",
                pad,
                find.mode,
                find.sources,
                find.targets,
                find.edge_types.join(","),
                find.direction,
                find.max_steps
            ),
            PlanNode::Yield(yield_plan) => {
                match &yield_plan.input {
                    Some(input) => writeln!(f, "{}Yield input={}", pad, input)?,
                    None => writeln!(f, "{}Yield", pad)?,
                }
                if let Some(filter) = &yield_plan.filter {
                    writeln!(f, "{}  filter: {}", pad, filter)?;
                }
                explain_columns(f, &pad, &yield_plan.columns, yield_plan.distinct)
            }
            PlanNode::Pipe { left, right } => {
                writeln!(f, "{}Pipe", pad)?;
                left.explain(f, depth + 1)?;
                right.explain(f, depth + 1)
            }
            PlanNode::SetOperation {
                operation,
                left,
                right,
                ..
            } => {
                writeln!(f, "{}{}", pad, operation)?;
                left.explain(f, depth + 1)?;
                right.explain(f, depth + 1)
            }
        }
    }
}

fn columns_schema(columns: &[OutputColumn]) -> Vec<ColumnDef> {
    columns
        .iter()
        .map(|c| ColumnDef::new(c.name.clone(), c.column_type))
        .collect()
}

fn explain_columns(
    f: &mut fmt::Formatter<'_>,
    pad: &str,
    columns: &[OutputColumn],
    distinct: bool,
) -> fmt::Result {
    let rendered: Vec<String> = columns
        .iter()
        .map(|c| {
            let text = c.expression.to_string();
            if text == c.name {
                format!("{}: {}", text, c.column_type)
            } else {
                format!("{} AS {}: {}", text, c.name, c.column_type)
            }
        })
        .collect();
    writeln!(
        f,
        "{}  yield{}: {}",
        pad,
        if distinct { " distinct" } else { "" },
        rendered.join(", ")
    )
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.explain(f, 0)
    }
}

impl fmt::Display for VertexOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexOrigin::Constants(ids) => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "[{}]", ids.join(","))
            }
            VertexOrigin::Column { source, column } => write!(f, "{}.{}", source, column),
        }
    }
}

/// One validated statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedStatement {
    /// Variable the result is bound to, for `$name = ...`
    pub variable: Option<String>,
    pub root: PlanNode,
}

/// Validated plan of a whole query text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPlan {
    pub statements: Vec<PlannedStatement>,
}

impl QueryPlan {
    /// Columns of the query's final result
    pub fn output_columns(&self) -> Vec<String> {
        match self.statements.last() {
            Some(PlannedStatement {
                variable: None,
                root,
            }) => root.column_names(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            match &statement.variable {
                Some(name) => writeln!(f, "Statement {}: ${} =", i + 1, name)?,
                None => writeln!(f, "Statement {}:", i + 1)?,
            }
            statement.root.explain(f, 1)?;
        }
        Ok(())
    }
}
