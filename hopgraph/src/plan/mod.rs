// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planning
//!
//! Semantic validation of parsed queries against the schema catalog, producing
//! typed plans the executor runs without further schema lookups.

pub mod logical;
pub mod validator;

pub use logical::{
    ColumnDef, FilterStage, FindPathPlan, GoPlan, OutputColumn, PlanNode, PlannedStatement,
    QueryPlan, VertexOrigin, YieldPlan, PATH_COLUMN,
};
pub use validator::{SemanticError, Validator};
