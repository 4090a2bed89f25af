// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query Coordinator - Central orchestration for query execution
//!
//! The QueryCoordinator is the single entry point for running traversal
//! queries: it parses, validates against the schema catalog, executes against
//! the graph data provider and tracks running queries for cancellation.

pub mod query_coordinator;

pub use query_coordinator::{ErrorKind, QueryCoordinator, QueryError, QueryInfo};

// Re-export types needed for the public API
pub use crate::exec::{QueryResult, ResultTable, Row};
