// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! HopGraph - traversal and path queries over property graphs
//!
//! HopGraph evaluates an nGQL-style query language against a read-only graph
//! data provider:
//!
//! - **GO**: multi-hop neighbor expansion with `n [TO m] STEPS`,
//!   `REVERSELY` / `BIDIRECT`, per-hop `WHERE` filters and `YIELD` projections
//! - **FIND SHORTEST|ALL PATH**: bidirectional shortest-path search and
//!   bounded simple-path enumeration
//! - **Pipelines and variables**: `|` with `$-.col`, `$name = ...;` with `$name.col`
//! - **Set algebra**: `UNION [ALL]`, `MINUS`, `INTERSECT`
//!
//! # Usage
//!
//! ```ignore
//! use hopgraph::{EngineConfig, QueryCoordinator};
//!
//! let coordinator = QueryCoordinator::from_json_file("nba.json", EngineConfig::default())?;
//! let result = coordinator.process_query(r#"GO FROM "Tim Duncan" OVER like"#)?;
//! for row in result.rows() {
//!     println!("{}", row.values[0]);
//! }
//! ```
//!
//! Schema metadata is read through a [`SchemaCatalog`] and graph data through
//! a [`GraphDataProvider`]; [`MemoryCatalog`] and [`InMemoryGraph`] implement
//! both for JSON datasets.

// Public modules - exposed to external users
pub mod coordinator;

// Internal modules - only visible within hopgraph crate
pub(crate) mod ast;
pub(crate) mod catalog;
pub(crate) mod exec;
pub(crate) mod plan;
pub(crate) mod storage;
pub(crate) mod types;

// Re-export the public API - QueryCoordinator is the main entry point
pub use coordinator::{ErrorKind, QueryCoordinator, QueryError, QueryInfo};

pub use ast::ParserError;
pub use catalog::{CatalogError, MemoryCatalog, SchemaCatalog};
pub use exec::{
    CancellationToken, EngineConfig, ExecutionError, ExpressionEvaluator, QueryResult,
    RegexCache, ResultTable, Row, RowScope,
};
pub use plan::{QueryPlan, SemanticError};
pub use storage::{
    Dataset, Edge, EdgeDirection, GraphDataProvider, InMemoryGraph, PathValue, StorageError, Value,
    Vertex, VertexId,
};
pub use types::ColumnType;

/// HopGraph version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// HopGraph crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
