// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query execution engine
//!
//! Runs validated plans against a [`GraphDataProvider`](crate::storage::GraphDataProvider):
//! frontier expansion, multi-step traversal, path search, pipeline binding
//! and set algebra over result tables.

pub mod binding;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod expander;
pub mod expression;
pub mod path_assembler;
pub mod result;
pub mod set_ops;
pub mod step_controller;

// Re-export the main types for convenience
pub use config::EngineConfig;
pub use context::{CancellationToken, ExecutionContext};
pub use error::ExecutionError;
pub use executor::QueryExecutor;
pub use expression::{DefaultEvaluator, ExpressionEvaluator, RegexCache, RowScope};
pub use result::{QueryResult, ResultTable, Row};
