// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution error types

use crate::storage::StorageError;
use crate::types::TypeError;
use thiserror::Error;

/// Errors raised while a validated plan runs
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The graph data provider failed; the query is abandoned, not retried
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Expression evaluation error: {0}")]
    ExpressionError(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("Query {0} was cancelled")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<TypeError> for ExecutionError {
    fn from(error: TypeError) -> Self {
        ExecutionError::TypeError(error.to_string())
    }
}
