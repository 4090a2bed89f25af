// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for schema catalog lookups

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Edge type not found: {0}")]
    EdgeTypeNotFound(String),

    #[error("Property `{property}' not found in `{owner}'")]
    PropertyNotFound { owner: String, property: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
