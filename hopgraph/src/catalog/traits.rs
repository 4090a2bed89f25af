// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema catalog trait definition
//!
//! The catalog is read-only metadata about tags, edge types and their
//! properties. It is injected into semantic validation; the engine never
//! defines or alters schema itself.

use super::error::CatalogResult;
use crate::types::ColumnType;

/// Read-only schema metadata consulted during semantic analysis
pub trait SchemaCatalog: Send + Sync {
    /// Type of vertex ids in this graph space (`Int` or `String`)
    fn vid_type(&self) -> ColumnType;

    fn has_tag(&self, tag: &str) -> bool;

    fn has_edge_type(&self, edge_type: &str) -> bool;

    /// Declared type of a tag property
    ///
    /// Fails with `TagNotFound` or `PropertyNotFound`.
    fn tag_property_type(&self, tag: &str, property: &str) -> CatalogResult<ColumnType>;

    /// Declared type of an edge property
    ///
    /// Fails with `EdgeTypeNotFound` or `PropertyNotFound`.
    fn edge_property_type(&self, edge_type: &str, property: &str) -> CatalogResult<ColumnType>;

    /// All edge types in declaration order; this order defines `OVER *`
    fn edge_type_names(&self) -> Vec<String>;

    /// All tags in declaration order
    fn tag_names(&self) -> Vec<String>;
}
