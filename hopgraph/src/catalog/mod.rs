// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema catalog
//!
//! Read-only metadata about tags, edge types and properties, consulted by
//! the validator before any data is read.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{CatalogError, CatalogResult};
pub use memory::{MemoryCatalog, PropertyDefinition, SchemaDefinition};
pub use traits::SchemaCatalog;
