// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory schema catalog
//!
//! A [`MemoryCatalog`] holds tag and edge type definitions in declaration
//! order. It can be assembled with the builder methods or deserialized from
//! the `schema` section of a JSON dataset.

use super::error::{CatalogError, CatalogResult};
use super::traits::SchemaCatalog;
use crate::types::ColumnType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A declared property of a tag or edge type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: ColumnType,
}

/// A tag or edge type with its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl SchemaDefinition {
    fn property_type(&self, property: &str) -> Option<ColumnType> {
        self.properties
            .iter()
            .find(|p| p.name == property)
            .map(|p| p.data_type)
    }
}

fn default_vid_type() -> ColumnType {
    ColumnType::String
}

/// Schema catalog backed by plain vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCatalog {
    #[serde(default = "default_vid_type")]
    vid_type: ColumnType,
    #[serde(default)]
    tags: Vec<SchemaDefinition>,
    #[serde(default)]
    edge_types: Vec<SchemaDefinition>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new(ColumnType::String)
    }
}

impl MemoryCatalog {
    /// Create an empty catalog with the given vertex id type
    pub fn new(vid_type: ColumnType) -> Self {
        Self {
            vid_type,
            tags: Vec::new(),
            edge_types: Vec::new(),
        }
    }

    /// Declare a tag
    pub fn with_tag(mut self, name: &str, properties: &[(&str, ColumnType)]) -> CatalogResult<Self> {
        self.add_tag(definition(name, properties))?;
        Ok(self)
    }

    /// Declare an edge type
    pub fn with_edge_type(
        mut self,
        name: &str,
        properties: &[(&str, ColumnType)],
    ) -> CatalogResult<Self> {
        self.add_edge_type(definition(name, properties))?;
        Ok(self)
    }

    pub fn add_tag(&mut self, tag: SchemaDefinition) -> CatalogResult<()> {
        check_definition(&tag)?;
        if self.has_tag(&tag.name) {
            return Err(CatalogError::DuplicateEntry(format!("tag `{}'", tag.name)));
        }
        self.tags.push(tag);
        Ok(())
    }

    pub fn add_edge_type(&mut self, edge_type: SchemaDefinition) -> CatalogResult<()> {
        check_definition(&edge_type)?;
        if self.has_edge_type(&edge_type.name) {
            return Err(CatalogError::DuplicateEntry(format!(
                "edge type `{}'",
                edge_type.name
            )));
        }
        self.edge_types.push(edge_type);
        Ok(())
    }

    /// Check a deserialized catalog for duplicates and invalid ids
    pub fn validate(&self) -> CatalogResult<()> {
        if !self.vid_type.is_vid_type() {
            return Err(CatalogError::InvalidDefinition(format!(
                "vid type must be int or string, got {}",
                self.vid_type
            )));
        }
        let mut names = HashSet::new();
        for tag in &self.tags {
            check_definition(tag)?;
            if !names.insert(tag.name.as_str()) {
                return Err(CatalogError::DuplicateEntry(format!("tag `{}'", tag.name)));
            }
        }
        let mut names = HashSet::new();
        for edge in &self.edge_types {
            check_definition(edge)?;
            if !names.insert(edge.name.as_str()) {
                return Err(CatalogError::DuplicateEntry(format!(
                    "edge type `{}'",
                    edge.name
                )));
            }
        }
        Ok(())
    }

    pub fn tag(&self, name: &str) -> Option<&SchemaDefinition> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn edge_type(&self, name: &str) -> Option<&SchemaDefinition> {
        self.edge_types.iter().find(|e| e.name == name)
    }
}

fn definition(name: &str, properties: &[(&str, ColumnType)]) -> SchemaDefinition {
    SchemaDefinition {
        name: name.to_string(),
        properties: properties
            .iter()
            .map(|(prop, data_type)| PropertyDefinition {
                name: prop.to_string(),
                data_type: *data_type,
            })
            .collect(),
    }
}

fn check_definition(def: &SchemaDefinition) -> CatalogResult<()> {
    if def.name.is_empty() {
        return Err(CatalogError::InvalidDefinition("empty name".to_string()));
    }
    let mut seen = HashSet::new();
    for prop in &def.properties {
        if prop.name.starts_with('_') {
            return Err(CatalogError::InvalidDefinition(format!(
                "property `{}' of `{}' uses the reserved `_' prefix",
                prop.name, def.name
            )));
        }
        if !seen.insert(prop.name.as_str()) {
            return Err(CatalogError::DuplicateEntry(format!(
                "property `{}' of `{}'",
                prop.name, def.name
            )));
        }
    }
    Ok(())
}

impl SchemaCatalog for MemoryCatalog {
    fn vid_type(&self) -> ColumnType {
        self.vid_type
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tag(tag).is_some()
    }

    fn has_edge_type(&self, edge_type: &str) -> bool {
        self.edge_type(edge_type).is_some()
    }

    fn tag_property_type(&self, tag: &str, property: &str) -> CatalogResult<ColumnType> {
        let def = self
            .tag(tag)
            .ok_or_else(|| CatalogError::TagNotFound(tag.to_string()))?;
        def.property_type(property)
            .ok_or_else(|| CatalogError::PropertyNotFound {
                owner: tag.to_string(),
                property: property.to_string(),
            })
    }

    fn edge_property_type(&self, edge_type: &str, property: &str) -> CatalogResult<ColumnType> {
        let def = self
            .edge_type(edge_type)
            .ok_or_else(|| CatalogError::EdgeTypeNotFound(edge_type.to_string()))?;
        def.property_type(property)
            .ok_or_else(|| CatalogError::PropertyNotFound {
                owner: edge_type.to_string(),
                property: property.to_string(),
            })
    }

    fn edge_type_names(&self) -> Vec<String> {
        self.edge_types.iter().map(|e| e.name.clone()).collect()
    }

    fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}
