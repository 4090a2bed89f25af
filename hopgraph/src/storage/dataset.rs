// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! JSON graph datasets
//!
//! A dataset bundles a schema with vertices and edges:
//!
//! ```json
//! {
//!   "schema": {
//!     "vid_type": "string",
//!     "tags": [{"name": "player", "properties": [{"name": "age", "type": "int"}]}],
//!     "edge_types": [{"name": "like", "properties": [{"name": "likeness", "type": "int"}]}]
//!   },
//!   "vertices": [{"id": "Tim Duncan", "tags": {"player": {"age": 42}}}],
//!   "edges": [{"type": "like", "src": "Tim Duncan", "dst": "Tony Parker", "props": {"likeness": 95}}]
//! }
//! ```
//!
//! Loading type-checks every property against the schema and produces a
//! [`MemoryCatalog`] plus an [`InMemoryGraph`].

use crate::catalog::{MemoryCatalog, SchemaCatalog, SchemaDefinition};
use crate::storage::graph_cache::InMemoryGraph;
use crate::storage::types::{Edge, GraphError, StorageError, Vertex, VertexId};
use crate::storage::value::Value;
use crate::types::ColumnType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: VertexId,
    #[serde(default)]
    pub tags: BTreeMap<String, Map<String, JsonValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "type")]
    pub edge_type: String,
    pub src: VertexId,
    pub dst: VertexId,
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub props: Map<String, JsonValue>,
}

/// Schema plus graph data, as stored in a dataset file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: MemoryCatalog,
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        serde_json::from_str(json).map_err(|e| StorageError::Dataset(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StorageError::Dataset(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Validate the records against the schema and build the in-memory graph
    pub fn build(self) -> Result<(MemoryCatalog, InMemoryGraph), StorageError> {
        self.schema
            .validate()
            .map_err(|e| StorageError::Dataset(e.to_string()))?;

        let vid_type = self.schema.vid_type();
        let mut graph = InMemoryGraph::new();

        for record in self.vertices {
            check_vid(&record.id, vid_type)?;
            let mut vertex = Vertex::new(record.id);
            for (tag, props) in record.tags {
                let def = self
                    .schema
                    .tag(&tag)
                    .ok_or_else(|| GraphError::UnknownTag(tag.clone()))?;
                let values = convert_properties(def, props)?;
                vertex.tags.insert(tag, values);
            }
            graph.add_vertex(vertex)?;
        }

        for record in self.edges {
            check_vid(&record.src, vid_type)?;
            check_vid(&record.dst, vid_type)?;
            let def = self
                .schema
                .edge_type(&record.edge_type)
                .ok_or_else(|| GraphError::UnknownEdgeType(record.edge_type.clone()))?;
            let properties = convert_properties(def, record.props)?;
            let mut edge = Edge::new(record.edge_type, record.src, record.dst).with_rank(record.rank);
            edge.properties = properties;
            graph.add_edge(edge)?;
        }

        log::debug!(
            "Loaded dataset with {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        Ok((self.schema, graph))
    }
}

fn check_vid(id: &VertexId, vid_type: ColumnType) -> Result<(), StorageError> {
    let matches = match id {
        VertexId::Int(_) => vid_type == ColumnType::Int,
        VertexId::String(_) => vid_type == ColumnType::String,
    };
    if matches {
        Ok(())
    } else {
        Err(StorageError::Dataset(format!(
            "vertex id {} does not match vid type {}",
            id, vid_type
        )))
    }
}

/// Convert JSON properties to typed values; declared but missing properties become null
fn convert_properties(
    def: &SchemaDefinition,
    mut props: Map<String, JsonValue>,
) -> Result<BTreeMap<String, Value>, GraphError> {
    let mut values = BTreeMap::new();
    for prop in &def.properties {
        let json = props.remove(&prop.name).unwrap_or(JsonValue::Null);
        let value = convert_value(&json, prop.data_type).ok_or_else(|| {
            GraphError::PropertyError(format!(
                "{}.{}: expected {}, got {}",
                def.name, prop.name, prop.data_type, json
            ))
        })?;
        values.insert(prop.name.clone(), value);
    }
    if let Some(extra) = props.keys().next() {
        return Err(GraphError::PropertyError(format!(
            "{}.{} is not declared",
            def.name, extra
        )));
    }
    Ok(values)
}

fn convert_value(json: &JsonValue, data_type: ColumnType) -> Option<Value> {
    match (json, data_type) {
        (JsonValue::Null, _) => Some(Value::Null),
        (JsonValue::Bool(b), ColumnType::Bool) => Some(Value::Bool(*b)),
        (JsonValue::Number(n), ColumnType::Int) => n.as_i64().map(Value::Int),
        (JsonValue::Number(n), ColumnType::Double) => n.as_f64().map(Value::Double),
        (JsonValue::String(s), ColumnType::String) => Some(Value::String(s.clone())),
        (JsonValue::Array(items), ColumnType::List) => items
            .iter()
            .map(|item| convert_value(item, untyped(item)))
            .collect::<Option<Vec<_>>>()
            .map(Value::List),
        _ => None,
    }
}

fn untyped(json: &JsonValue) -> ColumnType {
    match json {
        JsonValue::Bool(_) => ColumnType::Bool,
        JsonValue::Number(n) if n.is_i64() => ColumnType::Int,
        JsonValue::Number(_) => ColumnType::Double,
        JsonValue::String(_) => ColumnType::String,
        JsonValue::Array(_) => ColumnType::List,
        _ => ColumnType::Any,
    }
}
