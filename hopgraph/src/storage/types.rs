// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph data structures and error types
//!
//! Defines vertex ids, vertices with per-tag properties and typed,
//! ranked edges, along with error types for graph and storage operations.

use crate::storage::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error types for graph operations
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Vertex already exists: {0}")]
    VertexAlreadyExists(String),

    #[error("Edge already exists: {0}")]
    EdgeAlreadyExists(String),

    #[error("Unknown edge type: {0}")]
    UnknownEdgeType(String),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Property error: {0}")]
    PropertyError(String),
}

/// Error types for data provider operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

/// Vertex identifier: a string or an integer, totally ordered
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexId {
    Int(i64),
    String(String),
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexId::Int(i) => write!(f, "{}", i),
            VertexId::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        VertexId::String(s.to_string())
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        VertexId::String(s)
    }
}

impl From<i64> for VertexId {
    fn from(i: i64) -> Self {
        VertexId::Int(i)
    }
}

/// Identity of a stored edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub edge_type: String,
    pub src: VertexId,
    pub rank: i64,
    pub dst: VertexId,
}

/// Graph vertex: an id plus the properties of every tag attached to it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub tags: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Vertex {
    pub fn new(id: VertexId) -> Self {
        Self {
            id,
            tags: BTreeMap::new(),
        }
    }

    /// Attach a tag with its properties, replacing an earlier one of the same name
    pub fn with_tag(mut self, tag: impl Into<String>, props: BTreeMap<String, Value>) -> Self {
        self.tags.insert(tag.into(), props);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Property of one tag; `None` when the tag or property is absent
    pub fn tag_property(&self, tag: &str, prop: &str) -> Option<&Value> {
        self.tags.get(tag).and_then(|props| props.get(prop))
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.id)?;
        for (tag, props) in &self.tags {
            write!(f, " :{}{{", tag)?;
            for (i, (name, value)) in props.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", name, value)?;
            }
            write!(f, "}}")?;
        }
        write!(f, ")")
    }
}

/// Directed, typed, ranked edge with properties
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub edge_type: String,
    pub src: VertexId,
    pub dst: VertexId,
    pub rank: i64,
    pub properties: BTreeMap<String, Value>,
}

impl Edge {
    pub fn new(edge_type: impl Into<String>, src: VertexId, dst: VertexId) -> Self {
        Self {
            edge_type: edge_type.into(),
            src,
            dst,
            rank: 0,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            edge_type: self.edge_type.clone(),
            src: self.src.clone(),
            rank: self.rank,
            dst: self.dst.clone(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Endpoint on the other side of `from`
    pub fn other_end(&self, from: &VertexId) -> &VertexId {
        if &self.src == from {
            &self.dst
        } else {
            &self.src
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[:{} {}->{} @{}",
            self.edge_type, self.src, self.dst, self.rank
        )?;
        if !self.properties.is_empty() {
            write!(f, " {{")?;
            for (i, (name, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", name, value)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id_ordering_and_serde() {
        assert!(VertexId::Int(5) < VertexId::from("a"));
        assert!(VertexId::from("a") < VertexId::from("b"));

        let ids: Vec<VertexId> = serde_json::from_str(r#"[1, "Tim Duncan"]"#).unwrap();
        assert_eq!(ids, vec![VertexId::Int(1), VertexId::from("Tim Duncan")]);
    }

    #[test]
    fn test_edge_other_end() {
        let edge = Edge::new("like", VertexId::from("a"), VertexId::from("b"))
            .with_property("likeness", 90);
        assert_eq!(edge.other_end(&VertexId::from("a")), &VertexId::from("b"));
        assert_eq!(edge.other_end(&VertexId::from("b")), &VertexId::from("a"));
        assert_eq!(edge.property("likeness"), Some(&Value::Int(90)));
        assert_eq!(edge.to_string(), "[:like \"a\"->\"b\" @0 {likeness: 90}]");
    }

    #[test]
    fn test_vertex_tag_property() {
        let mut props = BTreeMap::new();
        props.insert("age".to_string(), Value::Int(42));
        let vertex = Vertex::new(VertexId::from("Tim Duncan")).with_tag("player", props);

        assert!(vertex.has_tag("player"));
        assert_eq!(vertex.tag_property("player", "age"), Some(&Value::Int(42)));
        assert_eq!(vertex.tag_property("team", "name"), None);
        assert_eq!(vertex.to_string(), "(\"Tim Duncan\" :player{age: 42})");
    }
}
