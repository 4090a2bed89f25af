// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value type system for graph properties and query results
//!
//! Every cell of a result table, every property and every intermediate
//! expression result is a [`Value`]:
//! - Scalars: Null, Bool, Int, Double, String
//! - Collections: List
//! - Graph values: Path, Vertex, Edge

use crate::storage::types::{Edge, Vertex, VertexId};
use crate::types::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One hop of a path: the edge taken and the vertex it reaches
///
/// `reversed` is set when the hop walks the stored edge from its destination
/// to its source, as REVERSELY and BIDIRECT searches do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathStep {
    pub edge_type: String,
    pub rank: i64,
    pub dst: VertexId,
    #[serde(default)]
    pub reversed: bool,
}

/// Path value: a start vertex followed by zero or more hops
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathValue {
    pub src: VertexId,
    pub steps: Vec<PathStep>,
}

impl PathValue {
    /// Create a zero-length path rooted at `src`
    pub fn new(src: VertexId) -> Self {
        Self {
            src,
            steps: Vec::new(),
        }
    }

    /// Append a hop along a stored edge's own direction
    pub fn push(&mut self, edge_type: impl Into<String>, rank: i64, dst: VertexId) {
        self.steps.push(PathStep {
            edge_type: edge_type.into(),
            rank,
            dst,
            reversed: false,
        });
    }

    /// Append a hop over `edge` leaving the current end of the path
    pub fn push_edge(&mut self, edge: &Edge) {
        let from = self.end().clone();
        self.steps.push(PathStep {
            edge_type: edge.edge_type.clone(),
            rank: edge.rank,
            dst: edge.other_end(&from).clone(),
            reversed: edge.src != from,
        });
    }

    /// Number of hops
    pub fn length(&self) -> usize {
        self.steps.len()
    }

    /// Last vertex of the path
    pub fn end(&self) -> &VertexId {
        self.steps.last().map(|s| &s.dst).unwrap_or(&self.src)
    }

    /// All vertices in path order
    pub fn vertices(&self) -> Vec<&VertexId> {
        std::iter::once(&self.src)
            .chain(self.steps.iter().map(|s| &s.dst))
            .collect()
    }

    pub fn contains_vertex(&self, id: &VertexId) -> bool {
        &self.src == id || self.steps.iter().any(|s| &s.dst == id)
    }

    /// True when no vertex appears twice
    pub fn is_simple(&self) -> bool {
        let vertices = self.vertices();
        let mut seen = std::collections::HashSet::with_capacity(vertices.len());
        vertices.into_iter().all(|v| seen.insert(v))
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.src)?;
        for step in &self.steps {
            let sign = if step.reversed { "-" } else { "" };
            write!(f, "<{}{},{}>{}", sign, step.edge_type, step.rank, step.dst)?;
        }
        Ok(())
    }
}

/// Value types for properties, expressions and result cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<Value>),
    Path(PathValue),
    Vertex(Vertex),
    Edge(Edge),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of Int and Double values
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathValue> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Interpret this value as a vertex id (strings and integers only)
    pub fn to_vertex_id(&self) -> Option<VertexId> {
        match self {
            Value::String(s) => Some(VertexId::String(s.clone())),
            Value::Int(i) => Some(VertexId::Int(*i)),
            _ => None,
        }
    }

    /// Render without the quoting used by `Display`, used for string coercion
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Runtime column type of this value
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Null => ColumnType::Any,
            Value::Bool(_) => ColumnType::Bool,
            Value::Int(_) => ColumnType::Int,
            Value::Double(_) => ColumnType::Double,
            Value::String(_) => ColumnType::String,
            Value::List(_) => ColumnType::List,
            Value::Path(_) => ColumnType::Path,
            Value::Vertex(_) => ColumnType::Vertex,
            Value::Edge(_) => ColumnType::Edge,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Path(_) => "Path",
            Value::Vertex(_) => "Vertex",
            Value::Edge(_) => "Edge",
        }
    }
}

/// Canonical bit pattern so that equal doubles hash equally (0.0 == -0.0, one NaN)
fn canonical_bits(d: f64) -> u64 {
    if d.is_nan() {
        f64::NAN.to_bits()
    } else if d == 0.0 {
        0.0f64.to_bits()
    } else {
        d.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Vertex(a), Value::Vertex(b)) => a == b,
            (Value::Edge(a), Value::Edge(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0.hash(state),
            Value::Bool(b) => {
                1.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                2.hash(state);
                i.hash(state);
            }
            Value::Double(d) => {
                3.hash(state);
                canonical_bits(*d).hash(state);
            }
            Value::String(s) => {
                4.hash(state);
                s.hash(state);
            }
            Value::List(list) => {
                5.hash(state);
                list.len().hash(state);
                for item in list {
                    item.hash(state);
                }
            }
            Value::Path(path) => {
                6.hash(state);
                path.hash(state);
            }
            Value::Vertex(vertex) => {
                7.hash(state);
                vertex.hash(state);
            }
            Value::Edge(edge) => {
                8.hash(state);
                edge.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => {
                if d.fract() == 0.0 && d.is_finite() {
                    write!(f, "{:.1}", d)
                } else {
                    write!(f, "{}", d)
                }
            }
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Path(path) => write!(f, "{}", path),
            Value::Vertex(vertex) => write!(f, "{}", vertex),
            Value::Edge(edge) => write!(f, "{}", edge),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<PathValue> for Value {
    fn from(path: PathValue) -> Self {
        Value::Path(path)
    }
}

impl From<Vertex> for Value {
    fn from(vertex: Vertex) -> Self {
        Value::Vertex(vertex)
    }
}

impl From<Edge> for Value {
    fn from(edge: Edge) -> Self {
        Value::Edge(edge)
    }
}

impl From<VertexId> for Value {
    fn from(id: VertexId) -> Self {
        match id {
            VertexId::Int(i) => Value::Int(i),
            VertexId::String(s) => Value::String(s),
        }
    }
}
