// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph data provider interface
//!
//! The engine never owns graph data. Every traversal goes through a
//! [`GraphDataProvider`], which is read-only and synchronous from the
//! engine's point of view.

use crate::storage::types::{Edge, StorageError, Vertex, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Traversal direction relative to the stored edge direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// Follow stored edges from source to destination
    Forward,
    /// Follow stored edges from destination back to source (REVERSELY)
    Reverse,
    /// Both of the above (BIDIRECT)
    Both,
}

impl EdgeDirection {
    /// Direction used when searching backwards from path targets
    pub fn reversed(self) -> Self {
        match self {
            EdgeDirection::Forward => EdgeDirection::Reverse,
            EdgeDirection::Reverse => EdgeDirection::Forward,
            EdgeDirection::Both => EdgeDirection::Both,
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDirection::Forward => write!(f, "FORWARD"),
            EdgeDirection::Reverse => write!(f, "REVERSELY"),
            EdgeDirection::Both => write!(f, "BIDIRECT"),
        }
    }
}

/// Read-only access to graph topology and vertex properties
pub trait GraphDataProvider: Send + Sync {
    /// Stored edges incident to `vertex` that can be traversed in `direction`,
    /// restricted to `edge_types`.
    ///
    /// Edges are returned as stored: for reverse traversal the vertex reached
    /// is the edge's `src`. With [`EdgeDirection::Both`] a self-loop is
    /// returned once. An unknown vertex yields an empty list.
    fn get_neighbors(
        &self,
        vertex: &VertexId,
        edge_types: &[String],
        direction: EdgeDirection,
    ) -> Result<Vec<Edge>, StorageError>;

    /// Vertices for the given ids; ids without a stored vertex are omitted
    fn get_vertices(&self, ids: &[VertexId]) -> Result<Vec<Vertex>, StorageError>;
}

impl<P: GraphDataProvider + ?Sized> GraphDataProvider for Arc<P> {
    fn get_neighbors(
        &self,
        vertex: &VertexId,
        edge_types: &[String],
        direction: EdgeDirection,
    ) -> Result<Vec<Edge>, StorageError> {
        (**self).get_neighbors(vertex, edge_types, direction)
    }

    fn get_vertices(&self, ids: &[VertexId]) -> Result<Vec<Vertex>, StorageError> {
        (**self).get_vertices(ids)
    }
}
