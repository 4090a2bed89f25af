// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory graph implementation
//!
//! Provides vertex and edge storage using HashMaps keyed by identity, with
//! outgoing and incoming adjacency lists for traversal. Adjacency lists keep
//! insertion order so that expansion output is deterministic.

use crate::storage::provider::{EdgeDirection, GraphDataProvider};
use crate::storage::types::{Edge, EdgeKey, GraphError, StorageError, Vertex, VertexId};
use std::collections::{HashMap, HashSet};

/// In-memory graph with adjacency indices, usable as a [`GraphDataProvider`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    /// All vertices indexed by id
    vertices: HashMap<VertexId, Vertex>,

    /// All edges indexed by key
    edges: HashMap<EdgeKey, Edge>,

    /// Adjacency list: vertex id -> outgoing edge keys
    adjacency_out: HashMap<VertexId, Vec<EdgeKey>>,

    /// Adjacency list: vertex id -> incoming edge keys
    adjacency_in: HashMap<VertexId, Vec<EdgeKey>>,
}

impl InMemoryGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex to the graph
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<(), GraphError> {
        if self.vertices.contains_key(&vertex.id) {
            return Err(GraphError::VertexAlreadyExists(vertex.id.to_string()));
        }
        self.vertices.insert(vertex.id.clone(), vertex);
        Ok(())
    }

    /// Add an edge to the graph
    ///
    /// Endpoints are not required to exist as vertices: an edge may point at
    /// an id that carries no tags.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        let key = edge.key();
        if self.edges.contains_key(&key) {
            return Err(GraphError::EdgeAlreadyExists(format!(
                "{} {}->{} @{}",
                key.edge_type, key.src, key.dst, key.rank
            )));
        }

        self.adjacency_out
            .entry(key.src.clone())
            .or_default()
            .push(key.clone());
        self.adjacency_in
            .entry(key.dst.clone())
            .or_default()
            .push(key.clone());

        self.edges.insert(key, edge);
        Ok(())
    }

    /// Get a vertex by id
    pub fn get_vertex(&self, id: &VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// All edges, in no particular order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph is empty (no vertices and no edges)
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    fn collect_edges(
        &self,
        index: &HashMap<VertexId, Vec<EdgeKey>>,
        vertex: &VertexId,
        edge_types: &[String],
        seen: &mut HashSet<EdgeKey>,
        out: &mut Vec<Edge>,
    ) {
        let Some(keys) = index.get(vertex) else {
            return;
        };
        for key in keys {
            if !edge_types.iter().any(|t| t == &key.edge_type) {
                continue;
            }
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some(edge) = self.edges.get(key) {
                out.push(edge.clone());
            }
        }
    }
}

impl GraphDataProvider for InMemoryGraph {
    fn get_neighbors(
        &self,
        vertex: &VertexId,
        edge_types: &[String],
        direction: EdgeDirection,
    ) -> Result<Vec<Edge>, StorageError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        if matches!(direction, EdgeDirection::Forward | EdgeDirection::Both) {
            self.collect_edges(&self.adjacency_out, vertex, edge_types, &mut seen, &mut out);
        }
        if matches!(direction, EdgeDirection::Reverse | EdgeDirection::Both) {
            self.collect_edges(&self.adjacency_in, vertex, edge_types, &mut seen, &mut out);
        }

        Ok(out)
    }

    fn get_vertices(&self, ids: &[VertexId]) -> Result<Vec<Vertex>, StorageError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.vertices.get(id).cloned())
            .collect())
    }
}
