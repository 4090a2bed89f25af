// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! One hop of neighbor expansion
//!
//! Provider calls for a frontier run on the rayon pool once the frontier is
//! large enough; results are gathered in frontier order so output stays
//! deterministic regardless of scheduling.

use log::debug;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::config::EngineConfig;
use super::error::ExecutionError;
use crate::storage::{Edge, EdgeDirection, GraphDataProvider, Vertex, VertexId};

/// One traversed edge of one hop
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionRecord {
    /// Vertex the hop started from
    pub source: VertexId,
    pub edge: Edge,
    /// Vertex the hop reached, the far end relative to `source`
    pub destination: VertexId,
}

/// Filter applied to every record of a hop before it feeds the next frontier
pub trait StepPredicate: Sync {
    /// Called once per hop with all candidate records
    fn prepare(&self, _records: &[ExpansionRecord]) -> Result<(), ExecutionError> {
        Ok(())
    }

    fn accept(&self, record: &ExpansionRecord) -> Result<bool, ExecutionError>;
}

/// Vertex properties fetched during one query, shared by all its hops
pub struct VertexCache {
    provider: Arc<dyn GraphDataProvider>,
    vertices: RwLock<HashMap<VertexId, Option<Vertex>>>,
}

impl VertexCache {
    pub fn new(provider: Arc<dyn GraphDataProvider>) -> Self {
        Self {
            provider,
            vertices: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch every id not yet cached in a single provider call
    pub fn fetch<'a>(&self, ids: impl IntoIterator<Item = &'a VertexId>) -> Result<(), ExecutionError> {
        let missing: Vec<VertexId> = {
            let cached = self.vertices.read();
            let mut missing: Vec<VertexId> = Vec::new();
            for id in ids {
                if !cached.contains_key(id) && !missing.contains(id) {
                    missing.push(id.clone());
                }
            }
            missing
        };
        if missing.is_empty() {
            return Ok(());
        }

        let found = self.provider.get_vertices(&missing)?;
        let mut cached = self.vertices.write();
        for id in missing {
            cached.entry(id).or_insert(None);
        }
        for vertex in found {
            cached.insert(vertex.id.clone(), Some(vertex));
        }
        Ok(())
    }

    /// Cached vertex, `None` when unknown to the provider or never fetched
    pub fn get(&self, id: &VertexId) -> Option<Vertex> {
        self.vertices.read().get(id).cloned().flatten()
    }

    pub fn exists(&self, id: &VertexId) -> bool {
        matches!(self.vertices.read().get(id), Some(Some(_)))
    }
}

/// Expands one hop from a set of source vertices
pub struct FrontierExpander {
    provider: Arc<dyn GraphDataProvider>,
    parallel: bool,
    parallel_threshold: usize,
}

impl FrontierExpander {
    pub fn new(provider: Arc<dyn GraphDataProvider>, config: &EngineConfig) -> Self {
        Self {
            provider,
            parallel: config.parallel_expansion,
            parallel_threshold: config.parallel_threshold.max(1),
        }
    }

    /// Neighbors of every source, grouped per source in input order
    ///
    /// Under [`EdgeDirection::Both`] an edge appears once per source even when
    /// the provider reports a self-loop from both ends.
    pub fn neighbors(
        &self,
        sources: &[VertexId],
        edge_types: &[String],
        direction: EdgeDirection,
    ) -> Result<Vec<(VertexId, Vec<Edge>)>, ExecutionError> {
        if sources.is_empty() || edge_types.is_empty() {
            return Ok(Vec::new());
        }

        let fetch = |id: &VertexId| -> Result<(VertexId, Vec<Edge>), ExecutionError> {
            let mut edges = self.provider.get_neighbors(id, edge_types, direction)?;
            if direction == EdgeDirection::Both {
                let mut seen = HashSet::new();
                edges.retain(|edge| seen.insert(edge.key()));
            }
            Ok((id.clone(), edges))
        };

        if self.parallel && sources.len() >= self.parallel_threshold {
            debug!("Expanding {} vertices in parallel", sources.len());
            sources.par_iter().map(fetch).collect()
        } else {
            sources.iter().map(fetch).collect()
        }
    }

    /// One hop: every edge of the requested types leaving each source in `direction`
    ///
    /// Empty `sources` returns empty without calling the provider; ids the
    /// provider does not know yield no records.
    pub fn expand(
        &self,
        sources: &[VertexId],
        edge_types: &[String],
        direction: EdgeDirection,
        predicate: Option<&dyn StepPredicate>,
    ) -> Result<Vec<ExpansionRecord>, ExecutionError> {
        let records: Vec<ExpansionRecord> = self
            .neighbors(sources, edge_types, direction)?
            .into_iter()
            .flat_map(|(source, edges)| {
                edges.into_iter().map(move |edge| {
                    let destination = edge.other_end(&source).clone();
                    ExpansionRecord {
                        source: source.clone(),
                        edge,
                        destination,
                    }
                })
            })
            .collect();

        let Some(predicate) = predicate else {
            return Ok(records);
        };

        predicate.prepare(&records)?;
        let mut accepted = Vec::with_capacity(records.len());
        for record in records {
            if predicate.accept(&record)? {
                accepted.push(record);
            }
        }
        Ok(accepted)
    }
}
