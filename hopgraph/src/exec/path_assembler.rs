// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Path search for FIND SHORTEST PATH and FIND ALL PATH
//!
//! SHORTEST runs a bidirectional breadth-first search from the whole source
//! set and the whole target set at once, one hop per side in turn. Visited
//! sets are kept per `(origin, vertex)`, so searches from different origins
//! never block each other. The first meeting for a pair gives its minimum
//! hop count; later meetings of equal length are ignored.
//!
//! ALL enumerates simple paths forward from the sources, hop by hop.

use log::debug;
use std::collections::{HashMap, HashSet};

use super::context::ExecutionContext;
use super::error::ExecutionError;
use super::expander::FrontierExpander;
use crate::ast::PathMode;
use crate::storage::{Edge, EdgeDirection, PathValue, VertexId};

/// Parameters of one path search
#[derive(Debug, Clone)]
pub struct PathRequest<'r> {
    pub sources: &'r [VertexId],
    pub targets: &'r [VertexId],
    pub edge_types: &'r [String],
    pub direction: EdgeDirection,
    pub max_steps: u32,
    pub mode: PathMode,
    /// Whether FIND ALL emits a zero-length path when a source is a target
    pub include_zero_length: bool,
}

pub struct PathAssembler<'a> {
    expander: &'a FrontierExpander,
    context: &'a ExecutionContext,
}

type Parent = Option<(VertexId, Edge)>;

/// One side of the bidirectional search
struct SearchSide {
    direction: EdgeDirection,
    /// `(origin, vertex)` to the vertex and edge it was reached from
    parents: HashMap<(VertexId, VertexId), Parent>,
    /// Origins that have visited each vertex, in visit order
    reached: HashMap<VertexId, Vec<VertexId>>,
    /// Vertices visited on the last hop with the origins that reached them
    frontier: Vec<(VertexId, Vec<VertexId>)>,
    depth: u32,
}

impl SearchSide {
    fn new(origins: &[VertexId], direction: EdgeDirection) -> Self {
        let mut side = SearchSide {
            direction,
            parents: HashMap::new(),
            reached: HashMap::new(),
            frontier: Vec::new(),
            depth: 0,
        };
        for origin in origins {
            side.parents.insert((origin.clone(), origin.clone()), None);
            side.reached
                .entry(origin.clone())
                .or_default()
                .push(origin.clone());
            side.frontier.push((origin.clone(), vec![origin.clone()]));
        }
        side
    }

    /// Expand one hop; returns the newly visited `(origin, vertex)` pairs
    fn expand(
        &mut self,
        expander: &FrontierExpander,
        edge_types: &[String],
    ) -> Result<Vec<(VertexId, VertexId)>, ExecutionError> {
        let vertices: Vec<VertexId> = self.frontier.iter().map(|(v, _)| v.clone()).collect();
        let neighbors = expander.neighbors(&vertices, edge_types, self.direction)?;
        let origins_at: HashMap<VertexId, Vec<VertexId>> = std::mem::take(&mut self.frontier)
            .into_iter()
            .collect();

        let mut next_order: Vec<VertexId> = Vec::new();
        let mut next: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
        let mut visited = Vec::new();

        for (vertex, edges) in neighbors {
            let Some(origins) = origins_at.get(&vertex) else {
                continue;
            };
            for edge in edges {
                let reached = edge.other_end(&vertex).clone();
                for origin in origins {
                    let key = (origin.clone(), reached.clone());
                    if self.parents.contains_key(&key) {
                        continue;
                    }
                    self.parents.insert(key, Some((vertex.clone(), edge.clone())));
                    self.reached
                        .entry(reached.clone())
                        .or_default()
                        .push(origin.clone());
                    next.entry(reached.clone())
                        .or_insert_with(|| {
                            next_order.push(reached.clone());
                            Vec::new()
                        })
                        .push(origin.clone());
                    visited.push((origin.clone(), reached.clone()));
                }
            }
        }

        self.frontier = next_order
            .into_iter()
            .filter_map(|v| next.remove(&v).map(|origins| (v, origins)))
            .collect();
        self.depth += 1;
        Ok(visited)
    }

    /// Edges from `origin` to `vertex`, ordered from `origin` outward
    fn chain(&self, origin: &VertexId, vertex: &VertexId) -> Vec<Edge> {
        let mut chain = Vec::new();
        let mut current = vertex.clone();
        while let Some(Some((previous, edge))) = self.parents.get(&(origin.clone(), current.clone())) {
            chain.push(edge.clone());
            current = previous.clone();
        }
        chain.reverse();
        chain
    }
}

impl<'a> PathAssembler<'a> {
    pub fn new(expander: &'a FrontierExpander, context: &'a ExecutionContext) -> Self {
        Self { expander, context }
    }

    pub fn find_paths(&self, request: &PathRequest<'_>) -> Result<Vec<PathValue>, ExecutionError> {
        let sources = distinct(request.sources);
        let targets = distinct(request.targets);
        if sources.is_empty() || targets.is_empty() {
            return Ok(Vec::new());
        }

        let paths = match request.mode {
            PathMode::Shortest => self.shortest(&sources, &targets, request)?,
            PathMode::All => self.all(&sources, &targets, request)?,
        };
        debug!(
            "[{}] {} path search: {} sources, {} targets, {} paths",
            self.context.query_id,
            request.mode,
            sources.len(),
            targets.len(),
            paths.len()
        );
        Ok(paths)
    }

    fn shortest(
        &self,
        sources: &[VertexId],
        targets: &[VertexId],
        request: &PathRequest<'_>,
    ) -> Result<Vec<PathValue>, ExecutionError> {
        let target_set: HashSet<&VertexId> = targets.iter().collect();
        let pair_count = sources.len() * targets.len();

        let mut forward = SearchSide::new(sources, request.direction);
        let mut backward = SearchSide::new(targets, request.direction.reversed());
        // (source, target) -> meeting vertex
        let mut meetings: HashMap<(VertexId, VertexId), VertexId> = HashMap::new();

        for source in sources {
            if target_set.contains(source) {
                meetings.insert((source.clone(), source.clone()), source.clone());
            }
        }

        while meetings.len() < pair_count && forward.depth + backward.depth < request.max_steps {
            let expand_forward = if forward.frontier.is_empty() && backward.frontier.is_empty() {
                break;
            } else if forward.frontier.is_empty() {
                false
            } else if backward.frontier.is_empty() {
                true
            } else {
                forward.depth <= backward.depth
            };

            self.context.check_cancelled()?;

            if expand_forward {
                let visited = forward.expand(self.expander, request.edge_types)?;
                for (source, vertex) in visited {
                    for target in backward.reached.get(&vertex).into_iter().flatten() {
                        meetings
                            .entry((source.clone(), target.clone()))
                            .or_insert_with(|| vertex.clone());
                    }
                }
            } else {
                let visited = backward.expand(self.expander, request.edge_types)?;
                for (target, vertex) in visited {
                    for source in forward.reached.get(&vertex).into_iter().flatten() {
                        meetings
                            .entry((source.clone(), target.clone()))
                            .or_insert_with(|| vertex.clone());
                    }
                }
            }
        }

        let mut paths = Vec::new();
        for source in sources {
            for target in targets {
                let Some(meeting) = meetings.get(&(source.clone(), target.clone())) else {
                    continue;
                };
                let mut path = PathValue::new(source.clone());
                for edge in forward.chain(source, meeting) {
                    path.push_edge(&edge);
                }
                // backward chain runs target -> meeting; walk it the other way
                for edge in backward.chain(target, meeting).into_iter().rev() {
                    path.push_edge(&edge);
                }
                paths.push(path);
            }
        }
        Ok(paths)
    }

    fn all(
        &self,
        sources: &[VertexId],
        targets: &[VertexId],
        request: &PathRequest<'_>,
    ) -> Result<Vec<PathValue>, ExecutionError> {
        let target_set: HashSet<&VertexId> = targets.iter().collect();
        let mut paths = Vec::new();
        let mut partial: Vec<PathValue> = Vec::new();

        for source in sources {
            let path = PathValue::new(source.clone());
            if request.include_zero_length && target_set.contains(source) {
                paths.push(path.clone());
            }
            partial.push(path);
        }

        let mut adjacency: HashMap<VertexId, Vec<Edge>> = HashMap::new();
        for _ in 0..request.max_steps {
            if partial.is_empty() {
                break;
            }
            self.context.check_cancelled()?;

            let mut unexpanded: Vec<VertexId> = Vec::new();
            for path in &partial {
                let end = path.end();
                if !adjacency.contains_key(end) && !unexpanded.contains(end) {
                    unexpanded.push(end.clone());
                }
            }
            for (vertex, edges) in
                self.expander
                    .neighbors(&unexpanded, request.edge_types, request.direction)?
            {
                adjacency.insert(vertex, edges);
            }

            let mut extended = Vec::new();
            for path in &partial {
                let end = path.end();
                for edge in adjacency.get(end).into_iter().flatten() {
                    let reached = edge.other_end(end);
                    if path.contains_vertex(reached) {
                        continue;
                    }
                    let mut next = path.clone();
                    next.push_edge(edge);
                    if target_set.contains(reached) {
                        paths.push(next.clone());
                    }
                    extended.push(next);
                }
            }
            partial = extended;
        }

        Ok(paths)
    }
}

fn distinct(ids: &[VertexId]) -> Vec<VertexId> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(*id)).cloned().collect()
}
