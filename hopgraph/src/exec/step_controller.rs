// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Multi-step GO traversal
//!
//! Drives the frontier expander across `[min, max]` hops. Each step's
//! frontier holds distinct vertices; every frontier vertex remembers the
//! origins (roots) that reached it so that results can be joined back to
//! the input rows they came from.

use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::context::ExecutionContext;
use super::error::ExecutionError;
use super::expander::{ExpansionRecord, FrontierExpander, StepPredicate};
use crate::storage::{EdgeDirection, VertexId};

/// An expansion record with the origins it joins back to
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub record: ExpansionRecord,
    /// Origins whose traversal reached `record.source` at this step
    pub roots: Arc<Vec<VertexId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepState {
    Init,
    Expanding(u32),
    Done,
}

/// Frontier under construction: distinct vertices with merged roots
#[derive(Default)]
struct NextFrontier {
    order: Vec<VertexId>,
    roots: HashMap<VertexId, (Vec<VertexId>, HashSet<VertexId>)>,
}

impl NextFrontier {
    fn add(&mut self, vertex: &VertexId, roots: &[VertexId]) {
        let entry = self.roots.entry(vertex.clone()).or_insert_with(|| {
            self.order.push(vertex.clone());
            (Vec::new(), HashSet::new())
        });
        for root in roots {
            if entry.1.insert(root.clone()) {
                entry.0.push(root.clone());
            }
        }
    }

    fn finish(mut self) -> Vec<(VertexId, Arc<Vec<VertexId>>)> {
        self.order
            .into_iter()
            .filter_map(|vertex| {
                let (roots, _) = self.roots.remove(&vertex)?;
                Some((vertex, Arc::new(roots)))
            })
            .collect()
    }
}

pub struct StepController<'a> {
    expander: &'a FrontierExpander,
    context: &'a ExecutionContext,
}

impl<'a> StepController<'a> {
    pub fn new(expander: &'a FrontierExpander, context: &'a ExecutionContext) -> Self {
        Self { expander, context }
    }

    /// Records of every hop in `[min, max]` starting from distinct `origins`
    ///
    /// Hop 0 is never expanded here; zero-hop rows are the caller's concern.
    /// Stops after `max` hops or as soon as a frontier is empty.
    pub fn run(
        &self,
        origins: &[VertexId],
        min: u32,
        max: u32,
        edge_types: &[String],
        direction: EdgeDirection,
        predicate: Option<&dyn StepPredicate>,
    ) -> Result<Vec<StepRecord>, ExecutionError> {
        let mut frontier: Vec<(VertexId, Arc<Vec<VertexId>>)> = origins
            .iter()
            .map(|origin| (origin.clone(), Arc::new(vec![origin.clone()])))
            .collect();
        let mut output = Vec::new();
        let mut state = StepState::Init;

        loop {
            state = match state {
                StepState::Init => {
                    if max == 0 || frontier.is_empty() {
                        StepState::Done
                    } else {
                        StepState::Expanding(1)
                    }
                }
                StepState::Expanding(step) => {
                    self.context.check_cancelled()?;

                    let sources: Vec<VertexId> = frontier.iter().map(|(v, _)| v.clone()).collect();
                    let records = self.expander.expand(&sources, edge_types, direction, predicate)?;
                    debug!(
                        "[{}] step {}: {} frontier vertices, {} records",
                        self.context.query_id,
                        step,
                        sources.len(),
                        records.len()
                    );

                    let roots_of: HashMap<&VertexId, &Arc<Vec<VertexId>>> =
                        frontier.iter().map(|(v, roots)| (v, roots)).collect();
                    let mut next = NextFrontier::default();
                    let mut step_output = Vec::new();

                    for record in records {
                        let roots = match roots_of.get(&record.source) {
                            Some(roots) => Arc::clone(roots),
                            None => continue,
                        };
                        if step < max {
                            next.add(&record.destination, &roots);
                        }
                        if step >= min {
                            step_output.push(StepRecord { record, roots });
                        }
                    }
                    output.extend(step_output);
                    frontier = next.finish();

                    if step >= max || frontier.is_empty() {
                        StepState::Done
                    } else {
                        StepState::Expanding(step + 1)
                    }
                }
                StepState::Done => break,
            };
        }

        Ok(output)
    }
}
