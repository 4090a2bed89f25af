//! Seeded random graphs mirrored into petgraph
//!
//! Vertices are integers `0..n` carrying a `node(weight int)` tag; edges are
//! `e(w int)` without parallel edges or self-loops, so petgraph's algorithms
//! can serve as an independent reference.

use hopgraph::{
    ColumnType, Edge, EngineConfig, InMemoryGraph, MemoryCatalog, QueryCoordinator, Value, Vertex,
    VertexId,
};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

pub struct RandomGraph {
    pub vertex_count: usize,
    pub edges: Vec<(usize, usize, i64)>,
    pub reference: DiGraph<usize, i64>,
}

impl RandomGraph {
    /// Random graph with `vertex_count` vertices and up to `edge_count` distinct edges
    pub fn generate(seed: u64, vertex_count: usize, edge_count: usize) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for _ in 0..edge_count {
            let src = rng.usize(..vertex_count);
            let dst = rng.usize(..vertex_count);
            if src == dst || !seen.insert((src, dst)) {
                continue;
            }
            edges.push((src, dst, rng.i64(0..100)));
        }

        let mut reference = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..vertex_count).map(|i| reference.add_node(i)).collect();
        for &(src, dst, w) in &edges {
            reference.add_edge(nodes[src], nodes[dst], w);
        }

        Self {
            vertex_count,
            edges,
            reference,
        }
    }

    pub fn node(&self, vertex: usize) -> NodeIndex {
        NodeIndex::new(vertex)
    }

    pub fn coordinator(&self, config: EngineConfig) -> QueryCoordinator {
        let catalog = MemoryCatalog::new(ColumnType::Int)
            .with_tag("node", &[("weight", ColumnType::Int)])
            .and_then(|c| c.with_edge_type("e", &[("w", ColumnType::Int)]))
            .expect("valid schema");

        let mut graph = InMemoryGraph::new();
        for i in 0..self.vertex_count {
            let mut props = BTreeMap::new();
            props.insert("weight".to_string(), Value::Int(i as i64));
            graph
                .add_vertex(Vertex::new(VertexId::Int(i as i64)).with_tag("node", props))
                .expect("distinct vertex");
        }
        for &(src, dst, w) in &self.edges {
            graph
                .add_edge(
                    Edge::new("e", VertexId::Int(src as i64), VertexId::Int(dst as i64))
                        .with_property("w", w),
                )
                .expect("distinct edge");
        }

        QueryCoordinator::new(Arc::new(catalog), Arc::new(graph), config).expect("valid config")
    }

    /// Vertices at the end of some walk of exactly `steps` edges from `start`
    pub fn walk_targets(&self, start: usize, steps: u32, min_weight: Option<i64>) -> BTreeSet<usize> {
        let mut frontier: BTreeSet<usize> = BTreeSet::from([start]);
        for _ in 0..steps {
            let mut next = BTreeSet::new();
            for &vertex in &frontier {
                for edge in self
                    .reference
                    .edges_directed(self.node(vertex), Direction::Outgoing)
                {
                    if min_weight.map_or(true, |min| *edge.weight() >= min) {
                        next.insert(self.reference[edge.target()]);
                    }
                }
            }
            frontier = next;
        }
        frontier
    }

    /// Unweighted hop distance from `from` to `to`
    pub fn hop_distance(&self, from: usize, to: usize) -> Option<usize> {
        petgraph::algo::dijkstra(&self.reference, self.node(from), Some(self.node(to)), |_| 1usize)
            .get(&self.node(to))
            .copied()
    }

    /// Number of simple paths from `from` to `to` with at most `max_hops` edges
    pub fn simple_path_count(&self, from: usize, to: usize, max_hops: usize) -> usize {
        if from == to || max_hops == 0 {
            return 0;
        }
        petgraph::algo::all_simple_paths::<Vec<NodeIndex>, _>(
            &self.reference,
            self.node(from),
            self.node(to),
            0,
            Some(max_hops - 1),
        )
        .count()
    }
}
