//! Instrumented graph data providers

use hopgraph::{
    CancellationToken, Edge, EdgeDirection, GraphDataProvider, StorageError, Vertex, VertexId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Delegates to an inner provider and counts every call
pub struct CountingProvider<P> {
    inner: P,
    neighbor_calls: AtomicUsize,
    vertex_calls: AtomicUsize,
}

impl<P: GraphDataProvider> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            neighbor_calls: AtomicUsize::new(0),
            vertex_calls: AtomicUsize::new(0),
        }
    }

    pub fn neighbor_calls(&self) -> usize {
        self.neighbor_calls.load(Ordering::SeqCst)
    }

    pub fn vertex_calls(&self) -> usize {
        self.vertex_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.neighbor_calls() + self.vertex_calls()
    }
}

impl<P: GraphDataProvider> GraphDataProvider for CountingProvider<P> {
    fn get_neighbors(
        &self,
        vertex: &VertexId,
        edge_types: &[String],
        direction: EdgeDirection,
    ) -> Result<Vec<Edge>, StorageError> {
        self.neighbor_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_neighbors(vertex, edge_types, direction)
    }

    fn get_vertices(&self, ids: &[VertexId]) -> Result<Vec<Vertex>, StorageError> {
        self.vertex_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_vertices(ids)
    }
}

/// Provider whose every call fails
pub struct FailingProvider;

impl GraphDataProvider for FailingProvider {
    fn get_neighbors(
        &self,
        vertex: &VertexId,
        _edge_types: &[String],
        _direction: EdgeDirection,
    ) -> Result<Vec<Edge>, StorageError> {
        Err(StorageError::Unavailable(format!(
            "neighbors of {} unavailable",
            vertex
        )))
    }

    fn get_vertices(&self, _ids: &[VertexId]) -> Result<Vec<Vertex>, StorageError> {
        Err(StorageError::Unavailable("vertices unavailable".to_string()))
    }
}

/// Triggers a cancellation token once a number of neighbor calls have been served
pub struct CancellingProvider<P> {
    inner: Arc<CountingProvider<P>>,
    token: CancellationToken,
    cancel_after: usize,
}

impl<P: GraphDataProvider> CancellingProvider<P> {
    pub fn new(inner: P, token: CancellationToken, cancel_after: usize) -> Self {
        Self {
            inner: Arc::new(CountingProvider::new(inner)),
            token,
            cancel_after,
        }
    }

    pub fn neighbor_calls(&self) -> usize {
        self.inner.neighbor_calls()
    }
}

impl<P: GraphDataProvider> GraphDataProvider for CancellingProvider<P> {
    fn get_neighbors(
        &self,
        vertex: &VertexId,
        edge_types: &[String],
        direction: EdgeDirection,
    ) -> Result<Vec<Edge>, StorageError> {
        let edges = self.inner.get_neighbors(vertex, edge_types, direction)?;
        if self.inner.neighbor_calls() >= self.cancel_after {
            self.token.cancel();
        }
        Ok(edges)
    }

    fn get_vertices(&self, ids: &[VertexId]) -> Result<Vec<Vertex>, StorageError> {
        self.inner.get_vertices(ids)
    }
}
