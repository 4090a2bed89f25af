// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph storage access
//!
//! Value types, graph entities, the [`GraphDataProvider`] interface the
//! engine reads through, and an in-memory provider loaded from JSON datasets.

pub mod dataset;
pub mod graph_cache;
pub mod provider;
pub mod types;
pub mod value;

pub use dataset::Dataset;
pub use graph_cache::InMemoryGraph;
pub use provider::{EdgeDirection, GraphDataProvider};
pub use types::{Edge, EdgeKey, GraphError, StorageError, Vertex, VertexId};
pub use value::{PathStep, PathValue, Value};
