//! Test utilities for HopGraph integration tests
//!
//! - TestFixture: a coordinator over the NBA sample dataset
//! - providers: instrumented graph data providers (counting, failing, cancelling)
//! - random_graph: seeded random graphs mirrored into petgraph for cross-checks

#![allow(dead_code)]

pub mod providers;
pub mod random_graph;
pub mod test_fixture;
