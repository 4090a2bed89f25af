//! Test fixture for HopGraph integration tests
//!
//! Runs queries against the NBA sample dataset in `nba.json` using only the
//! public QueryCoordinator API.

use hopgraph::{Dataset, EngineConfig, QueryCoordinator, QueryError, QueryResult, Value};
use std::collections::BTreeSet;

const NBA_DATASET: &str = include_str!("nba.json");

pub struct TestFixture {
    coordinator: QueryCoordinator,
}

impl TestFixture {
    /// Fixture over the NBA dataset with the default engine configuration
    pub fn nba() -> Result<Self, Box<dyn std::error::Error>> {
        Self::nba_with_config(EngineConfig::default())
    }

    pub fn nba_with_config(config: EngineConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let _ = env_logger::builder().is_test(true).try_init();
        let dataset = Dataset::from_json_str(NBA_DATASET)?;
        let coordinator = QueryCoordinator::from_dataset(dataset, config)?;
        Ok(Self { coordinator })
    }

    pub fn coordinator(&self) -> &QueryCoordinator {
        &self.coordinator
    }

    pub fn query(&self, query: &str) -> Result<QueryResult, QueryError> {
        self.coordinator.process_query(query)
    }

    /// Run a query that must succeed
    pub fn assert_query_succeeds(&self, query: &str) -> QueryResult {
        match self.query(query) {
            Ok(result) => result,
            Err(e) => panic!("Query failed: {}\n  query: {}", e, query),
        }
    }

    /// Run a query that must fail and return its error
    pub fn assert_query_fails(&self, query: &str) -> QueryError {
        match self.query(query) {
            Ok(result) => panic!(
                "Query unexpectedly succeeded with {} rows\n  query: {}",
                result.row_count(),
                query
            ),
            Err(e) => e,
        }
    }

    pub fn assert_row_count(&self, query: &str, expected: usize) -> QueryResult {
        let result = self.assert_query_succeeds(query);
        assert_eq!(
            result.row_count(),
            expected,
            "unexpected row count for query: {}",
            query
        );
        result
    }
}

/// Values of one column rendered without quotes, in row order
pub fn column_strings(result: &QueryResult, position: usize) -> Vec<String> {
    result
        .rows()
        .iter()
        .map(|row| {
            row.values
                .get(position)
                .map(Value::to_plain_string)
                .unwrap_or_default()
        })
        .collect()
}

/// Values of one column, sorted
pub fn sorted_column(result: &QueryResult, position: usize) -> Vec<String> {
    let mut values = column_strings(result, position);
    values.sort();
    values
}

/// Distinct values of one column
pub fn column_set(result: &QueryResult, position: usize) -> BTreeSet<String> {
    column_strings(result, position).into_iter().collect()
}

/// Every row rendered as a tuple of plain strings, sorted
pub fn sorted_rows(result: &QueryResult) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = result
        .rows()
        .iter()
        .map(|row| row.values.iter().map(Value::to_plain_string).collect())
        .collect();
    rows.sort();
    rows
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
