// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result tables: the tabular value passed between query stages

use crate::storage::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One row of a result table, positionally aligned with the table's columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a value by position
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

/// Ordered named columns with row-major values
///
/// Row order carries no meaning. Column names may repeat in a final result;
/// a table bound into a later stage must have unique names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultTable {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Names that occur more than once, in first-occurrence order
    pub fn duplicate_columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) && !duplicates.contains(&column.as_str()) {
                duplicates.push(column.as_str());
            }
        }
        duplicates
    }

    /// All values of one column, in row order
    pub fn column_values(&self, position: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(position))
    }

    /// Drop repeated rows, keeping the first occurrence
    pub fn distinct(mut self) -> Self {
        self.rows = distinct_rows(self.rows);
        self
    }
}

/// Remove duplicate rows while preserving first-seen order
pub fn distinct_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

/// Outcome of one query invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Identifier assigned by the coordinator
    pub query_id: String,
    pub table: ResultTable,
    pub execution_time_ms: u64,
    /// Warnings generated during query execution (e.g., duplicate column names)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl QueryResult {
    pub fn new(query_id: String, table: ResultTable) -> Self {
        Self {
            query_id,
            table,
            execution_time_ms: 0,
            warnings: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    pub fn rows(&self) -> &[Row] {
        self.table.rows()
    }

    pub fn row_count(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Add a warning to the query result
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
