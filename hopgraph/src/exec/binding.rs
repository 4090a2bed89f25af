// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pipeline and variable binding
//!
//! Resolves `$-` and `$name` references to the table produced by an earlier
//! stage and gives column-level access to it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::context::ExecutionContext;
use super::error::ExecutionError;
use super::result::{ResultTable, Row};
use crate::ast::InputSource;
use crate::storage::{Value, VertexId};

/// Resolve an input reference against the piped table and bound variables
pub fn bind(
    pipe: Option<&Arc<ResultTable>>,
    source: &InputSource,
    context: &ExecutionContext,
) -> Result<Arc<ResultTable>, ExecutionError> {
    match source {
        InputSource::Pipe => pipe.cloned().ok_or_else(|| {
            ExecutionError::RuntimeError("`$-' used outside of a pipe".to_string())
        }),
        InputSource::Variable(name) => context.get_variable(name).ok_or_else(|| {
            ExecutionError::RuntimeError(format!("variable `${}' is not bound", name))
        }),
    }
}

/// Positional access to one column of a bound table
#[derive(Debug, Clone)]
pub struct ColumnAccessor {
    table: Arc<ResultTable>,
    position: usize,
}

impl ColumnAccessor {
    pub fn new(table: Arc<ResultTable>, column: &str) -> Result<Self, ExecutionError> {
        let position = table.column_index(column).ok_or_else(|| {
            ExecutionError::RuntimeError(format!("unknown input column `{}'", column))
        })?;
        Ok(Self { table, position })
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    pub fn value<'r>(&self, row: &'r Row) -> &'r Value {
        row.get(self.position).unwrap_or(&Value::Null)
    }

    /// Distinct vertex ids in the column, first-seen order; nulls are skipped
    pub fn distinct_vertex_ids(&self) -> Vec<VertexId> {
        let mut seen = HashSet::new();
        self.table
            .column_values(self.position)
            .filter_map(Value::to_vertex_id)
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    /// Row positions grouped by the vertex id found in the column
    pub fn rows_by_vertex(&self) -> HashMap<VertexId, Vec<usize>> {
        let mut index: HashMap<VertexId, Vec<usize>> = HashMap::new();
        for (position, row) in self.table.rows().iter().enumerate() {
            if let Some(id) = self.value(row).to_vertex_id() {
                index.entry(id).or_default().push(position);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Arc<ResultTable> {
        Arc::new(ResultTable::with_rows(
            vec!["id".to_string(), "n".to_string()],
            vec![
                Row::new(vec![Value::from("b"), Value::Int(1)]),
                Row::new(vec![Value::from("a"), Value::Int(2)]),
                Row::new(vec![Value::Null, Value::Int(3)]),
                Row::new(vec![Value::from("b"), Value::Int(4)]),
            ],
        ))
    }

    #[test]
    fn test_bind_sources() {
        let mut context = ExecutionContext::new("q");
        let piped = table();
        assert!(bind(Some(&piped), &InputSource::Pipe, &context).is_ok());
        assert!(bind(None, &InputSource::Pipe, &context).is_err());

        let var = InputSource::Variable("v".to_string());
        assert!(bind(None, &var, &context).is_err());
        context.set_variable("v", ResultTable::new(vec!["x".to_string()]));
        assert_eq!(bind(None, &var, &context).unwrap().columns(), &["x".to_string()]);
    }

    #[test]
    fn test_distinct_ids_and_row_index() {
        let accessor = ColumnAccessor::new(table(), "id").unwrap();
        assert_eq!(
            accessor.distinct_vertex_ids(),
            vec![VertexId::from("b"), VertexId::from("a")]
        );
        let index = accessor.rows_by_vertex();
        assert_eq!(index[&VertexId::from("b")], vec![0, 3]);
        assert_eq!(index.len(), 2);
        assert!(ColumnAccessor::new(table(), "missing").is_err());
    }
}
