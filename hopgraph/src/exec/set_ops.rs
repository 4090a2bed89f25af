// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Set algebra over result tables

use std::collections::HashSet;

use super::error::ExecutionError;
use super::result::{distinct_rows, ResultTable, Row};
use crate::ast::SetOperationType;
use crate::types::{ColumnType, TypeCoercion};

/// Combine two tables; column names follow `left`
///
/// `column_types` holds the common type of each column pair; values are
/// converted to it before rows are compared.
pub fn combine(
    operation: SetOperationType,
    left: ResultTable,
    right: ResultTable,
    column_types: &[ColumnType],
) -> Result<ResultTable, ExecutionError> {
    if left.columns().len() != right.columns().len() {
        return Err(ExecutionError::RuntimeError(format!(
            "{} operands have {} and {} columns",
            operation,
            left.columns().len(),
            right.columns().len()
        )));
    }

    let columns = left.columns().to_vec();
    let left_rows = coerce_rows(left.into_rows(), column_types)?;
    let right_rows = coerce_rows(right.into_rows(), column_types)?;

    let rows = match operation {
        SetOperationType::UnionAll => {
            let mut rows = left_rows;
            rows.extend(right_rows);
            rows
        }
        SetOperationType::Union => {
            let mut rows = left_rows;
            rows.extend(right_rows);
            distinct_rows(rows)
        }
        SetOperationType::Minus => {
            let exclude: HashSet<Row> = right_rows.into_iter().collect();
            left_rows
                .into_iter()
                .filter(|row| !exclude.contains(row))
                .collect()
        }
        SetOperationType::Intersect => {
            let keep: HashSet<Row> = right_rows.into_iter().collect();
            distinct_rows(
                left_rows
                    .into_iter()
                    .filter(|row| keep.contains(row))
                    .collect(),
            )
        }
    };

    Ok(ResultTable::with_rows(columns, rows))
}

fn coerce_rows(rows: Vec<Row>, column_types: &[ColumnType]) -> Result<Vec<Row>, ExecutionError> {
    if column_types.iter().all(|t| *t == ColumnType::Any) {
        return Ok(rows);
    }
    rows.into_iter()
        .map(|row| {
            row.values
                .into_iter()
                .enumerate()
                .map(|(i, value)| match column_types.get(i) {
                    Some(target) => Ok(TypeCoercion::coerce_value(value, *target)?),
                    None => Ok(value),
                })
                .collect::<Result<Vec<_>, ExecutionError>>()
                .map(Row::new)
        })
        .collect()
}
