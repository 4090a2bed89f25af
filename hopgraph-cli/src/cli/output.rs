// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use hopgraph::{QueryResult, Value};

use super::commands::OutputFormat;

/// Result formatter for different output formats
pub struct ResultFormatter;

impl ResultFormatter {
    /// Format query results in the specified format
    pub fn format(result: &QueryResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Csv => Self::format_csv(result),
        }
    }

    /// Format results as a table using comfy-table
    fn format_table(result: &QueryResult) -> String {
        let mut output = String::new();

        if result.is_empty() {
            output.push_str(&format!("{}\n", "Empty set".yellow()));
            if !result.columns().is_empty() {
                output.push_str(&format!("Columns: {}\n", result.columns().join(", ")));
            }
        } else {
            output.push_str(&format!("{}\n", "Query Results".bold().green()));
            output.push_str(&format!(
                "Execution time: {} ms\n",
                result.execution_time_ms
            ));
            output.push_str(&format!("Rows returned: {}\n\n", result.row_count()));

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);

            let header_cells: Vec<Cell> = result
                .columns()
                .iter()
                .map(|col| Cell::new(col).fg(Color::Green))
                .collect();
            table.set_header(header_cells);

            // Rows are positional; result columns may repeat a name
            for row in result.rows() {
                let row_values: Vec<String> = row.values.iter().map(Self::value_to_string).collect();
                table.add_row(row_values);
            }

            output.push_str(&table.to_string());
            output.push('\n');
        }

        if !result.warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".bold().yellow()));
            for (i, warning) in result.warnings.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, warning.yellow()));
            }
        }

        output
    }

    /// Format results as JSON
    fn format_json(result: &QueryResult) -> String {
        let mut json_obj = serde_json::json!({
            "status": "success",
            "query_id": result.query_id,
            "columns": result.columns(),
            "rows": result
                .rows()
                .iter()
                .map(|row| serde_json::Value::Array(row.values.iter().map(Self::value_to_json).collect()))
                .collect::<Vec<_>>(),
            "row_count": result.row_count(),
            "execution_time_ms": result.execution_time_ms,
        });

        if !result.warnings.is_empty() {
            if let serde_json::Value::Object(ref mut map) = json_obj {
                map.insert("warnings".to_string(), serde_json::json!(result.warnings));
            }
        }

        serde_json::to_string_pretty(&json_obj).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize results to JSON\"}".to_string()
        })
    }

    /// Format results as CSV
    fn format_csv(result: &QueryResult) -> String {
        let mut output = String::new();

        let header: Vec<String> = result
            .columns()
            .iter()
            .map(|col| Self::csv_escape(col))
            .collect();
        output.push_str(&header.join(","));
        output.push('\n');

        for row in result.rows() {
            let row_values: Vec<String> = row
                .values
                .iter()
                .map(|v| match v {
                    Value::Null => String::new(),
                    other => Self::csv_escape(&Self::value_to_string(other)),
                })
                .collect();
            output.push_str(&row_values.join(","));
            output.push('\n');
        }

        if !result.warnings.is_empty() {
            output.push_str("\n# Warnings:\n");
            for (i, warning) in result.warnings.iter().enumerate() {
                output.push_str(&format!("# {}. {}\n", i + 1, warning));
            }
        }

        output
    }

    /// Display string of a cell; strings are shown unquoted
    fn value_to_string(value: &Value) -> String {
        value.to_plain_string()
    }

    fn value_to_json(value: &Value) -> serde_json::Value {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::json!(i),
            Value::Double(d) => serde_json::json!(d),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::value_to_json).collect())
            }
            Value::Path(path) => serde_json::Value::String(path.to_string()),
            Value::Vertex(vertex) => {
                serde_json::to_value(vertex).unwrap_or(serde_json::Value::Null)
            }
            Value::Edge(edge) => serde_json::to_value(edge).unwrap_or(serde_json::Value::Null),
        }
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopgraph::{EngineConfig, InMemoryGraph, MemoryCatalog, QueryCoordinator};
    use std::sync::Arc;

    fn run(query: &str) -> QueryResult {
        QueryCoordinator::new(
            Arc::new(MemoryCatalog::default()),
            Arc::new(InMemoryGraph::new()),
            EngineConfig::default(),
        )
        .unwrap()
        .process_query(query)
        .unwrap()
    }

    #[test]
    fn test_csv_escapes_and_nulls() {
        let result = run(r#"YIELD "a,b" AS s, NULL AS n, 3 AS i"#);
        let csv = ResultFormatter::format(&result, OutputFormat::Csv);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("s,n,i"));
        assert_eq!(lines.next(), Some("\"a,b\",,3"));
    }

    #[test]
    fn test_json_rows_are_positional() {
        let result = run("YIELD 1 AS x, 2 AS x");
        let json: serde_json::Value =
            serde_json::from_str(&ResultFormatter::format(&result, OutputFormat::Json)).unwrap();
        assert_eq!(json["columns"], serde_json::json!(["x", "x"]));
        assert_eq!(json["rows"], serde_json::json!([[1, 2]]));
        assert!(json["warnings"].is_array());
    }
}
