// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query Coordinator - orchestration for traversal query execution
//!
//! Wraps parsing, semantic validation and execution behind one synchronous
//! entry point and keeps a registry of running queries for cancellation.

use log::{debug, info, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

use crate::ast::{parse_query, Document, ParserError};
use crate::catalog::SchemaCatalog;
use crate::exec::{
    CancellationToken, DefaultEvaluator, EngineConfig, ExecutionContext, ExecutionError,
    ExpressionEvaluator, QueryExecutor, QueryResult,
};
use crate::plan::{QueryPlan, SemanticError, Validator};
use crate::storage::{Dataset, GraphDataProvider};

/// Broad category of a query failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Semantic,
    Execution,
}

/// Any failure of a query invocation
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] ParserError),

    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Syntax(_) => ErrorKind::Syntax,
            QueryError::Semantic(_) => ErrorKind::Semantic,
            QueryError::Execution(_) => ErrorKind::Execution,
        }
    }
}

/// A query currently executing
#[derive(Debug, Clone)]
pub struct QueryInfo {
    pub query_id: String,
    pub query_text: String,
    pub started_at: Instant,
}

impl QueryInfo {
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

struct RunningQuery {
    info: QueryInfo,
    token: CancellationToken,
}

/// Query Coordinator - the entry point for running queries
///
/// The coordinator owns no graph data: vertices and edges come from the
/// injected [`GraphDataProvider`], schema metadata from the injected
/// [`SchemaCatalog`].
pub struct QueryCoordinator {
    catalog: Arc<dyn SchemaCatalog>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    executor: QueryExecutor,
    config: EngineConfig,
    running: RwLock<HashMap<String, RunningQuery>>,
}

impl QueryCoordinator {
    /// Create a coordinator over a catalog and a provider
    pub fn new(
        catalog: Arc<dyn SchemaCatalog>,
        provider: Arc<dyn GraphDataProvider>,
        config: EngineConfig,
    ) -> Result<Self, ExecutionError> {
        Self::with_evaluator(catalog, provider, Arc::new(DefaultEvaluator::new()), config)
    }

    /// Create a coordinator with a custom expression evaluator
    pub fn with_evaluator(
        catalog: Arc<dyn SchemaCatalog>,
        provider: Arc<dyn GraphDataProvider>,
        evaluator: Arc<dyn ExpressionEvaluator>,
        config: EngineConfig,
    ) -> Result<Self, ExecutionError> {
        config.validate()?;
        let executor = QueryExecutor::new(provider, Arc::clone(&evaluator), config.clone());
        Ok(Self {
            catalog,
            evaluator,
            executor,
            config,
            running: RwLock::new(HashMap::new()),
        })
    }

    /// Create a coordinator over an in-memory copy of a dataset
    pub fn from_dataset(dataset: Dataset, config: EngineConfig) -> Result<Self, ExecutionError> {
        let (catalog, graph) = dataset.build()?;
        info!(
            "Loaded dataset: {} tags, {} edge types",
            catalog.tag_names().len(),
            catalog.edge_type_names().len()
        );
        Self::new(Arc::new(catalog), Arc::new(graph), config)
    }

    /// Create a coordinator from a JSON dataset file
    pub fn from_json_file(
        path: impl AsRef<Path>,
        config: EngineConfig,
    ) -> Result<Self, ExecutionError> {
        Self::from_dataset(Dataset::from_json_file(path)?, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn SchemaCatalog> {
        &self.catalog
    }

    /// Execute a query text
    ///
    /// Syntax and semantic errors are reported before the provider is
    /// called. The result is the table of the last statement.
    pub fn process_query(&self, query_text: &str) -> Result<QueryResult, QueryError> {
        self.process_query_with_cancellation(query_text, CancellationToken::new())
    }

    /// Execute a query that stops with `Cancelled` once `token` is triggered
    ///
    /// Cancellation is observed between hops and between stages.
    pub fn process_query_with_cancellation(
        &self,
        query_text: &str,
        token: CancellationToken,
    ) -> Result<QueryResult, QueryError> {
        let started = Instant::now();
        let plan = self.plan(query_text)?;

        let query_id = Uuid::new_v4().to_string();
        self.running.write().insert(
            query_id.clone(),
            RunningQuery {
                info: QueryInfo {
                    query_id: query_id.clone(),
                    query_text: query_text.to_string(),
                    started_at: started,
                },
                token: token.clone(),
            },
        );
        debug!("[{}] executing: {}", query_id, query_text);

        let mut context = ExecutionContext::new(query_id.clone()).with_cancellation(token);
        let outcome = self.executor.execute(&plan, &mut context);
        self.running.write().remove(&query_id);

        let table = match outcome {
            Ok(table) => table,
            Err(e) => {
                warn!("[{}] query failed: {}", query_id, e);
                return Err(e.into());
            }
        };

        let mut result = QueryResult::new(query_id, table);
        result.execution_time_ms = started.elapsed().as_millis() as u64;
        for warning in context.warnings {
            result.add_warning(warning);
        }

        let duplicates: Vec<String> = result
            .table
            .duplicate_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        if !duplicates.is_empty() {
            let warning = format!("Duplicate column names in result: {}", duplicates.join(", "));
            warn!("[{}] {}", result.query_id, warning);
            result.add_warning(warning);
        }
        if result.execution_time_ms > self.config.slow_query_threshold_ms {
            let warning = format!(
                "Slow query: {} ms (threshold {} ms)",
                result.execution_time_ms, self.config.slow_query_threshold_ms
            );
            warn!("[{}] {}", result.query_id, warning);
            result.add_warning(warning);
        }

        info!(
            "[{}] {} rows in {} ms",
            result.query_id,
            result.row_count(),
            result.execution_time_ms
        );
        Ok(result)
    }

    /// Parse and validate without touching the provider
    pub fn validate_query(&self, query_text: &str) -> Result<(), QueryError> {
        self.plan(query_text).map(|_| ())
    }

    pub fn is_valid_query(&self, query_text: &str) -> bool {
        self.validate_query(query_text).is_ok()
    }

    /// Validated plan of a query, without executing it
    ///
    /// The plan's `Display` renders an indented operator tree.
    pub fn explain(&self, query_text: &str) -> Result<QueryPlan, QueryError> {
        self.plan(query_text)
    }

    /// Trigger cancellation of a running query; false when the id is unknown
    pub fn cancel_query(&self, query_id: &str) -> bool {
        match self.running.read().get(query_id) {
            Some(query) => {
                info!("[{}] cancellation requested", query_id);
                query.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Snapshot of queries currently executing
    pub fn running_queries(&self) -> Vec<QueryInfo> {
        self.running
            .read()
            .values()
            .map(|query| query.info.clone())
            .collect()
    }

    fn plan(&self, query_text: &str) -> Result<QueryPlan, QueryError> {
        let document: Document = parse_query(query_text)?;
        let plan = Validator::new(self.catalog.as_ref(), &self.config, self.evaluator.as_ref())
            .validate_document(&document)?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::storage::{Edge, InMemoryGraph, Value, VertexId};
    use crate::types::ColumnType;

    fn coordinator() -> QueryCoordinator {
        let catalog = MemoryCatalog::new(ColumnType::String)
            .with_edge_type("link", &[])
            .unwrap();
        let mut graph = InMemoryGraph::new();
        graph
            .add_edge(Edge::new("link", VertexId::from("a"), VertexId::from("b")))
            .unwrap();
        QueryCoordinator::new(Arc::new(catalog), Arc::new(graph), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_error_kinds() {
        let coordinator = coordinator();
        let syntax = coordinator.process_query("GO FROM").unwrap_err();
        assert_eq!(syntax.kind(), ErrorKind::Syntax);
        let semantic = coordinator.process_query(r#"GO FROM "a" OVER nope"#).unwrap_err();
        assert_eq!(semantic.kind(), ErrorKind::Semantic);
        assert!(!coordinator.is_valid_query("GO 2 TO 1 STEPS FROM \"a\" OVER link"));
    }

    #[test]
    fn test_duplicate_columns_warn() {
        let result = coordinator()
            .process_query(r#"GO FROM "a" OVER link YIELD link._dst AS x, link._src AS x"#)
            .unwrap();
        assert_eq!(result.row_count(), 1);
        assert!(result.has_warnings());
        assert!(!result.query_id.is_empty());
    }

    #[test]
    fn test_rebinding_a_variable_warns() {
        let result = coordinator()
            .process_query("$a = YIELD 1 AS x; $a = YIELD 2 AS x; YIELD $a.x AS x")
            .unwrap();
        assert_eq!(result.rows()[0].values[0], Value::Int(2));
        assert_eq!(result.warnings, vec!["Variable `$a' rebound".to_string()]);
    }

    #[test]
    fn test_cancelled_token() {
        let coordinator = coordinator();
        let token = CancellationToken::new();
        token.cancel();
        let error = coordinator
            .process_query_with_cancellation(r#"GO FROM "a" OVER link"#, token)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Execution);
        assert!(coordinator.running_queries().is_empty());
        assert!(!coordinator.cancel_query("unknown"));
    }

    #[test]
    fn test_explain_renders_plan() {
        let plan = coordinator()
            .explain(r#"GO FROM "a" OVER link YIELD link._dst AS id | GO FROM $-.id OVER link"#)
            .unwrap();
        let text = plan.to_string();
        assert!(text.contains("Pipe"));
        assert!(text.contains("from=$-.id"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            default_path_steps: 10,
            max_steps: 2,
            ..EngineConfig::default()
        };
        let catalog = Arc::new(MemoryCatalog::default());
        assert!(QueryCoordinator::new(catalog, Arc::new(InMemoryGraph::new()), config).is_err());
    }
}
