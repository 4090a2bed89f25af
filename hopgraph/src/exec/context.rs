// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution context for variable bindings and cancellation

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::ExecutionError;
use super::expression::{RegexCache, RowScope};
use super::result::ResultTable;

/// Shared flag checked between hops and between pipeline stages
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-query state threaded through plan execution
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Query id for logging and cancellation
    pub query_id: String,
    /// Tables bound with `$name = ...`
    pub variables: HashMap<String, Arc<ResultTable>>,
    /// Warnings generated during execution
    pub warnings: Vec<String>,
    cancellation: CancellationToken,
    regexes: Arc<RegexCache>,
}

impl ExecutionContext {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            variables: HashMap::new(),
            warnings: Vec::new(),
            cancellation: CancellationToken::new(),
            regexes: Arc::new(RegexCache::new()),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Fail with `Cancelled` once the token has been triggered
    pub fn check_cancelled(&self) -> Result<(), ExecutionError> {
        if self.cancellation.is_cancelled() {
            Err(ExecutionError::Cancelled(self.query_id.clone()))
        } else {
            Ok(())
        }
    }

    /// Patterns compiled while this query runs
    pub fn regex_cache(&self) -> &RegexCache {
        &self.regexes
    }

    /// Empty row scope tied to this query's pattern cache
    pub fn scope(&self) -> RowScope<'_> {
        RowScope::default().with_regexes(&self.regexes)
    }

    /// Bind (or rebind) a variable
    pub fn set_variable(&mut self, name: &str, table: ResultTable) {
        self.variables.insert(name.to_string(), Arc::new(table));
    }

    pub fn get_variable(&self, name: &str) -> Option<Arc<ResultTable>> {
        self.variables.get(name).cloned()
    }

    /// Add a warning to the execution context
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}
