// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ExecutionError;

/// Tunables for traversal and path search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bound used by FIND PATH when `UPTO n STEPS` is omitted
    pub default_path_steps: u32,

    /// Largest step count accepted in STEPS or UPTO
    pub max_steps: u32,

    /// Emit zero-length paths in FIND ALL PATH when a source is also a target
    pub all_paths_include_zero_length: bool,

    /// Dispatch provider calls of one frontier on the rayon pool
    pub parallel_expansion: bool,

    /// Minimum frontier size before parallel dispatch kicks in
    pub parallel_threshold: usize,

    /// Queries slower than this get a warning attached to their result
    pub slow_query_threshold_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_path_steps: 5,
            max_steps: 100,
            all_paths_include_zero_length: false,
            parallel_expansion: true,
            parallel_threshold: 16,
            slow_query_threshold_ms: 1000,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExecutionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExecutionError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ExecutionError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| ExecutionError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExecutionError> {
        if self.default_path_steps > self.max_steps {
            return Err(ExecutionError::Configuration(format!(
                "default_path_steps ({}) exceeds max_steps ({})",
                self.default_path_steps, self.max_steps
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(ExecutionError::Configuration(
                "parallel_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_zero_length_paths(mut self, enabled: bool) -> Self {
        self.all_paths_include_zero_length = enabled;
        self
    }

    pub fn with_parallel_expansion(mut self, enabled: bool) -> Self {
        self.parallel_expansion = enabled;
        self
    }
}
