// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Column type system
//!
//! Static types attached to every column a query stage produces. Types are
//! inferred from the schema catalog during validation so that set operations
//! can be type-checked before any data is read.

pub mod coercion;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use self::coercion::TypeCoercion;

/// Static type of a property or result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Int,
    Double,
    String,
    List,
    Path,
    Vertex,
    Edge,
    /// Unknown until runtime (null literals, untyped inputs)
    Any,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Double)
    }

    /// Types that may serve as a vertex id
    pub fn is_vid_type(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::String)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::Double => "double",
            ColumnType::String => "string",
            ColumnType::List => "list",
            ColumnType::Path => "path",
            ColumnType::Vertex => "vertex",
            ColumnType::Edge => "edge",
            ColumnType::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// Type error for type system operations
#[derive(Debug, Clone, PartialEq)]
pub enum TypeError {
    IncompatibleTypes(ColumnType, ColumnType),
    InvalidCast(String, ColumnType),
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::IncompatibleTypes(t1, t2) => {
                write!(f, "Incompatible types: {} and {}", t1, t2)
            }
            TypeError::InvalidCast(from, to) => {
                write!(f, "Cannot cast {} to {}", from, to)
            }
        }
    }
}

impl std::error::Error for TypeError {}

pub type TypeResult<T> = Result<T, TypeError>;
