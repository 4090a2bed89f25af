// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Type coercion for set operations
//!
//! Only unambiguous implicit coercions are allowed: integer to double and
//! numeric or boolean to string. The same rules serve static checking in the
//! validator and value conversion in the set combiner.

use crate::storage::Value;
use crate::types::{ColumnType, TypeError, TypeResult};

/// How a value of one type is converted to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionStrategy {
    None,
    IntegerToDouble,
    ToString,
}

impl CoercionStrategy {
    /// Apply this strategy to a value. Nulls pass through unchanged.
    pub fn apply(self, value: Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,
            (CoercionStrategy::IntegerToDouble, Value::Int(i)) => Value::Double(i as f64),
            (CoercionStrategy::ToString, v @ Value::String(_)) => v,
            (CoercionStrategy::ToString, v) => Value::String(v.to_plain_string()),
            (_, v) => v,
        }
    }
}

/// Type coercion engine
#[derive(Debug)]
pub struct TypeCoercion;

impl TypeCoercion {
    /// Strategy for implicitly converting `from` into `to`
    pub fn coerce(from: ColumnType, to: ColumnType) -> TypeResult<CoercionStrategy> {
        if from == to || from == ColumnType::Any || to == ColumnType::Any {
            return Ok(CoercionStrategy::None);
        }

        match (from, to) {
            (ColumnType::Int, ColumnType::Double) => Ok(CoercionStrategy::IntegerToDouble),
            (ColumnType::Int | ColumnType::Double | ColumnType::Bool, ColumnType::String) => {
                Ok(CoercionStrategy::ToString)
            }
            _ => Err(TypeError::IncompatibleTypes(from, to)),
        }
    }

    /// Common column type of two set-operation operands
    pub fn find_common_type(left: ColumnType, right: ColumnType) -> TypeResult<ColumnType> {
        if left == right {
            return Ok(left);
        }

        match (left, right) {
            (ColumnType::Any, other) | (other, ColumnType::Any) => Ok(other),
            (ColumnType::Int, ColumnType::Double) | (ColumnType::Double, ColumnType::Int) => {
                Ok(ColumnType::Double)
            }
            (
                ColumnType::Int | ColumnType::Double | ColumnType::Bool,
                ColumnType::String,
            )
            | (
                ColumnType::String,
                ColumnType::Int | ColumnType::Double | ColumnType::Bool,
            ) => Ok(ColumnType::String),
            _ => Err(TypeError::IncompatibleTypes(left, right)),
        }
    }

    /// Convert a runtime value to `target`, failing when no implicit rule applies
    pub fn coerce_value(value: Value, target: ColumnType) -> TypeResult<Value> {
        let from = value.column_type();
        match Self::coerce(from, target) {
            Ok(strategy) => Ok(strategy.apply(value)),
            Err(_) => Err(TypeError::InvalidCast(value.to_string(), target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_type_rules() {
        use ColumnType::*;
        assert_eq!(TypeCoercion::find_common_type(Int, Int), Ok(Int));
        assert_eq!(TypeCoercion::find_common_type(Int, Double), Ok(Double));
        assert_eq!(TypeCoercion::find_common_type(String, Int), Ok(String));
        assert_eq!(TypeCoercion::find_common_type(Bool, String), Ok(String));
        assert_eq!(TypeCoercion::find_common_type(Any, Path), Ok(Path));
        assert!(TypeCoercion::find_common_type(Path, String).is_err());
        assert!(TypeCoercion::find_common_type(Bool, Int).is_err());
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(
            TypeCoercion::coerce_value(Value::Int(3), ColumnType::Double),
            Ok(Value::Double(3.0))
        );
        assert_eq!(
            TypeCoercion::coerce_value(Value::Int(3), ColumnType::String),
            Ok(Value::String("3".to_string()))
        );
        assert_eq!(
            TypeCoercion::coerce_value(Value::Null, ColumnType::String),
            Ok(Value::Null)
        );
        assert!(TypeCoercion::coerce_value(Value::Double(1.5), ColumnType::Int).is_err());
    }
}
