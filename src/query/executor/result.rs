// Query Result Implementation
//
// This module defines the value, tuple and error types shared by every
// execution operator.

use std::fmt;
use std::cmp::Ordering;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::catalog::{DataType, Schema};
use crate::common::types::RecordId;
use crate::storage::StorageError;

/// Possible data types for values in a row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl DataValue {
    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::Integer(_) => DataType::Integer,
            DataValue::Text(_) => DataType::Text,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DataValue::Integer(i) => Some(*i),
            DataValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s),
            DataValue::Integer(_) => None,
        }
    }

    /// Compare two values of the same kind.
    /// Integers compare numerically, text compares lexicographically by bytes.
    pub fn compare(&self, other: &Self) -> QueryResult<Ordering> {
        match (self, other) {
            (DataValue::Integer(a), DataValue::Integer(b)) => Ok(a.cmp(b)),
            (DataValue::Text(a), DataValue::Text(b)) => Ok(a.as_bytes().cmp(b.as_bytes())),
            (a, b) => Err(QueryError::TypeMismatch {
                expected: a.data_type().to_string(),
                actual: b.data_type().to_string(),
            }),
        }
    }
}

/// One row: a fixed-width sequence of values plus an optional storage location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    values: Vec<DataValue>,
    /// Set once the tuple has been read from or written to storage
    record_id: Option<RecordId>,
}

impl Tuple {
    /// Create a tuple, checking width and per-position types against a schema
    pub fn new(schema: &Schema, values: Vec<DataValue>) -> QueryResult<Self> {
        if values.len() != schema.len() {
            return Err(QueryError::SchemaMismatch(format!(
                "tuple has {} values, schema expects {}", values.len(), schema.len()
            )));
        }
        for (value, expected) in values.iter().zip(schema.types()) {
            if value.data_type() != expected {
                return Err(QueryError::TypeMismatch {
                    expected: expected.to_string(),
                    actual: value.data_type().to_string(),
                });
            }
        }
        Ok(Tuple { values, record_id: None })
    }

    /// Create a tuple without a schema check
    pub fn from_values(values: Vec<DataValue>) -> Self {
        Tuple { values, record_id: None }
    }

    pub fn with_record_id(mut self, record_id: RecordId) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn set_record_id(&mut self, record_id: Option<RecordId>) {
        self.record_id = record_id;
    }

    /// Get the value at a position
    pub fn get(&self, index: usize) -> QueryResult<&DataValue> {
        self.values.get(index).ok_or(QueryError::ColumnOutOfRange {
            index,
            width: self.values.len(),
        })
    }

    /// Rebind the value at a position. The tuple never changes width and the
    /// new value must keep the position's type.
    pub fn set(&mut self, index: usize, value: DataValue) -> QueryResult<()> {
        let width = self.values.len();
        let slot = self.values.get_mut(index)
            .ok_or(QueryError::ColumnOutOfRange { index, width })?;
        if slot.data_type() != value.data_type() {
            return Err(QueryError::TypeMismatch {
                expected: slot.data_type().to_string(),
                actual: value.data_type().to_string(),
            });
        }
        *slot = value;
        Ok(())
    }

    /// Get all values in column order
    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<DataValue> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the tuple's width and types match a schema
    pub fn conforms_to(&self, schema: &Schema) -> bool {
        self.values.len() == schema.len()
            && self.values.iter().zip(schema.types()).all(|(v, t)| v.data_type() == t)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join("\t"))
    }
}

/// Represents query execution error
#[derive(Error, Debug)]
pub enum QueryError {
    /// Operator protocol misuse (closed node, read past the end)
    #[error("Illegal state: {0}")]
    IllegalState(String),
    /// Values of incompatible kinds were compared or combined
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
    /// Child schema disagrees with the target table
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    /// Aggregate operator not defined for the column type
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// Field index beyond the row width
    #[error("Column index {index} out of range for width {width}")]
    ColumnOutOfRange { index: usize, width: usize },
    /// Invalid constructor or call argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Numeric overflow
    #[error("Numeric overflow")]
    NumericOverflow,
    /// Error from storage layer
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Insert or delete stopped after a storage failure; earlier writes stand
    #[error("Modification failed after {affected} tuples: {source}")]
    ModificationFailed {
        affected: usize,
        #[source]
        source: StorageError,
    },
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
