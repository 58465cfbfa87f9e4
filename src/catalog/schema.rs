// Row Schema Module
//
// This module defines the data types supported by the engine and the Schema
// (row descriptor) that every tuple flowing through an operator must satisfy.

use std::fmt;
use serde::{Serialize, Deserialize};

use super::column::Column;
use crate::query::executor::result::{QueryError, QueryResult};

/// Data types supported by the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    /// Convert a string representation to a DataType
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "INT" | "INTEGER" => Ok(DataType::Integer),
            "TEXT" | "VARCHAR" | "CHAR" | "STRING" => Ok(DataType::Text),
            _ => Err(format!("Unknown data type: {}", s)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Text => write!(f, "TEXT"),
        }
    }
}

/// Ordered sequence of columns describing a row.
///
/// Equality compares only the positional type sequence; names are descriptive
/// and may differ between otherwise compatible schemas (for example the
/// derived schema of an aggregate or a merged join schema).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self.columns.iter()
                .zip(other.columns.iter())
                .all(|(a, b)| a.data_type() == b.data_type())
    }
}

impl Eq for Schema {}

impl Schema {
    /// Create a schema from columns
    pub fn new(columns: Vec<Column>) -> Self {
        Schema { columns }
    }

    /// Create a schema from (name, type) pairs
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, DataType)>) -> Self {
        Schema {
            columns: pairs.into_iter().map(|(name, dt)| Column::new(name, dt)).collect(),
        }
    }

    /// Concatenate two schemas, left columns first
    pub fn merge(left: &Schema, right: &Schema) -> Self {
        let mut columns = left.columns.clone();
        columns.extend(right.columns.iter().cloned());
        Schema { columns }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get all columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get the column at a position
    pub fn column(&self, index: usize) -> QueryResult<&Column> {
        self.columns.get(index).ok_or(QueryError::ColumnOutOfRange {
            index,
            width: self.columns.len(),
        })
    }

    /// Type of the column at a position
    pub fn data_type(&self, index: usize) -> QueryResult<DataType> {
        self.column(index).map(Column::data_type)
    }

    /// Name of the column at a position
    pub fn field_name(&self, index: usize) -> QueryResult<&str> {
        self.column(index).map(Column::name)
    }

    /// Position of the first column with the given name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Column types in order
    pub fn types(&self) -> impl Iterator<Item = DataType> + '_ {
        self.columns.iter().map(Column::data_type)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.columns.iter()
            .map(|c| format!("{}({})", c.data_type(), c.name()))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
