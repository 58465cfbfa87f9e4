// Column Management Module
//
// This module defines the Column type: one named, typed position of a row schema.

use super::schema::DataType;
use serde::{Serialize, Deserialize};

/// Represents a column in a row schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (descriptive only, need not be unique)
    name: String,
    /// Column data type
    data_type: DataType,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Column {
            name: name.into(),
            data_type,
        }
    }

    /// Get the column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the column data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}
