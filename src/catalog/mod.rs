//! Catalog Module
//!
//! Row schema metadata: data types, columns and the Schema row descriptor.

pub mod schema;
pub mod column;

// Re-export key types
pub use self::schema::{DataType, Schema};
pub use self::column::Column;
