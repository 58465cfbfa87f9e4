// Query Execution Core
//
// Pull-based relational operators, grouping aggregation and histogram-based
// table statistics over a pluggable storage layer.

pub mod common;
pub mod catalog;
pub mod query;
pub mod storage;

// Re-export key items for convenient access
pub use catalog::{Column, DataType, Schema};
pub use query::executor::operators::{BoxedOperator, Operator};
pub use query::executor::result::{DataValue, QueryError, QueryResult, Tuple};
pub use query::planner::statistics::{StatisticsConfig, StatisticsRegistry, TableStatistics};
pub use storage::{MemoryStorage, Storage, StorageError};
