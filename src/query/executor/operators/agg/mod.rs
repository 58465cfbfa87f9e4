// Aggregation Operators Module
//
// This module contains the grouping aggregation engine and the Aggregate
// operator that exposes its results (MIN, MAX, SUM, AVG, COUNT over one
// column, optionally grouped by one column).

mod hash;
mod aggregate;

// Re-export public components
pub use hash::{GroupKey, HashAggregator};
pub use aggregate::AggregateOperator;

use std::fmt;

/// Types of supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    Min,
    Max,
    Sum,
    Avg,
    Count,
}

impl AggregateOp {
    /// Parse an aggregate function name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "MIN" => Some(AggregateOp::Min),
            "MAX" => Some(AggregateOp::Max),
            "SUM" => Some(AggregateOp::Sum),
            "AVG" => Some(AggregateOp::Avg),
            "COUNT" => Some(AggregateOp::Count),
            _ => None,
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
            AggregateOp::Sum => "SUM",
            AggregateOp::Avg => "AVG",
            AggregateOp::Count => "COUNT",
        };
        write!(f, "{}", name)
    }
}
