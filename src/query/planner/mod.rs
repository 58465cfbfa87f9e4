// Query Planner Module
//
// Planner-side support. Currently the per-table statistics used for
// selectivity and cost estimation.

pub mod statistics;

pub use self::statistics::{StatisticsConfig, StatisticsRegistry, TableStatistics};
