// Table Statistics Module
//
// Equi-width histograms over table columns, per-table statistics built from
// two sequential scans, and the registry the planner reads them from.

mod histogram;
mod string_histogram;
mod table_stats;
mod registry;

pub use histogram::IntHistogram;
pub use string_histogram::StringHistogram;
pub use table_stats::{ColumnHistogram, TableStatistics};
pub use registry::StatisticsRegistry;

use serde::Deserialize;

/// Default cost of reading one page, in abstract cost units
pub const DEFAULT_IO_COST_PER_PAGE: f64 = 1000.0;

/// Default number of histogram buckets per column
pub const DEFAULT_HISTOGRAM_BUCKETS: usize = 100;

/// Configuration for statistics collection
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Cost charged per page by `estimate_scan_cost`
    pub io_cost_per_page: f64,
    /// Buckets per column histogram
    pub histogram_buckets: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            io_cost_per_page: DEFAULT_IO_COST_PER_PAGE,
            histogram_buckets: DEFAULT_HISTOGRAM_BUCKETS,
        }
    }
}
