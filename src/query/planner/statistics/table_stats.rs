// Table Statistics
//
// Row count, page count and one histogram per column for a single table,
// built from two sequential scans. Built once and then read-only.

use std::sync::Arc;

use log::info;

use crate::catalog::{DataType, Schema};
use crate::query::executor::operators::{Operator, SeqScan};
use crate::query::executor::predicate::PredicateOp;
use crate::query::executor::result::{DataValue, QueryError, QueryResult};
use crate::storage::Storage;
use super::{IntHistogram, StatisticsConfig, StringHistogram};

/// Histogram for one column, chosen by the column's type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnHistogram {
    Integer(IntHistogram),
    Text(StringHistogram),
}

impl ColumnHistogram {
    /// Integer values are clamped into the histogram's range
    fn add_value(&mut self, value: &DataValue) -> QueryResult<()> {
        match (self, value) {
            (ColumnHistogram::Integer(hist), DataValue::Integer(v)) => {
                let clamped = (*v).clamp(hist.min(), hist.max());
                hist.add_value(clamped)
            }
            (ColumnHistogram::Text(hist), DataValue::Text(s)) => hist.add_value(s),
            (ColumnHistogram::Integer(_), other) => Err(mismatch(DataType::Integer, other)),
            (ColumnHistogram::Text(_), other) => Err(mismatch(DataType::Text, other)),
        }
    }

    pub fn estimate_selectivity(&self, op: PredicateOp, constant: &DataValue) -> QueryResult<f64> {
        match (self, constant) {
            (ColumnHistogram::Integer(hist), DataValue::Integer(v)) => Ok(hist.estimate_selectivity(op, *v)),
            (ColumnHistogram::Text(hist), DataValue::Text(s)) => Ok(hist.estimate_selectivity(op, s)),
            (ColumnHistogram::Integer(_), other) => Err(mismatch(DataType::Integer, other)),
            (ColumnHistogram::Text(_), other) => Err(mismatch(DataType::Text, other)),
        }
    }
}

fn mismatch(expected: DataType, actual: &DataValue) -> QueryError {
    QueryError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.data_type().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct TableStatistics {
    table_name: String,
    schema: Schema,
    page_count: usize,
    total_tuples: usize,
    io_cost_per_page: f64,
    /// One per column; empty when the table had no rows
    histograms: Vec<ColumnHistogram>,
}

impl TableStatistics {
    /// Scan `table` twice and build its statistics.
    ///
    /// The first pass finds each integer column's range, the second fills
    /// the histograms and counts rows. An empty table gets no histograms.
    pub fn compute(storage: Arc<dyn Storage>, table: &str, config: &StatisticsConfig) -> QueryResult<Self> {
        let page_count = storage.page_count(table)?;
        let mut scan = SeqScan::new(storage, table)?;
        let schema = scan.schema().clone();

        scan.open()?;
        let built = build_histograms(&mut scan, &schema, config.histogram_buckets);
        scan.close();
        let (histograms, total_tuples) = built?;

        info!(
            "computed statistics for {}: {} tuples on {} pages",
            table, total_tuples, page_count
        );

        Ok(TableStatistics {
            table_name: table.to_string(),
            schema,
            page_count,
            total_tuples,
            io_cost_per_page: config.io_cost_per_page,
            histograms,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Rows seen when the statistics were built
    pub fn total_tuples(&self) -> usize {
        self.total_tuples
    }

    pub fn histogram(&self, field: usize) -> Option<&ColumnHistogram> {
        self.histograms.get(field)
    }

    /// Cost of a full sequential scan
    pub fn estimate_scan_cost(&self) -> f64 {
        self.page_count as f64 * self.io_cost_per_page
    }

    /// Expected rows out of a scan with the given selectivity
    pub fn estimate_cardinality(&self, selectivity: f64) -> usize {
        (self.total_tuples as f64 * selectivity).ceil() as usize
    }

    /// Estimated fraction of rows satisfying `field op constant`
    pub fn estimate_selectivity(&self, field: usize, op: PredicateOp, constant: &DataValue) -> QueryResult<f64> {
        let expected = self.schema.data_type(field)?;
        if constant.data_type() != expected {
            return Err(mismatch(expected, constant));
        }
        match self.histograms.get(field) {
            Some(histogram) => histogram.estimate_selectivity(op, constant),
            None => Ok(0.0),
        }
    }
}

fn build_histograms(
    scan: &mut SeqScan,
    schema: &Schema,
    buckets: usize,
) -> QueryResult<(Vec<ColumnHistogram>, usize)> {
    // Pass 1: integer column ranges
    let mut ranges: Vec<Option<(i64, i64)>> = vec![None; schema.len()];
    let mut rows = 0usize;
    while scan.has_next()? {
        let tuple = scan.next()?;
        rows += 1;
        for (range, value) in ranges.iter_mut().zip(tuple.values()) {
            if let DataValue::Integer(v) = *value {
                *range = Some(match *range {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }
    }
    if rows == 0 {
        return Ok((Vec::new(), 0));
    }

    let mut histograms = Vec::with_capacity(schema.len());
    for (index, column) in schema.columns().iter().enumerate() {
        let histogram = match column.data_type() {
            DataType::Integer => {
                let (lo, hi) = ranges[index].ok_or_else(|| QueryError::IllegalState(format!(
                    "no integer values observed in column {}", column.name()
                )))?;
                ColumnHistogram::Integer(IntHistogram::new(buckets, lo, hi)?)
            }
            DataType::Text => ColumnHistogram::Text(StringHistogram::new(buckets)?),
        };
        histograms.push(histogram);
    }

    // Pass 2: populate. Rows written since pass 1 are not counted, and
    // values outside the pass 1 range land in the edge buckets.
    scan.rewind()?;
    let mut total = 0usize;
    while total < rows && scan.has_next()? {
        let tuple = scan.next()?;
        total += 1;
        for (histogram, value) in histograms.iter_mut().zip(tuple.values()) {
            histogram.add_value(value)?;
        }
    }
    Ok((histograms, total))
}
