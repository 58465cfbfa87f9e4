// Integer Histogram
//
// Fixed-size equi-width histogram over a known [min, max] range. Only bucket
// counts are kept, never the observed values.

use log::debug;

use crate::query::executor::predicate::PredicateOp;
use crate::query::executor::result::{QueryError, QueryResult};

#[derive(Debug, Clone, PartialEq)]
pub struct IntHistogram {
    buckets: Vec<u64>,
    min: i64,
    max: i64,
    /// Values covered by one bucket. Wide enough for ranges spanning all of i64.
    width: i128,
    total: u64,
}

impl IntHistogram {
    /// Create a histogram of `buckets` buckets over `[min, max]`
    pub fn new(buckets: usize, min: i64, max: i64) -> QueryResult<Self> {
        if buckets == 0 {
            return Err(QueryError::InvalidArgument("histogram needs at least one bucket".to_string()));
        }
        if max < min {
            return Err(QueryError::InvalidArgument(format!(
                "histogram range is empty: min {} > max {}", min, max
            )));
        }

        let span = max as i128 - min as i128 + 1;
        let count = buckets as i128;
        let width = (span + count - 1) / count;

        debug!("histogram over [{}, {}]: {} buckets of width {}", min, max, buckets, width);

        Ok(IntHistogram {
            buckets: vec![0; buckets],
            min,
            max,
            width,
            total: 0,
        })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of values observed so far
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Record one value. Values outside `[min, max]` are rejected.
    pub fn add_value(&mut self, value: i64) -> QueryResult<()> {
        if value < self.min || value > self.max {
            return Err(QueryError::InvalidArgument(format!(
                "value {} outside histogram range [{}, {}]", value, self.min, self.max
            )));
        }
        let index = self.index_of(value);
        self.buckets[index] += 1;
        self.total += 1;
        Ok(())
    }

    /// Estimated fraction of observed values satisfying `value op v`
    pub fn estimate_selectivity(&self, op: PredicateOp, v: i64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        match op {
            PredicateOp::Equals | PredicateOp::Like => self.equals(v),
            PredicateOp::NotEquals => 1.0 - self.equals(v),
            PredicateOp::GreaterThan => self.greater_than(v),
            PredicateOp::LessThan => self.less_than(v),
            PredicateOp::GreaterThanOrEq => self.greater_than(v) + self.equals(v),
            PredicateOp::LessThanOrEq => self.less_than(v) + self.equals(v),
        }
    }

    fn index_of(&self, value: i64) -> usize {
        let last = self.buckets.len() - 1;
        if value == self.max {
            return last;
        }
        let index = (value as i128 - self.min as i128) / self.width;
        (index as usize).min(last)
    }

    /// Inclusive value bounds of a bucket, clamped to the histogram range
    fn bounds(&self, index: usize) -> (i128, i128) {
        let max = self.max as i128;
        let left = self.min as i128 + index as i128 * self.width;
        let right = (left + self.width - 1).min(max);
        (left.min(max), right)
    }

    fn fraction(&self, count: u64) -> f64 {
        count as f64 / self.total as f64
    }

    fn equals(&self, v: i64) -> f64 {
        if v < self.min || v > self.max {
            return 0.0;
        }
        let height = self.buckets[self.index_of(v)];
        self.fraction(height) / self.width as f64
    }

    fn greater_than(&self, v: i64) -> f64 {
        if v < self.min {
            return 1.0;
        }
        if v > self.max {
            return 0.0;
        }
        let index = self.index_of(v);
        let (_, right) = self.bounds(index);
        let within = self.fraction(self.buckets[index]) * ((right - v as i128) as f64 / self.width as f64);
        let above: u64 = self.buckets[index + 1..].iter().sum();
        within + self.fraction(above)
    }

    fn less_than(&self, v: i64) -> f64 {
        if v > self.max {
            return 1.0;
        }
        if v < self.min {
            return 0.0;
        }
        let index = self.index_of(v);
        let (left, _) = self.bounds(index);
        let within = self.fraction(self.buckets[index]) * ((v as i128 - left) as f64 / self.width as f64);
        let below: u64 = self.buckets[..index].iter().sum();
        within + self.fraction(below)
    }
}

impl std::fmt::Display for IntHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IntHistogram[{}, {}] total={} buckets={:?}", self.min, self.max, self.total, self.buckets)
    }
}
