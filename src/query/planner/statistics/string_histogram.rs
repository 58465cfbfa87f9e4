// String Histogram
//
// Maps each string to an order-preserving integer key built from its first
// four bytes and tracks the keys in an IntHistogram.

use byteorder::{BigEndian, ByteOrder};

use crate::query::executor::predicate::PredicateOp;
use crate::query::executor::result::QueryResult;
use super::IntHistogram;

/// Strings sorting above this prefix share its key
const MAX_PREFIX: &str = "zzzz";

/// Order-preserving key of a string's first four bytes
fn string_key(s: &str) -> i64 {
    let mut prefix = [0u8; 4];
    let bytes = s.as_bytes();
    let len = bytes.len().min(prefix.len());
    prefix[..len].copy_from_slice(&bytes[..len]);
    BigEndian::read_u32(&prefix) as i64
}

fn clamped_key(s: &str) -> i64 {
    string_key(s).min(string_key(MAX_PREFIX))
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringHistogram {
    keys: IntHistogram,
}

impl StringHistogram {
    pub fn new(buckets: usize) -> QueryResult<Self> {
        Ok(StringHistogram {
            keys: IntHistogram::new(buckets, string_key(""), string_key(MAX_PREFIX))?,
        })
    }

    pub fn total(&self) -> u64 {
        self.keys.total()
    }

    pub fn add_value(&mut self, value: &str) -> QueryResult<()> {
        self.keys.add_value(clamped_key(value))
    }

    /// Estimated fraction of observed strings satisfying `value op s`.
    /// A prefix key says nothing about substrings, so LIKE estimates 1.0.
    pub fn estimate_selectivity(&self, op: PredicateOp, s: &str) -> f64 {
        if op == PredicateOp::Like {
            return if self.total() == 0 { 0.0 } else { 1.0 };
        }
        self.keys.estimate_selectivity(op, clamped_key(s))
    }
}
