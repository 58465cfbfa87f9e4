// Predicate Evaluation
//
// Binary comparisons between values: a tuple field against a constant
// (Predicate) or a field of one tuple against a field of another
// (JoinPredicate).

use std::cmp::Ordering;
use std::fmt;

use crate::query::executor::result::{DataValue, QueryResult, Tuple};

/// Comparison operators understood by predicates and histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOp {
    Equals,
    GreaterThan,
    LessThan,
    GreaterThanOrEq,
    LessThanOrEq,
    NotEquals,
    Like,
}

impl PredicateOp {
    pub const ALL: [PredicateOp; 7] = [
        PredicateOp::Equals,
        PredicateOp::GreaterThan,
        PredicateOp::LessThan,
        PredicateOp::GreaterThanOrEq,
        PredicateOp::LessThanOrEq,
        PredicateOp::NotEquals,
        PredicateOp::Like,
    ];

    /// Apply the operator to `left op right`.
    ///
    /// LIKE is substring containment for text and equality for integers.
    pub fn evaluate(&self, left: &DataValue, right: &DataValue) -> QueryResult<bool> {
        if let (PredicateOp::Like, DataValue::Text(haystack), DataValue::Text(needle)) = (self, left, right) {
            return Ok(haystack.contains(needle.as_str()));
        }

        let ordering = left.compare(right)?;
        Ok(match self {
            PredicateOp::Equals | PredicateOp::Like => ordering == Ordering::Equal,
            PredicateOp::NotEquals => ordering != Ordering::Equal,
            PredicateOp::GreaterThan => ordering == Ordering::Greater,
            PredicateOp::LessThan => ordering == Ordering::Less,
            PredicateOp::GreaterThanOrEq => ordering != Ordering::Less,
            PredicateOp::LessThanOrEq => ordering != Ordering::Greater,
        })
    }
}

impl fmt::Display for PredicateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            PredicateOp::Equals => "=",
            PredicateOp::GreaterThan => ">",
            PredicateOp::LessThan => "<",
            PredicateOp::GreaterThanOrEq => ">=",
            PredicateOp::LessThanOrEq => "<=",
            PredicateOp::NotEquals => "<>",
            PredicateOp::Like => "LIKE",
        };
        write!(f, "{}", symbol)
    }
}

/// Compares one field of a tuple against a constant
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    field: usize,
    op: PredicateOp,
    operand: DataValue,
}

impl Predicate {
    pub fn new(field: usize, op: PredicateOp, operand: DataValue) -> Self {
        Predicate { field, op, operand }
    }

    pub fn field(&self) -> usize {
        self.field
    }

    pub fn op(&self) -> PredicateOp {
        self.op
    }

    pub fn operand(&self) -> &DataValue {
        &self.operand
    }

    /// Whether `tuple[field] op operand` holds
    pub fn filter(&self, tuple: &Tuple) -> QueryResult<bool> {
        self.op.evaluate(tuple.get(self.field)?, &self.operand)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{} {} {}", self.field, self.op, self.operand)
    }
}

/// Compares a field of one tuple against a field of another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinPredicate {
    left_field: usize,
    op: PredicateOp,
    right_field: usize,
}

impl JoinPredicate {
    pub fn new(left_field: usize, op: PredicateOp, right_field: usize) -> Self {
        JoinPredicate { left_field, op, right_field }
    }

    pub fn left_field(&self) -> usize {
        self.left_field
    }

    pub fn right_field(&self) -> usize {
        self.right_field
    }

    pub fn op(&self) -> PredicateOp {
        self.op
    }

    pub fn filter(&self, left: &Tuple, right: &Tuple) -> QueryResult<bool> {
        self.op.evaluate(left.get(self.left_field)?, right.get(self.right_field)?)
    }
}
