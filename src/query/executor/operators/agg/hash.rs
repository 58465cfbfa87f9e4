// Hash-based Aggregation
//
// Groups input tuples by one column (or into a single implicit group) and
// keeps one running accumulator per group. Groups are kept in first-seen
// order, so iteration over a finished build is stable.

use linked_hash_map::LinkedHashMap;

use crate::catalog::{DataType, Schema};
use crate::query::executor::result::{DataValue, QueryError, QueryResult, Tuple};
use super::AggregateOp;

/// Key for the grouping hash table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Every tuple belongs to the single implicit group
    NoGrouping,
    Value(DataValue),
}

/// Running state for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accumulator {
    Min(i64),
    Max(i64),
    Sum(i64),
    Count(i64),
    /// Division is deferred until the result is read. The sum is wider
    /// than the values so it only overflows past 2^64 inputs.
    Avg { sum: i128, count: i64 },
}

impl Accumulator {
    /// Start an accumulator from the group's first value.
    /// `value` is None only for COUNT over a text column.
    fn seed(op: AggregateOp, value: Option<i64>) -> QueryResult<Self> {
        if op == AggregateOp::Count {
            return Ok(Accumulator::Count(1));
        }
        let v = value.ok_or_else(|| QueryError::UnsupportedOperator(format!("{} over TEXT", op)))?;
        Ok(match op {
            AggregateOp::Min => Accumulator::Min(v),
            AggregateOp::Max => Accumulator::Max(v),
            AggregateOp::Sum => Accumulator::Sum(v),
            AggregateOp::Avg => Accumulator::Avg { sum: v as i128, count: 1 },
            AggregateOp::Count => Accumulator::Count(1),
        })
    }

    fn update(&mut self, value: Option<i64>) -> QueryResult<()> {
        if let Accumulator::Count(count) = self {
            *count += 1;
            return Ok(());
        }
        let v = value.ok_or_else(|| QueryError::UnsupportedOperator("non-COUNT aggregate over TEXT".to_string()))?;
        match self {
            Accumulator::Min(min) => *min = (*min).min(v),
            Accumulator::Max(max) => *max = (*max).max(v),
            Accumulator::Sum(sum) => *sum = sum.checked_add(v).ok_or(QueryError::NumericOverflow)?,
            Accumulator::Avg { sum, count } => {
                *sum = sum.checked_add(v as i128).ok_or(QueryError::NumericOverflow)?;
                *count += 1;
            }
            Accumulator::Count(_) => {}
        }
        Ok(())
    }

    /// Final value; AVG truncates toward zero
    fn result(&self) -> i64 {
        match *self {
            Accumulator::Min(v) | Accumulator::Max(v) | Accumulator::Sum(v) | Accumulator::Count(v) => v,
            // The mean of i64 values is itself within i64
            Accumulator::Avg { sum, count } => (sum / count as i128) as i64,
        }
    }
}

/// Computes one aggregate over a stream of tuples
#[derive(Debug)]
pub struct HashAggregator {
    op: AggregateOp,
    aggregate_field: usize,
    aggregate_type: DataType,
    group_field: Option<(usize, DataType)>,
    groups: LinkedHashMap<GroupKey, Accumulator>,
}

impl HashAggregator {
    /// Create an aggregator over tuples of `input_schema`.
    ///
    /// Fails with `UnsupportedOperator` for anything but COUNT over a text
    /// column, and with `ColumnOutOfRange` for a bad field index.
    pub fn new(
        input_schema: &Schema,
        aggregate_field: usize,
        group_field: Option<usize>,
        op: AggregateOp,
    ) -> QueryResult<Self> {
        let aggregate_type = input_schema.data_type(aggregate_field)?;
        if aggregate_type == DataType::Text && op != AggregateOp::Count {
            return Err(QueryError::UnsupportedOperator(format!(
                "{} is not defined over TEXT column {}", op, input_schema.field_name(aggregate_field)?
            )));
        }
        let group_field = match group_field {
            Some(index) => Some((index, input_schema.data_type(index)?)),
            None => None,
        };

        Ok(HashAggregator {
            op,
            aggregate_field,
            aggregate_type,
            group_field,
            groups: LinkedHashMap::new(),
        })
    }

    pub fn op(&self) -> AggregateOp {
        self.op
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Fold one tuple into its group, creating the group on first sight
    pub fn merge(&mut self, tuple: &Tuple) -> QueryResult<()> {
        let key = match self.group_field {
            None => GroupKey::NoGrouping,
            Some((index, expected)) => {
                let value = tuple.get(index)?;
                check_type(expected, value)?;
                GroupKey::Value(value.clone())
            }
        };

        let value = tuple.get(self.aggregate_field)?;
        check_type(self.aggregate_type, value)?;
        let value = value.as_integer();

        match self.groups.get_mut(&key) {
            Some(accumulator) => accumulator.update(value)?,
            None => {
                self.groups.insert(key, Accumulator::seed(self.op, value)?);
            }
        }
        Ok(())
    }

    /// One output tuple per group: `(aggregate)` without grouping,
    /// `(group value, aggregate)` with it
    pub fn results(&self) -> Vec<Tuple> {
        self.groups.iter()
            .map(|(key, accumulator)| {
                let aggregate = DataValue::Integer(accumulator.result());
                match key {
                    GroupKey::NoGrouping => Tuple::from_values(vec![aggregate]),
                    GroupKey::Value(group) => Tuple::from_values(vec![group.clone(), aggregate]),
                }
            })
            .collect()
    }

    /// Drop all groups
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

fn check_type(expected: DataType, value: &DataValue) -> QueryResult<()> {
    if value.data_type() != expected {
        return Err(QueryError::TypeMismatch {
            expected: expected.to_string(),
            actual: value.data_type().to_string(),
        });
    }
    Ok(())
}
