// Query Operators Module
//
// This module defines the operators used for query execution in the
// iterator-based (pull) execution model, and the state machine every
// operator shares.

pub mod values;
pub mod scan;
pub mod filter;
pub mod insert;
pub mod delete;
pub mod agg;

pub use self::values::ValuesOperator;
pub use self::scan::SeqScan;
pub use self::filter::FilterOperator;
pub use self::insert::InsertOperator;
pub use self::delete::DeleteOperator;
pub use self::agg::{AggregateOp, AggregateOperator, HashAggregator};

use crate::catalog::Schema;
use crate::query::executor::result::{QueryError, QueryResult, Tuple};

/// Owned handle to an operator subtree
pub type BoxedOperator = Box<dyn Operator>;

/// The Operator trait defines the interface for all query execution operators.
///
/// Lifecycle: a node starts Closed. `open` moves it to Open; `has_next` and
/// `next` then pull tuples until the node is Exhausted. `rewind` returns an
/// Open or Exhausted node to the state right after `open`. `close` releases
/// the node and every child, and is harmless on a node that is already closed.
pub trait Operator: Send {
    /// Prepare the operator (and its children) for iteration
    fn open(&mut self) -> QueryResult<()>;

    /// Whether another tuple is available. Idempotent between `next` calls.
    fn has_next(&mut self) -> QueryResult<bool>;

    /// Return the next tuple. Fails with `IllegalState` once exhausted.
    fn next(&mut self) -> QueryResult<Tuple>;

    /// Restart iteration from the beginning
    fn rewind(&mut self) -> QueryResult<()>;

    /// Close the operator and release any resources
    fn close(&mut self);

    /// Schema of the tuples this operator produces
    fn schema(&self) -> &Schema;

    /// Direct children, left to right
    fn children(&self) -> Vec<&dyn Operator>;

    /// Swap in new children during plan construction, returning the old ones.
    /// The number of children must match the operator's arity.
    fn replace_children(&mut self, children: Vec<BoxedOperator>) -> QueryResult<Vec<BoxedOperator>>;
}

/// Where a node is in its open/exhausted/closed lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorState {
    #[default]
    Closed,
    Open,
    Exhausted,
}

/// Shared state machine plus a one-tuple lookahead buffer, so `has_next` can be
/// answered without consuming the tuple `next` will return.
#[derive(Debug, Default)]
pub struct Lookahead {
    state: OperatorState,
    buffered: Option<Tuple>,
}

impl Lookahead {
    pub fn state(&self) -> OperatorState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == OperatorState::Closed
    }

    /// Move to Open. Returns false when the node was already open.
    pub fn open(&mut self) -> bool {
        if self.state != OperatorState::Closed {
            return false;
        }
        self.state = OperatorState::Open;
        self.buffered = None;
        true
    }

    /// Reset to the just-opened state. Fails on a closed node.
    pub fn rewind(&mut self, operator: &str) -> QueryResult<()> {
        self.ensure_open(operator)?;
        self.state = OperatorState::Open;
        self.buffered = None;
        Ok(())
    }

    pub fn close(&mut self) {
        self.state = OperatorState::Closed;
        self.buffered = None;
    }

    pub fn ensure_open(&self, operator: &str) -> QueryResult<()> {
        if self.is_closed() {
            return Err(QueryError::IllegalState(format!("{} operator is not open", operator)));
        }
        Ok(())
    }
}

/// Operators that produce tuples one at a time through `fetch_next` get the
/// `has_next`/`next` half of the protocol from `pull_has_next`/`pull_next`.
pub(crate) trait FetchNext {
    const NAME: &'static str;

    fn lookahead(&mut self) -> &mut Lookahead;

    /// Produce the next tuple, or None once the input is used up
    fn fetch_next(&mut self) -> QueryResult<Option<Tuple>>;
}

pub(crate) fn pull_has_next<T: FetchNext>(op: &mut T) -> QueryResult<bool> {
    let lookahead = op.lookahead();
    lookahead.ensure_open(T::NAME)?;
    match lookahead.state {
        OperatorState::Exhausted => return Ok(false),
        _ if lookahead.buffered.is_some() => return Ok(true),
        _ => {}
    }

    match op.fetch_next()? {
        Some(tuple) => {
            op.lookahead().buffered = Some(tuple);
            Ok(true)
        }
        None => {
            op.lookahead().state = OperatorState::Exhausted;
            Ok(false)
        }
    }
}

pub(crate) fn pull_next<T: FetchNext>(op: &mut T) -> QueryResult<Tuple> {
    if !pull_has_next(op)? {
        return Err(QueryError::IllegalState(format!("{} operator has no more tuples", T::NAME)));
    }
    op.lookahead().buffered.take()
        .ok_or_else(|| QueryError::IllegalState(format!("{} operator lost its buffered tuple", T::NAME)))
}

/// Check the child count handed to `replace_children`
pub(crate) fn expect_children(
    operator: &str,
    expected: usize,
    children: Vec<BoxedOperator>,
) -> QueryResult<Vec<BoxedOperator>> {
    if children.len() != expected {
        return Err(QueryError::InvalidArgument(format!(
            "{} operator takes {} children, got {}", operator, expected, children.len()
        )));
    }
    Ok(children)
}

/// Drain an open operator into a vector
pub fn collect_tuples(op: &mut dyn Operator) -> QueryResult<Vec<Tuple>> {
    let mut tuples = Vec::new();
    while op.has_next()? {
        tuples.push(op.next()?);
    }
    Ok(tuples)
}

/// Open an operator, drain it and close it
pub fn execute(op: &mut dyn Operator) -> QueryResult<Vec<Tuple>> {
    op.open()?;
    let result = collect_tuples(op);
    op.close();
    result
}
