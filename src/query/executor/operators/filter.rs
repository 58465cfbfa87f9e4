// Filter Operator Implementation
//
// This module implements the filter operator for filtering rows based on predicates.

use crate::catalog::Schema;
use crate::query::executor::predicate::Predicate;
use crate::query::executor::result::{QueryResult, Tuple};
use super::{expect_children, pull_has_next, pull_next, BoxedOperator, FetchNext, Lookahead, Operator};

/// Filter operator that passes through the child's tuples satisfying a predicate
pub struct FilterOperator {
    /// The input operator
    input: BoxedOperator,
    /// The predicate to evaluate
    predicate: Predicate,
    lookahead: Lookahead,
}

impl FilterOperator {
    /// Create a new filter operator
    pub fn new(predicate: Predicate, input: BoxedOperator) -> Self {
        FilterOperator {
            input,
            predicate,
            lookahead: Lookahead::default(),
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl FetchNext for FilterOperator {
    const NAME: &'static str = "Filter";

    fn lookahead(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    /// Keep fetching rows from the input until one satisfies the predicate
    /// or the input runs out
    fn fetch_next(&mut self) -> QueryResult<Option<Tuple>> {
        while self.input.has_next()? {
            let tuple = self.input.next()?;
            if self.predicate.filter(&tuple)? {
                return Ok(Some(tuple));
            }
        }
        Ok(None)
    }
}

impl Operator for FilterOperator {
    fn open(&mut self) -> QueryResult<()> {
        if self.lookahead.open() {
            self.input.open()?;
        }
        Ok(())
    }

    fn has_next(&mut self) -> QueryResult<bool> {
        pull_has_next(self)
    }

    fn next(&mut self) -> QueryResult<Tuple> {
        pull_next(self)
    }

    fn rewind(&mut self) -> QueryResult<()> {
        self.lookahead.rewind(Self::NAME)?;
        self.input.rewind()
    }

    fn close(&mut self) {
        self.lookahead.close();
        self.input.close();
    }

    /// Filtering never changes the row shape
    fn schema(&self) -> &Schema {
        self.input.schema()
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.input.as_ref()]
    }

    fn replace_children(&mut self, children: Vec<BoxedOperator>) -> QueryResult<Vec<BoxedOperator>> {
        let mut children = expect_children(Self::NAME, 1, children)?;
        let previous = std::mem::replace(&mut self.input, children.remove(0));
        Ok(vec![previous])
    }
}
