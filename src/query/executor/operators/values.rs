// Values operator - a leaf over an owned, precomputed list of tuples.
// Used as the output iterator of Aggregate and as an input source in tests.

use crate::catalog::Schema;
use crate::query::executor::result::{QueryError, QueryResult, Tuple};
use super::{pull_has_next, pull_next, BoxedOperator, FetchNext, Lookahead, Operator};

#[derive(Debug)]
pub struct ValuesOperator {
    schema: Schema,
    tuples: Vec<Tuple>,
    cursor: usize,
    lookahead: Lookahead,
}

impl ValuesOperator {
    /// Create a values operator. Every tuple must conform to the schema.
    pub fn new(schema: Schema, tuples: Vec<Tuple>) -> QueryResult<Self> {
        if let Some(bad) = tuples.iter().find(|t| !t.conforms_to(&schema)) {
            return Err(QueryError::SchemaMismatch(format!(
                "tuple ({}) does not match ({})", bad, schema
            )));
        }
        Ok(ValuesOperator {
            schema,
            tuples,
            cursor: 0,
            lookahead: Lookahead::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

impl FetchNext for ValuesOperator {
    const NAME: &'static str = "Values";

    fn lookahead(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    fn fetch_next(&mut self) -> QueryResult<Option<Tuple>> {
        let tuple = self.tuples.get(self.cursor).cloned();
        if tuple.is_some() {
            self.cursor += 1;
        }
        Ok(tuple)
    }
}

impl Operator for ValuesOperator {
    fn open(&mut self) -> QueryResult<()> {
        if self.lookahead.open() {
            self.cursor = 0;
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
        self.cursor = 0;
        Ok(())
    }

    fn close(&mut self) {
        self.lookahead.close();
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn children(&self) -> Vec<&dyn Operator> {
        Vec::new()
    }

    fn replace_children(&mut self, children: Vec<BoxedOperator>) -> QueryResult<Vec<BoxedOperator>> {
        super::expect_children(Self::NAME, 0, children)?;
        Ok(Vec::new())
    }
}
