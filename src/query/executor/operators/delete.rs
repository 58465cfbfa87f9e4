// Delete Operator
//
// Removes every tuple its child produces, addressed by the record id each
// tuple carries, and reports the deletion count as a single row.

use std::sync::Arc;
use log::{debug, warn};

use crate::catalog::{DataType, Schema};
use crate::query::executor::result::{DataValue, QueryError, QueryResult, Tuple};
use crate::storage::Storage;
use super::insert::check_schema;
use super::{expect_children, pull_has_next, pull_next, BoxedOperator, FetchNext, Lookahead, Operator};

pub struct DeleteOperator {
    storage: Arc<dyn Storage>,
    table_name: String,
    table_schema: Schema,
    input: BoxedOperator,
    schema: Schema,
    done: bool,
    lookahead: Lookahead,
}

impl DeleteOperator {
    /// Create a delete from `table_name`; the child must produce that table's rows
    pub fn new(storage: Arc<dyn Storage>, table_name: &str, input: BoxedOperator) -> QueryResult<Self> {
        let table_schema = storage.table_schema(table_name)?;
        check_schema(table_name, &table_schema, input.as_ref())?;
        Ok(DeleteOperator {
            storage,
            table_name: table_name.to_string(),
            table_schema,
            input,
            schema: Schema::from_pairs([("deleted", DataType::Integer)]),
            done: false,
            lookahead: Lookahead::default(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl FetchNext for DeleteOperator {
    const NAME: &'static str = "Delete";

    fn lookahead(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    fn fetch_next(&mut self) -> QueryResult<Option<Tuple>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        let mut deleted = 0usize;
        while self.input.has_next()? {
            let tuple = self.input.next()?;
            if let Err(source) = self.storage.delete_tuple(&tuple) {
                warn!(
                    "delete from '{}' stopped after {} tuples: {}",
                    self.table_name, deleted, source
                );
                return Err(QueryError::ModificationFailed { affected: deleted, source });
            }
            deleted += 1;
        }

        debug!("deleted {} tuples from '{}'", deleted, self.table_name);
        Ok(Some(Tuple::from_values(vec![DataValue::Integer(deleted as i64)])))
    }
}

impl Operator for DeleteOperator {
    fn open(&mut self) -> QueryResult<()> {
        if self.lookahead.open() {
            self.done = false;
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
        self.done = false;
        self.input.rewind()
    }

    fn close(&mut self) {
        self.lookahead.close();
        self.done = false;
        self.input.close();
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.input.as_ref()]
    }

    fn replace_children(&mut self, children: Vec<BoxedOperator>) -> QueryResult<Vec<BoxedOperator>> {
        let mut children = expect_children(Self::NAME, 1, children)?;
        check_schema(&self.table_name, &self.table_schema, children[0].as_ref())?;
        let previous = std::mem::replace(&mut self.input, children.remove(0));
        Ok(vec![previous])
    }
}
