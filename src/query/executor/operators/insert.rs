// Insert Operator
//
// Drains its child into a table through the storage collaborator and reports
// the number of stored tuples as a single one-column row.

use std::sync::Arc;
use log::{debug, warn};

use crate::catalog::{DataType, Schema};
use crate::query::executor::result::{DataValue, QueryError, QueryResult, Tuple};
use crate::storage::Storage;
use super::{collect_tuples, expect_children, pull_has_next, pull_next, BoxedOperator, FetchNext, Lookahead, Operator};

pub struct InsertOperator {
    storage: Arc<dyn Storage>,
    table_name: String,
    table_schema: Schema,
    input: BoxedOperator,
    /// Single INTEGER column holding the insert count
    schema: Schema,
    /// Set once the count row has been produced for this open/rewind cycle
    done: bool,
    lookahead: Lookahead,
}

impl InsertOperator {
    /// Create an insert into `table_name`. The child's schema must match the
    /// table's schema; nothing is written when it doesn't.
    pub fn new(storage: Arc<dyn Storage>, table_name: &str, input: BoxedOperator) -> QueryResult<Self> {
        let table_schema = storage.table_schema(table_name)?;
        check_schema(table_name, &table_schema, input.as_ref())?;
        Ok(InsertOperator {
            storage,
            table_name: table_name.to_string(),
            table_schema,
            input,
            schema: Schema::from_pairs([("inserted", DataType::Integer)]),
            done: false,
            lookahead: Lookahead::default(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

pub(crate) fn check_schema(table_name: &str, table_schema: &Schema, input: &dyn Operator) -> QueryResult<()> {
    if input.schema() != table_schema {
        return Err(QueryError::SchemaMismatch(format!(
            "child produces ({}) but table '{}' expects ({})",
            input.schema(), table_name, table_schema
        )));
    }
    Ok(())
}

impl FetchNext for InsertOperator {
    const NAME: &'static str = "Insert";

    fn lookahead(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    fn fetch_next(&mut self) -> QueryResult<Option<Tuple>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        // Drain the child before writing so a scan of the target table
        // never reads back rows inserted here
        let pending = collect_tuples(self.input.as_mut())?;

        let mut inserted = 0usize;
        for tuple in pending {
            if let Err(source) = self.storage.insert_tuple(&self.table_name, &tuple) {
                warn!(
                    "insert into '{}' stopped after {} tuples: {}",
                    self.table_name, inserted, source
                );
                return Err(QueryError::ModificationFailed { affected: inserted, source });
            }
            inserted += 1;
        }

        debug!("inserted {} tuples into '{}'", inserted, self.table_name);
        Ok(Some(Tuple::from_values(vec![DataValue::Integer(inserted as i64)])))
    }
}

impl Operator for InsertOperator {
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

    /// Re-arm the one-shot latch and replay the child
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
