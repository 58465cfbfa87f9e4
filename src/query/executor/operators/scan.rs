// Table Scan Operator
//
// This module implements the sequential scan leaf: it walks a table's pages in
// order through the storage collaborator, one page at a time.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::catalog::Schema;
use crate::common::types::PageId;
use crate::query::executor::result::{QueryResult, Tuple};
use crate::storage::Storage;
use super::{pull_has_next, pull_next, BoxedOperator, FetchNext, Lookahead, Operator};

/// A table scan operator that yields every live tuple in a table
pub struct SeqScan {
    storage: Arc<dyn Storage>,
    table_name: String,
    schema: Schema,
    /// Page count captured at open/rewind
    page_count: usize,
    /// Next page to read
    next_page: usize,
    /// Tuples remaining on the current page
    current_page: VecDeque<Tuple>,
    lookahead: Lookahead,
}

impl SeqScan {
    /// Create a scan over `table_name`. Fails if the table is unknown.
    pub fn new(storage: Arc<dyn Storage>, table_name: &str) -> QueryResult<Self> {
        let schema = storage.table_schema(table_name)?;
        Ok(SeqScan {
            storage,
            table_name: table_name.to_string(),
            schema,
            page_count: 0,
            next_page: 0,
            current_page: VecDeque::new(),
            lookahead: Lookahead::default(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn reset_cursor(&mut self) -> QueryResult<()> {
        self.page_count = self.storage.page_count(&self.table_name)?;
        self.next_page = 0;
        self.current_page.clear();
        Ok(())
    }
}

impl FetchNext for SeqScan {
    const NAME: &'static str = "SeqScan";

    fn lookahead(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    fn fetch_next(&mut self) -> QueryResult<Option<Tuple>> {
        loop {
            if let Some(tuple) = self.current_page.pop_front() {
                return Ok(Some(tuple));
            }
            if self.next_page >= self.page_count {
                return Ok(None);
            }
            // Pages may be empty after deletes; keep advancing until one has rows
            let page = self.storage.read_page(&self.table_name, self.next_page as PageId)?;
            self.current_page.extend(page);
            self.next_page += 1;
        }
    }
}

impl Operator for SeqScan {
    fn open(&mut self) -> QueryResult<()> {
        if self.lookahead.open() {
            self.reset_cursor()?;
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
        self.reset_cursor()
    }

    fn close(&mut self) {
        self.lookahead.close();
        self.current_page.clear();
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
