// In-Memory Heap Storage
//
// A paged, append-only heap that keeps every table in memory. Deleted slots
// become tombstones so record ids stay stable for the life of the table.

use std::collections::HashMap;
use parking_lot::RwLock;
use log::debug;

use super::{Storage, StorageError, StorageResult};
use crate::catalog::Schema;
use crate::common::types::{PageId, RecordId, SlotId, TableId};
use crate::query::executor::result::Tuple;

/// Default number of tuple slots per page
pub const DEFAULT_TUPLES_PER_PAGE: usize = 64;

struct HeapTable {
    id: TableId,
    schema: Schema,
    pages: Vec<Vec<Option<Tuple>>>,
    live_rows: usize,
}

#[derive(Default)]
struct Tables {
    ids: HashMap<String, TableId>,
    /// Creation order, used for stable table listing
    names: Vec<String>,
    heaps: HashMap<TableId, HeapTable>,
    next_id: TableId,
}

impl Tables {
    fn by_name(&self, table: &str) -> StorageResult<&HeapTable> {
        self.ids.get(table)
            .and_then(|id| self.heaps.get(id))
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))
    }
}

/// Storage implementation backed by in-memory pages
pub struct MemoryStorage {
    tables: RwLock<Tables>,
    tuples_per_page: usize,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_page_capacity(DEFAULT_TUPLES_PER_PAGE)
    }

    /// Create a storage whose pages hold `tuples_per_page` slots (at least one)
    pub fn with_page_capacity(tuples_per_page: usize) -> Self {
        MemoryStorage {
            tables: RwLock::new(Tables { next_id: 1, ..Tables::default() }),
            tuples_per_page: tuples_per_page.max(1),
        }
    }

    pub fn tuples_per_page(&self) -> usize {
        self.tuples_per_page
    }

    /// Register an empty table
    pub fn create_table(&self, name: &str, schema: Schema) -> StorageResult<TableId> {
        let mut tables = self.tables.write();
        if tables.ids.contains_key(name) {
            return Err(StorageError::TableAlreadyExists(name.to_string()));
        }
        let id = tables.next_id;
        tables.next_id += 1;
        tables.ids.insert(name.to_string(), id);
        tables.names.push(name.to_string());
        tables.heaps.insert(id, HeapTable { id, schema, pages: Vec::new(), live_rows: 0 });
        debug!("created table '{}' with id {}", name, id);
        Ok(id)
    }
}

impl Storage for MemoryStorage {
    fn table_names(&self) -> Vec<String> {
        self.tables.read().names.clone()
    }

    fn table_id(&self, table: &str) -> StorageResult<TableId> {
        self.tables.read().by_name(table).map(|heap| heap.id)
    }

    fn table_schema(&self, table: &str) -> StorageResult<Schema> {
        self.tables.read().by_name(table).map(|heap| heap.schema.clone())
    }

    fn page_count(&self, table: &str) -> StorageResult<usize> {
        self.tables.read().by_name(table).map(|heap| heap.pages.len())
    }

    fn row_count_hint(&self, table: &str) -> StorageResult<usize> {
        self.tables.read().by_name(table).map(|heap| heap.live_rows)
    }

    fn read_page(&self, table: &str, page_id: PageId) -> StorageResult<Vec<Tuple>> {
        let tables = self.tables.read();
        let heap = tables.by_name(table)?;
        let page = heap.pages.get(page_id as usize).ok_or(StorageError::PageOutOfRange {
            page_id,
            page_count: heap.pages.len(),
        })?;
        Ok(page.iter().flatten().cloned().collect())
    }

    fn insert_tuple(&self, table: &str, tuple: &Tuple) -> StorageResult<RecordId> {
        let mut tables = self.tables.write();
        let id = *tables.ids.get(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;
        let heap = tables.heaps.get_mut(&id).ok_or(StorageError::UnknownTableId(id))?;

        if !tuple.conforms_to(&heap.schema) {
            return Err(StorageError::SchemaViolation(format!(
                "tuple ({}) does not fit ({})", tuple, heap.schema
            )));
        }

        let needs_page = heap.pages.last().is_none_or(|page| page.len() >= self.tuples_per_page);
        if needs_page {
            heap.pages.push(Vec::with_capacity(self.tuples_per_page));
        }
        let page_id = (heap.pages.len() - 1) as PageId;
        let page = heap.pages.last_mut().ok_or(StorageError::UnknownTableId(id))?;
        let record_id = RecordId::new(id, page_id, page.len() as SlotId);

        page.push(Some(tuple.clone().with_record_id(record_id)));
        heap.live_rows += 1;
        Ok(record_id)
    }

    fn delete_tuple(&self, tuple: &Tuple) -> StorageResult<()> {
        let record_id = tuple.record_id().ok_or(StorageError::MissingRecordId)?;
        let mut tables = self.tables.write();
        let heap = tables.heaps.get_mut(&record_id.table_id)
            .ok_or(StorageError::UnknownTableId(record_id.table_id))?;

        let slot = heap.pages.get_mut(record_id.page_id as usize)
            .and_then(|page| page.get_mut(record_id.slot as usize))
            .ok_or(StorageError::RecordNotFound(record_id))?;
        if slot.take().is_none() {
            return Err(StorageError::RecordNotFound(record_id));
        }
        heap.live_rows -= 1;
        Ok(())
    }
}
