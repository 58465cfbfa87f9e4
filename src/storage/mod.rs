//! Storage Interface
//!
//! The execution layer never touches pages directly. Everything it needs from
//! the storage engine goes through the `Storage` trait: page-at-a-time reads
//! for scans, tuple insert/delete for the modification operators, and table
//! metadata for schema checks and statistics.

pub mod error;
pub mod memory;

pub use self::error::{StorageError, StorageResult};
pub use self::memory::MemoryStorage;

use crate::catalog::Schema;
use crate::common::types::{PageId, RecordId, TableId};
use crate::query::executor::result::Tuple;

/// Storage collaborator consumed by scans, Insert/Delete and statistics.
///
/// Calls may block inside the implementation (page locks, I/O); callers treat
/// them as synchronous.
pub trait Storage: Send + Sync {
    /// Names of every table, in a stable order
    fn table_names(&self) -> Vec<String>;

    fn table_id(&self, table: &str) -> StorageResult<TableId>;

    fn table_schema(&self, table: &str) -> StorageResult<Schema>;

    /// Number of pages currently allocated to the table
    fn page_count(&self, table: &str) -> StorageResult<usize>;

    /// Best-effort live row count
    fn row_count_hint(&self, table: &str) -> StorageResult<usize>;

    /// Live tuples stored on one page, each carrying its record id.
    /// Repeated reads of an unmodified page return the same sequence.
    fn read_page(&self, table: &str, page_id: PageId) -> StorageResult<Vec<Tuple>>;

    /// Store a tuple and return its new location
    fn insert_tuple(&self, table: &str, tuple: &Tuple) -> StorageResult<RecordId>;

    /// Remove the tuple at the location the tuple carries
    fn delete_tuple(&self, tuple: &Tuple) -> StorageResult<()>;
}
