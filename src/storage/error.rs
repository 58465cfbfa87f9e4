use thiserror::Error;
use crate::common::types::{PageId, RecordId, TableId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Table id {0} not found")]
    UnknownTableId(TableId),
    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),
    #[error("Record {0} not found")]
    RecordNotFound(RecordId),
    #[error("Tuple has no record id")]
    MissingRecordId,
    #[error("Page {page_id} out of range ({page_count} pages)")]
    PageOutOfRange { page_id: PageId, page_count: usize },
    #[error("Tuple does not match table schema: {0}")]
    SchemaViolation(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
