// Common types shared by the storage and execution layers

pub mod types;

pub use self::types::{PageId, RecordId, SlotId, TableId};
