use std::fmt;

/// Table ID type
pub type TableId = u32;

/// Page ID type (page number within a table)
pub type PageId = u32;

/// Slot ID type (position within a page)
pub type SlotId = u32;

/// Physical location of a stored tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub table_id: TableId,
    pub page_id: PageId,
    pub slot: SlotId,
}

impl RecordId {
    pub fn new(table_id: TableId, page_id: PageId, slot: SlotId) -> Self {
        Self {
            table_id,
            page_id,
            slot,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{}:{})", self.table_id, self.page_id, self.slot)
    }
}
