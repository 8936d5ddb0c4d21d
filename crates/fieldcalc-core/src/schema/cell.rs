use super::{FieldId, RecordId};

/// A cached value of one field for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub record_id: RecordId,
    pub field_id: FieldId,
    pub value: serde_json::Value,
}

/// One row of a link relation's junction storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub self_key: RecordId,
    pub foreign_key: RecordId,
}
