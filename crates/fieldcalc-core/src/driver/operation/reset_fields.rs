use super::Operation;
use crate::schema::{FieldId, TableId};

/// Drops the cached values of the fields and queues them for recalculation.
/// Resetting an already reset field changes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetFields {
    pub table_id: TableId,
    pub field_ids: Vec<FieldId>,
}

impl From<ResetFields> for Operation {
    fn from(value: ResetFields) -> Operation {
        Operation::ResetFields(value)
    }
}
