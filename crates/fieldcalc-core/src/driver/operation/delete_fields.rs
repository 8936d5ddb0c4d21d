use super::Operation;
use crate::schema::{FieldId, TableId};

/// Hard-deletes field records along with their cached values.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteFields {
    pub table_id: TableId,
    pub field_ids: Vec<FieldId>,
}

impl From<DeleteFields> for Operation {
    fn from(value: DeleteFields) -> Operation {
        Operation::DeleteFields(value)
    }
}
