use super::Operation;
use crate::schema::{FieldId, TableId};

/// Removes fields from the column order of every view of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteColumnMeta {
    pub table_id: TableId,
    pub field_ids: Vec<FieldId>,
}

impl From<DeleteColumnMeta> for Operation {
    fn from(value: DeleteColumnMeta) -> Operation {
        Operation::DeleteColumnMeta(value)
    }
}
