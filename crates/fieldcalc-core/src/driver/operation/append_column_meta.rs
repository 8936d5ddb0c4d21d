use super::Operation;
use crate::schema::{FieldId, TableId};

/// Appends a field to the column order of every view of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendColumnMeta {
    pub table_id: TableId,
    pub field_id: FieldId,
}

impl From<AppendColumnMeta> for Operation {
    fn from(value: AppendColumnMeta) -> Operation {
        Operation::AppendColumnMeta(value)
    }
}
