use super::Operation;
use crate::schema::TableId;

/// All fields of a table, in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct FindFields {
    pub table_id: TableId,
}

impl From<FindFields> for Operation {
    fn from(value: FindFields) -> Operation {
        Operation::FindFields(value)
    }
}
