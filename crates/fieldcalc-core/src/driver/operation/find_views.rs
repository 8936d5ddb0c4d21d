use super::Operation;
use crate::schema::TableId;

#[derive(Debug, Clone, PartialEq)]
pub struct FindViews {
    pub table_id: TableId,
}

impl From<FindViews> for Operation {
    fn from(value: FindViews) -> Operation {
        Operation::FindViews(value)
    }
}
