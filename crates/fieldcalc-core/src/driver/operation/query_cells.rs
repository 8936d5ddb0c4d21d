use super::Operation;
use crate::schema::FieldId;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryCells {
    pub field_ids: Vec<FieldId>,
}

impl From<QueryCells> for Operation {
    fn from(value: QueryCells) -> Operation {
        Operation::QueryCells(value)
    }
}
