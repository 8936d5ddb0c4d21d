use super::Operation;
use crate::schema::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct InsertTable {
    pub table: Table,
}

impl From<InsertTable> for Operation {
    fn from(value: InsertTable) -> Operation {
        Operation::InsertTable(value)
    }
}
