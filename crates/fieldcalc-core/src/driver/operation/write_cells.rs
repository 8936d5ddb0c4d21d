use super::Operation;
use crate::schema::{Cell, TableId};

/// Stores computed values, replacing existing ones.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCells {
    pub table_id: TableId,
    pub cells: Vec<Cell>,
}

impl From<WriteCells> for Operation {
    fn from(value: WriteCells) -> Operation {
        Operation::WriteCells(value)
    }
}
