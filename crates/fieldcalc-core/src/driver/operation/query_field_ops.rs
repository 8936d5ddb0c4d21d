use super::Operation;
use crate::schema::TableId;

/// Operation log entries of a table, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFieldOps {
    pub table_id: TableId,
}

impl From<QueryFieldOps> for Operation {
    fn from(value: QueryFieldOps) -> Operation {
        Operation::QueryFieldOps(value)
    }
}
