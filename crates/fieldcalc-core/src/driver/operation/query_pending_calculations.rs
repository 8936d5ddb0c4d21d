use super::Operation;
use crate::schema::TableId;

/// Fields of a table queued for recalculation, in queue order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPendingCalculations {
    pub table_id: TableId,
}

impl From<QueryPendingCalculations> for Operation {
    fn from(value: QueryPendingCalculations) -> Operation {
        Operation::QueryPendingCalculations(value)
    }
}
