use super::Operation;
use crate::{op::FieldOps, schema::TableId};

/// Applies field ops as one batch and appends them to the operation log.
///
/// Fails without applying anything if one op's old value does not match.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateFields {
    pub table_id: TableId,
    pub ops: Vec<FieldOps>,
}

impl From<UpdateFields> for Operation {
    fn from(value: UpdateFields) -> Operation {
        Operation::UpdateFields(value)
    }
}
