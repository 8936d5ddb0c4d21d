use super::Operation;
use crate::schema::FieldId;

/// Every edge entering or leaving any of the fields.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryReferences {
    pub field_ids: Vec<FieldId>,
}

impl From<QueryReferences> for Operation {
    fn from(value: QueryReferences) -> Operation {
        Operation::QueryReferences(value)
    }
}
