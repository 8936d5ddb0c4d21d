use super::Operation;
use crate::schema::FieldId;

#[derive(Debug, Clone, PartialEq)]
pub struct FindField {
    pub field_id: FieldId,
}

impl From<FindField> for Operation {
    fn from(value: FindField) -> Operation {
        Operation::FindField(value)
    }
}
