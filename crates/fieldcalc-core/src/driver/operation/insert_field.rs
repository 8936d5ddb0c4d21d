use super::Operation;
use crate::schema::Field;

/// Inserts a field record. A link field owning a relation also gets its
/// junction storage.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertField {
    pub field: Field,
}

impl From<InsertField> for Operation {
    fn from(value: InsertField) -> Operation {
        Operation::InsertField(value)
    }
}
