use super::Operation;
use crate::schema::Reference;

/// Inserts reference edges, ignoring ones already present.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertReferences {
    pub edges: Vec<Reference>,
}

impl From<InsertReferences> for Operation {
    fn from(value: InsertReferences) -> Operation {
        Operation::InsertReferences(value)
    }
}
