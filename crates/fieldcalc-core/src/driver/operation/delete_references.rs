use super::Operation;
use crate::schema::Reference;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReferences {
    pub edges: Vec<Reference>,
}

impl From<DeleteReferences> for Operation {
    fn from(value: DeleteReferences) -> Operation {
        Operation::DeleteReferences(value)
    }
}
