use super::Operation;
use crate::schema::LinkOptions;

/// Rows of a relation's junction storage; empty once it has been dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLinks {
    pub options: LinkOptions,
}

impl From<QueryLinks> for Operation {
    fn from(value: QueryLinks) -> Operation {
        Operation::QueryLinks(value)
    }
}
