use super::Operation;
use crate::schema::LinkOptions;

/// Drops the junction storage of a link relation.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanForeignKey {
    pub options: LinkOptions,
}

impl From<CleanForeignKey> for Operation {
    fn from(value: CleanForeignKey) -> Operation {
        Operation::CleanForeignKey(value)
    }
}
