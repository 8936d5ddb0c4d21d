use super::Operation;
use crate::schema::View;

#[derive(Debug, Clone, PartialEq)]
pub struct InsertView {
    pub view: View,
}

impl From<InsertView> for Operation {
    fn from(value: InsertView) -> Operation {
        Operation::InsertView(value)
    }
}
