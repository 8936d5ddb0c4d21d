use super::Operation;
use crate::schema::{Link, LinkOptions};

#[derive(Debug, Clone, PartialEq)]
pub struct InsertLinks {
    pub options: LinkOptions,
    pub links: Vec<Link>,
}

impl From<InsertLinks> for Operation {
    fn from(value: InsertLinks) -> Operation {
        Operation::InsertLinks(value)
    }
}
