use super::TableId;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            id: TableId::generate(),
            name: name.into(),
        }
    }
}
