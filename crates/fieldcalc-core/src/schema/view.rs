use super::{FieldId, TableId, ViewId};

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub id: ViewId,
    pub table_id: TableId,
    pub name: String,

    /// Display order of the table's fields. Never names a field that does not
    /// exist.
    pub column_order: Vec<FieldId>,
}

impl View {
    pub fn new(table_id: TableId, name: impl Into<String>) -> View {
        View {
            id: ViewId::generate(),
            table_id,
            name: name.into(),
            column_order: vec![],
        }
    }

    /// Removes the given fields from the column order. Returns `true` if any
    /// was present; absent ids are ignored.
    pub fn remove_columns(&mut self, field_ids: &[FieldId]) -> bool {
        let before = self.column_order.len();
        self.column_order.retain(|id| !field_ids.contains(id));
        before != self.column_order.len()
    }

    /// Appends a field to the end of the column order unless already listed.
    pub fn push_column(&mut self, field_id: FieldId) -> bool {
        if self.column_order.contains(&field_id) {
            return false;
        }
        self.column_order.push(field_id);
        true
    }
}
