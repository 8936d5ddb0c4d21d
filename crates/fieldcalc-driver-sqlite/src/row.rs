use fieldcalc_core::{
    op::{FieldOp, FieldOpRecord},
    schema::{Cell, Field, FieldId, FieldType, Reference, ReferenceKind, View},
    Result,
};

/// A field row as stored, before its JSON columns are decoded.
pub(crate) struct FieldRow {
    id: String,
    table_id: String,
    name: String,
    description: Option<String>,
    ty: String,
    is_lookup: bool,
    is_primary: bool,
    options: String,
    lookup_options: Option<String>,
    has_error: bool,
    version: i64,
}

impl FieldRow {
    /// Reads the columns listed in `FIELD_COLUMNS`, in order.
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FieldRow> {
        Ok(FieldRow {
            id: row.get(0)?,
            table_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            ty: row.get(4)?,
            is_lookup: row.get(5)?,
            is_primary: row.get(6)?,
            options: row.get(7)?,
            lookup_options: row.get(8)?,
            has_error: row.get(9)?,
            version: row.get(10)?,
        })
    }

    pub(crate) fn into_field(self) -> Result<Field> {
        Ok(Field {
            id: self.id.into(),
            table_id: self.table_id.into(),
            name: self.name,
            description: self.description,
            ty: self.ty.parse::<FieldType>()?,
            is_lookup: self.is_lookup,
            is_primary: self.is_primary,
            options: serde_json::from_str(&self.options)?,
            lookup_options: self
                .lookup_options
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            has_error: self.has_error,
            version: self.version as u64,
        })
    }
}

pub(crate) struct ReferenceRow {
    from: String,
    to: String,
    kind: String,
}

impl ReferenceRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReferenceRow> {
        Ok(ReferenceRow {
            from: row.get(0)?,
            to: row.get(1)?,
            kind: row.get(2)?,
        })
    }

    pub(crate) fn into_reference(self) -> Result<Reference> {
        Ok(Reference {
            from: self.from.into(),
            to: self.to.into(),
            kind: self.kind.parse::<ReferenceKind>()?,
        })
    }
}

pub(crate) struct ViewRow {
    id: String,
    table_id: String,
    name: String,
    column_order: String,
}

impl ViewRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ViewRow> {
        Ok(ViewRow {
            id: row.get(0)?,
            table_id: row.get(1)?,
            name: row.get(2)?,
            column_order: row.get(3)?,
        })
    }

    pub(crate) fn into_view(self) -> Result<View> {
        Ok(View {
            id: self.id.into(),
            table_id: self.table_id.into(),
            name: self.name,
            column_order: serde_json::from_str::<Vec<FieldId>>(&self.column_order)?,
        })
    }
}

pub(crate) struct CellRow {
    record_id: String,
    field_id: String,
    value: String,
}

impl CellRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CellRow> {
        Ok(CellRow {
            record_id: row.get(0)?,
            field_id: row.get(1)?,
            value: row.get(2)?,
        })
    }

    pub(crate) fn into_cell(self) -> Result<Cell> {
        Ok(Cell {
            record_id: self.record_id.into(),
            field_id: self.field_id.into(),
            value: serde_json::from_str(&self.value)?,
        })
    }
}

pub(crate) struct FieldOpRow {
    seq: i64,
    table_id: String,
    field_id: String,
    op: String,
}

impl FieldOpRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FieldOpRow> {
        Ok(FieldOpRow {
            seq: row.get(0)?,
            table_id: row.get(1)?,
            field_id: row.get(2)?,
            op: row.get(3)?,
        })
    }

    pub(crate) fn into_record(self) -> Result<FieldOpRecord> {
        Ok(FieldOpRecord {
            seq: self.seq as u64,
            table_id: self.table_id.into(),
            field_id: self.field_id.into(),
            op: serde_json::from_str::<FieldOp>(&self.op)?,
        })
    }
}
