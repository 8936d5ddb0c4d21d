use crate::{
    op::FieldOpRecord,
    schema::{Cell, Field, FieldId, Link, Reference, View},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows affected by a write
    Count(u64),
    Fields(Vec<Field>),
    FieldIds(Vec<FieldId>),
    Views(Vec<View>),
    References(Vec<Reference>),
    Cells(Vec<Cell>),
    Links(Vec<Link>),
    FieldOps(Vec<FieldOpRecord>),
}

macro_rules! response_rows {
    ( $( $ctor:ident, $into:ident, $variant:ident($ty:ty); )* ) => {
        impl Response {
            $(
                pub fn $ctor(rows: $ty) -> Response {
                    Response {
                        rows: Rows::$variant(rows),
                    }
                }

                pub fn $into(self) -> Result<$ty> {
                    match self.rows {
                        Rows::$variant(rows) => Ok(rows),
                        rows => Err(Error::invalid_result(format!(
                            concat!("expected ", stringify!($variant), ", got {}"),
                            rows.name()
                        ))),
                    }
                }
            )*
        }
    };
}

response_rows! {
    count, into_count, Count(u64);
    fields, into_fields, Fields(Vec<Field>);
    field_ids, into_field_ids, FieldIds(Vec<FieldId>);
    views, into_views, Views(Vec<View>);
    references, into_references, References(Vec<Reference>);
    cells, into_cells, Cells(Vec<Cell>);
    links, into_links, Links(Vec<Link>);
    field_ops, into_field_ops, FieldOps(Vec<FieldOpRecord>);
}

impl Response {
    /// Expects at most one field.
    pub fn into_field(self) -> Result<Option<Field>> {
        let mut fields = self.into_fields()?;
        match fields.len() {
            0 | 1 => Ok(fields.pop()),
            n => Err(Error::invalid_result(format!(
                "expected at most 1 field, found {n}"
            ))),
        }
    }
}

impl Rows {
    fn name(&self) -> &'static str {
        match self {
            Rows::Count(_) => "Count",
            Rows::Fields(_) => "Fields",
            Rows::FieldIds(_) => "FieldIds",
            Rows::Views(_) => "Views",
            Rows::References(_) => "References",
            Rows::Cells(_) => "Cells",
            Rows::Links(_) => "Links",
            Rows::FieldOps(_) => "FieldOps",
        }
    }
}
