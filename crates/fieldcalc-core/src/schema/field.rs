use super::{FieldId, FieldOptions, LinkOptions, LookupOptions, TableId};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Uniquely identifies the field across all tables.
    pub id: FieldId,

    /// The table owning the field
    pub table_id: TableId,

    pub name: String,

    pub description: Option<String>,

    /// Cell type of the field
    pub ty: FieldType,

    /// True if the field copies its values from a linked table. A lookup keeps
    /// the type of the field it looks up.
    pub is_lookup: bool,

    /// True if the field is the table's primary field. A primary field can
    /// never be deleted.
    pub is_primary: bool,

    pub options: FieldOptions,

    /// Set for lookup and rollup fields
    pub lookup_options: Option<LookupOptions>,

    /// True once a field the values are computed from has gone away
    pub has_error: bool,

    /// Incremented by every applied batch of field ops
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    SingleLineText,
    LongText,
    Number,
    Checkbox,
    Date,
    SingleSelect,
    MultipleSelect,
    Link,
    Formula,
    Rollup,
}

impl Field {
    /// Creates a plain, non-primary field with a generated id.
    pub fn new(table_id: TableId, name: impl Into<String>, ty: FieldType) -> Field {
        Field {
            id: FieldId::generate(),
            table_id,
            name: name.into(),
            description: None,
            ty,
            is_lookup: false,
            is_primary: false,
            options: FieldOptions::Plain,
            lookup_options: None,
            has_error: false,
            version: 1,
        }
    }

    pub fn with_id(mut self, id: impl Into<FieldId>) -> Field {
        self.id = id.into();
        self
    }

    pub fn primary(mut self) -> Field {
        self.is_primary = true;
        self
    }

    pub fn with_options(mut self, options: impl Into<FieldOptions>) -> Field {
        self.options = options.into();
        self
    }

    /// Turns the field into a lookup of `lookup_options.lookup_field_id`.
    pub fn lookup(mut self, lookup_options: LookupOptions) -> Field {
        self.is_lookup = true;
        self.lookup_options = Some(lookup_options);
        self
    }

    pub fn is_link(&self) -> bool {
        self.ty == FieldType::Link
    }

    /// Link options of a link field that is not itself a lookup.
    ///
    /// A lookup of a link field carries link options too, but owns no
    /// relation and no junction storage.
    pub fn owned_link_options(&self) -> Option<&LinkOptions> {
        if self.is_lookup || !self.is_link() {
            return None;
        }
        self.options.as_link()
    }
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::SingleLineText => "singleLineText",
            FieldType::LongText => "longText",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::SingleSelect => "singleSelect",
            FieldType::MultipleSelect => "multipleSelect",
            FieldType::Link => "link",
            FieldType::Formula => "formula",
            FieldType::Rollup => "rollup",
        }
    }

    /// True for types whose values are derived from other fields.
    pub fn is_computed(&self) -> bool {
        matches!(self, FieldType::Formula | FieldType::Rollup)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<FieldType> {
        Ok(match s {
            "singleLineText" => FieldType::SingleLineText,
            "longText" => FieldType::LongText,
            "number" => FieldType::Number,
            "checkbox" => FieldType::Checkbox,
            "date" => FieldType::Date,
            "singleSelect" => FieldType::SingleSelect,
            "multipleSelect" => FieldType::MultipleSelect,
            "link" => FieldType::Link,
            "formula" => FieldType::Formula,
            "rollup" => FieldType::Rollup,
            _ => crate::bail!("unknown field type `{s}`"),
        })
    }
}
