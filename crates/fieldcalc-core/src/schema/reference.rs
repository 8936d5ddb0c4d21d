use super::{Field, FieldId, FieldOptions};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A directed edge: `to` is computed from `from`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// The depended-on field
    pub from: FieldId,

    /// The dependent field
    pub to: FieldId,

    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceKind {
    /// `to` reads the values of `from` (formula operand, looked-up field).
    Value,

    /// `to` fetches its values through the link field `from`.
    Lookup,
}

impl Reference {
    pub fn value(from: impl Into<FieldId>, to: impl Into<FieldId>) -> Reference {
        Reference {
            from: from.into(),
            to: to.into(),
            kind: ReferenceKind::Value,
        }
    }

    pub fn lookup(from: impl Into<FieldId>, to: impl Into<FieldId>) -> Reference {
        Reference {
            from: from.into(),
            to: to.into(),
            kind: ReferenceKind::Lookup,
        }
    }

    /// The inbound edges a field's options establish.
    pub fn derive(field: &Field) -> Vec<Reference> {
        let mut edges = vec![];

        if let FieldOptions::Formula(formula) = &field.options {
            for from in formula.references() {
                edges.push(Reference::value(from, field.id.clone()));
            }
        }

        if let Some(lookup) = &field.lookup_options {
            edges.push(Reference::value(
                lookup.lookup_field_id.clone(),
                field.id.clone(),
            ));
            edges.push(Reference::lookup(
                lookup.link_field_id.clone(),
                field.id.clone(),
            ));
        }

        edges
    }
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Value => "value",
            ReferenceKind::Lookup => "lookup",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<ReferenceKind> {
        match s {
            "value" => Ok(ReferenceKind::Value),
            "lookup" => Ok(ReferenceKind::Lookup),
            _ => crate::bail!("unknown reference kind `{s}`"),
        }
    }
}
