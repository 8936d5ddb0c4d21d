use super::{FieldId, TableId};
use serde::{Deserialize, Serialize};

/// Type-specific field options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldOptions {
    #[default]
    Plain,
    Link(LinkOptions),
    Formula(FormulaOptions),
    Rollup(RollupOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relationship {
    ManyMany,
    ManyOne,
    OneMany,
    OneOne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOptions {
    pub relationship: Relationship,

    /// Table on the other side of the relation
    pub foreign_table_id: TableId,

    /// Field of the foreign table displayed in link cells, usually its primary field
    pub lookup_field_id: FieldId,

    /// The reciprocal link field on the foreign table, if the link is bidirectional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetric_field_id: Option<FieldId>,

    /// Name of the junction storage holding the relation's record pairs
    pub fk_host_table_name: String,

    pub self_key_name: String,

    pub foreign_key_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaOptions {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupOptions {
    pub expression: String,
}

/// Where a lookup or rollup field takes its values from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupOptions {
    pub foreign_table_id: TableId,

    /// Link field of the owning table the values are fetched through
    pub link_field_id: FieldId,

    /// Field of the foreign table whose values are fetched
    pub lookup_field_id: FieldId,
}

impl FieldOptions {
    pub fn as_link(&self) -> Option<&LinkOptions> {
        match self {
            FieldOptions::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_link_mut(&mut self) -> Option<&mut LinkOptions> {
        match self {
            FieldOptions::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_formula(&self) -> Option<&FormulaOptions> {
        match self {
            FieldOptions::Formula(formula) => Some(formula),
            _ => None,
        }
    }
}

impl FormulaOptions {
    pub fn new(expression: impl Into<String>) -> FormulaOptions {
        FormulaOptions {
            expression: expression.into(),
        }
    }

    /// Field ids referenced by the expression as `{fieldId}` tokens, in order
    /// of first appearance.
    pub fn references(&self) -> Vec<FieldId> {
        let mut refs: Vec<FieldId> = vec![];
        let mut rest = self.expression.as_str();

        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                break;
            };

            let token = after[..end].trim();
            if !token.is_empty() && !refs.iter().any(|id| id.as_str() == token) {
                refs.push(FieldId::from(token));
            }

            rest = &after[end + 1..];
        }

        refs
    }
}

impl From<LinkOptions> for FieldOptions {
    fn from(value: LinkOptions) -> Self {
        FieldOptions::Link(value)
    }
}

impl From<FormulaOptions> for FieldOptions {
    fn from(value: FormulaOptions) -> Self {
        FieldOptions::Formula(value)
    }
}

impl From<RollupOptions> for FieldOptions {
    fn from(value: RollupOptions) -> Self {
        FieldOptions::Rollup(value)
    }
}
