//! Field operations.
//!
//! Every change to a field's properties is expressed as a [`FieldOp`] carrying
//! the expected old value and the new value. Applying an op checks the old
//! value first, so a concurrent change is detected instead of overwritten.
//! Applied ops are appended to the store's operation log with their resolved
//! old value, which makes each log entry invertible.

use crate::{
    schema::{Field, FieldId, TableId},
    Error, Result,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FieldOp {
    #[serde(rename_all = "camelCase")]
    SetFieldProperty {
        key: FieldProperty,

        /// Expected current value. `None` applies the op unconditionally.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_value: Option<Value>,

        new_value: Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldProperty {
    Name,
    Description,
    HasError,
    Options,
    LookupOptions,
}

/// The ops to apply to one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOps {
    pub field_id: FieldId,
    pub ops: Vec<FieldOp>,
}

/// An entry of the operation log.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOpRecord {
    pub seq: u64,
    pub table_id: TableId,
    pub field_id: FieldId,
    pub op: FieldOp,
}

impl FieldOp {
    pub fn set_property(key: FieldProperty, old_value: Option<Value>, new_value: Value) -> FieldOp {
        FieldOp::SetFieldProperty {
            key,
            old_value,
            new_value,
        }
    }

    /// Unconditionally flags the field as erroneous.
    pub fn set_has_error() -> FieldOp {
        FieldOp::set_property(FieldProperty::HasError, None, Value::Bool(true))
    }

    pub fn key(&self) -> FieldProperty {
        match self {
            FieldOp::SetFieldProperty { key, .. } => *key,
        }
    }

    /// The op undoing this one. Only ops read back from the log carry the
    /// resolved old value; an unconditional op inverts to setting `null`.
    pub fn invert(&self) -> FieldOp {
        match self {
            FieldOp::SetFieldProperty {
                key,
                old_value,
                new_value,
            } => FieldOp::SetFieldProperty {
                key: *key,
                old_value: Some(new_value.clone()),
                new_value: old_value.clone().unwrap_or(Value::Null),
            },
        }
    }
}

impl FieldOps {
    pub fn new(field_id: FieldId, ops: Vec<FieldOp>) -> FieldOps {
        FieldOps { field_id, ops }
    }
}

impl FieldProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldProperty::Name => "name",
            FieldProperty::Description => "description",
            FieldProperty::HasError => "hasError",
            FieldProperty::Options => "options",
            FieldProperty::LookupOptions => "lookupOptions",
        }
    }
}

impl fmt::Display for FieldProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Field {
    /// Reads a property as JSON.
    pub fn property(&self, key: FieldProperty) -> Result<Value> {
        Ok(match key {
            FieldProperty::Name => Value::String(self.name.clone()),
            FieldProperty::Description => serde_json::to_value(&self.description)?,
            FieldProperty::HasError => Value::Bool(self.has_error),
            FieldProperty::Options => serde_json::to_value(&self.options)?,
            FieldProperty::LookupOptions => serde_json::to_value(&self.lookup_options)?,
        })
    }

    fn set_property(&mut self, key: FieldProperty, value: Value) -> Result<()> {
        match key {
            FieldProperty::Name => self.name = serde_json::from_value(value)?,
            FieldProperty::Description => self.description = serde_json::from_value(value)?,
            FieldProperty::HasError => self.has_error = serde_json::from_value(value)?,
            FieldProperty::Options => self.options = serde_json::from_value(value)?,
            FieldProperty::LookupOptions => self.lookup_options = serde_json::from_value(value)?,
        }
        Ok(())
    }

    /// Applies an op, returning it with the old value resolved from the
    /// field's state before the change.
    ///
    /// Fails with a condition failed error, leaving the field untouched, if
    /// the op's expected old value differs from the current one.
    pub fn apply_op(&mut self, op: &FieldOp) -> Result<FieldOp> {
        let FieldOp::SetFieldProperty {
            key,
            old_value,
            new_value,
        } = op;

        let current = self.property(*key)?;

        if let Some(expected) = old_value {
            if *expected != current {
                return Err(Error::condition_failed(format!(
                    "field {} property `{}` expected {}, found {}",
                    self.id, key, expected, current
                )));
            }
        }

        self.set_property(*key, new_value.clone())?;

        Ok(FieldOp::SetFieldProperty {
            key: *key,
            old_value: Some(current),
            new_value: new_value.clone(),
        })
    }
}
