use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    (
        $( #[$attrs:meta] )*
        $name:ident, $prefix:literal
    ) => {
        $( #[$attrs] )*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a new random id.
            pub fn generate() -> $name {
                $name(format!("{}{}", $prefix, uuid::Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> $name {
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> $name {
                $name(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id! {
    /// Identifies a table.
    TableId, "tbl"
}

define_id! {
    /// Identifies a field (column). Unique across all tables.
    FieldId, "fld"
}

define_id! {
    /// Identifies a view of a table.
    ViewId, "viw"
}

define_id! {
    /// Identifies a record (row).
    RecordId, "rec"
}
