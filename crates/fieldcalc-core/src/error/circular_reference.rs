use super::Error;
use crate::schema::FieldId;

/// Error when a set of reference edges would make a field depend on itself.
#[derive(Debug)]
pub(super) struct CircularReference {
    path: Vec<FieldId>,
}

impl std::error::Error for CircularReference {}

impl core::fmt::Display for CircularReference {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("circular reference: ")?;
        for (index, field_id) in self.path.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{field_id}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a circular reference error from the cycle's field path.
    pub fn circular_reference(path: Vec<FieldId>) -> Error {
        Error::from(super::ErrorKind::CircularReference(CircularReference {
            path,
        }))
    }

    /// Returns `true` if this error is a circular reference error.
    pub fn is_circular_reference(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CircularReference(_))
    }
}
