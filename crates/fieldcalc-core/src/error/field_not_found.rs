use super::Error;

/// Error when a field lookup by id returns no results.
#[derive(Debug)]
pub(super) struct FieldNotFound {
    field_id: Box<str>,
}

impl std::error::Error for FieldNotFound {}

impl core::fmt::Display for FieldNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "field {} not found", self.field_id)
    }
}

impl Error {
    /// Creates a field not found error.
    pub fn field_not_found(field_id: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::FieldNotFound(FieldNotFound {
            field_id: field_id.to_string().into(),
        }))
    }

    /// Returns `true` if this error is a field not found error.
    pub fn is_field_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::FieldNotFound(_))
    }
}
