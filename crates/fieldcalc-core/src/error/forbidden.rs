use super::Error;

/// Error when an operation is never allowed on its target, e.g. deleting the
/// primary field of a table.
#[derive(Debug)]
pub(super) struct Forbidden {
    message: Box<str>,
}

impl std::error::Error for Forbidden {}

impl core::fmt::Display for Forbidden {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "forbidden: {}", self.message)
    }
}

impl Error {
    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Forbidden(Forbidden {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a forbidden error.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Forbidden(_))
    }
}
