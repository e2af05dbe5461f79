//! Error kinds for runcraft operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to report or recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Configuration could not be turned into a usable client
    ConfigInvalid,

    /// The API credential is absent or empty
    MissingCredential,

    /// A sampling parameter or argument is out of range
    InvalidParameter,

    // =========================================================================
    // Dispatch errors
    // =========================================================================
    /// The task type is not one of the known templates
    UnknownTaskType,

    // =========================================================================
    // Remote call errors
    // =========================================================================
    /// The remote model call failed; the provider error is the source
    RemoteCallFailed,

    /// The call was abandoned because the batch deadline elapsed
    Cancelled,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::MissingCredential => "MissingCredential",
            ErrorKind::InvalidParameter => "InvalidParameter",

            ErrorKind::UnknownTaskType => "UnknownTaskType",

            ErrorKind::RemoteCallFailed => "RemoteCallFailed",
            ErrorKind::Cancelled => "Cancelled",
        }
    }

    /// Check if this error kind is retryable by default.
    ///
    /// Nothing in runcraft retries; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::RemoteCallFailed)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::MissingCredential.to_string(), "MissingCredential");
        assert_eq!(ErrorKind::UnknownTaskType.to_string(), "UnknownTaskType");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::RemoteCallFailed.is_retryable());
        assert!(!ErrorKind::InvalidParameter.is_retryable());
        assert!(!ErrorKind::MissingCredential.is_retryable());
        assert!(!ErrorKind::Cancelled.is_retryable());
    }
}
