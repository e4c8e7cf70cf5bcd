//! Error taxonomy for share operations.

use thiserror::Error;

/// Errors surfaced by share operations.
///
/// Apart from [`Error::Connection`], every variant is a classification of
/// the response text the external client printed for a command, bound to
/// the path the command targeted. The underlying protocol has no explicit
/// success marker, so "no recognised failure text" is the only success
/// signal; classification therefore runs on every response before a call
/// is treated as successful.
#[derive(Debug, Error)]
pub enum Error {
    /// The client subprocess could not be spawned, authenticated, or kept
    /// alive long enough to complete the command.
    ///
    /// Fatal to the call that observed it. The owning facade replaces the
    /// session lazily on the next call; there is no automatic retry.
    #[error("connection to share failed: {0}")]
    Connection(String),

    /// The remote path does not exist.
    #[error("path not found: {path}")]
    NotFound {
        /// Path the failing command targeted.
        path: String,
    },

    /// The remote path already exists.
    #[error("path already exists: {path}")]
    AlreadyExists {
        /// Path the failing command targeted.
        path: String,
    },

    /// The server denied access to the path.
    #[error("access denied: {path}")]
    AccessDenied {
        /// Path the failing command targeted.
        path: String,
    },

    /// A directory removal was attempted on a non-empty directory.
    #[error("directory not empty: {path}")]
    NotEmpty {
        /// Path the failing command targeted.
        path: String,
    },

    /// The path exists but is the wrong kind for the operation, such as a
    /// file deletion aimed at a directory.
    #[error("invalid resource type: {path}")]
    InvalidType {
        /// Path the failing command targeted.
        path: String,
    },

    /// The operand contains bytes that cannot be represented in a single
    /// command line (newlines, carriage returns, NUL).
    #[error("path cannot be expressed as a client command operand: {path:?}")]
    InvalidPath {
        /// The rejected operand.
        path: String,
    },

    /// The client reported a failure this layer does not recognise.
    ///
    /// Carries the raw response line so the caller can diagnose phrasing
    /// this layer's lookup table does not yet know about.
    #[error("command failed on {path:?}: {raw}")]
    Command {
        /// Path the failing command targeted, empty when unknown.
        path: String,
        /// The unrecognised response text.
        raw: String,
    },
}

impl Error {
    /// Returns the remote path associated with the error, when one exists.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Connection(_) => None,
            Self::NotFound { path }
            | Self::AlreadyExists { path }
            | Self::AccessDenied { path }
            | Self::NotEmpty { path }
            | Self::InvalidType { path }
            | Self::InvalidPath { path }
            | Self::Command { path, .. } => Some(path),
        }
    }

    /// True when the error means the session itself is no longer usable.
    #[must_use]
    pub const fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path() {
        let err = Error::NotFound {
            path: "docs/missing.txt".to_owned(),
        };
        assert_eq!(err.to_string(), "path not found: docs/missing.txt");
    }

    #[test]
    fn path_accessor_returns_bound_path() {
        let err = Error::AccessDenied {
            path: "secret".to_owned(),
        };
        assert_eq!(err.path(), Some("secret"));
    }

    #[test]
    fn connection_error_has_no_path() {
        let err = Error::Connection("spawn failed".to_owned());
        assert_eq!(err.path(), None);
        assert!(err.is_connection_failure());
    }

    #[test]
    fn command_error_keeps_raw_text() {
        let err = Error::Command {
            path: "file".to_owned(),
            raw: "NT_STATUS_UNEXPECTED_IO_ERROR listing \\file".to_owned(),
        };
        assert!(err.to_string().contains("NT_STATUS_UNEXPECTED_IO_ERROR"));
    }
}
