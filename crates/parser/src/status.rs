//! Failure-text classification.

use smb_core::Error;

/// Typed classifications for known failure substrings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Classification {
    NotFound,
    AlreadyExists,
    AccessDenied,
    NotEmpty,
    InvalidType,
}

impl Classification {
    fn into_error(self, path: &str) -> Error {
        let path = path.to_owned();
        match self {
            Self::NotFound => Error::NotFound { path },
            Self::AlreadyExists => Error::AlreadyExists { path },
            Self::AccessDenied => Error::AccessDenied { path },
            Self::NotEmpty => Error::NotEmpty { path },
            Self::InvalidType => Error::InvalidType { path },
        }
    }
}

/// Known NT status substrings, matched anywhere in a response line.
///
/// Kept as one table so smbclient phrasing changes are a single-place
/// update. Entries are checked in order; the first match on a line wins.
const STATUS_TABLE: &[(&str, Classification)] = &[
    ("NT_STATUS_NO_SUCH_FILE", Classification::NotFound),
    ("NT_STATUS_OBJECT_NAME_NOT_FOUND", Classification::NotFound),
    ("NT_STATUS_OBJECT_PATH_NOT_FOUND", Classification::NotFound),
    ("NT_STATUS_OBJECT_NAME_COLLISION", Classification::AlreadyExists),
    ("NT_STATUS_ACCESS_DENIED", Classification::AccessDenied),
    ("NT_STATUS_DIRECTORY_NOT_EMPTY", Classification::NotEmpty),
    ("NT_STATUS_FILE_IS_A_DIRECTORY", Classification::InvalidType),
    ("NT_STATUS_NOT_A_DIRECTORY", Classification::InvalidType),
];

/// Marker shared by every failure line the client prints.
const STATUS_MARKER: &str = "NT_STATUS_";

/// Scans a response for failure text and raises the matching typed error.
///
/// The underlying protocol has no explicit success marker; a response is
/// successful exactly when this scan finds nothing. A line carrying the
/// status marker without a table match becomes [`Error::Command`] with the
/// raw line preserved for diagnosis.
pub fn check_for_error(lines: &[String], path: &str) -> Result<(), Error> {
    for line in lines {
        for (needle, classification) in STATUS_TABLE {
            if line.contains(needle) {
                return Err(classification.into_error(path));
            }
        }
        if line.contains(STATUS_MARKER) {
            return Err(Error::Command {
                path: path.to_owned(),
                raw: line.clone(),
            });
        }
    }
    Ok(())
}
