#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `parser` turns the semi-structured text smbclient prints into typed
//! results: directory listings into [`FileInfo`](smb_core::FileInfo)
//! records, `allinfo` blocks into size/mtime/mode triples, and failure
//! text into the workspace error taxonomy.
//!
//! # Design
//!
//! The parser is stateless; every function takes the response lines it
//! should interpret and returns values or errors. There is no grammar to
//! lean on, so three rules keep the fragility contained:
//!
//! - Failure detection is a single versioned substring table
//!   ([`check_for_error`]); a phrasing change in the client is a one-place
//!   update.
//! - Listing lines are tokenised right-to-left around the column gap the
//!   client prints after the name, so names containing spaces survive.
//! - Timestamps carry no zone information and are interpreted in the
//!   share's configured zone, never the local one.
//!
//! # Invariants
//!
//! - Absence of a recognised failure substring is the only success signal;
//!   [`check_for_error`] must run before any response is treated as
//!   successful.
//! - `.` and `..` entries and the summary trailer never appear in parsed
//!   listings.
//! - A directory marker in the attribute cluster forces the directory kind
//!   regardless of the size column.
//!
//! # Errors
//!
//! [`check_for_error`] raises [`smb_core::Error`] directly. The structural
//! parsers return [`ParseError`] for malformed input, which the facade
//! folds into [`smb_core::Error::Command`]; individual unparseable listing
//! lines are skipped with a debug-level trace instead of failing the whole
//! listing.

mod info;
mod listing;
mod status;
mod timestamp;

pub use info::{AllInfo, parse_all_info};
pub use listing::parse_directory_listing;
pub use status::check_for_error;

use thiserror::Error;

/// Structural parse failures for otherwise successful responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A timestamp field could not be interpreted.
    #[error("unrecognised timestamp: {0:?}")]
    Timestamp(String),

    /// A size field was not a decimal byte count.
    #[error("unrecognised size field: {0:?}")]
    Size(String),

    /// An attribute cluster contained an unknown letter.
    #[error("unrecognised attribute cluster: {0:?}")]
    Attributes(String),

    /// A required key was absent from a verbose-info block.
    #[error("verbose info output is missing the {0:?} field")]
    MissingField(&'static str),
}
