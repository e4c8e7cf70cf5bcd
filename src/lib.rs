#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `smb` is an SMB share client that drives the external Samba
//! `smbclient` binary instead of speaking the wire protocol itself. A
//! long-lived interactive subprocess carries the metadata and management
//! operations over prompt-framed command/response exchanges; dedicated
//! single-use subprocesses stream file contents through extra pipe
//! descriptors; credentials travel over a one-shot side channel the
//! client reads from `/proc/self/fd/3`.
//!
//! # Design
//!
//! The crate is a facade over the workspace members:
//!
//! - [`smb_core`] defines the shared vocabulary: [`SmbConfig`],
//!   [`Credentials`], [`FileInfo`], [`FileMode`], and [`Error`].
//! - `smb_io` owns the subprocesses: the prompt-framed interactive
//!   session and the raw transfer streams.
//! - `parser` turns the client's semi-structured output into typed
//!   records and typed errors.
//! - `share` composes them into [`Share`], the filesystem-style surface.
//!
//! # Invariants
//!
//! - One interactive session per [`Share`], serialized internally,
//!   replaced (never reused) once invalid.
//! - Absence of recognised failure text is the only success signal; every
//!   management response is classified before an operation returns.
//! - Closing an [`UploadStream`] blocks until the client-side upload has
//!   drained, so the remote write is durable on return.
//!
//! # Examples
//!
//! ```no_run
//! use smb::{Credentials, Share, SmbConfig};
//! use std::io::Read;
//!
//! let share = Share::new(
//!     SmbConfig::new("fileserver", "documents"),
//!     Credentials::new("alice", "secret").with_domain("WORKGROUP"),
//! );
//!
//! for entry in share.dir("/reports")? {
//!     println!("{} ({} bytes)", entry.name(), entry.size());
//! }
//!
//! let mut contents = String::new();
//! share.read("/reports/summary.txt")?.read_to_string(&mut contents)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # See also
//!
//! - [`Share`] for the full operation surface.
//! - [`Error`] for the failure taxonomy callers match on.

pub use share::Share;
pub use smb_core::{Credentials, Error, FileInfo, FileMode, SmbConfig};
pub use smb_io::{DescriptorRole, DownloadStream, UploadStream};

/// Direct access to the output parser, for callers driving their own
/// client sessions.
pub mod output {
    pub use parser::{
        AllInfo, ParseError, check_for_error, parse_all_info, parse_directory_listing,
    };
}
