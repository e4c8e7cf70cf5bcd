#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `smb_io` owns every subprocess the SMB client workspace spawns. It
//! provides [`ClientSession`], the long-lived interactive smbclient
//! process with prompt-synchronized command/response framing and a
//! one-shot credential side channel, and the raw transfer streams
//! ([`DownloadStream`], [`UploadStream`]) that move a single file's bytes
//! through dedicated pipe descriptors instead of the line-oriented
//! console.
//!
//! # Design
//!
//! The spawned client locates its extra channels at fixed descriptor
//! numbers; [`DescriptorRole`] enumerates them and [`ClientSession::spawn`]
//! re-maps freshly created pipes onto those numbers in the child. The
//! framing discipline is strict: one command in flight per session, each
//! command consuming exactly one prompt-delimited response, enforced by
//! `execute` taking `&mut self`.
//!
//! # Invariants
//!
//! - Credentials are written at most once per session, before the first
//!   command, and the side channel is closed immediately afterwards.
//! - Responses are consumed in command order; a response is never
//!   re-readable.
//! - Every read awaiting client output passes through a poll-based
//!   liveness bound; a dead or wedged child fails the read instead of
//!   blocking forever.
//! - Raw transfer children are single-use and stay referenced for the
//!   lifetime of the stream handed to the caller; an upload's close blocks
//!   until the child has drained and exited.
//!
//! # Errors
//!
//! All operations surface [`SessionError`]. The facade crate folds these
//! into its public connection-error variant; this crate never interprets
//! response text beyond the connection-fatal markers used to explain an
//! unexpected EOF.

mod descriptor;
mod error;
mod prompt;
mod raw;
mod session;

pub use descriptor::DescriptorRole;
pub use error::SessionError;
pub use raw::{DownloadStream, UploadStream, open_download, open_upload};
pub use session::ClientSession;
