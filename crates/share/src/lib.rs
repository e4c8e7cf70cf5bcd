#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `share` is the facade of the workspace: [`Share`] translates each
//! filesystem-style operation on a remote SMB share into framed commands
//! on one owned interactive client session, or into a dedicated raw
//! transfer session for streaming reads and writes, and runs the output
//! parser's error classification on every response before a call is
//! treated as successful.
//!
//! # Design
//!
//! The interactive session is lazily connected and lives behind a mutex,
//! modelled as an explicit lifecycle (`Unconnected` → `Ready` →
//! `Invalid`). Transport failures invalidate the session and the next
//! call spawns a replacement; share-level failures (not-found, access
//! denied, ...) leave it connected. Remote paths are escaped into the
//! client's quoting rules before they enter a command line, which also
//! guarantees user-supplied names cannot forge a prompt boundary.
//!
//! # Invariants
//!
//! - At most one interactive session exists per [`Share`]; a stale one is
//!   replaced, never reused.
//! - Commands on the interactive session are serialized; responses are
//!   consumed 1:1 in command order.
//! - Every management response passes through error classification before
//!   the operation returns success.
//! - Streaming operations never touch the interactive session.
//!
//! # Errors
//!
//! All operations return [`smb_core::Error`]. Session-layer failures are
//! folded into [`smb_core::Error::Connection`]; the remaining variants
//! are classifications of the client's response text, bound to the
//! offending path.

mod escape;
mod share;

pub use share::Share;
