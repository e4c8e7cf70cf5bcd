#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `smb_core` holds the vocabulary shared by every crate in the SMB client
//! workspace: the public error taxonomy, the connection configuration and
//! credential types handed in by the caller, and the file-metadata value
//! types produced when smbclient output is parsed.
//!
//! # Design
//!
//! The crate is deliberately leaf-level: it performs no I/O and spawns no
//! processes. Higher layers depend on it in one direction only:
//!
//! - `parser` turns response lines into [`FileInfo`] values and [`Error`]
//!   classifications.
//! - `smb_io` consumes [`Credentials`] when feeding the side channel.
//! - `share` owns an [`SmbConfig`] and surfaces [`Error`] to callers.
//!
//! # Invariants
//!
//! - [`FileMode`] attribute letters encode and decode losslessly regardless
//!   of letter order in the cluster.
//! - [`Credentials`] never exposes the password through `Debug`, and the
//!   backing buffer is zeroed on drop.
//! - Every [`Error`] variant that can be tied to a remote path carries it.
//!
//! # Errors
//!
//! [`Error`] is the single error type callers of the facade see. Transport
//! failures from the session layer are folded into [`Error::Connection`];
//! everything else is a classification of smbclient's response text.

mod config;
mod error;
mod file_info;

pub use config::{Credentials, SmbConfig};
pub use error::Error;
pub use file_info::{FileInfo, FileMode};
