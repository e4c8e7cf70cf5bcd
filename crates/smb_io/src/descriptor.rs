//! Extra-descriptor roles and pipe creation.
//!
//! The spawned client locates its side channels at fixed descriptor
//! numbers; those numbers are a protocol contract with the client's
//! command line (`/proc/self/fd/N` operands) and must be reproduced
//! exactly.

#![allow(unsafe_code)]

use std::io;
use std::os::fd::{FromRawFd, OwnedFd, RawFd};

/// Role of one extra descriptor handed to the spawned client.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DescriptorRole {
    /// One-shot credential input, read by the client at startup.
    Credentials,
    /// Upload data input, read by the client during a `put`.
    UploadIn,
    /// Download data output, written by the client during a `get`.
    DownloadOut,
}

impl DescriptorRole {
    /// The descriptor number the client expects for this role.
    #[must_use]
    pub const fn child_fd(self) -> RawFd {
        match self {
            Self::Credentials => 3,
            Self::UploadIn => 4,
            Self::DownloadOut => 5,
        }
    }

    /// True when the child is the reading side of the pipe.
    pub(crate) const fn child_reads(self) -> bool {
        matches!(self, Self::Credentials | Self::UploadIn)
    }
}

/// Both ends of a freshly created pipe.
pub(crate) struct Pipe {
    pub(crate) read: OwnedFd,
    pub(crate) write: OwnedFd,
}

/// Creates a pipe with both ends close-on-exec.
///
/// The end destined for the child is re-mapped (and thereby stripped of
/// the flag) in the spawn hook; everything else must not leak into
/// unrelated children.
pub(crate) fn pipe() -> io::Result<Pipe> {
    let mut fds = [0 as RawFd; 2];
    // SAFETY: `fds` is a valid two-element array for pipe2 to fill.
    if unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) } == -1 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: pipe2 just returned two freshly opened descriptors that
    // nothing else owns.
    let (read, write) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
    Ok(Pipe { read, write })
}
