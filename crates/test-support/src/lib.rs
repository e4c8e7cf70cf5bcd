#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Shared helpers for subprocess-driven tests.
//!
//! The workspace tests the session layer against scripted `sh` doubles
//! standing in for the real client binary; this crate holds the plumbing
//! for writing those scripts to a scratch directory with the executable
//! bit set.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes an executable `sh` script into `dir` and returns its path.
///
/// The `#!/bin/sh` interpreter line is prepended; `body` is the rest of
/// the script verbatim.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).expect("script should be writable");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("script permissions should apply");
    path
}

/// The prompt marker the fake clients print between command responses.
pub const FAKE_PROMPT: &str = "smb: \\>";
