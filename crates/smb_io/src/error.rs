//! Transport-level session errors.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::descriptor::DescriptorRole;

/// Failures of the subprocess transport.
///
/// These describe the session itself, never the remote filesystem: a
/// command that the client executed and answered with failure text is a
/// *successful* session round trip and is classified by the parser layer
/// instead.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The client binary could not be started.
    #[error("failed to spawn client {client:?}: {source}")]
    Spawn {
        /// The binary that was invoked.
        client: String,
        /// The underlying spawn failure.
        #[source]
        source: io::Error,
    },

    /// The client exited while output was still expected, after printing
    /// text that explains why the session could not be established.
    #[error("client ended the session: {0}")]
    Rejected(String),

    /// The client exited while output was still expected, without any
    /// recognisable explanation.
    #[error("client exited without completing the response")]
    Disconnected,

    /// No output arrived within the liveness bound.
    #[error("timed out after {timeout:?} waiting for client output")]
    Stalled {
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The credential side channel is closed, either because credentials
    /// were already written or because the session was spawned without one.
    #[error("credential channel is closed or was already written")]
    CredentialChannelClosed,

    /// A data descriptor was requested that the session was not spawned
    /// with, or that was already handed out.
    #[error("session has no descriptor for role {role:?}")]
    MissingDescriptor {
        /// The absent role.
        role: DescriptorRole,
    },

    /// Plain I/O failure on one of the session's pipes.
    #[error("client session I/O failed: {0}")]
    Io(#[from] io::Error),
}
