//! Interactive client session management.

#![allow(unsafe_code)]

use std::fs::File;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use smb_core::Credentials;
use zeroize::Zeroizing;

use crate::descriptor::{self, DescriptorRole};
use crate::error::SessionError;
use crate::prompt::PromptReader;

/// Floor for staging descriptors in the spawn hook, safely above every
/// re-map target.
const STAGED_FD_FLOOR: libc::c_int = 100;

/// Owns one spawned client subprocess and its channels.
///
/// An interactive session (spawned with the credential role only) carries
/// line-oriented commands over stdin/stdout; a raw transfer session
/// additionally carries one data descriptor and never sees a command.
/// Exactly one command may be in flight at a time, which `execute` taking
/// `&mut self` enforces structurally.
///
/// Dropping a session terminates the child; use
/// [`close`](Self::close) with `terminate = false` for the drain-and-wait
/// teardown an upload needs.
#[derive(Debug)]
pub struct ClientSession {
    child: Child,
    stdin: Option<ChildStdin>,
    reader: PromptReader<ChildStdout>,
    credential_sink: Option<OwnedFd>,
    upload_sink: Option<OwnedFd>,
    download_source: Option<OwnedFd>,
}

impl ClientSession {
    /// Spawns the client with the given arguments and extra descriptors.
    ///
    /// Each requested role gets a fresh pipe whose child-side end is
    /// re-mapped onto the role's fixed descriptor number before exec; the
    /// parent keeps the opposite end. stdin/stdout are piped for command
    /// framing and stderr is discarded.
    pub fn spawn(
        binary: &Path,
        args: &[String],
        roles: &[DescriptorRole],
        read_timeout: Duration,
    ) -> Result<Self, SessionError> {
        let mut command = Command::new(binary);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut mappings: Vec<(RawFd, RawFd)> = Vec::new();
        let mut child_ends: Vec<OwnedFd> = Vec::new();
        let mut credential_sink = None;
        let mut upload_sink = None;
        let mut download_source = None;

        for &role in roles {
            let pipe = descriptor::pipe()?;
            let (child_end, parent_end) = if role.child_reads() {
                (pipe.read, pipe.write)
            } else {
                (pipe.write, pipe.read)
            };
            mappings.push((child_end.as_raw_fd(), role.child_fd()));
            child_ends.push(child_end);
            match role {
                DescriptorRole::Credentials => credential_sink = Some(parent_end),
                DescriptorRole::UploadIn => upload_sink = Some(parent_end),
                DescriptorRole::DownloadOut => download_source = Some(parent_end),
            }
        }

        // SAFETY: the hook runs between fork and exec and only performs
        // async-signal-safe calls (fcntl, dup2) on descriptors captured by
        // value.
        unsafe {
            command.pre_exec(move || remap_descriptors(&mappings));
        }

        tracing::debug!(client = %binary.display(), ?roles, "spawning client session");
        let mut child = command.spawn().map_err(|source| SessionError::Spawn {
            client: binary.display().to_string(),
            source,
        })?;

        // The child holds its re-mapped copies now; the parent must not
        // keep the child-side ends open or EOF would never be delivered.
        drop(child_ends);

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (Some(stdin), Some(stdout)) = (stdin, stdout) else {
            return Err(SessionError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child stdio was not piped",
            )));
        };

        Ok(Self {
            child,
            stdin: Some(stdin),
            reader: PromptReader::new(stdout, read_timeout),
            credential_sink,
            upload_sink,
            download_source,
        })
    }

    /// Writes `username\npassword\n` to the credential side channel, then
    /// closes it.
    ///
    /// Must happen exactly once per session, before any command; the
    /// client starts producing its greeting and prompt right after.
    pub fn write_credentials(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        let Some(fd) = self.credential_sink.take() else {
            return Err(SessionError::CredentialChannelClosed);
        };
        let mut channel = File::from(fd);
        let payload = Zeroizing::new(format!(
            "{}\n{}\n",
            credentials.qualified_username(),
            credentials.password()
        ));
        channel.write_all(payload.as_bytes())?;
        channel.flush()?;
        Ok(())
    }

    /// Runs one command and returns its prompt-delimited response lines.
    ///
    /// The first prompt sighting after the write closes the echo segment;
    /// the second delimits the response. Blocks until both are observed,
    /// subject to the session's liveness bound.
    pub fn execute(&mut self, command: &str) -> Result<Vec<String>, SessionError> {
        let stdin = self.stdin.as_mut().ok_or(SessionError::Disconnected)?;
        // A dead client keeps its final output readable; a broken write
        // falls through to the read so the EOF can be explained from it.
        if let Err(err) = write_command(stdin, command) {
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(SessionError::Io(err));
            }
        }
        tracing::trace!(command, "client command issued");

        let _echo = self.reader.read_until_prompt()?;
        self.reader.read_until_prompt()
    }

    /// True while the child is running and its command channel is open.
    pub fn is_alive(&mut self) -> bool {
        self.stdin.is_some() && matches!(self.child.try_wait(), Ok(None))
    }

    /// Hands out the parent end of the upload data pipe.
    pub(crate) fn take_upload_sink(&mut self) -> Option<OwnedFd> {
        self.upload_sink.take()
    }

    /// Hands out the parent end of the download data pipe.
    pub(crate) fn take_download_source(&mut self) -> Option<OwnedFd> {
        self.download_source.take()
    }

    /// Closes the session.
    ///
    /// With `terminate` the child is killed outright. Without it, stdin
    /// and the parent's write-side descriptors are closed and the call
    /// blocks until the child exits on its own; an upload uses this so the
    /// remote write is durable before teardown returns.
    pub fn close(mut self, terminate: bool) -> io::Result<()> {
        if terminate {
            let _ = self.child.kill();
        } else {
            self.stdin.take();
            self.credential_sink.take();
            self.upload_sink.take();
        }
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.stdin.take();

        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }

        let _ = self.child.wait();
    }
}

fn write_command(stdin: &mut ChildStdin, command: &str) -> io::Result<()> {
    stdin.write_all(command.as_bytes())?;
    stdin.write_all(b"\n")?;
    stdin.flush()
}

/// Runs in the forked child; async-signal-safe calls only.
///
/// Every source is first staged above the target range with
/// `F_DUPFD_CLOEXEC`, so a source that happens to occupy another mapping's
/// target number cannot be clobbered mid-loop. `dup2` then lands the
/// staged copy on the contract number and clears its close-on-exec flag;
/// the staged copies and original pipe ends all close at exec.
fn remap_descriptors(mappings: &[(RawFd, RawFd)]) -> io::Result<()> {
    for &(source, target) in mappings {
        // SAFETY: plain syscalls on descriptors owned by this process image.
        let staged = unsafe { libc::fcntl(source, libc::F_DUPFD_CLOEXEC, STAGED_FD_FLOOR) };
        if staged == -1 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: `staged` was just returned as a valid descriptor.
        if unsafe { libc::dup2(staged, target) } == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use test_support::write_script;

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Double that answers every command with `echo:<command>` between two
    /// prompts, after an initial greeting.
    const ECHO_DOUBLE: &str = r#"printf 'Anonymous login successful\n'
while IFS= read -r line; do
  printf 'smb: \\> \n'
  printf 'echo:%s\n' "$line"
  printf 'smb: \\> \n'
done
"#;

    #[test]
    fn responses_map_to_commands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo-client", ECHO_DOUBLE);
        let mut session = ClientSession::spawn(&script, &[], &[], TIMEOUT).unwrap();

        assert_eq!(session.execute("one").unwrap(), vec!["echo:one".to_owned()]);
        assert_eq!(session.execute("two").unwrap(), vec!["echo:two".to_owned()]);
        assert_eq!(
            session.execute("three").unwrap(),
            vec!["echo:three".to_owned()]
        );
    }

    #[test]
    fn greeting_is_discarded_with_the_echo_segment() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo-client", ECHO_DOUBLE);
        let mut session = ClientSession::spawn(&script, &[], &[], TIMEOUT).unwrap();

        // The greeting precedes the first prompt and must not leak into
        // the first response.
        assert_eq!(
            session.execute("first").unwrap(),
            vec!["echo:first".to_owned()]
        );
    }

    #[test]
    fn credentials_reach_the_side_channel() {
        let dir = tempfile::tempdir().unwrap();
        let capture = dir.path().join("credentials.txt");
        let body = format!(
            "cat <&3 > '{}'\nwhile IFS= read -r line; do\n  printf 'smb: \\\\> \\n'\n  printf 'ok\\n'\n  printf 'smb: \\\\> \\n'\ndone\n",
            capture.display()
        );
        let script = write_script(dir.path(), "cred-client", &body);

        let mut session =
            ClientSession::spawn(&script, &[], &[DescriptorRole::Credentials], TIMEOUT).unwrap();
        let credentials = Credentials::new("alice", "secret").with_domain("WORKGROUP");
        session.write_credentials(&credentials).unwrap();

        assert_eq!(session.execute("noop").unwrap(), vec!["ok".to_owned()]);
        let captured = std::fs::read_to_string(&capture).unwrap();
        assert_eq!(captured, "WORKGROUP\\alice\nsecret\n");
    }

    #[test]
    fn credentials_write_is_single_shot() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "sink-client", "cat <&3 >/dev/null\nsleep 5\n");
        let mut session =
            ClientSession::spawn(&script, &[], &[DescriptorRole::Credentials], TIMEOUT).unwrap();

        let credentials = Credentials::new("alice", "secret");
        session.write_credentials(&credentials).unwrap();
        let err = session.write_credentials(&credentials).unwrap_err();
        assert!(matches!(err, SessionError::CredentialChannelClosed));
    }

    #[test]
    fn stalled_client_fails_within_the_bound() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "mute-client", "sleep 30\n");
        let mut session =
            ClientSession::spawn(&script, &[], &[], Duration::from_millis(100)).unwrap();

        let err = session.execute("anything").unwrap_err();
        assert!(matches!(err, SessionError::Stalled { .. }));
    }

    #[test]
    fn dead_client_fails_instead_of_hanging() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "dying-client", "exit 0\n");
        let mut session = ClientSession::spawn(&script, &[], &[], TIMEOUT).unwrap();

        let err = session.execute("anything").unwrap_err();
        assert!(matches!(err, SessionError::Disconnected));
    }

    #[test]
    fn logon_failure_text_explains_the_eof() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            "reject-client",
            "printf 'session setup failed: NT_STATUS_LOGON_FAILURE\\n'\nexit 1\n",
        );
        let mut session = ClientSession::spawn(&script, &[], &[], TIMEOUT).unwrap();

        let err = session.execute("anything").unwrap_err();
        match err {
            SessionError::Rejected(detail) => {
                assert!(detail.contains("NT_STATUS_LOGON_FAILURE"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = ClientSession::spawn(
            Path::new("/nonexistent/smbclient"),
            &[],
            &[],
            TIMEOUT,
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Spawn { .. }));
    }

    #[test]
    fn liveness_reflects_child_exit() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "short-client", "exit 0\n");
        let mut session = ClientSession::spawn(&script, &[], &[], TIMEOUT).unwrap();

        // Give the child a moment to exit.
        std::thread::sleep(Duration::from_millis(100));
        assert!(!session.is_alive());
    }
}
