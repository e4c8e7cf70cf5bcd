//! The share facade.

use std::sync::{Mutex, PoisonError};

use parser::{check_for_error, parse_all_info, parse_directory_listing};
use smb_core::{Credentials, Error, FileInfo, FileMode, SmbConfig};
use smb_io::{
    ClientSession, DescriptorRole, DownloadStream, SessionError, UploadStream, open_download,
    open_upload,
};

use crate::escape::{escape_local_path, escape_path};

/// Lowercase attribute letters understood by `setmode`, in command order.
const SETMODE_LETTERS: [(FileMode, char); 4] = [
    (FileMode::READONLY, 'r'),
    (FileMode::HIDDEN, 'h'),
    (FileMode::ARCHIVE, 'a'),
    (FileMode::SYSTEM, 's'),
];

/// Lifecycle of the owned interactive session.
///
/// The only allowed forward transition out of `Invalid` or `Unconnected`
/// is a fresh spawn on the next interactive call.
enum SessionState {
    Unconnected,
    Ready(ClientSession),
    Invalid,
}

/// One remote share, operated through a driven smbclient process.
///
/// Metadata and management operations run over a single lazily-connected
/// interactive session owned by this value; streaming reads and writes
/// spawn a dedicated single-use session each. Calls are serialized
/// internally, so a `Share` can be used behind a shared reference from
/// multiple threads, with the usual caveat that the interactive commands
/// queue up on one subprocess.
///
/// # Examples
///
/// ```no_run
/// use share::Share;
/// use smb_core::{Credentials, SmbConfig};
///
/// let share = Share::new(
///     SmbConfig::new("fileserver", "documents"),
///     Credentials::new("alice", "secret"),
/// );
/// for entry in share.dir("/reports")? {
///     println!("{} ({} bytes)", entry.name(), entry.size());
/// }
/// # Ok::<(), smb_core::Error>(())
/// ```
pub struct Share {
    config: SmbConfig,
    credentials: Credentials,
    state: Mutex<SessionState>,
}

impl Share {
    /// Creates a share facade; no subprocess is spawned until first use.
    #[must_use]
    pub fn new(config: SmbConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            state: Mutex::new(SessionState::Unconnected),
        }
    }

    /// Returns the share name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.config.share()
    }

    /// Returns the connection configuration.
    #[must_use]
    pub const fn config(&self) -> &SmbConfig {
        &self.config
    }

    /// Lists the entries of a remote folder.
    ///
    /// Issues `cd`, `dir`, `cd /` as one serialized exchange so the
    /// session's working directory is restored before the listing is
    /// interpreted.
    pub fn dir(&self, path: &str) -> Result<Vec<FileInfo>, Error> {
        let escaped = escape_path(path)?;
        let listing = self.with_session(|session| {
            let entered = run(session, &format!("cd {escaped}"))?;
            check_for_error(&entered, path)?;
            let listing = run(session, "dir")?;
            let left = run(session, "cd /")?;
            check_for_error(&left, "/")?;
            check_for_error(&listing, path)?;
            Ok(listing)
        })?;
        Ok(parse_directory_listing(
            &listing,
            path,
            self.config.timezone(),
        ))
    }

    /// Fetches metadata for one remote path.
    pub fn stat(&self, path: &str) -> Result<FileInfo, Error> {
        let escaped = escape_path(path)?;
        let lines = self.with_session(|session| run(session, &format!("allinfo {escaped}")))?;
        // Failure output is a single status line; real info blocks are longer.
        if lines.len() < 3 {
            check_for_error(&lines, path)?;
        }
        let info = parse_all_info(&lines, self.config.timezone()).map_err(|err| Error::Command {
            path: path.to_owned(),
            raw: err.to_string(),
        })?;
        Ok(FileInfo::new(
            path,
            basename(path),
            info.size,
            info.mtime,
            info.mode,
        ))
    }

    /// Creates a remote folder.
    pub fn mkdir(&self, path: &str) -> Result<(), Error> {
        self.simple_command("mkdir", path)
    }

    /// Removes an empty remote folder.
    pub fn rmdir(&self, path: &str) -> Result<(), Error> {
        self.simple_command("rmdir", path)
    }

    /// Deletes a remote file.
    ///
    /// The client reports "no such file" when the path is actually a
    /// directory; that misleading answer is disambiguated with a follow-up
    /// listing and reclassified as [`Error::InvalidType`].
    pub fn del(&self, path: &str) -> Result<(), Error> {
        match self.simple_command("del", path) {
            Err(original @ Error::NotFound { .. }) => match self.simple_command("ls", path) {
                Err(Error::NotFound { .. }) => Err(original),
                Err(err @ Error::Connection(_)) => Err(err),
                Ok(()) | Err(_) => Err(Error::InvalidType {
                    path: path.to_owned(),
                }),
            },
            other => other,
        }
    }

    /// Renames or moves a remote path.
    pub fn rename(&self, from: &str, to: &str) -> Result<(), Error> {
        let source = escape_path(from)?;
        let target = escape_path(to)?;
        self.checked_command(&format!("rename {source} {target}"), to)
    }

    /// Uploads a local file through the interactive session.
    pub fn put(&self, local: &str, remote: &str) -> Result<(), Error> {
        let source = escape_local_path(local)?;
        let target = escape_path(remote)?;
        self.checked_command(&format!("put {source} {target}"), remote)
    }

    /// Downloads a remote file to a local path through the interactive
    /// session.
    pub fn get(&self, remote: &str, local: &str) -> Result<(), Error> {
        let source = escape_path(remote)?;
        let target = escape_local_path(local)?;
        self.checked_command(&format!("get {source} {target}"), remote)
    }

    /// Opens a readable stream over a remote file.
    ///
    /// Spawns a dedicated raw session; the interactive session is not
    /// involved and stays available for concurrent management calls.
    pub fn read(&self, path: &str) -> Result<DownloadStream, Error> {
        let escaped = escape_path(path)?;
        let args = vec![
            authentication_file_arg(),
            self.config.unc(),
            "-c".to_owned(),
            format!(
                "get {escaped} /proc/self/fd/{}",
                DescriptorRole::DownloadOut.child_fd()
            ),
        ];
        open_download(
            self.config.client_binary(),
            &args,
            &self.credentials,
            self.config.command_timeout(),
        )
        .map_err(into_connection_error)
    }

    /// Opens a writable stream over a remote file.
    ///
    /// Closing the returned sink blocks until the client-side upload
    /// completes; see [`UploadStream::close`].
    pub fn write(&self, path: &str) -> Result<UploadStream, Error> {
        let escaped = escape_path(path)?;
        let args = vec![
            authentication_file_arg(),
            self.config.unc(),
            "-c".to_owned(),
            format!(
                "put /proc/self/fd/{} {escaped}",
                DescriptorRole::UploadIn.child_fd()
            ),
        ];
        open_upload(
            self.config.client_binary(),
            &args,
            &self.credentials,
            self.config.command_timeout(),
        )
        .map_err(into_connection_error)
    }

    /// Replaces the DOS attributes of a remote path.
    ///
    /// Clears all attributes first, then raises the requested set; the
    /// second command is skipped when nothing is requested.
    pub fn set_mode(&self, path: &str, mode: FileMode) -> Result<(), Error> {
        let escaped = escape_path(path)?;
        self.checked_command(&format!("setmode {escaped} -rsha"), path)?;

        let letters: String = SETMODE_LETTERS
            .iter()
            .filter(|(bit, _)| mode.contains(*bit))
            .map(|(_, letter)| *letter)
            .collect();
        if !letters.is_empty() {
            self.checked_command(&format!("setmode {escaped} {letters}"), path)?;
        }
        Ok(())
    }

    /// Escapes `path`, runs `command path`, and classifies the response.
    fn simple_command(&self, command: &str, path: &str) -> Result<(), Error> {
        let escaped = escape_path(path)?;
        self.checked_command(&format!("{command} {escaped}"), path)
    }

    /// Runs one framed command and classifies its response.
    fn checked_command(&self, command: &str, path: &str) -> Result<(), Error> {
        let lines = self.with_session(|session| run(session, command))?;
        check_for_error(&lines, path)
    }

    /// Runs `operation` against the interactive session, connecting or
    /// replacing it first when needed.
    ///
    /// A connection-level failure from the operation marks the session
    /// invalid so the next call spawns a replacement; share-level errors
    /// leave it connected.
    fn with_session<T>(
        &self,
        operation: impl FnOnce(&mut ClientSession) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let usable = match &mut *state {
            SessionState::Ready(session) => session.is_alive(),
            _ => false,
        };
        if !usable {
            *state = SessionState::Unconnected;
            *state = SessionState::Ready(self.connect()?);
            tracing::debug!(share = self.config.share(), "interactive session established");
        }

        if let SessionState::Ready(session) = &mut *state {
            let result = operation(session);
            if matches!(&result, Err(err) if err.is_connection_failure()) {
                tracing::debug!(share = self.config.share(), "interactive session invalidated");
                *state = SessionState::Invalid;
            }
            result
        } else {
            Err(Error::Connection(
                "interactive session did not become ready".to_owned(),
            ))
        }
    }

    /// Spawns a fresh interactive session and feeds it credentials.
    fn connect(&self) -> Result<ClientSession, Error> {
        let args = vec![authentication_file_arg(), self.config.unc()];
        let mut session = ClientSession::spawn(
            self.config.client_binary(),
            &args,
            &[DescriptorRole::Credentials],
            self.config.command_timeout(),
        )
        .map_err(into_connection_error)?;
        session
            .write_credentials(&self.credentials)
            .map_err(into_connection_error)?;
        if !session.is_alive() {
            return Err(Error::Connection(
                "client exited during authentication".to_owned(),
            ));
        }
        Ok(session)
    }
}

/// Runs a framed command, folding transport failures into the public
/// connection error.
fn run(session: &mut ClientSession, command: &str) -> Result<Vec<String>, Error> {
    session.execute(command).map_err(into_connection_error)
}

fn into_connection_error(err: SessionError) -> Error {
    Error::Connection(err.to_string())
}

fn authentication_file_arg() -> String {
    format!(
        "--authentication-file=/proc/self/fd/{}",
        DescriptorRole::Credentials.child_fd()
    )
}

fn basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}
