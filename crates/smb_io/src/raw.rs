//! Raw transfer sessions.
//!
//! Streaming a file cannot share the interactive subprocess: the
//! line-oriented console cannot interleave commands with raw bytes. Each
//! transfer therefore spawns a dedicated, single-use client whose command
//! line moves the file through a data descriptor, and the caller gets a
//! plain byte stream over the parent end of that pipe. No response parsing
//! is involved; truncation is only observable as a short read or a failed
//! write.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use smb_core::Credentials;

use crate::descriptor::DescriptorRole;
use crate::error::SessionError;
use crate::session::ClientSession;

/// Readable byte stream over a dedicated download session.
///
/// The session handle lives inside the stream so the child is not reaped
/// mid-transfer; dropping the stream terminates and releases it.
#[derive(Debug)]
pub struct DownloadStream {
    source: File,
    _session: ClientSession,
}

impl Read for DownloadStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.source.read(buf)
    }
}

/// Writable byte stream over a dedicated upload session.
///
/// Closing the stream is the durability point: [`close`](Self::close)
/// first drops the data descriptor to signal end-of-input, then blocks
/// until the client has drained the pipe, finished the remote write, and
/// exited. Dropping the stream performs the same finalisation as a
/// backstop, swallowing errors the way `Drop` must.
pub struct UploadStream {
    sink: Option<File>,
    session: Option<ClientSession>,
}

impl Write for UploadStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.sink.as_mut() {
            Some(sink) => sink.write(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "upload stream is closed",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl UploadStream {
    /// Signals end-of-input and blocks until the client-side upload
    /// completes, guaranteeing the remote write is durable on return.
    pub fn close(mut self) -> io::Result<()> {
        self.finalize()
    }

    fn finalize(&mut self) -> io::Result<()> {
        self.sink.take();
        match self.session.take() {
            Some(session) => session.close(false),
            None => Ok(()),
        }
    }
}

impl Drop for UploadStream {
    fn drop(&mut self) {
        let _ = self.finalize();
    }
}

/// Spawns a single-use download session and returns its byte source.
///
/// `args` is the full client argument list, typically ending in a
/// `-c 'get <path> /proc/self/fd/5'` instruction.
pub fn open_download(
    binary: &Path,
    args: &[String],
    credentials: &Credentials,
    read_timeout: Duration,
) -> Result<DownloadStream, SessionError> {
    let mut session = ClientSession::spawn(
        binary,
        args,
        &[DescriptorRole::Credentials, DescriptorRole::DownloadOut],
        read_timeout,
    )?;
    session.write_credentials(credentials)?;
    let source = session
        .take_download_source()
        .ok_or(SessionError::MissingDescriptor {
            role: DescriptorRole::DownloadOut,
        })?;
    Ok(DownloadStream {
        source: File::from(source),
        _session: session,
    })
}

/// Spawns a single-use upload session and returns its byte sink.
///
/// `args` is the full client argument list, typically ending in a
/// `-c 'put /proc/self/fd/4 <path>'` instruction.
pub fn open_upload(
    binary: &Path,
    args: &[String],
    credentials: &Credentials,
    read_timeout: Duration,
) -> Result<UploadStream, SessionError> {
    let mut session = ClientSession::spawn(
        binary,
        args,
        &[DescriptorRole::Credentials, DescriptorRole::UploadIn],
        read_timeout,
    )?;
    session.write_credentials(credentials)?;
    let sink = session
        .take_upload_sink()
        .ok_or(SessionError::MissingDescriptor {
            role: DescriptorRole::UploadIn,
        })?;
    Ok(UploadStream {
        sink: Some(File::from(sink)),
        session: Some(session),
    })
}
