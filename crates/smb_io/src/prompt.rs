//! Prompt-delimited response reading.
//!
//! The interactive client re-emits its prompt between command executions;
//! that marker is the only framing signal the text protocol offers. The
//! reader accumulates raw bytes, splits them into lines, and treats both a
//! complete prompt line and an unterminated trailing prompt chunk as a
//! sighting, because the client does not newline-terminate the prompt when
//! stdout is a pipe.

#![allow(unsafe_code)]

use std::io::{self, Read};
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use crate::error::SessionError;

/// Fixed prefix of the client's interactive prompt.
const PROMPT_PREFIX: &str = "smb:";

/// Final character of the prompt, after the current working directory.
const PROMPT_SUFFIX: char = '>';

/// Markers that explain an unexpected EOF as a connect or logon failure.
const SESSION_FATAL_MARKERS: &[&str] = &["NT_STATUS_", "Connection to"];

/// True when `line` is a prompt sighting.
///
/// Matches `smb: \…\>` with optional trailing whitespace. Path escaping in
/// the command layer guarantees user-supplied data cannot produce a line
/// of this shape at line start.
pub(crate) fn is_prompt(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.starts_with(PROMPT_PREFIX) && trimmed.ends_with(PROMPT_SUFFIX)
}

/// Buffered reader that delimits responses on prompt sightings.
#[derive(Debug)]
pub(crate) struct PromptReader<R> {
    source: R,
    buffer: Vec<u8>,
    timeout: Duration,
}

impl<R: Read + AsRawFd> PromptReader<R> {
    pub(crate) fn new(source: R, timeout: Duration) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            timeout,
        }
    }

    /// Reads until the next prompt sighting and returns the lines before
    /// it, in arrival order, with the prompt itself excluded.
    ///
    /// Blocks until the prompt is seen. Each read that makes progress
    /// resets the liveness bound; a stretch of `timeout` without any
    /// output fails with [`SessionError::Stalled`], and EOF before the
    /// prompt fails with [`SessionError::Rejected`] or
    /// [`SessionError::Disconnected`].
    pub(crate) fn read_until_prompt(&mut self) -> Result<Vec<String>, SessionError> {
        let mut lines = Vec::new();
        loop {
            while let Some(newline) = memchr::memchr(b'\n', &self.buffer) {
                let mut raw: Vec<u8> = self.buffer.drain(..=newline).collect();
                raw.pop();
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
                let text = String::from_utf8_lossy(&raw).into_owned();
                if is_prompt(&text) {
                    return Ok(lines);
                }
                lines.push(text);
            }

            // The prompt is not newline-terminated; a trailing chunk that
            // already has the prompt shape is a sighting too.
            if !self.buffer.is_empty() {
                let text = String::from_utf8_lossy(&self.buffer);
                if is_prompt(&text) {
                    self.buffer.clear();
                    return Ok(lines);
                }
            }

            self.fill(&lines)?;
        }
    }

    /// Waits for readable data within the liveness bound, then appends one
    /// chunk to the buffer.
    fn fill(&mut self, seen: &[String]) -> Result<(), SessionError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(SessionError::Stalled {
                    timeout: self.timeout,
                });
            }

            let mut poll_fd = libc::pollfd {
                fd: self.source.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            };
            let millis = i32::try_from(remaining.as_millis()).unwrap_or(i32::MAX).max(1);
            // SAFETY: `poll_fd` is a valid pollfd for the duration of the call.
            let ready = unsafe { libc::poll(&raw mut poll_fd, 1, millis) };
            if ready == -1 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(SessionError::Io(err));
            }
            if ready == 0 {
                return Err(SessionError::Stalled {
                    timeout: self.timeout,
                });
            }

            let mut chunk = [0_u8; 4096];
            let count = self.source.read(&mut chunk)?;
            if count == 0 {
                return Err(self.classify_eof(seen));
            }
            self.buffer.extend_from_slice(&chunk[..count]);
            return Ok(());
        }
    }

    /// Explains an EOF using whatever the client printed before dying.
    fn classify_eof(&self, seen: &[String]) -> SessionError {
        let tail = String::from_utf8_lossy(&self.buffer);
        for line in seen.iter().map(String::as_str).chain([tail.as_ref()]) {
            if SESSION_FATAL_MARKERS
                .iter()
                .any(|marker| line.contains(marker))
            {
                return SessionError::Rejected(line.trim().to_owned());
            }
        }
        SessionError::Disconnected
    }
}
