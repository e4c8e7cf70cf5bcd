//! Connection configuration and credentials.
//!
//! Both types are handed in ready-made by the caller; loading them from
//! config files, keyrings, or the environment is out of scope for this
//! workspace.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use time::UtcOffset;
use zeroize::Zeroizing;

/// Default client binary resolved through `PATH`.
const DEFAULT_CLIENT_BINARY: &str = "smbclient";

/// Default liveness bound for reads awaiting a prompt.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection parameters for one share.
///
/// The timezone is the share server's authoritative zone: listing and
/// `allinfo` timestamps are printed by the server without zone information
/// and must be interpreted in its zone, not the local one.
///
/// # Examples
///
/// ```
/// use smb_core::SmbConfig;
/// use time::UtcOffset;
///
/// let config = SmbConfig::new("fileserver", "documents")
///     .with_timezone(UtcOffset::from_hms(2, 0, 0).unwrap());
/// assert_eq!(config.unc(), "//fileserver/documents");
/// ```
#[derive(Clone, Debug)]
pub struct SmbConfig {
    host: String,
    share: String,
    timezone: UtcOffset,
    client_binary: PathBuf,
    command_timeout: Duration,
}

impl SmbConfig {
    /// Creates a configuration for `share` on `host` with UTC timestamps,
    /// the default client binary, and the default command timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, share: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            share: share.into(),
            timezone: UtcOffset::UTC,
            client_binary: PathBuf::from(DEFAULT_CLIENT_BINARY),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Sets the server's timezone used to interpret listing timestamps.
    #[must_use]
    pub fn with_timezone(mut self, timezone: UtcOffset) -> Self {
        self.timezone = timezone;
        self
    }

    /// Overrides the client binary, bypassing `PATH` resolution.
    #[must_use]
    pub fn with_client_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.client_binary = binary.into();
        self
    }

    /// Sets the liveness bound applied to every read that awaits client
    /// output. A stalled or dead subprocess fails the read after this long
    /// instead of blocking forever.
    #[must_use]
    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Returns the server host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the share name.
    #[must_use]
    pub fn share(&self) -> &str {
        &self.share
    }

    /// Returns the server's timezone.
    #[must_use]
    pub const fn timezone(&self) -> UtcOffset {
        self.timezone
    }

    /// Returns the client binary path.
    #[must_use]
    pub fn client_binary(&self) -> &Path {
        &self.client_binary
    }

    /// Returns the liveness bound for prompt waits.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Returns the `//host/share` service operand passed to the client.
    #[must_use]
    pub fn unc(&self) -> String {
        format!("//{}/{}", self.host, self.share)
    }
}

/// Username, optional domain, and password for the credential side channel.
///
/// The password buffer is wiped when the value is dropped, and `Debug`
/// never renders it.
pub struct Credentials {
    username: String,
    domain: Option<String>,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Creates credentials without a domain qualifier.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            domain: None,
            password: Zeroizing::new(password.into()),
        }
    }

    /// Adds a domain qualifier, producing `DOMAIN\user` on the side channel.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Returns the bare username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the domain qualifier, if any.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the username in the form the client expects on the side
    /// channel: `DOMAIN\user` when a domain is set, the bare name otherwise.
    #[must_use]
    pub fn qualified_username(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{domain}\\{}", self.username),
            None => self.username.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("domain", &self.domain)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unc_combines_host_and_share() {
        let config = SmbConfig::new("nas.local", "backups");
        assert_eq!(config.unc(), "//nas.local/backups");
    }

    #[test]
    fn defaults_are_sane() {
        let config = SmbConfig::new("h", "s");
        assert_eq!(config.timezone(), UtcOffset::UTC);
        assert_eq!(config.client_binary(), Path::new("smbclient"));
        assert_eq!(config.command_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn builder_overrides_apply() {
        let config = SmbConfig::new("h", "s")
            .with_client_binary("/opt/samba/bin/smbclient")
            .with_command_timeout(Duration::from_millis(250));
        assert_eq!(
            config.client_binary(),
            Path::new("/opt/samba/bin/smbclient")
        );
        assert_eq!(config.command_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn qualified_username_without_domain() {
        let credentials = Credentials::new("alice", "secret");
        assert_eq!(credentials.qualified_username(), "alice");
    }

    #[test]
    fn qualified_username_with_domain() {
        let credentials = Credentials::new("alice", "secret").with_domain("WORKGROUP");
        assert_eq!(credentials.qualified_username(), "WORKGROUP\\alice");
    }

    #[test]
    fn debug_redacts_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
