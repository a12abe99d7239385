//! Client configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use transrpc_types::{RpcError, RpcResult};

/// Where the daemon listens when nothing else is configured.
pub const DEFAULT_RPC_URL: &str = "http://localhost:9091/transmission/rpc";

/// Default timeout for one HTTP round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const ENV_RPC_URL: &str = "TRANSMISSION_RPC_URL";
const ENV_USERNAME: &str = "TRANSMISSION_USERNAME";
const ENV_PASSWORD: &str = "TRANSMISSION_PASSWORD";
const ENV_TIMEOUT_SECS: &str = "TRANSMISSION_TIMEOUT_SECS";

/// Username and password for the daemon's HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Validates the pair. A username containing `:` cannot be encoded and is rejected.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> RpcResult<Self> {
        let username = username.into();
        if username.contains(':') {
            return Err(RpcError::construction(
                "username must not contain ':' because it separates username and password",
            ));
        }
        Ok(Self {
            username,
            password: password.into(),
        })
    }

    /// The username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to talk to one daemon.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// RPC endpoint, usually `http://<host>:9091/transmission/rpc`.
    pub url: String,
    /// Basic authentication, if the daemon requires it.
    pub credentials: Option<Credentials>,
    /// Timeout for each HTTP round trip.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_owned(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// A configuration for `url` with defaults for everything else.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the basic authentication credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> RpcResult<Self> {
        self.credentials = Some(Credentials::new(username, password)?);
        Ok(self)
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `TRANSMISSION_RPC_URL`, `TRANSMISSION_USERNAME`, `TRANSMISSION_PASSWORD` and
    /// `TRANSMISSION_TIMEOUT_SECS`, falling back to the defaults for unset variables.
    ///
    /// Credentials are only used when both the username and the password are set.
    pub fn from_env() -> RpcResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RpcResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_RPC_URL) {
            config.url = url;
        }
        if let (Some(username), Some(password)) = (lookup(ENV_USERNAME), lookup(ENV_PASSWORD)) {
            config = config.with_credentials(username, password)?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                RpcError::construction(format!("{ENV_TIMEOUT_SECS}={secs:?} is not a number: {e}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field(
                "credentials",
                &if self.credentials.is_some() { "set" } else { "unset" },
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}
