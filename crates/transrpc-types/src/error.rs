//! Error taxonomy for every Transmission RPC call.

use thiserror::Error;

/// Result alias used across the transrpc crates.
pub type RpcResult<T> = Result<T, RpcError>;

/// Error type for Transmission RPC operations.
#[derive(Error, Debug)]
pub enum RpcError {
    /// A value was rejected while it was being constructed (bad hash, invalid base64,
    /// username containing `:`, add-torrent request without exactly one source).
    /// Nothing was sent to the daemon.
    #[error("invalid value: {0}")]
    Construction(String),

    /// A request value could not be encoded. Only reachable through a programming error,
    /// such as trying to encode [`TorrentSelector::All`](crate::TorrentSelector::All).
    #[error("request encoding failed: {0}")]
    Encoding(String),

    /// The HTTP round trip failed (timeout, connection refused, DNS).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The daemon refused to authenticate the request.
    #[error("authentication failed: {0}")]
    Authentication(AuthFailure),

    /// The daemon answered with something that breaks the RPC envelope or a field's wire format.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The envelope was well formed but its `result` was not `success`.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl RpcError {
    /// Wraps any transport-level failure.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }

    /// Shorthand for [`RpcError::Construction`].
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Shorthand for [`RpcError::Protocol`].
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

/// The reason the daemon rejected a request at the HTTP authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// HTTP 401 while no credentials were configured.
    #[error("the daemon requires authentication; configure a username and password")]
    MissingCredentials,

    /// HTTP 401 while credentials were configured.
    #[error("the daemon rejected the configured username and password")]
    RejectedCredentials,

    /// HTTP 403: the client address is not on the daemon's RPC whitelist.
    #[error("the daemon's IP whitelist blocks this address")]
    AddressNotWhitelisted,
}
