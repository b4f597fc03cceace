//! Error types for hook construction, dispatch, and shutdown.

use redis::RedisError;
use thiserror::Error;

/// Error type for all hook operations.
///
/// Every failure is returned as a value to the caller; the hook never
/// panics across the dispatch boundary. The variants map one-to-one onto
/// the phases of the hook's lifetime: configuration validation, connection
/// establishment, message rendering, and transport.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured format tag is neither `"v0"` nor `"v1"`.
    ///
    /// Raised during construction, before any connection is dialed.
    #[error("unknown message format: {0:?}")]
    UnknownFormat(String),

    /// The configured address list is empty.
    #[error("no Redis address configured")]
    NoAddresses,

    /// A configured address is not of the form `host:port`.
    #[error("invalid Redis address {0:?}, expected host:port")]
    InvalidAddress(String),

    /// Connecting to Redis failed, or the liveness check did not come back.
    ///
    /// Covers both single-node and cluster mode.
    #[error("unable to connect to Redis: {0}")]
    Connect(#[source] RedisError),

    /// A rendered message could not be encoded as JSON.
    ///
    /// Dispatch aborts before any network I/O when this occurs.
    #[error("error creating message for Redis: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Appending the serialized message to the Redis list failed.
    #[error("error sending message to Redis: {0}")]
    Transport(#[source] RedisError),
}
