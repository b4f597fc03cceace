//! Hook configuration.

use serde::{Deserialize, Serialize};

/// How the hook connects to Redis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// One Redis instance; the first configured address is dialed.
    Single,
    /// A Redis Cluster spanning all configured addresses.
    Cluster,
}

/// Configuration for [`RedisHook`](crate::RedisHook) construction.
///
/// Plain data; immutable once passed to [`RedisHook::new`](crate::RedisHook::new).
/// Derives serde traits so it can be embedded in an application's
/// configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Redis list key that log entries are appended to.
    pub key: String,
    /// Output format tag, `"v0"` or `"v1"`. See [`MessageFormat`](crate::MessageFormat).
    pub format: String,
    /// Application name stamped into every message.
    pub app: String,
    /// Host label stamped into every message.
    pub hostname: String,
    /// One or more `host:port` addresses. Single mode dials the first;
    /// cluster mode uses all of them as seed nodes.
    pub addrs: Vec<String>,
    /// Single-node or cluster mode.
    pub mode: ConnectionMode,
    /// Optional authentication secret.
    #[serde(default)]
    pub password: Option<String>,
    /// Database index, used in single mode only.
    #[serde(default)]
    pub db: i64,
}
