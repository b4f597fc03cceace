//! The hook itself: construction, per-entry dispatch, and shutdown.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::cluster::ClusterClientBuilder;
use redis::cluster_async::ClusterConnection;
use redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};
use tracing::{debug, trace};

use crate::config::{ConnectionMode, HookConfig};
use crate::entry::{Entry, Level};
use crate::error::Error;
use crate::format::MessageFormat;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// The registration interface a logging pipeline consumes.
///
/// A pipeline asks each registered hook which severities it wants via
/// [`levels`](Hook::levels) and delivers every matching entry through
/// [`fire`](Hook::fire). There is no global registry; callers hand hooks
/// to whatever pipeline they construct.
#[async_trait]
pub trait Hook: Send + Sync {
    /// The severities this hook wants to receive.
    fn levels(&self) -> &[Level];

    /// Delivers one entry. Recoverable failures come back as [`Error`];
    /// implementations never panic across this boundary.
    async fn fire(&self, entry: &Entry) -> Result<(), Error>;
}

/// The live connection handle, exactly one variant per hook instance.
///
/// Both handles are cheap clones of a shared multiplexed connection, so
/// concurrent dispatch clones per call instead of locking.
#[derive(Clone)]
enum RedisConnection {
    Single(ConnectionManager),
    Cluster(ClusterConnection),
}

impl RedisConnection {
    async fn ping(&mut self) -> Result<(), RedisError> {
        let cmd = redis::cmd("PING");
        let _: String = match self {
            RedisConnection::Single(conn) => cmd.query_async(conn).await?,
            RedisConnection::Cluster(conn) => cmd.query_async(conn).await?,
        };
        Ok(())
    }

    async fn rpush(&mut self, key: &str, payload: &[u8]) -> Result<(), RedisError> {
        let mut cmd = redis::cmd("RPUSH");
        cmd.arg(key).arg(payload);
        let _: i64 = match self {
            RedisConnection::Single(conn) => cmd.query_async(conn).await?,
            RedisConnection::Cluster(conn) => cmd.query_async(conn).await?,
        };
        Ok(())
    }
}

/// A [`Hook`] that appends each log entry, rendered as JSON, to a Redis
/// list.
///
/// Constructed ready-to-use or not at all: [`RedisHook::new`] validates the
/// format tag, establishes the connection, and pings it before returning.
///
/// ```no_run
/// use redislog::{ConnectionMode, Entry, Hook, HookConfig, Level, RedisHook};
///
/// # async fn example() -> Result<(), redislog::Error> {
/// let hook = RedisHook::new(HookConfig {
///     key: "logs".to_string(),
///     format: "v1".to_string(),
///     app: "billing".to_string(),
///     hostname: "app-01".to_string(),
///     addrs: vec!["localhost:6379".to_string()],
///     mode: ConnectionMode::Single,
///     password: None,
///     db: 0,
/// })
/// .await?;
///
/// hook.fire(&Entry::new(Level::Info, "payment accepted")).await?;
/// hook.close()
/// # }
/// ```
pub struct RedisHook {
    connection: RedisConnection,
    key: String,
    app: String,
    hostname: String,
    format: MessageFormat,
}

impl RedisHook {
    /// Builds a hook from `config`: parses the format tag, connects in the
    /// configured mode, and performs one `PING` round-trip.
    ///
    /// Any failure returns an [`Error`] and no hook; a partially
    /// initialized hook is never observable. The format tag is checked
    /// before anything is dialed, so an unknown tag never opens a
    /// connection.
    pub async fn new(config: HookConfig) -> Result<Self, Error> {
        let format: MessageFormat = config.format.parse()?;

        if config.addrs.is_empty() {
            return Err(Error::NoAddresses);
        }

        let mut connection = match config.mode {
            ConnectionMode::Single => {
                let node = connection_info(&config.addrs[0], config.password.clone(), config.db)?;
                let client = Client::open(node).map_err(Error::Connect)?;
                let manager_config = ConnectionManagerConfig::new()
                    .set_connection_timeout(CONNECT_TIMEOUT)
                    .set_response_timeout(RESPONSE_TIMEOUT);
                let manager = client
                    .get_connection_manager_with_config(manager_config)
                    .await
                    .map_err(Error::Connect)?;
                RedisConnection::Single(manager)
            }
            ConnectionMode::Cluster => {
                let nodes = config
                    .addrs
                    .iter()
                    .map(|addr| connection_info(addr, config.password.clone(), 0))
                    .collect::<Result<Vec<_>, _>>()?;
                let client = ClusterClientBuilder::new(nodes)
                    .connection_timeout(CONNECT_TIMEOUT)
                    .response_timeout(RESPONSE_TIMEOUT)
                    .build()
                    .map_err(Error::Connect)?;
                let conn = client
                    .get_async_connection()
                    .await
                    .map_err(Error::Connect)?;
                RedisConnection::Cluster(conn)
            }
        };

        connection.ping().await.map_err(Error::Connect)?;
        debug!(mode = ?config.mode, key = %config.key, "connected to Redis");

        Ok(Self {
            connection,
            key: config.key,
            app: config.app,
            hostname: config.hostname,
            format,
        })
    }

    /// Releases the connection.
    ///
    /// Consumes the hook, so release happens at most once and a closed
    /// hook cannot fire again. The underlying transport tears the
    /// connection down when the handle is dropped.
    pub fn close(self) -> Result<(), Error> {
        debug!(key = %self.key, "closing Redis connection");
        drop(self.connection);
        Ok(())
    }
}

#[async_trait]
impl Hook for RedisHook {
    /// All six severities; the pipeline does the level filtering, the hook
    /// does none of its own.
    fn levels(&self) -> &[Level] {
        &Level::ALL
    }

    async fn fire(&self, entry: &Entry) -> Result<(), Error> {
        let message = self.format.render(entry, &self.app, &self.hostname);
        let payload = serde_json::to_vec(&message)?;

        let mut connection = self.connection.clone();
        connection
            .rpush(&self.key, &payload)
            .await
            .map_err(Error::Transport)?;

        trace!(key = %self.key, level = %entry.level, "pushed log entry to Redis");
        Ok(())
    }
}

impl std::fmt::Debug for RedisHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisHook")
            .field("key", &self.key)
            .field("app", &self.app)
            .field("hostname", &self.hostname)
            .field("format", &self.format)
            .finish()
    }
}

fn connection_info(
    addr: &str,
    password: Option<String>,
    db: i64,
) -> Result<ConnectionInfo, Error> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| Error::InvalidAddress(addr.to_string()))?;
    let port: u16 = port
        .parse()
        .map_err(|_| Error::InvalidAddress(addr.to_string()))?;

    Ok(ConnectionInfo {
        addr: ConnectionAddr::Tcp(host.to_string(), port),
        redis: RedisConnectionInfo {
            db,
            password,
            ..Default::default()
        },
    })
}
