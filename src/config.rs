use core::time::Duration;

/// Server the client talks to when none is given.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8888";
/// Interval between keep-alive pings.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(10);
/// How long one output long-poll may stay open before it counts as idle.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);
/// Timeout for ordinary requests (input, ping, pages).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable selecting the log level.
pub const LOG_ENV_VAR: &str = "TEXTADV_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the game server, without a trailing path.
    pub server: String,
    pub ping_interval: Duration,
    pub poll_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.into(),
            ping_interval: DEFAULT_PING_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn with_server(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }
}
