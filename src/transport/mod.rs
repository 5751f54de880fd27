use crate::protocol::OutputMessage;
use crate::session::SessionId;

/// Failure of a single request to the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request expired before the server answered. For the output
    /// long-poll this is the normal idle case.
    Timeout,
    /// Any other failure, carrying a human-readable reason.
    ConnectionLost(String),
}

impl TransportError {
    pub fn connection_lost(reason: impl Into<String>) -> Self {
        TransportError::ConnectionLost(reason.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "Request timed out"),
            TransportError::ConnectionLost(reason) => write!(f, "Connection lost: {}", reason),
        }
    }
}

impl std::error::Error for TransportError {}

/// Requests the client makes of the game server.
///
/// Methods take `&self` so one transport can serve the poller, the pinger
/// and the submitter at the same time.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Wait for the next batch of output (long-poll).
    async fn fetch_output(&self, session: &SessionId) -> Result<OutputMessage, TransportError>;

    /// Submit a typed command. The response body carries nothing of use.
    async fn send_input(&self, session: &SessionId, command: &str) -> Result<(), TransportError>;

    /// Tell the server the session is still in use.
    async fn ping(&self, session: &SessionId) -> Result<(), TransportError>;
}

#[cfg(feature = "std")]
pub mod http;
#[cfg(feature = "std")]
pub mod scripted;
