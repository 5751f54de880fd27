#![cfg(feature = "std")]

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::protocol::CONNECTION_LOST_NOTICE;
use crate::screen::{lock, render, ContainerListeners, SharedScreen};
use crate::session::SessionId;
use crate::transport::{Transport, TransportError};

/// Why the output loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The cancellation token fired.
    Cancelled,
    /// A request failed with something other than a timeout. The notice has
    /// been shown and no further requests are made.
    ConnectionLost(String),
}

/// Long-polls the server for output and renders each batch.
///
/// Requests are strictly sequential: the next one is issued only after the
/// previous one has been handled.
pub struct OutputPoller {
    transport: Arc<dyn Transport>,
    session: SessionId,
    screen: SharedScreen,
    listeners: Arc<ContainerListeners>,
}

impl OutputPoller {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionId,
        screen: SharedScreen,
        listeners: Arc<ContainerListeners>,
    ) -> Self {
        Self {
            transport,
            session,
            screen,
            listeners,
        }
    }

    pub async fn run(&self, cancel: CancellationToken) -> PollOutcome {
        let mut batches: u64 = 0;
        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    log::debug!("Output poller cancelled after {} batches", batches);
                    return PollOutcome::Cancelled;
                }
                result = self.transport.fetch_output(&self.session) => result,
            };

            match result {
                Ok(msg) => {
                    batches += 1;
                    log::debug!("Received output batch {}", batches);
                    render(&msg, &self.screen, &self.listeners);
                }
                Err(TransportError::Timeout) => {
                    log::debug!("Output poll timed out, polling again");
                }
                Err(TransportError::ConnectionLost(reason)) => {
                    log::warn!("Output poller stopped: {}", reason);
                    lock(&self.screen).append_html(CONNECTION_LOST_NOTICE);
                    return PollOutcome::ConnectionLost(reason);
                }
            }
        }
    }
}
