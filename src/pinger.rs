#![cfg(feature = "std")]

use std::sync::Arc;

use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::protocol::CONNECTION_LOST_NOTICE;
use crate::screen::{lock, SharedScreen};
use crate::session::SessionId;
use crate::transport::{Transport, TransportError};

/// Keeps the server-side session alive with periodic pings.
///
/// Runs on its own timer, independent of the output poller. A failed ping is
/// reported on screen but never stops the pinger.
pub struct KeepAlive {
    transport: Arc<dyn Transport>,
    session: SessionId,
    screen: SharedScreen,
    interval: Duration,
}

impl KeepAlive {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionId,
        screen: SharedScreen,
        interval: Duration,
    ) -> Self {
        Self {
            transport,
            session,
            screen,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ping every `interval` until cancelled. The first ping goes out one
    /// full interval after start.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // First tick completes immediately, skip it

        let mut sent: u64 = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::debug!("Keep-alive stopped after {} pings", sent);
                    return;
                }
                _ = timer.tick() => {}
            }

            sent += 1;
            // A slow ping must not hold up shutdown.
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = self.transport.ping(&self.session) => result,
            };
            match result {
                Ok(()) => log::debug!("Ping {} acknowledged", sent),
                Err(TransportError::Timeout) => {
                    log::debug!("Ping {} timed out", sent);
                }
                Err(TransportError::ConnectionLost(reason)) => {
                    log::warn!("Ping {} failed: {}", sent, reason);
                    lock(&self.screen).append_html(CONNECTION_LOST_NOTICE);
                }
            }
        }
    }
}
