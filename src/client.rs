#![cfg(feature = "std")]

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ClientConfig,
    history::CommandHistory,
    pinger::KeepAlive,
    poller::{OutputPoller, PollOutcome},
    screen::{ContainerListeners, SharedScreen},
    session::SessionId,
    submitter::{CommandSubmitter, Key, KeyOutcome},
    transport::Transport,
};

/// How an interactive session ended.
#[derive(Debug)]
pub struct SessionSummary {
    /// Why the output loop stopped.
    pub outcome: PollOutcome,
    /// Commands submitted during the session, oldest first.
    pub history: CommandHistory,
}

/// One interactive game session: output poller, keep-alive pinger and the
/// command line, all sharing one screen and session id.
pub struct GameClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    session: SessionId,
    screen: SharedScreen,
    listeners: Arc<ContainerListeners>,
}

impl GameClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        session: SessionId,
        screen: SharedScreen,
    ) -> Self {
        Self {
            config,
            transport,
            session,
            screen,
            listeners: Arc::new(ContainerListeners::new()),
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Registry for "visible container" updates; subscribe before `run`.
    pub fn listeners(&self) -> &Arc<ContainerListeners> {
        &self.listeners
    }

    /// Drive the session until the user quits, the key stream ends, or
    /// `cancel` fires.
    ///
    /// A lost connection stops the output loop but not the command line:
    /// the user keeps typing (and sees further notices) until they quit.
    pub async fn run(
        self,
        mut keys: UnboundedReceiver<Key>,
        cancel: CancellationToken,
    ) -> anyhow::Result<SessionSummary> {
        log::info!("Attaching to session {:?} at {}", self.session, self.config.server);

        let poller = OutputPoller::new(
            Arc::clone(&self.transport),
            self.session.clone(),
            Arc::clone(&self.screen),
            Arc::clone(&self.listeners),
        );
        let pinger = KeepAlive::new(
            Arc::clone(&self.transport),
            self.session.clone(),
            Arc::clone(&self.screen),
            self.config.ping_interval,
        );

        let mut poll_task: JoinHandle<PollOutcome> = tokio::spawn({
            let cancel = cancel.clone();
            async move { poller.run(cancel).await }
        });
        let ping_task = tokio::spawn({
            let cancel = cancel.clone();
            async move { pinger.run(cancel).await }
        });

        let mut submitter = CommandSubmitter::new(
            Arc::clone(&self.transport),
            self.session.clone(),
            Arc::clone(&self.screen),
        );
        submitter.set_input("");

        let mut finished: Option<PollOutcome> = None;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                key = keys.recv() => match key {
                    Some(key) => match submitter.handle_key(key) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Submitted(_) | KeyOutcome::Continue => {}
                    },
                    None => {
                        log::debug!("Key stream closed");
                        break;
                    }
                },
                outcome = &mut poll_task, if finished.is_none() => {
                    let outcome = outcome?;
                    if let PollOutcome::ConnectionLost(reason) = &outcome {
                        log::warn!("Output stopped ({}); restart the client to reconnect", reason);
                    }
                    finished = Some(outcome);
                }
            }
        }

        cancel.cancel();
        let outcome = match finished {
            Some(outcome) => outcome,
            None => poll_task.await?,
        };
        ping_task.await?;
        log::info!(
            "Session ended after {} commands: {:?}",
            submitter.history().len(),
            outcome
        );

        Ok(SessionSummary {
            outcome,
            history: submitter.history().clone(),
        })
    }
}
