#![cfg(feature = "std")]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::protocol::OutputMessage;
use crate::session::SessionId;
use crate::transport::{Transport, TransportError};

#[derive(Default)]
struct Script {
    outputs: VecDeque<Result<OutputMessage, TransportError>>,
    input_results: VecDeque<Result<(), TransportError>>,
    ping_results: VecDeque<Result<(), TransportError>>,
    output_requests: Vec<SessionId>,
    inputs: Vec<(SessionId, String)>,
    pings: Vec<SessionId>,
}

/// In-memory transport replaying queued server responses.
///
/// Once the queued outputs run out, `fetch_output` parks forever, like a
/// long-poll with nothing to say; inputs and pings succeed unless a failure
/// was queued for them. Every request is recorded for inspection. Clones
/// share the same script.
#[derive(Clone)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    fetches: Arc<watch::Sender<usize>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        let (fetches, _) = watch::channel(0);
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            fetches: Arc::new(fetches),
        }
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn push_output(&self, result: Result<OutputMessage, TransportError>) {
        self.script().outputs.push_back(result);
    }

    pub fn push_input_result(&self, result: Result<(), TransportError>) {
        self.script().input_results.push_back(result);
    }

    pub fn push_ping_result(&self, result: Result<(), TransportError>) {
        self.script().ping_results.push_back(result);
    }

    /// Number of `fetch_output` calls issued so far.
    pub fn fetch_count(&self) -> usize {
        *self.fetches.borrow()
    }

    /// Wait until at least `n` output requests have been issued.
    pub async fn wait_for_fetches(&self, n: usize) {
        let mut rx = self.fetches.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    pub fn output_requests(&self) -> Vec<SessionId> {
        self.script().output_requests.clone()
    }

    pub fn inputs(&self) -> Vec<(SessionId, String)> {
        self.script().inputs.clone()
    }

    pub fn pings(&self) -> Vec<SessionId> {
        self.script().pings.clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn fetch_output(&self, session: &SessionId) -> Result<OutputMessage, TransportError> {
        let next = {
            let mut script = self.script();
            script.output_requests.push(session.clone());
            script.outputs.pop_front()
        };
        self.fetches.send_modify(|count| *count += 1);
        match next {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }

    async fn send_input(&self, session: &SessionId, command: &str) -> Result<(), TransportError> {
        let mut script = self.script();
        script.inputs.push((session.clone(), command.to_string()));
        script.input_results.pop_front().unwrap_or(Ok(()))
    }

    async fn ping(&self, session: &SessionId) -> Result<(), TransportError> {
        let mut script = self.script();
        script.pings.push(session.clone());
        script.ping_results.pop_front().unwrap_or(Ok(()))
    }
}
