#![cfg(feature = "std")]

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::history::CommandHistory;
use crate::protocol::{user_response, CONNECTION_LOST_NOTICE};
use crate::screen::{lock, SharedScreen};
use crate::session::SessionId;
use crate::transport::{Transport, TransportError};

/// Keys the input line reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Up,
    Down,
    /// Ctrl-D: quits on an empty line, ignored otherwise.
    EndOfInput,
    /// Leave the client.
    Quit,
}

/// What the caller should do after a key was handled.
#[derive(Debug)]
pub enum KeyOutcome {
    Continue,
    /// A command went out; the handle resolves once the server answered.
    Submitted(JoinHandle<()>),
    Quit,
}

/// Owns the input line and command history, and sends commands.
pub struct CommandSubmitter {
    transport: Arc<dyn Transport>,
    session: SessionId,
    screen: SharedScreen,
    history: CommandHistory,
    input: String,
}

impl CommandSubmitter {
    pub fn new(transport: Arc<dyn Transport>, session: SessionId, screen: SharedScreen) -> Self {
        Self {
            transport,
            session,
            screen,
            history: CommandHistory::new(),
            input: String::new(),
        }
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input line, as if the user had typed `text`.
    pub fn set_input(&mut self, text: &str) {
        self.input.clear();
        self.input.push_str(text);
        self.redraw();
    }

    fn redraw(&self) {
        lock(&self.screen).show_input(&self.input);
    }

    /// Echo `command` into the transcript, send it, and record it.
    ///
    /// The send is fire-and-forget: the returned handle only matters to
    /// callers that want to wait for it. A failed send shows the
    /// connection-lost notice and is not retried.
    pub fn submit(&mut self, command: &str) -> JoinHandle<()> {
        {
            let mut screen = lock(&self.screen);
            let prompt = screen.prompt();
            screen.append_html(&user_response(&prompt, command));
        }

        let transport = Arc::clone(&self.transport);
        let session = self.session.clone();
        let screen = Arc::clone(&self.screen);
        let owned = command.to_string();
        let handle = tokio::spawn(async move {
            match transport.send_input(&session, &owned).await {
                Ok(()) => {}
                Err(TransportError::Timeout) => {
                    log::debug!("Command {:?} timed out waiting for the server", owned);
                }
                Err(TransportError::ConnectionLost(reason)) => {
                    log::warn!("Failed to send command {:?}: {}", owned, reason);
                    lock(&screen).append_html(CONNECTION_LOST_NOTICE);
                }
            }
        });

        self.history.append(command);
        self.input.clear();
        self.redraw();
        handle
    }

    /// Submit whatever is on the input line.
    pub fn submit_input(&mut self) -> JoinHandle<()> {
        let command = std::mem::take(&mut self.input);
        self.submit(&command)
    }

    pub fn recall_previous(&mut self) {
        if self.history.recall_previous(&mut self.input) {
            self.redraw();
        }
    }

    pub fn recall_next(&mut self) {
        if self.history.recall_next(&mut self.input) {
            self.redraw();
        }
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Char(ch) => {
                self.input.push(ch);
                self.redraw();
            }
            Key::Backspace => {
                if self.input.pop().is_some() {
                    self.redraw();
                }
            }
            Key::Enter => return KeyOutcome::Submitted(self.submit_input()),
            Key::Up => self.recall_previous(),
            Key::Down => self.recall_next(),
            Key::EndOfInput if self.input.is_empty() => return KeyOutcome::Quit,
            Key::EndOfInput => {}
            Key::Quit => return KeyOutcome::Quit,
        }
        KeyOutcome::Continue
    }
}
