#![cfg(feature = "std")]

//! The display surface the client writes to.
//!
//! A `Screen` plays the part of the host page: a transcript the server's
//! output is appended to, a prompt shown in front of the input line, an
//! optional headline, and the input line itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::protocol::{OutputMessage, DEFAULT_PROMPT};

pub trait Screen {
    /// Append an HTML fragment to the transcript.
    fn append_html(&mut self, html: &str);

    /// Replace the prompt shown in front of the input line.
    fn set_prompt(&mut self, prompt: &str);

    fn prompt(&self) -> String;

    fn set_headline(&mut self, headline: &str);

    /// Redraw the input line with `input` and bring it into view.
    fn show_input(&mut self, input: &str);
}

/// Screen shared between the poller, the pinger and the submitter.
pub type SharedScreen = Arc<Mutex<dyn Screen + Send>>;

/// Lock a screen, recovering the guard if a previous holder panicked.
pub fn lock(screen: &SharedScreen) -> MutexGuard<'_, dyn Screen + Send + 'static> {
    screen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Callback invoked with each "visible container" update.
pub type ContainerListener = Box<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Publish/subscribe registry for "visible container" updates.
#[derive(Default)]
pub struct ContainerListeners {
    listeners: Mutex<Vec<(usize, ContainerListener)>>,
    next_id: AtomicUsize,
}

/// Handle returned by [`ContainerListeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(usize);

impl ContainerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((id, Box::new(listener)));
        Subscription(id)
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(|p| p.into_inner());
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription.0);
        listeners.len() != before
    }

    /// Deliver an update to every listener in subscription order.
    pub fn publish(&self, update: &serde_json::Value) {
        let listeners = self.listeners.lock().unwrap_or_else(|p| p.into_inner());
        for (_, listener) in listeners.iter() {
            listener(update);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Apply a server message to the screen.
///
/// Only the fields present in `msg` are touched.
pub fn render(msg: &OutputMessage, screen: &SharedScreen, listeners: &ContainerListeners) {
    {
        let mut screen = lock(screen);
        if let Some(text) = msg.text.as_deref().filter(|t| !t.is_empty()) {
            screen.append_html(text);
        }
        if let Some(prompt) = msg.prompt.as_deref().filter(|p| !p.is_empty()) {
            screen.set_prompt(prompt);
        }
        if let Some(headline) = msg.headline.as_deref().filter(|h| !h.is_empty()) {
            screen.set_headline(headline);
        }
    }
    // Listeners run without the screen lock so they may draw themselves.
    if let Some(update) = msg.visible_container.as_ref().filter(|v| is_truthy(v)) {
        listeners.publish(update);
    }
}

/// `null`, `false`, zero and the empty string carry no container update.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Screen kept entirely in memory, used by tests and headless runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryScreen {
    pub transcript: Vec<String>,
    pub prompt: String,
    pub headline: Option<String>,
    pub input: String,
    /// How many times the input line was redrawn.
    pub redraws: usize,
}

impl Default for MemoryScreen {
    fn default() -> Self {
        Self {
            transcript: Vec::new(),
            prompt: DEFAULT_PROMPT.to_string(),
            headline: None,
            input: String::new(),
            redraws: 0,
        }
    }
}

impl MemoryScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenated transcript HTML.
    pub fn html(&self) -> String {
        self.transcript.concat()
    }
}

impl Screen for MemoryScreen {
    fn append_html(&mut self, html: &str) {
        self.transcript.push(html.to_string());
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    fn prompt(&self) -> String {
        self.prompt.clone()
    }

    fn set_headline(&mut self, headline: &str) {
        self.headline = Some(headline.to_string());
    }

    fn show_input(&mut self, input: &str) {
        self.input = input.to_string();
        self.redraws += 1;
    }
}
