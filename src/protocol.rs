#![cfg(feature = "std")]

//! Wire contract with the game server.

use serde::Deserialize;

/// Long-poll endpoint returning the next batch of output.
pub const OUTPUT_PATH: &str = "/output";
/// Form endpoint accepting a typed command.
pub const INPUT_PATH: &str = "/input";
/// Form endpoint keeping the session alive.
pub const PING_PATH: &str = "/ping";
/// Page that starts a new game and embeds its session id.
pub const GAME_PATH: &str = "/game";

/// Notice appended to the transcript when the server stops answering.
pub const CONNECTION_LOST_NOTICE: &str = "<p><i>Connection lost</i></p>";

/// Prompt shown before the server has sent one.
pub const DEFAULT_PROMPT: &str = ">";

/// One response from `GET /output`.
///
/// Every field is optional and an absent field means "no change": rendering
/// a message never clears state the message does not mention.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputMessage {
    /// HTML fragment to append to the transcript.
    #[serde(default)]
    pub text: Option<String>,
    /// Replacement for the input prompt.
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    /// Opaque payload forwarded to container listeners.
    #[serde(default)]
    pub visible_container: Option<serde_json::Value>,
}

impl OutputMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty)
            && self.prompt.as_deref().map_or(true, str::is_empty)
            && self.headline.is_none()
            && self.visible_container.is_none()
    }
}

/// Escape text for insertion into an HTML transcript.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Transcript echo of a command the user submitted.
///
/// Server output is trusted and inserted verbatim; the user's own text is
/// escaped.
pub fn user_response(prompt: &str, command: &str) -> String {
    format!(
        "<p class=\"user_response\">{} {}</p>",
        escape_html(prompt),
        escape_html(command)
    )
}
