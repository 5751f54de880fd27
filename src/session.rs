#![cfg(feature = "std")]

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Opaque session identifier handed out by the game server.
///
/// Attached to every outgoing request. Immutable for the lifetime of the
/// session and cheap to clone into each task that needs it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Arc<str>);

impl SessionId {
    pub fn new(id: impl Into<String>) -> anyhow::Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(anyhow::anyhow!("Session id must not be empty"));
        }
        Ok(Self(Arc::from(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the session id from a rendered game page.
    ///
    /// The server embeds it as `<input ... id="session" value="...">`;
    /// attribute order and quoting style vary, so both orders are accepted.
    pub fn from_page(html: &str) -> anyhow::Result<Self> {
        let input_tag = Regex::new(r#"(?is)<input\b[^>]*>"#)?;
        let id_attr = Regex::new(r#"(?i)\bid\s*=\s*["']?session["'\s/>]"#)?;
        let value_attr = Regex::new(r#"(?i)\bvalue\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?;

        for tag in input_tag.find_iter(html) {
            let tag = tag.as_str();
            if !id_attr.is_match(tag) {
                continue;
            }
            if let Some(caps) = value_attr.captures(tag) {
                let value = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                return Self::new(value);
            }
        }
        Err(anyhow::anyhow!("Game page did not contain a session id"))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Session ids are bearer tokens; keep them out of debug logs.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionId({}…)", prefix)
    }
}

/// Names of the games advertised on the server's index page.
pub fn game_names_from_index(html: &str) -> anyhow::Result<Vec<String>> {
    let link = Regex::new(r#"(?i)<a\s+href\s*=\s*["']?game/([^"'>\s]+)"#)?;
    Ok(link
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_session_from_page() {
        let page = r#"<form><input type="hidden" id="session" value="abc+/def=="></form>"#;
        let session = SessionId::from_page(page).unwrap();
        assert_eq!(session.as_str(), "abc+/def==");
    }

    #[test]
    fn extracts_session_with_value_before_id() {
        let page = r#"<input id="command"><input value='xyz' name="session" id=session>"#;
        let session = SessionId::from_page(page).unwrap();
        assert_eq!(session.as_str(), "xyz");
    }

    #[test]
    fn missing_session_is_an_error() {
        let page = r#"<input id="command" value="look">"#;
        assert!(SessionId::from_page(page).is_err());
        assert!(SessionId::new("   ").is_err());
    }

    #[test]
    fn lists_games_from_index() {
        let index = r#"<h1>Games</h1><a href="game/cloak">cloak</a><br><a href="game/isleadv">isleadv</a><br>"#;
        let games = game_names_from_index(index).unwrap();
        assert_eq!(games, vec!["cloak".to_string(), "isleadv".to_string()]);
    }
}
