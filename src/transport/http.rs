#![cfg(feature = "std")]

use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Response};

use crate::config::ClientConfig;
use crate::protocol::{OutputMessage, GAME_PATH, INPUT_PATH, OUTPUT_PATH, PING_PATH};
use crate::session::{game_names_from_index, SessionId};
use crate::transport::{Transport, TransportError};

/// Transport talking to the game server over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
    poll_timeout: Duration,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &ClientConfig, client: Client) -> Self {
        Self {
            base_url: config.server.trim_end_matches('/').to_string(),
            client,
            poll_timeout: config.poll_timeout,
            request_timeout: config.request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a new game and return the session the server created for it.
    pub async fn start_game(&self, game: &str) -> anyhow::Result<SessionId> {
        let url = format!("{}/{}", self.url(GAME_PATH), game);
        log::info!("Starting game {} at {}", game, url);
        let page = self.get_page(&url).await?;
        if page.trim() == "No such game" {
            return Err(anyhow::anyhow!("Server has no game named {:?}", game));
        }
        SessionId::from_page(&page)
    }

    /// Names of the games the server offers.
    pub async fn list_games(&self) -> anyhow::Result<Vec<String>> {
        let page = self.get_page(&self.url("/")).await?;
        game_names_from_index(&page)
    }

    async fn get_page(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Request to {} failed: {}", url, e))?;
        let response = response
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Server rejected {}: {}", url, e))?;
        response
            .text()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", url, e))
    }
}

/// Sort a transport failure into the two kinds the client distinguishes.
///
/// Only a request that reached the server and then expired is a `Timeout`;
/// a connect timeout means the server is unreachable.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() {
        TransportError::connection_lost(format!("Cannot reach server: {}", err))
    } else if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::connection_lost(format!("Malformed response: {}", err))
    } else {
        TransportError::connection_lost(err.to_string())
    }
}

fn check_status(response: Response) -> Result<Response, TransportError> {
    response.error_for_status().map_err(classify)
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn fetch_output(&self, session: &SessionId) -> Result<OutputMessage, TransportError> {
        let response = self
            .client
            .get(self.url(OUTPUT_PATH))
            .query(&[("session", session.as_str())])
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .timeout(self.poll_timeout)
            .send()
            .await
            .map_err(classify)?;
        let response = check_status(response)?;
        // Read the body as text first: the server answers unknown sessions
        // with a bare "Error", which must surface as a lost connection.
        let body = response.text().await.map_err(classify)?;
        serde_json::from_str(&body).map_err(|e| {
            TransportError::connection_lost(format!("Malformed output response: {}", e))
        })
    }

    async fn send_input(&self, session: &SessionId, command: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.url(INPUT_PATH))
            .form(&[("command", command), ("session", session.as_str())])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(classify)?;
        check_status(response).map(|_| ())
    }

    async fn ping(&self, session: &SessionId) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.url(PING_PATH))
            .form(&[("session", session.as_str())])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(classify)?;
        check_status(response).map(|_| ())
    }
}
