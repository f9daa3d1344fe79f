use super::wire::{ApiDeck, ApiDraw};
use super::{DeckId, Drawn, NewDeck, RemoteDeckClient, Shuffled};
use crate::error::TransportError;
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;

/// Client for the public deck-of-cards HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDeckClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDeckClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://deckofcardsapi.com";

    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("deck-draw/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = format!("{}/api/deck/{path}", self.base_url);
        debug!("GET {url} {query:?}");
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode(status, url, &body)
    }
}

/// Error statuses usually still carry a `{"success": false, "error": ...}` body,
/// which is passed on so the caller sees the dealer's answer. Only an error
/// status whose body does not decode is reported as an HTTP failure.
fn decode<T: DeserializeOwned>(status: u16, url: String, body: &str) -> Result<T, TransportError> {
    match serde_json::from_str(body) {
        Ok(decoded) => Ok(decoded),
        Err(err) if (200..300).contains(&status) => Err(err.into()),
        Err(_) => Err(TransportError::Status { status, url }),
    }
}

#[async_trait]
impl RemoteDeckClient for HttpDeckClient {
    async fn new_shuffled_deck(&self, deck_count: u32) -> Result<NewDeck, TransportError> {
        let body: ApiDeck = self.get("new/shuffle/", &[("deck_count", deck_count.to_string())]).await?;
        NewDeck::try_from(body)
    }

    async fn draw(&self, deck_id: &DeckId, count: u32) -> Result<Drawn, TransportError> {
        let body: ApiDraw =
            self.get(&format!("{deck_id}/draw/"), &[("count", count.to_string())]).await?;
        Drawn::try_from(body)
    }

    async fn shuffle(&self, deck_id: &DeckId) -> Result<Shuffled, TransportError> {
        let body: ApiDeck = self.get(&format!("{deck_id}/shuffle/"), &[]).await?;
        Shuffled::try_from(body)
    }
}
