//! Remote dealer boundary.
//!
//! The deck itself lives on a card-dealing service; this module defines the
//! three calls the session needs (`RemoteDeckClient`) plus two
//! implementations: [`HttpDeckClient`] for the real service and
//! [`LocalDealer`], an in-process dealer that speaks the same contract.

use crate::cards::DealtCard;
use crate::error::TransportError;
use async_trait::async_trait;
use std::fmt;

mod http;
mod local;
pub mod wire;

pub use http::HttpDeckClient;
pub use local::LocalDealer;

/// Opaque identifier the dealer assigns to a deck.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeckId(String);

impl DeckId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeckId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Reply to a new-deck request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeck {
    pub deck_id: DeckId,
    pub remaining: u32,
    pub shuffled: bool,
}

/// Reply to a draw request. `cards` is in the order the dealer handed them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawn {
    pub deck_id: DeckId,
    pub remaining: u32,
    pub cards: Vec<DealtCard>,
}

/// Reply to a shuffle request. `success == false` is the dealer declining, not a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shuffled {
    pub success: bool,
    pub deck_id: DeckId,
    pub remaining: u32,
}

/// The three calls a deck session makes against the dealer.
///
/// Implementations must not assume calls are serialized for them; the session
/// guarantees at most one call per session is outstanding.
#[async_trait]
pub trait RemoteDeckClient: Send + Sync {
    /// Ask for a freshly shuffled deck made of `deck_count` packs.
    async fn new_shuffled_deck(&self, deck_count: u32) -> Result<NewDeck, TransportError>;

    /// Take `count` cards off the top of `deck_id`.
    ///
    /// The dealer is not relied on to refuse draws past the end of the deck.
    async fn draw(&self, deck_id: &DeckId, count: u32) -> Result<Drawn, TransportError>;

    /// Return every card to `deck_id` and shuffle it, keeping the id.
    async fn shuffle(&self, deck_id: &DeckId) -> Result<Shuffled, TransportError>;
}

/// Image location for a card code, following the service's static asset layout.
pub(crate) fn image_url(base_url: &str, code: &str) -> String {
    format!("{}/static/img/{code}.png", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_ignores_trailing_slash() {
        assert_eq!(
            image_url("https://deckofcardsapi.com/", "0H"),
            "https://deckofcardsapi.com/static/img/0H.png"
        );
        assert_eq!(image_url("http://x", "AS"), "http://x/static/img/AS.png");
    }
}
