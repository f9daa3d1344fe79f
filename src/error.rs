//! Failure conditions surfaced by the remote client and the deck session.
//!
//! None of these are fatal: a failed operation leaves the session's deck
//! state exactly as it was and returns the session to idle.

use crate::cards::CardParseError;
use std::time::Duration;

/// The remote call did not produce a usable response.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with HTTP {status}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("malformed card in response: {0}")]
    Card(#[from] CardParseError),
    #[error("dealer reported an error: {0}")]
    Api(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("request task ended before reporting back")]
    Aborted,
}

/// Outcome of a rejected or failed [`DeckSession`](crate::session::DeckSession) operation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no cards remaining")]
    NoCardsRemaining,
    #[error("dealer could not shuffle the deck")]
    ShuffleRejected,
    #[error("another deck operation is still in flight")]
    SessionBusy,
    #[error("no deck yet; start a new deck first")]
    NoDeck,
    #[error("deck was replaced before the dealer replied")]
    Superseded,
}

impl SessionError {
    /// True when the failure was decided locally, without contacting the dealer.
    pub fn is_local(&self) -> bool {
        matches!(self, SessionError::NoCardsRemaining | SessionError::SessionBusy | SessionError::NoDeck)
    }
}
