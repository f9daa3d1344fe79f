//! JSON bodies of the deck-of-cards service and their conversion into domain replies.

use super::{DeckId, Drawn, NewDeck, Shuffled};
use crate::cards::{Card, DealtCard, Rank, Suit};
use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Body of `deck/new/shuffle/` and `deck/{id}/shuffle/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDeck {
    pub success: bool,
    #[serde(default)]
    pub deck_id: String,
    #[serde(default)]
    pub remaining: Option<u32>,
    #[serde(default)]
    pub shuffled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `deck/{id}/draw/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDraw {
    pub success: bool,
    #[serde(default)]
    pub deck_id: String,
    #[serde(default)]
    pub cards: Vec<ApiCard>,
    #[serde(default)]
    pub remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One card inside a draw body. The service also sends an `images` map, which is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCard {
    pub code: String,
    pub image: String,
    pub value: String,
    pub suit: String,
}

fn rejected(error: Option<String>) -> TransportError {
    TransportError::Api(error.unwrap_or_else(|| "request was not successful".to_string()))
}

/// A successful reply must say how many cards are left; a missing count is never read as zero.
fn reported(remaining: Option<u32>) -> Result<u32, TransportError> {
    remaining.ok_or_else(|| TransportError::Api("successful reply has no remaining count".to_string()))
}

impl TryFrom<ApiDeck> for NewDeck {
    type Error = TransportError;

    fn try_from(body: ApiDeck) -> Result<Self, Self::Error> {
        if !body.success {
            return Err(rejected(body.error));
        }
        if body.deck_id.is_empty() {
            return Err(TransportError::Api("new deck has no id".to_string()));
        }
        Ok(NewDeck {
            deck_id: DeckId::new(body.deck_id),
            remaining: reported(body.remaining)?,
            shuffled: body.shuffled,
        })
    }
}

/// `success: false` is kept as data: the dealer declining to shuffle is not a transport failure.
impl TryFrom<ApiDeck> for Shuffled {
    type Error = TransportError;

    fn try_from(body: ApiDeck) -> Result<Self, Self::Error> {
        let remaining = match body.remaining {
            None if !body.success => 0,
            remaining => reported(remaining)?,
        };
        Ok(Shuffled { success: body.success, deck_id: DeckId::new(body.deck_id), remaining })
    }
}

impl TryFrom<ApiCard> for DealtCard {
    type Error = TransportError;

    fn try_from(body: ApiCard) -> Result<Self, Self::Error> {
        let rank = Rank::from_str(&body.value).map_err(crate::cards::CardParseError::from)?;
        let suit = Suit::from_str(&body.suit).map_err(crate::cards::CardParseError::from)?;
        Ok(DealtCard::new(Card::new(rank, suit), body.image))
    }
}

impl TryFrom<ApiDraw> for Drawn {
    type Error = TransportError;

    fn try_from(body: ApiDraw) -> Result<Self, Self::Error> {
        if !body.success {
            return Err(rejected(body.error));
        }
        let remaining = reported(body.remaining)?;
        let cards = body.cards.into_iter().map(DealtCard::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Drawn { deck_id: DeckId::new(body.deck_id), remaining, cards })
    }
}
