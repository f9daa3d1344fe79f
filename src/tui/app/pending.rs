use super::InputAction;
use crate::cards::DealtCard;
use crate::error::SessionError;
use crate::session::{DeckState, Pending};
use futures::FutureExt;

/// The one session operation the presenter is waiting on.
#[derive(Debug)]
pub(crate) enum InFlight {
    NewDeck(Pending<DeckState>),
    Draw(Pending<Vec<DealtCard>>),
    Shuffle(Pending<u32>),
}

impl InFlight {
    pub(crate) fn action(&self) -> InputAction {
        match self {
            InFlight::NewDeck(_) => InputAction::NewDeck,
            InFlight::Draw(_) => InputAction::Draw,
            InFlight::Shuffle(_) => InputAction::Shuffle,
        }
    }

    /// Check for completion without blocking; `Some` carries the message to show.
    pub(crate) fn poll_now(&mut self) -> Option<Result<String, SessionError>> {
        match self {
            InFlight::NewDeck(p) => p.now_or_never().map(|r| {
                r.map(|deck| format!("New deck {} ({} cards)", deck.deck_id(), deck.remaining()))
            }),
            InFlight::Draw(p) => p.now_or_never().map(|r| r.map(|cards| drew(&cards))),
            InFlight::Shuffle(p) => {
                p.now_or_never().map(|r| r.map(|n| format!("Deck reshuffled ({n} cards)")))
            }
        }
    }
}

fn drew(cards: &[DealtCard]) -> String {
    if cards.is_empty() {
        return "Dealer handed back no cards".to_string();
    }
    let names: Vec<String> = cards.iter().map(|c| c.to_string()).collect();
    format!("Drew {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};

    #[test]
    fn draw_message_lists_cards() {
        let cards = vec![
            DealtCard::new(Card::new(Rank::Ace, Suit::Spades), ""),
            DealtCard::new(Card::new(Rank::Ten, Suit::Hearts), ""),
        ];
        assert_eq!(drew(&cards), "Drew A♠, 10♥");
        assert_eq!(drew(&[]), "Dealer handed back no cards");
    }
}
