use super::{image_url, DeckId, Drawn, NewDeck, RemoteDeckClient, Shuffled};
use crate::cards::DealtCard;
use crate::deck::Deck;
use crate::error::TransportError;
use async_trait::async_trait;
use log::debug;
use rand::distr::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// An in-process dealer with the same behavior as the remote service.
///
/// Useful offline and in tests. Decks are keyed by randomly generated ids;
/// draws past the end of a deck hand back whatever is left instead of failing.
/// Only the most recently dealt decks are kept; older ids become unknown.
#[derive(Debug)]
pub struct LocalDealer {
    base_url: String,
    latency: Duration,
    table: Mutex<Table>,
}

#[derive(Debug)]
struct Table {
    rng: ChaCha8Rng,
    decks: HashMap<DeckId, Deck>,
    // deal order, oldest first
    order: VecDeque<DeckId>,
}

impl Table {
    const MAX_DECKS: usize = 8;

    fn keep(&mut self, deck_id: DeckId, deck: Deck) {
        self.decks.insert(deck_id.clone(), deck);
        self.order.push_back(deck_id);
        while self.order.len() > Self::MAX_DECKS {
            if let Some(old) = self.order.pop_front() {
                debug!("forgetting deck {old}");
                self.decks.remove(&old);
            }
        }
    }
}

impl LocalDealer {
    const ID_LEN: usize = 12;

    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_os_rng())
    }

    /// Deterministic dealer: same seed, same deck ids and card order.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            base_url: super::HttpDeckClient::DEFAULT_BASE_URL.to_string(),
            latency: Duration::ZERO,
            table: Mutex::new(Table { rng, decks: HashMap::new(), order: VecDeque::new() }),
        }
    }

    /// Delay every reply by `latency`, to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Host used when building card image references.
    pub fn with_image_host(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut Table) -> T) -> T {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut table)
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for LocalDealer {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown(deck_id: &DeckId) -> TransportError {
    TransportError::Api(format!("deck {deck_id} does not exist"))
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[async_trait]
impl RemoteDeckClient for LocalDealer {
    async fn new_shuffled_deck(&self, deck_count: u32) -> Result<NewDeck, TransportError> {
        self.round_trip().await;
        let reply = self.with_table(|table| {
            let id: String = (0..Self::ID_LEN)
                .map(|_| char::from(table.rng.sample(Alphanumeric)).to_ascii_lowercase())
                .collect();
            let deck_id = DeckId::new(id);
            let mut deck = Deck::with_packs(deck_count);
            deck.shuffle_with(&mut table.rng);
            let remaining = count(deck.len());
            table.keep(deck_id.clone(), deck);
            NewDeck { deck_id, remaining, shuffled: true }
        });
        debug!("dealt new deck {} ({} cards)", reply.deck_id, reply.remaining);
        Ok(reply)
    }

    async fn draw(&self, deck_id: &DeckId, n: u32) -> Result<Drawn, TransportError> {
        self.round_trip().await;
        let (cards, remaining) = self.with_table(|table| {
            let deck = table.decks.get_mut(deck_id).ok_or_else(|| unknown(deck_id))?;
            Ok::<_, TransportError>((deck.draw_n(n as usize), count(deck.len())))
        })?;
        let cards = cards
            .into_iter()
            .map(|card| DealtCard::new(card, image_url(&self.base_url, &card.code())))
            .collect();
        Ok(Drawn { deck_id: deck_id.clone(), remaining, cards })
    }

    async fn shuffle(&self, deck_id: &DeckId) -> Result<Shuffled, TransportError> {
        self.round_trip().await;
        self.with_table(|table| -> Result<Shuffled, TransportError> {
            let Table { rng, decks, .. } = table;
            let deck = decks.get_mut(deck_id).ok_or_else(|| unknown(deck_id))?;
            deck.reshuffle(rng);
            Ok(Shuffled { success: true, deck_id: deck_id.clone(), remaining: count(deck.len()) })
        })
    }
}
