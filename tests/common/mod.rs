#![allow(dead_code)]

use async_trait::async_trait;
use deck_draw::cards::{Card, DealtCard, Rank, Suit};
use deck_draw::error::TransportError;
use deck_draw::remote::{DeckId, Drawn, NewDeck, RemoteDeckClient, Shuffled};
use deck_draw::session::{DeckSession, SessionOptions};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

/// A call as seen by the dealer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NewDeck(u32),
    Draw(DeckId, u32),
    Shuffle(DeckId),
}

/// What the dealer answers to the next call.
#[derive(Debug)]
pub enum Reply {
    NewDeck(Result<NewDeck, TransportError>),
    Draw(Result<Drawn, TransportError>),
    Shuffle(Result<Shuffled, TransportError>),
    /// Never answer; used to provoke timeouts.
    Hang,
}

/// Dealer that replays a fixed script and records every call it receives.
///
/// When `held` is set, each reply waits for a permit from `release`.
pub struct ScriptedDealer {
    script: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
    gate: Option<Semaphore>,
}

impl ScriptedDealer {
    pub fn new(script: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self { script: Mutex::new(script.into_iter().collect()), calls: Mutex::default(), gate: None })
    }

    pub fn held(script: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::default(),
            gate: Some(Semaphore::new(0)),
        })
    }

    /// Let one held reply through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn next(&self, call: Call) -> Reply {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Hang) => std::future::pending().await,
            Some(reply) => reply,
            None => panic!("unscripted call: {call:?}"),
        }
    }
}

#[async_trait]
impl RemoteDeckClient for ScriptedDealer {
    async fn new_shuffled_deck(&self, deck_count: u32) -> Result<NewDeck, TransportError> {
        match self.next(Call::NewDeck(deck_count)).await {
            Reply::NewDeck(r) => r,
            other => panic!("expected new-deck reply, got {other:?}"),
        }
    }

    async fn draw(&self, deck_id: &DeckId, count: u32) -> Result<Drawn, TransportError> {
        match self.next(Call::Draw(deck_id.clone(), count)).await {
            Reply::Draw(r) => r,
            other => panic!("expected draw reply, got {other:?}"),
        }
    }

    async fn shuffle(&self, deck_id: &DeckId) -> Result<Shuffled, TransportError> {
        match self.next(Call::Shuffle(deck_id.clone())).await {
            Reply::Shuffle(r) => r,
            other => panic!("expected shuffle reply, got {other:?}"),
        }
    }
}

pub fn card(rank: Rank, suit: Suit) -> DealtCard {
    let c = Card::new(rank, suit);
    DealtCard::new(c, format!("https://deckofcardsapi.com/static/img/{}.png", c.code()))
}

pub fn new_deck(id: &str, remaining: u32) -> Reply {
    Reply::NewDeck(Ok(NewDeck { deck_id: DeckId::from(id), remaining, shuffled: true }))
}

pub fn draw(id: &str, remaining: u32, cards: Vec<DealtCard>) -> Reply {
    Reply::Draw(Ok(Drawn { deck_id: DeckId::from(id), remaining, cards }))
}

pub fn shuffle(id: &str, success: bool, remaining: u32) -> Reply {
    Reply::Shuffle(Ok(Shuffled { success, deck_id: DeckId::from(id), remaining }))
}

pub fn session_with(dealer: Arc<ScriptedDealer>) -> DeckSession {
    session_with_timeout(dealer, Duration::from_secs(5))
}

pub fn session_with_timeout(dealer: Arc<ScriptedDealer>, timeout: Duration) -> DeckSession {
    DeckSession::new(dealer, Handle::current(), SessionOptions { deck_count: 1, timeout })
}
