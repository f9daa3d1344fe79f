//! Deck session: the local mirror of one remote deck.
//!
//! The dealer owns the deck; a [`DeckSession`] keeps a cached [`DeckState`]
//! that only changes when a reply from the dealer is reconciled into it. At
//! most one remote call is outstanding per session. Starting an operation
//! while another is in flight fails with [`SessionError::SessionBusy`]
//! before anything is sent.
//!
//! Operations check their preconditions synchronously and hand back a
//! [`Pending`] future. The remote call itself runs as a spawned task, so
//! dropping the `Pending` only stops waiting: the reply is still applied.
//!
//! ```
//! use deck_draw::remote::LocalDealer;
//! use deck_draw::session::{DeckSession, SessionOptions};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), deck_draw::error::SessionError> {
//! let session = DeckSession::new(
//!     Arc::new(LocalDealer::seeded(7)),
//!     tokio::runtime::Handle::current(),
//!     SessionOptions::default(),
//! );
//! session.start_new_deck()?.await?;
//! let cards = session.draw_one()?.await?;
//! assert_eq!(cards.len(), 1);
//! assert_eq!(session.snapshot().remaining(), Some(51));
//! # Ok(())
//! # }
//! ```

use crate::cards::DealtCard;
use crate::error::{SessionError, TransportError};
use crate::remote::{DeckId, RemoteDeckClient};
use log::{debug, info, warn};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cached view of the remote deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckState {
    deck_id: DeckId,
    remaining: u32,
    drawn: Vec<DealtCard>,
}

impl DeckState {
    fn new(deck_id: DeckId, remaining: u32) -> Self {
        Self { deck_id, remaining, drawn: Vec::new() }
    }

    pub fn deck_id(&self) -> &DeckId {
        &self.deck_id
    }

    /// Cards left according to the dealer's last reply.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Cards drawn since the deck was dealt or last reshuffled, oldest first.
    pub fn drawn(&self) -> &[DealtCard] {
        &self.drawn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SessionStatus {
    #[default]
    Idle,
    Busy,
}

/// Everything a presenter needs to draw the session. `version` bumps on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub version: u64,
    pub status: SessionStatus,
    pub deck: Option<DeckState>,
}

impl SessionSnapshot {
    pub fn is_busy(&self) -> bool {
        self.status == SessionStatus::Busy
    }

    pub fn remaining(&self) -> Option<u32> {
        self.deck.as_ref().map(DeckState::remaining)
    }

    pub fn drawn(&self) -> &[DealtCard] {
        self.deck.as_ref().map(DeckState::drawn).unwrap_or(&[])
    }
}

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Packs per deck requested from the dealer.
    pub deck_count: u32,
    /// Upper bound on a single remote call.
    pub timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { deck_count: 1, timeout: Duration::from_secs(10) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    NewDeck,
    Draw,
    Reshuffle,
}

struct Shared {
    client: Arc<dyn RemoteDeckClient>,
    state: watch::Sender<SessionSnapshot>,
    runtime: Handle,
    options: SessionOptions,
}

/// Handle to one deck session. Clones share the same session.
#[derive(Clone)]
pub struct DeckSession {
    shared: Arc<Shared>,
}

impl fmt::Debug for DeckSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckSession")
            .field("options", &self.shared.options)
            .field("state", &*self.shared.state.borrow())
            .finish()
    }
}

impl DeckSession {
    /// Remote calls are spawned onto `runtime`.
    pub fn new(client: Arc<dyn RemoteDeckClient>, runtime: Handle, options: SessionOptions) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self { shared: Arc::new(Shared { client, state, runtime, options }) }
    }

    pub fn options(&self) -> SessionOptions {
        self.shared.options
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.state.borrow().status
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.state.subscribe()
    }

    /// Replace the current deck (if any) with a freshly shuffled one.
    pub fn start_new_deck(&self) -> Result<Pending<DeckState>, SessionError> {
        let (lease, ()) = self.claim(Operation::NewDeck, |_| Ok(()))?;
        let client = Arc::clone(&self.shared.client);
        let SessionOptions { deck_count, timeout } = self.shared.options;
        Ok(self.spawn(async move {
            let reply = within(timeout, client.new_shuffled_deck(deck_count)).await;
            lease.settle(|snap| {
                let dealt = reply?;
                info!("new deck {} with {} cards", dealt.deck_id, dealt.remaining);
                let deck = DeckState::new(dealt.deck_id, dealt.remaining);
                snap.deck = Some(deck.clone());
                Ok(deck)
            })
        }))
    }

    /// Draw the top card.
    ///
    /// Fails with [`SessionError::NoCardsRemaining`] without contacting the
    /// dealer when the cached count is zero.
    pub fn draw_one(&self) -> Result<Pending<Vec<DealtCard>>, SessionError> {
        let (lease, deck_id) = self.claim(Operation::Draw, |snap| {
            let deck = snap.deck.as_ref().ok_or(SessionError::NoDeck)?;
            if deck.remaining == 0 {
                return Err(SessionError::NoCardsRemaining);
            }
            Ok(deck.deck_id.clone())
        })?;
        let client = Arc::clone(&self.shared.client);
        let timeout = self.shared.options.timeout;
        Ok(self.spawn(async move {
            let reply = within(timeout, client.draw(&deck_id, 1)).await;
            lease.settle(|snap| {
                let drawn = reply?;
                let deck = current(snap, &deck_id)?;
                // the dealer's count wins over anything derived locally
                deck.remaining = drawn.remaining;
                deck.drawn.extend(drawn.cards.iter().cloned());
                info!(
                    "drew {} card(s) from {deck_id}, {} remaining",
                    drawn.cards.len(),
                    drawn.remaining
                );
                Ok(drawn.cards)
            })
        }))
    }

    /// Return all cards to the deck and shuffle it. Resolves to the new remaining count.
    pub fn reshuffle(&self) -> Result<Pending<u32>, SessionError> {
        let (lease, deck_id) = self.claim(Operation::Reshuffle, |snap| {
            snap.deck.as_ref().map(|deck| deck.deck_id.clone()).ok_or(SessionError::NoDeck)
        })?;
        let client = Arc::clone(&self.shared.client);
        let timeout = self.shared.options.timeout;
        Ok(self.spawn(async move {
            let reply = within(timeout, client.shuffle(&deck_id)).await;
            lease.settle(|snap| {
                let shuffled = reply?;
                if !shuffled.success {
                    warn!("dealer refused to shuffle {deck_id}");
                    return Err(SessionError::ShuffleRejected);
                }
                let deck = current(snap, &deck_id)?;
                deck.remaining = shuffled.remaining;
                deck.drawn.clear();
                info!("reshuffled {deck_id}, {} remaining", shuffled.remaining);
                Ok(shuffled.remaining)
            })
        }))
    }

    /// Run `check` against the current state and, if it passes, mark the
    /// session busy. Both happen under the same state update.
    fn claim<T>(
        &self,
        op: Operation,
        check: impl FnOnce(&SessionSnapshot) -> Result<T, SessionError>,
    ) -> Result<(Lease, T), SessionError> {
        let mut claimed = Err(SessionError::SessionBusy);
        self.shared.state.send_if_modified(|snap| {
            if snap.is_busy() {
                return false;
            }
            claimed = check(snap);
            if claimed.is_err() {
                return false;
            }
            snap.status = SessionStatus::Busy;
            snap.version += 1;
            true
        });
        match claimed {
            Ok(target) => {
                debug!("{op:?} started");
                Ok((Lease { shared: Arc::clone(&self.shared), op, settled: false }, target))
            }
            Err(err) => {
                debug!("{op:?} refused: {err}");
                Err(err)
            }
        }
    }

    fn spawn<T: Send + 'static>(
        &self,
        task: impl Future<Output = Result<T, SessionError>> + Send + 'static,
    ) -> Pending<T> {
        Pending { handle: self.shared.runtime.spawn(task) }
    }
}

/// The deck a reply belongs to, if it is still the session's deck.
fn current<'a>(snap: &'a mut SessionSnapshot, deck_id: &DeckId) -> Result<&'a mut DeckState, SessionError> {
    match snap.deck.as_mut() {
        Some(deck) if deck.deck_id == *deck_id => Ok(deck),
        _ => {
            warn!("discarding reply for {deck_id}: deck was replaced");
            Err(SessionError::Superseded)
        }
    }
}

async fn within<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    tokio::time::timeout(limit, call).await.unwrap_or(Err(TransportError::Timeout(limit)))
}

/// Exclusive right to the session while one operation is in flight.
///
/// Settling applies the reply and returns the session to idle in a single
/// published change. `apply` must not touch the snapshot before its last
/// fallible step. A lease dropped unsettled (the task died) still frees the
/// session.
struct Lease {
    shared: Arc<Shared>,
    op: Operation,
    settled: bool,
}

impl Lease {
    fn settle<T>(
        mut self,
        apply: impl FnOnce(&mut SessionSnapshot) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut outcome = Err(SessionError::Transport(TransportError::Aborted));
        self.shared.state.send_modify(|snap| {
            outcome = apply(snap);
            snap.status = SessionStatus::Idle;
            snap.version += 1;
        });
        self.settled = true;
        if let Err(err) = &outcome {
            warn!("{:?} failed: {err}", self.op);
        }
        outcome
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("{:?} ended without a reply; releasing session", self.op);
        self.shared.state.send_modify(|snap| {
            snap.status = SessionStatus::Idle;
            snap.version += 1;
        });
    }
}

/// A deck operation that has been accepted and is waiting on the dealer.
///
/// Dropping it does not cancel the request.
#[derive(Debug)]
pub struct Pending<T> {
    handle: JoinHandle<Result<T, SessionError>>,
}

impl<T> Pending<T> {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T, SessionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| {
            joined.unwrap_or_else(|err| {
                warn!("deck operation task failed: {err}");
                Err(SessionError::Transport(TransportError::Aborted))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::LocalDealer;

    fn session() -> DeckSession {
        DeckSession::new(Arc::new(LocalDealer::seeded(11)), Handle::current(), SessionOptions::default())
    }

    #[tokio::test]
    async fn starts_empty_and_idle() {
        let s = session();
        let snap = s.snapshot();
        assert_eq!(snap.status, SessionStatus::Idle);
        assert!(snap.deck.is_none());
        assert!(snap.drawn().is_empty());
        assert_eq!(snap.version, 0);
    }

    #[tokio::test]
    async fn draw_and_reshuffle_need_a_deck() {
        let s = session();
        assert!(matches!(s.draw_one(), Err(SessionError::NoDeck)));
        assert!(matches!(s.reshuffle(), Err(SessionError::NoDeck)));
        assert_eq!(s.snapshot().version, 0);
    }

    #[tokio::test]
    async fn claim_marks_busy_synchronously() {
        let s = session();
        let pending = s.start_new_deck().unwrap();
        assert_eq!(s.status(), SessionStatus::Busy);
        assert!(matches!(s.start_new_deck(), Err(SessionError::SessionBusy)));
        pending.await.unwrap();
        assert_eq!(s.status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn new_deck_replaces_drawn_cards() {
        let s = session();
        let first = s.start_new_deck().unwrap().await.unwrap();
        s.draw_one().unwrap().await.unwrap();
        s.draw_one().unwrap().await.unwrap();
        assert_eq!(s.snapshot().drawn().len(), 2);

        let second = s.start_new_deck().unwrap().await.unwrap();
        assert_ne!(first.deck_id(), second.deck_id());
        let snap = s.snapshot();
        assert_eq!(snap.deck.as_ref().map(DeckState::deck_id), Some(second.deck_id()));
        assert!(snap.drawn().is_empty());
        assert_eq!(snap.remaining(), Some(52));
    }

    #[tokio::test]
    async fn dropped_pending_is_still_applied() {
        let s = session();
        s.start_new_deck().unwrap().await.unwrap();
        let mut updates = s.subscribe();
        drop(s.draw_one().unwrap());
        while s.status() == SessionStatus::Busy {
            updates.changed().await.unwrap();
        }
        assert_eq!(s.snapshot().remaining(), Some(51));
        assert_eq!(s.snapshot().drawn().len(), 1);
    }
}
