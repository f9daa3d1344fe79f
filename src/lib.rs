//! deck-draw: draw cards from a deck held by a remote dealer.
//!
//! The dealer (the public deck-of-cards service, or the in-process
//! [`remote::LocalDealer`]) owns the deck. A [`session::DeckSession`] keeps
//! the local view of it in step:
//! - one operation in flight at a time; overlapping calls are refused
//! - the dealer's remaining count is always taken as-is
//! - drawn cards are only appended, and only cleared by a new deck or a reshuffle
//!
//! ## Quick start
//! ```
//! use deck_draw::remote::LocalDealer;
//! use deck_draw::session::{DeckSession, SessionOptions};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), deck_draw::error::SessionError> {
//! let session = DeckSession::new(
//!     Arc::new(LocalDealer::seeded(1)),
//!     tokio::runtime::Handle::current(),
//!     SessionOptions::default(),
//! );
//! session.start_new_deck()?.await?;
//! session.draw_one()?.await?;
//! session.reshuffle()?.await?;
//! assert!(session.snapshot().drawn().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## TUI
//! ```sh
//! cargo run --bin deck-draw            # against deckofcardsapi.com
//! cargo run --bin deck-draw -- --offline --seed 7
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod error;
pub mod logging;
pub mod remote;
pub mod session;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
