mod common;

use common::*;
use deck_draw::cards::{Rank, Suit};
use deck_draw::remote::LocalDealer;
use deck_draw::session::{DeckSession, SessionOptions};
use deck_draw::tui::app::{AppState, InputAction};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

fn local_app() -> AppState {
    let session =
        DeckSession::new(Arc::new(LocalDealer::seeded(21)), Handle::current(), SessionOptions::default());
    AppState::new(session)
}

/// Let spawned dealer calls run, then fold their results into the app.
async fn settle(app: &mut AppState) {
    for _ in 0..100 {
        app.refresh();
        if !app.busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("operation did not settle");
}

#[tokio::test]
async fn deal_draw_and_shuffle_through_inputs() {
    let mut app = local_app();
    assert!(app.view().deck.is_none());

    assert!(app.handle_input(InputAction::NewDeck));
    settle(&mut app).await;
    assert_eq!(app.view().remaining(), Some(52));
    assert!(!app.notice().unwrap().is_error);

    for _ in 0..3 {
        assert!(app.handle_input(InputAction::Draw));
        settle(&mut app).await;
    }
    assert_eq!(app.view().remaining(), Some(49));
    assert_eq!(app.view().drawn().len(), 3);
    assert!(app.notice().unwrap().text.starts_with("Drew "));

    assert!(app.handle_input(InputAction::Shuffle));
    assert_eq!(app.pending_action(), Some(InputAction::Shuffle));
    settle(&mut app).await;
    assert_eq!(app.view().remaining(), Some(52));
    assert!(app.view().drawn().is_empty());
    assert_eq!(app.pending_action(), None);
}

#[tokio::test]
async fn draw_before_deck_reports_error() {
    let mut app = local_app();
    assert!(!app.handle_input(InputAction::Draw));
    let notice = app.notice().unwrap();
    assert!(notice.is_error);
    assert!(!app.busy());
}

#[tokio::test]
async fn empty_deck_shows_no_cards_message() {
    let dealer = ScriptedDealer::new([new_deck("abc", 1), draw("abc", 0, vec![card(Rank::Ace, Suit::Hearts)])]);
    let mut app = AppState::new(session_with(dealer.clone()));
    app.handle_input(InputAction::NewDeck);
    settle(&mut app).await;
    app.handle_input(InputAction::Draw);
    settle(&mut app).await;

    assert!(!app.handle_input(InputAction::Draw));
    let notice = app.notice().unwrap();
    assert!(notice.is_error);
    assert_eq!(notice.text, "Error: no cards remaining!");
    assert_eq!(dealer.calls().len(), 2);
}

#[tokio::test]
async fn rejected_shuffle_shows_message() {
    let dealer = ScriptedDealer::new([new_deck("abc", 52), shuffle("abc", false, 52)]);
    let mut app = AppState::new(session_with(dealer));
    app.handle_input(InputAction::NewDeck);
    settle(&mut app).await;
    assert!(app.handle_input(InputAction::Shuffle));
    settle(&mut app).await;
    assert_eq!(app.notice().map(|n| n.text.as_str()), Some("Error: could not shuffle the deck."));
}

#[tokio::test]
async fn help_toggles() {
    let mut app = local_app();
    assert!(!app.help_open());
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(app.help_open());
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(!app.help_open());
}
