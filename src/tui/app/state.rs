use super::pending::InFlight;
use crate::error::SessionError;
use crate::session::{DeckSession, SessionSnapshot};
use log::debug;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    NewDeck,
    Draw,
    Shuffle,
    ToggleHelp,
}

/// A short-lived status line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    at: Instant,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    session: DeckSession,
    updates: watch::Receiver<SessionSnapshot>,
    // Last snapshot observed from the session
    view: SessionSnapshot,
    in_flight: Option<InFlight>,
    help_open: bool,
    notice: Option<Notice>,
}

impl AppState {
    const NOTICE_TTL: Duration = Duration::from_secs(3);

    pub fn new(session: DeckSession) -> Self {
        let mut updates = session.subscribe();
        let view = updates.borrow_and_update().clone();
        Self {
            session,
            updates,
            view,
            in_flight: None,
            help_open: false,
            notice: None,
        }
    }

    pub fn session(&self) -> &DeckSession {
        &self.session
    }

    pub fn view(&self) -> &SessionSnapshot {
        &self.view
    }

    /// Draw, shuffle and new-deck are disabled while this is true.
    pub fn busy(&self) -> bool {
        self.in_flight.is_some() || self.view.is_busy()
    }

    /// Which action is waiting on the dealer, if any.
    pub fn pending_action(&self) -> Option<InputAction> {
        self.in_flight.as_ref().map(InFlight::action)
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn set_notice(&mut self, text: String, is_error: bool) {
        self.notice = Some(Notice { text, is_error, at: Instant::now() });
    }

    fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn fail(&mut self, err: &SessionError) {
        let text = match err {
            SessionError::NoCardsRemaining => "Error: no cards remaining!".to_string(),
            SessionError::ShuffleRejected => "Error: could not shuffle the deck.".to_string(),
            other => format!("Error: {other}"),
        };
        self.set_notice(text, true);
    }

    fn dispatch(&mut self, action: InputAction) -> bool {
        if self.busy() {
            debug!("{action:?} ignored while busy");
            return false;
        }
        let started = match action {
            InputAction::NewDeck => self.session.start_new_deck().map(InFlight::NewDeck),
            InputAction::Draw => self.session.draw_one().map(InFlight::Draw),
            InputAction::Shuffle => self.session.reshuffle().map(InFlight::Shuffle),
            InputAction::ToggleHelp => return false,
        };
        match started {
            Ok(op) => {
                self.in_flight = Some(op);
                self.clear_notice();
                self.sync_view();
                true
            }
            Err(err) => {
                self.fail(&err);
                false
            }
        }
    }

    /// Returns true when a deck operation was started.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleHelp => {
                self.help_open = !self.help_open;
                false
            }
            InputAction::NewDeck | InputAction::Draw | InputAction::Shuffle => self.dispatch(action),
        }
    }

    fn sync_view(&mut self) {
        if self.updates.has_changed().unwrap_or(false) {
            self.view = self.updates.borrow_and_update().clone();
        }
    }

    /// Pick up finished operations and session changes; expire old notices.
    pub fn refresh(&mut self) {
        if let Some(outcome) = self.in_flight.as_mut().and_then(InFlight::poll_now) {
            self.in_flight = None;
            match outcome {
                Ok(text) => self.set_notice(text, false),
                Err(err) => self.fail(&err),
            }
        }
        self.sync_view();
        if self.notice.as_ref().is_some_and(|n| n.at.elapsed() >= Self::NOTICE_TTL) {
            self.clear_notice();
        }
    }
}
