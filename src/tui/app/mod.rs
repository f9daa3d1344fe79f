mod pending;
mod state;

pub use state::{AppState, InputAction, Notice};
