use crate::error::TransportError;
use crate::remote::{HttpDeckClient, LocalDealer, RemoteDeckClient};
use crate::session::SessionOptions;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Command-line configuration for the deck-draw front-end.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "deck-draw", version, about = "Draw cards from a shuffled deck")]
pub struct Config {
    /// Root URL of the deck-of-cards service.
    #[arg(long, default_value = HttpDeckClient::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of 52-card packs shuffled together.
    #[arg(long, default_value_t = 1)]
    pub deck_count: u32,

    /// Give up on a dealer reply after this many milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Deal from an in-process deck instead of the service.
    #[arg(long)]
    pub offline: bool,

    /// Seed for the offline dealer.
    #[arg(long, requires = "offline")]
    pub seed: Option<u64>,

    /// Artificial delay for each offline reply, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub latency_ms: u64,

    #[arg(long, default_value = "deck-draw.log")]
    pub log_file: PathBuf,

    /// off, error, warn, info, debug or trace.
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Screen refresh interval in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("deck count must be between 1 and 20, got {0}")]
    DeckCount(u32),
    #[error("timeout must be positive")]
    Timeout,
    #[error("tick interval must be positive")]
    Tick,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: HttpDeckClient::DEFAULT_BASE_URL.to_string(),
            deck_count: 1,
            timeout_ms: 10_000,
            offline: false,
            seed: None,
            latency_ms: 0,
            log_file: PathBuf::from("deck-draw.log"),
            log_level: LevelFilter::Info,
            tick_ms: 100,
        }
    }
}

impl Config {
    /// The service accepts at most this many packs per deck.
    pub const MAX_DECK_COUNT: u32 = 20;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=Self::MAX_DECK_COUNT).contains(&self.deck_count) {
            return Err(ConfigError::DeckCount(self.deck_count));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Timeout);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Tick);
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions { deck_count: self.deck_count, timeout: Duration::from_millis(self.timeout_ms) }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// The dealer this configuration points at.
    pub fn client(&self) -> Result<Arc<dyn RemoteDeckClient>, TransportError> {
        if !self.offline {
            return Ok(Arc::new(HttpDeckClient::new(self.base_url.clone())?));
        }
        let dealer = match self.seed {
            Some(seed) => LocalDealer::seeded(seed),
            None => LocalDealer::new(),
        };
        Ok(Arc::new(
            dealer
                .with_image_host(self.base_url.clone())
                .with_latency(Duration::from_millis(self.latency_ms)),
        ))
    }
}
