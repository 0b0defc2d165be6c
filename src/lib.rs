//! Deck scoring and optimization engine for rhythm-game lives: card and deck
//! evaluation, live score and event point models, and branch-and-bound deck
//! search, all fed from pluggable master/user data providers.

pub mod card;
pub mod config;
pub mod deck;
pub mod detail_map;
pub mod error;
pub mod event;
pub mod live;
pub mod live_exact;
pub mod master;
pub mod music;
pub mod provider;
pub mod recommend;
pub mod service;
pub mod user;

mod util;

pub use error::{DeckForgeError, DfResult};
pub use provider::{CachedDataProvider, DataProvider, SharedCache};
