//! Thin read services joining user state with master tables.

pub mod area_item;
pub mod card;
pub mod deck;
pub mod event;
pub mod mysekai;

pub use area_item::AreaItemService;
pub use card::CardService;
pub use deck::DeckService;
pub use event::EventService;
pub use mysekai::MysekaiService;
