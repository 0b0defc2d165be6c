//! Candidate admission tiers for the deck search.
//!
//! Tiers are tried in priority order; a card is admitted by the first row it
//! satisfies. The search stops widening as soon as the admitted set can form
//! a deck, so stronger tiers keep the branch-and-bound pool small.

use crate::event::EventType;
use crate::live::LiveType;
use crate::master::CardRarityType;

#[derive(Debug, Clone, Copy)]
pub struct CardPriority {
    /// Minimum displayed event bonus.
    pub event_bonus: f64,
    pub card_rarity_type: CardRarityType,
    /// Minimum master rank.
    pub master_rank: i32,
    pub priority: i32,
}

const fn row(
    event_bonus: f64,
    card_rarity_type: CardRarityType,
    master_rank: i32,
    priority: i32,
) -> CardPriority {
    CardPriority {
        event_bonus,
        card_rarity_type,
        master_rank,
        priority,
    }
}

/// Challenge lives ignore bonuses; rarity alone orders the tiers.
static CHALLENGE_LIVE_CARD_PRIORITIES: [CardPriority; 5] = [
    row(0.0, CardRarityType::Rarity4, 0, 0),
    row(0.0, CardRarityType::RarityBirthday, 0, 10),
    row(0.0, CardRarityType::Rarity3, 0, 20),
    row(0.0, CardRarityType::Rarity2, 0, 30),
    row(0.0, CardRarityType::Rarity1, 0, 40),
];

/// Bonus thresholds are sums of the stackable parts (character match, event
/// card, master rank tiers) a card of that shape can reach.
static BLOOM_CARD_PRIORITIES: [CardPriority; 15] = [
    row(25.0 + 10.0 + 20.0, CardRarityType::Rarity4, 0, 0),
    row(25.0 + 25.0, CardRarityType::Rarity4, 5, 5),
    row(25.0 + 10.0, CardRarityType::Rarity4, 0, 10),
    row(25.0 + 15.0, CardRarityType::RarityBirthday, 5, 10),
    row(25.0 + 5.0, CardRarityType::RarityBirthday, 0, 20),
    row(25.0 + 5.0, CardRarityType::Rarity3, 5, 20),
    row(25.0, CardRarityType::Rarity4, 5, 21),
    row(10.0, CardRarityType::Rarity4, 0, 22),
    row(25.0, CardRarityType::Rarity3, 0, 30),
    row(25.0, CardRarityType::Rarity2, 0, 40),
    row(25.0, CardRarityType::Rarity1, 0, 50),
    row(5.0, CardRarityType::RarityBirthday, 0, 70),
    row(0.0, CardRarityType::Rarity3, 0, 80),
    row(0.0, CardRarityType::Rarity2, 0, 90),
    row(0.0, CardRarityType::Rarity1, 0, 100),
];

static MARATHON_CHEERFUL_CARD_PRIORITIES: [CardPriority; 28] = [
    row(25.0 + 25.0 + 20.0 + 25.0, CardRarityType::Rarity4, 5, 0),
    row(25.0 + 25.0 + 20.0 + 10.0, CardRarityType::Rarity4, 0, 10),
    row(25.0 + 25.0 + 25.0, CardRarityType::Rarity4, 5, 10),
    row(25.0 + 15.0 + 25.0, CardRarityType::Rarity4, 5, 30),
    row(25.0 + 25.0 + 10.0, CardRarityType::Rarity4, 0, 40),
    row(25.0 + 25.0, CardRarityType::Rarity4, 5, 40),
    row(25.0 + 25.0 + 15.0, CardRarityType::RarityBirthday, 5, 40),
    row(25.0 + 15.0 + 10.0, CardRarityType::Rarity4, 0, 50),
    row(25.0 + 25.0 + 5.0, CardRarityType::RarityBirthday, 0, 50),
    row(25.0 + 25.0 + 5.0, CardRarityType::Rarity3, 5, 50),
    row(25.0 + 10.0, CardRarityType::Rarity4, 0, 60),
    row(25.0 + 15.0, CardRarityType::RarityBirthday, 5, 60),
    row(25.0 + 25.0, CardRarityType::Rarity3, 0, 60),
    row(25.0, CardRarityType::Rarity4, 5, 60),
    row(15.0 + 10.0, CardRarityType::Rarity4, 0, 70),
    row(25.0 + 5.0, CardRarityType::RarityBirthday, 0, 70),
    row(25.0 + 5.0, CardRarityType::Rarity3, 5, 70),
    row(25.0 + 25.0, CardRarityType::Rarity2, 0, 70),
    row(25.0 + 25.0, CardRarityType::Rarity1, 0, 70),
    row(15.0 + 5.0, CardRarityType::RarityBirthday, 0, 80),
    row(25.0, CardRarityType::Rarity3, 0, 80),
    row(25.0, CardRarityType::Rarity2, 0, 80),
    row(25.0, CardRarityType::Rarity1, 0, 80),
    row(10.0, CardRarityType::Rarity4, 0, 80),
    row(5.0, CardRarityType::RarityBirthday, 0, 90),
    row(0.0, CardRarityType::Rarity3, 0, 100),
    row(0.0, CardRarityType::Rarity2, 0, 100),
    row(0.0, CardRarityType::Rarity1, 0, 100),
];

pub fn get_card_priorities(live_type: LiveType, event_type: EventType) -> &'static [CardPriority] {
    if live_type == LiveType::Challenge {
        return &CHALLENGE_LIVE_CARD_PRIORITIES;
    }
    match event_type {
        EventType::Bloom => &BLOOM_CARD_PRIORITIES,
        EventType::Marathon | EventType::Cheerful => &MARATHON_CHEERFUL_CARD_PRIORITIES,
        EventType::None => &[],
    }
}
