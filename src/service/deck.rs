use std::sync::Arc;

use crate::error::{DeckForgeError, DfResult};
use crate::provider::CachedDataProvider;
use crate::user::{UserCard, UserChallengeLiveSoloDeck, UserDeck, UserWorldBloomSupportDeck};
use crate::util::find_or_err;

pub const SUPPORT_DECK_SIZE: usize = 20;

pub struct DeckService {
    provider: Arc<CachedDataProvider>,
}

impl DeckService {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_user_card(&self, card_id: i64) -> DfResult<UserCard> {
        let user_cards = self.provider.user::<Vec<UserCard>>("userCards").await?;
        find_or_err(&user_cards, "user card", |it| it.card_id == card_id).cloned()
    }

    pub async fn get_deck(&self, deck_id: i64) -> DfResult<UserDeck> {
        let user_decks = self.provider.user::<Vec<UserDeck>>("userDecks").await?;
        find_or_err(&user_decks, "user deck", |it| it.deck_id == deck_id).cloned()
    }

    pub async fn get_deck_cards(&self, user_deck: &UserDeck) -> DfResult<Vec<UserCard>> {
        let mut cards = Vec::with_capacity(5);
        for card_id in user_deck.members() {
            cards.push(self.get_user_card(card_id).await?);
        }
        Ok(cards)
    }

    /// Builds a full deck record. The leader always sits in the first slot.
    pub fn to_user_deck(
        card_ids: &[i64],
        user_id: i64,
        deck_id: i64,
        name: &str,
    ) -> DfResult<UserDeck> {
        if card_ids.len() != 5 {
            return Err(DeckForgeError::Config(format!(
                "deck needs exactly 5 cards, got {}",
                card_ids.len()
            )));
        }
        Ok(UserDeck {
            user_id,
            deck_id,
            name: name.to_string(),
            leader: card_ids[0],
            sub_leader: card_ids[1],
            member1: card_ids[0],
            member2: card_ids[1],
            member3: card_ids[2],
            member4: card_ids[3],
            member5: card_ids[4],
        })
    }

    pub async fn get_challenge_live_solo_deck(
        &self,
        character_id: i64,
    ) -> DfResult<UserChallengeLiveSoloDeck> {
        let decks = self
            .provider
            .user::<Vec<UserChallengeLiveSoloDeck>>("userChallengeLiveSoloDecks")
            .await?;
        find_or_err(&decks, "challenge live solo deck", |it| {
            it.character_id == character_id
        })
        .cloned()
    }

    pub async fn get_challenge_live_solo_deck_cards(
        &self,
        deck: &UserChallengeLiveSoloDeck,
    ) -> DfResult<Vec<UserCard>> {
        let mut cards = Vec::with_capacity(5);
        for card_id in deck.members() {
            cards.push(self.get_user_card(card_id).await?);
        }
        Ok(cards)
    }

    /// Challenge decks may run short-handed, between 1 and 5 cards.
    pub fn to_user_challenge_live_solo_deck(
        card_ids: &[i64],
        character_id: i64,
    ) -> DfResult<UserChallengeLiveSoloDeck> {
        if card_ids.is_empty() || card_ids.len() > 5 {
            return Err(DeckForgeError::Config(format!(
                "challenge deck needs 1 to 5 cards, got {}",
                card_ids.len()
            )));
        }
        Ok(UserChallengeLiveSoloDeck {
            character_id,
            leader: Some(card_ids[0]),
            support1: card_ids.get(1).copied(),
            support2: card_ids.get(2).copied(),
            support3: card_ids.get(3).copied(),
            support4: card_ids.get(4).copied(),
        })
    }

    /// Support decks hold up to 20 members; missing slots stay empty.
    pub fn to_user_world_bloom_support_deck(
        card_ids: &[i64],
        event_id: i64,
        game_character_id: i64,
    ) -> DfResult<UserWorldBloomSupportDeck> {
        if card_ids.len() > SUPPORT_DECK_SIZE {
            return Err(DeckForgeError::Config(format!(
                "support deck holds at most {SUPPORT_DECK_SIZE} cards, got {}",
                card_ids.len()
            )));
        }
        Ok(UserWorldBloomSupportDeck {
            game_character_id,
            event_id,
            members: card_ids.to_vec(),
        })
    }
}
