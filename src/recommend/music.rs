//! Which song yields the best score or event points for a fixed deck?

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::deck::DeckDetail;
use crate::error::DfResult;
use crate::event::{EventCalculator, EventType};
use crate::live::{LiveCalculator, LiveType};
use crate::music::MusicMeta;
use crate::provider::CachedDataProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendMusic {
    pub music_id: i64,
    pub difficulty: String,
    pub live_score: HashMap<LiveType, i64>,
    pub event_point: HashMap<LiveType, f64>,
}

pub struct MusicRecommend {
    provider: Arc<CachedDataProvider>,
}

impl MusicRecommend {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    fn get_recommend_music(
        deck: &DeckDetail,
        music_meta: &MusicMeta,
        live_type: LiveType,
        event_type: EventType,
    ) -> DfResult<RecommendMusic> {
        let mut live_score = HashMap::new();
        let mut event_point = HashMap::new();
        let score = LiveCalculator::get_live_score_by_deck(deck, music_meta, live_type)?;
        live_score.insert(live_type, score);
        if deck.event_bonus.is_some() || live_type == LiveType::Challenge {
            let point = EventCalculator::get_event_point(
                live_type,
                event_type,
                score as f64,
                music_meta.event_rate,
                deck.event_bonus.unwrap_or(0.0),
                1.0,
                0.0,
                1000.0,
            )?;
            event_point.insert(live_type, point);
        }
        Ok(RecommendMusic {
            music_id: music_meta.music_id,
            difficulty: music_meta.difficulty.clone(),
            live_score,
            event_point,
        })
    }

    pub async fn recommend_music(
        &self,
        deck: &DeckDetail,
        live_type: LiveType,
        event_type: EventType,
    ) -> DfResult<Vec<RecommendMusic>> {
        let metas = self.provider.music_meta().await?;
        metas
            .par_iter()
            .map(|meta| Self::get_recommend_music(deck, meta, live_type, event_type))
            .collect()
    }
}
