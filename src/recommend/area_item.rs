//! Which area item upgrade buys the most deck power per coin?

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::deck::DeckCalculator;
use crate::error::DfResult;
use crate::master::{Area, AreaItem, AreaItemLevel, ShopItem};
use crate::provider::CachedDataProvider;
use crate::service::AreaItemService;
use crate::user::UserCard;
use crate::util::find_or_err;

const COIN_RESOURCE: &str = "coin";
const MATERIAL_RESOURCE: &str = "material";
const SEED_MATERIAL_ID: i64 = 17;
const SZK_MATERIAL_ID: i64 = 57;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaItemCost {
    pub coin: i64,
    pub seed: i64,
    pub szk: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendAreaItem {
    pub area: Area,
    pub area_item: AreaItem,
    pub area_item_level: AreaItemLevel,
    pub shop_item: ShopItem,
    pub cost: AreaItemCost,
    /// Deck power gained by buying this level.
    pub power: i64,
}

pub struct AreaItemRecommend {
    provider: Arc<CachedDataProvider>,
    area_item_service: AreaItemService,
    deck_calculator: DeckCalculator,
}

impl AreaItemRecommend {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            area_item_service: AreaItemService::new(provider.clone()),
            deck_calculator: DeckCalculator::new(provider.clone()),
            provider,
        }
    }

    fn find_cost(shop_item: &ShopItem, resource_type: &str, resource_id: i64) -> i64 {
        shop_item
            .costs
            .iter()
            .map(|it| &it.cost)
            .find(|it| {
                it.resource_type == resource_type && it.resource_id.unwrap_or(0) == resource_id
            })
            .map(|it| it.quantity)
            .unwrap_or(0)
    }

    async fn get_recommend_area_item(
        &self,
        area_item: &AreaItem,
        area_item_level: AreaItemLevel,
        power: i64,
    ) -> DfResult<RecommendAreaItem> {
        let areas = self.provider.master::<Area>("areas").await?;
        let area = find_or_err(&areas, "area", |it| it.id == area_item.area_id)?.clone();
        let shop_item = self.area_item_service.get_shop_item(&area_item_level).await?;
        let cost = AreaItemCost {
            coin: Self::find_cost(&shop_item, COIN_RESOURCE, 0),
            seed: Self::find_cost(&shop_item, MATERIAL_RESOURCE, SEED_MATERIAL_ID),
            szk: Self::find_cost(&shop_item, MATERIAL_RESOURCE, SZK_MATERIAL_ID),
        };
        Ok(RecommendAreaItem {
            area,
            area_item: area_item.clone(),
            area_item_level,
            shop_item,
            cost,
            power,
        })
    }

    /// Upgrades ranked by power gained per coin for the given deck.
    pub async fn recommend_area_item(
        &self,
        user_cards: &[UserCard],
    ) -> DfResult<Vec<RecommendAreaItem>> {
        let area_items = self.provider.master::<AreaItem>("areaItems").await?;
        let current_levels = self.area_item_service.get_area_item_levels().await?;
        let event_config = EventConfig::default();
        let current = self
            .deck_calculator
            .get_deck_detail(user_cards, user_cards, &event_config, Some(&current_levels))
            .await?;
        let mut recommend = Vec::with_capacity(area_items.len());
        for area_item in area_items.iter() {
            let next_level = self
                .area_item_service
                .get_area_item_next_level(
                    area_item,
                    current_levels.iter().find(|it| it.area_item_id == area_item.id),
                )
                .await?;
            let mut next_levels: Vec<AreaItemLevel> = current_levels
                .iter()
                .filter(|it| it.area_item_id != area_item.id)
                .cloned()
                .collect();
            next_levels.push(next_level.clone());
            let next = self
                .deck_calculator
                .get_deck_detail(user_cards, user_cards, &event_config, Some(&next_levels))
                .await?;
            recommend.push(
                self.get_recommend_area_item(
                    area_item,
                    next_level,
                    next.power.total - current.power.total,
                )
                .await?,
            );
        }
        let mut recommend: Vec<RecommendAreaItem> =
            recommend.into_iter().filter(|it| it.power > 0).collect();
        recommend.sort_by(|a, b| {
            let ratio = |it: &RecommendAreaItem| it.power as f64 / it.cost.coin as f64;
            ratio(b).total_cmp(&ratio(a))
        });
        Ok(recommend)
    }
}
