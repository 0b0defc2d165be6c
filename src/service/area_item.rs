use std::sync::Arc;

use crate::error::DfResult;
use crate::master::{AreaItem, AreaItemLevel, ShopItem};
use crate::provider::CachedDataProvider;
use crate::user::UserArea;
use crate::util::find_or_err;

const AREA_ITEM_MAX_LEVEL: i32 = 15;

pub struct AreaItemService {
    provider: Arc<CachedDataProvider>,
}

impl AreaItemService {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    /// Every area item the player owns, resolved to its current level row.
    pub async fn get_area_item_levels(&self) -> DfResult<Vec<AreaItemLevel>> {
        let user_areas = self.provider.user::<Vec<UserArea>>("userAreas").await?;
        let levels = self.provider.master::<AreaItemLevel>("areaItemLevels").await?;
        user_areas
            .iter()
            .flat_map(|area| area.area_items.iter())
            .map(|item| {
                find_or_err(&levels, "area item level", |it| {
                    it.area_item_id == item.area_item_id && it.level == item.level
                })
                .cloned()
            })
            .collect()
    }

    pub async fn get_area_item_level(
        &self,
        area_item_id: i64,
        level: i32,
    ) -> DfResult<AreaItemLevel> {
        let levels = self.provider.master::<AreaItemLevel>("areaItemLevels").await?;
        find_or_err(&levels, "area item level", |it| {
            it.area_item_id == area_item_id && it.level == level
        })
        .cloned()
    }

    /// The next upgrade step: level 1 when unowned, clamped at the cap.
    pub async fn get_area_item_next_level(
        &self,
        area_item: &AreaItem,
        current: Option<&AreaItemLevel>,
    ) -> DfResult<AreaItemLevel> {
        let level = match current {
            None => 1,
            Some(it) if it.level == AREA_ITEM_MAX_LEVEL => AREA_ITEM_MAX_LEVEL,
            Some(it) => it.level + 1,
        };
        self.get_area_item_level(area_item.id, level).await
    }

    /// Shop rows are laid out in blocks: ten entries per item up to level 10,
    /// then five per item from level 11.
    pub async fn get_shop_item(&self, area_item_level: &AreaItemLevel) -> DfResult<ShopItem> {
        let shop_items = self.provider.master::<ShopItem>("shopItems").await?;
        let id_offset = if area_item_level.level <= 10 {
            1000 + (area_item_level.area_item_id - 1) * 10
        } else {
            1550 - 10 + (area_item_level.area_item_id - 1) * 5
        };
        let id = id_offset + i64::from(area_item_level.level);
        find_or_err(&shop_items, "shop item", |it| it.id == id).cloned()
    }
}
