use std::collections::HashSet;
use std::sync::Arc;

use crate::error::DfResult;
use crate::master::{MysekaiGate, MysekaiGateLevel};
use crate::provider::CachedDataProvider;
use crate::user::{MysekaiGateBonus, UserMysekaiCanvas, UserMysekaiFixtureBonus, UserMysekaiGate};
use crate::util::find_or_err;

/// Custom-world bonuses. Absent user tables mean the feature is untouched
/// and read as empty rather than as an error.
pub struct MysekaiService {
    provider: Arc<CachedDataProvider>,
}

impl MysekaiService {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_mysekai_canvas_bonus_cards(&self) -> DfResult<HashSet<i64>> {
        let canvases = self
            .provider
            .user_opt::<Vec<UserMysekaiCanvas>>("userMysekaiCanvases")
            .await?;
        Ok(canvases
            .map(|it| it.iter().map(|canvas| canvas.card_id).collect())
            .unwrap_or_default())
    }

    pub async fn get_mysekai_fixture_bonuses(&self) -> DfResult<Vec<UserMysekaiFixtureBonus>> {
        let bonuses = self
            .provider
            .user_opt::<Vec<UserMysekaiFixtureBonus>>(
                "userMysekaiFixtureGameCharacterPerformanceBonuses",
            )
            .await?;
        Ok(bonuses.map(|it| it.as_ref().clone()).unwrap_or_default())
    }

    pub async fn get_mysekai_gate_bonuses(&self) -> DfResult<Vec<MysekaiGateBonus>> {
        let user_gates = self
            .provider
            .user_opt::<Vec<UserMysekaiGate>>("userMysekaiGates")
            .await?;
        let Some(user_gates) = user_gates else {
            return Ok(Vec::new());
        };
        if user_gates.is_empty() {
            return Ok(Vec::new());
        }
        let gates = self.provider.master::<MysekaiGate>("mysekaiGates").await?;
        let levels = self
            .provider
            .master::<MysekaiGateLevel>("mysekaiGateLevels")
            .await?;
        user_gates
            .iter()
            .map(|it| {
                let gate = find_or_err(&gates, "mysekai gate", |g| g.id == it.mysekai_gate_id)?;
                let level = find_or_err(&levels, "mysekai gate level", |l| {
                    l.mysekai_gate_id == it.mysekai_gate_id && l.level == it.mysekai_gate_level
                })?;
                Ok(MysekaiGateBonus {
                    unit: gate.unit,
                    power_bonus_rate: level.power_bonus_rate,
                })
            })
            .collect()
    }
}
