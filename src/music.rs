//! Song metadata and parsed charts.
//!
//! `MusicMeta` is produced by an offline chart-analysis pipeline; the engine
//! only consumes the resulting coefficient table. Field names stay snake_case
//! to match the meta JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicMeta {
    pub music_id: i64,
    pub difficulty: String,
    pub music_time: f64,
    pub event_rate: f64,
    pub base_score: f64,
    pub base_score_auto: f64,
    /// Six skill-window coefficients per live mode.
    pub skill_score_solo: Vec<f64>,
    pub skill_score_auto: Vec<f64>,
    pub skill_score_multi: Vec<f64>,
    pub fever_score: f64,
    pub tap_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MusicTimedPoint {
    pub time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicNote {
    pub time: f64,
    /// Note-type id, looked up in the `ingameNodes` coefficient table.
    #[serde(rename = "type")]
    pub kind: i64,
}

/// A parsed chart, consumed by the note-exact score model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicScore {
    pub notes: Vec<MusicNote>,
    pub skills: Vec<MusicTimedPoint>,
    #[serde(default)]
    pub fevers: Vec<MusicTimedPoint>,
}
