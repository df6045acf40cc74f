// Live gameweek statistics and the leaderboard joined with the catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::Catalog;

/// Number of rows shown on the live leaderboard.
pub const LEADERBOARD_SIZE: usize = 20;

/// Per-player statistics for a single gameweek.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStats {
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub bps: i32,
    #[serde(default)]
    pub total_points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveElement {
    pub id: u32,
    pub stats: LiveStats,
}

/// Raw `event/{gw}/live` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveSnapshot {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

impl LiveSnapshot {
    pub fn stats_for(&self, player_id: u32) -> Option<&LiveStats> {
        self.elements
            .iter()
            .find(|e| e.id == player_id)
            .map(|e| &e.stats)
    }
}

/// A leaderboard row.
#[derive(Debug, Clone)]
pub struct LiveRow {
    pub player: Arc<Player>,
    pub stats: LiveStats,
}

/// Top `limit` players by live points. Elements missing from the catalog
/// are dropped.
pub fn leaderboard(live: &LiveSnapshot, catalog: &Catalog, limit: usize) -> Vec<LiveRow> {
    let mut rows: Vec<LiveRow> = live
        .elements
        .iter()
        .filter_map(|e| {
            catalog.player(e.id).map(|p| LiveRow {
                player: Arc::clone(p),
                stats: e.stats.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.stats.total_points.cmp(&a.stats.total_points));
    rows.truncate(limit);
    rows
}
