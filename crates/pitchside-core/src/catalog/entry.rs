// A manager's existing squad picks and team metadata.

use serde::{Deserialize, Serialize};

/// One pick from a manager's squad for a gameweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    #[serde(rename = "element")]
    pub player_id: u32,
    /// Slot 1-15; slots 1-11 start. Zero when the source omits it.
    #[serde(default)]
    pub position: u8,
    #[serde(default)]
    pub multiplier: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

/// Raw `entry/{id}/event/{gw}/picks` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PicksResponse {
    #[serde(default)]
    pub picks: Vec<Pick>,
    #[serde(default)]
    pub active_chip: Option<String>,
}

/// Manager team metadata from `entry/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub player_first_name: String,
    #[serde(default)]
    pub player_last_name: String,
    #[serde(default)]
    pub summary_overall_points: Option<i64>,
    #[serde(default)]
    pub summary_overall_rank: Option<u64>,
    #[serde(default)]
    pub current_event: Option<u32>,
}

impl TeamInfo {
    pub fn manager_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
            .trim()
            .to_string()
    }
}
