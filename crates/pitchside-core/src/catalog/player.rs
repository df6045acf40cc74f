// Player records and playing positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playing position, encoded upstream as `element_type` 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    GoalKeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// All positions in squad display order.
    pub const ALL: [Position; 4] = [
        Position::GoalKeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Upstream `element_type` code.
    pub fn code(&self) -> u8 {
        match self {
            Position::GoalKeeper => 1,
            Position::Defender => 2,
            Position::Midfielder => 3,
            Position::Forward => 4,
        }
    }

    /// Parse a position label or code.
    ///
    /// Accepts the short labels (`GKP`, `DEF`, `MID`, `FWD`), the common
    /// alternatives `GK`/`FW`, and the numeric codes `1`-`4`.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GKP" | "GK" | "1" => Some(Position::GoalKeeper),
            "DEF" | "2" => Some(Position::Defender),
            "MID" | "3" => Some(Position::Midfielder),
            "FWD" | "FW" | "4" => Some(Position::Forward),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::GoalKeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::GoalKeeper)
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Position::GoalKeeper),
            2 => Ok(Position::Defender),
            3 => Ok(Position::Midfielder),
            4 => Ok(Position::Forward),
            other => Err(format!("unknown element_type {other}")),
        }
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> u8 {
        pos.code()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_str())
    }
}

/// A player from the bootstrap snapshot. Read-only to the squad engine.
///
/// Prices are in tenths of a currency unit (`now_cost` 55 is 5.5m).
/// The statistics are used for sorting and display only, never for legality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    /// Photo code, distinct from `id`.
    #[serde(default)]
    pub code: u32,
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    #[serde(rename = "element_type")]
    pub position: Position,
    /// Owning club id.
    #[serde(rename = "team")]
    pub club: u32,
    #[serde(rename = "now_cost")]
    pub price: u32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub event_points: i32,
    #[serde(default, deserialize_with = "super::de::decimal")]
    pub form: f64,
    #[serde(default, deserialize_with = "super::de::decimal")]
    pub selected_by_percent: f64,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default, deserialize_with = "super::de::decimal")]
    pub ict_index: f64,
    #[serde(default)]
    pub transfers_in_event: u32,
    #[serde(default)]
    pub transfers_out_event: u32,
}

impl Player {
    /// Price in currency units.
    pub fn price_value(&self) -> f64 {
        f64::from(self.price) / 10.0
    }

    /// Case-insensitive substring match over web, first and second names.
    pub fn matches_name(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.web_name.to_lowercase().contains(&term)
            || self.first_name.to_lowercase().contains(&term)
            || self.second_name.to_lowercase().contains(&term)
    }
}
