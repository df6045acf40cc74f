// Fixture list and the per-club "next fixtures" view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Catalog;

/// Number of upcoming fixtures shown for a player.
pub const UPCOMING_FIXTURES: usize = 4;

/// A scheduled or played match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    /// Gameweek, or `None` while unscheduled.
    #[serde(default)]
    pub event: Option<u32>,
    pub team_h: u32,
    pub team_a: u32,
    #[serde(default)]
    pub team_h_difficulty: u8,
    #[serde(default)]
    pub team_a_difficulty: u8,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub kickoff_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team_h_score: Option<u32>,
    #[serde(default)]
    pub team_a_score: Option<u32>,
}

impl Fixture {
    pub fn involves(&self, club_id: u32) -> bool {
        self.team_h == club_id || self.team_a == club_id
    }
}

/// One upcoming fixture from a club's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingFixture {
    pub event: Option<u32>,
    pub opponent: String,
    pub is_home: bool,
    /// Difficulty rating (1-5) for the club, not the opponent.
    pub difficulty: u8,
}

/// The next `limit` unfinished fixtures for `club_id`, earliest gameweek
/// first. Unscheduled fixtures sort last.
pub fn upcoming_for_club(
    fixtures: &[Fixture],
    catalog: &Catalog,
    club_id: u32,
    limit: usize,
) -> Vec<UpcomingFixture> {
    let mut pending: Vec<&Fixture> = fixtures
        .iter()
        .filter(|f| f.involves(club_id) && !f.finished)
        .collect();
    pending.sort_by_key(|f| (f.event.is_none(), f.event));

    pending
        .into_iter()
        .take(limit)
        .map(|f| {
            let is_home = f.team_h == club_id;
            let (opponent_id, difficulty) = if is_home {
                (f.team_a, f.team_h_difficulty)
            } else {
                (f.team_h, f.team_a_difficulty)
            };
            let opponent = catalog
                .club(opponent_id)
                .map_or_else(|| "OPP".to_string(), |c| c.short_name.clone());
            UpcomingFixture {
                event: f.event,
                opponent,
                is_home,
                difficulty,
            }
        })
        .collect()
}
