// Catalog: the bootstrap snapshot and the lookup tables built from it.
//
// The catalog is built once per bootstrap load and shared by reference. Player
// records are handed out as `Arc<Player>` so squad entries can hold them
// without copying the snapshot.

pub mod assets;
pub(crate) mod de;
pub mod entry;
pub mod fixture;
pub mod live;
pub mod player;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use player::Player;

/// A club (upstream "team").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: u32,
    /// Kit/badge code, distinct from `id`.
    #[serde(default)]
    pub code: u32,
    pub name: String,
    pub short_name: String,
}

/// A gameweek (upstream "event").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
}

/// Raw `bootstrap-static` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bootstrap {
    #[serde(rename = "elements")]
    pub players: Vec<Player>,
    #[serde(rename = "teams")]
    pub clubs: Vec<Club>,
    #[serde(rename = "events", default)]
    pub gameweeks: Vec<Gameweek>,
}

/// Indexed view of a bootstrap snapshot.
#[derive(Debug, Clone)]
pub struct Catalog {
    players: Vec<Arc<Player>>,
    by_id: HashMap<u32, Arc<Player>>,
    clubs: HashMap<u32, Club>,
    gameweeks: Vec<Gameweek>,
}

impl Catalog {
    pub fn new(bootstrap: Bootstrap) -> Self {
        let players: Vec<Arc<Player>> = bootstrap.players.into_iter().map(Arc::new).collect();
        let by_id = players.iter().map(|p| (p.id, Arc::clone(p))).collect();
        let clubs = bootstrap.clubs.into_iter().map(|c| (c.id, c)).collect();
        let mut gameweeks = bootstrap.gameweeks;
        gameweeks.sort_by_key(|g| g.id);

        Catalog {
            players,
            by_id,
            clubs,
            gameweeks,
        }
    }

    /// All players in snapshot order.
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    pub fn player(&self, id: u32) -> Option<&Arc<Player>> {
        self.by_id.get(&id)
    }

    pub fn club(&self, id: u32) -> Option<&Club> {
        self.clubs.get(&id)
    }

    /// Club short name, or `"???"` when the club is not in the snapshot.
    pub fn club_short_name(&self, id: u32) -> &str {
        self.clubs.get(&id).map_or("???", |c| c.short_name.as_str())
    }

    pub fn gameweeks(&self) -> &[Gameweek] {
        &self.gameweeks
    }

    /// The gameweek in progress, else the next one, else the first.
    pub fn current_gameweek(&self) -> Option<&Gameweek> {
        self.gameweeks
            .iter()
            .find(|g| g.is_current)
            .or_else(|| self.gameweeks.iter().find(|g| g.is_next))
            .or_else(|| self.gameweeks.first())
    }
}
