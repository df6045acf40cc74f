// Squad model: the chosen players and read-only aggregates over them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::rules::SQUAD_SIZE;
use crate::catalog::player::{Player, Position};

/// Lifecycle phase of a squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No players.
    Empty,
    /// 1-14 players, or 15 after a removal and re-add before saving.
    Building,
    /// 15 players, starting XI not yet fixed.
    Complete,
    /// 15 players partitioned into a starting XI and an ordered bench.
    Saved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Empty => "empty",
            Phase::Building => "building",
            Phase::Complete => "complete",
            Phase::Saved => "saved",
        };
        f.write_str(s)
    }
}

/// A squad member: a shared catalog player plus engine-owned flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SquadEntry {
    pub(crate) player: Arc<Player>,
    pub(crate) starting: bool,
    pub(crate) is_captain: bool,
    pub(crate) is_vice_captain: bool,
}

impl SquadEntry {
    pub(crate) fn new(player: Arc<Player>, starting: bool) -> Self {
        SquadEntry {
            player,
            starting,
            is_captain: false,
            is_vice_captain: false,
        }
    }

    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    pub fn id(&self) -> u32 {
        self.player.id
    }

    pub fn position(&self) -> Position {
        self.player.position
    }

    pub fn club(&self) -> u32 {
        self.player.club
    }

    pub fn price(&self) -> u32 {
        self.player.price
    }

    pub fn starting(&self) -> bool {
        self.starting
    }

    pub fn is_captain(&self) -> bool {
        self.is_captain
    }

    pub fn is_vice_captain(&self) -> bool {
        self.is_vice_captain
    }
}

/// Outfield shape of a starting XI. The goalkeeper is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// The user's squad.
///
/// Entries keep insertion order while building. Once saved, entries 0-10 are
/// the starting XI and 11-14 the bench, and every entry's `starting` flag
/// agrees with that split. Mutation goes through the methods in
/// [`super::mutator`]; everything here is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Squad {
    pub(crate) entries: Vec<SquadEntry>,
    pub(crate) saved: bool,
}

impl Squad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SquadEntry] {
        &self.entries
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn phase(&self) -> Phase {
        if self.entries.is_empty() {
            Phase::Empty
        } else if self.saved {
            Phase::Saved
        } else if self.entries.len() == SQUAD_SIZE {
            Phase::Complete
        } else {
            Phase::Building
        }
    }

    /// Sum of prices in tenths of a currency unit.
    pub fn total_cost_tenths(&self) -> u32 {
        self.entries.iter().map(|e| e.price()).sum()
    }

    /// Sum of prices in currency units.
    pub fn total_cost(&self) -> f64 {
        f64::from(self.total_cost_tenths()) / 10.0
    }

    pub fn count_by_position(&self, pos: Position) -> usize {
        self.entries.iter().filter(|e| e.position() == pos).count()
    }

    pub fn count_by_club(&self, club_id: u32) -> usize {
        self.count_by_club_excluding(club_id, None)
    }

    /// Club count ignoring one player, for "what if X leaves" checks.
    pub fn count_by_club_excluding(&self, club_id: u32, excluding: Option<u32>) -> usize {
        self.entries
            .iter()
            .filter(|e| e.club() == club_id && Some(e.id()) != excluding)
            .count()
    }

    pub fn starting_count_by_position(&self, pos: Position) -> usize {
        self.entries
            .iter()
            .filter(|e| e.starting && e.position() == pos)
            .count()
    }

    pub fn find(&self, player_id: u32) -> Option<&SquadEntry> {
        self.entries.iter().find(|e| e.id() == player_id)
    }

    pub fn contains(&self, player_id: u32) -> bool {
        self.find(player_id).is_some()
    }

    pub(crate) fn index_of(&self, player_id: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == player_id)
    }

    pub fn starters(&self) -> impl Iterator<Item = &SquadEntry> {
        self.entries.iter().filter(|e| e.starting)
    }

    pub fn bench(&self) -> impl Iterator<Item = &SquadEntry> {
        self.entries.iter().filter(|e| !e.starting)
    }

    pub fn captain(&self) -> Option<&SquadEntry> {
        self.entries.iter().find(|e| e.is_captain)
    }

    pub fn vice_captain(&self) -> Option<&SquadEntry> {
        self.entries.iter().find(|e| e.is_vice_captain)
    }

    /// Formation of the starting XI, derived on every call. `None` until the
    /// squad is saved.
    pub fn formation(&self) -> Option<Formation> {
        if !self.saved {
            return None;
        }
        Some(Formation {
            defenders: self.starting_count_by_position(Position::Defender),
            midfielders: self.starting_count_by_position(Position::Midfielder),
            forwards: self.starting_count_by_position(Position::Forward),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::player;

    fn squad_of(entries: Vec<SquadEntry>, saved: bool) -> Squad {
        Squad { entries, saved }
    }

    #[test]
    fn empty_squad_aggregates() {
        let squad = Squad::new();
        assert_eq!(squad.size(), 0);
        assert_eq!(squad.phase(), Phase::Empty);
        assert_eq!(squad.total_cost_tenths(), 0);
        assert!(squad.formation().is_none());
        assert!(squad.find(1).is_none());
    }

    #[test]
    fn cost_is_reported_in_units() {
        let squad = squad_of(
            vec![
                SquadEntry::new(player(1, Position::GoalKeeper, 1, 45), true),
                SquadEntry::new(player(2, Position::Forward, 2, 125), true),
            ],
            false,
        );
        assert_eq!(squad.total_cost_tenths(), 170);
        assert!((squad.total_cost() - 17.0).abs() < 1e-9);
        assert_eq!(squad.phase(), Phase::Building);
    }

    #[test]
    fn counts_by_position_and_club() {
        let squad = squad_of(
            vec![
                SquadEntry::new(player(1, Position::Defender, 7, 50), true),
                SquadEntry::new(player(2, Position::Defender, 7, 50), false),
                SquadEntry::new(player(3, Position::Midfielder, 7, 50), true),
            ],
            false,
        );
        assert_eq!(squad.count_by_position(Position::Defender), 2);
        assert_eq!(squad.count_by_position(Position::Forward), 0);
        assert_eq!(squad.count_by_club(7), 3);
        assert_eq!(squad.count_by_club_excluding(7, Some(2)), 2);
        assert_eq!(squad.count_by_club_excluding(7, Some(99)), 3);
        assert_eq!(squad.starting_count_by_position(Position::Defender), 1);
    }

    #[test]
    fn formation_only_when_saved() {
        let entries = vec![
            SquadEntry::new(player(1, Position::GoalKeeper, 1, 45), true),
            SquadEntry::new(player(2, Position::Defender, 2, 45), true),
            SquadEntry::new(player(3, Position::Midfielder, 3, 45), true),
            SquadEntry::new(player(4, Position::Forward, 4, 45), false),
        ];
        assert!(squad_of(entries.clone(), false).formation().is_none());
        let formation = squad_of(entries, true).formation().unwrap();
        assert_eq!(formation.to_string(), "1-1-0");
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Saved.to_string(), "saved");
        assert_eq!(Phase::Building.to_string(), "building");
    }
}
