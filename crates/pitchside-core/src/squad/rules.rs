// Static squad composition rules.

use crate::catalog::player::Position;

pub const SQUAD_SIZE: usize = 15;
pub const STARTING_XI: usize = 11;
pub const BENCH_SIZE: usize = SQUAD_SIZE - STARTING_XI;

/// Maximum players from any one club.
pub const MAX_PER_CLUB: usize = 3;

/// Starting XI minimums.
pub const MIN_STARTING_DEFENDERS: usize = 3;
pub const MIN_STARTING_MIDFIELDERS: usize = 2;
pub const MIN_STARTING_FORWARDS: usize = 1;

/// Squad quota for a position.
pub fn position_limit(pos: Position) -> usize {
    match pos {
        Position::GoalKeeper => 2,
        Position::Defender => 5,
        Position::Midfielder => 5,
        Position::Forward => 3,
    }
}

/// Starters per position when a built squad is first saved (1-4-4-2).
pub fn default_starters(pos: Position) -> usize {
    match pos {
        Position::GoalKeeper => 1,
        Position::Defender => 4,
        Position::Midfielder => 4,
        Position::Forward => 2,
    }
}
