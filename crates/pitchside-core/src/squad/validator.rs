// Squad validator: pure legality checks over a squad snapshot.
//
// Every check takes the current squad and a proposed change and reports
// whether the change is legal. Nothing here mutates, so checks can be run
// against hypothetical states (UI highlighting, "what if" transfers).
//
// The `check_*` functions name the violated rule; the `can_*` / `is_*`
// functions are boolean conveniences over them.

use super::model::{Squad, SquadEntry};
use super::rules::{
    position_limit, MAX_PER_CLUB, MIN_STARTING_DEFENDERS, MIN_STARTING_FORWARDS,
    MIN_STARTING_MIDFIELDERS, SQUAD_SIZE,
};
use crate::catalog::player::{Player, Position};
use crate::error::{Rejection, SquadError};

/// Whether the squad already holds its quota for `pos`.
pub fn is_position_full(squad: &Squad, pos: Position) -> bool {
    squad.count_by_position(pos) >= position_limit(pos)
}

/// Whether `club_id` already supplies the maximum number of players,
/// optionally ignoring one player who is about to leave.
pub fn is_club_full(squad: &Squad, club_id: u32, excluding: Option<u32>) -> bool {
    squad.count_by_club_excluding(club_id, excluding) >= MAX_PER_CLUB
}

/// Check that `player` may be added.
pub fn check_add(squad: &Squad, player: &Player) -> Result<(), Rejection> {
    if squad.size() >= SQUAD_SIZE {
        return Err(Rejection::SquadFull);
    }
    if squad.contains(player.id) {
        return Err(Rejection::AlreadyInSquad {
            player_id: player.id,
        });
    }
    if is_position_full(squad, player.position) {
        return Err(Rejection::PositionFull {
            position: player.position,
            limit: position_limit(player.position),
        });
    }
    if is_club_full(squad, player.club, None) {
        return Err(Rejection::ClubFull {
            club_id: player.club,
        });
    }
    Ok(())
}

pub fn can_add(squad: &Squad, player: &Player) -> bool {
    check_add(squad, player).is_ok()
}

/// Check the starting XI outfield minimums.
pub fn check_formation(
    defenders: usize,
    midfielders: usize,
    forwards: usize,
) -> Result<(), Rejection> {
    if defenders < MIN_STARTING_DEFENDERS
        || midfielders < MIN_STARTING_MIDFIELDERS
        || forwards < MIN_STARTING_FORWARDS
    {
        return Err(Rejection::FormationMinimum {
            defenders,
            midfielders,
            forwards,
        });
    }
    Ok(())
}

/// Check that swapping `source_id` and `target_id` keeps the squad legal.
///
/// 1. The squad must be saved; before that there is no bench to swap with.
/// 2. Both players must be in the squad.
/// 3. A goalkeeper may only swap with a goalkeeper.
/// 4. Two starters or two bench players may always swap.
/// 5. A starter/bench swap must leave the XI with at least 3 DEF, 2 MID
///    and 1 FWD.
pub fn check_substitution(
    squad: &Squad,
    source_id: u32,
    target_id: u32,
) -> Result<(), SquadError> {
    if !squad.is_saved() {
        return Err(Rejection::NotSaved {
            phase: squad.phase(),
        }
        .into());
    }
    let source = find(squad, source_id)?;
    let target = find(squad, target_id)?;

    if source.position().is_goalkeeper() != target.position().is_goalkeeper() {
        return Err(Rejection::GoalkeeperMismatch.into());
    }

    if source.starting == target.starting {
        return Ok(());
    }

    let (outgoing, incoming) = if source.starting {
        (source.position(), target.position())
    } else {
        (target.position(), source.position())
    };
    let after_swap = |pos: Position| {
        let mut count = squad.starting_count_by_position(pos);
        if outgoing == pos {
            count -= 1;
        }
        if incoming == pos {
            count += 1;
        }
        count
    };

    check_formation(
        after_swap(Position::Defender),
        after_swap(Position::Midfielder),
        after_swap(Position::Forward),
    )?;
    Ok(())
}

pub fn is_substitution_valid(squad: &Squad, source_id: u32, target_id: u32) -> bool {
    check_substitution(squad, source_id, target_id).is_ok()
}

/// Other squad members `source_id` could legally swap with. Empty until the
/// squad is saved.
pub fn substitution_targets(squad: &Squad, source_id: u32) -> Vec<&SquadEntry> {
    squad
        .entries()
        .iter()
        .filter(|e| e.id() != source_id && is_substitution_valid(squad, source_id, e.id()))
        .collect()
}

/// Check that `incoming` may replace `outgoing_id`.
///
/// Transfers are position-for-position, and the club quota is counted as if
/// the outgoing player had already left.
pub fn check_transfer(
    squad: &Squad,
    outgoing_id: u32,
    incoming: &Player,
) -> Result<(), SquadError> {
    let outgoing = find(squad, outgoing_id)?;

    if squad.contains(incoming.id) {
        return Err(Rejection::AlreadyInSquad {
            player_id: incoming.id,
        }
        .into());
    }
    if outgoing.position() != incoming.position {
        return Err(Rejection::PositionMismatch {
            outgoing: outgoing.position(),
            incoming: incoming.position,
        }
        .into());
    }
    if is_club_full(squad, incoming.club, Some(outgoing_id)) {
        return Err(Rejection::ClubFull {
            club_id: incoming.club,
        }
        .into());
    }
    Ok(())
}

pub fn is_transfer_valid(squad: &Squad, outgoing_id: u32, incoming: &Player) -> bool {
    check_transfer(squad, outgoing_id, incoming).is_ok()
}

fn find(squad: &Squad, player_id: u32) -> Result<&SquadEntry, SquadError> {
    squad
        .find(player_id)
        .ok_or(SquadError::NotFound { player_id })
}
