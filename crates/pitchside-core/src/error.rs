// Squad engine errors.

use thiserror::Error;

use crate::catalog::player::Position;
use crate::squad::model::Phase;

/// The specific squad rule a proposed transition violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("squad already has 15 players")]
    SquadFull,

    #[error("no room for another {position} (limit {limit})")]
    PositionFull { position: Position, limit: usize },

    #[error("already 3 players from club {club_id}")]
    ClubFull { club_id: u32 },

    #[error("player {player_id} is already in the squad")]
    AlreadyInSquad { player_id: u32 },

    #[error("goalkeepers can only be swapped with goalkeepers")]
    GoalkeeperMismatch,

    #[error(
        "starting XI would have {defenders} DEF, {midfielders} MID, {forwards} FWD \
         (minimum 3 DEF, 2 MID, 1 FWD)"
    )]
    FormationMinimum {
        defenders: usize,
        midfielders: usize,
        forwards: usize,
    },

    #[error("a {outgoing} must be replaced by a {outgoing}, not a {incoming}")]
    PositionMismatch {
        outgoing: Position,
        incoming: Position,
    },

    #[error("squad must be saved first (currently {phase})")]
    NotSaved { phase: Phase },

    #[error("squad has {size} players; 15 are required")]
    Incomplete { size: usize },

    #[error("squad is not 2 GKP, 5 DEF, 5 MID, 3 FWD")]
    InvalidComposition,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquadError {
    #[error("transition rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("player {player_id} not found")]
    NotFound { player_id: u32 },

    #[error("import resolved {resolved} of {required} players")]
    ImportIncomplete { resolved: usize, required: usize },
}

impl SquadError {
    /// The violated rule, for rejections.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            SquadError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}
