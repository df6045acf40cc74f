// Shared builders for unit tests.

use std::sync::Arc;

use crate::catalog::player::{Player, Position};
use crate::squad::model::Squad;

pub(crate) fn player(id: u32, position: Position, club: u32, price: u32) -> Arc<Player> {
    Arc::new(Player {
        id,
        code: 0,
        web_name: format!("P{id}"),
        first_name: String::new(),
        second_name: String::new(),
        position,
        club,
        price,
        total_points: 0,
        event_points: 0,
        form: 0.0,
        selected_by_percent: 0.0,
        minutes: 0,
        goals_scored: 0,
        assists: 0,
        clean_sheets: 0,
        ict_index: 0.0,
        transfers_in_event: 0,
        transfers_out_event: 0,
    })
}

/// Fifteen legal players, every one from a different club.
///
/// Ids: GKP 1-2, DEF 3-7, MID 8-12, FWD 13-15. Club id equals player id.
pub(crate) fn legal_fifteen() -> Vec<Arc<Player>> {
    let layout = [
        (Position::GoalKeeper, 2),
        (Position::Defender, 5),
        (Position::Midfielder, 5),
        (Position::Forward, 3),
    ];
    let mut id = 0;
    let mut out = Vec::new();
    for (pos, count) in layout {
        for _ in 0..count {
            id += 1;
            out.push(player(id, pos, id, 50));
        }
    }
    out
}

/// A squad built from [`legal_fifteen`] and saved with the default split.
pub(crate) fn saved_squad() -> Squad {
    let mut squad = Squad::new();
    for p in legal_fifteen() {
        squad.add_player(p).unwrap();
    }
    squad.save().unwrap();
    squad
}
