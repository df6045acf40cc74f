// Squad transition engine.
//
// Every transition validates first and only then touches the entry list, so
// a rejected call leaves the squad exactly as it was.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::model::{Phase, Squad, SquadEntry};
use super::rules::{default_starters, position_limit, SQUAD_SIZE, STARTING_XI};
use super::validator;
use crate::catalog::entry::Pick;
use crate::catalog::player::{Player, Position};
use crate::catalog::Catalog;
use crate::error::{Rejection, SquadError};

impl Squad {
    /// Append a player to the squad as a provisional starter.
    ///
    /// Any add returns the squad to build mode.
    pub fn add_player(&mut self, player: Arc<Player>) -> Result<(), SquadError> {
        if let Err(rejection) = validator::check_add(self, &player) {
            debug!(player_id = player.id, %rejection, "add rejected");
            return Err(rejection.into());
        }
        info!(
            player_id = player.id,
            name = %player.web_name,
            position = %player.position,
            "player added"
        );
        self.unsave();
        self.entries.push(SquadEntry::new(player, true));
        Ok(())
    }

    /// Remove a player and return their entry. Invalidates a saved partition.
    pub fn remove_player(&mut self, player_id: u32) -> Result<SquadEntry, SquadError> {
        let index = self
            .index_of(player_id)
            .ok_or(SquadError::NotFound { player_id })?;
        let removed = self.entries.remove(index);
        self.unsave();
        info!(player_id, size = self.entries.len(), "player removed");
        Ok(removed)
    }

    /// Replace the whole squad with an external team's picks.
    ///
    /// Picks are ordered by their slot; the first eleven start. Only the
    /// count is validated: unless the picks name exactly 15 distinct players
    /// known to `catalog`, the current squad is kept. A repeated player
    /// counts once.
    pub fn import(&mut self, picks: &[Pick], catalog: &Catalog) -> Result<(), SquadError> {
        let mut ordered: Vec<&Pick> = picks.iter().collect();
        ordered.sort_by_key(|p| p.position);

        let mut seen = HashSet::new();
        let resolved: Vec<(&Pick, Arc<Player>)> = ordered
            .into_iter()
            .filter_map(|pick| catalog.player(pick.player_id).map(|p| (pick, Arc::clone(p))))
            .filter(|(_, p)| seen.insert(p.id))
            .collect();

        if picks.len() != SQUAD_SIZE || resolved.len() != SQUAD_SIZE {
            debug!(
                picks = picks.len(),
                resolved = resolved.len(),
                "import incomplete"
            );
            return Err(SquadError::ImportIncomplete {
                resolved: resolved.len(),
                required: SQUAD_SIZE,
            });
        }

        let captain = resolved
            .iter()
            .find(|(pick, _)| pick.is_captain)
            .map(|(_, p)| p.id);
        let vice = resolved
            .iter()
            .find(|(pick, _)| pick.is_vice_captain)
            .map(|(_, p)| p.id)
            .filter(|&id| Some(id) != captain);

        self.entries = resolved
            .into_iter()
            .enumerate()
            .map(|(i, (_, player))| {
                let mut entry = SquadEntry::new(player, i < STARTING_XI);
                entry.is_captain = Some(entry.id()) == captain;
                entry.is_vice_captain = Some(entry.id()) == vice;
                entry
            })
            .collect();
        self.saved = true;

        info!(?captain, ?vice, "squad imported");
        Ok(())
    }

    /// Fix the starting XI and bench.
    ///
    /// Starters are the first goalkeeper, first four defenders, first four
    /// midfielders and first two forwards in insertion order; the remaining
    /// four form the bench with the reserve goalkeeper in the first slot.
    /// Saving an already saved squad is a no-op.
    pub fn save(&mut self) -> Result<(), SquadError> {
        if self.saved {
            return Ok(());
        }
        let size = self.entries.len();
        if size != SQUAD_SIZE {
            debug!(size, "save rejected");
            return Err(Rejection::Incomplete { size }.into());
        }
        if Position::ALL
            .iter()
            .any(|&pos| self.count_by_position(pos) != position_limit(pos))
        {
            debug!("save rejected: invalid composition");
            return Err(Rejection::InvalidComposition.into());
        }

        let mut starters = Vec::with_capacity(STARTING_XI);
        let mut bench = Vec::with_capacity(SQUAD_SIZE - STARTING_XI);
        for pos in Position::ALL {
            let quota = default_starters(pos);
            let in_position = self.entries.iter().filter(|e| e.position() == pos);
            for (i, entry) in in_position.enumerate() {
                let mut entry = entry.clone();
                entry.starting = i < quota;
                if entry.starting {
                    starters.push(entry);
                } else {
                    bench.push(entry);
                }
            }
        }
        starters.extend(bench);
        self.entries = starters;
        self.saved = true;

        if let Some(formation) = self.formation() {
            info!(%formation, "squad saved");
        }
        Ok(())
    }

    /// Swap two squad members.
    ///
    /// The two entries trade places in the ordered list and each slot keeps
    /// its starter/bench status. `substitute(x, x)` is a no-op.
    pub fn substitute(&mut self, source_id: u32, target_id: u32) -> Result<(), SquadError> {
        if source_id == target_id {
            return Ok(());
        }
        if let Err(e) = validator::check_substitution(self, source_id, target_id) {
            debug!(source_id, target_id, error = %e, "substitution rejected");
            return Err(e);
        }
        let (a, b) = match (self.index_of(source_id), self.index_of(target_id)) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(SquadError::NotFound { player_id: source_id }),
        };

        self.entries.swap(a, b);
        let starting_a = self.entries[a].starting;
        self.entries[a].starting = self.entries[b].starting;
        self.entries[b].starting = starting_a;

        info!(
            source_id,
            target_id,
            formation = ?self.formation().map(|f| f.to_string()),
            "substitution applied"
        );
        Ok(())
    }

    /// Replace `outgoing_id` with `incoming`, keeping the slot's starter status.
    ///
    /// The new entry starts without captaincy. Returns the outgoing entry.
    pub fn transfer(
        &mut self,
        outgoing_id: u32,
        incoming: Arc<Player>,
    ) -> Result<SquadEntry, SquadError> {
        self.require_saved()?;
        if let Err(e) = validator::check_transfer(self, outgoing_id, &incoming) {
            debug!(outgoing_id, incoming_id = incoming.id, error = %e, "transfer rejected");
            return Err(e);
        }
        let index = self.index_of(outgoing_id).ok_or(SquadError::NotFound {
            player_id: outgoing_id,
        })?;

        let starting = self.entries[index].starting;
        let incoming_id = incoming.id;
        let outgoing = std::mem::replace(
            &mut self.entries[index],
            SquadEntry::new(incoming, starting),
        );

        info!(outgoing_id, incoming_id, starting, "transfer applied");
        Ok(outgoing)
    }

    /// Make `player_id` captain.
    ///
    /// If the new captain was vice-captain, the previous captain becomes
    /// vice-captain; otherwise the previous captain loses the armband.
    pub fn set_captain(&mut self, player_id: u32) -> Result<(), SquadError> {
        let target = self
            .index_of(player_id)
            .ok_or(SquadError::NotFound { player_id })?;
        let was_vice = self.entries[target].is_vice_captain;

        for (i, entry) in self.entries.iter_mut().enumerate() {
            if i == target {
                entry.is_captain = true;
                entry.is_vice_captain = false;
            } else if entry.is_captain {
                entry.is_captain = false;
                entry.is_vice_captain = was_vice;
            }
        }
        info!(player_id, "captain set");
        Ok(())
    }

    /// Make `player_id` vice-captain. Mirror image of [`Squad::set_captain`].
    pub fn set_vice_captain(&mut self, player_id: u32) -> Result<(), SquadError> {
        let target = self
            .index_of(player_id)
            .ok_or(SquadError::NotFound { player_id })?;
        let was_captain = self.entries[target].is_captain;

        for (i, entry) in self.entries.iter_mut().enumerate() {
            if i == target {
                entry.is_vice_captain = true;
                entry.is_captain = false;
            } else if entry.is_vice_captain {
                entry.is_vice_captain = false;
                entry.is_captain = was_captain;
            }
        }
        info!(player_id, "vice-captain set");
        Ok(())
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.saved = false;
        info!("squad reset");
    }

    fn require_saved(&self) -> Result<(), SquadError> {
        if self.saved {
            Ok(())
        } else {
            Err(Rejection::NotSaved {
                phase: self.phase(),
            }
            .into())
        }
    }

    // Back to build mode: the partition no longer holds, so every entry
    // reverts to a provisional starter.
    fn unsave(&mut self) {
        if self.saved {
            self.saved = false;
            for entry in &mut self.entries {
                entry.starting = true;
            }
            debug!(phase = %Phase::Building, "saved partition dropped");
        }
    }
}
