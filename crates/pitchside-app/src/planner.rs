// Planner session: one user's squad plus the shared data it is built from.
//
// Every user action is handled here as a single synchronous step against the
// squad; only data loading awaits the gateway. Catalog and fixtures are
// loaded lazily and concurrently on first use.

use std::sync::Arc;

use futures_util::future::try_join;
use thiserror::Error;
use tracing::{info, warn};

use pitchside_core::catalog::entry::TeamInfo;
use pitchside_core::catalog::fixture::{upcoming_for_club, Fixture, UpcomingFixture, UPCOMING_FIXTURES};
use pitchside_core::catalog::live::{leaderboard, LiveRow, LEADERBOARD_SIZE};
use pitchside_core::market::{self, MarketQuery, SortMetric, TrendMetric, TRENDS_LIMIT};
use pitchside_core::squad::validator;
use pitchside_core::{Catalog, Player, Position, Rejection, Squad, SquadEntry, SquadError};
use pitchside_gateway::{DataSource, GatewayError};

use crate::config::PlannerConfig;

/// Gameweek used when neither the caller nor the catalog names one.
pub const FALLBACK_GAMEWEEK: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Squad(#[from] SquadError),

    #[error("data request failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("player data is not loaded")]
    CatalogNotLoaded,

    #[error("no player with id {player_id} in the catalog")]
    UnknownPlayer { player_id: u32 },
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub team_id: u64,
    pub gameweek: u32,
}

pub struct Planner<S> {
    source: S,
    settings: PlannerConfig,
    catalog: Option<Arc<Catalog>>,
    fixtures: Option<Arc<Vec<Fixture>>>,
    squad: Squad,
}

impl<S: DataSource> Planner<S> {
    pub fn new(source: S, settings: PlannerConfig) -> Self {
        Planner {
            source,
            settings,
            catalog: None,
            fixtures: None,
            squad: Squad::new(),
        }
    }

    pub fn squad(&self) -> &Squad {
        &self.squad
    }

    pub fn settings(&self) -> &PlannerConfig {
        &self.settings
    }

    pub fn catalog(&self) -> Result<&Arc<Catalog>, PlannerError> {
        self.catalog.as_ref().ok_or(PlannerError::CatalogNotLoaded)
    }

    // -- loading --

    /// Fetch bootstrap and fixtures concurrently. Either failing leaves the
    /// previously loaded data in place.
    pub async fn load(&mut self) -> Result<(), PlannerError> {
        let (catalog, fixtures) = try_join(self.source.bootstrap(), self.source.fixtures()).await?;
        info!(
            players = catalog.players().len(),
            fixtures = fixtures.len(),
            "planner data loaded"
        );
        self.catalog = Some(catalog);
        self.fixtures = Some(fixtures);
        Ok(())
    }

    async fn ensure_loaded(&mut self) -> Result<(), PlannerError> {
        if self.catalog.is_none() || self.fixtures.is_none() {
            self.load().await?;
        }
        Ok(())
    }

    fn lookup(&self, player_id: u32) -> Result<Arc<Player>, PlannerError> {
        self.catalog()?
            .player(player_id)
            .cloned()
            .ok_or(PlannerError::UnknownPlayer { player_id })
    }

    /// The catalog's current gameweek id, else [`FALLBACK_GAMEWEEK`].
    pub fn current_gameweek(&self) -> u32 {
        self.catalog
            .as_ref()
            .and_then(|c| c.current_gameweek().map(|g| g.id))
            .unwrap_or(FALLBACK_GAMEWEEK)
    }

    // -- squad transitions --

    pub fn add(&mut self, player_id: u32) -> Result<Arc<Player>, PlannerError> {
        let player = self.lookup(player_id)?;
        self.squad.add_player(Arc::clone(&player))?;
        Ok(player)
    }

    pub fn remove(&mut self, player_id: u32) -> Result<SquadEntry, PlannerError> {
        Ok(self.squad.remove_player(player_id)?)
    }

    pub fn save(&mut self) -> Result<(), PlannerError> {
        Ok(self.squad.save()?)
    }

    pub fn substitute(&mut self, source_id: u32, target_id: u32) -> Result<(), PlannerError> {
        Ok(self.squad.substitute(source_id, target_id)?)
    }

    /// Transfer `outgoing_id` out for catalog player `incoming_id`.
    pub fn transfer(
        &mut self,
        outgoing_id: u32,
        incoming_id: u32,
    ) -> Result<(SquadEntry, Arc<Player>), PlannerError> {
        let incoming = self.lookup(incoming_id)?;
        let outgoing = self.squad.transfer(outgoing_id, Arc::clone(&incoming))?;
        Ok((outgoing, incoming))
    }

    pub fn set_captain(&mut self, player_id: u32) -> Result<(), PlannerError> {
        Ok(self.squad.set_captain(player_id)?)
    }

    pub fn set_vice_captain(&mut self, player_id: u32) -> Result<(), PlannerError> {
        Ok(self.squad.set_vice_captain(player_id)?)
    }

    pub fn reset(&mut self) {
        self.squad.reset();
    }

    /// Replace the squad with a manager's picks for `gameweek` (default:
    /// the current gameweek). On failure the squad is unchanged.
    pub async fn import(
        &mut self,
        team_id: u64,
        gameweek: Option<u32>,
    ) -> Result<ImportSummary, PlannerError> {
        self.ensure_loaded().await?;
        let gameweek = gameweek.unwrap_or_else(|| self.current_gameweek());
        let picks = self.source.user_picks(team_id, gameweek).await?;
        let catalog = Arc::clone(self.catalog()?);

        if let Err(e) = self.squad.import(&picks, &catalog) {
            warn!(team_id, gameweek, error = %e, "import failed");
            return Err(e.into());
        }
        info!(team_id, gameweek, "team imported");
        Ok(ImportSummary { team_id, gameweek })
    }

    pub async fn team_info(&self, team_id: u64) -> Result<TeamInfo, PlannerError> {
        Ok(self.source.user_info(team_id).await?)
    }

    // -- read models --

    pub fn player(&self, player_id: u32) -> Result<Arc<Player>, PlannerError> {
        self.lookup(player_id)
    }

    /// Market query seeded from the planner settings.
    pub fn market_query(
        &self,
        position: Option<Position>,
        search: &str,
        sort: SortMetric,
    ) -> MarketQuery {
        MarketQuery {
            search: search.to_string(),
            position,
            max_price: self.settings.max_price,
            sort,
            limit: self.settings.market_limit,
        }
    }

    pub fn market(&self, query: &MarketQuery) -> Result<Vec<Arc<Player>>, PlannerError> {
        Ok(market::market(self.catalog()?, &self.squad, query))
    }

    pub fn trends(&self, metric: TrendMetric) -> Result<Vec<Arc<Player>>, PlannerError> {
        Ok(market::trends(self.catalog()?, metric, TRENDS_LIMIT))
    }

    /// Squad members `player_id` may swap with. The squad must be saved.
    pub fn targets(&self, player_id: u32) -> Result<Vec<SquadEntry>, PlannerError> {
        if !self.squad.is_saved() {
            return Err(SquadError::from(Rejection::NotSaved {
                phase: self.squad.phase(),
            })
            .into());
        }
        if !self.squad.contains(player_id) {
            return Err(SquadError::NotFound { player_id }.into());
        }
        Ok(validator::substitution_targets(&self.squad, player_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Live leaderboard for `gameweek` (default: current).
    pub async fn live(&mut self, gameweek: Option<u32>) -> Result<(u32, Vec<LiveRow>), PlannerError> {
        self.ensure_loaded().await?;
        let gameweek = gameweek.unwrap_or_else(|| self.current_gameweek());
        let live = self.source.live(gameweek).await?;
        let rows = leaderboard(&live, self.catalog()?, LEADERBOARD_SIZE);
        Ok((gameweek, rows))
    }

    /// A player's next fixtures.
    pub async fn fixtures_for(
        &mut self,
        player_id: u32,
    ) -> Result<(Arc<Player>, Vec<UpcomingFixture>), PlannerError> {
        self.ensure_loaded().await?;
        let player = self.lookup(player_id)?;
        let fixtures = self.fixtures.as_ref().ok_or(PlannerError::CatalogNotLoaded)?;
        let upcoming = upcoming_for_club(fixtures, self.catalog()?, player.club, UPCOMING_FIXTURES);
        Ok((player, upcoming))
    }

    /// Budget left in tenths; negative when over budget.
    pub fn remaining_budget(&self) -> i64 {
        i64::from(self.settings.budget) - i64::from(self.squad.total_cost_tenths())
    }
}
