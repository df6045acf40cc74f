// Player market: search, filter and rank catalog players for transfers and
// squad building, plus the transfer trend tables.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::catalog::player::{Player, Position};
use crate::catalog::Catalog;
use crate::squad::model::Squad;

/// Default market ceiling, in tenths (15.0m).
pub const DEFAULT_MAX_PRICE: u32 = 150;
pub const DEFAULT_MARKET_LIMIT: usize = 50;
pub const TRENDS_LIMIT: usize = 16;

/// Statistic a market listing is ranked by, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMetric {
    #[default]
    TotalPoints,
    EventPoints,
    Price,
    SelectedBy,
    Minutes,
    Goals,
    Assists,
    CleanSheets,
    Form,
    IctIndex,
}

impl SortMetric {
    pub const ALL: [SortMetric; 10] = [
        SortMetric::TotalPoints,
        SortMetric::EventPoints,
        SortMetric::Price,
        SortMetric::SelectedBy,
        SortMetric::Minutes,
        SortMetric::Goals,
        SortMetric::Assists,
        SortMetric::CleanSheets,
        SortMetric::Form,
        SortMetric::IctIndex,
    ];

    /// Upstream field name.
    pub fn key(&self) -> &'static str {
        match self {
            SortMetric::TotalPoints => "total_points",
            SortMetric::EventPoints => "event_points",
            SortMetric::Price => "now_cost",
            SortMetric::SelectedBy => "selected_by_percent",
            SortMetric::Minutes => "minutes",
            SortMetric::Goals => "goals_scored",
            SortMetric::Assists => "assists",
            SortMetric::CleanSheets => "clean_sheets",
            SortMetric::Form => "form",
            SortMetric::IctIndex => "ict_index",
        }
    }

    /// Parse an upstream field name or a short alias.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let alias = match s.as_str() {
            "points" | "pts" => Some(SortMetric::TotalPoints),
            "gw" => Some(SortMetric::EventPoints),
            "price" | "cost" => Some(SortMetric::Price),
            "selected" | "tsb" => Some(SortMetric::SelectedBy),
            "goals" => Some(SortMetric::Goals),
            "ict" => Some(SortMetric::IctIndex),
            _ => None,
        };
        alias.or_else(|| Self::ALL.into_iter().find(|m| m.key() == s))
    }

    pub fn value(&self, p: &Player) -> f64 {
        match self {
            SortMetric::TotalPoints => f64::from(p.total_points),
            SortMetric::EventPoints => f64::from(p.event_points),
            SortMetric::Price => f64::from(p.price),
            SortMetric::SelectedBy => p.selected_by_percent,
            SortMetric::Minutes => f64::from(p.minutes),
            SortMetric::Goals => f64::from(p.goals_scored),
            SortMetric::Assists => f64::from(p.assists),
            SortMetric::CleanSheets => f64::from(p.clean_sheets),
            SortMetric::Form => p.form,
            SortMetric::IctIndex => p.ict_index,
        }
    }
}

impl fmt::Display for SortMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Market filter and ranking options.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuery {
    /// Name substring; empty matches everyone.
    pub search: String,
    pub position: Option<Position>,
    /// Inclusive price ceiling in tenths.
    pub max_price: u32,
    pub sort: SortMetric,
    pub limit: usize,
}

impl Default for MarketQuery {
    fn default() -> Self {
        MarketQuery {
            search: String::new(),
            position: None,
            max_price: DEFAULT_MAX_PRICE,
            sort: SortMetric::default(),
            limit: DEFAULT_MARKET_LIMIT,
        }
    }
}

/// Catalog players not in `squad` that match `query`, best first.
pub fn market(catalog: &Catalog, squad: &Squad, query: &MarketQuery) -> Vec<Arc<Player>> {
    let mut listed: Vec<Arc<Player>> = catalog
        .players()
        .iter()
        .filter(|p| !squad.contains(p.id))
        .filter(|p| query.position.map_or(true, |pos| p.position == pos))
        .filter(|p| p.price <= query.max_price)
        .filter(|p| query.search.is_empty() || p.matches_name(&query.search))
        .cloned()
        .collect();

    sort_descending(&mut listed, |p| query.sort.value(p));
    listed.truncate(query.limit);
    listed
}

/// Which way the transfer market is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    TransfersIn,
    TransfersOut,
    Form,
}

impl TrendMetric {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" => Some(TrendMetric::TransfersIn),
            "out" => Some(TrendMetric::TransfersOut),
            "form" => Some(TrendMetric::Form),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendMetric::TransfersIn => "Most transferred in",
            TrendMetric::TransfersOut => "Most transferred out",
            TrendMetric::Form => "In form",
        }
    }

    pub fn value(&self, p: &Player) -> f64 {
        match self {
            TrendMetric::TransfersIn => f64::from(p.transfers_in_event),
            TrendMetric::TransfersOut => f64::from(p.transfers_out_event),
            TrendMetric::Form => p.form,
        }
    }
}

/// The `limit` catalog players ranked highest by `metric`.
pub fn trends(catalog: &Catalog, metric: TrendMetric, limit: usize) -> Vec<Arc<Player>> {
    let mut ranked: Vec<Arc<Player>> = catalog.players().to_vec();
    sort_descending(&mut ranked, |p| metric.value(p));
    ranked.truncate(limit);
    ranked
}

// Stable, so ties keep snapshot order.
fn sort_descending(players: &mut [Arc<Player>], key: impl Fn(&Player) -> f64) {
    players.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}
