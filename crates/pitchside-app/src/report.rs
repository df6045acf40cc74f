// Plain-text rendering of the squad and the read models.

use std::fmt::Write;
use std::sync::Arc;

use pitchside_core::catalog::assets;
use pitchside_core::catalog::entry::TeamInfo;
use pitchside_core::catalog::fixture::UpcomingFixture;
use pitchside_core::catalog::live::LiveRow;
use pitchside_core::market::{SortMetric, TrendMetric};
use pitchside_core::{Catalog, Player, Squad, SquadEntry};

/// Tenths of a unit as `12.5m`.
pub fn money(tenths: i64) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.unsigned_abs();
    format!("{sign}{}.{}m", abs / 10, abs % 10)
}

fn armband(entry: &SquadEntry) -> &'static str {
    if entry.is_captain() {
        " (C)"
    } else if entry.is_vice_captain() {
        " (V)"
    } else {
        ""
    }
}

fn entry_line(out: &mut String, entry: &SquadEntry, catalog: Option<&Catalog>) {
    let p = entry.player();
    let club = catalog.map_or("???", |c| c.club_short_name(p.club));
    let _ = writeln!(
        out,
        "  {:>4}  {:<3}  {:<18} {:<4} {:>6}{}",
        p.id,
        p.position,
        p.web_name,
        club,
        money(i64::from(p.price)),
        armband(entry)
    );
}

/// Squad listing with formation, cost and budget.
pub fn squad_summary(squad: &Squad, catalog: Option<&Catalog>, budget: u32) -> String {
    let mut out = String::new();
    let cost = i64::from(squad.total_cost_tenths());
    let budget = i64::from(budget);

    let _ = write!(out, "Squad: {}/15, {}", squad.size(), squad.phase());
    if let Some(formation) = squad.formation() {
        let _ = write!(out, ", formation {formation}");
    }
    let _ = writeln!(
        out,
        "\nCost {}  Budget {}  Remaining {}",
        money(cost),
        money(budget),
        money(budget - cost)
    );

    if squad.is_empty() {
        out.push_str("  (no players)\n");
        return out;
    }

    if squad.is_saved() {
        out.push_str("Starting XI\n");
        for entry in squad.starters() {
            entry_line(&mut out, entry, catalog);
        }
        out.push_str("Bench\n");
        for entry in squad.bench() {
            entry_line(&mut out, entry, catalog);
        }
    } else {
        for entry in squad.entries() {
            entry_line(&mut out, entry, catalog);
        }
    }
    out
}

fn stat_value(player: &Player, sort: SortMetric) -> String {
    match sort {
        SortMetric::Price => money(i64::from(player.price)),
        SortMetric::SelectedBy => format!("{:.1}%", player.selected_by_percent),
        SortMetric::Form | SortMetric::IctIndex => format!("{:.1}", sort.value(player)),
        _ => format!("{}", sort.value(player)),
    }
}

/// Market listing with the sort statistic in the last column.
pub fn market(players: &[Arc<Player>], catalog: &Catalog, sort: SortMetric) -> String {
    if players.is_empty() {
        return "No players match.\n".to_string();
    }
    let mut out = format!(
        "  {:>4}  {:<3}  {:<18} {:<4} {:>6}  {}\n",
        "id", "pos", "name", "club", "price", sort
    );
    for p in players {
        let _ = writeln!(
            out,
            "  {:>4}  {:<3}  {:<18} {:<4} {:>6}  {}",
            p.id,
            p.position,
            p.web_name,
            catalog.club_short_name(p.club),
            money(i64::from(p.price)),
            stat_value(p, sort)
        );
    }
    out
}

pub fn trends(players: &[Arc<Player>], catalog: &Catalog, metric: TrendMetric) -> String {
    let mut out = format!("{}\n", metric.label());
    for (rank, p) in players.iter().enumerate() {
        let value = match metric {
            TrendMetric::Form => format!("{:.1}", p.form),
            _ => format!("{}", metric.value(p)),
        };
        let _ = writeln!(
            out,
            "  {:>2}. {:<18} {:<4} {:>10}",
            rank + 1,
            p.web_name,
            catalog.club_short_name(p.club),
            value
        );
    }
    out
}

pub fn live(gameweek: u32, rows: &[LiveRow], catalog: &Catalog) -> String {
    let mut out = format!("Gameweek {gameweek} live\n");
    if rows.is_empty() {
        out.push_str("  (no live data)\n");
        return out;
    }
    for (rank, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<18} {:<4} {:>3} pts  {:>3}'  G{} A{} B{}",
            rank + 1,
            row.player.web_name,
            catalog.club_short_name(row.player.club),
            row.stats.total_points,
            row.stats.minutes,
            row.stats.goals_scored,
            row.stats.assists,
            row.stats.bonus
        );
    }
    out
}

pub fn fixtures(player: &Player, upcoming: &[UpcomingFixture]) -> String {
    let mut out = format!("Next fixtures for {}\n", player.web_name);
    if upcoming.is_empty() {
        out.push_str("  (none scheduled)\n");
        return out;
    }
    for f in upcoming {
        let gw = f.event.map_or_else(|| "GW?".to_string(), |e| format!("GW{e}"));
        let venue = if f.is_home { "H" } else { "A" };
        let _ = writeln!(
            out,
            "  {:<5} {} ({})  difficulty {}",
            gw, f.opponent, venue, f.difficulty
        );
    }
    out
}

pub fn targets(source: &SquadEntry, targets: &[SquadEntry]) -> String {
    if targets.is_empty() {
        return format!("{} has no valid swaps.\n", source.player().web_name);
    }
    let mut out = format!("{} can swap with\n", source.player().web_name);
    for t in targets {
        let side = if t.starting() { "XI" } else { "bench" };
        let _ = writeln!(
            out,
            "  {:>4}  {:<3}  {:<18} {}",
            t.id(),
            t.position(),
            t.player().web_name,
            side
        );
    }
    out
}

/// Catalog details for one player, with image links.
pub fn player_card(player: &Player, catalog: &Catalog) -> String {
    let club = catalog.club(player.club);
    let mut out = format!(
        "{} ({}, {})\n",
        player.web_name,
        player.position,
        club.map_or("???", |c| c.name.as_str())
    );
    let full_name = format!("{} {}", player.first_name, player.second_name);
    if !full_name.trim().is_empty() {
        let _ = writeln!(out, "  Name: {}", full_name.trim());
    }
    let _ = writeln!(
        out,
        "  Price {}  Points {} (GW {})  Form {:.1}  Selected {:.1}%",
        money(i64::from(player.price)),
        player.total_points,
        player.event_points,
        player.form,
        player.selected_by_percent
    );
    let _ = writeln!(
        out,
        "  Minutes {}  Goals {}  Assists {}  Clean sheets {}",
        player.minutes, player.goals_scored, player.assists, player.clean_sheets
    );
    if let Some(photo) = assets::player_photo_url(player.code) {
        let _ = writeln!(out, "  Photo: {photo}");
    }
    if let Some(badge) = club.and_then(|c| assets::badge_url(c.code)) {
        let _ = writeln!(out, "  Badge: {badge}");
    }
    let _ = writeln!(
        out,
        "  Shirt: {}",
        assets::shirt_url(club.map(|c| c.code), player.position.is_goalkeeper())
    );
    out
}

pub fn team_info(info: &TeamInfo) -> String {
    let mut out = format!("{} ({})\n", info.name, info.id);
    let manager = info.manager_name();
    if !manager.is_empty() {
        let _ = writeln!(out, "  Manager: {manager}");
    }
    if let Some(points) = info.summary_overall_points {
        let _ = writeln!(out, "  Overall points: {points}");
    }
    if let Some(rank) = info.summary_overall_rank {
        let _ = writeln!(out, "  Overall rank: {rank}");
    }
    if let Some(gw) = info.current_event {
        let _ = writeln!(out, "  Current gameweek: {gw}");
    }
    out
}
