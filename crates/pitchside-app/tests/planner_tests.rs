// Planner and command loop against an in-memory data source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pitchside_app::app;
use pitchside_app::config::PlannerConfig;
use pitchside_app::planner::{Planner, PlannerError};
use pitchside_core::catalog::entry::{Pick, TeamInfo};
use pitchside_core::catalog::fixture::Fixture;
use pitchside_core::catalog::live::LiveSnapshot;
use pitchside_core::catalog::Bootstrap;
use pitchside_core::market::SortMetric;
use pitchside_core::{Catalog, Phase, Position, Rejection, SquadError};
use pitchside_gateway::{DataSource, GatewayError};
use serde_json::json;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Fake data source
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeSource {
    catalog: Option<Arc<Catalog>>,
    fixtures: Arc<Vec<Fixture>>,
    live: HashMap<u32, Arc<LiveSnapshot>>,
    picks: HashMap<u64, Vec<Pick>>,
    /// Every request made, e.g. `picks 42 7`.
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeSource {
    fn log(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

fn not_found(url: &str) -> GatewayError {
    GatewayError::BadRequest {
        status: 404,
        url: url.to_string(),
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn bootstrap(&self) -> Result<Arc<Catalog>, GatewayError> {
        self.log("bootstrap".into());
        self.catalog.clone().ok_or_else(|| GatewayError::Upstream {
            status: 503,
            url: "bootstrap-static/".into(),
        })
    }

    async fn fixtures(&self) -> Result<Arc<Vec<Fixture>>, GatewayError> {
        self.log("fixtures".into());
        Ok(Arc::clone(&self.fixtures))
    }

    async fn live(&self, gameweek: u32) -> Result<Arc<LiveSnapshot>, GatewayError> {
        self.log(format!("live {gameweek}"));
        self.live
            .get(&gameweek)
            .cloned()
            .ok_or_else(|| not_found("event/live/"))
    }

    async fn user_picks(&self, team_id: u64, gameweek: u32) -> Result<Vec<Pick>, GatewayError> {
        self.log(format!("picks {team_id} {gameweek}"));
        self.picks
            .get(&team_id)
            .cloned()
            .ok_or_else(|| not_found("entry/picks/"))
    }

    async fn user_info(&self, team_id: u64) -> Result<TeamInfo, GatewayError> {
        self.log(format!("info {team_id}"));
        if team_id != 42 {
            return Err(not_found("entry/"));
        }
        Ok(TeamInfo {
            id: 42,
            name: "Route One FC".into(),
            player_first_name: "Sam".into(),
            player_last_name: "Reid".into(),
            summary_overall_points: Some(1520),
            summary_overall_rank: Some(120_345),
            current_event: Some(7),
        })
    }
}

// Ids: GKP 1-2, DEF 3-7, MID 8-12, FWD 13-15, spare DEF 16.
// Clubs 1-5 hold three players each; DEF 16 plays for club 1.
fn catalog() -> Arc<Catalog> {
    let types = [1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 4, 4, 4, 2];
    let elements: Vec<_> = types
        .iter()
        .enumerate()
        .map(|(i, &element_type)| {
            let id = i as u32 + 1;
            json!({
                "id": id,
                "web_name": format!("Player{id}"),
                "element_type": element_type,
                "team": (id - 1) % 5 + 1,
                "now_cost": 60 + id,
                "total_points": 100 - id,
                "form": format!("{}.0", id % 7),
            })
        })
        .collect();
    let teams: Vec<_> = (1..=5)
        .map(|id| json!({"id": id, "name": format!("Club {id}"), "short_name": format!("C{id}")}))
        .collect();
    let bootstrap: Bootstrap = serde_json::from_value(json!({
        "elements": elements,
        "teams": teams,
        "events": [
            {"id": 6, "finished": true},
            {"id": 7, "is_current": true},
            {"id": 8, "is_next": true}
        ],
    }))
    .unwrap();
    Arc::new(Catalog::new(bootstrap))
}

fn fixtures() -> Arc<Vec<Fixture>> {
    let list: Vec<Fixture> = serde_json::from_value(json!([
        {"id": 1, "event": 7, "team_h": 1, "team_a": 2, "team_h_difficulty": 3,
         "team_a_difficulty": 4, "finished": true},
        {"id": 2, "event": 8, "team_h": 3, "team_a": 1, "team_h_difficulty": 2,
         "team_a_difficulty": 5, "finished": false},
        {"id": 3, "event": 9, "team_h": 1, "team_a": 9, "team_h_difficulty": 2,
         "team_a_difficulty": 3, "finished": false}
    ]))
    .unwrap();
    Arc::new(list)
}

fn picks(ids: &[u32]) -> Vec<Pick> {
    ids.iter()
        .enumerate()
        .map(|(i, &id)| Pick {
            player_id: id,
            position: i as u8 + 1,
            multiplier: u8::from(i < 11),
            is_captain: i == 10,
            is_vice_captain: i == 9,
        })
        .collect()
}

fn source() -> FakeSource {
    let live: LiveSnapshot = serde_json::from_value(json!({"elements": [
        {"id": 13, "stats": {"minutes": 90, "goals_scored": 2, "total_points": 13}},
        {"id": 8, "stats": {"minutes": 90, "assists": 1, "total_points": 6}},
        {"id": 999, "stats": {"minutes": 90, "total_points": 20}}
    ]}))
    .unwrap();

    let mut picks_by_team = HashMap::new();
    picks_by_team.insert(42, picks(&[1, 3, 4, 5, 6, 8, 9, 10, 11, 13, 14, 2, 7, 12, 15]));
    // One pick the catalog does not know
    picks_by_team.insert(43, picks(&[1, 3, 4, 5, 6, 8, 9, 10, 11, 13, 14, 2, 7, 12, 500]));
    picks_by_team.insert(44, Vec::new());

    FakeSource {
        catalog: Some(catalog()),
        fixtures: fixtures(),
        live: HashMap::from([(7, Arc::new(live))]),
        picks: picks_by_team,
        ..FakeSource::default()
    }
}

async fn loaded_planner() -> Planner<FakeSource> {
    let mut planner = Planner::new(source(), PlannerConfig::default());
    planner.load().await.unwrap();
    planner
}

fn build_fifteen(planner: &mut Planner<FakeSource>) {
    for id in 1..=15 {
        planner.add(id).unwrap();
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transitions_need_loaded_catalog() {
    let mut planner = Planner::new(source(), PlannerConfig::default());
    assert!(matches!(planner.add(1), Err(PlannerError::CatalogNotLoaded)));
    assert!(matches!(
        planner.market(&planner.market_query(None, "", SortMetric::TotalPoints)),
        Err(PlannerError::CatalogNotLoaded)
    ));
}

#[tokio::test]
async fn failed_load_is_a_gateway_error() {
    let mut planner = Planner::new(
        FakeSource {
            catalog: None,
            ..source()
        },
        PlannerConfig::default(),
    );
    let err = planner.load().await.unwrap_err();
    match err {
        PlannerError::Gateway(e) => assert!(e.is_transient()),
        other => panic!("expected gateway error, got {other}"),
    }
}

#[tokio::test]
async fn build_save_and_manage() {
    let mut planner = loaded_planner().await;
    build_fifteen(&mut planner);
    assert_eq!(planner.squad().phase(), Phase::Complete);
    planner.save().unwrap();
    assert_eq!(planner.squad().formation().unwrap().to_string(), "4-4-2");

    planner.set_captain(13).unwrap();
    planner.set_vice_captain(8).unwrap();
    planner.substitute(1, 2).unwrap();
    assert!(planner.squad().find(2).unwrap().starting());

    // DEF 16 for DEF 7: club 1 already has 1, 6 and 11
    let err = planner.transfer(7, 16).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Squad(SquadError::Rejected(Rejection::ClubFull { club_id: 1 }))
    ));
    let (out, incoming) = planner.transfer(6, 16).unwrap();
    assert_eq!((out.id(), incoming.id), (6, 16));
    assert_eq!(planner.squad().captain().unwrap().id(), 13);
}

#[tokio::test]
async fn unknown_player_is_reported() {
    let mut planner = loaded_planner().await;
    assert!(matches!(
        planner.add(404),
        Err(PlannerError::UnknownPlayer { player_id: 404 })
    ));
    assert!(matches!(
        planner.remove(3),
        Err(PlannerError::Squad(SquadError::NotFound { player_id: 3 }))
    ));
}

#[tokio::test]
async fn budget_is_tracked_not_enforced() {
    let mut planner = Planner::new(
        source(),
        PlannerConfig {
            budget: 500,
            ..PlannerConfig::default()
        },
    );
    planner.load().await.unwrap();
    build_fifteen(&mut planner);
    // 15 players at 61..=75
    let cost: i64 = (61..=75).sum();
    assert_eq!(planner.remaining_budget(), 500 - cost);
    assert!(planner.remaining_budget() < 0);
}

#[tokio::test]
async fn import_uses_current_gameweek_and_keeps_flags() {
    let source = source();
    let requests = Arc::clone(&source.requests);
    let mut planner = Planner::new(source, PlannerConfig::default());

    let summary = planner.import(42, None).await.unwrap();
    assert_eq!(summary.gameweek, 7);
    assert_eq!(planner.squad().phase(), Phase::Saved);
    assert_eq!(planner.squad().captain().unwrap().id(), 14);
    assert_eq!(planner.squad().vice_captain().unwrap().id(), 13);
    assert!(!planner.squad().find(2).unwrap().starting());
    assert_eq!(planner.squad().formation().unwrap().to_string(), "4-4-2");

    planner.import(42, Some(3)).await.unwrap();
    let log = requests.lock().unwrap().clone();
    assert!(log.contains(&"picks 42 7".to_string()));
    assert!(log.contains(&"picks 42 3".to_string()));
    // Catalog loaded once, lazily
    assert_eq!(log.iter().filter(|r| *r == "bootstrap").count(), 1);
}

#[tokio::test]
async fn import_with_unresolved_pick_keeps_squad() {
    let mut planner = loaded_planner().await;

    let err = planner.import(43, Some(7)).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Squad(SquadError::ImportIncomplete {
            resolved: 14,
            required: 15
        })
    ));
    assert!(planner.squad().is_empty());

    build_fifteen(&mut planner);
    planner.save().unwrap();
    let before = planner.squad().clone();
    assert!(planner.import(43, Some(7)).await.is_err());
    assert_eq!(planner.squad(), &before);
}

#[tokio::test]
async fn import_of_empty_or_missing_team_fails() {
    let mut planner = loaded_planner().await;
    assert!(matches!(
        planner.import(44, Some(7)).await.unwrap_err(),
        PlannerError::Squad(SquadError::ImportIncomplete { resolved: 0, .. })
    ));
    match planner.import(99, Some(7)).await.unwrap_err() {
        PlannerError::Gateway(e) => assert_eq!(e.status(), Some(404)),
        other => panic!("expected gateway error, got {other}"),
    }
    assert!(planner.squad().is_empty());
}

#[tokio::test]
async fn market_respects_squad_and_settings() {
    let mut planner = Planner::new(
        source(),
        PlannerConfig {
            market_limit: 3,
            max_price: 70,
            ..PlannerConfig::default()
        },
    );
    planner.load().await.unwrap();
    planner.add(1).unwrap();

    let query = planner.market_query(None, "", SortMetric::TotalPoints);
    let ids: Vec<u32> = planner.market(&query).unwrap().iter().map(|p| p.id).collect();
    // Highest points are the lowest ids; 1 is owned and price caps at id 10
    assert_eq!(ids, vec![2, 3, 4]);

    let query = planner.market_query(Some(Position::Forward), "", SortMetric::TotalPoints);
    assert!(planner.market(&query).unwrap().is_empty());
}

#[tokio::test]
async fn targets_follow_substitution_rules() {
    let mut planner = loaded_planner().await;
    build_fifteen(&mut planner);
    // Before saving there is no bench, so nothing to offer
    assert!(matches!(
        planner.targets(3),
        Err(PlannerError::Squad(SquadError::Rejected(Rejection::NotSaved {
            phase: Phase::Complete
        })))
    ));
    planner.save().unwrap();

    let ids: Vec<u32> = planner.targets(1).unwrap().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![2]);
    assert!(planner.targets(77).is_err());
}

#[tokio::test]
async fn live_leaderboard_defaults_to_current_gameweek() {
    let mut planner = loaded_planner().await;
    let (gameweek, rows) = planner.live(None).await.unwrap();
    assert_eq!(gameweek, 7);
    let ids: Vec<u32> = rows.iter().map(|r| r.player.id).collect();
    assert_eq!(ids, vec![13, 8]);

    assert!(matches!(
        planner.live(Some(30)).await,
        Err(PlannerError::Gateway(GatewayError::BadRequest { status: 404, .. }))
    ));
}

#[tokio::test]
async fn fixtures_for_player() {
    let mut planner = loaded_planner().await;
    // Player 1 plays for club 1
    let (player, upcoming) = planner.fixtures_for(1).await.unwrap();
    assert_eq!(player.id, 1);
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].opponent, "C3");
    assert!(!upcoming[0].is_home);
    assert_eq!(upcoming[0].difficulty, 5);
    assert_eq!(upcoming[1].opponent, "OPP");
}

// ---------------------------------------------------------------------------
// Command loop
// ---------------------------------------------------------------------------

async fn run_lines(planner: &mut Planner<FakeSource>, lines: &[&str]) -> String {
    let (tx, rx) = mpsc::channel(64);
    for line in lines {
        tx.send(line.to_string()).await.unwrap();
    }
    drop(tx);
    let mut out: Vec<u8> = Vec::new();
    app::run(rx, &mut out, planner).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn command_loop_reports_success_and_failure() {
    let mut planner = loaded_planner().await;
    let output = run_lines(
        &mut planner,
        &["add 1", "add 1", "bogus", "sub 1 2", "team 42", "show"],
    )
    .await;

    assert!(output.contains("Added Player1 (GKP). Squad 1/15."));
    assert!(output.contains("error: transition rejected: player 1 is already in the squad"));
    assert!(output.contains("error: unknown command `bogus`"));
    assert!(output.contains("squad must be saved first (currently building)"));
    assert!(output.contains("Route One FC (42)"));
    assert!(output.contains("Squad: 1/15, building"));
}

#[tokio::test]
async fn quit_stops_the_loop() {
    let mut planner = loaded_planner().await;
    let output = run_lines(&mut planner, &["add 1", "quit", "add 2"]).await;
    assert!(output.contains("Player1"));
    assert!(!output.contains("Player2"));
    assert_eq!(planner.squad().size(), 1);
}
