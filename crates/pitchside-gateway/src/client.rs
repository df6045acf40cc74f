// HTTP data source for the fantasy API.
//
// `DataSource` is the seam the planner depends on; `HttpGateway` implements
// it over reqwest with a per-request timeout, retries with exponential
// backoff for transient failures, and the resource cache in `cache.rs`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pitchside_core::catalog::entry::{Pick, PicksResponse, TeamInfo};
use pitchside_core::catalog::fixture::Fixture;
use pitchside_core::catalog::live::LiveSnapshot;
use pitchside_core::catalog::Bootstrap;
use pitchside_core::Catalog;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheSettings, ResponseCache};
use crate::error::GatewayError;

// ---------------------------------------------------------------------------
// DataSource
// ---------------------------------------------------------------------------

/// Read-only access to the upstream resources.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Players, clubs and gameweeks, indexed.
    async fn bootstrap(&self) -> Result<Arc<Catalog>, GatewayError>;

    async fn fixtures(&self) -> Result<Arc<Vec<Fixture>>, GatewayError>;

    async fn live(&self, gameweek: u32) -> Result<Arc<LiveSnapshot>, GatewayError>;

    /// A manager's picks for a gameweek. Never cached.
    async fn user_picks(&self, team_id: u64, gameweek: u32) -> Result<Vec<Pick>, GatewayError>;

    /// A manager's team metadata. Never cached.
    async fn user_info(&self, team_id: u64) -> Result<TeamInfo, GatewayError>;
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Retries after the first attempt, for transient failures only.
    pub max_retries: u32,
    /// First retry delay; doubled on each further attempt.
    pub backoff_ms: u64,
    pub user_agent: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        GatewaySettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            max_retries: 2,
            backoff_ms: 500,
            user_agent: format!("pitchside/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpGateway
// ---------------------------------------------------------------------------

pub struct HttpGateway {
    http: reqwest::Client,
    settings: GatewaySettings,
    cache: ResponseCache,
}

impl HttpGateway {
    pub fn new(settings: GatewaySettings, cache: &CacheSettings) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(GatewayError::Client)?;
        Ok(HttpGateway {
            http,
            settings,
            cache: ResponseCache::new(cache),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.settings.backoff_ms.saturating_mul(1u64 << attempt.min(16)))
    }

    /// GET `path` and decode the JSON body, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.url(path);
        let mut attempt = 0;
        let body = loop {
            match self.get_text(&url).await {
                Ok(body) => break body,
                Err(e) if e.is_transient() && attempt < self.settings.max_retries => {
                    let delay = self.backoff(attempt);
                    warn!(%url, attempt, ?delay, error = %e, "transient gateway error, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(%url, attempt, error = %e, "gateway request failed");
                    return Err(e);
                }
            }
        };
        serde_json::from_str(&body).map_err(|source| GatewayError::Decode { url, source })
    }

    async fn get_text(&self, url: &str) -> Result<String, GatewayError> {
        let transport = |source: reqwest::Error| GatewayError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = self.http.get(url).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::from_status(status.as_u16(), url));
        }
        let body = resp.text().await.map_err(transport)?;
        debug!(url, status = status.as_u16(), bytes = body.len(), "fetched");
        Ok(body)
    }
}

#[async_trait]
impl DataSource for HttpGateway {
    async fn bootstrap(&self) -> Result<Arc<Catalog>, GatewayError> {
        self.cache
            .catalog
            .get_or_fill((), || async {
                let bootstrap: Bootstrap = self.get_json("bootstrap-static/").await?;
                let catalog = Arc::new(Catalog::new(bootstrap));
                info!(
                    players = catalog.players().len(),
                    gameweeks = catalog.gameweeks().len(),
                    "bootstrap loaded"
                );
                Ok::<_, GatewayError>(catalog)
            })
            .await
    }

    async fn fixtures(&self) -> Result<Arc<Vec<Fixture>>, GatewayError> {
        self.cache
            .fixtures
            .get_or_fill((), || async {
                let fixtures: Arc<Vec<Fixture>> = Arc::new(self.get_json("fixtures/").await?);
                info!(count = fixtures.len(), "fixtures loaded");
                Ok::<_, GatewayError>(fixtures)
            })
            .await
    }

    async fn live(&self, gameweek: u32) -> Result<Arc<LiveSnapshot>, GatewayError> {
        self.cache
            .live
            .get_or_fill(gameweek, || async {
                let live: Arc<LiveSnapshot> =
                    Arc::new(self.get_json(&format!("event/{gameweek}/live/")).await?);
                info!(gameweek, elements = live.elements.len(), "live stats loaded");
                Ok::<_, GatewayError>(live)
            })
            .await
    }

    async fn user_picks(&self, team_id: u64, gameweek: u32) -> Result<Vec<Pick>, GatewayError> {
        let resp: PicksResponse = self
            .get_json(&format!("entry/{team_id}/event/{gameweek}/picks/"))
            .await?;
        info!(team_id, gameweek, picks = resp.picks.len(), chip = ?resp.active_chip, "picks loaded");
        Ok(resp.picks)
    }

    async fn user_info(&self, team_id: u64) -> Result<TeamInfo, GatewayError> {
        self.get_json(&format!("entry/{team_id}/")).await
    }
}
