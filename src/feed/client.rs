use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::config::{Config, API_KEY_HEADER, REQUEST_TIMEOUT_SECS};
use crate::error::{AppError, Result};
use crate::feed::messages::{parse_fixtures, parse_live_odds, parse_prematch_odds};
use crate::feed::{FixtureSource, LiveScoreSource, OddsSource};
use crate::types::{Fixture, OddsKind, OddsQuote};

/// Longest slice of an error body kept for logs.
const ERROR_BODY_SNIPPET: usize = 220;

/// Client for the API-Football v3 REST API.
/// One reqwest client is built at startup and reused for every call.
pub struct ApiFootballClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiFootballClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("favorite-watch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// GET `{base}{path}` with the API key header and return the body on 2xx.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let snippet = body
                .trim()
                .replace(['\n', '\r'], " ")
                .chars()
                .take(ERROR_BODY_SNIPPET)
                .collect::<String>();
            return Err(AppError::Status { status, body: snippet });
        }
        Ok(body)
    }
}

#[async_trait]
impl FixtureSource for ApiFootballClient {
    async fn fixtures_on(&self, date: NaiveDate, leagues: &HashSet<u32>) -> Result<Vec<Fixture>> {
        // One call per day; the league filter is applied locally so the allow-list
        // costs no extra requests.
        let body = self
            .get("/fixtures", &[("date", date.format("%Y-%m-%d").to_string())])
            .await?;
        let all = parse_fixtures(&body)?;
        let total = all.len();
        let fixtures: Vec<Fixture> = all
            .into_iter()
            .filter(|f| leagues.contains(&f.league.id))
            .collect();
        debug!(%date, total, kept = fixtures.len(), "Fetched daily fixtures");
        Ok(fixtures)
    }
}

#[async_trait]
impl LiveScoreSource for ApiFootballClient {
    async fn live_fixtures(&self) -> Result<Vec<Fixture>> {
        let body = self.get("/fixtures", &[("live", "all".to_string())]).await?;
        parse_fixtures(&body)
    }
}

#[async_trait]
impl OddsSource for ApiFootballClient {
    async fn odds(&self, fixture_id: u64, kind: OddsKind) -> Result<Vec<OddsQuote>> {
        let query = [("fixture", fixture_id.to_string())];
        match kind {
            OddsKind::Live => parse_live_odds(&self.get("/odds/live", &query).await?),
            OddsKind::PreMatch => parse_prematch_odds(&self.get("/odds", &query).await?),
        }
    }
}
