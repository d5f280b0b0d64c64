use std::collections::HashSet;

use crate::error::{AppError, Result};

pub const API_FOOTBALL_URL: &str = "https://v3.football.api-sports.io";

/// Header API-Football reads the key from.
pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Favorite map is rebuilt from scratch this often (seconds).
pub const REFRESH_WINDOW_SECS: u64 = 20 * 60;

/// Sleep between polling cycles (seconds).
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Per-request timeout for every external HTTP call (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default maximum odd for a side to count as a favorite.
pub const DEFAULT_ODDS_CEILING: f64 = 1.50;

/// Market name the tracker prices favorites from.
pub const MATCH_WINNER_MARKET: &str = "Match Winner";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: i64,
    /// Only fixtures in these leagues are priced and alerted (ALLOWED_LEAGUES, comma-separated).
    pub allowed_leagues: HashSet<u32>,
    /// Favorites priced above this are not tracked (ODDS_CEILING).
    pub odds_ceiling: f64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let odds_ceiling = match std::env::var("ODDS_CEILING") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Config(format!("ODDS_CEILING is not a number: {raw}")))?,
            Err(_) => DEFAULT_ODDS_CEILING,
        };
        if !odds_ceiling.is_finite() || odds_ceiling <= 1.0 {
            return Err(AppError::Config(
                "ODDS_CEILING must be a decimal odd greater than 1.0".to_string(),
            ));
        }

        let allowed_leagues = parse_league_list(&required("ALLOWED_LEAGUES")?)?;
        if allowed_leagues.is_empty() {
            return Err(AppError::Config("ALLOWED_LEAGUES lists no leagues".to_string()));
        }

        let telegram_chat_id = required("TELEGRAM_CHAT_ID")?
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Config("TELEGRAM_CHAT_ID must be an integer chat id".to_string()))?;

        Ok(Self {
            api_url: std::env::var("API_FOOTBALL_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| API_FOOTBALL_URL.to_string()),
            api_key: required("API_FOOTBALL_KEY")?,
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id,
            allowed_leagues,
            odds_ceiling,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn league_allowed(&self, league_id: u32) -> bool {
        self.allowed_leagues.contains(&league_id)
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("{name} must be set")))
}

/// Parse `"39, 140,135"` into league ids. Empty segments are ignored.
pub fn parse_league_list(raw: &str) -> Result<HashSet<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| AppError::Config(format!("invalid league id in ALLOWED_LEAGUES: {s}")))
        })
        .collect()
}
