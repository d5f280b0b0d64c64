//! Builders and in-memory fakes shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::{Config, MATCH_WINNER_MARKET};
use crate::error::{AppError, Result};
use crate::feed::{FixtureSource, LiveScoreSource, OddsSource};
use crate::notifier::Notifier;
use crate::types::{Fixture, League, MatchStatus, OddsKind, OddsQuote, Outcome, Score, Team};

pub fn fixture(id: u64, home: (u32, &str), away: (u32, &str)) -> Fixture {
    Fixture {
        id,
        home: Team {
            id: home.0,
            name: home.1.to_string(),
        },
        away: Team {
            id: away.0,
            name: away.1.to_string(),
        },
        league: League {
            id: 39,
            name: "Premier League".to_string(),
        },
        score: Score::default(),
        elapsed: None,
        status: MatchStatus::NotStarted,
    }
}

pub fn live(mut f: Fixture, home_goals: u32, away_goals: u32, minute: u32) -> Fixture {
    f.score = Score {
        home: home_goals,
        away: away_goals,
    };
    f.elapsed = Some(minute);
    f.status = MatchStatus::InPlay("2H".to_string());
    f
}

pub fn quote(bookmaker: &str, outcome: Outcome, price: f64) -> OddsQuote {
    OddsQuote {
        bookmaker: bookmaker.to_string(),
        market: MATCH_WINNER_MARKET.to_string(),
        outcome,
        price,
    }
}

pub fn config() -> Config {
    Config {
        api_url: "http://localhost".to_string(),
        api_key: "key".to_string(),
        telegram_bot_token: "token".to_string(),
        telegram_chat_id: 42,
        allowed_leagues: HashSet::from([39]),
        odds_ceiling: 1.50,
        log_level: "debug".to_string(),
    }
}

/// Scripted API-Football stand-in. Interior mutability lets tests change the
/// live scores between polling cycles.
#[derive(Default)]
pub struct FakeFeed {
    pub daily: Mutex<Vec<Fixture>>,
    pub live: Mutex<Vec<Fixture>>,
    pub live_odds: Mutex<HashMap<u64, Vec<OddsQuote>>>,
    pub prematch_odds: Mutex<HashMap<u64, Vec<OddsQuote>>>,
    pub failing_live_odds: HashSet<u64>,
    pub failing_prematch_odds: HashSet<u64>,
    pub fail_daily: AtomicBool,
    pub fail_live: AtomicBool,
    /// Live fetches never complete while set.
    pub stall_live: AtomicBool,
    pub daily_calls: AtomicUsize,
    pub live_calls: AtomicUsize,
}

impl FakeFeed {
    pub fn set_live(&self, fixtures: Vec<Fixture>) {
        *self.live.lock().unwrap() = fixtures;
    }

    pub fn set_prematch(&self, fixture_id: u64, quotes: Vec<OddsQuote>) {
        self.prematch_odds.lock().unwrap().insert(fixture_id, quotes);
    }

    pub fn set_live_odds(&self, fixture_id: u64, quotes: Vec<OddsQuote>) {
        self.live_odds.lock().unwrap().insert(fixture_id, quotes);
    }
}

#[async_trait]
impl FixtureSource for FakeFeed {
    async fn fixtures_on(&self, _date: NaiveDate, leagues: &HashSet<u32>) -> Result<Vec<Fixture>> {
        self.daily_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_daily.load(Ordering::SeqCst) {
            return Err(AppError::Api("daily fixtures unavailable".to_string()));
        }
        Ok(self
            .daily
            .lock()
            .unwrap()
            .iter()
            .filter(|f| leagues.contains(&f.league.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LiveScoreSource for FakeFeed {
    async fn live_fixtures(&self) -> Result<Vec<Fixture>> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        if self.stall_live.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_live.load(Ordering::SeqCst) {
            return Err(AppError::Api("live fixtures unavailable".to_string()));
        }
        Ok(self.live.lock().unwrap().clone())
    }
}

#[async_trait]
impl OddsSource for FakeFeed {
    async fn odds(&self, fixture_id: u64, kind: OddsKind) -> Result<Vec<OddsQuote>> {
        let (failing, book) = match kind {
            OddsKind::Live => (&self.failing_live_odds, &self.live_odds),
            OddsKind::PreMatch => (&self.failing_prematch_odds, &self.prematch_odds),
        };
        if failing.contains(&fixture_id) {
            return Err(AppError::Api(format!("{kind} odds unavailable")));
        }
        Ok(book
            .lock()
            .unwrap()
            .get(&fixture_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Notifier that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Api("chat unreachable".to_string()));
        }
        Ok(())
    }
}
