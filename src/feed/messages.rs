use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::config::MATCH_WINNER_MARKET;
use crate::error::{AppError, Result};
use crate::types::{Fixture, League, MatchStatus, OddsQuote, Outcome, Score, Team};

static SKIPPED_ENTRIES: AtomicU64 = AtomicU64::new(0);

/// Bookmaker label given to quotes from the live odds feed, which carries no bookmaker list.
pub const LIVE_BOOKMAKER: &str = "live";

/// The live feed names its 1X2 market "Fulltime Result"; it is the same market.
const LIVE_MATCH_WINNER_ALIASES: &[&str] = &["Fulltime Result", MATCH_WINNER_MARKET];

/// API-Football wraps every payload as `{ errors, results, response: [...] }`.
/// `errors` is `[]` on success and an object such as `{"token": "..."}` otherwise,
/// even when the HTTP status is 200.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawFixtureEntry {
    fixture: RawFixtureInfo,
    league: RawLeague,
    teams: RawTeams,
    #[serde(default)]
    goals: RawGoals,
}

#[derive(Debug, Deserialize)]
struct RawFixtureInfo {
    id: u64,
    status: RawStatus,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    short: String,
    elapsed: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawLeague {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawTeams {
    home: RawTeam,
    away: RawTeam,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: u32,
    name: String,
}

/// Goals are `null` until kick-off.
#[derive(Debug, Default, Deserialize)]
struct RawGoals {
    home: Option<u32>,
    away: Option<u32>,
}

impl From<RawFixtureEntry> for Fixture {
    fn from(raw: RawFixtureEntry) -> Self {
        Fixture {
            id: raw.fixture.id,
            home: Team {
                id: raw.teams.home.id,
                name: raw.teams.home.name,
            },
            away: Team {
                id: raw.teams.away.id,
                name: raw.teams.away.name,
            },
            league: League {
                id: raw.league.id,
                name: raw.league.name,
            },
            score: Score {
                home: raw.goals.home.unwrap_or(0),
                away: raw.goals.away.unwrap_or(0),
            },
            elapsed: raw.fixture.status.elapsed,
            status: MatchStatus::from_short(&raw.fixture.status.short),
        }
    }
}

/// Parse a `/fixtures` response body. Entries that do not match the expected
/// shape are skipped and counted rather than failing the whole batch.
pub fn parse_fixtures(raw: &str) -> Result<Vec<Fixture>> {
    let envelope = parse_envelope(raw)?;
    Ok(envelope
        .response
        .into_iter()
        .filter_map(|item| decode_entry::<RawFixtureEntry>(item, "fixture"))
        .map(Fixture::from)
        .collect())
}

// ---------------------------------------------------------------------------
// Odds
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPrematchEntry {
    #[serde(default)]
    bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Deserialize)]
struct RawBookmaker {
    name: String,
    #[serde(default)]
    bets: Vec<RawBet>,
}

#[derive(Debug, Deserialize)]
struct RawBet {
    name: String,
    #[serde(default)]
    values: Vec<RawOddValue>,
}

/// `odd` arrives as a string ("1.30") from most endpoints and occasionally as a number.
#[derive(Debug, Deserialize)]
struct RawOddValue {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    odd: Value,
    #[serde(default)]
    suspended: bool,
}

#[derive(Debug, Deserialize)]
struct RawLiveEntry {
    #[serde(default)]
    odds: Vec<RawBet>,
}

/// Parse an `/odds?fixture=` response into one quote per bookmaker, market and outcome.
pub fn parse_prematch_odds(raw: &str) -> Result<Vec<OddsQuote>> {
    let envelope = parse_envelope(raw)?;
    let mut quotes = Vec::new();
    for entry in envelope
        .response
        .into_iter()
        .filter_map(|item| decode_entry::<RawPrematchEntry>(item, "pre-match odds"))
    {
        for bookmaker in entry.bookmakers {
            for bet in bookmaker.bets {
                push_quotes(&bookmaker.name, &bet.name, bet.values, &mut quotes);
            }
        }
    }
    Ok(quotes)
}

/// Parse an `/odds/live?fixture=` response. Suspended prices are dropped and the
/// 1X2 market is recorded under the match-winner name.
pub fn parse_live_odds(raw: &str) -> Result<Vec<OddsQuote>> {
    let envelope = parse_envelope(raw)?;
    let mut quotes = Vec::new();
    for entry in envelope
        .response
        .into_iter()
        .filter_map(|item| decode_entry::<RawLiveEntry>(item, "live odds"))
    {
        for bet in entry.odds {
            let market = if LIVE_MATCH_WINNER_ALIASES
                .iter()
                .any(|alias| bet.name.eq_ignore_ascii_case(alias))
            {
                MATCH_WINNER_MARKET
            } else {
                bet.name.as_str()
            };
            let values = bet.values.into_iter().filter(|v| !v.suspended).collect();
            push_quotes(LIVE_BOOKMAKER, market, values, &mut quotes);
        }
    }
    Ok(quotes)
}

fn push_quotes(bookmaker: &str, market: &str, values: Vec<RawOddValue>, out: &mut Vec<OddsQuote>) {
    for v in values {
        let Some(outcome) = v.value.as_str().and_then(Outcome::from_label) else {
            continue;
        };
        let Some(price) = as_price(&v.odd) else {
            continue;
        };
        out.push(OddsQuote {
            bookmaker: bookmaker.to_string(),
            market: market.to_string(),
            outcome,
            price,
        });
    }
}

/// Decimal odd from a JSON string or number. Non-positive and non-finite values are rejected.
fn as_price(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|p: &f64| p.is_finite() && *p > 0.0)
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

fn parse_envelope(raw: &str) -> Result<Envelope> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    check_errors(&envelope.errors)?;
    Ok(envelope)
}

fn check_errors(errors: &Value) -> Result<()> {
    let reported = match errors {
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    };
    if reported {
        return Err(AppError::Api(errors.to_string()));
    }
    Ok(())
}

fn decode_entry<T: serde::de::DeserializeOwned>(item: Value, what: &str) -> Option<T> {
    match serde_json::from_value::<T>(item) {
        Ok(entry) => Some(entry),
        Err(e) => {
            let count = SKIPPED_ENTRIES.fetch_add(1, Ordering::Relaxed) + 1;
            if count <= 10 || count % 1000 == 0 {
                warn!(count, "[FEED PARSE] skipped malformed {what} entry: {e}");
            }
            None
        }
    }
}
