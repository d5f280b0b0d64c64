//! API-Football access: the source traits the poller is written against, the
//! reqwest-backed client that implements them, and the payload decoders.

pub mod client;
pub mod messages;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::types::{Fixture, OddsKind, OddsQuote};

pub use client::ApiFootballClient;

/// Scheduled fixtures for a calendar day.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    async fn fixtures_on(&self, date: NaiveDate, leagues: &HashSet<u32>) -> Result<Vec<Fixture>>;
}

/// Fixtures currently in progress, with score and elapsed time.
#[async_trait]
pub trait LiveScoreSource: Send + Sync {
    async fn live_fixtures(&self) -> Result<Vec<Fixture>>;
}

/// Match-outcome quotes for one fixture. An empty list means the source has nothing priced.
#[async_trait]
pub trait OddsSource: Send + Sync {
    async fn odds(&self, fixture_id: u64, kind: OddsKind) -> Result<Vec<OddsQuote>>;
}
