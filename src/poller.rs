use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::{Config, POLL_INTERVAL_SECS};
use crate::detector::alert_gate;
use crate::error::Result;
use crate::feed::{FixtureSource, LiveScoreSource, OddsSource};
use crate::latency::CycleLatency;
use crate::notifier::Notifier;
use crate::state::WatchState;
use crate::tracker;
use crate::types::Fixture;

/// Outcome of one polling cycle, for logging and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub refreshed: bool,
    pub live: usize,
    pub evaluated: usize,
    pub alerts: usize,
    pub delivered: usize,
}

/// Owns all loop state and drives refresh → live fetch → evaluate → sleep.
pub struct Poller<S, N> {
    cfg: Config,
    feed: S,
    notifier: N,
    state: WatchState,
    latency: CycleLatency,
}

impl<S, N> Poller<S, N>
where
    S: FixtureSource + LiveScoreSource + OddsSource,
    N: Notifier,
{
    pub fn new(cfg: Config, feed: S, notifier: N) -> Self {
        Self {
            cfg,
            feed,
            notifier,
            state: WatchState::new(),
            latency: CycleLatency::new(),
        }
    }

    /// Poll until Ctrl-C.
    pub async fn run(self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Ctrl-C listener failed: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await;
    }

    /// Poll until `shutdown` resolves. The shutdown future lives across the
    /// whole loop and races both the cycle and the pause, so a signal that
    /// lands mid-cycle is not lost. A failed cycle is logged and retried after
    /// the normal interval.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let pause = Duration::from_secs(POLL_INTERVAL_SECS);
        tokio::pin!(shutdown);

        loop {
            let started = Instant::now();
            let outcome = tokio::select! {
                outcome = self.cycle(started) => outcome,
                _ = &mut shutdown => break,
            };
            match outcome {
                Ok(report) => debug!(
                    refreshed = report.refreshed,
                    live = report.live,
                    evaluated = report.evaluated,
                    alerts = report.alerts,
                    delivered = report.delivered,
                    tracked = self.state.favorites.len(),
                    sent_total = self.state.sent.len(),
                    "Cycle complete",
                ),
                Err(e) => error!("Polling cycle failed: {e}"),
            }
            self.latency.record(started.elapsed());

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = &mut shutdown => break,
            }
        }

        info!(sent_total = self.state.sent.len(), "Interrupted, poller stopping");
    }

    /// One pass of the loop at time `now`. Only a failed live-fixture fetch is
    /// returned as an error; refresh and delivery failures are logged here.
    pub async fn cycle(&mut self, now: Instant) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        if self.state.refresh_due(now) {
            match self.refresh(now).await {
                Ok(()) => report.refreshed = true,
                Err(e) => warn!(
                    tracked = self.state.favorites.len(),
                    "Favorite refresh failed, keeping previous map: {e}"
                ),
            }
        }

        let live = self.feed.live_fixtures().await?;
        report.live = live.len();

        for fixture in &live {
            if !self.cfg.league_allowed(fixture.league.id) {
                continue;
            }
            report.evaluated += 1;

            let Some(alert) = alert_gate::evaluate(fixture, &self.state.favorites, &mut self.state.sent)
            else {
                continue;
            };
            report.alerts += 1;
            info!(
                fixture_id = alert.fixture_id,
                league = %alert.league,
                favorite = %alert.favorite,
                odd = alert.odd,
                home = alert.score.home,
                away = alert.score.away,
                elapsed = ?alert.elapsed,
                status = %fixture.status,
                "FAVORITE LOSING | {} @ {:.2} | {} {} - {} {}",
                alert.favorite, alert.odd, alert.home_name, alert.score.home, alert.score.away, alert.away_name,
            );

            match self.notifier.send(&alert.render()).await {
                Ok(()) => report.delivered += 1,
                Err(e) => error!(fixture_id = alert.fixture_id, "Alert delivery failed: {e}"),
            }
        }

        Ok(report)
    }

    async fn refresh(&mut self, now: Instant) -> Result<()> {
        let today = Utc::now().date_naive();
        let fixtures: Vec<Fixture> = self
            .feed
            .fixtures_on(today, &self.cfg.allowed_leagues)
            .await?
            .into_iter()
            .filter(|f| !f.status.is_over())
            .collect();

        let (favorites, stats) = tracker::refresh(&fixtures, &self.feed, self.cfg.odds_ceiling).await;
        self.state.replace_favorites(favorites, now);

        info!(
            %today,
            considered = stats.considered,
            tracked = stats.tracked,
            no_quotes = stats.rejected_no_quotes,
            above_ceiling = stats.rejected_above_ceiling,
            fetch_errors = stats.fetch_errors,
            live_priced = stats.priced_live,
            prematch_priced = stats.priced_prematch,
            "Favorite refresh complete: {} tracked of {} fixtures (ceiling {:.2})",
            stats.tracked, stats.considered, self.cfg.odds_ceiling,
        );
        if let Some((p50, p95, p99)) = self.latency.percentiles() {
            info!(
                cycles = self.latency.len(),
                p50_ms = p50,
                p95_ms = p95,
                p99_ms = p99,
                "Cycle latency",
            );
        }
        Ok(())
    }
}
