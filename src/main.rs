mod config;
mod detector;
mod error;
mod feed;
mod latency;
mod notifier;
mod poller;
mod state;
mod tracker;
mod types;

#[cfg(test)]
mod testutil;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, POLL_INTERVAL_SECS, REFRESH_WINDOW_SECS};
use crate::error::Result;
use crate::feed::ApiFootballClient;
use crate::notifier::TelegramNotifier;
use crate::poller::Poller;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env is fine; the environment may already carry everything.
    let _ = dotenvy::dotenv();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let feed = ApiFootballClient::new(&cfg)?;
    let notifier = TelegramNotifier::new(&cfg.telegram_bot_token, cfg.telegram_chat_id);

    let mut leagues: Vec<u32> = cfg.allowed_leagues.iter().copied().collect();
    leagues.sort_unstable();
    info!(
        api = %cfg.api_url,
        leagues = ?leagues,
        odds_ceiling = cfg.odds_ceiling,
        refresh_secs = REFRESH_WINDOW_SECS,
        poll_secs = POLL_INTERVAL_SECS,
        "Favorite watch starting: {} leagues, ceiling {:.2}",
        leagues.len(),
        cfg.odds_ceiling,
    );

    Poller::new(cfg, feed, notifier).run().await;
    Ok(())
}
