use tracing::debug;

use crate::config::MATCH_WINNER_MARKET;
use crate::error::Result;
use crate::feed::OddsSource;
use crate::types::{FavoriteEntry, FavoriteMap, Fixture, OddsKind, OddsQuote, Outcome, Side};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefreshStats {
    pub considered: usize,
    pub tracked: usize,
    pub rejected_no_quotes: usize,
    pub rejected_above_ceiling: usize,
    pub fetch_errors: usize,
    pub priced_live: usize,
    pub priced_prematch: usize,
}

/// Favored side of one fixture and its best (lowest) match-winner price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub side: Side,
    pub odd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Neither home nor away has a match-winner quote.
    NoQuotes,
    /// The favorite is priced above the ceiling.
    AboveCeiling { side: Side, odd: f64 },
}

/// Choose the favorite from a fixture's quotes.
///
/// Each side is priced at its minimum across bookmakers. The strictly cheaper side
/// wins; equal prices go to the home side. A side with no quotes loses to one that
/// has any. Draw quotes and other markets are ignored.
pub fn pick_favorite(quotes: &[OddsQuote], ceiling: f64) -> std::result::Result<Pick, Rejection> {
    let mut home: Option<f64> = None;
    let mut away: Option<f64> = None;

    for q in quotes
        .iter()
        .filter(|q| is_match_winner(q) && q.price.is_finite() && q.price > 0.0)
    {
        let best = match q.outcome {
            Outcome::Home => &mut home,
            Outcome::Away => &mut away,
            Outcome::Draw => continue,
        };
        *best = Some(best.map_or(q.price, |p| p.min(q.price)));
    }

    let pick = match (home, away) {
        (Some(h), Some(a)) if a < h => Pick { side: Side::Away, odd: a },
        (Some(h), _) => Pick { side: Side::Home, odd: h },
        (None, Some(a)) => Pick { side: Side::Away, odd: a },
        (None, None) => return Err(Rejection::NoQuotes),
    };

    if pick.odd > ceiling {
        return Err(Rejection::AboveCeiling {
            side: pick.side,
            odd: pick.odd,
        });
    }
    Ok(pick)
}

/// Build a fresh favorite map for `fixtures`.
///
/// Odds are requested per fixture, live first and pre-match when the live feed has
/// no match-winner prices or fails. A fixture whose odds cannot be fetched or that
/// yields no eligible favorite is left out; nothing here fails the batch.
pub async fn refresh<O>(fixtures: &[Fixture], odds: &O, ceiling: f64) -> (FavoriteMap, RefreshStats)
where
    O: OddsSource + ?Sized,
{
    let mut favorites = FavoriteMap::new();
    let mut stats = RefreshStats::default();

    for fixture in fixtures {
        stats.considered += 1;

        let (quotes, source) = match fetch_quotes(odds, fixture.id).await {
            Ok(found) => found,
            Err(e) => {
                stats.fetch_errors += 1;
                debug!(fixture_id = fixture.id, "Odds fetch failed, fixture skipped: {e}");
                continue;
            }
        };

        match pick_favorite(&quotes, ceiling) {
            Ok(pick) => {
                let team = match pick.side {
                    Side::Home => &fixture.home,
                    Side::Away => &fixture.away,
                };
                match source {
                    OddsKind::Live => stats.priced_live += 1,
                    OddsKind::PreMatch => stats.priced_prematch += 1,
                }
                debug!(
                    fixture_id = fixture.id,
                    team = %team.name,
                    side = %pick.side,
                    odd = pick.odd,
                    source = %source,
                    "Tracking favorite",
                );
                favorites.insert(
                    fixture.id,
                    FavoriteEntry {
                        team_id: team.id,
                        team_name: team.name.clone(),
                        side: pick.side,
                        odd: pick.odd,
                        league_name: fixture.league.name.clone(),
                        source,
                    },
                );
            }
            Err(Rejection::NoQuotes) => stats.rejected_no_quotes += 1,
            Err(Rejection::AboveCeiling { .. }) => stats.rejected_above_ceiling += 1,
        }
    }

    stats.tracked = favorites.len();
    (favorites, stats)
}

async fn fetch_quotes<O>(odds: &O, fixture_id: u64) -> Result<(Vec<OddsQuote>, OddsKind)>
where
    O: OddsSource + ?Sized,
{
    match odds.odds(fixture_id, OddsKind::Live).await {
        Ok(quotes) if quotes.iter().any(prices_a_side) => return Ok((quotes, OddsKind::Live)),
        Ok(_) => {}
        Err(e) => debug!(fixture_id, "Live odds unavailable, trying pre-match: {e}"),
    }
    let quotes = odds.odds(fixture_id, OddsKind::PreMatch).await?;
    Ok((quotes, OddsKind::PreMatch))
}

fn is_match_winner(q: &OddsQuote) -> bool {
    q.market.eq_ignore_ascii_case(MATCH_WINNER_MARKET)
}

/// A live book with only the draw open cannot name a favorite.
fn prices_a_side(q: &OddsQuote) -> bool {
    is_match_winner(q) && q.outcome != Outcome::Draw
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::testutil::{fixture, quote, FakeFeed};

    const CEILING: f64 = 1.50;

    #[test]
    fn lone_home_quote_is_favorite() {
        let pick = pick_favorite(&[quote("Bet365", Outcome::Home, 1.30)], CEILING).unwrap();
        assert_eq!(pick.side, Side::Home);
        assert!((pick.odd - 1.30).abs() < 1e-9);
    }

    #[test]
    fn lone_away_quote_is_favorite() {
        let pick = pick_favorite(&[quote("Bet365", Outcome::Away, 1.45)], CEILING).unwrap();
        assert_eq!(pick.side, Side::Away);
    }

    #[test]
    fn strictly_lower_price_wins() {
        let quotes = [
            quote("Bet365", Outcome::Home, 1.40),
            quote("Bet365", Outcome::Away, 1.35),
        ];
        let pick = pick_favorite(&quotes, CEILING).unwrap();
        assert_eq!(pick.side, Side::Away);
        assert!((pick.odd - 1.35).abs() < 1e-9);
    }

    #[test]
    fn equal_prices_go_home() {
        let quotes = [
            quote("Bet365", Outcome::Home, 1.45),
            quote("Bet365", Outcome::Away, 1.45),
        ];
        assert_eq!(pick_favorite(&quotes, CEILING).unwrap().side, Side::Home);
    }

    #[test]
    fn minimum_across_bookmakers() {
        let quotes = [
            quote("Bet365", Outcome::Home, 1.28),
            quote("Bwin", Outcome::Home, 1.22),
            quote("Unibet", Outcome::Home, 1.25),
            quote("Bet365", Outcome::Away, 9.00),
        ];
        let pick = pick_favorite(&quotes, CEILING).unwrap();
        assert_eq!(pick.side, Side::Home);
        assert!((pick.odd - 1.22).abs() < 1e-9);
    }

    #[test]
    fn above_ceiling_is_rejected() {
        let quotes = [
            quote("Bet365", Outcome::Home, 1.80),
            quote("Bet365", Outcome::Away, 4.20),
        ];
        assert_eq!(
            pick_favorite(&quotes, CEILING),
            Err(Rejection::AboveCeiling { side: Side::Home, odd: 1.80 })
        );
    }

    #[test]
    fn price_at_ceiling_is_kept() {
        let pick = pick_favorite(&[quote("Bet365", Outcome::Home, 1.50)], CEILING).unwrap();
        assert!((pick.odd - 1.50).abs() < 1e-9);
    }

    #[test]
    fn draw_and_other_markets_ignored() {
        let mut over = quote("Bet365", Outcome::Home, 1.01);
        over.market = "Goals Over/Under".to_string();
        let quotes = [quote("Bet365", Outcome::Draw, 1.10), over];
        assert_eq!(pick_favorite(&quotes, CEILING), Err(Rejection::NoQuotes));
    }

    #[test]
    fn no_quotes_rejected() {
        assert_eq!(pick_favorite(&[], CEILING), Err(Rejection::NoQuotes));
    }

    #[tokio::test]
    async fn refresh_prefers_live_odds() {
        let feed = FakeFeed::default();
        feed.set_live_odds(1, vec![quote("live", Outcome::Away, 1.33)]);
        feed.set_prematch(1, vec![quote("Bet365", Outcome::Home, 1.20)]);
        let fixtures = [fixture(1, (10, "Home FC"), (20, "Away FC"))];

        let (favorites, stats) = refresh(&fixtures, &feed, CEILING).await;

        let entry = &favorites[&1];
        assert_eq!(entry.team_id, 20);
        assert_eq!(entry.team_name, "Away FC");
        assert_eq!(entry.side, Side::Away);
        assert_eq!(entry.source, OddsKind::Live);
        assert_eq!(entry.league_name, "Premier League");
        assert_eq!(stats.priced_live, 1);
        assert_eq!(stats.priced_prematch, 0);
    }

    #[tokio::test]
    async fn refresh_falls_back_to_prematch() {
        let feed = FakeFeed {
            failing_live_odds: HashSet::from([2]),
            ..Default::default()
        };
        feed.set_prematch(1, vec![quote("Bet365", Outcome::Home, 1.20)]);
        feed.set_prematch(2, vec![quote("Bet365", Outcome::Away, 1.40)]);
        let fixtures = [
            fixture(1, (10, "A"), (20, "B")),
            fixture(2, (30, "C"), (40, "D")),
        ];

        let (favorites, stats) = refresh(&fixtures, &feed, CEILING).await;

        assert_eq!(favorites.len(), 2);
        assert!(favorites.values().all(|e| e.source == OddsKind::PreMatch));
        assert_eq!(favorites[&2].team_name, "D");
        assert_eq!(stats.priced_prematch, 2);
        assert_eq!(stats.fetch_errors, 0);
    }

    #[tokio::test]
    async fn live_book_with_only_draw_falls_back_to_prematch() {
        let feed = FakeFeed::default();
        feed.set_live_odds(3, vec![quote("live", Outcome::Draw, 3.10)]);
        feed.set_prematch(3, vec![quote("Bet365", Outcome::Home, 1.35)]);
        let fixtures = [fixture(3, (10, "A"), (20, "B"))];

        let (favorites, stats) = refresh(&fixtures, &feed, CEILING).await;

        assert_eq!(favorites[&3].source, OddsKind::PreMatch);
        assert_eq!(favorites[&3].odd, 1.35);
        assert_eq!(stats.priced_prematch, 1);
        assert_eq!(stats.rejected_no_quotes, 0);
    }

    #[tokio::test]
    async fn failed_fixture_does_not_sink_batch() {
        let feed = FakeFeed {
            failing_live_odds: HashSet::from([1]),
            failing_prematch_odds: HashSet::from([1]),
            ..Default::default()
        };
        feed.set_prematch(2, vec![quote("Bet365", Outcome::Home, 1.10)]);
        feed.set_prematch(3, vec![quote("Bet365", Outcome::Home, 2.10)]);
        let fixtures = [
            fixture(1, (10, "A"), (20, "B")),
            fixture(2, (30, "C"), (40, "D")),
            fixture(3, (50, "E"), (60, "F")),
            fixture(4, (70, "G"), (80, "H")),
        ];

        let (favorites, stats) = refresh(&fixtures, &feed, CEILING).await;

        assert_eq!(favorites.len(), 1);
        assert!(favorites.contains_key(&2));
        assert_eq!(
            stats,
            RefreshStats {
                considered: 4,
                tracked: 1,
                rejected_no_quotes: 1,
                rejected_above_ceiling: 1,
                fetch_errors: 1,
                priced_live: 0,
                priced_prematch: 1,
            }
        );
    }
}
