use tracing::debug;

use crate::detector::classifier::{classify, Standing};
use crate::state::SentSet;
use crate::types::{AlertMessage, FavoriteEntry, FavoriteMap, Fixture, Side};

/// Decide whether `fixture` warrants an alert.
///
/// Returns an alert only for a tracked fixture whose favorite is behind on the
/// score and that has never alerted before; the fixture is then recorded in
/// `sent`, so later calls for it return `None` whatever the score does.
pub fn evaluate(fixture: &Fixture, favorites: &FavoriteMap, sent: &mut SentSet) -> Option<AlertMessage> {
    let entry = favorites.get(&fixture.id)?;
    if sent.contains(fixture.id) {
        return None;
    }

    let side = favored_side(fixture, entry);
    if classify(fixture.score, side) != Standing::Trailing {
        return None;
    }

    sent.mark(fixture.id);
    Some(AlertMessage {
        fixture_id: fixture.id,
        league: entry.league_name.clone(),
        favorite: entry.team_name.clone(),
        odd: entry.odd,
        home_name: fixture.home.name.clone(),
        away_name: fixture.away.name.clone(),
        score: fixture.score,
        elapsed: fixture.elapsed,
    })
}

/// Side the favorite plays on in the live fixture, matched by team id. Falls
/// back to the side recorded at refresh time if the ids match neither team.
fn favored_side(fixture: &Fixture, entry: &FavoriteEntry) -> Side {
    if entry.team_id == fixture.home.id {
        Side::Home
    } else if entry.team_id == fixture.away.id {
        Side::Away
    } else {
        debug!(
            fixture_id = fixture.id,
            team_id = entry.team_id,
            "Favorite id not in live fixture, using recorded side {}",
            entry.side,
        );
        entry.side
    }
}
