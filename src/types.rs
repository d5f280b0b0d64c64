use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub id: u64,
    pub home: Team,
    pub away: Team,
    pub league: League,
    pub score: Score,
    /// Minutes played, when the feed reports it.
    pub elapsed: Option<u32>,
    pub status: MatchStatus,
}

/// Match state decoded from API-Football's short status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    /// TBD / NS
    NotStarted,
    /// 1H, HT, 2H, ET, BT, P, SUSP, INT, LIVE
    InPlay(String),
    /// FT / AET / PEN
    Finished,
    /// PST / CANC / ABD / AWD / WO
    Off(String),
    Unknown(String),
}

impl MatchStatus {
    pub fn from_short(code: &str) -> Self {
        match code {
            "TBD" | "NS" => MatchStatus::NotStarted,
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "SUSP" | "INT" | "LIVE" => {
                MatchStatus::InPlay(code.to_string())
            }
            "FT" | "AET" | "PEN" => MatchStatus::Finished,
            "PST" | "CANC" | "ABD" | "AWD" | "WO" => MatchStatus::Off(code.to_string()),
            other => MatchStatus::Unknown(other.to_string()),
        }
    }

    /// True once the fixture can no longer produce a result change.
    pub fn is_over(&self) -> bool {
        matches!(self, MatchStatus::Finished | MatchStatus::Off(_))
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::NotStarted => write!(f, "NS"),
            MatchStatus::InPlay(code) | MatchStatus::Off(code) | MatchStatus::Unknown(code) => {
                write!(f, "{code}")
            }
            MatchStatus::Finished => write!(f, "FT"),
        }
    }
}

// ---------------------------------------------------------------------------
// Odds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// API-Football labels outcomes "Home" / "Draw" / "Away".
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("home") || label == "1" {
            Some(Outcome::Home)
        } else if label.eq_ignore_ascii_case("draw") || label.eq_ignore_ascii_case("x") {
            Some(Outcome::Draw)
        } else if label.eq_ignore_ascii_case("away") || label == "2" {
            Some(Outcome::Away)
        } else {
            None
        }
    }
}

/// Which odds endpoint a set of quotes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OddsKind {
    Live,
    PreMatch,
}

impl std::fmt::Display for OddsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OddsKind::Live => write!(f, "live"),
            OddsKind::PreMatch => write!(f, "pre-match"),
        }
    }
}

/// One bookmaker price for one outcome. `price` is always finite and > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsQuote {
    pub bookmaker: String,
    pub market: String,
    pub outcome: Outcome,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteEntry {
    pub team_id: u32,
    pub team_name: String,
    /// Side the favorite played on when the map was built.
    pub side: Side,
    /// Lowest match-winner price quoted for the favorite.
    pub odd: f64,
    pub league_name: String,
    pub source: OddsKind,
}

/// fixture id → favorite. Rebuilt wholesale every refresh window.
pub type FavoriteMap = HashMap<u64, FavoriteEntry>;

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub fixture_id: u64,
    pub league: String,
    pub favorite: String,
    pub odd: f64,
    pub home_name: String,
    pub away_name: String,
    pub score: Score,
    pub elapsed: Option<u32>,
}

impl AlertMessage {
    /// Plain-text body sent to the chat.
    pub fn render(&self) -> String {
        let mut text = format!(
            "📉 Favorite is losing!\n\n🏆 {}\n⭐ {} @ {:.2}\n⚽ {} {} - {} {}",
            self.league,
            self.favorite,
            self.odd,
            self.home_name,
            self.score.home,
            self.score.away,
            self.away_name,
        );
        if let Some(minute) = self.elapsed {
            text.push_str(&format!("\n⏱ {minute}'"));
        }
        text
    }
}
