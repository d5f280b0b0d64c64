use crate::types::{Score, Side};

/// Where one side stands on the current score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Leading,
    Level,
    Trailing,
}

/// Classify `side`'s position given the live score.
pub fn classify(score: Score, side: Side) -> Standing {
    let (own, other) = match side {
        Side::Home => (score.home, score.away),
        Side::Away => (score.away, score.home),
    };
    match own.cmp(&other) {
        std::cmp::Ordering::Greater => Standing::Leading,
        std::cmp::Ordering::Equal => Standing::Level,
        std::cmp::Ordering::Less => Standing::Trailing,
    }
}
