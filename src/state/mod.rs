pub mod watch_state;

pub use watch_state::{SentSet, WatchState};
