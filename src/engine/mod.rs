// 13.0: league engine. takes a snapshot of the event log and derives every view from it:
// player totals, leaders, standings, power rankings, playoff bracket, team history.
// pull model: nothing is patched incrementally, a view is always a full fold.

mod cache;
mod config;
mod core;
mod players;
mod playoffs;
mod results;
mod teams;
mod view;

pub use cache::{CacheStats, SnapshotFingerprint};
pub use config::EngineConfig;
pub use core::LeagueEngine;
pub use results::{BracketState, EngineError};
pub use view::LeagueView;
