// gridiron-core: league derivation engine.
// the event log (games, trades) is the only source of truth. every view is a
// deterministic fold over one immutable snapshot of it.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: TeamId, PlayerId, GameId, Points, Timestamp
//   2.x  stats.rs: stat line blocks and field-wise addition
//   3.x  scoring.rs: versioned scoring table, fantasy scorer
//   4.x  league.rs: teams, divisions, players
//   5.x  events.rs: games, trades, snapshot, event store
//   6.x  ledger.rs: team-history ledger, point-in-time team lookup
//   7.x  aggregate.rs: season totals and stat leaders
//   8.x  standings.rs: team records, division/conference/league tables
//   9.x  rankings.rs: composite power rankings
//   10.x bracket.rs: single elimination playoff state machine
//   11.x validation.rs: validation hook, inconsistent event warnings
//   12.x config.rs: league config, TOML loading, scoring presets
//   13.x engine/: engine, per-snapshot views, memo cache

// domain modules
pub mod aggregate;
pub mod events;
pub mod league;
pub mod ledger;
pub mod scoring;
pub mod stats;
pub mod types;

// derived views
pub mod bracket;
pub mod rankings;
pub mod standings;
pub mod validation;

// integration modules
pub mod config;
pub mod engine;

// re exports for convenience
pub use aggregate::*;
pub use bracket::*;
pub use config::*;
pub use engine::*;
pub use events::*;
pub use league::*;
pub use ledger::*;
pub use rankings::*;
pub use scoring::*;
pub use standings::*;
pub use stats::*;
pub use types::*;
pub use validation::*;
