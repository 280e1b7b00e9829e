//! Read-only derived views over one snapshot.
//!
//! A `LeagueView` is built per request. It holds the ledger for the snapshot and the
//! two folds (player aggregates, team records); standings, rankings and the bracket are
//! derived from those on demand. Nothing here mutates, so any number of views can be
//! used concurrently.

use super::cache::TeamRecords;
use super::core::LeagueEngine;
use crate::aggregate::SeasonAggregates;
use crate::events::{EventSnapshot, Game, TradeRecord};
use crate::ledger::TeamHistoryLedger;
use crate::validation::{snapshot_warnings, validate_game, validate_trade, InconsistentEvent, ValidationOutcome};
use std::sync::Arc;
use tracing::warn;

pub struct LeagueView<'a> {
    pub(super) engine: &'a LeagueEngine,
    pub(super) snapshot: &'a EventSnapshot,
    pub(super) ledger: TeamHistoryLedger,
    pub(super) aggregates: Arc<SeasonAggregates>,
    pub(super) records: Arc<TeamRecords>,
}

impl<'a> LeagueView<'a> {
    pub(super) fn new(
        engine: &'a LeagueEngine,
        snapshot: &'a EventSnapshot,
        ledger: TeamHistoryLedger,
        aggregates: Arc<SeasonAggregates>,
        records: Arc<TeamRecords>,
    ) -> Self {
        Self {
            engine,
            snapshot,
            ledger,
            aggregates,
            records,
        }
    }

    pub fn snapshot(&self) -> &EventSnapshot {
        self.snapshot
    }

    pub fn ledger(&self) -> &TeamHistoryLedger {
        &self.ledger
    }

    pub fn aggregates(&self) -> &SeasonAggregates {
        &self.aggregates
    }

    /// Every ledger dispute in the snapshot. Each one is logged; none blocks a view.
    pub fn warnings(&self) -> Vec<InconsistentEvent> {
        let warnings = snapshot_warnings(self.snapshot, &self.ledger);
        for w in &warnings {
            warn!(%w, "inconsistent event in log");
        }
        warnings
    }

    pub fn validate_game(&self, game: &Game) -> ValidationOutcome {
        validate_game(self.snapshot, &self.ledger, game)
    }

    pub fn validate_trade(&self, trade: &TradeRecord) -> ValidationOutcome {
        validate_trade(self.snapshot, &self.ledger, trade)
    }
}
