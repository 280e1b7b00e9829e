// 13.0 engine/core.rs: the league engine. holds validated config, the scorer, and the memo cache.
// it owns no league data: every view borrows an immutable snapshot for the length of one request.

use super::cache::{CacheStats, DerivationCache, SnapshotFingerprint, TeamRecords};
use super::results::EngineError;
use super::view::LeagueView;
use crate::aggregate::SeasonAggregates;
use crate::config::LeagueConfig;
use crate::events::{EventSnapshot, EventStore, Game, TradeRecord};
use crate::ledger::TeamHistoryLedger;
use crate::scoring::FantasyScorer;
use crate::standings::compute_records;
use crate::validation::{validate_game, validate_trade, ValidationOutcome};
use std::sync::Arc;
use tracing::debug;

/** 13.1: main engine struct. Send + Sync, share it between request handlers. */
#[derive(Debug)]
pub struct LeagueEngine {
    pub(super) config: LeagueConfig,
    pub(super) scorer: FantasyScorer,
    cache: DerivationCache,
}

impl LeagueEngine {
    /// Fails fast on any invalid setting. There is no fallback table.
    pub fn new(config: LeagueConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let scorer = FantasyScorer::new(config.scoring.clone())?;
        debug!(
            scoring = %config.scoring.name,
            version = config.scoring.version,
            memoize = config.engine.memoize,
            "league engine ready"
        );
        Ok(Self {
            config,
            scorer,
            cache: DerivationCache::new(),
        })
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn scorer(&self) -> &FantasyScorer {
        &self.scorer
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Reads one consistent snapshot from the store.
    pub fn snapshot(&self, store: &dyn EventStore) -> Result<EventSnapshot, EngineError> {
        Ok(store.snapshot()?)
    }

    /// Builds every derived view over `snapshot`.
    pub fn view<'a>(&'a self, snapshot: &'a EventSnapshot) -> LeagueView<'a> {
        let ledger = TeamHistoryLedger::build(snapshot);
        let (aggregates, records) = self.folds(snapshot, &ledger);
        LeagueView::new(self, snapshot, ledger, aggregates, records)
    }

    fn folds(&self, snapshot: &EventSnapshot, ledger: &TeamHistoryLedger) -> (Arc<SeasonAggregates>, Arc<TeamRecords>) {
        let compute = || {
            (
                SeasonAggregates::compute(snapshot, ledger, &self.scorer),
                compute_records(snapshot),
            )
        };

        if self.config.engine.memoize {
            if let Some(key) = SnapshotFingerprint::of(snapshot) {
                return self.cache.get_or_compute(key, compute);
            }
        }
        let (aggregates, records) = compute();
        (Arc::new(aggregates), Arc::new(records))
    }

    /// Validation hook for a proposed game, checked against the snapshot's current ledger.
    pub fn validate_game(&self, snapshot: &EventSnapshot, game: &Game) -> ValidationOutcome {
        validate_game(snapshot, &TeamHistoryLedger::build(snapshot), game)
    }

    /// Validation hook for a proposed trade.
    pub fn validate_trade(&self, snapshot: &EventSnapshot, trade: &TradeRecord) -> ValidationOutcome {
        validate_trade(snapshot, &TeamHistoryLedger::build(snapshot), trade)
    }
}
