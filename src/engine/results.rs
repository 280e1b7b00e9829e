// 13.0.2: result types and errors for engine operations.

use crate::bracket::{BracketError, PlayoffBracket};
use crate::config::ConfigError;
use crate::events::StoreError;
use crate::types::{GameId, MatchupId, PlayerId, TeamId};
use serde::{Deserialize, Serialize};

/// Playoff bracket as derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketState {
    pub bracket: PlayoffBracket,
    // seeded from live standings because the store has no fixed seeding yet
    pub provisional: bool,
    pub applied_games: Vec<GameId>,
    // playoff games whose teams no longer meet after an upstream correction
    pub stale_games: Vec<GameId>,
}

impl BracketState {
    pub fn champion(&self) -> Option<TeamId> {
        self.bracket.champion()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Team {0} not found")]
    TeamNotFound(TeamId),

    #[error("Matchup {0} not found")]
    MatchupNotFound(MatchupId),

    #[error("Game {0} not found")]
    GameNotFound(GameId),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(#[from] BracketError),

    #[error("Invalid playoff seeding: {0}")]
    InvalidSeeding(BracketError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Event store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::PlayerNotFound(_)
                | EngineError::TeamNotFound(_)
                | EngineError::MatchupNotFound(_)
                | EngineError::GameNotFound(_)
        )
    }
}
