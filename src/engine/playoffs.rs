//! Playoff bracket view.
//!
//! The bracket is rebuilt from the stored seeding and every completed playoff game is
//! replayed in chronological order. Without a stored seeding the bracket is provisional
//! and seeded from the current overall standings. A game whose two teams no longer meet
//! (an earlier round was corrected after it was played) is set aside as stale.

use super::results::{BracketState, EngineError};
use super::view::LeagueView;
use crate::bracket::{BracketError, PlayoffBracket, PlayoffMatchup};
use crate::events::GameKind;
use crate::types::{MatchupId, TeamId};
use tracing::warn;

impl<'a> LeagueView<'a> {
    fn seeds(&self) -> (Vec<TeamId>, bool) {
        match &self.snapshot.playoff_seeding {
            Some(seeds) => (seeds.clone(), false),
            None => {
                let field = self.engine.config.playoffs.teams;
                let seeds = self
                    .standings()
                    .overall()
                    .iter()
                    .take(field)
                    .map(|row| row.team.id)
                    .collect();
                (seeds, true)
            }
        }
    }

    pub fn bracket_state(&self) -> Result<BracketState, EngineError> {
        let (seeds, provisional) = self.seeds();
        for team in &seeds {
            if self.snapshot.team(*team).is_none() {
                return Err(EngineError::TeamNotFound(*team));
            }
        }
        let mut bracket = PlayoffBracket::seeded(&seeds).map_err(EngineError::InvalidSeeding)?;

        let mut applied_games = Vec::new();
        let mut stale_games = Vec::new();
        for game in self.snapshot.completed_games() {
            if game.kind != GameKind::Playoff {
                continue;
            }
            match bracket.apply_game(game) {
                Ok(_) => applied_games.push(game.id),
                Err(BracketError::NoMatchupForTeams(home, away)) => {
                    warn!(game = %game.id, %home, %away, "playoff game no longer matches the bracket");
                    stale_games.push(game.id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(BracketState {
            bracket,
            provisional,
            applied_games,
            stale_games,
        })
    }

    pub fn matchup(&self, matchup_id: MatchupId) -> Result<PlayoffMatchup, EngineError> {
        let state = self.bracket_state()?;
        state
            .bracket
            .matchup(matchup_id)
            .cloned()
            .ok_or(EngineError::MatchupNotFound(matchup_id))
    }
}
