//! Player-facing views: team history, season totals, leaders.

use super::results::EngineError;
use super::view::LeagueView;
use crate::aggregate::{Leader, LeaderCategory, SeasonTotals};
use crate::ledger::TeamInterval;
use crate::league::Player;
use crate::types::{GameId, PlayerId, Points, TeamId, Timestamp};

impl<'a> LeagueView<'a> {
    pub fn player(&self, player_id: PlayerId) -> Result<&Player, EngineError> {
        self.snapshot
            .player(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))
    }

    /// Team the player belonged to at `at`.
    pub fn team_of(&self, player_id: PlayerId, at: Timestamp) -> Result<TeamId, EngineError> {
        self.ledger
            .team_of(player_id, at)
            .ok_or(EngineError::PlayerNotFound(player_id))
    }

    /// Team after the last trade in the snapshot.
    pub fn current_team(&self, player_id: PlayerId) -> Result<TeamId, EngineError> {
        self.ledger
            .current_team(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))
    }

    pub fn history_of(&self, player_id: PlayerId) -> Result<Vec<TeamInterval>, EngineError> {
        self.ledger
            .history_of(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))
    }

    /// Season-to-date totals. A rostered player without games gets the zero line.
    pub fn season_totals(&self, player_id: PlayerId) -> Result<&SeasonTotals, EngineError> {
        self.aggregates
            .get(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))
    }

    pub fn leaders(&self, category: LeaderCategory, limit: usize) -> Vec<Leader> {
        self.aggregates.leaders(category, limit)
    }

    pub fn top_leaders(&self, category: LeaderCategory) -> Vec<Leader> {
        self.leaders(category, self.engine.config.engine.default_leader_limit)
    }

    /// Fantasy points a player scored in one game, zero if they have no line in it.
    pub fn fantasy_points_for_game(&self, player_id: PlayerId, game_id: GameId) -> Result<Points, EngineError> {
        self.player(player_id)?;
        let game = self
            .snapshot
            .game(game_id)
            .ok_or(EngineError::GameNotFound(game_id))?;
        let line = game
            .home_stats
            .get(&player_id)
            .or_else(|| game.away_stats.get(&player_id));
        Ok(line.map(|l| self.engine.scorer.score(l)).unwrap_or_default())
    }

    /// Players on the team as of the latest trade, ordered by id.
    pub fn roster(&self, team_id: TeamId) -> Result<Vec<&Player>, EngineError> {
        if self.snapshot.team(team_id).is_none() {
            return Err(EngineError::TeamNotFound(team_id));
        }
        let mut players: Vec<&Player> = self
            .snapshot
            .players
            .iter()
            .filter(|p| self.ledger.current_team(p.id) == Some(team_id))
            .collect();
        players.sort_by_key(|p| p.id);
        Ok(players)
    }

    /// Players on the team at a given instant.
    pub fn roster_at(&self, team_id: TeamId, at: Timestamp) -> Result<Vec<PlayerId>, EngineError> {
        if self.snapshot.team(team_id).is_none() {
            return Err(EngineError::TeamNotFound(team_id));
        }
        Ok(self.ledger.roster_at(team_id, at))
    }
}
