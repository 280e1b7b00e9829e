//! Team-facing views: records, standings, power rankings.

use super::results::EngineError;
use super::view::LeagueView;
use crate::rankings::{compute_rankings, PowerRanking};
use crate::standings::{Standings, TeamRecord};
use crate::types::TeamId;

impl<'a> LeagueView<'a> {
    pub fn team_record(&self, team_id: TeamId) -> Result<TeamRecord, EngineError> {
        if self.snapshot.team(team_id).is_none() {
            return Err(EngineError::TeamNotFound(team_id));
        }
        Ok(self
            .records
            .get(&team_id)
            .copied()
            .unwrap_or_else(|| TeamRecord::new(team_id)))
    }

    pub fn standings(&self) -> Standings {
        Standings::build(&self.snapshot.teams, &self.records)
    }

    pub fn rankings(&self) -> Vec<PowerRanking> {
        compute_rankings(&self.snapshot.teams, &self.records, &self.engine.config.ranking)
    }
}
