//! League roster records.
//!
//! Teams and players are created at season setup and live for the whole season.
//! Neither carries mutable season state: a team's record comes from the game log
//! and a player's current team comes from the trade ledger.

use crate::types::{PlayerId, Position, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub abbreviation: String,
    pub conference: String,
    pub division: String,
}

impl Team {
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        conference: impl Into<String>,
        division: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: abbreviation.into(),
            conference: conference.into(),
            division: division.into(),
        }
    }

    pub fn division_key(&self) -> DivisionKey {
        DivisionKey {
            conference: self.conference.clone(),
            division: self.division.clone(),
        }
    }
}

/// Divisions are only unique inside their conference ("AFC North" vs "NFC North").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DivisionKey {
    pub conference: String,
    pub division: String,
}

impl std::fmt::Display for DivisionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.conference, self.division)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub position: Position,
    pub elite: bool,
    // season-setup assignment. trades move the player, this never changes.
    pub original_team: TeamId,
}

impl Player {
    pub fn new(id: PlayerId, display_name: impl Into<String>, position: Position, original_team: TeamId) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            position,
            elite: false,
            original_team,
        }
    }

    pub fn elite(mut self) -> Self {
        self.elite = true;
        self
    }
}
