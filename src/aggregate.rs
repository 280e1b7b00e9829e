//! Season stat aggregation.
//!
//! Folds every completed game, in chronological order, into per-player totals.
//! Each game in a player's log is labeled with the team the ledger says the player
//! was on at kickoff, so a traded player's season spans both teams while every game
//! stays attributed correctly.

use crate::events::EventSnapshot;
use crate::ledger::TeamHistoryLedger;
use crate::scoring::FantasyScorer;
use crate::stats::{StatField, StatLine};
use crate::types::{GameId, PlayerId, Points, TeamId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// One line of a player's game log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameEntry {
    pub game_id: GameId,
    pub week: u32,
    pub timestamp: Timestamp,
    /// Team per the ledger at the game's timestamp.
    pub team_id: TeamId,
    /// Team the box score listed the player under. Differs from `team_id` only for
    /// inconsistent events.
    pub listed_team: TeamId,
    pub opponent: TeamId,
    pub stats: StatLine,
    pub fantasy_points: Points,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub player_id: PlayerId,
    pub games_played: u32,
    pub stats: StatLine,
    pub fantasy_points: Points,
    pub by_team: BTreeMap<TeamId, StatLine>,
    pub game_log: Vec<PlayerGameEntry>,
}

impl SeasonTotals {
    pub fn empty(player_id: PlayerId) -> Self {
        Self {
            player_id,
            games_played: 0,
            stats: StatLine::zero(),
            fantasy_points: Points::zero(),
            by_team: BTreeMap::new(),
            game_log: Vec::new(),
        }
    }

    fn record(&mut self, entry: PlayerGameEntry) {
        self.games_played += 1;
        self.stats += entry.stats;
        self.fantasy_points += entry.fantasy_points;
        *self.by_team.entry(entry.team_id).or_default() += entry.stats;
        self.game_log.push(entry);
    }

    pub fn fantasy_points_per_game(&self) -> Points {
        if self.games_played == 0 {
            return Points::zero();
        }
        Points::new(self.fantasy_points.value() / Decimal::from(self.games_played))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaderCategory {
    Stat(StatField),
    FantasyPoints,
}

impl fmt::Display for LeaderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderCategory::Stat(field) => write!(f, "{}", field),
            LeaderCategory::FantasyPoints => f.write_str("fantasy points"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub player_id: PlayerId,
    pub value: Decimal,
    pub games_played: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonAggregates {
    totals: BTreeMap<PlayerId, SeasonTotals>,
}

impl SeasonAggregates {
    pub fn compute(snapshot: &EventSnapshot, ledger: &TeamHistoryLedger, scorer: &FantasyScorer) -> Self {
        let mut totals: BTreeMap<PlayerId, SeasonTotals> = snapshot
            .players
            .iter()
            .map(|p| (p.id, SeasonTotals::empty(p.id)))
            .collect();

        for game in snapshot.completed_games() {
            for (player_id, listed_team, line) in game.stat_lines() {
                let Some(entry) = totals.get_mut(&player_id) else {
                    warn!(game = %game.id, player = %player_id, "stat line for player outside the roster skipped");
                    continue;
                };
                let team_id = ledger.team_of(player_id, game.timestamp).unwrap_or(listed_team);
                let opponent = if listed_team == game.home_team {
                    game.away_team
                } else {
                    game.home_team
                };
                entry.record(PlayerGameEntry {
                    game_id: game.id,
                    week: game.week,
                    timestamp: game.timestamp,
                    team_id,
                    listed_team,
                    opponent,
                    stats: *line,
                    fantasy_points: scorer.score(line),
                });
            }
        }

        Self { totals }
    }

    pub fn get(&self, player: PlayerId) -> Option<&SeasonTotals> {
        self.totals.get(&player)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeasonTotals> {
        self.totals.values()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Top `limit` players for a category. Players without a game are never listed.
    pub fn leaders(&self, category: LeaderCategory, limit: usize) -> Vec<Leader> {
        let mut rows: Vec<Leader> = self
            .totals
            .values()
            .filter(|t| t.games_played > 0)
            .map(|t| Leader {
                player_id: t.player_id,
                value: match category {
                    LeaderCategory::Stat(field) => Decimal::from(field.value(&t.stats)),
                    LeaderCategory::FantasyPoints => t.fantasy_points.value(),
                },
                games_played: t.games_played,
            })
            .collect();

        rows.sort_by(compare_leaders);
        rows.truncate(limit);
        rows
    }
}

fn compare_leaders(a: &Leader, b: &Leader) -> Ordering {
    b.value
        .cmp(&a.value)
        .then_with(|| a.player_id.cmp(&b.player_id))
}
