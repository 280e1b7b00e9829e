// 5.0: the event log. games and trades are the only facts; everything else is derived.
// 5.1: Game: one contest with final score and per-side stat lines.
// 5.2: TradeRecord: a player moving between teams at an effective time.
// 5.3: EventSnapshot: immutable, fully materialized view handed to one derivation call.
// 5.4: EventStore: the read interface the engine needs from storage. InMemoryEventStore
// is the reference adapter used by the simulator and tests.

use crate::league::{Player, Team};
use crate::stats::StatLine;
use crate::types::{GameId, PlayerId, TeamId, Timestamp, TradeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    // final score only, no box score
    Simple,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    RegularSeason,
    Playoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

/** 5.1: a single game. stat lines are keyed by player, one map per side. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub week: u32,
    pub kind: GameKind,
    pub mode: GameMode,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub completed: bool,
    pub timestamp: Timestamp,
    pub home_stats: BTreeMap<PlayerId, StatLine>,
    pub away_stats: BTreeMap<PlayerId, StatLine>,
}

impl Game {
    pub fn scheduled(id: GameId, week: u32, home_team: TeamId, away_team: TeamId, timestamp: Timestamp) -> Self {
        Self {
            id,
            week,
            kind: GameKind::RegularSeason,
            mode: GameMode::Simple,
            home_team,
            away_team,
            home_score: 0,
            away_score: 0,
            completed: false,
            timestamp,
            home_stats: BTreeMap::new(),
            away_stats: BTreeMap::new(),
        }
    }

    pub fn final_score(mut self, home_score: u32, away_score: u32) -> Self {
        self.home_score = home_score;
        self.away_score = away_score;
        self.completed = true;
        self
    }

    pub fn playoff(mut self) -> Self {
        self.kind = GameKind::Playoff;
        self
    }

    /// Attaches a stat line and switches the game to box-score mode.
    pub fn with_stats(mut self, side: Side, player: PlayerId, line: StatLine) -> Self {
        self.mode = GameMode::Detailed;
        match side {
            Side::Home => self.home_stats.insert(player, line),
            Side::Away => self.away_stats.insert(player, line),
        };
        self
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn team_on(&self, side: Side) -> TeamId {
        match side {
            Side::Home => self.home_team,
            Side::Away => self.away_team,
        }
    }

    /// Points scored and allowed from `team`'s point of view.
    pub fn score_for(&self, team: TeamId) -> Option<(u32, u32)> {
        if team == self.home_team {
            Some((self.home_score, self.away_score))
        } else if team == self.away_team {
            Some((self.away_score, self.home_score))
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<TeamId> {
        if !self.completed || self.home_score == self.away_score {
            return None;
        }
        if self.home_score > self.away_score {
            Some(self.home_team)
        } else {
            Some(self.away_team)
        }
    }

    pub fn is_tie(&self) -> bool {
        self.completed && self.home_score == self.away_score
    }

    /// Every stat line with the team it was listed under.
    pub fn stat_lines(&self) -> impl Iterator<Item = (PlayerId, TeamId, &StatLine)> + '_ {
        let home = self.home_stats.iter().map(move |(p, s)| (*p, self.home_team, s));
        let away = self.away_stats.iter().map(move |(p, s)| (*p, self.away_team, s));
        home.chain(away)
    }

    // total order used everywhere the log is folded
    pub fn chronological_key(&self) -> (Timestamp, u32, GameId) {
        (self.timestamp, self.week, self.id)
    }
}

/** 5.2: a trade. applies at `effective_at` and stays in force until the next one. */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: TradeId,
    pub player_id: PlayerId,
    pub from_team: TeamId,
    pub to_team: TeamId,
    pub effective_at: Timestamp,
}

impl TradeRecord {
    pub fn new(id: TradeId, player_id: PlayerId, from_team: TeamId, to_team: TeamId, effective_at: Timestamp) -> Self {
        Self {
            id,
            player_id,
            from_team,
            to_team,
            effective_at,
        }
    }
}

/** 5.3: everything one derivation call may look at. trade order is insertion order. */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub games: Vec<Game>,
    pub trades: Vec<TradeRecord>,
    #[serde(default)]
    pub playoff_seeding: Option<Vec<TeamId>>,
}

impl EventSnapshot {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Completed games sorted by (timestamp, week, id). Incomplete games never enter a fold.
    pub fn completed_games(&self) -> Vec<&Game> {
        let mut games: Vec<&Game> = self.games.iter().filter(|g| g.completed).collect();
        games.sort_by_key(|g| g.chronological_key());
        games
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Event store unavailable: {0}")]
    Unavailable(String),

    #[error("Event store returned corrupt data: {0}")]
    Corrupt(String),
}

/// 5.4: read side of the event store. Reads are full snapshots, no pagination.
pub trait EventStore {
    fn list_teams(&self) -> Result<Vec<Team>, StoreError>;
    fn list_players(&self) -> Result<Vec<Player>, StoreError>;
    fn list_games(&self) -> Result<Vec<Game>, StoreError>;
    fn list_trades(&self) -> Result<Vec<TradeRecord>, StoreError>;

    fn playoff_seeding(&self) -> Result<Option<Vec<TeamId>>, StoreError> {
        Ok(None)
    }

    fn snapshot(&self) -> Result<EventSnapshot, StoreError> {
        Ok(EventSnapshot {
            teams: self.list_teams()?,
            players: self.list_players()?,
            games: self.list_games()?,
            trades: self.list_trades()?,
            playoff_seeding: self.playoff_seeding()?,
        })
    }
}

// 5.5: in-memory adapter. appending a game with an existing id is a correction and replaces it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    teams: Vec<Team>,
    players: Vec<Player>,
    games: Vec<Game>,
    trades: Vec<TradeRecord>,
    playoff_seeding: Option<Vec<TeamId>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_team(&mut self, team: Team) {
        self.teams.push(team);
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    pub fn append_game(&mut self, game: Game) {
        match self.games.iter_mut().find(|g| g.id == game.id) {
            Some(existing) => *existing = game,
            None => self.games.push(game),
        }
    }

    pub fn append_trade(&mut self, trade: TradeRecord) {
        self.trades.push(trade);
    }

    pub fn set_playoff_seeding(&mut self, seeds: Vec<TeamId>) {
        self.playoff_seeding = Some(seeds);
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}

impl EventStore for InMemoryEventStore {
    fn list_teams(&self) -> Result<Vec<Team>, StoreError> {
        Ok(self.teams.clone())
    }

    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.players.clone())
    }

    fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        Ok(self.games.clone())
    }

    fn list_trades(&self) -> Result<Vec<TradeRecord>, StoreError> {
        Ok(self.trades.clone())
    }

    fn playoff_seeding(&self) -> Result<Option<Vec<TeamId>>, StoreError> {
        Ok(self.playoff_seeding.clone())
    }
}
