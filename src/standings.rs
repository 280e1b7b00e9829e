// 8.0: standings. win/loss/tie records folded from completed regular-season games only.
// 8.1: order inside any grouping: wins desc, point differential desc, team id asc.
// the final key is total, so the order never depends on the order games were logged.

use crate::events::{EventSnapshot, GameKind};
use crate::league::{DivisionKey, Team};
use crate::types::TeamId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_id: TeamId,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: u64,
    pub points_against: u64,
}

impl TeamRecord {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0,
            points_against: 0,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn point_differential(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    // ties count as half a win. zero games = zero pct.
    pub fn win_pct(&self) -> Decimal {
        let games = self.games_played();
        if games == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.wins) + Decimal::from(self.ties) * dec!(0.5)) / Decimal::from(games)
    }

    pub fn summary(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

/// Folds every completed regular-season game into per-team records. Every roster team
/// gets a row, even with no games played. Playoff results feed the bracket only.
pub fn compute_records(snapshot: &EventSnapshot) -> BTreeMap<TeamId, TeamRecord> {
    let mut records: BTreeMap<TeamId, TeamRecord> =
        snapshot.teams.iter().map(|t| (t.id, TeamRecord::new(t.id))).collect();

    let regular_season = snapshot
        .completed_games()
        .into_iter()
        .filter(|g| g.kind == GameKind::RegularSeason);
    for game in regular_season {
        let (home_pts, away_pts) = (game.home_score as u64, game.away_score as u64);

        let home = records.entry(game.home_team).or_insert_with(|| TeamRecord::new(game.home_team));
        home.points_for += home_pts;
        home.points_against += away_pts;
        match home_pts.cmp(&away_pts) {
            Ordering::Greater => home.wins += 1,
            Ordering::Less => home.losses += 1,
            Ordering::Equal => home.ties += 1,
        }

        let away = records.entry(game.away_team).or_insert_with(|| TeamRecord::new(game.away_team));
        away.points_for += away_pts;
        away.points_against += home_pts;
        match away_pts.cmp(&home_pts) {
            Ordering::Greater => away.wins += 1,
            Ordering::Less => away.losses += 1,
            Ordering::Equal => away.ties += 1,
        }
    }

    records
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: Team,
    pub record: TeamRecord,
}

pub fn compare_records(a: &TeamRecord, b: &TeamRecord) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.point_differential().cmp(&a.point_differential()))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

fn sort_rows(rows: &mut [StandingsRow]) {
    rows.sort_by(|a, b| compare_records(&a.record, &b.record));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub divisions: BTreeMap<DivisionKey, Vec<StandingsRow>>,
    pub conferences: BTreeMap<String, Vec<StandingsRow>>,
    pub league: Vec<StandingsRow>,
}

impl Standings {
    pub fn build(teams: &[Team], records: &BTreeMap<TeamId, TeamRecord>) -> Self {
        let mut standings = Standings::default();

        for team in teams {
            let record = records.get(&team.id).copied().unwrap_or_else(|| TeamRecord::new(team.id));
            let row = StandingsRow {
                team: team.clone(),
                record,
            };
            standings.divisions.entry(team.division_key()).or_default().push(row.clone());
            standings.conferences.entry(team.conference.clone()).or_default().push(row.clone());
            standings.league.push(row);
        }

        for rows in standings.divisions.values_mut() {
            sort_rows(rows);
        }
        for rows in standings.conferences.values_mut() {
            sort_rows(rows);
        }
        sort_rows(&mut standings.league);
        standings
    }

    pub fn division(&self, key: &DivisionKey) -> Option<&[StandingsRow]> {
        self.divisions.get(key).map(|v| v.as_slice())
    }

    pub fn conference(&self, name: &str) -> Option<&[StandingsRow]> {
        self.conferences.get(name).map(|v| v.as_slice())
    }

    pub fn overall(&self) -> &[StandingsRow] {
        &self.league
    }

    pub fn record_of(&self, team: TeamId) -> Option<&TeamRecord> {
        self.league.iter().find(|r| r.team.id == team).map(|r| &r.record)
    }
}
