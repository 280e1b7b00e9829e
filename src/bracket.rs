// 10.0: playoff bracket. single elimination, seeded once at creation and never re-seeded.
// matchups are Scheduled until a result is recorded, then Completed. a winner moves into
// exactly one slot of one next-round matchup; the final has no next and crowns the champion.
// 10.1: a result can only be recorded once both seed slots are filled, i.e. both feeders
// are Completed. rejected calls leave the bracket untouched.
// 10.2: corrections. re-recording a Completed matchup with a different winner rewrites the
// next slot and resets every downstream matchup that already consumed the old winner.

use crate::events::{Game, GameKind};
use crate::types::{GameId, MatchupId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchupState {
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffMatchup {
    pub id: MatchupId,
    pub round: u32,
    pub seed1: Option<TeamId>,
    pub seed2: Option<TeamId>,
    pub seed1_score: Option<u32>,
    pub seed2_score: Option<u32>,
    pub winner: Option<TeamId>,
    pub state: MatchupState,
    pub feeders: Option<(MatchupId, MatchupId)>,
    pub next: Option<(MatchupId, Slot)>,
    pub game_id: Option<GameId>,
}

impl PlayoffMatchup {
    fn new(id: MatchupId, round: u32) -> Self {
        Self {
            id,
            round,
            seed1: None,
            seed2: None,
            seed1_score: None,
            seed2_score: None,
            winner: None,
            state: MatchupState::Scheduled,
            feeders: None,
            next: None,
            game_id: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == MatchupState::Completed
    }

    pub fn is_ready(&self) -> bool {
        self.seed1.is_some() && self.seed2.is_some()
    }

    pub fn has_team(&self, team: TeamId) -> bool {
        self.seed1 == Some(team) || self.seed2 == Some(team)
    }

    fn set_slot(&mut self, slot: Slot, team: Option<TeamId>) {
        match slot {
            Slot::First => self.seed1 = team,
            Slot::Second => self.seed2 = team,
        }
    }

    fn reset(&mut self) {
        self.state = MatchupState::Scheduled;
        self.seed1_score = None;
        self.seed2_score = None;
        self.winner = None;
        self.game_id = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BracketError {
    #[error("Bracket needs a power-of-two number of seeds (>= 2), got {0}")]
    InvalidSeedCount(usize),

    #[error("Team {0} is seeded twice")]
    DuplicateSeed(TeamId),

    #[error("Matchup {0} does not exist")]
    UnknownMatchup(MatchupId),

    #[error("Matchup {0} is waiting on its feeder matchups")]
    FeedersIncomplete(MatchupId),

    #[error("Playoff matchup {0} cannot end in a tie")]
    TiedResult(MatchupId),

    #[error("No playoff matchup pairs {0} and {1}")]
    NoMatchupForTeams(TeamId, TeamId),

    #[error("Game {0} is not a completed playoff game")]
    NotAPlayoffResult(GameId),
}

/// Outcome of recording a result. `reset` lists downstream matchups sent back to Scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub matchup_id: MatchupId,
    pub winner: TeamId,
    pub corrected: bool,
    pub reset: Vec<MatchupId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    seeds: Vec<TeamId>,
    rounds: u32,
    matchups: BTreeMap<MatchupId, PlayoffMatchup>,
}

// 1 v N, 2 v N-1, ... laid out so seeds 1 and 2 can only meet in the final
fn bracket_order(n: usize) -> Vec<usize> {
    let mut order = vec![1usize];
    while order.len() < n {
        let size = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, size + 1 - s]).collect();
    }
    order
}

impl PlayoffBracket {
    /// Builds the bracket from `seeds`, best seed first.
    pub fn seeded(seeds: &[TeamId]) -> Result<Self, BracketError> {
        let n = seeds.len();
        if n < 2 || !n.is_power_of_two() {
            return Err(BracketError::InvalidSeedCount(n));
        }
        let mut seen = BTreeSet::new();
        for team in seeds {
            if !seen.insert(*team) {
                return Err(BracketError::DuplicateSeed(*team));
            }
        }

        let rounds = n.trailing_zeros();
        let mut matchups = BTreeMap::new();
        let mut next_id = 1u32;
        let mut previous: Vec<MatchupId> = Vec::new();

        for round in 1..=rounds {
            let count = n >> round;
            let mut current = Vec::with_capacity(count);
            for j in 0..count {
                let id = MatchupId(next_id);
                next_id += 1;
                let mut m = PlayoffMatchup::new(id, round);
                if round > 1 {
                    m.feeders = Some((previous[2 * j], previous[2 * j + 1]));
                }
                matchups.insert(id, m);
                current.push(id);
            }
            for (j, feeder) in previous.iter().enumerate() {
                let slot = if j % 2 == 0 { Slot::First } else { Slot::Second };
                if let Some(m) = matchups.get_mut(feeder) {
                    m.next = Some((current[j / 2], slot));
                }
            }
            previous = current;
        }

        let order = bracket_order(n);
        let first_round: Vec<MatchupId> = matchups.values().filter(|m| m.round == 1).map(|m| m.id).collect();
        for (j, id) in first_round.iter().enumerate() {
            if let Some(m) = matchups.get_mut(id) {
                m.seed1 = Some(seeds[order[2 * j] - 1]);
                m.seed2 = Some(seeds[order[2 * j + 1] - 1]);
            }
        }

        Ok(Self {
            seeds: seeds.to_vec(),
            rounds,
            matchups,
        })
    }

    pub fn seeds(&self) -> &[TeamId] {
        &self.seeds
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn matchup(&self, id: MatchupId) -> Option<&PlayoffMatchup> {
        self.matchups.get(&id)
    }

    pub fn matchups(&self) -> impl Iterator<Item = &PlayoffMatchup> {
        self.matchups.values()
    }

    pub fn round(&self, round: u32) -> Vec<&PlayoffMatchup> {
        self.matchups.values().filter(|m| m.round == round).collect()
    }

    // ids are assigned round by round, so the terminal matchup has the largest id
    pub fn final_matchup(&self) -> Option<&PlayoffMatchup> {
        self.matchups.values().next_back()
    }

    pub fn champion(&self) -> Option<TeamId> {
        self.final_matchup().and_then(|m| m.winner)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// Records (or corrects) a result. Scores are in seed1/seed2 order.
    pub fn record_result(&mut self, id: MatchupId, seed1_score: u32, seed2_score: u32) -> Result<RecordOutcome, BracketError> {
        let m = self.matchups.get(&id).ok_or(BracketError::UnknownMatchup(id))?;
        let (Some(seed1), Some(seed2)) = (m.seed1, m.seed2) else {
            return Err(BracketError::FeedersIncomplete(id));
        };
        if seed1_score == seed2_score {
            return Err(BracketError::TiedResult(id));
        }

        let winner = if seed1_score > seed2_score { seed1 } else { seed2 };
        let previous_winner = m.winner;
        let next = m.next;

        let m = self.matchups.get_mut(&id).ok_or(BracketError::UnknownMatchup(id))?;
        m.seed1_score = Some(seed1_score);
        m.seed2_score = Some(seed2_score);
        m.winner = Some(winner);
        m.state = MatchupState::Completed;

        let mut reset = Vec::new();
        if previous_winner != Some(winner) {
            if let Some((next_id, slot)) = next {
                self.advance(next_id, slot, Some(winner), &mut reset);
            }
        }

        let corrected = previous_winner.is_some();
        if corrected && !reset.is_empty() {
            info!(matchup = %id, winner = %winner, reset = reset.len(), "playoff correction reset downstream matchups");
        }

        Ok(RecordOutcome {
            matchup_id: id,
            winner,
            corrected,
            reset,
        })
    }

    // writes `team` into a slot. a Completed matchup that loses its seed is reset, which
    // in turn empties the slot it fed, all the way to the final.
    fn advance(&mut self, id: MatchupId, slot: Slot, team: Option<TeamId>, reset: &mut Vec<MatchupId>) {
        let mut cursor = Some((id, slot, team));
        while let Some((id, slot, team)) = cursor.take() {
            let Some(m) = self.matchups.get_mut(&id) else {
                return;
            };
            m.set_slot(slot, team);
            if m.is_completed() {
                m.reset();
                reset.push(id);
                cursor = m.next.map(|(next_id, next_slot)| (next_id, next_slot, None));
            }
        }
    }

    /// Applies a completed playoff game to the matchup that pairs its two teams.
    pub fn apply_game(&mut self, game: &Game) -> Result<RecordOutcome, BracketError> {
        if !game.completed || game.kind != GameKind::Playoff {
            return Err(BracketError::NotAPlayoffResult(game.id));
        }

        let found = self
            .matchups
            .values()
            .find(|m| m.has_team(game.home_team) && m.has_team(game.away_team))
            .map(|m| (m.id, m.seed1));

        let Some((id, seed1)) = found else {
            // the pairing is only early if both teams are alive and can still meet in an
            // unready matchup. otherwise it belongs to a bracket path a correction erased.
            let teams = [game.home_team, game.away_team];
            let waiting = self
                .matchups
                .values()
                .filter(|m| !m.is_ready())
                .filter(|m| teams.iter().all(|&t| !self.is_eliminated(t) && self.can_reach(m.id, t)))
                .min_by_key(|m| m.round);
            return Err(match waiting {
                Some(m) => BracketError::FeedersIncomplete(m.id),
                None => BracketError::NoMatchupForTeams(game.home_team, game.away_team),
            });
        };

        let (s1, s2) = if seed1 == Some(game.home_team) {
            (game.home_score, game.away_score)
        } else {
            (game.away_score, game.home_score)
        };
        let outcome = self.record_result(id, s1, s2)?;
        if let Some(m) = self.matchups.get_mut(&id) {
            m.game_id = Some(game.id);
        }
        Ok(outcome)
    }

    fn is_eliminated(&self, team: TeamId) -> bool {
        self.matchups
            .values()
            .any(|m| m.is_completed() && m.has_team(team) && m.winner != Some(team))
    }

    // true if `team` sits in matchup `id` or in one of its still pending feeders
    fn can_reach(&self, id: MatchupId, team: TeamId) -> bool {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(m) = self.matchups.get(&id) else {
                continue;
            };
            if m.has_team(team) {
                return true;
            }
            if let Some((a, b)) = m.feeders {
                for feeder in [a, b] {
                    if self.matchups.get(&feeder).is_some_and(|f| !f.is_completed()) {
                        stack.push(feeder);
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    fn seeds(n: u32) -> Vec<TeamId> {
        (1..=n).map(TeamId).collect()
    }

    #[test]
    fn seeding_order() {
        assert_eq!(bracket_order(4), vec![1, 4, 2, 3]);
        assert_eq!(bracket_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn four_team_layout() {
        let b = PlayoffBracket::seeded(&seeds(4)).unwrap();
        assert_eq!(b.rounds(), 2);
        let r1 = b.round(1);
        assert_eq!((r1[0].seed1, r1[0].seed2), (Some(TeamId(1)), Some(TeamId(4))));
        assert_eq!((r1[1].seed1, r1[1].seed2), (Some(TeamId(2)), Some(TeamId(3))));
        assert_eq!(r1[0].next, Some((MatchupId(3), Slot::First)));
        assert_eq!(r1[1].next, Some((MatchupId(3), Slot::Second)));
        let fin = b.final_matchup().unwrap();
        assert_eq!(fin.id, MatchupId(3));
        assert_eq!(fin.feeders, Some((MatchupId(1), MatchupId(2))));
        assert_eq!(fin.next, None);
    }

    #[test]
    fn rejects_bad_seeding() {
        assert_eq!(PlayoffBracket::seeded(&seeds(6)), Err(BracketError::InvalidSeedCount(6)));
        assert_eq!(PlayoffBracket::seeded(&seeds(1)), Err(BracketError::InvalidSeedCount(1)));
        let dup = vec![TeamId(1), TeamId(1)];
        assert_eq!(PlayoffBracket::seeded(&dup), Err(BracketError::DuplicateSeed(TeamId(1))));
    }

    #[test]
    fn final_waits_for_feeders() {
        let mut b = PlayoffBracket::seeded(&seeds(4)).unwrap();
        b.record_result(MatchupId(1), 24, 10).unwrap();
        let before = b.clone();
        assert_eq!(b.record_result(MatchupId(3), 20, 17), Err(BracketError::FeedersIncomplete(MatchupId(3))));
        assert_eq!(b, before);
    }

    #[test]
    fn unknown_and_tied_results_rejected() {
        let mut b = PlayoffBracket::seeded(&seeds(2)).unwrap();
        assert_eq!(b.record_result(MatchupId(9), 1, 0), Err(BracketError::UnknownMatchup(MatchupId(9))));
        assert_eq!(b.record_result(MatchupId(1), 7, 7), Err(BracketError::TiedResult(MatchupId(1))));
        assert!(!b.matchup(MatchupId(1)).unwrap().is_completed());
    }

    #[test]
    fn full_run_crowns_champion() {
        let mut b = PlayoffBracket::seeded(&seeds(4)).unwrap();
        b.record_result(MatchupId(1), 31, 10).unwrap();
        b.record_result(MatchupId(2), 14, 17).unwrap();
        let fin = b.matchup(MatchupId(3)).unwrap();
        assert_eq!((fin.seed1, fin.seed2), (Some(TeamId(1)), Some(TeamId(3))));
        b.record_result(MatchupId(3), 20, 23).unwrap();
        assert_eq!(b.champion(), Some(TeamId(3)));
        assert!(b.is_complete());
    }

    #[test]
    fn correction_with_same_winner_keeps_downstream() {
        let mut b = PlayoffBracket::seeded(&seeds(4)).unwrap();
        b.record_result(MatchupId(1), 31, 10).unwrap();
        b.record_result(MatchupId(2), 14, 17).unwrap();
        b.record_result(MatchupId(3), 20, 23).unwrap();

        let outcome = b.record_result(MatchupId(1), 28, 10).unwrap();
        assert!(outcome.corrected);
        assert!(outcome.reset.is_empty());
        assert_eq!(b.champion(), Some(TeamId(3)));
    }

    #[test]
    fn correction_cascades_through_every_round() {
        let mut b = PlayoffBracket::seeded(&seeds(8)).unwrap();
        // quarterfinals: 1, 4, 2, 3 advance
        for id in 1..=4 {
            b.record_result(MatchupId(id), 30, 20).unwrap();
        }
        b.record_result(MatchupId(5), 27, 24).unwrap(); // 1 beats 4
        b.record_result(MatchupId(6), 21, 24).unwrap(); // 3 beats 2
        b.record_result(MatchupId(7), 17, 10).unwrap(); // 1 champion
        assert_eq!(b.champion(), Some(TeamId(1)));

        // 8 actually beat 1 in the first round
        let outcome = b.record_result(MatchupId(1), 20, 23).unwrap();
        assert_eq!(outcome.winner, TeamId(8));
        assert_eq!(outcome.reset, vec![MatchupId(5), MatchupId(7)]);

        let semi = b.matchup(MatchupId(5)).unwrap();
        assert_eq!(semi.state, MatchupState::Scheduled);
        assert_eq!((semi.seed1, semi.seed2), (Some(TeamId(8)), Some(TeamId(4))));
        assert_eq!(semi.winner, None);

        let fin = b.matchup(MatchupId(7)).unwrap();
        assert_eq!(fin.state, MatchupState::Scheduled);
        assert_eq!((fin.seed1, fin.seed2), (None, Some(TeamId(3))));
        assert_eq!(b.champion(), None);

        // the untouched half of the bracket keeps its results
        assert!(b.matchup(MatchupId(6)).unwrap().is_completed());
    }

    #[test]
    fn apply_game_maps_home_and_away() {
        let mut b = PlayoffBracket::seeded(&seeds(2)).unwrap();
        let game = Game::scheduled(GameId(50), 18, TeamId(2), TeamId(1), Timestamp::from_millis(0))
            .final_score(27, 20)
            .playoff();
        let outcome = b.apply_game(&game).unwrap();
        assert_eq!(outcome.winner, TeamId(2));
        let m = b.matchup(MatchupId(1)).unwrap();
        assert_eq!((m.seed1_score, m.seed2_score), (Some(20), Some(27)));
        assert_eq!(m.game_id, Some(GameId(50)));
    }

    #[test]
    fn apply_game_before_feeders_complete() {
        let mut b = PlayoffBracket::seeded(&seeds(4)).unwrap();
        b.apply_game(
            &Game::scheduled(GameId(1), 18, TeamId(1), TeamId(4), Timestamp::from_millis(0))
                .final_score(30, 3)
                .playoff(),
        )
        .unwrap();
        let early_final = Game::scheduled(GameId(2), 19, TeamId(1), TeamId(2), Timestamp::from_millis(1))
            .final_score(21, 14)
            .playoff();
        assert_eq!(b.apply_game(&early_final), Err(BracketError::FeedersIncomplete(MatchupId(3))));

        let regular = Game::scheduled(GameId(3), 5, TeamId(2), TeamId(3), Timestamp::from_millis(2)).final_score(1, 0);
        assert_eq!(b.apply_game(&regular), Err(BracketError::NotAPlayoffResult(GameId(3))));
    }

    fn playoff(id: u64, home: u32, away: u32, home_score: u32, away_score: u32) -> Game {
        Game::scheduled(GameId(id), 18, TeamId(home), TeamId(away), Timestamp::from_millis(id as i64))
            .final_score(home_score, away_score)
            .playoff()
    }

    #[test]
    fn games_from_an_erased_path_are_unmatched() {
        let mut b = PlayoffBracket::seeded(&seeds(8)).unwrap();
        // 8 upsets 1, the other quarterfinals go to the better seed
        b.apply_game(&playoff(1, 1, 8, 10, 17)).unwrap();
        b.apply_game(&playoff(2, 4, 5, 24, 20)).unwrap();
        b.apply_game(&playoff(3, 2, 7, 31, 3)).unwrap();
        b.apply_game(&playoff(4, 3, 6, 21, 14)).unwrap();

        // the old log still holds 1 v 4 and a 1 v 3 final
        let before = b.clone();
        assert_eq!(
            b.apply_game(&playoff(5, 1, 4, 27, 24)),
            Err(BracketError::NoMatchupForTeams(TeamId(1), TeamId(4)))
        );
        b.apply_game(&playoff(6, 3, 2, 24, 21)).unwrap();
        assert_eq!(
            b.apply_game(&playoff(7, 1, 3, 17, 10)),
            Err(BracketError::NoMatchupForTeams(TeamId(1), TeamId(3)))
        );
        assert_eq!(b.matchup(MatchupId(5)), before.matchup(MatchupId(5)));

        let fin = b.matchup(MatchupId(7)).unwrap();
        assert_eq!((fin.seed1, fin.seed2), (None, Some(TeamId(3))));
        assert_eq!(b.champion(), None);
    }

    #[test]
    fn live_teams_two_rounds_apart_are_waiting() {
        let mut b = PlayoffBracket::seeded(&seeds(8)).unwrap();
        b.apply_game(&playoff(1, 1, 8, 30, 3)).unwrap();
        b.apply_game(&playoff(2, 4, 5, 24, 20)).unwrap();
        b.apply_game(&playoff(3, 1, 4, 27, 24)).unwrap();
        // 3 has not played its quarterfinal yet, but can still reach the final
        assert_eq!(b.apply_game(&playoff(4, 1, 3, 17, 10)), Err(BracketError::FeedersIncomplete(MatchupId(7))));
        // 2 and 3 would meet in the semifinal first
        assert_eq!(b.apply_game(&playoff(5, 2, 3, 17, 10)), Err(BracketError::FeedersIncomplete(MatchupId(6))));
    }
}
