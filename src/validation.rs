//! Validation hook for proposed events.
//!
//! Structural problems (unknown ids, a team playing itself, week zero) reject the
//! event. Disagreements with the ledger only produce [`InconsistentEvent`] warnings:
//! historical corrections are expected, so the event is still accepted and every
//! derived view keeps working.

use crate::events::{EventSnapshot, Game, GameMode, TradeRecord};
use crate::ledger::TeamHistoryLedger;
use crate::types::{GameId, PlayerId, TeamId, Timestamp, TradeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum InconsistentEvent {
    #[error("game {game_id}: {player_id} listed under {listed_team} but the ledger has {ledger_team} at game time")]
    RosterMismatch {
        game_id: GameId,
        player_id: PlayerId,
        listed_team: TeamId,
        ledger_team: TeamId,
    },

    #[error("trade {trade_id:?}: {player_id} traded from {named_from} but the ledger has {ledger_team} at that time")]
    TradeSourceMismatch {
        trade_id: TradeId,
        player_id: PlayerId,
        named_from: TeamId,
        ledger_team: TeamId,
    },

    #[error("trade {trade_id:?}: {player_id} has another trade effective at {at}; the later-inserted one wins")]
    SimultaneousTrades {
        trade_id: TradeId,
        player_id: PlayerId,
        at: Timestamp,
    },

    #[error("trade {trade_id:?}: {player_id} is not on any roster; the trade is ignored")]
    UnknownTradePlayer { trade_id: TradeId, player_id: PlayerId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RejectReason {
    #[error("team {0} is not in the league")]
    UnknownTeam(TeamId),

    #[error("player {0} is not on any roster")]
    UnknownPlayer(PlayerId),

    #[error("team {0} cannot play itself")]
    SameTeamBothSides(TeamId),

    #[error("week {0} is invalid, weeks start at 1")]
    InvalidWeek(u32),

    #[error("game {0} is a simple-mode game but carries stat lines")]
    StatsOnSimpleGame(GameId),

    #[error("player {0} is listed for both teams")]
    PlayerOnBothSides(PlayerId),

    #[error("trade id {0:?} already exists")]
    DuplicateTradeId(TradeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Accepted { warnings: Vec<InconsistentEvent> },
    Rejected { reason: RejectReason },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted { .. })
    }

    pub fn warnings(&self) -> &[InconsistentEvent] {
        match self {
            ValidationOutcome::Accepted { warnings } => warnings,
            ValidationOutcome::Rejected { .. } => &[],
        }
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            ValidationOutcome::Accepted { .. } => None,
            ValidationOutcome::Rejected { reason } => Some(reason),
        }
    }
}

fn check_game_structure(snapshot: &EventSnapshot, game: &Game) -> Result<(), RejectReason> {
    if game.week == 0 {
        return Err(RejectReason::InvalidWeek(game.week));
    }
    if game.home_team == game.away_team {
        return Err(RejectReason::SameTeamBothSides(game.home_team));
    }
    for team in [game.home_team, game.away_team] {
        if snapshot.team(team).is_none() {
            return Err(RejectReason::UnknownTeam(team));
        }
    }
    if game.mode == GameMode::Simple && !(game.home_stats.is_empty() && game.away_stats.is_empty()) {
        return Err(RejectReason::StatsOnSimpleGame(game.id));
    }
    for (player, _, _) in game.stat_lines() {
        if snapshot.player(player).is_none() {
            return Err(RejectReason::UnknownPlayer(player));
        }
        if game.home_stats.contains_key(&player) && game.away_stats.contains_key(&player) {
            return Err(RejectReason::PlayerOnBothSides(player));
        }
    }
    Ok(())
}

fn roster_mismatches(game: &Game, ledger: &TeamHistoryLedger) -> Vec<InconsistentEvent> {
    game.stat_lines()
        .filter_map(|(player_id, listed_team, _)| {
            let ledger_team = ledger.team_of(player_id, game.timestamp)?;
            (ledger_team != listed_team).then_some(InconsistentEvent::RosterMismatch {
                game_id: game.id,
                player_id,
                listed_team,
                ledger_team,
            })
        })
        .collect()
}

/// Checks a proposed game against the snapshot's roster and ledger.
pub fn validate_game(snapshot: &EventSnapshot, ledger: &TeamHistoryLedger, game: &Game) -> ValidationOutcome {
    if let Err(reason) = check_game_structure(snapshot, game) {
        return ValidationOutcome::Rejected { reason };
    }
    ValidationOutcome::Accepted {
        warnings: roster_mismatches(game, ledger),
    }
}

/// Checks a proposed trade. A trade to the player's current team is a valid no-op.
pub fn validate_trade(snapshot: &EventSnapshot, ledger: &TeamHistoryLedger, trade: &TradeRecord) -> ValidationOutcome {
    if snapshot.trades.iter().any(|t| t.id == trade.id) {
        return ValidationOutcome::Rejected {
            reason: RejectReason::DuplicateTradeId(trade.id),
        };
    }
    if snapshot.player(trade.player_id).is_none() {
        return ValidationOutcome::Rejected {
            reason: RejectReason::UnknownPlayer(trade.player_id),
        };
    }
    for team in [trade.from_team, trade.to_team] {
        if snapshot.team(team).is_none() {
            return ValidationOutcome::Rejected {
                reason: RejectReason::UnknownTeam(team),
            };
        }
    }

    let mut warnings = Vec::new();
    if let Some(ledger_team) = ledger.team_of(trade.player_id, trade.effective_at) {
        if ledger_team != trade.from_team {
            warnings.push(InconsistentEvent::TradeSourceMismatch {
                trade_id: trade.id,
                player_id: trade.player_id,
                named_from: trade.from_team,
                ledger_team,
            });
        }
    }
    let simultaneous = snapshot
        .trades
        .iter()
        .any(|t| t.player_id == trade.player_id && t.effective_at == trade.effective_at);
    if simultaneous {
        warnings.push(InconsistentEvent::SimultaneousTrades {
            trade_id: trade.id,
            player_id: trade.player_id,
            at: trade.effective_at,
        });
    }
    ValidationOutcome::Accepted { warnings }
}

/// Every inconsistency already present in the snapshot, games first, then trades.
pub fn snapshot_warnings(snapshot: &EventSnapshot, ledger: &TeamHistoryLedger) -> Vec<InconsistentEvent> {
    let mut games: Vec<&Game> = snapshot.games.iter().collect();
    games.sort_by_key(|g| g.chronological_key());
    let mut out: Vec<InconsistentEvent> = games.iter().flat_map(|g| roster_mismatches(g, ledger)).collect();

    // replay each player's chain in effective order and compare against the running team
    let mut chains: BTreeMap<PlayerId, Vec<&TradeRecord>> = BTreeMap::new();
    for trade in &snapshot.trades {
        chains.entry(trade.player_id).or_default().push(trade);
    }
    for (player_id, mut trades) in chains {
        let Some(mut current) = ledger.original_team(player_id) else {
            out.extend(trades.iter().map(|t| InconsistentEvent::UnknownTradePlayer {
                trade_id: t.id,
                player_id,
            }));
            continue;
        };
        trades.sort_by_key(|t| t.effective_at);
        for (i, trade) in trades.iter().enumerate() {
            if i > 0 && trades[i - 1].effective_at == trade.effective_at {
                out.push(InconsistentEvent::SimultaneousTrades {
                    trade_id: trade.id,
                    player_id,
                    at: trade.effective_at,
                });
            }
            if trade.from_team != current {
                out.push(InconsistentEvent::TradeSourceMismatch {
                    trade_id: trade.id,
                    player_id,
                    named_from: trade.from_team,
                    ledger_team: current,
                });
            }
            current = trade.to_team;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Side;
    use crate::league::{Player, Team};
    use crate::stats::StatLine;
    use crate::types::Position;

    const A: TeamId = TeamId(1);
    const B: TeamId = TeamId(2);
    const P: PlayerId = PlayerId(7);

    fn snapshot() -> EventSnapshot {
        EventSnapshot {
            teams: vec![Team::new(A, "Alphas", "ALP", "East", "North"), Team::new(B, "Betas", "BET", "East", "North")],
            players: vec![Player::new(P, "seven", Position::WR, A)],
            trades: vec![TradeRecord::new(TradeId(1), P, A, B, Timestamp::from_millis(1_000))],
            ..Default::default()
        }
    }

    fn game_at(ts: i64, side: Side) -> Game {
        Game::scheduled(GameId(1), 1, A, B, Timestamp::from_millis(ts))
            .final_score(10, 7)
            .with_stats(side, P, StatLine::zero())
    }

    #[test]
    fn consistent_game_accepted_clean() {
        let snap = snapshot();
        let ledger = TeamHistoryLedger::build(&snap);
        let outcome = validate_game(&snap, &ledger, &game_at(500, Side::Home));
        assert!(outcome.is_accepted());
        assert!(outcome.warnings().is_empty());
    }

    #[test]
    fn disputed_roster_is_a_warning_not_a_rejection() {
        let snap = snapshot();
        let ledger = TeamHistoryLedger::build(&snap);
        // before the trade P belongs to A, not B
        let outcome = validate_game(&snap, &ledger, &game_at(500, Side::Away));
        assert!(outcome.is_accepted());
        assert_eq!(
            outcome.warnings(),
            &[InconsistentEvent::RosterMismatch {
                game_id: GameId(1),
                player_id: P,
                listed_team: B,
                ledger_team: A,
            }]
        );
    }

    #[test]
    fn structural_rejections() {
        let snap = snapshot();
        let ledger = TeamHistoryLedger::build(&snap);

        let mut g = game_at(500, Side::Home);
        g.week = 0;
        assert_eq!(validate_game(&snap, &ledger, &g).reason(), Some(&RejectReason::InvalidWeek(0)));

        let g = Game::scheduled(GameId(2), 1, A, A, Timestamp::from_millis(0));
        assert_eq!(validate_game(&snap, &ledger, &g).reason(), Some(&RejectReason::SameTeamBothSides(A)));

        let g = Game::scheduled(GameId(3), 1, A, TeamId(9), Timestamp::from_millis(0));
        assert_eq!(validate_game(&snap, &ledger, &g).reason(), Some(&RejectReason::UnknownTeam(TeamId(9))));

        let mut g = game_at(500, Side::Home);
        g.mode = GameMode::Simple;
        assert_eq!(validate_game(&snap, &ledger, &g).reason(), Some(&RejectReason::StatsOnSimpleGame(GameId(1))));

        let g = game_at(500, Side::Home).with_stats(Side::Away, PlayerId(99), StatLine::zero());
        assert_eq!(validate_game(&snap, &ledger, &g).reason(), Some(&RejectReason::UnknownPlayer(PlayerId(99))));

        let g = game_at(500, Side::Home).with_stats(Side::Away, P, StatLine::zero());
        assert_eq!(validate_game(&snap, &ledger, &g).reason(), Some(&RejectReason::PlayerOnBothSides(P)));
    }

    #[test]
    fn trade_checks() {
        let snap = snapshot();
        let ledger = TeamHistoryLedger::build(&snap);

        let dup = TradeRecord::new(TradeId(1), P, B, A, Timestamp::from_millis(2_000));
        assert_eq!(validate_trade(&snap, &ledger, &dup).reason(), Some(&RejectReason::DuplicateTradeId(TradeId(1))));

        let clean = TradeRecord::new(TradeId(2), P, B, A, Timestamp::from_millis(2_000));
        let outcome = validate_trade(&snap, &ledger, &clean);
        assert!(outcome.is_accepted() && outcome.warnings().is_empty());

        let no_op = TradeRecord::new(TradeId(3), P, B, B, Timestamp::from_millis(2_000));
        assert!(validate_trade(&snap, &ledger, &no_op).warnings().is_empty());

        let wrong_source = TradeRecord::new(TradeId(4), P, A, B, Timestamp::from_millis(2_000));
        assert!(matches!(
            validate_trade(&snap, &ledger, &wrong_source).warnings(),
            [InconsistentEvent::TradeSourceMismatch { ledger_team: B, .. }]
        ));

        let same_time = TradeRecord::new(TradeId(5), P, B, A, Timestamp::from_millis(1_000));
        assert!(matches!(
            validate_trade(&snap, &ledger, &same_time).warnings(),
            [InconsistentEvent::SimultaneousTrades { .. }]
        ));
    }

    #[test]
    fn snapshot_scan_finds_everything() {
        let mut snap = snapshot();
        snap.games.push(game_at(500, Side::Away));
        snap.trades.push(TradeRecord::new(TradeId(2), P, A, A, Timestamp::from_millis(1_000)));
        let ledger = TeamHistoryLedger::build(&snap);
        let warnings = snapshot_warnings(&snap, &ledger);
        assert_eq!(warnings.len(), 3);
        assert!(matches!(warnings[0], InconsistentEvent::RosterMismatch { .. }));
        assert!(matches!(warnings[1], InconsistentEvent::SimultaneousTrades { trade_id: TradeId(2), .. }));
        assert!(matches!(warnings[2], InconsistentEvent::TradeSourceMismatch { trade_id: TradeId(2), .. }));
    }

    #[test]
    fn trade_for_player_off_the_roster_is_reported() {
        let mut snap = snapshot();
        let stranger = PlayerId(99);
        snap.trades.push(TradeRecord::new(TradeId(2), stranger, A, B, Timestamp::from_millis(3_000)));
        let ledger = TeamHistoryLedger::build(&snap);

        assert_eq!(ledger.original_team(stranger), None);
        assert_eq!(ledger.team_of(P, Timestamp::from_millis(3_000)), Some(B));
        assert_eq!(
            snapshot_warnings(&snap, &ledger),
            vec![InconsistentEvent::UnknownTradePlayer {
                trade_id: TradeId(2),
                player_id: stranger,
            }]
        );
    }
}
