// 6.0: team-history ledger. answers "which team was player P on at time t".
// a player's team is the target of the latest trade effective at or before t, or the
// original team when no trade precedes t. there is no mutable current-team field anywhere.
// 6.1: equal effective timestamps keep insertion order, so the later-inserted trade wins.
// 6.2: history_of: contiguous intervals, no-op trades merged, zero-length intervals dropped.

use crate::events::{EventSnapshot, TradeRecord};
use crate::types::{PlayerId, TeamId, Timestamp, TradeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/** one stretch on one team. `from: None` = since season setup, `until: None` = still there. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInterval {
    pub team_id: TeamId,
    pub from: Option<Timestamp>,
    pub until: Option<Timestamp>,
}

impl TeamInterval {
    pub fn contains(&self, at: Timestamp) -> bool {
        self.from.map_or(true, |f| at >= f) && self.until.map_or(true, |u| at < u)
    }

    pub fn is_open(&self) -> bool {
        self.until.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LedgerEntry {
    effective_at: Timestamp,
    to_team: TeamId,
    trade_id: TradeId,
}

#[derive(Debug, Clone)]
struct PlayerChain {
    original_team: TeamId,
    entries: Vec<LedgerEntry>, // stable-sorted by effective_at
}

impl PlayerChain {
    fn team_at(&self, at: Timestamp) -> TeamId {
        let idx = self.entries.partition_point(|e| e.effective_at <= at);
        if idx == 0 {
            self.original_team
        } else {
            self.entries[idx - 1].to_team
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamHistoryLedger {
    chains: BTreeMap<PlayerId, PlayerChain>,
}

impl TeamHistoryLedger {
    /// Builds the ledger from the snapshot's roster and trades.
    /// Trades naming a player outside the roster are ignored here; validation reports them.
    pub fn build(snapshot: &EventSnapshot) -> Self {
        let mut chains: BTreeMap<PlayerId, PlayerChain> = snapshot
            .players
            .iter()
            .map(|p| {
                (
                    p.id,
                    PlayerChain {
                        original_team: p.original_team,
                        entries: Vec::new(),
                    },
                )
            })
            .collect();

        for trade in &snapshot.trades {
            if let Some(chain) = chains.get_mut(&trade.player_id) {
                chain.entries.push(entry_for(trade));
            }
        }

        for chain in chains.values_mut() {
            // sort_by_key is stable: same-timestamp trades stay in insertion order
            chain.entries.sort_by_key(|e| e.effective_at);
        }

        Self { chains }
    }

    pub fn team_of(&self, player: PlayerId, at: Timestamp) -> Option<TeamId> {
        self.chains.get(&player).map(|c| c.team_at(at))
    }

    pub fn current_team(&self, player: PlayerId) -> Option<TeamId> {
        self.chains.get(&player).map(|c| {
            c.entries
                .last()
                .map(|e| e.to_team)
                .unwrap_or(c.original_team)
        })
    }

    pub fn original_team(&self, player: PlayerId) -> Option<TeamId> {
        self.chains.get(&player).map(|c| c.original_team)
    }

    /// Trade ids applied to the player, in effective order.
    pub fn trades_of(&self, player: PlayerId) -> Vec<TradeId> {
        self.chains
            .get(&player)
            .map(|c| c.entries.iter().map(|e| e.trade_id).collect())
            .unwrap_or_default()
    }

    pub fn history_of(&self, player: PlayerId) -> Option<Vec<TeamInterval>> {
        let chain = self.chains.get(&player)?;
        let mut out: Vec<TeamInterval> = Vec::new();
        let mut current = chain.original_team;
        let mut from: Option<Timestamp> = None;

        for entry in &chain.entries {
            if entry.to_team == current {
                continue; // no-op trade
            }
            if from == Some(entry.effective_at) {
                // current stint has zero length: replace it, and rejoin the previous
                // stint if the trade moved the player straight back
                match out.last() {
                    Some(prev) if prev.team_id == entry.to_team => {
                        current = prev.team_id;
                        from = prev.from;
                        out.pop();
                    }
                    _ => current = entry.to_team,
                }
                continue;
            }
            out.push(TeamInterval {
                team_id: current,
                from,
                until: Some(entry.effective_at),
            });
            current = entry.to_team;
            from = Some(entry.effective_at);
        }

        out.push(TeamInterval {
            team_id: current,
            from,
            until: None,
        });
        Some(out)
    }

    /// Players on `team` at `at`, by id.
    pub fn roster_at(&self, team: TeamId, at: Timestamp) -> Vec<PlayerId> {
        self.chains
            .iter()
            .filter(|(_, c)| c.team_at(at) == team)
            .map(|(id, _)| *id)
            .collect()
    }
}

fn entry_for(trade: &TradeRecord) -> LedgerEntry {
    LedgerEntry {
        effective_at: trade.effective_at,
        to_team: trade.to_team,
        trade_id: trade.id,
    }
}
