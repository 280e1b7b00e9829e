// 9.0: power rankings. composite = w_win * win pct + w_diff * normalized margin.
// margin is the average point differential per game, clamped to +-scale and mapped onto
// [0, 1] so both inputs live on the same range. weights come from config.
// 9.1: ranks are dense 1..N with no gaps. equal composites break by team id ascending.

use crate::config::ConfigError;
use crate::league::Team;
use crate::standings::TeamRecord;
use crate::types::TeamId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub win_pct_weight: Decimal,
    pub differential_weight: Decimal,
    // average margin (points per game) that maps to the top of the scale
    pub differential_scale: Decimal,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            win_pct_weight: dec!(0.7),
            differential_weight: dec!(0.3),
            differential_scale: dec!(14),
        }
    }
}

impl RankingWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_pct_weight < Decimal::ZERO || self.differential_weight < Decimal::ZERO {
            return Err(ConfigError::invalid("ranking", "weights must not be negative"));
        }
        if self.win_pct_weight + self.differential_weight != Decimal::ONE {
            return Err(ConfigError::invalid(
                "ranking",
                format!(
                    "weights must sum to 1, got {}",
                    self.win_pct_weight + self.differential_weight
                ),
            ));
        }
        if self.differential_scale <= Decimal::ZERO {
            return Err(ConfigError::invalid("ranking.differential_scale", "must be positive"));
        }
        Ok(())
    }

    pub fn normalized_differential(&self, avg_margin: Decimal) -> Decimal {
        let ratio = (avg_margin / self.differential_scale).clamp(-Decimal::ONE, Decimal::ONE);
        (ratio + Decimal::ONE) / dec!(2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerRanking {
    pub rank: u32,
    pub team_id: TeamId,
    pub composite: Decimal,
    pub win_pct: Decimal,
    pub avg_point_differential: Decimal,
    pub record: TeamRecord,
    pub rationale: String,
}

fn avg_margin(record: &TeamRecord) -> Decimal {
    let games = record.games_played();
    if games == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(record.point_differential()) / Decimal::from(games)
}

fn rationale(record: &TeamRecord, win_pct: Decimal, margin: Decimal, composite: Decimal) -> String {
    let sign = if margin >= Decimal::ZERO { "+" } else { "" };
    format!(
        "{} record, {} win pct, {}{} avg margin, composite {}",
        record.summary(),
        win_pct.round_dp(3),
        sign,
        margin.round_dp(1),
        composite.round_dp(4),
    )
}

pub fn compute_rankings(
    teams: &[Team],
    records: &BTreeMap<TeamId, TeamRecord>,
    weights: &RankingWeights,
) -> Vec<PowerRanking> {
    let mut scored: Vec<PowerRanking> = teams
        .iter()
        .map(|team| {
            let record = records.get(&team.id).copied().unwrap_or_else(|| TeamRecord::new(team.id));
            let win_pct = record.win_pct();
            let margin = avg_margin(&record);
            let composite = weights.win_pct_weight * win_pct
                + weights.differential_weight * weights.normalized_differential(margin);
            PowerRanking {
                rank: 0,
                team_id: team.id,
                composite,
                win_pct,
                avg_point_differential: margin,
                record,
                rationale: rationale(&record, win_pct, margin, composite),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.composite.cmp(&a.composite).then_with(|| a.team_id.cmp(&b.team_id)));
    for (i, row) in scored.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
    scored
}
