// 3.0: fantasy scoring. a stat line times a weight table, nothing else.
// the function is linear in every field: score(a + b) == score(a) + score(b), exactly,
// because weights and points are decimals. negative yardage scores negative, no floor.
// 3.1: presets for the common league formats. the table is versioned so a league can
// tell which rules produced a number.

use crate::config::ConfigError;
use crate::stats::StatLine;
use crate::types::Points;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/** 3.0: per-unit weights. every field is required when loaded from config. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTable {
    pub name: String,
    pub version: u32,

    pub passing_yard: Decimal,
    pub passing_touchdown: Decimal,
    pub interception_thrown: Decimal,
    pub rushing_yard: Decimal,
    pub rushing_touchdown: Decimal,
    pub reception: Decimal,
    pub receiving_yard: Decimal,
    pub receiving_touchdown: Decimal,
    pub fumble_lost: Decimal,
    pub two_point_conversion: Decimal,

    pub sack: Decimal,
    pub defensive_interception: Decimal,
    pub fumble_recovery: Decimal,
    pub defensive_touchdown: Decimal,
    pub safety: Decimal,

    pub field_goal_made: Decimal,
    pub extra_point_made: Decimal,
}

impl ScoringTable {
    /// Full point per reception.
    pub fn ppr() -> Self {
        Self {
            name: "ppr".to_string(),
            version: 1,
            passing_yard: dec!(0.04), // 1 per 25
            passing_touchdown: dec!(4),
            interception_thrown: dec!(-2),
            rushing_yard: dec!(0.1), // 1 per 10
            rushing_touchdown: dec!(6),
            reception: dec!(1),
            receiving_yard: dec!(0.1),
            receiving_touchdown: dec!(6),
            fumble_lost: dec!(-2),
            two_point_conversion: dec!(2),
            sack: dec!(2),
            defensive_interception: dec!(2),
            fumble_recovery: dec!(2),
            defensive_touchdown: dec!(6),
            safety: dec!(2),
            field_goal_made: dec!(3),
            extra_point_made: dec!(1),
        }
    }

    pub fn half_ppr() -> Self {
        Self {
            name: "half-ppr".to_string(),
            reception: dec!(0.5),
            ..Self::ppr()
        }
    }

    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            reception: Decimal::ZERO,
            ..Self::ppr()
        }
    }

    fn weights(&self) -> [Decimal; 17] {
        [
            self.passing_yard,
            self.passing_touchdown,
            self.interception_thrown,
            self.rushing_yard,
            self.rushing_touchdown,
            self.reception,
            self.receiving_yard,
            self.receiving_touchdown,
            self.fumble_lost,
            self.two_point_conversion,
            self.sack,
            self.defensive_interception,
            self.fumble_recovery,
            self.defensive_touchdown,
            self.safety,
            self.field_goal_made,
            self.extra_point_made,
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("scoring.name", "must not be empty"));
        }
        if self.version == 0 {
            return Err(ConfigError::invalid("scoring.version", "must be at least 1"));
        }
        if self.weights().iter().all(|w| w.is_zero()) {
            return Err(ConfigError::invalid("scoring", "every weight is zero"));
        }
        Ok(())
    }
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self::ppr()
    }
}

fn units(n: u32) -> Decimal {
    Decimal::from(n)
}

fn yards(n: i32) -> Decimal {
    Decimal::from(n)
}

// 3.0: the scorer only exists for validated tables.
#[derive(Debug, Clone)]
pub struct FantasyScorer {
    table: ScoringTable,
}

impl FantasyScorer {
    pub fn new(table: ScoringTable) -> Result<Self, ConfigError> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    pub fn score(&self, line: &StatLine) -> Points {
        let t = &self.table;
        let mut total = Decimal::ZERO;

        if let Some(p) = &line.passing {
            total += yards(p.yards) * t.passing_yard;
            total += units(p.touchdowns) * t.passing_touchdown;
            total += units(p.interceptions) * t.interception_thrown;
            total += units(p.two_point_conversions) * t.two_point_conversion;
        }
        if let Some(r) = &line.rushing {
            total += yards(r.yards) * t.rushing_yard;
            total += units(r.touchdowns) * t.rushing_touchdown;
            total += units(r.fumbles_lost) * t.fumble_lost;
            total += units(r.two_point_conversions) * t.two_point_conversion;
        }
        if let Some(c) = &line.receiving {
            total += units(c.receptions) * t.reception;
            total += yards(c.yards) * t.receiving_yard;
            total += units(c.touchdowns) * t.receiving_touchdown;
            total += units(c.fumbles_lost) * t.fumble_lost;
            total += units(c.two_point_conversions) * t.two_point_conversion;
        }
        if let Some(d) = &line.defense {
            total += units(d.sacks) * t.sack;
            total += units(d.interceptions) * t.defensive_interception;
            total += units(d.fumble_recoveries) * t.fumble_recovery;
            total += units(d.touchdowns) * t.defensive_touchdown;
            total += units(d.safeties) * t.safety;
        }
        if let Some(k) = &line.kicking {
            total += units(k.field_goals_made) * t.field_goal_made;
            total += units(k.extra_points_made) * t.extra_point_made;
        }

        Points::new(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{DefenseStats, KickingStats, PassingStats, ReceivingStats, RushingStats};

    fn scorer() -> FantasyScorer {
        FantasyScorer::new(ScoringTable::ppr()).unwrap()
    }

    #[test]
    fn empty_line_scores_zero() {
        assert_eq!(scorer().score(&StatLine::zero()), Points::zero());
    }

    #[test]
    fn quarterback_line() {
        let line = StatLine::zero()
            .with_passing(PassingStats {
                attempts: 35,
                completions: 24,
                yards: 300,
                touchdowns: 2,
                interceptions: 1,
                two_point_conversions: 0,
            })
            .with_rushing(RushingStats { attempts: 4, yards: 20, ..Default::default() });
        // 12 + 8 - 2 + 2
        assert_eq!(scorer().score(&line).value(), dec!(20));
    }

    #[test]
    fn receptions_depend_on_format() {
        let line = StatLine::zero().with_receiving(ReceivingStats {
            targets: 8,
            receptions: 6,
            yards: 80,
            touchdowns: 1,
            ..Default::default()
        });
        let ppr = FantasyScorer::new(ScoringTable::ppr()).unwrap().score(&line);
        let half = FantasyScorer::new(ScoringTable::half_ppr()).unwrap().score(&line);
        let standard = FantasyScorer::new(ScoringTable::standard()).unwrap().score(&line);
        assert_eq!(ppr.value(), dec!(20));
        assert_eq!(half.value(), dec!(17));
        assert_eq!(standard.value(), dec!(14));
    }

    #[test]
    fn negative_yardage_has_no_floor() {
        let line = StatLine::zero().with_rushing(RushingStats {
            attempts: 5,
            yards: -12,
            fumbles_lost: 1,
            ..Default::default()
        });
        assert_eq!(scorer().score(&line).value(), dec!(-3.2));
        assert!(scorer().score(&line).is_negative());
    }

    #[test]
    fn defense_and_kicker() {
        let def = StatLine::zero().with_defense(DefenseStats {
            sacks: 3,
            interceptions: 1,
            fumble_recoveries: 1,
            touchdowns: 1,
            safeties: 1,
        });
        assert_eq!(scorer().score(&def).value(), dec!(18));

        let kick = StatLine::zero().with_kicking(KickingStats {
            field_goals_made: 2,
            field_goals_attempted: 3,
            extra_points_made: 3,
            extra_points_attempted: 3,
        });
        assert_eq!(scorer().score(&kick).value(), dec!(9));
    }

    #[test]
    fn rejects_unusable_tables() {
        let mut table = ScoringTable::ppr();
        table.version = 0;
        assert!(FantasyScorer::new(table).is_err());

        let mut table = ScoringTable::ppr();
        table.name = "  ".to_string();
        assert!(FantasyScorer::new(table).is_err());
    }
}
