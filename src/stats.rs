// 2.0: stat line schema. one player's box score for one game, split into closed category blocks.
// a block is None when the player recorded nothing in that category. any combination is legal
// (a QB with a rushing block, a WR with a passing block on a trick play).
// 2.1: field-wise addition. this is what season totals are built from.
// 2.2: StatField names every numeric field that can be ranked in a leaders list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassingStats {
    pub attempts: u32,
    pub completions: u32,
    pub yards: i32, // sacks and lateral losses can push this negative
    pub touchdowns: u32,
    pub interceptions: u32,
    pub two_point_conversions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RushingStats {
    pub attempts: u32,
    pub yards: i32,
    pub touchdowns: u32,
    pub fumbles_lost: u32,
    pub two_point_conversions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceivingStats {
    pub targets: u32,
    pub receptions: u32,
    pub yards: i32,
    pub touchdowns: u32,
    pub fumbles_lost: u32,
    pub two_point_conversions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefenseStats {
    pub sacks: u32,
    pub interceptions: u32,
    pub fumble_recoveries: u32,
    pub touchdowns: u32, // defensive and special teams return scores
    pub safeties: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KickingStats {
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub extra_points_made: u32,
    pub extra_points_attempted: u32,
}

// every block adds field by field, so one macro keeps the five impls in sync
macro_rules! impl_block_add {
    ($block:ty { $($field:ident),+ $(,)? }) => {
        impl Add for $block {
            type Output = $block;

            fn add(self, rhs: $block) -> $block {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $block {
            fn add_assign(&mut self, rhs: $block) {
                $(self.$field += rhs.$field;)+
            }
        }
    };
}

impl_block_add!(PassingStats { attempts, completions, yards, touchdowns, interceptions, two_point_conversions });
impl_block_add!(RushingStats { attempts, yards, touchdowns, fumbles_lost, two_point_conversions });
impl_block_add!(ReceivingStats { targets, receptions, yards, touchdowns, fumbles_lost, two_point_conversions });
impl_block_add!(DefenseStats { sacks, interceptions, fumble_recoveries, touchdowns, safeties });
impl_block_add!(KickingStats { field_goals_made, field_goals_attempted, extra_points_made, extra_points_attempted });

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatCategory {
    Passing,
    Rushing,
    Receiving,
    Defense,
    Kicking,
}

/** 2.0: per-game stat line. the all-None default is the zero line. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing: Option<PassingStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rushing: Option<RushingStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiving: Option<ReceivingStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<DefenseStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kicking: Option<KickingStats>,
}

impl StatLine {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn with_passing(mut self, stats: PassingStats) -> Self {
        self.passing = Some(stats);
        self
    }

    pub fn with_rushing(mut self, stats: RushingStats) -> Self {
        self.rushing = Some(stats);
        self
    }

    pub fn with_receiving(mut self, stats: ReceivingStats) -> Self {
        self.receiving = Some(stats);
        self
    }

    pub fn with_defense(mut self, stats: DefenseStats) -> Self {
        self.defense = Some(stats);
        self
    }

    pub fn with_kicking(mut self, stats: KickingStats) -> Self {
        self.kicking = Some(stats);
        self
    }

    pub fn categories(&self) -> Vec<StatCategory> {
        let mut out = Vec::new();
        if self.passing.is_some() {
            out.push(StatCategory::Passing);
        }
        if self.rushing.is_some() {
            out.push(StatCategory::Rushing);
        }
        if self.receiving.is_some() {
            out.push(StatCategory::Receiving);
        }
        if self.defense.is_some() {
            out.push(StatCategory::Defense);
        }
        if self.kicking.is_some() {
            out.push(StatCategory::Kicking);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }

    pub fn passing_or_zero(&self) -> PassingStats {
        self.passing.unwrap_or_default()
    }

    pub fn rushing_or_zero(&self) -> RushingStats {
        self.rushing.unwrap_or_default()
    }

    pub fn receiving_or_zero(&self) -> ReceivingStats {
        self.receiving.unwrap_or_default()
    }

    pub fn defense_or_zero(&self) -> DefenseStats {
        self.defense.unwrap_or_default()
    }

    pub fn kicking_or_zero(&self) -> KickingStats {
        self.kicking.unwrap_or_default()
    }

    pub fn get(&self, field: StatField) -> i64 {
        field.value(self)
    }
}

fn merge<T: Add<Output = T>>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

// 2.1: field-wise sum. a block present on either side is present in the result.
impl Add for StatLine {
    type Output = StatLine;

    fn add(self, rhs: StatLine) -> StatLine {
        StatLine {
            passing: merge(self.passing, rhs.passing),
            rushing: merge(self.rushing, rhs.rushing),
            receiving: merge(self.receiving, rhs.receiving),
            defense: merge(self.defense, rhs.defense),
            kicking: merge(self.kicking, rhs.kicking),
        }
    }
}

impl AddAssign for StatLine {
    fn add_assign(&mut self, rhs: StatLine) {
        *self = *self + rhs;
    }
}

impl Sum for StatLine {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, s| acc + s)
    }
}

impl<'a> Sum<&'a StatLine> for StatLine {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, s| acc + *s)
    }
}

// 2.2: rankable fields. values are widened to i64 so yards and counts sort together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatField {
    PassingYards,
    PassingTouchdowns,
    PassingCompletions,
    InterceptionsThrown,
    RushingYards,
    RushingTouchdowns,
    RushingAttempts,
    Receptions,
    ReceivingYards,
    ReceivingTouchdowns,
    Sacks,
    DefensiveInterceptions,
    DefensiveTouchdowns,
    FieldGoalsMade,
    ScrimmageYards,
    TotalTouchdowns,
}

impl StatField {
    pub const ALL: [StatField; 16] = [
        StatField::PassingYards,
        StatField::PassingTouchdowns,
        StatField::PassingCompletions,
        StatField::InterceptionsThrown,
        StatField::RushingYards,
        StatField::RushingTouchdowns,
        StatField::RushingAttempts,
        StatField::Receptions,
        StatField::ReceivingYards,
        StatField::ReceivingTouchdowns,
        StatField::Sacks,
        StatField::DefensiveInterceptions,
        StatField::DefensiveTouchdowns,
        StatField::FieldGoalsMade,
        StatField::ScrimmageYards,
        StatField::TotalTouchdowns,
    ];

    pub fn value(&self, line: &StatLine) -> i64 {
        let p = line.passing_or_zero();
        let r = line.rushing_or_zero();
        let c = line.receiving_or_zero();
        let d = line.defense_or_zero();
        let k = line.kicking_or_zero();
        match self {
            StatField::PassingYards => p.yards as i64,
            StatField::PassingTouchdowns => p.touchdowns as i64,
            StatField::PassingCompletions => p.completions as i64,
            StatField::InterceptionsThrown => p.interceptions as i64,
            StatField::RushingYards => r.yards as i64,
            StatField::RushingTouchdowns => r.touchdowns as i64,
            StatField::RushingAttempts => r.attempts as i64,
            StatField::Receptions => c.receptions as i64,
            StatField::ReceivingYards => c.yards as i64,
            StatField::ReceivingTouchdowns => c.touchdowns as i64,
            StatField::Sacks => d.sacks as i64,
            StatField::DefensiveInterceptions => d.interceptions as i64,
            StatField::DefensiveTouchdowns => d.touchdowns as i64,
            StatField::FieldGoalsMade => k.field_goals_made as i64,
            StatField::ScrimmageYards => r.yards as i64 + c.yards as i64,
            StatField::TotalTouchdowns => {
                r.touchdowns as i64 + c.touchdowns as i64 + d.touchdowns as i64
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatField::PassingYards => "passing yards",
            StatField::PassingTouchdowns => "passing touchdowns",
            StatField::PassingCompletions => "completions",
            StatField::InterceptionsThrown => "interceptions thrown",
            StatField::RushingYards => "rushing yards",
            StatField::RushingTouchdowns => "rushing touchdowns",
            StatField::RushingAttempts => "rushing attempts",
            StatField::Receptions => "receptions",
            StatField::ReceivingYards => "receiving yards",
            StatField::ReceivingTouchdowns => "receiving touchdowns",
            StatField::Sacks => "sacks",
            StatField::DefensiveInterceptions => "defensive interceptions",
            StatField::DefensiveTouchdowns => "defensive touchdowns",
            StatField::FieldGoalsMade => "field goals made",
            StatField::ScrimmageYards => "scrimmage yards",
            StatField::TotalTouchdowns => "total touchdowns",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
