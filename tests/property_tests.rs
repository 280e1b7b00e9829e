//! Property-based tests for the derivation folds.
//!
//! These tests verify invariants hold under random seasons and stat lines.

use gridiron_core::*;
use proptest::prelude::*;

// Strategies for generating test data
fn passing_strategy() -> impl Strategy<Value = PassingStats> {
    (0u32..60, -20i32..500, 0u32..6, 0u32..4, 0u32..2).prop_map(|(attempts, yards, touchdowns, interceptions, two)| {
        PassingStats {
            attempts,
            completions: attempts / 2,
            yards,
            touchdowns,
            interceptions,
            two_point_conversions: two,
        }
    })
}

fn rushing_strategy() -> impl Strategy<Value = RushingStats> {
    (0u32..35, -15i32..250, 0u32..4, 0u32..3).prop_map(|(attempts, yards, touchdowns, fumbles)| RushingStats {
        attempts,
        yards,
        touchdowns,
        fumbles_lost: fumbles,
        two_point_conversions: 0,
    })
}

fn receiving_strategy() -> impl Strategy<Value = ReceivingStats> {
    (0u32..15, -10i32..220, 0u32..3).prop_map(|(receptions, yards, touchdowns)| ReceivingStats {
        targets: receptions + 2,
        receptions,
        yards,
        touchdowns,
        fumbles_lost: 0,
        two_point_conversions: 0,
    })
}

fn defense_strategy() -> impl Strategy<Value = DefenseStats> {
    (0u32..6, 0u32..3, 0u32..3, 0u32..2, 0u32..2).prop_map(|(sacks, ints, recoveries, tds, safeties)| DefenseStats {
        sacks,
        interceptions: ints,
        fumble_recoveries: recoveries,
        touchdowns: tds,
        safeties,
    })
}

fn stat_line_strategy() -> impl Strategy<Value = StatLine> {
    (
        prop::option::of(passing_strategy()),
        prop::option::of(rushing_strategy()),
        prop::option::of(receiving_strategy()),
        prop::option::of(defense_strategy()),
    )
        .prop_map(|(passing, rushing, receiving, defense)| StatLine {
            passing,
            rushing,
            receiving,
            defense,
            kicking: None,
        })
}

const TEAMS: u32 = 6;
const PLAYERS: u32 = 8;

fn ts(n: i64) -> Timestamp {
    Timestamp::from_millis(n * 1_000)
}

// (home, away offset, home score, away score, box score)
type GameSpec = (u32, u32, u32, u32, Vec<(u32, StatLine)>);

fn game_strategy() -> impl Strategy<Value = GameSpec> {
    (
        1..=TEAMS,
        1..TEAMS,
        0u32..45,
        0u32..45,
        prop::collection::vec((1..=PLAYERS, stat_line_strategy()), 0..4),
    )
}

fn trade_strategy() -> impl Strategy<Value = (u32, u32, i64)> {
    (1..=PLAYERS, 1..=TEAMS, 0i64..400)
}

fn season(games: &[GameSpec], trades: &[(u32, u32, i64)]) -> EventSnapshot {
    let teams = (1..=TEAMS)
        .map(|i| Team::new(TeamId(i), format!("Team {}", i), format!("T{}", i), "Conf", if i % 2 == 0 { "Even" } else { "Odd" }))
        .collect();
    let players = (1..=PLAYERS)
        .map(|i| Player::new(PlayerId(i), format!("Player {}", i), Position::WR, TeamId((i - 1) % TEAMS + 1)))
        .collect();

    let games = games
        .iter()
        .enumerate()
        .map(|(i, (home, offset, hs, aws, lines))| {
            let away = (home - 1 + offset) % TEAMS + 1;
            let mut game = Game::scheduled(GameId(i as u64 + 1), i as u32 / 3 + 1, TeamId(*home), TeamId(away), ts(i as i64 * 10 + 5))
                .final_score(*hs, *aws);
            let mut seen = std::collections::BTreeSet::new();
            for (player, line) in lines {
                if seen.insert(*player) {
                    game = game.with_stats(Side::Home, PlayerId(*player), *line);
                }
            }
            game
        })
        .collect();

    let trades = trades
        .iter()
        .enumerate()
        .map(|(i, (player, to, at))| TradeRecord::new(TradeId(i as u64 + 1), PlayerId(*player), TeamId(1), TeamId(*to), ts(*at)))
        .collect();

    EventSnapshot {
        teams,
        players,
        games,
        trades,
        playoff_seeding: None,
    }
}

fn engine(memoize: bool) -> LeagueEngine {
    let mut config = LeagueConfig::default();
    config.engine.memoize = memoize;
    LeagueEngine::new(config).unwrap()
}

proptest! {
    /// Scoring is linear: the score of a sum is the sum of the scores.
    #[test]
    fn scoring_is_linear(a in stat_line_strategy(), b in stat_line_strategy()) {
        for table in [ScoringTable::ppr(), ScoringTable::half_ppr(), ScoringTable::standard()] {
            let scorer = FantasyScorer::new(table).unwrap();
            prop_assert_eq!(scorer.score(&(a + b)), scorer.score(&a) + scorer.score(&b));
        }
    }

    /// Lost yardage always costs points; there is no floor at zero.
    #[test]
    fn negative_yards_lower_the_score(yards in -30i32..0) {
        let scorer = FantasyScorer::new(ScoringTable::ppr()).unwrap();
        let line = StatLine::zero().with_rushing(RushingStats { yards, ..Default::default() });
        prop_assert!(scorer.score(&line).is_negative());
        prop_assert!(scorer.score(&line) < scorer.score(&StatLine::zero()));
    }

    /// Every completed game produces exactly one win and one loss, or two ties.
    #[test]
    fn records_balance(games in prop::collection::vec(game_strategy(), 0..40)) {
        let snapshot = season(&games, &[]);
        let records = compute_records(&snapshot);

        let wins: u32 = records.values().map(|r| r.wins).sum();
        let losses: u32 = records.values().map(|r| r.losses).sum();
        let ties: u32 = records.values().map(|r| r.ties).sum();
        let games_played: u32 = records.values().map(|r| r.games_played()).sum();
        let pf: u64 = records.values().map(|r| r.points_for).sum();
        let pa: u64 = records.values().map(|r| r.points_against).sum();

        prop_assert_eq!(wins, losses);
        prop_assert_eq!(ties % 2, 0);
        prop_assert_eq!(games_played as usize, 2 * games.len());
        prop_assert_eq!(pf, pa);
    }

    /// The log order of games never changes standings or rankings.
    #[test]
    fn standings_ignore_log_order(
        (games, order) in prop::collection::vec(game_strategy(), 1..25).prop_flat_map(|g| {
            let n = g.len();
            (Just(g), Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
        })
    ) {
        let engine = engine(false);
        let original = season(&games, &[]);
        let mut reordered = original.clone();
        reordered.games = order.iter().map(|&i| original.games[i].clone()).collect();

        let a = engine.view(&original);
        let b = engine.view(&reordered);
        prop_assert_eq!(a.standings(), b.standings());
        prop_assert_eq!(a.rankings(), b.rankings());
        prop_assert_eq!(a.aggregates(), b.aggregates());
    }

    /// Deriving twice from one snapshot gives identical views, with or without the cache.
    #[test]
    fn derivation_is_idempotent(
        games in prop::collection::vec(game_strategy(), 0..20),
        trades in prop::collection::vec(trade_strategy(), 0..6),
    ) {
        let snapshot = season(&games, &trades);
        let cached = engine(true);
        let fresh = engine(false);

        let first = cached.view(&snapshot);
        let second = cached.view(&snapshot);
        let uncached = fresh.view(&snapshot);

        prop_assert_eq!(first.aggregates(), second.aggregates());
        prop_assert_eq!(first.aggregates(), uncached.aggregates());
        prop_assert_eq!(first.standings(), uncached.standings());
        prop_assert_eq!(first.rankings(), uncached.rankings());
        prop_assert_eq!(cached.cache_stats().hits, 1);
    }

    /// Each game is credited to the team the ledger had at the game's timestamp.
    #[test]
    fn games_attributed_through_ledger(
        games in prop::collection::vec(game_strategy(), 1..20),
        trades in prop::collection::vec(trade_strategy(), 0..8),
    ) {
        let snapshot = season(&games, &trades);
        let engine = engine(false);
        let view = engine.view(&snapshot);

        for totals in view.aggregates().iter() {
            for entry in &totals.game_log {
                let expected = view.team_of(totals.player_id, entry.timestamp).unwrap();
                prop_assert_eq!(entry.team_id, expected);
            }
            let per_team: StatLine = totals.by_team.values().copied().sum();
            prop_assert_eq!(per_team, totals.stats);
        }
    }

    /// Intervals from history_of tile the timeline and agree with team_of.
    #[test]
    fn history_agrees_with_team_of(
        trades in prop::collection::vec(trade_strategy(), 0..10),
        probes in prop::collection::vec(-10i64..420, 1..30),
    ) {
        let snapshot = season(&[], &trades);
        let ledger = TeamHistoryLedger::build(&snapshot);

        for player in 1..=PLAYERS {
            let history = ledger.history_of(PlayerId(player)).unwrap();
            prop_assert!(history[0].from.is_none());
            prop_assert!(history.last().map_or(false, |i| i.is_open()));
            for pair in history.windows(2) {
                prop_assert_eq!(pair[0].until, pair[1].from);
                prop_assert_ne!(pair[0].team_id, pair[1].team_id);
            }
            for probe in &probes {
                let at = ts(*probe);
                let team = ledger.team_of(PlayerId(player), at).unwrap();
                let covering: Vec<&TeamInterval> = history.iter().filter(|i| i.contains(at)).collect();
                prop_assert_eq!(covering.len(), 1);
                prop_assert_eq!(covering[0].team_id, team);
            }
        }
    }

    /// Leaders come out value descending with player id breaking ties.
    #[test]
    fn leaders_are_totally_ordered(games in prop::collection::vec(game_strategy(), 1..20)) {
        let snapshot = season(&games, &[]);
        let engine = engine(false);
        let view = engine.view(&snapshot);

        for category in [LeaderCategory::FantasyPoints, LeaderCategory::Stat(StatField::ScrimmageYards)] {
            let leaders = view.leaders(category, PLAYERS as usize);
            for pair in leaders.windows(2) {
                prop_assert!(pair[0].value >= pair[1].value);
                if pair[0].value == pair[1].value {
                    prop_assert!(pair[0].player_id < pair[1].player_id);
                }
            }
            prop_assert!(leaders.iter().all(|l| l.games_played > 0));
        }
    }
}
