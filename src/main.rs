//! League derivation simulation.
//!
//! Builds a small season in the in-memory event store and walks every derived view:
//! player totals across a trade, standings, power rankings, leaders, the playoff
//! bracket with a corrected result, and the validation hook.

use gridiron_core::*;
use tracing_subscriber::EnvFilter;

const KICKOFF: Timestamp = Timestamp(1_725_750_000_000);

const HAWKS: TeamId = TeamId(1);
const BEARS: TeamId = TeamId(2);
const WOLVES: TeamId = TeamId(3);
const SHARKS: TeamId = TeamId(4);

const RUNNER: PlayerId = PlayerId(10);
const PASSER: PlayerId = PlayerId(11);
const CATCHER: PlayerId = PlayerId(12);
const BACKUP: PlayerId = PlayerId(13);

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridiron_core=info")))
        .init();

    println!("League Derivation Engine Simulation");
    println!("Four Teams, Six Weeks, One Trade\n");

    let engine = LeagueEngine::new(ScoringFormat::Ppr.config())?;
    let store = season();
    let snapshot = engine.snapshot(&store)?;

    scenario_1_trade_attribution(&engine, &snapshot)?;
    scenario_2_standings_and_rankings(&engine, &snapshot)?;
    scenario_3_leaders(&engine, &snapshot)?;
    scenario_4_playoffs(&engine, &store)?;
    scenario_5_validation(&engine, &snapshot);
    scenario_6_cache(&engine, &snapshot);

    println!("\nAll simulations completed successfully.");
    Ok(())
}

fn week(n: u32) -> Timestamp {
    KICKOFF.plus_days(7 * (n as i64 - 1))
}

fn rush(yards: i32, touchdowns: u32) -> StatLine {
    StatLine::zero().with_rushing(RushingStats {
        attempts: 18,
        yards,
        touchdowns,
        ..Default::default()
    })
}

fn pass(yards: i32, touchdowns: u32, interceptions: u32) -> StatLine {
    StatLine::zero().with_passing(PassingStats {
        attempts: 34,
        completions: 22,
        yards,
        touchdowns,
        interceptions,
        ..Default::default()
    })
}

fn catches(receptions: u32, yards: i32, touchdowns: u32) -> StatLine {
    StatLine::zero().with_receiving(ReceivingStats {
        targets: receptions + 3,
        receptions,
        yards,
        touchdowns,
        ..Default::default()
    })
}

// six-week season. the runner starts on the Hawks and is traded to the Bears before week 4
fn season() -> InMemoryEventStore {
    let mut store = InMemoryEventStore::new();
    store.add_team(Team::new(HAWKS, "Harbor Hawks", "HAR", "Coastal", "North"));
    store.add_team(Team::new(BEARS, "Ridge Bears", "RDG", "Coastal", "North"));
    store.add_team(Team::new(WOLVES, "Valley Wolves", "VAL", "Coastal", "South"));
    store.add_team(Team::new(SHARKS, "Bay Sharks", "BAY", "Coastal", "South"));

    store.add_player(Player::new(RUNNER, "R. Okafor", Position::RB, HAWKS).elite());
    store.add_player(Player::new(PASSER, "D. Lindqvist", Position::QB, BEARS));
    store.add_player(Player::new(CATCHER, "M. Tran", Position::WR, WOLVES));
    store.add_player(Player::new(BACKUP, "J. Pereira", Position::RB, SHARKS));

    // (week, home, away, home score, away score)
    let results = [
        (1, HAWKS, BEARS, 24, 17),
        (1, WOLVES, SHARKS, 31, 10),
        (2, HAWKS, WOLVES, 20, 27),
        (2, BEARS, SHARKS, 21, 14),
        (3, SHARKS, HAWKS, 13, 28),
        (3, WOLVES, BEARS, 17, 17),
        (4, BEARS, HAWKS, 30, 20),
        (4, SHARKS, WOLVES, 9, 23),
        (5, WOLVES, HAWKS, 14, 21),
        (5, SHARKS, BEARS, 6, 35),
        (6, HAWKS, SHARKS, 27, 3),
        (6, BEARS, WOLVES, 24, 20),
    ];

    for (i, (wk, home, away, hs, aws)) in results.into_iter().enumerate() {
        let mut game = Game::scheduled(GameId(i as u64 + 1), wk, home, away, week(wk)).final_score(hs, aws);
        let runner_team = if wk < 4 { HAWKS } else { BEARS };
        for (team, side) in [(home, Side::Home), (away, Side::Away)] {
            if team == runner_team {
                game = game.with_stats(side, RUNNER, rush(70 + 12 * wk as i32, wk % 2));
            }
            if team == BEARS {
                game = game.with_stats(side, PASSER, pass(210 + 15 * wk as i32, 2, wk % 3 / 2));
            }
            if team == WOLVES {
                game = game.with_stats(side, CATCHER, catches(5 + wk % 3, 60 + 9 * wk as i32, wk % 2));
            }
        }
        store.append_game(game);
    }

    store.append_trade(TradeRecord::new(TradeId(1), RUNNER, HAWKS, BEARS, week(4).plus_days(-2)));
    store
}

/// Season totals for a player traded mid-season.
fn scenario_1_trade_attribution(engine: &LeagueEngine, snapshot: &EventSnapshot) -> Result<(), EngineError> {
    println!("Scenario 1: Trade Attribution\n");

    let view = engine.view(snapshot);
    let totals = view.season_totals(RUNNER)?;

    println!("  {} played {} games for {} fantasy points", RUNNER, totals.games_played, totals.fantasy_points);
    for (team, line) in &totals.by_team {
        println!("  with {}: {} rushing yards", team, line.rushing_or_zero().yards);
    }
    for stint in view.history_of(RUNNER)? {
        let from = stint.from.map_or("setup".to_string(), |t| t.to_string());
        let until = stint.until.map_or("now".to_string(), |t| t.to_string());
        println!("  {} from {} until {}", stint.team_id, from, until);
    }
    println!("  Week 2 team: {}, current team: {}\n", view.team_of(RUNNER, week(2))?, view.current_team(RUNNER)?);
    Ok(())
}

/// Division standings and composite power rankings.
fn scenario_2_standings_and_rankings(engine: &LeagueEngine, snapshot: &EventSnapshot) -> Result<(), EngineError> {
    println!("Scenario 2: Standings and Power Rankings\n");

    let view = engine.view(snapshot);
    let standings = view.standings();
    for (key, rows) in &standings.divisions {
        println!("  {}", key);
        for row in rows {
            println!(
                "    {:<14} {}  PF {:>3}  PA {:>3}",
                row.team.name,
                row.record.summary(),
                row.record.points_for,
                row.record.points_against
            );
        }
    }

    println!();
    for ranking in view.rankings() {
        println!("  #{} {}: {}", ranking.rank, ranking.team_id, ranking.rationale);
    }

    let wolves = view.team_record(WOLVES)?;
    println!("  Wolves win pct: {}\n", wolves.win_pct().round_dp(3));
    Ok(())
}

/// Stat and fantasy leaders.
fn scenario_3_leaders(engine: &LeagueEngine, snapshot: &EventSnapshot) -> Result<(), EngineError> {
    println!("Scenario 3: Leaders\n");

    let view = engine.view(snapshot);
    for category in [
        LeaderCategory::FantasyPoints,
        LeaderCategory::Stat(StatField::ScrimmageYards),
        LeaderCategory::Stat(StatField::PassingYards),
    ] {
        println!("  {}", category);
        for leader in view.leaders(category, 3) {
            let name = view.player(leader.player_id)?.display_name.as_str();
            println!("    {:<14} {} in {} games", name, leader.value, leader.games_played);
        }
    }

    // listed on the roster, never played: zero line, no leader row
    let idle = view.season_totals(BACKUP)?;
    println!("  {} has {} games and {} points\n", BACKUP, idle.games_played, idle.fantasy_points);
    Ok(())
}

/// Playoff bracket seeded from standings, then a corrected semifinal.
fn scenario_4_playoffs(engine: &LeagueEngine, store: &InMemoryEventStore) -> Result<(), EngineError> {
    println!("Scenario 4: Playoff Bracket\n");

    let snapshot = engine.snapshot(store)?;
    let state = engine.view(&snapshot).bracket_state()?;
    println!("  Provisional: {}, seeds: {:?}", state.provisional, state.bracket.seeds());

    let mut store = store.clone();
    store.set_playoff_seeding(state.bracket.seeds().to_vec());
    let semis: Vec<(TeamId, TeamId)> = state
        .bracket
        .round(1)
        .iter()
        .filter_map(|m| Some((m.seed1?, m.seed2?)))
        .collect();

    let mut next_id = 100;
    for (i, (top, bottom)) in semis.iter().enumerate() {
        let game = Game::scheduled(GameId(next_id), 7, *top, *bottom, week(7).plus_days(i as i64))
            .final_score(27, 20)
            .playoff();
        store.append_game(game);
        next_id += 1;
    }

    let snapshot = engine.snapshot(&store)?;
    let state = engine.view(&snapshot).bracket_state()?;
    let final_matchup = state.bracket.final_matchup().ok_or(EngineError::MatchupNotFound(MatchupId(0)))?;
    println!("  Final: {:?} vs {:?}", final_matchup.seed1, final_matchup.seed2);

    let (Some(f1), Some(f2)) = (final_matchup.seed1, final_matchup.seed2) else {
        return Ok(());
    };
    store.append_game(Game::scheduled(GameId(next_id), 8, f1, f2, week(8)).final_score(24, 21).playoff());
    let snapshot = engine.snapshot(&store)?;
    let state = engine.view(&snapshot).bracket_state()?;
    println!("  Champion: {:?}", state.champion());

    // the score of the first semifinal is corrected: the other side won
    let mut bracket = state.bracket.clone();
    let outcome = bracket.record_result(MatchupId(1), 17, 20)?;
    println!(
        "  Correction on {}: winner {}, reset {:?}, champion now {:?}\n",
        outcome.matchup_id,
        outcome.winner,
        outcome.reset,
        bracket.champion()
    );
    Ok(())
}

/// The validation hook flags a box score that disagrees with the ledger.
fn scenario_5_validation(engine: &LeagueEngine, snapshot: &EventSnapshot) {
    println!("Scenario 5: Validation\n");

    // week 5 game listing the runner under the pre-trade team
    let stale = Game::scheduled(GameId(900), 5, HAWKS, SHARKS, week(5))
        .final_score(10, 7)
        .with_stats(Side::Home, RUNNER, rush(40, 0));
    let outcome = engine.validate_game(snapshot, &stale);
    println!("  Accepted: {}", outcome.is_accepted());
    for warning in outcome.warnings() {
        println!("  Warning: {}", warning);
    }

    let self_game = Game::scheduled(GameId(901), 5, HAWKS, HAWKS, week(5));
    if let Some(reason) = engine.validate_game(snapshot, &self_game).reason() {
        println!("  Rejected: {}", reason);
    }

    let view = engine.view(snapshot);
    println!("  Warnings already in the log: {}\n", view.warnings().len());
}

/// Repeated views over one snapshot reuse the folds.
fn scenario_6_cache(engine: &LeagueEngine, snapshot: &EventSnapshot) {
    println!("Scenario 6: Memoized Views\n");

    let before = engine.cache_stats();
    for _ in 0..5 {
        let _ = engine.view(snapshot).standings();
    }
    let after = engine.cache_stats();
    println!("  Hits: {} -> {}, misses: {} -> {}", before.hits, after.hits, before.misses, after.misses);
}
