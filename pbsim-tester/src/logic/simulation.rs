use anyhow::{Context, Result};
use pbsim_game::{
    BenchmarkCheck, ConfigTable, FatigueBullpen, GameEngine, LeagueBenchmarks, LeagueRates,
    LeagueTotals,
};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::rosters::{GeneratedRosters, pairing};
use super::seeds::SeedInfo;
use crate::scenarios::Scenario;

/// Knobs shared by every scenario of one tester invocation.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub games: u64,
    pub innings: u8,
    pub verbose: bool,
}

/// Outcome of one scenario under one run seed.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub seed_token: String,
    pub games_played: u64,
    pub plate_appearances: u64,
    pub extra_inning_games: u64,
    pub walk_offs: u64,
    pub tied_games: u64,
    pub average_draws: f64,
    pub rates: LeagueRates,
    pub checks: Vec<BenchmarkCheck>,
    pub passed: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ScenarioResult {
    pub fn misses(&self) -> impl Iterator<Item = &BenchmarkCheck> {
        self.checks.iter().filter(|check| !check.passed())
    }

    pub fn checks_passed(&self) -> usize {
        self.checks.iter().filter(|check| check.passed()).count()
    }
}

/// Simulate `settings.games` games of `scenario` and compare the league
/// rates with `benchmarks`.
///
/// # Errors
///
/// Returns an error if a roster cannot be produced or a game fails.
#[allow(clippy::cast_precision_loss)]
pub fn run_scenario(
    cfg: &Arc<ConfigTable>,
    benchmarks: &LeagueBenchmarks,
    scenario: &Scenario,
    seed: &SeedInfo,
    settings: &RunSettings,
) -> Result<ScenarioResult> {
    let start = Instant::now();
    let loader = GeneratedRosters::new(scenario.key, seed.seed, scenario.profile);
    let engine = GameEngine::new(loader, FatigueBullpen::default(), Arc::clone(cfg));

    let mut totals = LeagueTotals::default();
    let mut extra_inning_games = 0_u64;
    let mut walk_offs = 0_u64;
    let mut tied_games = 0_u64;
    let mut draws = 0_u64;

    for game_index in 0..settings.games {
        let (home, away) = pairing(game_index);
        let game = engine
            .play_game(home, away, seed.seed, game_index, settings.innings)
            .with_context(|| {
                format!(
                    "{} seed {} game {game_index} ({away} at {home}) failed",
                    scenario.key, seed.seed
                )
            })?;

        totals.absorb_game(&game.home, &game.away);
        draws += game.draws;
        if game.summary.innings > settings.innings {
            extra_inning_games += 1;
        }
        if game.summary.walk_off {
            walk_offs += 1;
        }
        if game.summary.winner().is_none() {
            tied_games += 1;
        }
        log::debug!(
            "{} seed {} game {game_index}: {} {} - {} {} ({} inn, {} draws, {} moves)",
            scenario.key,
            seed.seed,
            game.summary.away.name,
            game.summary.away.runs,
            game.summary.home.name,
            game.summary.home.runs,
            game.summary.innings,
            game.draws,
            game.debug_log.len()
        );
        if settings.verbose {
            println!(
                "  ⚾ Game {}/{}: {} {} @ {} {} ({} inn)",
                game_index + 1,
                settings.games,
                game.summary.away.name,
                game.summary.away.runs,
                game.summary.home.name,
                game.summary.home.runs,
                game.summary.innings
            );
        }
    }

    let rates = totals.rates();
    let checks = benchmarks.compare(&rates);
    let passed = checks.iter().all(BenchmarkCheck::passed);
    let average_draws = if settings.games == 0 {
        0.0
    } else {
        draws as f64 / settings.games as f64
    };
    log::info!(
        "{} seed {}: {} games, {}/{} benchmarks within tolerance",
        scenario.key,
        seed.seed,
        totals.games,
        checks.iter().filter(|c| c.passed()).count(),
        checks.len()
    );

    Ok(ScenarioResult {
        scenario_name: scenario.key.to_string(),
        seed: seed.seed,
        seed_token: seed.token.clone(),
        games_played: totals.games,
        plate_appearances: totals.batting.pa,
        extra_inning_games,
        walk_offs,
        tied_games,
        average_draws,
        rates,
        checks,
        passed,
        duration: start.elapsed(),
    })
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    duration.as_millis().serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::get_scenario;

    fn settings(games: u64) -> RunSettings {
        RunSettings {
            games,
            innings: 9,
            verbose: false,
        }
    }

    #[test]
    fn scenario_runs_are_reproducible() {
        let cfg = Arc::new(ConfigTable::defaults());
        let benchmarks = LeagueBenchmarks::default();
        let scenario = get_scenario("league").unwrap();
        let seed = SeedInfo::new(99, "99");
        let first = run_scenario(&cfg, &benchmarks, &scenario, &seed, &settings(6)).unwrap();
        let again = run_scenario(&cfg, &benchmarks, &scenario, &seed, &settings(6)).unwrap();
        assert_eq!(first.games_played, 6);
        assert_eq!(first.rates, again.rates);
        assert_eq!(first.checks, again.checks);
        assert!(first.plate_appearances >= 6 * 51);
        assert_eq!(first.checks.len(), benchmarks.len());
        assert_eq!(first.passed, first.misses().next().is_none());
    }

    #[test]
    fn zero_games_produce_empty_totals() {
        let cfg = Arc::new(ConfigTable::defaults());
        let scenario = get_scenario("aces").unwrap();
        let result = run_scenario(
            &cfg,
            &LeagueBenchmarks::default(),
            &scenario,
            &SeedInfo::new(1, "1"),
            &settings(0),
        )
        .unwrap();
        assert_eq!(result.games_played, 0);
        assert_eq!(result.plate_appearances, 0);
        assert!(result.average_draws.abs() < f64::EPSILON);
    }

    #[test]
    fn power_lineups_hit_more_home_runs_than_contact_lineups() {
        let cfg = Arc::new(ConfigTable::defaults());
        let benchmarks = LeagueBenchmarks::default();
        let seed = SeedInfo::new(2024, "2024");
        let power = get_scenario("power").unwrap();
        let contact = get_scenario("contact").unwrap();
        let power = run_scenario(&cfg, &benchmarks, &power, &seed, &settings(30)).unwrap();
        let contact = run_scenario(&cfg, &benchmarks, &contact, &seed, &settings(30)).unwrap();
        assert!(power.rates.batting.hr_pct >= contact.rates.batting.hr_pct);
    }

    #[test]
    fn result_serializes_duration_as_millis() {
        let cfg = Arc::new(ConfigTable::defaults());
        let scenario = get_scenario("league").unwrap();
        let result = run_scenario(
            &cfg,
            &LeagueBenchmarks::default(),
            &scenario,
            &SeedInfo::new(5, "5"),
            &settings(1),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["duration"].is_u64());
        assert_eq!(json["scenario_name"], "league");
        assert!(json["checks"].is_array());
    }
}
