//! Plate-appearance baseball simulation engine.
//!
//! Resolves every pitch of a game from player ratings, a play-balance
//! configuration snapshot and one random stream: pitch selection and
//! location, the batter's swing, batted-ball physics, fielding and
//! baserunning. Per-game accumulators are exposed read-only for aggregation;
//! the crate performs no I/O beyond its embedded default tables.

pub mod baserunning;
pub mod batter_ai;
pub mod config;
pub mod constants;
pub mod engine;
pub mod fielding_ai;
pub mod numbers;
pub mod physics;
pub mod pitcher_ai;
pub mod player;
pub mod rng;
pub mod stadium;
pub mod state;
pub mod stats;
pub mod strategy;
pub mod substitution;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use baserunning::{Baserunning, PickoffOutcome, PlayResult, StealOutcome};
pub use batter_ai::{BatterAI, PitchClass, SwingDecision};
pub use config::{ConfigError, ConfigTable};
pub use engine::ball_in_play::{BattedBall, BattedBallType, FieldingPlay};
pub use engine::count::{Count, CountEvent, CountState};
pub use engine::plate_appearance::{PlateAppearance, PlateAppearanceResult};
pub use engine::{GameSimulation, GameSummary, Half, SimulationError, TeamLine};
pub use fielding_ai::{CatchAction, CatchResult, FieldingAI};
pub use physics::{Physics, SwingType};
pub use pitcher_ai::{PitchSelection, PitcherAI};
pub use player::{
    BattingRatings, Hand, PitchType, Pitcher, PitchingRatings, Player, PlayerId, Position,
};
pub use rng::{CountingRng, GameRng, derive_game_seed};
pub use stadium::{Alignment, Environment, Stadium};
pub use state::{Base, BatterState, Bases, FieldingState, PitchCounters, PitcherState, TeamState};
pub use stats::{
    BattingRates, Benchmark, BenchmarkCheck, BenchmarkError, LeagueBenchmarks, LeagueRates,
    LeagueTotals, PitchingRates,
};
pub use strategy::{Manager, Situation};
pub use substitution::{FatigueBullpen, NoSubstitutions, SubstitutionPolicy};

/// One club as a roster source hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub name: String,
    pub lineup: Vec<Player>,
    #[serde(default)]
    pub bench: Vec<Player>,
    pub pitchers: Vec<Pitcher>,
}

impl TeamRoster {
    /// Fresh per-game state for this club.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::EmptyLineup`] when the lineup is empty.
    pub fn into_team_state(self) -> Result<TeamState, SimulationError> {
        TeamState::new(self.name, self.lineup, self.bench, self.pitchers)
    }
}

/// Trait for abstracting roster loading.
/// Platform-specific implementations should provide this
pub trait RosterLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the roster of club `team`.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be found or parsed.
    fn load_team(&self, team: &str) -> Result<TeamRoster, Self::Error>;
}

/// Failure to set up or play a game through [`GameEngine`].
#[derive(Debug, Error)]
pub enum EngineError<E: std::error::Error + 'static> {
    #[error("roster could not be loaded")]
    Roster(#[source] E),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// A finished game with both clubs' accumulators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedGame {
    pub seed: u64,
    pub summary: GameSummary,
    pub home: TeamState,
    pub away: TeamState,
    pub draws: u64,
    pub debug_log: Vec<String>,
}

/// Main engine wiring a roster source and a config snapshot into games.
pub struct GameEngine<L, P = NoSubstitutions>
where
    L: RosterLoader,
    P: SubstitutionPolicy + Clone,
{
    loader: L,
    policy: P,
    cfg: Arc<ConfigTable>,
}

impl<L, P> GameEngine<L, P>
where
    L: RosterLoader,
    P: SubstitutionPolicy + Clone,
{
    /// Create a new engine with the provided roster source, policy and config.
    pub const fn new(loader: L, policy: P, cfg: Arc<ConfigTable>) -> Self {
        Self {
            loader,
            policy,
            cfg,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<ConfigTable> {
        &self.cfg
    }

    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Set up game `game_index` of a run seeded with `run_seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Roster`] when either roster cannot be loaded and
    /// [`EngineError::Simulation`] when one is unusable.
    pub fn create_game(
        &self,
        home: &str,
        away: &str,
        run_seed: u64,
        game_index: u64,
    ) -> Result<GameSimulation<GameRng, P>, EngineError<L::Error>> {
        let home = self
            .loader
            .load_team(home)
            .map_err(EngineError::Roster)?
            .into_team_state()?;
        let away = self
            .loader
            .load_team(away)
            .map_err(EngineError::Roster)?
            .into_team_state()?;
        let seed = derive_game_seed(run_seed, game_index);
        Ok(GameSimulation::new(
            Arc::clone(&self.cfg),
            home,
            away,
            GameRng::from_user_seed(seed),
            self.policy.clone(),
        ))
    }

    /// Set up and play one game to completion.
    ///
    /// # Errors
    ///
    /// Returns whatever [`GameEngine::create_game`] or the game itself raises.
    pub fn play_game(
        &self,
        home: &str,
        away: &str,
        run_seed: u64,
        game_index: u64,
        innings: u8,
    ) -> Result<CompletedGame, EngineError<L::Error>> {
        let mut game = self.create_game(home, away, run_seed, game_index)?;
        let summary = game.simulate_game(innings)?;
        let draws = game.rng().draws();
        let debug_log = game.debug_log().to_vec();
        let (home, away) = game.into_teams();
        Ok(CompletedGame {
            seed: derive_game_seed(run_seed, game_index),
            summary,
            home,
            away,
            draws,
            debug_log,
        })
    }
}
