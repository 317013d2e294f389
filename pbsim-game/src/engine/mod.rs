//! Game driver.
//!
//! [`GameSimulation`] owns both clubs, the config snapshot and the single
//! random stream for one game. It plays half innings until the game is
//! decided and hands each plate appearance to
//! [`plate_appearance`](self::plate_appearance).

pub mod ball_in_play;
pub mod count;
pub mod pitch;
pub mod plate_appearance;

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use serde::Serialize;
use thiserror::Error;

use crate::batter_ai::BatterAI;
use crate::config::ConfigTable;
use crate::constants::{
    DEBUG_ENV_VAR, DEFAULT_INNINGS, LOG_HALF_PA_CAP, LOG_HALF_RUN_CAP, OUTS_PER_HALF,
};
use crate::numbers::round_f64_to_u32;
use crate::pitcher_ai::PitcherAI;
use crate::player::PlayerId;
use crate::stadium::{Environment, Stadium};
use crate::state::TeamState;
use crate::substitution::{NoSubstitutions, SubstitutionPolicy};

use self::plate_appearance::{HalfInning, PlateAppearance};

/// Invariant violations that stop a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("team {team} has no batters in its lineup")]
    EmptyLineup { team: String },
    #[error("player {id} is not available on the roster")]
    UnknownPlayer { id: PlayerId },
    #[error("team {team} has no pitcher on the mound")]
    NoPitcher { team: String },
    #[error("pitcher {pitcher} has no pitch with a positive rating")]
    NoPitchTypes { pitcher: PlayerId },
}

#[cfg(debug_assertions)]
pub(crate) fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
pub(crate) const fn debug_log_enabled() -> bool {
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    Top,
    Bottom,
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
        }
    }
}

/// One club's row of the line score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamLine {
    pub name: String,
    pub innings: Vec<u32>,
    pub runs: u32,
    pub hits: u32,
    pub errors: u32,
    pub left_on_base: u32,
}

impl TeamLine {
    fn from_team(team: &TeamState) -> Self {
        Self {
            name: team.name().to_string(),
            innings: team.inning_runs().to_vec(),
            runs: team.runs(),
            hits: team.hits(),
            errors: team.errors(),
            left_on_base: team.left_on_base(),
        }
    }
}

/// Final line score of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub away: TeamLine,
    pub home: TeamLine,
    pub innings: u8,
    pub walk_off: bool,
}

impl GameSummary {
    /// Name of the winning club; `None` when the inning cap left a tie.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        match self.home.runs.cmp(&self.away.runs) {
            std::cmp::Ordering::Greater => Some(&self.home.name),
            std::cmp::Ordering::Less => Some(&self.away.name),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A single game between two clubs.
#[derive(Debug)]
pub struct GameSimulation<R: RngCore, P: SubstitutionPolicy = NoSubstitutions> {
    cfg: Arc<ConfigTable>,
    home: TeamState,
    away: TeamState,
    rng: R,
    policy: P,
    pitcher_ai: PitcherAI,
    batter_ai: BatterAI,
    stadium: Stadium,
    environment: Environment,
    debug_log: Vec<String>,
}

impl<R: RngCore, P: SubstitutionPolicy> GameSimulation<R, P> {
    pub fn new(cfg: Arc<ConfigTable>, home: TeamState, away: TeamState, rng: R, policy: P) -> Self {
        Self {
            cfg,
            home,
            away,
            rng,
            policy,
            pitcher_ai: PitcherAI::new(),
            batter_ai: BatterAI::new(),
            stadium: Stadium::default(),
            environment: Environment::default(),
            debug_log: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stadium(mut self, stadium: Stadium) -> Self {
        self.stadium = stadium;
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ConfigTable {
        &self.cfg
    }

    #[must_use]
    pub const fn home(&self) -> &TeamState {
        &self.home
    }

    #[must_use]
    pub const fn away(&self) -> &TeamState {
        &self.away
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    #[must_use]
    pub const fn stadium(&self) -> &Stadium {
        &self.stadium
    }

    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Cap trips, substitutions and (with `PBSIM_DEBUG` set in debug
    /// builds) per-pitch trace lines.
    #[must_use]
    pub fn debug_log(&self) -> &[String] {
        &self.debug_log
    }

    /// Hand back both clubs, home first.
    #[must_use]
    pub fn into_teams(self) -> (TeamState, TeamState) {
        (self.home, self.away)
    }

    fn half_inning(&mut self, half: Half, inning: u8, outs: u8) -> HalfInning<'_, R, P> {
        let (offense, defense) = match half {
            Half::Top => (&mut self.away, &mut self.home),
            Half::Bottom => (&mut self.home, &mut self.away),
        };
        HalfInning {
            cfg: &self.cfg,
            offense,
            defense,
            rng: &mut self.rng,
            policy: &self.policy,
            pitcher_ai: &mut self.pitcher_ai,
            batter_ai: &mut self.batter_ai,
            stadium: &self.stadium,
            environment: &self.environment,
            debug_log: &mut self.debug_log,
            inning,
            outs,
        }
    }

    /// Play the game: `innings` scheduled, extras up to `maxInnings`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SimulationError`] raised by a plate appearance.
    pub fn simulate_game(&mut self, innings: u8) -> Result<GameSummary, SimulationError> {
        let scheduled = scheduled_innings(innings);
        let cap = u8::try_from(round_f64_to_u32(self.cfg.get("maxInnings")))
            .unwrap_or(u8::MAX)
            .max(scheduled);
        let mut inning = 1_u8;
        let mut walk_off = false;
        loop {
            self.play_half_until(Half::Top, inning, None)?;
            let final_frame = inning >= scheduled;
            if final_frame && self.home.runs > self.away.runs {
                log::debug!("home leads after the top of {inning}; bottom half skipped");
                break;
            }
            let target = final_frame.then_some(self.away.runs);
            walk_off = self.play_half_until(Half::Bottom, inning, target)?;
            if walk_off || (final_frame && self.home.runs != self.away.runs) || inning >= cap {
                break;
            }
            inning += 1;
        }
        let summary = GameSummary {
            away: TeamLine::from_team(&self.away),
            home: TeamLine::from_team(&self.home),
            innings: inning,
            walk_off,
        };
        log::debug!(
            "final: {} {} - {} {} in {inning}{}",
            summary.away.name,
            summary.away.runs,
            summary.home.name,
            summary.home.runs,
            if walk_off { " (walk-off)" } else { "" }
        );
        Ok(summary)
    }

    /// Play one half inning to three outs or until a half-inning cap trips.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SimulationError`] raised by a plate appearance.
    pub fn play_half(&mut self, half: Half, inning: u8) -> Result<(), SimulationError> {
        self.play_half_until(half, inning, None).map(|_| ())
    }

    /// Half inning that stops early once the batting side's runs pass
    /// `walk_off_target`. Returns whether that happened.
    fn play_half_until(
        &mut self,
        half: Half,
        inning: u8,
        walk_off_target: Option<u32>,
    ) -> Result<bool, SimulationError> {
        let limited = self.cfg.flag("halfInningLimitEnabled");
        let max_pa = round_f64_to_u32(self.cfg.get("maxHalfInningPA"));
        let max_runs = round_f64_to_u32(self.cfg.get("maxHalfInningRuns"));
        let mut frame = self.half_inning(half, inning, 0);
        frame.offense.inning_runs.push(0);
        let mut plate_appearances = 0_u32;
        let mut walk_off = false;
        while frame.outs < OUTS_PER_HALF {
            if limited && plate_appearances >= max_pa {
                let message = format!(
                    "{LOG_HALF_PA_CAP}: {} {half} {inning} after {plate_appearances} \
                     plate appearances",
                    frame.offense.name()
                );
                log::debug!("{message}");
                frame.debug_log.push(message);
                break;
            }
            let inning_runs = frame.offense.inning_runs.last().copied().unwrap_or(0);
            if limited && inning_runs >= max_runs {
                let message = format!(
                    "{LOG_HALF_RUN_CAP}: {} {half} {inning} after {inning_runs} runs",
                    frame.offense.name()
                );
                log::debug!("{message}");
                frame.debug_log.push(message);
                break;
            }
            frame.play_plate_appearance()?;
            plate_appearances += 1;
            if walk_off_target.is_some_and(|target| frame.offense.runs > target) {
                walk_off = true;
                break;
            }
        }
        let stranded = frame.offense.bases.clear();
        frame.offense.left_on_base += stranded;
        log::trace!(
            "end of {half} {inning}: {} run(s), {stranded} left on base",
            frame.offense.inning_runs.last().copied().unwrap_or(0)
        );
        Ok(walk_off)
    }

    /// Play a single plate appearance with `outs` already recorded. The bases
    /// carry over from whatever the previous play left.
    ///
    /// # Errors
    ///
    /// Returns the [`SimulationError`] raised while resolving it.
    pub fn play_at_bat(
        &mut self,
        half: Half,
        inning: u8,
        outs: u8,
    ) -> Result<PlateAppearance, SimulationError> {
        let mut frame = self.half_inning(half, inning, outs);
        if frame.offense.inning_runs.is_empty() {
            frame.offense.inning_runs.push(0);
        }
        frame.play_plate_appearance()
    }
}

impl<R: RngCore> GameSimulation<R, NoSubstitutions> {
    /// Game with both rosters fixed for all nine innings.
    pub fn without_substitutions(
        cfg: Arc<ConfigTable>,
        home: TeamState,
        away: TeamState,
        rng: R,
    ) -> Self {
        Self::new(cfg, home, away, rng, NoSubstitutions)
    }
}

/// Innings a game is scheduled for when the caller passes zero.
#[must_use]
pub const fn scheduled_innings(innings: u8) -> u8 {
    if innings == 0 { DEFAULT_INNINGS } else { innings }
}
