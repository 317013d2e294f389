//! Bullpen and bench policy seam.
//!
//! The engine asks the policy at fixed points before every plate appearance
//! and carries out whatever it returns. Policies never touch the game stream:
//! their decisions are deterministic functions of the game state.

use crate::config::ConfigTable;
use crate::constants::TOAST_INNING_KEYS;
use crate::physics::{Fatigue, Physics};
use crate::player::{PlayerId, Position};
use crate::state::{Base, TeamState};
use crate::strategy::Situation;

/// Inning from which [`FatigueBullpen`] uses its bench.
const BENCH_INNING: u8 = 7;

/// Decisions owned by a club's manager rather than the physics of the play.
///
/// Every method defaults to "no change".
pub trait SubstitutionPolicy {
    /// Reliever to bring in before the next batter, if any.
    fn maybe_replace_pitcher(
        &self,
        cfg: &ConfigTable,
        defense: &TeamState,
        inning: u8,
    ) -> Option<PlayerId> {
        let _ = (cfg, defense, inning);
        None
    }

    /// Bench player to bat in lineup slot `slot` instead of the batter due up.
    fn maybe_pinch_hit(
        &self,
        cfg: &ConfigTable,
        offense: &TeamState,
        slot: usize,
        situation: &Situation<'_>,
    ) -> Option<PlayerId> {
        let _ = (cfg, offense, slot, situation);
        None
    }

    /// Bench player to run for the runner on a base.
    fn maybe_pinch_run(
        &self,
        cfg: &ConfigTable,
        offense: &TeamState,
        situation: &Situation<'_>,
    ) -> Option<(Base, PlayerId)> {
        let _ = (cfg, offense, situation);
        None
    }
}

/// Leaves both rosters alone for the whole game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSubstitutions;

impl SubstitutionPolicy for NoSubstitutions {}

/// Pulls a starter whose toast points sink below the inning's threshold, and
/// any pitcher who is out of gas; late in close games it also pinch-hits for
/// the pitcher and pinch-runs for slow runners in scoring position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatigueBullpen {
    /// Largest speed gap worth a pinch runner.
    pub pinch_run_speed_gap: u8,
    /// Runners at or above this speed are never replaced.
    pub pinch_run_max_speed: u8,
}

impl Default for FatigueBullpen {
    fn default() -> Self {
        Self {
            pinch_run_speed_gap: 20,
            pinch_run_max_speed: 40,
        }
    }
}

impl FatigueBullpen {
    /// Toast threshold below which a starter is removed in `inning`.
    #[must_use]
    pub fn toast_threshold(cfg: &ConfigTable, inning: u8) -> f64 {
        let key = inning.clamp(1, TOAST_INNING_KEYS);
        cfg.get(&format!("starterToastThreshInn{key}"))
    }

    fn should_pull(cfg: &ConfigTable, defense: &TeamState, inning: u8) -> bool {
        let (Some(pitcher), Some(state)) =
            (defense.current_pitcher(), defense.current_pitcher_state())
        else {
            return false;
        };
        let (_, fatigue) =
            Physics::new(cfg).pitcher_fatigue(pitcher.ratings.endurance, state.pitches_thrown());
        if fatigue == Fatigue::Exhausted {
            return true;
        }
        state.started && state.toast < Self::toast_threshold(cfg, inning)
    }
}

impl SubstitutionPolicy for FatigueBullpen {
    fn maybe_replace_pitcher(
        &self,
        cfg: &ConfigTable,
        defense: &TeamState,
        inning: u8,
    ) -> Option<PlayerId> {
        if !Self::should_pull(cfg, defense, inning) {
            return None;
        }
        defense
            .available_relievers()
            .max_by_key(|pitcher| pitcher.ratings.endurance)
            .map(|pitcher| pitcher.id().clone())
    }

    fn maybe_pinch_hit(
        &self,
        _cfg: &ConfigTable,
        offense: &TeamState,
        slot: usize,
        situation: &Situation<'_>,
    ) -> Option<PlayerId> {
        if situation.inning < BENCH_INNING || situation.run_diff.abs() > 2 {
            return None;
        }
        let due = offense.lineup().get(slot)?;
        if due.primary_position != Position::Pitcher {
            return None;
        }
        offense
            .bench()
            .iter()
            .filter(|player| player.primary_position != Position::Pitcher)
            .max_by_key(|player| u16::from(player.ratings.ch) + u16::from(player.ratings.ph))
            .map(|player| player.id.clone())
    }

    fn maybe_pinch_run(
        &self,
        _cfg: &ConfigTable,
        offense: &TeamState,
        situation: &Situation<'_>,
    ) -> Option<(Base, PlayerId)> {
        if situation.inning < BENCH_INNING || situation.run_diff.abs() > 1 {
            return None;
        }
        let fastest = offense
            .bench()
            .iter()
            .filter(|player| player.primary_position != Position::Pitcher)
            .max_by_key(|player| player.ratings.sp)?;
        [Base::Third, Base::Second]
            .into_iter()
            .find_map(|base| {
                let runner = situation.bases.runner(base)?;
                let sp = offense.ratings_of(&runner.id).sp;
                (sp < self.pinch_run_max_speed
                    && fastest.ratings.sp >= sp.saturating_add(self.pinch_run_speed_gap))
                .then_some(base)
            })
            .map(|base| (base, fastest.id.clone()))
    }
}
