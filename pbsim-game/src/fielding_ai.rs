//! Defensive decisions from timing margins.
//!
//! Slop constants in the play-balance table are hundredths of a second and
//! are added to the defensive side of each comparison; negative values favor
//! the defense.

use crate::config::ConfigTable;
use crate::numbers::clamp01;
use crate::player::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchAction {
    Catch,
    Dive,
    Leap,
    NoAttempt,
}

impl CatchAction {
    #[must_use]
    pub const fn attempted(self) -> bool {
        !matches!(self, Self::NoAttempt)
    }
}

/// Result of one fielding roll on an attempted catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchResult {
    Out,
    Hit,
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldingAI<'a> {
    cfg: &'a ConfigTable,
}

impl<'a> FieldingAI<'a> {
    #[must_use]
    pub const fn new(cfg: &'a ConfigTable) -> Self {
        Self { cfg }
    }

    fn slop(&self, key: &str) -> f64 {
        self.cfg.get(key) / 100.0
    }

    /// Choose how to play a ball that arrives after `hang_time` seconds when the
    /// fielder needs `run_time` seconds to get there.
    ///
    /// `leap` marks a ball that has to be taken above standing reach (at the
    /// wall, or a liner over an infielder); a stretched play then becomes a leap.
    #[must_use]
    pub fn catch_action(&self, hang_time: f64, run_time: f64, leap: bool) -> CatchAction {
        let arrival = run_time + self.slop("generalSlop");
        if arrival + self.slop("shouldBeCaughtSlop") <= hang_time {
            if leap {
                CatchAction::Leap
            } else {
                CatchAction::Catch
            }
        } else if arrival + self.slop("couldBeCaughtSlop") <= hang_time {
            if leap {
                CatchAction::Leap
            } else {
                CatchAction::Dive
            }
        } else {
            CatchAction::NoAttempt
        }
    }

    /// Whether a fielder at `position` should go after a ball landing
    /// `landing_dist` feet from home when it is `run_dist` feet away.
    #[must_use]
    pub fn should_chase_ball(&self, position: Position, landing_dist: f64, run_dist: f64) -> bool {
        if position.is_outfield() {
            landing_dist >= self.cfg.get("outfieldMinChaseDist")
        } else if position == Position::Pitcher {
            run_dist <= self.cfg.get("pitcherMaxChaseDist")
        } else {
            run_dist <= self.cfg.get("infieldMaxChaseDist")
        }
    }

    /// Probability that an attempted play is made cleanly.
    ///
    /// `time` is the ball's hang time (or a throw's travel time) and
    /// `run_dist` how far the fielder moved; routine plays within
    /// `automaticCatchDist` feet always succeed.
    #[must_use]
    pub fn catch_probability(
        &self,
        position: Position,
        fa: u8,
        time: f64,
        action: CatchAction,
        run_dist: f64,
    ) -> f64 {
        if action == CatchAction::NoAttempt {
            return 0.0;
        }
        if action == CatchAction::Catch && run_dist <= self.cfg.get("automaticCatchDist") {
            return 1.0;
        }
        let divisor = self.cfg.get("catchFADiv");
        let mut chance = self.cfg.get("catchBaseChance");
        if divisor > 0.0 {
            chance += f64::from(fa) / divisor;
        }
        if time < 1.0 {
            chance += self.cfg.get("catchLessThan1SecAdjust");
            let tenths = ((1.0 - time.max(0.0)) * 10.0).floor();
            chance += tenths * self.cfg.get("catchPerTenthAdjust");
        }
        chance += match action {
            CatchAction::Dive => self.cfg.get("catchDivingAdjust"),
            CatchAction::Leap => self.cfg.get("catchLeapingAdjust"),
            CatchAction::Catch | CatchAction::NoAttempt => 0.0,
        };
        chance += self
            .cfg
            .get(&format!("catch{}Adjust", position.config_suffix()));
        clamp01(chance / 100.0)
    }

    /// Interpret one fielding roll against the catch probability.
    ///
    /// The league-wide out rate for the batted-ball type scales the chance of an
    /// out; a play that would have been made without that scaling falls in for
    /// a hit. Misses on routine plays are errors, misses on dives and leaps are
    /// hits.
    #[must_use]
    pub fn resolve_catch(
        &self,
        roll: f64,
        probability: f64,
        out_scale: f64,
        action: CatchAction,
    ) -> CatchResult {
        let scaled = clamp01(probability * out_scale);
        if roll < scaled {
            CatchResult::Out
        } else if roll < clamp01(probability) {
            CatchResult::Hit
        } else if action == CatchAction::Catch {
            CatchResult::Error
        } else {
            CatchResult::Hit
        }
    }

    /// Chance that a throw is on target.
    #[must_use]
    pub fn good_throw_chance(&self, fa: u8) -> f64 {
        clamp01(
            (self.cfg.get("goodThrowBase") + f64::from(fa) * self.cfg.get("goodThrowFAPct") / 100.0)
                / 100.0,
        )
    }

    /// A relay is worth it when the relay arrives before the runner.
    #[must_use]
    pub fn should_relay_throw(&self, fielder_time: f64, runner_time: f64) -> bool {
        fielder_time + self.slop("generalSlop") + self.slop("relaySlop") <= runner_time
    }

    /// A throw to a tagging fielder beats the runner.
    #[must_use]
    pub fn should_tag_runner(&self, fielder_time: f64, runner_time: f64) -> bool {
        fielder_time + self.slop("generalSlop") + self.slop("tagTimeSlop") <= runner_time
    }

    /// The fielder can reach the bag unassisted before the runner gets there.
    #[must_use]
    pub fn should_run_to_bag(&self, fielder_time: f64, runner_time: f64) -> bool {
        fielder_time + self.slop("generalSlop") + self.slop("stepOnBagSlop") <= runner_time
    }

    /// A throw to a covering fielder beats the runner on a force.
    #[must_use]
    pub fn throw_beats_runner(&self, throw_arrival: f64, runner_time: f64) -> bool {
        throw_arrival + self.slop("generalSlop") + self.slop("throwToBagSlop") <= runner_time
    }

    /// A tag-up runner is beaten by the throw to the bag ahead.
    #[must_use]
    pub fn throw_beats_tag_up(&self, throw_arrival: f64, runner_time: f64) -> bool {
        throw_arrival + self.slop("generalSlop") + self.slop("tagAtBagSlop") <= runner_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_follow_timing_margin() {
        let cfg = ConfigTable::defaults();
        let ai = FieldingAI::new(&cfg);
        assert_eq!(ai.catch_action(4.0, 3.0, false), CatchAction::Catch);
        assert_eq!(ai.catch_action(3.0, 3.0, false), CatchAction::Dive);
        assert_eq!(ai.catch_action(3.0, 3.0, true), CatchAction::Leap);
        assert_eq!(ai.catch_action(2.0, 3.0, false), CatchAction::NoAttempt);
        assert!(!CatchAction::NoAttempt.attempted());
    }

    #[test]
    fn chase_limits_depend_on_position_group() {
        let cfg = ConfigTable::defaults();
        let ai = FieldingAI::new(&cfg);
        assert!(!ai.should_chase_ball(Position::CenterField, 100.0, 200.0));
        assert!(ai.should_chase_ball(Position::CenterField, 250.0, 60.0));
        assert!(ai.should_chase_ball(Position::Pitcher, 70.0, 40.0));
        assert!(!ai.should_chase_ball(Position::Pitcher, 130.0, 80.0));
        assert!(ai.should_chase_ball(Position::ShortStop, 150.0, 100.0));
        assert!(!ai.should_chase_ball(Position::ShortStop, 250.0, 130.0));
    }

    #[test]
    fn catch_probability_penalizes_hard_plays() {
        let cfg = ConfigTable::defaults();
        let ai = FieldingAI::new(&cfg);
        let routine = ai.catch_probability(Position::LeftField, 50, 3.0, CatchAction::Catch, 40.0);
        let dive = ai.catch_probability(Position::LeftField, 50, 3.0, CatchAction::Dive, 40.0);
        let quick = ai.catch_probability(Position::LeftField, 50, 0.5, CatchAction::Catch, 40.0);
        assert!(dive < routine);
        assert!(quick < routine);
        assert!((routine - (90.0 + 50.0 / 7.0) / 100.0).abs() < 1e-9);
        let automatic = ai.catch_probability(Position::ShortStop, 0, 0.3, CatchAction::Catch, 5.0);
        assert!((automatic - 1.0).abs() < f64::EPSILON);
        let none = ai.catch_probability(Position::ShortStop, 99, 5.0, CatchAction::NoAttempt, 0.0);
        assert!(none.abs() < f64::EPSILON);
    }

    #[test]
    fn probabilities_stay_in_unit_interval() {
        let cfg = ConfigTable::with_overrides([("catchBaseChance", 400.0)]).unwrap();
        let ai = FieldingAI::new(&cfg);
        for fa in [0_u8, 50, 100] {
            for time in [0.0, 0.4, 1.5, 6.0] {
                for action in [CatchAction::Catch, CatchAction::Dive, CatchAction::Leap] {
                    let p = ai.catch_probability(Position::SecondBase, fa, time, action, 60.0);
                    assert!((0.0..=1.0).contains(&p));
                }
            }
            assert!((0.0..=1.0).contains(&ai.good_throw_chance(fa)));
        }
    }

    #[test]
    fn catch_roll_splits_out_hit_and_error() {
        let cfg = ConfigTable::defaults();
        let ai = FieldingAI::new(&cfg);
        assert_eq!(ai.resolve_catch(0.5, 0.9, 0.8, CatchAction::Catch), CatchResult::Out);
        assert_eq!(ai.resolve_catch(0.8, 0.9, 0.8, CatchAction::Catch), CatchResult::Hit);
        assert_eq!(ai.resolve_catch(0.95, 0.9, 1.0, CatchAction::Catch), CatchResult::Error);
        assert_eq!(ai.resolve_catch(0.95, 0.9, 1.0, CatchAction::Dive), CatchResult::Hit);
    }

    #[test]
    fn timing_comparisons_apply_slop() {
        let cfg = ConfigTable::defaults();
        let ai = FieldingAI::new(&cfg);
        assert!(ai.throw_beats_runner(3.5, 4.3));
        assert!(!ai.throw_beats_runner(4.2, 4.3));
        assert!(ai.should_run_to_bag(4.2, 4.3));
        assert!(ai.should_relay_throw(3.0, 3.5));
        assert!(!ai.should_relay_throw(3.0, 3.1));
        assert!(ai.should_tag_runner(3.0, 3.2));
        assert!(ai.throw_beats_tag_up(3.0, 3.2));
    }
}
