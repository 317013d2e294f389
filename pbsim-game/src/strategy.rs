//! Managerial chance calculators for both dugouts.
//!
//! Every function returns a probability already clamped to [0, 1]; the engine
//! decides whether a decision applies and rolls it exactly once.

use crate::config::ConfigTable;
use crate::numbers::clamp01;
use crate::physics::SwingType;
use crate::player::BattingRatings;
use crate::stadium::Alignment;
use crate::state::{Base, Bases};

/// Inning from which the defense draws the infield in for a close game.
const LATE_INNING: u8 = 7;

/// Score and base/out state as seen by the team at bat.
#[derive(Debug, Clone, Copy)]
pub struct Situation<'a> {
    pub bases: &'a Bases,
    pub outs: u8,
    pub inning: u8,
    /// Offense runs minus defense runs.
    pub run_diff: i32,
}

impl Situation<'_> {
    fn close_and_late(&self) -> bool {
        self.inning >= LATE_INNING && self.run_diff.abs() <= 1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Manager<'a> {
    cfg: &'a ConfigTable,
}

impl<'a> Manager<'a> {
    #[must_use]
    pub const fn new(cfg: &'a ConfigTable) -> Self {
        Self { cfg }
    }

    fn pct(&self, key: &str) -> f64 {
        self.cfg.get(key) / 100.0
    }

    /// Lead a runner takes: 0 none, 1 short, 2 long.
    #[must_use]
    pub fn lead_for_speed(&self, sp: u8) -> u8 {
        let sp = f64::from(sp);
        if sp >= self.cfg.get("longLeadSpeed") {
            2
        } else if sp >= self.cfg.get("shortLeadSpeed") {
            1
        } else {
            0
        }
    }

    /// Feet off the bag for a lead level.
    #[must_use]
    pub fn lead_feet(&self, lead: u8) -> f64 {
        match lead {
            0 => 0.0,
            1 => self.cfg.get("shortLeadFeet"),
            _ => self.cfg.get("longLeadFeet"),
        }
    }

    /// Defense holds the runner on first.
    #[must_use]
    pub fn hold_runner_chance(&self, runner_sp: u8) -> f64 {
        let mut chance = self.cfg.get("holdChanceBase");
        if f64::from(runner_sp) >= self.cfg.get("stealChanceFastThresh") {
            chance += self.cfg.get("holdChanceFastAdjust");
        }
        clamp01(chance / 100.0)
    }

    #[must_use]
    pub fn pickoff_chance(&self, lead: u8) -> f64 {
        if lead == 0 {
            return 0.0;
        }
        let mut chance = self.cfg.get("pickoffChanceBase");
        if lead >= 2 {
            chance += self.cfg.get("pickoffChanceLongLeadAdjust");
        }
        clamp01(chance / 100.0)
    }

    #[must_use]
    pub fn pickoff_success_chance(&self) -> f64 {
        clamp01(self.pct("pickoffSuccessPct"))
    }

    /// After a failed pickoff, chance the runner shortens up for the rest of the PA.
    #[must_use]
    pub fn pickoff_scare_chance(&self, runner_sp: u8) -> f64 {
        if f64::from(runner_sp) >= self.cfg.get("pickoffScareSpeed") {
            0.0
        } else {
            clamp01(self.pct("pickoffScareChance"))
        }
    }

    /// Offense sends the runner.
    #[must_use]
    pub fn steal_chance(&self, runner_sp: u8, held: bool) -> f64 {
        let sp = f64::from(runner_sp);
        let mut chance = self.cfg.get("stealChanceBase");
        if sp >= self.cfg.get("stealChanceFastThresh") {
            chance += self.cfg.get("stealChanceFastAdjust");
        }
        if sp <= self.cfg.get("stealChanceSlowThresh") {
            chance += self.cfg.get("stealChanceSlowAdjust");
        }
        if held {
            chance += self.cfg.get("stealChanceHoldAdjust");
        }
        clamp01(chance / 100.0 * self.pct("offManStealChancePct"))
    }

    /// Success chance from the runner's margin over the throw, in seconds.
    #[must_use]
    pub fn steal_success_chance(&self, margin: f64) -> f64 {
        let tenths = (margin * 10.0).floor();
        clamp01(
            (self.cfg.get("stealSuccessBasePct") + tenths * self.cfg.get("stealSuccessPerTenthPct"))
                / 100.0,
        )
    }

    /// Hit-and-run with a runner on first and fewer than two outs.
    #[must_use]
    pub fn hit_and_run_chance(&self, batter: &BattingRatings, situation: &Situation<'_>) -> f64 {
        let bases = situation.bases;
        if situation.outs >= 2
            || !bases.is_occupied(Base::First)
            || bases.is_occupied(Base::Second)
        {
            return 0.0;
        }
        let mut chance = self.cfg.get("hnrChanceBase");
        if f64::from(batter.ch) >= self.cfg.get("hnrChanceCHThresh") {
            chance += self.cfg.get("hnrChanceCHAdjust");
        }
        clamp01(chance / 100.0 * self.pct("offManHNRChancePct"))
    }

    /// Sacrifice bunt with a runner on first or second, third open, fewer than two outs.
    #[must_use]
    pub fn sacrifice_chance(
        &self,
        batter: &BattingRatings,
        is_pitcher: bool,
        situation: &Situation<'_>,
    ) -> f64 {
        let bases = situation.bases;
        if situation.outs >= 2
            || bases.is_occupied(Base::Third)
            || !(bases.is_occupied(Base::First) || bases.is_occupied(Base::Second))
        {
            return 0.0;
        }
        if f64::from(batter.ch) > self.cfg.get("sacChanceMaxCH")
            || f64::from(batter.ph) > self.cfg.get("sacChanceMaxPH")
        {
            return 0.0;
        }
        let mut chance = self.cfg.get("sacChanceBase");
        if f64::from(batter.ph) < self.cfg.get("sacChancePHThresh") {
            chance += self.cfg.get("sacChanceLowPowerAdjust");
        }
        if is_pitcher {
            chance += self.cfg.get("sacChancePitcherAdjust");
        }
        clamp01(chance / 100.0 * self.pct("offManSacChancePct"))
    }

    /// Squeeze with a runner on third and fewer than two outs.
    #[must_use]
    pub fn squeeze_chance(&self, batter: &BattingRatings, situation: &Situation<'_>) -> f64 {
        if situation.outs >= 2 || !situation.bases.is_occupied(Base::Third) {
            return 0.0;
        }
        if f64::from(batter.ch) > self.cfg.get("squeezeChanceMaxCH")
            || f64::from(batter.ph) > self.cfg.get("squeezeChanceMaxPH")
        {
            return 0.0;
        }
        let mut chance = self.cfg.get("squeezeChanceBase");
        if f64::from(batter.ph) < self.cfg.get("sacChancePHThresh") {
            chance += self.cfg.get("squeezeChanceLowPowerAdjust");
        }
        clamp01(chance / 100.0 * self.pct("offManSqueezeChancePct"))
    }

    /// Pitch around a dangerous hitter when first base is open.
    #[must_use]
    pub fn pitch_around_chance(&self, batter: &BattingRatings, situation: &Situation<'_>) -> f64 {
        if situation.bases.is_occupied(Base::First) {
            return 0.0;
        }
        let mut chance = self.cfg.get("pitchAroundChanceBase");
        if f64::from(batter.ph) >= self.cfg.get("pitchAroundChancePHThresh") {
            chance += self.cfg.get("pitchAroundChancePHAdjust");
        }
        clamp01(chance / 100.0 * self.pct("defManPitchAroundChancePct"))
    }

    /// Share of pitch-arounds that become an intentional walk.
    #[must_use]
    pub fn intentional_walk_chance(&self) -> f64 {
        clamp01(self.pct("pitchAroundToIBBPct"))
    }

    /// Defensive positioning for the coming plate appearance.
    #[must_use]
    pub fn choose_alignment(
        &self,
        batter: &BattingRatings,
        situation: &Situation<'_>,
    ) -> Alignment {
        let bases = situation.bases;
        if situation.outs < 2 && bases.is_occupied(Base::Third) && situation.close_and_late() {
            Alignment::InfieldIn
        } else if situation.outs < 2 && bases.is_occupied(Base::First) {
            Alignment::DoublePlayDepth
        } else if f64::from(batter.ph) >= self.cfg.get("alignDeepOutfieldPH") {
            Alignment::DeepOutfield
        } else {
            Alignment::Normal
        }
    }

    /// Swing approach for a count; bunts are chosen by the sacrifice and squeeze plays.
    #[must_use]
    pub fn swing_type(&self, batter: &BattingRatings, balls: u8, strikes: u8) -> SwingType {
        if strikes >= 2 && batter.ch >= batter.ph {
            SwingType::Contact
        } else if balls > strikes && f64::from(batter.ph) >= self.cfg.get("alignDeepOutfieldPH") {
            SwingType::Power
        } else {
            SwingType::Normal
        }
    }
}
