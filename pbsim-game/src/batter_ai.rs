//! Batter swing decisions and contact quality.
//!
//! A pitch is first classified by its distance from the zone center. The
//! batter then tries to identify its type, location and timing; each check is
//! an independent roll derived from the single decision draw the engine hands
//! in, so the whole decision consumes exactly one value from the game stream.

use crate::config::ConfigTable;
use crate::numbers::{clamp_pct, clamp01, round_f64_to_u32};
use crate::physics::SwingType;
use crate::player::{BattingRatings, PitchType, PitchingRatings};
use crate::rng::DrawSplitter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchClass {
    SureStrike,
    CloseStrike,
    CloseBall,
    SureBall,
}

impl PitchClass {
    #[must_use]
    pub const fn is_strike(self) -> bool {
        matches!(self, Self::SureStrike | Self::CloseStrike)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SureStrike => "sure strike",
            Self::CloseStrike => "close strike",
            Self::CloseBall => "close ball",
            Self::SureBall => "sure ball",
        }
    }

    const fn config_name(self) -> &'static str {
        match self {
            Self::SureStrike => "SureStrike",
            Self::CloseStrike => "CloseStrike",
            Self::CloseBall => "CloseBall",
            Self::SureBall => "SureBall",
        }
    }
}

/// Exclusive upper bounds of the sure-strike, close-strike and close-ball bands.
///
/// Each bound is at least one past the previous so every band is non-empty.
#[must_use]
pub fn class_bounds(cfg: &ConfigTable) -> (u32, u32, u32) {
    let sure_strike = round_f64_to_u32(cfg.get("sureStrikeDist"));
    let close_strike = round_f64_to_u32(cfg.get("closeStrikeDist")).max(sure_strike + 1);
    let close_ball = round_f64_to_u32(cfg.get("closeBallDist")).max(close_strike + 1);
    (sure_strike, close_strike, close_ball)
}

/// Classify a rounded zone distance.
#[must_use]
pub fn pitch_class(cfg: &ConfigTable, dist: u32) -> PitchClass {
    let (sure_strike, close_strike, close_ball) = class_bounds(cfg);
    if dist < sure_strike {
        PitchClass::SureStrike
    } else if dist < close_strike {
        PitchClass::CloseStrike
    } else if dist < close_ball {
        PitchClass::CloseBall
    } else {
        PitchClass::SureBall
    }
}

/// Everything the batter knows about the pitch on its way in.
#[derive(Debug, Clone, Copy)]
pub struct SwingInput<'a> {
    pub batter: &'a BattingRatings,
    pub pitcher: &'a PitchingRatings,
    pub pitch: PitchType,
    /// Pitch rating after fatigue.
    pub pitch_rating: f64,
    pub balls: u8,
    pub strikes: u8,
    /// Rounded distance from the zone center.
    pub dist: u32,
    pub dx: f64,
    pub dy: f64,
    pub swing_type: SwingType,
    /// Swing regardless of the pitch (hit-and-run, squeeze).
    pub forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingDecision {
    pub swing: bool,
    pub contact_quality: f64,
    pub class: PitchClass,
    pub id_score: f64,
    pub type_identified: bool,
    pub location_identified: bool,
    pub timing_identified: bool,
    /// The swing choice came from the guess table rather than a read.
    pub guessed: bool,
    /// A check swing took the bat back.
    pub checked: bool,
}

impl SwingDecision {
    #[must_use]
    pub const fn in_zone(&self) -> bool {
        self.class.is_strike()
    }

    #[must_use]
    pub const fn misread(&self) -> bool {
        !self.type_identified && !self.location_identified && !self.timing_identified
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatterAI {
    last_decision: Option<SwingDecision>,
    last_misread: bool,
}

impl BatterAI {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn last_decision(&self) -> Option<SwingDecision> {
        self.last_decision
    }

    /// True when the last decision was a swing with nothing identified.
    #[must_use]
    pub const fn last_misread(&self) -> bool {
        self.last_misread
    }

    /// Base identification score in [0, 100].
    #[must_use]
    pub fn id_score(cfg: &ConfigTable, input: &SwingInput<'_>) -> f64 {
        let ch = f64::from(input.batter.ch);
        let exp = f64::from(input.batter.exp);
        let mut score = cfg.get("idRatingBase")
            + (ch - 50.0) * cfg.get("idRatingCHPct") / 200.0
            + (exp - 50.0) * cfg.get("idRatingExpPct") / 200.0
            + (50.0 - input.pitch_rating) * cfg.get("idRatingPitchRatPct") / 200.0;
        if input.pitcher.primary_pitch() == Some(input.pitch) {
            score += cfg.count_value("lookPrimaryType", input.balls, input.strikes, "CountAdjust");
        }
        if input.pitcher.best_offspeed() == Some(input.pitch) {
            score += cfg.count_value("lookBestType", input.balls, input.strikes, "CountAdjust");
        }
        clamp_pct(score)
    }

    /// Plate discipline in [0, 100]; higher values lay off more balls.
    #[must_use]
    pub fn discipline(cfg: &ConfigTable, batter: &BattingRatings, balls: u8, strikes: u8) -> f64 {
        let raw = cfg.get("disciplineRatingBase")
            + (f64::from(batter.ch) * cfg.get("disciplineRatingCHPct")
                + f64::from(batter.exp) * cfg.get("disciplineRatingExpPct"))
                / 200.0
            + cfg.count_value("disciplineRating", balls, strikes, "CountAdjust");
        clamp_pct(raw)
    }

    /// Probability of a guessed swing at a pitch of `class`.
    #[must_use]
    pub fn guess_swing_chance(
        cfg: &ConfigTable,
        class: PitchClass,
        batter: &BattingRatings,
        balls: u8,
        strikes: u8,
    ) -> f64 {
        let zone_scale = if class.is_strike() {
            cfg.get("zSwingProbScalePct")
        } else {
            cfg.get("oSwingProbScalePct")
        };
        let mut chance = cfg.get(&format!("swingProb{}", class.config_name())) / 100.0
            * cfg.get("swingProbScalePct")
            / 100.0
            * zone_scale
            / 100.0;
        if !class.is_strike() {
            let discipline = Self::discipline(cfg, batter, balls, strikes);
            chance *= 1.0 - discipline / 100.0 * cfg.get("disciplineRatingPct") / 100.0;
        }
        clamp01(chance)
    }

    /// Cost of moving the bat from the expected path to the pitch.
    #[must_use]
    pub fn adjustment_cost(cfg: &ConfigTable, dx: f64, dy: f64, timing_identified: bool) -> f64 {
        let (dx, dy) = (dx.abs(), dy.abs());
        let mut cost = dx * cfg.get("swingAdjustHorizCost")
            + dy * cfg.get("swingAdjustVertCost")
            + dx.min(dy) * cfg.get("swingAdjustDiagCost");
        if !timing_identified {
            cost *= 1.0 + cfg.get("timingChangeCostPct") / 100.0;
        }
        cost
    }

    /// How much bat-path adjustment the batter can absorb.
    #[must_use]
    pub fn swing_budget(cfg: &ConfigTable, ch: u8, swing_type: SwingType) -> f64 {
        f64::from(ch) * cfg.get("checkSwingBudgetCHPct") / 100.0
            * cfg.get(&format!("swingBudget{}Pct", swing_type.config_suffix()))
            / 100.0
    }

    /// Probability that contact is made at all given contact quality.
    #[must_use]
    pub fn contact_chance(cfg: &ConfigTable, contact_quality: f64, strikes: u8) -> f64 {
        let chance = clamp01(
            cfg.get("contactChanceBasePct") / 100.0
                + contact_quality * cfg.get("contactChanceQualityPct") / 100.0,
        );
        if strikes >= 2 {
            chance.max(clamp01(cfg.get("twoStrikeContactFloorPct") / 100.0))
        } else {
            chance
        }
    }

    /// Decide swing or take for one pitch, and how well the bat meets it.
    ///
    /// Pure in `(cfg, input, draw)`: the same inputs always produce the same
    /// decision. No draws are taken from the game stream.
    pub fn decide_swing(
        &mut self,
        cfg: &ConfigTable,
        input: &SwingInput<'_>,
        draw: f64,
    ) -> SwingDecision {
        let class = pitch_class(cfg, input.dist);
        let is_strike = class.is_strike();
        let id_score = Self::id_score(cfg, input);
        let mut split = DrawSplitter::new(draw);
        let [type_roll, loc_roll, timing_roll] = split.triple();
        let guess_roll = split.next_unit();
        let check_roll = split.next_unit();

        let component = |key: &str| clamp01(id_score * cfg.get(key) / 100.0 / 100.0);
        let type_identified = type_roll < component("idTypeWeightPct");
        let location_identified = loc_roll < component("idLocationWeightPct");
        let timing_identified = timing_roll < component("idTimingWeightPct");

        let mut guessed = false;
        let mut swing = if input.forced {
            true
        } else if type_identified || location_identified {
            is_strike
        } else {
            guessed = true;
            guess_roll
                < Self::guess_swing_chance(cfg, class, input.batter, input.balls, input.strikes)
        };

        let mut checked = false;
        let mut quality_cap = 1.0;
        if swing && guessed {
            let cost = Self::adjustment_cost(cfg, input.dx, input.dy, timing_identified);
            let budget = Self::swing_budget(cfg, input.batter.ch, input.swing_type);
            if cost > budget {
                let check_chance = (cfg.get("checkSwingChanceBase")
                    + f64::from(input.batter.ch) * cfg.get("checkSwingChanceCHPct") / 100.0)
                    / 100.0;
                if check_roll < clamp01(check_chance) {
                    swing = false;
                    checked = true;
                } else {
                    quality_cap = clamp01(cfg.get("checkSwingContactCapPct") / 100.0);
                }
            }
        }

        let ch = f64::from(input.batter.ch);
        let misread = !type_identified && !location_identified && !timing_identified;
        let contact_quality = if !swing {
            0.0
        } else if misread {
            clamp01((ch / 1000.0).max(cfg.get("misreadContactFloorPct") / 100.0 * ch / 100.0))
                .min(quality_cap)
        } else {
            let timing_key = if timing_identified {
                "timingQualityIdentifiedPct"
            } else {
                "timingQualityMissedPct"
            };
            let timing_quality = cfg.get(timing_key) / 100.0;
            let credit = |identified: bool| if identified { 1.0 } else { ch / 100.0 };
            let read = (credit(type_identified)
                + credit(location_identified)
                + credit(timing_identified))
                / 3.0;
            let mut quality =
                timing_quality * read * cfg.get("contactQualityScalePct") / 100.0;
            if !is_strike {
                quality *= cfg.get("oZoneContactPct") / 100.0;
            }
            clamp01(quality).min(quality_cap)
        };

        let decision = SwingDecision {
            swing,
            contact_quality,
            class,
            id_score,
            type_identified,
            location_identified,
            timing_identified,
            guessed,
            checked,
        };
        log::trace!(
            "swing decision: {} dist {} id {id_score:.1} swing {swing} q {contact_quality:.3}",
            class.label(),
            input.dist
        );
        self.last_misread = swing && misread;
        self.last_decision = Some(decision);
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(overrides: &[(&str, f64)]) -> ConfigTable {
        ConfigTable::with_overrides(overrides.iter().map(|(k, v)| (*k, *v))).unwrap()
    }

    fn fastballer() -> PitchingRatings {
        PitchingRatings {
            endurance: 90,
            control: 50,
            movement: 50,
            arm: 50,
            fb: 50,
            ..PitchingRatings::default()
        }
    }

    fn input<'a>(
        batter: &'a BattingRatings,
        pitcher: &'a PitchingRatings,
        dist: u32,
        forced: bool,
    ) -> SwingInput<'a> {
        SwingInput {
            batter,
            pitcher,
            pitch: PitchType::Fastball,
            pitch_rating: 50.0,
            balls: 0,
            strikes: 0,
            dist,
            dx: f64::from(dist),
            dy: 0.0,
            swing_type: SwingType::Normal,
            forced,
        }
    }

    #[test]
    fn classification_uses_cumulative_exclusive_bounds() {
        let cfg = cfg(&[
            ("sureStrikeDist", 4.0),
            ("closeStrikeDist", 5.0),
            ("closeBallDist", 4.0),
        ]);
        assert_eq!(pitch_class(&cfg, 0), PitchClass::SureStrike);
        assert_eq!(pitch_class(&cfg, 4), PitchClass::CloseStrike);
        assert_eq!(pitch_class(&cfg, 5), PitchClass::CloseBall);
        assert_eq!(pitch_class(&cfg, 6), PitchClass::SureBall);
        assert_eq!(pitch_class(&cfg, 40), PitchClass::SureBall);
        assert_eq!(pitch_class(&cfg, 0).label(), "sure strike");
    }

    #[test]
    fn perfect_identification_caps_quality_at_identified_timing() {
        let cfg = cfg(&[("idRatingBase", 100.0)]);
        let batter = BattingRatings::default();
        let pitcher = fastballer();
        let mut ai = BatterAI::new();
        for draw in [0.01, 0.37, 0.5, 0.93, 0.999] {
            let decision = ai.decide_swing(&cfg, &input(&batter, &pitcher, 0, true), draw);
            assert!(decision.swing);
            assert!((decision.contact_quality - 0.93).abs() < 1e-9);
            assert!(!ai.last_misread());
        }
    }

    #[test]
    fn identified_pitches_are_swung_at_only_in_the_zone() {
        let cfg = cfg(&[("idRatingBase", 100.0)]);
        let batter = BattingRatings::default();
        let pitcher = fastballer();
        let mut ai = BatterAI::new();
        let strike = ai.decide_swing(&cfg, &input(&batter, &pitcher, 1, false), 0.4);
        assert!(strike.swing && !strike.guessed);
        let ball = ai.decide_swing(&cfg, &input(&batter, &pitcher, 8, false), 0.4);
        assert!(!ball.swing);
        assert!(ball.contact_quality.abs() < f64::EPSILON);
    }

    #[test]
    fn full_misread_floors_contact_by_rating() {
        let cfg = cfg(&[("idRatingBase", 0.0)]);
        let batter = BattingRatings::default();
        let pitcher = fastballer();
        let mut ai = BatterAI::new();
        let decision = ai.decide_swing(&cfg, &input(&batter, &pitcher, 0, true), 0.2);
        assert!(decision.misread());
        assert!((decision.contact_quality - 0.25).abs() < 1e-9);
        assert!(ai.last_misread());
        let weak = BattingRatings {
            ch: 0,
            ..BattingRatings::default()
        };
        let none = ai.decide_swing(&cfg, &input(&weak, &pitcher, 0, true), 0.2);
        assert!(none.contact_quality.abs() < f64::EPSILON);
    }

    #[test]
    fn sure_balls_without_a_guess_rate_are_always_taken() {
        let cfg = cfg(&[("idRatingBase", 0.0), ("swingProbSureBall", 0.0)]);
        let batter = BattingRatings::default();
        let pitcher = fastballer();
        let mut ai = BatterAI::new();
        for i in 0..200 {
            let draw = f64::from(i) / 200.0;
            let decision = ai.decide_swing(&cfg, &input(&batter, &pitcher, 9, false), draw);
            assert!(!decision.swing);
            assert!(decision.guessed);
        }
    }

    #[test]
    fn oversized_adjustment_triggers_check_swing() {
        let cfg = cfg(&[
            ("idRatingBase", 0.0),
            ("swingProbCloseStrike", 100.0),
            ("checkSwingChanceBase", 100.0),
        ]);
        let batter = BattingRatings::default();
        let pitcher = fastballer();
        let mut ai = BatterAI::new();
        let decision = ai.decide_swing(&cfg, &input(&batter, &pitcher, 4, false), 0.6);
        assert_eq!(decision.class, PitchClass::CloseStrike);
        assert!(decision.checked);
        assert!(!decision.swing);
    }

    #[test]
    fn failed_check_caps_contact_quality() {
        let cfg = cfg(&[
            ("idRatingBase", 0.0),
            ("swingProbCloseStrike", 100.0),
            ("checkSwingChanceBase", -100.0),
            ("checkSwingChanceCHPct", 0.0),
            ("misreadContactFloorPct", 100.0),
            ("checkSwingContactCapPct", 20.0),
        ]);
        let batter = BattingRatings::default();
        let pitcher = fastballer();
        let mut ai = BatterAI::new();
        let decision = ai.decide_swing(&cfg, &input(&batter, &pitcher, 4, false), 0.6);
        assert!(decision.swing && !decision.checked);
        assert!((decision.contact_quality - 0.2).abs() < 1e-9);
    }

    #[test]
    fn discipline_and_id_scores_stay_on_percent_scale() {
        let cfg = ConfigTable::defaults();
        let pitcher = fastballer();
        for rating in [0_u8, 25, 50, 75, 100] {
            let batter = BattingRatings {
                ch: rating,
                exp: rating,
                ..BattingRatings::default()
            };
            for balls in 0..4 {
                for strikes in 0..3 {
                    let d = BatterAI::discipline(&cfg, &batter, balls, strikes);
                    assert!((0.0..=100.0).contains(&d));
                    let mut i = input(&batter, &pitcher, 3, false);
                    i.balls = balls;
                    i.strikes = strikes;
                    i.pitch_rating = 100.0 - f64::from(rating);
                    let id = BatterAI::id_score(&cfg, &i);
                    assert!((0.0..=100.0).contains(&id));
                }
            }
        }
    }

    #[test]
    fn contact_chance_respects_two_strike_floor() {
        let cfg = cfg(&[("contactChanceBasePct", 30.0)]);
        let early = BatterAI::contact_chance(&cfg, 0.0, 0);
        let late = BatterAI::contact_chance(&cfg, 0.0, 2);
        assert!((early - 0.30).abs() < 1e-9);
        assert!((late - 0.55).abs() < 1e-9);
        let defaults = ConfigTable::defaults();
        assert!((BatterAI::contact_chance(&defaults, 1.0, 0) - 0.92).abs() < 1e-9);
    }

    #[test]
    fn decisions_are_deterministic_for_a_draw() {
        let cfg = ConfigTable::defaults();
        let batter = BattingRatings::default();
        let pitcher = fastballer();
        let mut ai = BatterAI::new();
        for i in 0..100 {
            let draw = (f64::from(i) + 0.5) / 100.0;
            let a = ai.decide_swing(&cfg, &input(&batter, &pitcher, i % 9, false), draw);
            let b = ai.decide_swing(&cfg, &input(&batter, &pitcher, i % 9, false), draw);
            assert_eq!(a, b);
            assert!((0.0..=1.0).contains(&a.contact_quality));
        }
    }
}
