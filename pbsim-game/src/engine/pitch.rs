//! One delivered pitch: selection, location, swing decision and contact.
//!
//! Draw order per pitch is fixed: pitch-variation dice (first appearance of a
//! pitcher only) and the objective draw inside [`PitcherAI::select_pitch`],
//! then the control draw, the decision draw, the auto-take chase draw, the
//! hit-by-pitch step-out draw, the contact draw and the foul draw. Each of the
//! last four is taken only when the situation calls for it.

use crate::batter_ai::{BatterAI, SwingDecision, SwingInput, class_bounds, pitch_class};
use crate::config::ConfigTable;
use crate::engine::SimulationError;
use crate::engine::count::{Count, CountEvent};
use crate::numbers::{clamp01, round_f64_to_u32};
use crate::physics::{Physics, SwingType};
use crate::pitcher_ai::{PitchObjective, PitcherAI};
use crate::player::{PitchType, Pitcher, Player, PlayerId};
use crate::rng::{DrawSplitter, roll_chance, unit_draw};
use rand::RngCore;
use serde::Serialize;

/// Where a pitch ended up relative to the zone center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchLocationRoll {
    pub dx: f64,
    pub dy: f64,
    /// Rounded, scaled Chebyshev distance from the zone center.
    pub dist: u32,
    /// Control miss on the pitch-miss scale; zero for a perfectly located pitch.
    pub miss_amount: f64,
    /// Control miss as a percentage of the worst possible miss.
    pub miss_pct: f64,
}

/// Place a pitch aimed `target_dx` off center.
///
/// `control` is the pitcher's effective control rating. The control draw is
/// split into a miss roll, horizontal and vertical scatter, and the break roll.
#[must_use]
pub fn locate_pitch(
    cfg: &ConfigTable,
    pitch: PitchType,
    control: f64,
    target_dx: f64,
    control_draw: f64,
) -> PitchLocationRoll {
    let physics = Physics::new(cfg);
    let mut split = DrawSplitter::new(control_draw);
    let [miss_roll, scatter_x, scatter_y] = split.triple();
    let break_roll = split.next_unit();

    let control_pct = clamp01(control / 100.0);
    let miss_diff = miss_roll * (1.0 - control_pct);
    let mut miss_amount = miss_diff * cfg.get_or("pitchMissScale", 100.0);
    let cap = cfg.get("maxPitchMiss");
    if cap > 0.0 {
        miss_amount = miss_amount.min(cap);
    }

    let (base_width, base_height) = physics.control_box(pitch);
    let (mut width, mut height) = physics.expand_control_box(base_width, base_height, miss_amount);
    if control_pct * 100.0 < cfg.get("controlPoorThresholdPct") {
        let expand = cfg.get("controlMissBaseExpansion") * (1.0 - control_pct);
        width += expand;
        height += expand;
    }

    let (expected_x, expected_y) = physics.pitch_break(pitch, 0.5);
    let (break_x, break_y) = physics.pitch_break(pitch, break_roll);
    let dx = target_dx + (scatter_x * 2.0 - 1.0) * width + (break_x - expected_x);
    let dy = (scatter_y * 2.0 - 1.0) * height + (break_y - expected_y);
    let scale = cfg.get_or("pitchLocationScalePct", 100.0) / 100.0;
    let dist = round_f64_to_u32(dx.abs().max(dy.abs()) * scale);
    PitchLocationRoll {
        dx,
        dy,
        dist,
        miss_amount,
        miss_pct: miss_diff * 100.0,
    }
}

/// Whether a guessed swing at an out-of-zone pitch is turned into a take.
///
/// The distance is measured past the edge of the zone; the threshold shrinks
/// as balls accumulate, and three-ball counts can force the take outright.
#[must_use]
pub fn auto_take_forced(cfg: &ConfigTable, dist: u32, balls: u8, strikes: u8) -> bool {
    let (_, zone_bound, _) = class_bounds(cfg);
    if dist < zone_bound {
        return false;
    }
    let past_edge = f64::from(dist - zone_bound + 1);
    let threshold = cfg.get("autoTakeDistanceMin").max(
        cfg.get("autoTakeDistanceBase") - f64::from(balls) * cfg.get("autoTakeDistanceBallStep"),
    );
    if past_edge - threshold >= cfg.get("autoTakeDistanceBuffer") {
        return true;
    }
    if balls >= 3 {
        let key = if strikes >= 2 {
            "autoTakeForceFullCount"
        } else {
            "autoTakeForceThreeBall"
        };
        return cfg.flag(key);
    }
    false
}

/// Chance that a batter chases a pitch the auto-take rule would lay off.
#[must_use]
pub fn chase_chance(cfg: &ConfigTable, balls: u8, strikes: u8) -> f64 {
    let pct = cfg
        .count_lookup("autoTakeChaseChance", balls, strikes, "")
        .unwrap_or_else(|| {
            let default = cfg.get("autoTakeDefaultChaseChance");
            if balls >= 3 {
                default.max(cfg.get("autoTakeThreeBallChaseChance"))
            } else {
                default
            }
        });
    clamp01(pct / 100.0)
}

/// Chance that contact goes foul; weaker contact fouls more often.
///
/// `foulStrikeBasePct` is the share of strikes that are fouls, converted to a
/// per-contact rate.
#[must_use]
pub fn foul_chance(cfg: &ConfigTable, contact_quality: f64) -> f64 {
    let share = (cfg.get("foulStrikeBasePct") / 100.0).clamp(0.0, 0.99);
    let trend = cfg.get("foulContactTrendPct") * (1.0 - clamp01(contact_quality)) / 10.0;
    clamp01(share / (1.0 - share) + trend)
}

/// Snapshot of one pitch as delivered. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchContext {
    pub pitcher: PlayerId,
    pub batter: PlayerId,
    pub pitch: PitchType,
    pub objective: PitchObjective,
    pub balls: u8,
    pub strikes: u8,
    pub control_roll: f64,
    pub target_dx: f64,
    pub target_dy: f64,
    pub location: PitchLocationRoll,
    pub in_zone: bool,
    pub speed_mph: f64,
}

/// What happened on one pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchOutcome {
    pub swing: bool,
    pub contact: bool,
    pub foul: bool,
    pub ball_in_play: bool,
    pub hbp: bool,
    /// A guessed swing was taken back by the auto-take rule.
    pub auto_take: bool,
    pub contact_quality: f64,
    /// Count change, `None` for a hit batter or a ball put in play.
    pub event: Option<CountEvent>,
    pub decision: SwingDecision,
}

/// Everything the resolver needs to know before the pitch.
#[derive(Debug, Clone, Copy)]
pub struct PitchSetup<'a> {
    pub batter: &'a Player,
    pub pitcher: &'a Pitcher,
    pub count: Count,
    /// Pitches this pitcher has already thrown in the game.
    pub pitches_thrown: u32,
    pub swing_type: SwingType,
    pub forced_swing: bool,
    /// The defense is working around the batter.
    pub pitch_around: bool,
}

/// Resolve one pitch against the game stream.
///
/// # Errors
///
/// Returns [`SimulationError::NoPitchTypes`] when the pitcher cannot throw
/// anything.
pub fn resolve_pitch<R: RngCore + ?Sized>(
    cfg: &ConfigTable,
    pitcher_ai: &mut PitcherAI,
    batter_ai: &mut BatterAI,
    setup: &PitchSetup<'_>,
    rng: &mut R,
) -> Result<(PitchContext, PitchOutcome), SimulationError> {
    let physics = Physics::new(cfg);
    let ratings = &setup.pitcher.ratings;
    let balls = setup.count.balls();
    let strikes = setup.count.strikes();
    let (_, fatigue) = physics.pitcher_fatigue(ratings.endurance, setup.pitches_thrown);
    let (rating_scale, arm_scale) = physics.fatigue_scales(fatigue);

    let selection =
        pitcher_ai.select_pitch(cfg, setup.pitcher, balls, strikes, rating_scale, rng)?;
    let objective = if setup.pitch_around {
        PitchObjective::Outside
    } else {
        selection.objective
    };
    let target_dx = cfg.get(&format!("targetDist{}", objective.config_name()));

    let control_roll = unit_draw(rng);
    let control = f64::from(ratings.control) * rating_scale;
    let location = locate_pitch(cfg, selection.pitch, control, target_dx, control_roll);
    let mut speed_mph = physics.pitch_velocity(
        selection.pitch,
        f64::from(ratings.arm) * arm_scale,
        control_roll,
    );
    let in_zone = pitch_class(cfg, location.dist).is_strike();

    let decision_draw = unit_draw(rng);
    if location.miss_pct > 0.0 {
        speed_mph =
            physics.reduce_pitch_velocity_for_miss(speed_mph, location.miss_pct, decision_draw);
    }
    let input = SwingInput {
        batter: &setup.batter.ratings,
        pitcher: ratings,
        pitch: selection.pitch,
        pitch_rating: f64::from(ratings.pitch(selection.pitch)) * rating_scale,
        balls,
        strikes,
        dist: location.dist,
        dx: location.dx,
        dy: location.dy,
        swing_type: setup.swing_type,
        forced: setup.forced_swing,
    };
    let decision = batter_ai.decide_swing(cfg, &input, decision_draw);

    let mut swing = decision.swing;
    let mut auto_take = false;
    if swing
        && decision.guessed
        && !setup.forced_swing
        && auto_take_forced(cfg, location.dist, balls, strikes)
    {
        let chase = chase_chance(cfg, balls, strikes);
        let chased = chase > 0.0 && roll_chance(rng, chase);
        if !chased {
            swing = false;
            auto_take = true;
        }
    }

    let context = PitchContext {
        pitcher: setup.pitcher.id().clone(),
        batter: setup.batter.id.clone(),
        pitch: selection.pitch,
        objective,
        balls,
        strikes,
        control_roll,
        target_dx,
        target_dy: 0.0,
        location,
        in_zone,
        speed_mph,
    };

    let mut outcome = PitchOutcome {
        swing,
        contact: false,
        foul: false,
        ball_in_play: false,
        hbp: false,
        auto_take,
        contact_quality: if swing { decision.contact_quality } else { 0.0 },
        event: None,
        decision,
    };

    if !swing {
        let hbp_dist = cfg.get("hbpDist");
        if hbp_dist > 0.0 && location.dx <= -hbp_dist {
            let stepped_out = roll_chance(rng, cfg.get("hbpBatterStepOutChance") / 100.0);
            if !stepped_out {
                outcome.hbp = true;
                return Ok((context, outcome));
            }
            outcome.event = Some(CountEvent::Ball);
            return Ok((context, outcome));
        }
        outcome.event = Some(if in_zone {
            CountEvent::CalledStrike
        } else {
            CountEvent::Ball
        });
        return Ok((context, outcome));
    }

    let contact_chance = BatterAI::contact_chance(cfg, outcome.contact_quality, strikes);
    if !roll_chance(rng, contact_chance) {
        outcome.event = Some(CountEvent::SwingingStrike);
        return Ok((context, outcome));
    }
    outcome.contact = true;
    if roll_chance(rng, foul_chance(cfg, outcome.contact_quality)) {
        outcome.foul = true;
        // A two-strike bunt that goes foul is strike three.
        outcome.event = Some(if setup.swing_type == SwingType::Bunt && strikes >= 2 {
            CountEvent::SwingingStrike
        } else {
            CountEvent::Foul
        });
    } else {
        outcome.ball_in_play = true;
    }
    Ok((context, outcome))
}
