//! Pitch, swing and batted-ball physics.
//!
//! Every function is pure: coefficients come from the [`ConfigTable`] and any
//! randomness is passed in as an already-taken draw (or, for dice-style rolls,
//! the caller's random source), so the engine alone decides the draw order.
//! Nothing here fails; missing keys fall back to the table defaults.

use crate::config::ConfigTable;
use crate::constants::{
    ALTITUDE_CARRY_PER_1000_FT, COLD_TEMPERATURE_F, CONTACT_HEIGHT_FT, FAIR_ANGLE_MAX_DEG,
    FAIR_ANGLE_MIN_DEG, GRAVITY_FT_S2, HOT_TEMPERATURE_F, LOCATION_HIGH_DY, LOCATION_LOW_DY,
    LOCATION_OUTSIDE_DX, MPH_TO_FT_PER_SEC, NEUTRAL_TEMPERATURE_F, RATING_MIDPOINT,
    WET_ROLL_FACTOR, WIND_CARRY_PER_MPH,
};
use crate::numbers::{floor_f64_to_usize, round_f64_to_u32};
use crate::player::{Hand, PitchType, Position};
use crate::rng::{DrawSplitter, roll_dice};
use crate::stadium::{Environment, FieldPoint, Surface};
use rand::RngCore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SwingType {
    Power,
    #[default]
    Normal,
    Contact,
    Bunt,
}

impl SwingType {
    #[must_use]
    pub const fn config_suffix(self) -> &'static str {
        match self {
            Self::Power => "Power",
            Self::Normal => "Normal",
            Self::Contact => "Contact",
            Self::Bunt => "Bunt",
        }
    }
}

/// Coarse pitch location relative to the heart of the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchLocation {
    Middle,
    High,
    Low,
    Outside,
}

impl PitchLocation {
    /// Classify horizontal/vertical offsets (positive `dy` is up).
    #[must_use]
    pub fn from_offsets(dx: f64, dy: f64) -> Self {
        if dx.abs() >= LOCATION_OUTSIDE_DX {
            Self::Outside
        } else if dy >= LOCATION_HIGH_DY {
            Self::High
        } else if dy <= LOCATION_LOW_DY {
            Self::Low
        } else {
            Self::Middle
        }
    }
}

/// Region of the bat that met the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatPart {
    Handle,
    Dull,
    Sweet,
    End,
}

impl BatPart {
    const fn config_name(self) -> &'static str {
        match self {
            Self::Handle => "Handle",
            Self::Dull => "Dull",
            Self::Sweet => "Sweet",
            Self::End => "End",
        }
    }
}

const OFF_CENTER_PARTS: [BatPart; 3] = [BatPart::Dull, BatPart::End, BatPart::Handle];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatImpact {
    pub part: BatPart,
    /// Effective bat speed through the ball, in mph.
    pub speed_mph: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fatigue {
    Fresh,
    Tired,
    Exhausted,
}

/// Initial ball velocity in feet per second (x toward first, y toward third, z up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchVector {
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

impl LaunchVector {
    #[must_use]
    pub fn horizontal_speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Where a batted ball first touches down and how long it was in the air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub point: FieldPoint,
    pub hang_time: f64,
}

/// Stateless physics calculator bound to one configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Physics<'a> {
    cfg: &'a ConfigTable,
}

impl<'a> Physics<'a> {
    #[must_use]
    pub const fn new(cfg: &'a ConfigTable) -> Self {
        Self { cfg }
    }

    fn pitch_key(pitch: PitchType, suffix: &str) -> String {
        format!("{}{suffix}", pitch.config_prefix())
    }

    // Movement and throwing ------------------------------------------------

    /// Running speed in feet per second.
    #[must_use]
    pub fn player_speed(&self, sp: u8) -> f64 {
        let speed = self.cfg.get("speedBase") + self.cfg.get("speedPct") * f64::from(sp) / 100.0;
        speed.max(1.0)
    }

    /// Seconds before a fielder reacts to the ball.
    #[must_use]
    pub fn reaction_delay(&self, position: Position, fa: u8) -> f64 {
        let suffix = position.config_suffix();
        let delay = self.cfg.get(&format!("delayBase{suffix}"))
            + self.cfg.get(&format!("delayFAPct{suffix}")) * f64::from(fa) / 100.0;
        delay.max(0.0)
    }

    /// Seconds for a fielder to cover `distance` feet, reaction included.
    #[must_use]
    pub fn run_time(&self, position: Position, fa: u8, sp: u8, distance: f64) -> f64 {
        self.reaction_delay(position, fa) + distance.max(0.0) / self.player_speed(sp)
    }

    #[must_use]
    pub fn max_throw_distance(&self, arm: u8) -> f64 {
        self.cfg.get("maxThrowDistBase")
            + self.cfg.get("maxThrowDistASPct") * f64::from(arm) / 100.0
    }

    /// Throw speed in mph for a throw of `distance` feet.
    #[must_use]
    pub fn throw_velocity(&self, distance: f64, arm: u8, outfield: bool) -> f64 {
        let group = if outfield { "OF" } else { "IF" };
        let base = self.cfg.get(&format!("throwSpeed{group}Base"));
        let dist_pct = self.cfg.get(&format!("throwSpeed{group}DistPct"));
        let max = self.cfg.get(&format!("throwSpeed{group}Max"));
        let arm_term = self.cfg.get("throwSpeedASPct") * f64::from(arm) / 100.0;
        (base + dist_pct * distance / 100.0 + arm_term).min(max)
    }

    /// Seconds for a throw to travel `distance` feet; infinite when out of range.
    #[must_use]
    pub fn throw_time(&self, arm: u8, distance: f64, position: Position) -> f64 {
        if distance <= 0.0 {
            return 0.0;
        }
        if distance > self.max_throw_distance(arm) {
            return f64::INFINITY;
        }
        let mph = self.throw_velocity(distance, arm, position.is_outfield());
        if mph <= 0.0 {
            return f64::INFINITY;
        }
        distance / (mph * MPH_TO_FT_PER_SEC)
    }

    // Pitching -------------------------------------------------------------

    /// Release speed in mph.
    #[must_use]
    pub fn pitch_velocity(&self, pitch: PitchType, arm: f64, draw: f64) -> f64 {
        self.cfg.get(&Self::pitch_key(pitch, "SpeedBase"))
            + draw * self.cfg.get(&Self::pitch_key(pitch, "SpeedRange"))
            + arm * self.cfg.get(&Self::pitch_key(pitch, "SpeedASPct")) / 100.0
    }

    /// Base targeting tolerance (width, height) for a pitch type.
    #[must_use]
    pub fn control_box(&self, pitch: PitchType) -> (f64, f64) {
        (
            self.cfg.get(&Self::pitch_key(pitch, "ControlBoxWidth")),
            self.cfg.get(&Self::pitch_key(pitch, "ControlBoxHeight")),
        )
    }

    /// Grow a control box in proportion to the missed amount.
    #[must_use]
    pub fn expand_control_box(&self, width: f64, height: f64, miss_amount: f64) -> (f64, f64) {
        let grow = miss_amount.max(0.0) * self.cfg.get("controlBoxIncreaseEffCOPct") / 100.0;
        (width + grow, height + grow)
    }

    /// Speed after a control miss, never below zero.
    #[must_use]
    pub fn reduce_pitch_velocity_for_miss(&self, speed: f64, miss_amount: f64, draw: f64) -> f64 {
        let range = self.cfg.get("speedReductionRange").max(0.0);
        let spread = floor_f64_to_usize(draw * (range + 1.0));
        let reduction = self.cfg.get("speedReductionBase")
            + crate::numbers::usize_to_f64(spread)
            + miss_amount.max(0.0) * self.cfg.get("speedReductionEffMOPct") / 100.0;
        (speed - reduction).max(0.0)
    }

    /// Horizontal and vertical break for a pitch, both scaled by the same draw.
    #[must_use]
    pub fn pitch_break(&self, pitch: PitchType, draw: f64) -> (f64, f64) {
        (
            self.cfg.get(&Self::pitch_key(pitch, "BreakBaseWidth"))
                + draw * self.cfg.get(&Self::pitch_key(pitch, "BreakRangeWidth")),
            self.cfg.get(&Self::pitch_key(pitch, "BreakBaseHeight"))
                + draw * self.cfg.get(&Self::pitch_key(pitch, "BreakRangeHeight")),
        )
    }

    /// Remaining pitch budget and the fatigue band it falls in.
    #[must_use]
    pub fn pitcher_fatigue(&self, endurance: u8, pitches: u32) -> (i64, Fatigue) {
        let remaining = i64::from(endurance) - i64::from(pitches);
        let tired = self.cfg.get("pitcherTiredThresh");
        let exhausted = self.cfg.get("pitcherExhaustedThresh");
        let left = crate::numbers::round_f64_to_i32(exhausted);
        let state = if remaining <= i64::from(left) {
            Fatigue::Exhausted
        } else if remaining <= i64::from(crate::numbers::round_f64_to_i32(tired)) {
            Fatigue::Tired
        } else {
            Fatigue::Fresh
        };
        (remaining, state)
    }

    /// Multipliers (pitch ratings, arm) applied for a fatigue band.
    #[must_use]
    pub fn fatigue_scales(&self, fatigue: Fatigue) -> (f64, f64) {
        match fatigue {
            Fatigue::Fresh => (1.0, 1.0),
            Fatigue::Tired => (
                self.cfg.get_or("tiredPitchRatPct", 100.0) / 100.0,
                self.cfg.get_or("tiredASPct", 100.0) / 100.0,
            ),
            Fatigue::Exhausted => (
                self.cfg.get_or("exhaustedPitchRatPct", 100.0) / 100.0,
                self.cfg.get_or("exhaustedASPct", 100.0) / 100.0,
            ),
        }
    }

    // Swinging -------------------------------------------------------------

    /// Bat speed in mph, adjusted for how fast the pitch arrives.
    #[must_use]
    pub fn bat_speed(&self, ph: u8, swing_type: SwingType, pitch_speed: Option<f64>) -> f64 {
        let adjust = self
            .cfg
            .get(&format!("swingSpeed{}Adjust", swing_type.config_suffix()));
        let mut speed = self.cfg.get("swingSpeedBase")
            + self.cfg.get("swingSpeedPHPct") * (f64::from(ph) + adjust) / 100.0;
        if let Some(pitch_speed) = pitch_speed {
            let average = self.cfg.get("averagePitchSpeed");
            let diff = pitch_speed - average;
            if diff > 0.0 {
                speed -= diff * self.cfg.get("fastPitchBatSlowdownPct") / 100.0;
            } else if diff < 0.0 {
                speed += -diff * self.cfg.get("slowPitchBatSpeedupPct") / 100.0;
            }
        }
        speed.max(0.0)
    }

    /// Which part of the bat met the ball, and the resulting effective speed.
    ///
    /// Better contact makes the sweet spot more likely; the draw is split into
    /// a part roll and a variance roll.
    #[must_use]
    pub fn bat_impact(&self, bat_speed: f64, contact_quality: f64, draw: f64) -> BatImpact {
        let [part_roll, variance_roll, _] = DrawSplitter::new(draw).triple();
        let sweet = ((self.cfg.get("sweetSpotBasePct")
            + contact_quality * self.cfg.get("sweetSpotContactPct"))
            / 100.0)
            .clamp(0.0, 1.0);
        let part = if part_roll < sweet {
            BatPart::Sweet
        } else {
            let rest = if sweet < 1.0 {
                (part_roll - sweet) / (1.0 - sweet)
            } else {
                0.0
            };
            OFF_CENTER_PARTS[floor_f64_to_usize(rest * 3.0).min(2)]
        };
        let name = part.config_name();
        let base = self.cfg.get(&format!("batPower{name}Base"));
        let range = self.cfg.get(&format!("batPower{name}Range"));
        let pct = base + (variance_roll * 2.0 - 1.0) * range;
        BatImpact {
            part,
            speed_mph: (bat_speed * pct / 100.0).max(0.0),
        }
    }

    /// Bat path angle in degrees.
    #[must_use]
    pub fn swing_angle(
        &self,
        gf: u8,
        swing_type: SwingType,
        location: PitchLocation,
        draw: f64,
    ) -> f64 {
        let key = |suffix: &str| self.cfg.get(&format!("swingAngleTenthDegrees{suffix}"));
        let mut tenths = key("Base") + draw * key("Range")
            + (f64::from(gf) - RATING_MIDPOINT) * key("GFPct") / 100.0;
        tenths += match swing_type {
            SwingType::Power => key("PowerAdjust"),
            SwingType::Contact => key("ContactAdjust"),
            SwingType::Normal | SwingType::Bunt => 0.0,
        };
        tenths += match location {
            PitchLocation::High => key("High"),
            PitchLocation::Low => key("Low"),
            PitchLocation::Outside => key("Outside"),
            PitchLocation::Middle => 0.0,
        };
        tenths / 10.0
    }

    /// Dice-driven vertical deflection off the bat, in degrees within (-90, 90).
    pub fn vertical_hit_angle<R: RngCore + ?Sized>(
        &self,
        swing_type: SwingType,
        rng: &mut R,
    ) -> f64 {
        let suffix = swing_type.config_suffix();
        let count = round_f64_to_u32(self.cfg.get(&format!("hitAngleCount{suffix}")));
        let faces = round_f64_to_u32(self.cfg.get(&format!("hitAngleFaces{suffix}"))).max(1);
        let base = self.cfg.get(&format!("hitAngleBase{suffix}"));
        let base = i64::from(crate::numbers::round_f64_to_i32(base));
        let roll = (base + roll_dice(rng, count, faces)).clamp(1, 59);
        let offset = i32::try_from(roll - 30).unwrap_or(0);
        f64::from(offset) * 180.0 / 58.0
    }

    /// Exit speed in mph from the bat impact, power and contact quality.
    #[must_use]
    pub fn exit_velocity(
        &self,
        impact: BatImpact,
        ph: u8,
        contact_quality: f64,
        swing_type: SwingType,
    ) -> f64 {
        let floor = self.cfg.get("exitVeloContactFloorPct");
        let quality = floor + (100.0 - floor) * contact_quality.clamp(0.0, 1.0);
        let raw = impact.speed_mph * quality / 100.0
            + self.cfg.get("exitVeloBase")
            + self.cfg.get("exitVeloPHPct") * f64::from(ph) / 100.0;
        let scale = self
            .cfg
            .get_or(&format!("exitVelo{}Pct", swing_type.config_suffix()), 100.0);
        (raw * scale / 100.0).max(0.0)
    }

    /// Horizontal spray angle in degrees, kept inside fair territory.
    #[must_use]
    pub fn spray_angle(&self, pl: u8, bats: Hand, draw: f64) -> f64 {
        let pull = (f64::from(pl) - RATING_MIDPOINT) * self.cfg.get("sprayAnglePLPct") / 100.0;
        let toward = match bats {
            Hand::Right => 1.0,
            Hand::Left => -1.0,
        };
        let angle = 45.0 + (draw * 2.0 - 1.0) * self.cfg.get("sprayAngleRange") + toward * pull;
        angle.clamp(FAIR_ANGLE_MIN_DEG, FAIR_ANGLE_MAX_DEG)
    }

    /// Velocity components for an exit speed and launch angles.
    #[must_use]
    pub fn launch_vector(&self, exit_mph: f64, vertical_deg: f64, spray_deg: f64) -> LaunchVector {
        let speed = exit_mph.max(0.0) * MPH_TO_FT_PER_SEC;
        let vert = vertical_deg.to_radians();
        let horiz = spray_deg.to_radians();
        let ground = speed * vert.cos();
        LaunchVector {
            vx: ground * horiz.cos(),
            vy: ground * horiz.sin(),
            vz: speed * vert.sin(),
        }
    }

    /// Carry multiplier from air, altitude, temperature and wind.
    #[must_use]
    pub fn carry_factor(&self, spray_deg: f64, env: &Environment) -> f64 {
        let air = self.cfg.get_or("ballAirResistancePct", 100.0) / 100.0;
        let altitude = (env.altitude_ft + self.cfg.get("ballBaseAltitude")) / 1000.0
            * self.cfg.get("ballAltitudePct")
            / 100.0
            * ALTITUDE_CARRY_PER_1000_FT;
        let temp = (env.temperature_f - NEUTRAL_TEMPERATURE_F) * self.cfg.get("ballTempPct")
            / 100.0
            / 1000.0;
        let wind = env.wind_mph
            * self.cfg.get("ballWindSpeedPct")
            / 100.0
            * WIND_CARRY_PER_MPH
            * (spray_deg - 45.0).to_radians().cos();
        (air * (1.0 + altitude + temp + wind)).max(0.0)
    }

    /// Ballistic landing point from contact height; horizontal carry scaled by conditions.
    #[must_use]
    pub fn landing(&self, launch: LaunchVector, env: &Environment) -> Landing {
        let g = GRAVITY_FT_S2;
        let disc = launch.vz.mul_add(launch.vz, 2.0 * g * CONTACT_HEIGHT_FT);
        let hang_time = ((launch.vz + disc.max(0.0).sqrt()) / g).max(0.0);
        let spray = launch.vy.atan2(launch.vx).to_degrees();
        let factor = self.carry_factor(spray, env);
        Landing {
            point: FieldPoint::new(
                launch.vx * hang_time * factor,
                launch.vy * hang_time * factor,
            ),
            hang_time,
        }
    }

    /// Height of the ball above the ground `t` seconds after contact.
    #[must_use]
    pub fn height_at(&self, launch: LaunchVector, t: f64) -> f64 {
        CONTACT_HEIGHT_FT + launch.vz * t - 0.5 * GRAVITY_FT_S2 * t * t
    }

    // Ground interaction ----------------------------------------------------

    /// Velocities after the first bounce.
    #[must_use]
    pub fn ball_bounce(
        &self,
        vertical: f64,
        horizontal: f64,
        surface: Surface,
        env: &Environment,
    ) -> (f64, f64) {
        let suffix = surface.config_suffix();
        let mut adjust = 0.0;
        if env.wet {
            adjust += self.cfg.get("bounceWetAdjust");
        }
        if env.temperature_f >= HOT_TEMPERATURE_F {
            adjust += self.cfg.get("bounceHotAdjust");
        } else if env.temperature_f <= COLD_TEMPERATURE_F {
            adjust += self.cfg.get("bounceColdAdjust");
        }
        let vert_pct = (self.cfg.get(&format!("bounceVert{suffix}Pct")) + adjust).max(0.0);
        let horiz_pct = (self.cfg.get(&format!("bounceHoriz{suffix}Pct")) + adjust).max(0.0);
        (
            vertical.abs() * vert_pct / 100.0,
            horizontal.abs() * horiz_pct / 100.0,
        )
    }

    /// Ground deceleration in ft/s² for a surface.
    #[must_use]
    pub fn roll_friction(&self, surface: Surface, env: &Environment) -> f64 {
        let friction = self
            .cfg
            .get(&format!("rollFriction{}", surface.config_suffix()))
            .max(1.0);
        if env.wet {
            friction / WET_ROLL_FACTOR
        } else {
            friction
        }
    }

    /// Distance a ball rolls from `speed` feet per second before stopping.
    #[must_use]
    pub fn ball_roll_distance(&self, speed: f64, surface: Surface, env: &Environment) -> f64 {
        let friction = self.roll_friction(surface, env);
        let air = self.cfg.get_or("ballAirResistancePct", 100.0) / 100.0;
        let temp = 1.0
            + (env.temperature_f - NEUTRAL_TEMPERATURE_F) * self.cfg.get("ballTempPct")
                / 100.0
                / 1000.0;
        (speed * speed / (2.0 * friction) * air * temp).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn physics_with(overrides: &[(&str, f64)]) -> ConfigTable {
        ConfigTable::with_overrides(overrides.iter().map(|(k, v)| (*k, *v))).unwrap()
    }

    #[test]
    fn player_speed_and_reaction_follow_ratings() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        assert!((physics.player_speed(50) - 21.5).abs() < 1e-9);
        assert!(physics.player_speed(100) > physics.player_speed(0));
        let slow = physics.reaction_delay(Position::ShortStop, 0);
        let quick = physics.reaction_delay(Position::ShortStop, 100);
        assert!(quick < slow);
        assert!(quick >= 0.0);
    }

    #[test]
    fn throws_beyond_range_never_arrive() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        assert!(physics.throw_time(0, 400.0, Position::CenterField).is_infinite());
        let short = physics.throw_time(50, 90.0, Position::SecondBase);
        let long = physics.throw_time(50, 127.0, Position::Catcher);
        assert!(short > 0.0 && long > short);
        assert!(physics.throw_velocity(1_000.0, 100, true) <= 92.0);
    }

    #[test]
    fn pitch_velocity_uses_arm_and_draw() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let v = physics.pitch_velocity(PitchType::Fastball, 50.0, 0.5);
        assert!((v - (70.0 + 1.0 + 15.0)).abs() < 1e-9);
        let knuckler = physics.pitch_velocity(PitchType::Knuckleball, 100.0, 0.0);
        assert!((knuckler - 65.0).abs() < 1e-9, "knuckleball ignores arm");
    }

    #[test]
    fn control_box_expands_and_speed_drops_on_miss() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let (w, h) = physics.control_box(PitchType::Slider);
        let (ew, eh) = physics.expand_control_box(w, h, 20.0);
        assert!((ew - 4.0).abs() < 1e-9 && (eh - 4.0).abs() < 1e-9);
        let reduced = physics.reduce_pitch_velocity_for_miss(90.0, 20.0, 0.0);
        assert!((reduced - 86.0).abs() < 1e-9);
        assert!(physics.reduce_pitch_velocity_for_miss(2.0, 100.0, 0.99).abs() < 1e-9);
    }

    #[test]
    fn bat_speed_reacts_to_pitch_speed() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let neutral = physics.bat_speed(50, SwingType::Normal, Some(94.0));
        assert!((neutral - 66.0).abs() < 1e-9);
        assert!(physics.bat_speed(50, SwingType::Normal, Some(100.0)) < neutral);
        assert!(physics.bat_speed(50, SwingType::Normal, Some(80.0)) > neutral);
        assert!(physics.bat_speed(50, SwingType::Power, None) > neutral);
        assert!(physics.bat_speed(50, SwingType::Bunt, None) < neutral);
    }

    #[test]
    fn perfect_contact_finds_the_sweet_spot() {
        let cfg = physics_with(&[("sweetSpotBasePct", 100.0)]);
        let physics = Physics::new(&cfg);
        let impact = physics.bat_impact(70.0, 1.0, 0.37);
        assert_eq!(impact.part, BatPart::Sweet);
        assert!(impact.speed_mph >= 70.0 * 0.9 && impact.speed_mph <= 70.0 * 1.2);
    }

    #[test]
    fn swing_angle_tracks_loft_and_location() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let mid = physics.swing_angle(50, SwingType::Normal, PitchLocation::Middle, 0.5);
        assert!((mid - 4.4).abs() < 1e-9);
        let lofty = physics.swing_angle(90, SwingType::Normal, PitchLocation::Middle, 0.5);
        assert!(lofty > mid);
        let high = physics.swing_angle(50, SwingType::Normal, PitchLocation::High, 0.5);
        assert!((high - mid - 2.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_angle_stays_within_clamp() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let mut rng = SmallRng::seed_from_u64(0xACED);
        for _ in 0..500 {
            let angle = physics.vertical_hit_angle(SwingType::Normal, &mut rng);
            assert!((-90.0..=90.0).contains(&angle));
        }
    }

    #[test]
    fn landing_matches_closed_form_for_level_launch() {
        let cfg = physics_with(&[("ballAirResistancePct", 100.0)]);
        let physics = Physics::new(&cfg);
        let launch = physics.launch_vector(60.0, 0.0, 45.0);
        let landing = physics.landing(launch, &Environment::default());
        let expected = (2.0 * CONTACT_HEIGHT_FT / GRAVITY_FT_S2).sqrt();
        assert!((landing.hang_time - expected).abs() < 1e-9);
        assert!((landing.point.angle_deg() - 45.0).abs() < 1e-6);
    }

    #[test]
    fn higher_launch_hangs_longer() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let env = Environment::default();
        let liner = physics.landing(physics.launch_vector(90.0, 12.0, 45.0), &env);
        let fly = physics.landing(physics.launch_vector(90.0, 40.0, 45.0), &env);
        assert!(fly.hang_time > liner.hang_time);
        assert!(fly.point.distance_from_home() > liner.point.distance_from_home());
    }

    #[test]
    fn conditions_change_carry() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let base = physics.carry_factor(45.0, &Environment::default());
        let thin_air = physics.carry_factor(
            45.0,
            &Environment {
                altitude_ft: 5_280.0,
                ..Environment::default()
            },
        );
        let wind_in = physics.carry_factor(
            45.0,
            &Environment {
                wind_mph: -15.0,
                ..Environment::default()
            },
        );
        assert!(thin_air > base);
        assert!(wind_in < base);
    }

    #[test]
    fn bounce_and_roll_depend_on_surface_and_weather() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let env = Environment::default();
        let (v_grass, h_grass) = physics.ball_bounce(-20.0, 80.0, Surface::Grass, &env);
        let (_, h_turf) = physics.ball_bounce(-20.0, 80.0, Surface::Turf, &env);
        assert!((v_grass - 7.0).abs() < 1e-9);
        assert!((h_grass - 57.6).abs() < 1e-9);
        assert!(h_turf > h_grass);
        let wet = Environment {
            wet: true,
            ..env
        };
        let (_, h_wet) = physics.ball_bounce(-20.0, 80.0, Surface::Grass, &wet);
        assert!(h_wet < h_grass);
        let turf_roll = physics.ball_roll_distance(60.0, Surface::Turf, &env);
        let grass_roll = physics.ball_roll_distance(60.0, Surface::Grass, &env);
        assert!(turf_roll > grass_roll);
        assert!(physics.ball_roll_distance(60.0, Surface::Grass, &wet) < grass_roll);
    }

    #[test]
    fn fatigue_bands_follow_thresholds() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        assert_eq!(physics.pitcher_fatigue(100, 20).1, Fatigue::Fresh);
        assert_eq!(physics.pitcher_fatigue(100, 90).1, Fatigue::Tired);
        assert_eq!(physics.pitcher_fatigue(100, 100).1, Fatigue::Exhausted);
        let (rating, arm) = physics.fatigue_scales(Fatigue::Exhausted);
        assert!(rating < 1.0 && arm < 1.0);
    }

    #[test]
    fn spray_stays_fair_and_pulls_by_hand() {
        let cfg = ConfigTable::defaults();
        let physics = Physics::new(&cfg);
        let righty = physics.spray_angle(100, Hand::Right, 0.5);
        let lefty = physics.spray_angle(100, Hand::Left, 0.5);
        assert!(righty > 45.0 && lefty < 45.0);
        assert!(physics.spray_angle(100, Hand::Right, 0.999) <= 89.0);
    }
}
