//! Batted-ball flight and the defense's play on it.
//!
//! A fair ball is launched with four draws in a fixed order: batted-ball
//! type, bat impact, swing angle and the vertical-angle dice, then the spray
//! draw. Fielding adds at most one fielding roll and one throw-accuracy draw.

use crate::baserunning::{CaughtBall, Retrieval, pivot_position};
use crate::config::ConfigTable;
use crate::constants::{BASE_PATH_FT, GRAVITY_FT_S2, GROUND_SCAN_STEP_FT, RATING_MIDPOINT};
use crate::fielding_ai::{CatchAction, CatchResult, FieldingAI};
use crate::numbers::clamp01;
use crate::physics::{Landing, LaunchVector, Physics, PitchLocation, SwingType};
use crate::player::{BattingRatings, PitchingRatings, Player, Position};
use crate::rng::{roll_chance, unit_draw, weighted_pick};
use crate::stadium::{Alignment, Environment, FieldPoint, Stadium, base_point, fielder_point};
use crate::state::{Base, Bases, Fielder};
use rand::RngCore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattedBallType {
    Ground,
    Line,
    Fly,
}

impl BattedBallType {
    /// Suffix used by `bipOutPct{suffix}`.
    #[must_use]
    pub const fn config_suffix(self) -> &'static str {
        match self {
            Self::Ground => "Ground",
            Self::Line => "Line",
            Self::Fly => "Fly",
        }
    }

    const fn angle_prefix(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Line => "line",
            Self::Fly => "fly",
        }
    }

    /// Launch-angle band in degrees for this type.
    #[must_use]
    pub fn angle_band(self, cfg: &ConfigTable) -> (f64, f64) {
        let prefix = self.angle_prefix();
        let min = cfg.get(&format!("{prefix}AngleMin"));
        let max = cfg.get(&format!("{prefix}AngleMax"));
        (min.min(max), min.max(max))
    }

    /// Map a raw bat-path angle in (-90, 90) into this type's band, keeping
    /// the type and the launch angle consistent.
    #[must_use]
    pub fn launch_angle(self, cfg: &ConfigTable, raw_deg: f64) -> f64 {
        let (min, max) = self.angle_band(cfg);
        min + (max - min) * clamp01((raw_deg + 90.0) / 180.0)
    }
}

/// Relative ground/line/fly weights for a batter against a pitcher.
///
/// Power and loft push the ball into the air; pitcher movement keeps it on
/// the ground.
#[must_use]
pub fn batted_ball_weights(
    cfg: &ConfigTable,
    batter: &BattingRatings,
    pitcher: &PitchingRatings,
) -> [(BattedBallType, f64); 3] {
    let power = (f64::from(batter.ph) - RATING_MIDPOINT) * cfg.get("flyBallPHPct") / 100.0;
    let loft = (f64::from(batter.gf) - RATING_MIDPOINT) * cfg.get("vertAngleGFPct") / 100.0;
    let sink =
        (f64::from(pitcher.movement) - RATING_MIDPOINT) * cfg.get("groundBallMovementPct") / 100.0;
    [
        (
            BattedBallType::Ground,
            (cfg.get("groundBallBaseRate") - loft + sink).max(0.0),
        ),
        (BattedBallType::Line, cfg.get("lineDriveBaseRate").max(0.0)),
        (
            BattedBallType::Fly,
            (cfg.get("flyBallBaseRate") + power + loft - sink).max(0.0),
        ),
    ]
}

/// How the bat met the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contact {
    pub swing_type: SwingType,
    pub quality: f64,
    pub pitch_speed_mph: f64,
    pub location: PitchLocation,
}

/// A fair ball in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BattedBall {
    pub kind: BattedBallType,
    pub exit_mph: f64,
    pub vertical_deg: f64,
    pub spray_deg: f64,
    pub launch: LaunchVector,
    pub landing: Landing,
}

impl BattedBall {
    /// In-air distance from home plate.
    #[must_use]
    pub fn carry(&self) -> f64 {
        self.landing.point.distance_from_home()
    }
}

/// Launch a fair ball: type, impact, swing angle, vertical dice, spray.
pub fn launch_batted_ball<R: RngCore + ?Sized>(
    cfg: &ConfigTable,
    env: &Environment,
    batter: &Player,
    pitcher: &PitchingRatings,
    contact: &Contact,
    rng: &mut R,
) -> BattedBall {
    let physics = Physics::new(cfg);
    let ratings = &batter.ratings;
    let kind = weighted_pick(rng, &batted_ball_weights(cfg, ratings, pitcher))
        .unwrap_or(BattedBallType::Line);
    let bat_speed = physics.bat_speed(
        ratings.ph,
        contact.swing_type,
        Some(contact.pitch_speed_mph),
    );
    let impact = physics.bat_impact(bat_speed, contact.quality, unit_draw(rng));
    let swing_angle =
        physics.swing_angle(ratings.gf, contact.swing_type, contact.location, unit_draw(rng));
    let deflection = physics.vertical_hit_angle(contact.swing_type, rng);
    let vertical_deg = kind.launch_angle(cfg, swing_angle + deflection);
    let exit_mph = physics.exit_velocity(impact, ratings.ph, contact.quality, contact.swing_type);
    let spray_deg = physics.spray_angle(ratings.pl, batter.bats, unit_draw(rng));
    let launch = physics.launch_vector(exit_mph, vertical_deg, spray_deg);
    let landing = physics.landing(launch, env);
    log::trace!(
        "batted ball {kind:?}: {exit_mph:.1} mph at {vertical_deg:.1} deg, spray {spray_deg:.1}, \
         carry {:.0} ft",
        landing.point.distance_from_home()
    );
    BattedBall {
        kind,
        exit_mph,
        vertical_deg,
        spray_deg,
        launch,
        landing,
    }
}

/// What the defense made of a fair ball, before any runner moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FieldingPlay {
    HomeRun,
    /// Caught in the air, infield fly included.
    Caught {
        retrieval: Retrieval,
        kind: CaughtBall,
    },
    /// Fielded on the ground and thrown to first in time. `relay_margin` is
    /// set when a force at second is on and the relay through the pivot
    /// still beats the batter.
    GroundOut {
        fielder: Position,
        margin: f64,
        relay_margin: Option<f64>,
    },
    Error { fielder: Position, throwing: bool },
    Hit {
        bases: u8,
        retrieval: Option<Retrieval>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Chance<'f> {
    fielder: &'f Fielder,
    point: FieldPoint,
    /// Seconds until the ball reaches `point`.
    time: f64,
    run_time: f64,
    run_dist: f64,
    action: CatchAction,
}

impl Chance<'_> {
    fn margin(&self) -> f64 {
        self.time - self.run_time
    }
}

/// The nine fielders set up for one pitch.
#[derive(Debug, Clone, Copy)]
pub struct Defense<'a> {
    cfg: &'a ConfigTable,
    stadium: &'a Stadium,
    env: &'a Environment,
    fielders: &'a [Fielder],
    alignment: Alignment,
}

impl<'a> Defense<'a> {
    #[must_use]
    pub const fn new(
        cfg: &'a ConfigTable,
        stadium: &'a Stadium,
        env: &'a Environment,
        fielders: &'a [Fielder],
        alignment: Alignment,
    ) -> Self {
        Self {
            cfg,
            stadium,
            env,
            fielders,
            alignment,
        }
    }

    fn start(&self, fielder: &Fielder) -> FieldPoint {
        fielder_point(fielder.position, self.alignment, self.cfg)
    }

    /// Seconds for `fielder` to get from their spot to `point`.
    fn run_time_to(&self, fielder: &Fielder, point: FieldPoint) -> f64 {
        let dist = self.start(fielder).distance_to(point);
        Physics::new(self.cfg).run_time(fielder.position, fielder.fa, fielder.sp, dist)
    }

    fn out_scale(&self, kind: BattedBallType) -> f64 {
        self.cfg
            .get_or(&format!("bipOutPct{}", kind.config_suffix()), 100.0)
            / 100.0
    }

    /// Play a fair ball. `batter_sp` races the throw to first on grounders.
    pub fn field<R: RngCore + ?Sized>(
        &self,
        ball: &BattedBall,
        batter_sp: u8,
        outs: u8,
        bases: &Bases,
        rng: &mut R,
    ) -> FieldingPlay {
        let play = match ball.kind {
            BattedBallType::Ground => {
                let force_at_second = outs < 2 && bases.is_occupied(Base::First);
                self.field_ground(ball, batter_sp, force_at_second, rng)
            }
            BattedBallType::Line | BattedBallType::Fly => self.field_air(ball, outs, bases, rng),
        };
        log::trace!("fielding {:?}: {play:?}", ball.kind);
        play
    }

    /// Infield fly: fewer than two outs, first and second occupied, a shallow
    /// and steep fly ball.
    #[must_use]
    pub fn is_infield_fly(&self, ball: &BattedBall, outs: u8, bases: &Bases) -> bool {
        ball.kind == BattedBallType::Fly
            && outs < 2
            && bases.is_occupied(Base::First)
            && bases.is_occupied(Base::Second)
            && ball.carry() < self.cfg.get("infieldFlyMaxDist")
            && ball.vertical_deg >= self.cfg.get("infieldFlyMinAngle")
    }

    fn field_air<R: RngCore + ?Sized>(
        &self,
        ball: &BattedBall,
        outs: u8,
        bases: &Bases,
        rng: &mut R,
    ) -> FieldingPlay {
        let carry = ball.carry();
        let wall = self.stadium.wall_distance(ball.spray_deg);
        if carry > wall + self.cfg.get("wallLeapWindow") {
            return FieldingPlay::HomeRun;
        }
        let over_wall = carry >= wall;

        if self.is_infield_fly(ball, outs, bases) {
            let nearest = self
                .fielders
                .iter()
                .filter(|f| f.position.is_infield())
                .min_by(|a, b| {
                    let da = self.start(a).distance_to(ball.landing.point);
                    let db = self.start(b).distance_to(ball.landing.point);
                    da.total_cmp(&db)
                });
            if let Some(fielder) = nearest {
                return FieldingPlay::Caught {
                    retrieval: Retrieval {
                        position: fielder.position,
                        point: ball.landing.point,
                        time: ball.landing.hang_time,
                    },
                    kind: CaughtBall::InfieldFly,
                };
            }
        }

        let best = self
            .fielders
            .iter()
            .flat_map(|fielder| {
                [
                    self.snag_chance(fielder, ball),
                    self.landing_chance(fielder, ball, over_wall),
                ]
            })
            .flatten()
            .max_by(|a, b| a.margin().total_cmp(&b.margin()));

        if let Some(chance) = best {
            let fielding = FieldingAI::new(self.cfg);
            let probability = fielding.catch_probability(
                chance.fielder.position,
                chance.fielder.fa,
                chance.time,
                chance.action,
                chance.run_dist,
            );
            let roll = unit_draw(rng);
            let scale = self.out_scale(ball.kind);
            match fielding.resolve_catch(roll, probability, scale, chance.action) {
                CatchResult::Out => {
                    let kind = if ball.kind == BattedBallType::Fly {
                        CaughtBall::Fly
                    } else {
                        CaughtBall::Line
                    };
                    return FieldingPlay::Caught {
                        retrieval: Retrieval {
                            position: chance.fielder.position,
                            point: chance.point,
                            time: chance.time,
                        },
                        kind,
                    };
                }
                CatchResult::Error => {
                    return FieldingPlay::Error {
                        fielder: chance.fielder.position,
                        throwing: false,
                    };
                }
                CatchResult::Hit => {}
            }
        }
        if over_wall {
            return FieldingPlay::HomeRun;
        }
        self.hit(ball)
    }

    /// A ball passing over a non-outfielder low enough to be snagged.
    fn snag_chance<'f>(&self, fielder: &'f Fielder, ball: &BattedBall) -> Option<Chance<'f>> {
        if fielder.position.is_outfield() {
            return None;
        }
        let start = self.start(fielder);
        let depth = start.distance_from_home();
        let carry = ball.carry();
        if carry <= depth || carry <= f64::EPSILON {
            return None;
        }
        let time = ball.landing.hang_time * depth / carry;
        let height = Physics::new(self.cfg).height_at(ball.launch, time);
        if height > self.cfg.get("lineDriveSnagMaxHeight") {
            return None;
        }
        let point = FieldPoint::from_polar(depth, ball.spray_deg);
        let leap = height > self.cfg.get("standingReachHeight");
        self.chance(fielder, start, point, time, carry, leap)
    }

    /// Running to where the ball comes down.
    fn landing_chance<'f>(
        &self,
        fielder: &'f Fielder,
        ball: &BattedBall,
        over_wall: bool,
    ) -> Option<Chance<'f>> {
        if over_wall && !fielder.position.is_outfield() {
            return None;
        }
        let start = self.start(fielder);
        self.chance(
            fielder,
            start,
            ball.landing.point,
            ball.landing.hang_time,
            ball.carry(),
            over_wall,
        )
    }

    fn chance<'f>(
        &self,
        fielder: &'f Fielder,
        start: FieldPoint,
        point: FieldPoint,
        time: f64,
        landing_dist: f64,
        leap: bool,
    ) -> Option<Chance<'f>> {
        let fielding = FieldingAI::new(self.cfg);
        let run_dist = start.distance_to(point);
        if !fielding.should_chase_ball(fielder.position, landing_dist, run_dist) {
            return None;
        }
        let run_time =
            Physics::new(self.cfg).run_time(fielder.position, fielder.fa, fielder.sp, run_dist);
        let action = fielding.catch_action(time, run_time, leap);
        action.attempted().then_some(Chance {
            fielder,
            point,
            time,
            run_time,
            run_dist,
            action,
        })
    }

    /// The ball's path along the ground from its first touchdown.
    fn rollout(&self, ball: &BattedBall) -> Rollout {
        let physics = Physics::new(self.cfg);
        let descent = ball.launch.vz - GRAVITY_FT_S2 * ball.landing.hang_time;
        let (up, speed) = physics.ball_bounce(
            descent,
            ball.launch.horizontal_speed(),
            self.stadium.surface,
            self.env,
        );
        let hop_time = 2.0 * up / GRAVITY_FT_S2;
        let land_dist = ball.carry();
        let hop_dist = speed * hop_time;
        Rollout {
            spray_deg: ball.spray_deg,
            land_dist,
            land_time: ball.landing.hang_time,
            hop_dist,
            hop_time,
            speed,
            friction: physics.roll_friction(self.stadium.surface, self.env),
            stop_dist: land_dist
                + hop_dist
                + physics.ball_roll_distance(speed, self.stadium.surface, self.env),
        }
    }

    /// A ball that got past the defense: the first fielder to cut it off
    /// decides how far it went, the wall caps it.
    fn hit(&self, ball: &BattedBall) -> FieldingPlay {
        let rollout = self.rollout(ball);
        let end = rollout.stop_dist.min(self.stadium.wall_distance(ball.spray_deg));
        let chasers: Vec<&Fielder> = self
            .fielders
            .iter()
            .filter(|f| f.position != Position::Catcher)
            .collect();

        let mut dist = rollout.land_dist;
        let mut cut_off = None;
        while dist < end && cut_off.is_none() {
            let point = FieldPoint::from_polar(dist, rollout.spray_deg);
            let ball_time = rollout.time_at(dist);
            cut_off = chasers
                .iter()
                .map(|f| (f, self.run_time_to(f, point)))
                .filter(|(_, run)| *run <= ball_time)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(f, _)| {
                    let retrieval = Retrieval {
                        position: f.position,
                        point,
                        time: ball_time,
                    };
                    (dist, retrieval)
                });
            dist += GROUND_SCAN_STEP_FT;
        }

        let (total, retrieval) = cut_off.map_or_else(
            || {
                let point = FieldPoint::from_polar(end, rollout.spray_deg);
                let retrieval = chasers
                    .iter()
                    .map(|f| (f, self.run_time_to(f, point)))
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(f, run)| Retrieval {
                        position: f.position,
                        point,
                        time: run.max(rollout.time_at(end)),
                    });
                (end, retrieval)
            },
            |(dist, retrieval)| (dist, Some(retrieval)),
        );
        FieldingPlay::Hit {
            bases: self.stadium.bases_for(ball.spray_deg, ball.carry(), total),
            retrieval,
        }
    }

    fn field_ground<R: RngCore + ?Sized>(
        &self,
        ball: &BattedBall,
        batter_sp: u8,
        force_at_second: bool,
        rng: &mut R,
    ) -> FieldingPlay {
        let rollout = self.rollout(ball);
        let reach = rollout
            .stop_dist
            .min(self.cfg.get("groundBallMaxInterceptDist"));

        let mut dist = rollout.land_dist;
        let mut intercept = None;
        while dist <= reach && intercept.is_none() {
            let time = rollout.time_at(dist);
            let point = FieldPoint::from_polar(dist, ball.spray_deg);
            intercept = self
                .fielders
                .iter()
                .filter(|f| !f.position.is_outfield())
                .filter_map(|f| self.chance(f, self.start(f), point, time, dist, false))
                .max_by(|a, b| a.margin().total_cmp(&b.margin()));
            dist += GROUND_SCAN_STEP_FT;
        }

        let Some(chance) = intercept else {
            return self.hit(ball);
        };
        let fielding = FieldingAI::new(self.cfg);
        let probability = fielding.catch_probability(
            chance.fielder.position,
            chance.fielder.fa,
            chance.time,
            chance.action,
            chance.run_dist,
        );
        let roll = unit_draw(rng);
        match fielding.resolve_catch(
            roll,
            probability,
            self.out_scale(BattedBallType::Ground),
            chance.action,
        ) {
            CatchResult::Out => self.throw_to_first(&chance, batter_sp, force_at_second, rng),
            CatchResult::Error => FieldingPlay::Error {
                fielder: chance.fielder.position,
                throwing: false,
            },
            CatchResult::Hit => self.hit(ball),
        }
    }

    /// The fielder has the ball; race the batter to first.
    fn throw_to_first<R: RngCore + ?Sized>(
        &self,
        chance: &Chance<'_>,
        batter_sp: u8,
        force_at_second: bool,
        rng: &mut R,
    ) -> FieldingPlay {
        let physics = Physics::new(self.cfg);
        let fielding = FieldingAI::new(self.cfg);
        let fielder = chance.fielder;
        let in_glove = chance.time.max(chance.run_time);
        let batter_time = self.cfg.get("batterRunStartDelay")
            + BASE_PATH_FT / physics.player_speed(batter_sp);
        let bag = base_point(Base::First);
        let to_bag = chance.point.distance_to(bag);
        let relay_margin = if force_at_second {
            self.relay_margin(chance, in_glove, batter_time)
        } else {
            None
        };

        if fielder.position == Position::FirstBase {
            let fielder_time = in_glove + to_bag / physics.player_speed(fielder.sp);
            if fielding.should_run_to_bag(fielder_time, batter_time) {
                return FieldingPlay::GroundOut {
                    fielder: fielder.position,
                    margin: batter_time - fielder_time,
                    relay_margin,
                };
            }
        }

        let arrival = in_glove
            + self.cfg.get("fieldingTransferTime")
            + physics.throw_time(fielder.arm, to_bag, fielder.position);
        if !fielding.throw_beats_runner(arrival, batter_time) {
            return FieldingPlay::Hit {
                bases: 1,
                retrieval: Some(Retrieval {
                    position: fielder.position,
                    point: chance.point,
                    time: in_glove,
                }),
            };
        }
        if roll_chance(rng, fielding.good_throw_chance(fielder.fa)) {
            FieldingPlay::GroundOut {
                fielder: fielder.position,
                margin: batter_time - arrival,
                relay_margin,
            }
        } else {
            FieldingPlay::Error {
                fielder: fielder.position,
                throwing: true,
            }
        }
    }

    /// Feed to the pivot at second, then the pivot's throw on to first.
    /// `None` when the relay cannot beat the batter.
    fn relay_margin(&self, chance: &Chance<'_>, in_glove: f64, batter_time: f64) -> Option<f64> {
        let physics = Physics::new(self.cfg);
        let fielder = chance.fielder;
        let pivot_at = pivot_position(fielder.position);
        let pivot = self.fielders.iter().find(|f| f.position == pivot_at)?;
        let transfer = self.cfg.get("fieldingTransferTime");
        let second = base_point(Base::Second);
        let arrival = in_glove
            + transfer
            + physics.throw_time(fielder.arm, chance.point.distance_to(second), fielder.position)
            + transfer
            + physics.throw_time(pivot.arm, second.distance_to(base_point(Base::First)), pivot_at);
        FieldingAI::new(self.cfg)
            .should_relay_throw(arrival, batter_time)
            .then_some(batter_time - arrival)
    }
}

/// A batted ball after its first touchdown: one hop, then a constant
/// deceleration roll.
#[derive(Debug, Clone, Copy)]
struct Rollout {
    spray_deg: f64,
    land_dist: f64,
    land_time: f64,
    hop_dist: f64,
    hop_time: f64,
    speed: f64,
    friction: f64,
    stop_dist: f64,
}

impl Rollout {
    /// Seconds after contact until the ball is `dist` feet from home.
    fn time_at(&self, dist: f64) -> f64 {
        let past = (dist - self.land_dist).max(0.0);
        if past <= self.hop_dist {
            if self.speed <= 0.0 {
                return self.land_time;
            }
            return self.land_time + past / self.speed;
        }
        self.land_time + self.hop_time + roll_time(self.speed, self.friction, past - self.hop_dist)
    }
}

/// Seconds for a ball rolling at `speed` to cover `dist` feet under constant
/// deceleration; infinite when it stops short.
fn roll_time(speed: f64, friction: f64, dist: f64) -> f64 {
    if dist <= 0.0 {
        return 0.0;
    }
    if speed <= 0.0 {
        return f64::INFINITY;
    }
    let disc = speed.mul_add(speed, -2.0 * friction * dist);
    if disc < 0.0 {
        return speed / friction;
    }
    (speed - disc.sqrt()) / friction
}
