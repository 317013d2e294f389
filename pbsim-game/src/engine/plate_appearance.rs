//! One plate appearance, from the pre-pitch decisions to the last runner.
//!
//! Draws are taken in a fixed order: policy calls (none), pitch-around and
//! intentional walk, the hold and pickoff rolls, the steal, the offensive
//! play (squeeze, sacrifice or hit-and-run), then the pitch loop and the ball
//! in play. A manager call whose chance is zero is skipped without a draw;
//! pickoffs and steals draw whenever a runner qualifies.

use crate::baserunning::{Baserunning, CaughtBall, PickoffOutcome, PlayResult, StealOutcome};
use crate::batter_ai::BatterAI;
use crate::config::ConfigTable;
use crate::constants::{LOG_PINCH_HIT, LOG_PINCH_RUN, LOG_PITCHING_CHANGE, OUTS_PER_HALF};
use crate::engine::ball_in_play::{
    BattedBall, BattedBallType, Contact, Defense, FieldingPlay, launch_batted_ball,
};
use crate::engine::count::{Count, CountEvent, CountState};
use crate::engine::pitch::{PitchContext, PitchOutcome, PitchSetup, resolve_pitch};
use crate::engine::{SimulationError, debug_log_enabled};
use crate::physics::{PitchLocation, SwingType};
use crate::pitcher_ai::PitcherAI;
use crate::player::{Pitcher, Player, PlayerId, Position};
use crate::rng::roll_chance;
use crate::stadium::{Alignment, Environment, Stadium};
use crate::state::{Base, Fielder, PitchCounters, TeamState};
use crate::strategy::{Manager, Situation};
use crate::substitution::SubstitutionPolicy;
use rand::RngCore;
use serde::Serialize;

/// How a plate appearance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateAppearanceResult {
    Walk,
    IntentionalWalk,
    HitByPitch,
    Strikeout { looking: bool },
    Hit { bases: u8 },
    /// Caught in the air or thrown out at first.
    Out,
    FieldersChoice,
    DoublePlay,
    ReachedOnError,
    Sacrifice,
    SacrificeFly,
    /// A pickoff or caught stealing made the third out first; the batter
    /// leads off the next inning.
    InningEnded,
}

impl PlateAppearanceResult {
    /// Whether the plate appearance counts as an at-bat.
    #[must_use]
    pub const fn is_at_bat(self) -> bool {
        matches!(
            self,
            Self::Strikeout { .. }
                | Self::Hit { .. }
                | Self::Out
                | Self::FieldersChoice
                | Self::DoublePlay
                | Self::ReachedOnError
        )
    }

    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// Record of one finished plate appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateAppearance {
    pub batter: PlayerId,
    pub pitcher: PlayerId,
    pub result: PlateAppearanceResult,
    pub pitches: u32,
    /// Outs in the half inning after the play.
    pub outs: u8,
    pub runs: u32,
    pub rbi: u32,
    pub batted_ball: Option<BattedBall>,
}

/// The offense's called play for this plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffensivePlay {
    Swing,
    HitAndRun,
    Sacrifice,
    Squeeze,
}

/// Exclusive view of a game for the half inning being played.
pub(crate) struct HalfInning<'g, R: RngCore + ?Sized, P: SubstitutionPolicy + ?Sized> {
    pub(crate) cfg: &'g ConfigTable,
    pub(crate) offense: &'g mut TeamState,
    pub(crate) defense: &'g mut TeamState,
    pub(crate) rng: &'g mut R,
    pub(crate) policy: &'g P,
    pub(crate) pitcher_ai: &'g mut PitcherAI,
    pub(crate) batter_ai: &'g mut BatterAI,
    pub(crate) stadium: &'g Stadium,
    pub(crate) environment: &'g Environment,
    pub(crate) debug_log: &'g mut Vec<String>,
    pub(crate) inning: u8,
    pub(crate) outs: u8,
}

impl<R: RngCore + ?Sized, P: SubstitutionPolicy + ?Sized> HalfInning<'_, R, P> {
    fn run_diff(&self) -> i32 {
        let diff = i64::from(self.offense.runs) - i64::from(self.defense.runs);
        i32::try_from(diff).unwrap_or(0)
    }

    fn note(&mut self, message: String) {
        log::debug!("{message}");
        self.debug_log.push(message);
    }

    /// Ask the policy for a reliever and make the change.
    fn pitching_change(&mut self) -> Result<(), SimulationError> {
        let Some(id) = self
            .policy
            .maybe_replace_pitcher(self.cfg, self.defense, self.inning)
        else {
            return Ok(());
        };
        let outgoing = self
            .defense
            .current_pitcher()
            .map(|p| p.id().clone());
        self.defense.change_pitcher(&id)?;
        let team = self.defense.name().to_string();
        let message = match outgoing {
            Some(old) => format!(
                "{LOG_PITCHING_CHANGE}: {team} {id} replaces {old} in inning {}",
                self.inning
            ),
            None => format!("{LOG_PITCHING_CHANGE}: {team} {id} in inning {}", self.inning),
        };
        self.note(message);
        Ok(())
    }

    fn pinch_runner(&mut self) -> Result<(), SimulationError> {
        let situation = Situation {
            bases: &self.offense.bases,
            outs: self.outs,
            inning: self.inning,
            run_diff: self.run_diff(),
        };
        let Some((base, id)) = self
            .policy
            .maybe_pinch_run(self.cfg, self.offense, &situation)
        else {
            return Ok(());
        };
        let replaced = self.offense.bases.runner(base).map(|r| r.id.clone());
        self.offense.substitute_runner(base, &id)?;
        let team = self.offense.name().to_string();
        let replaced = replaced.map_or_else(String::new, |r| format!(" for {r}"));
        self.note(format!("{LOG_PINCH_RUN}: {team} {id}{replaced} at {base:?}"));
        Ok(())
    }

    fn pinch_hitter(&mut self, slot: usize) -> Result<(), SimulationError> {
        let situation = Situation {
            bases: &self.offense.bases,
            outs: self.outs,
            inning: self.inning,
            run_diff: self.run_diff(),
        };
        let Some(id) = self
            .policy
            .maybe_pinch_hit(self.cfg, self.offense, slot, &situation)
        else {
            return Ok(());
        };
        let replaced = self.offense.lineup().get(slot).map(|p| p.id.clone());
        self.offense.substitute_batter(slot, &id)?;
        let team = self.offense.name().to_string();
        let replaced = replaced.map_or_else(String::new, |r| format!(" for {r}"));
        self.note(format!("{LOG_PINCH_HIT}: {team} {id}{replaced}"));
        Ok(())
    }

    fn baserunning<'b>(
        cfg: &'b ConfigTable,
        offense: &'b mut TeamState,
        defense: &'b mut TeamState,
        fielders: &'b [Fielder],
        pitcher: &PlayerId,
        outs: &'b mut u8,
    ) -> Baserunning<'b> {
        Baserunning::new(cfg, offense, defense, fielders, pitcher.clone(), outs)
    }

    /// Play one plate appearance for the batter due up.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NoPitcher`] when the defense has nobody on
    /// the mound, [`SimulationError::EmptyLineup`] when the offense has no
    /// batter, [`SimulationError::UnknownPlayer`] when a policy names someone
    /// off the roster, and [`SimulationError::NoPitchTypes`] from pitch
    /// selection.
    pub(crate) fn play_plate_appearance(&mut self) -> Result<PlateAppearance, SimulationError> {
        self.pitching_change()?;
        let pitcher = self
            .defense
            .current_pitcher()
            .cloned()
            .ok_or_else(|| SimulationError::NoPitcher {
                team: self.defense.name().to_string(),
            })?;
        self.pinch_runner()?;

        let slot = self.offense.due_up_slot();
        let mut batter = self
            .offense
            .due_up()
            .cloned()
            .ok_or_else(|| SimulationError::EmptyLineup {
                team: self.offense.name().to_string(),
            })?;
        let fielders = self.defense.defensive_alignment();
        let manager = Manager::new(self.cfg);

        let pitch_around = {
            let situation = Situation {
                bases: &self.offense.bases,
                outs: self.outs,
                inning: self.inning,
                run_diff: self.run_diff(),
            };
            let chance = manager.pitch_around_chance(&batter.ratings, &situation);
            chance > 0.0 && roll_chance(self.rng, chance)
        };
        if pitch_around {
            let chance = manager.intentional_walk_chance();
            if chance > 0.0 && roll_chance(self.rng, chance) {
                return Ok(self.intentional_walk(&batter, &pitcher, &fielders));
            }
        }

        if let Some(ended) = self.running_game(&batter, &pitcher, &fielders) {
            return Ok(ended);
        }

        self.pinch_hitter(slot)?;
        if let Some(player) = self.offense.lineup().get(slot) {
            batter = player.clone();
        }

        let situation = Situation {
            bases: &self.offense.bases,
            outs: self.outs,
            inning: self.inning,
            run_diff: self.run_diff(),
        };
        let is_pitcher = batter.primary_position == Position::Pitcher;
        let mut play = OffensivePlay::Swing;
        let mut prior_lead = None;
        let squeeze = manager.squeeze_chance(&batter.ratings, &situation);
        let sacrifice = manager.sacrifice_chance(&batter.ratings, is_pitcher, &situation);
        let hit_and_run = manager.hit_and_run_chance(&batter.ratings, &situation);
        let alignment = manager.choose_alignment(&batter.ratings, &situation);
        if squeeze > 0.0 && roll_chance(self.rng, squeeze) {
            play = OffensivePlay::Squeeze;
        } else if sacrifice > 0.0 && roll_chance(self.rng, sacrifice) {
            play = OffensivePlay::Sacrifice;
        } else if hit_and_run > 0.0 && roll_chance(self.rng, hit_and_run) {
            play = OffensivePlay::HitAndRun;
            if let Some(runner) = self.offense.bases.runner_mut(Base::First) {
                prior_lead = Some(runner.lead);
                runner.lead = 2;
            }
        }
        log::trace!(
            "plate appearance: {} vs {} in inning {} with {} out, {play:?}",
            batter.id,
            pitcher.id(),
            self.inning,
            self.outs
        );

        let mut count = Count::new();
        let mut pitches = 0_u32;
        loop {
            let first_pitch = pitches == 0;
            let swing_type = match play {
                OffensivePlay::Squeeze if first_pitch => SwingType::Bunt,
                OffensivePlay::Sacrifice if count.strikes() < 2 => SwingType::Bunt,
                _ => manager.swing_type(&batter.ratings, count.balls(), count.strikes()),
            };
            let forced_swing = first_pitch
                && matches!(play, OffensivePlay::Squeeze | OffensivePlay::HitAndRun);
            let setup = PitchSetup {
                batter: &batter,
                pitcher: &pitcher,
                count,
                pitches_thrown: self
                    .defense
                    .current_pitcher_state()
                    .map_or(0, |state| state.pitches_thrown()),
                swing_type,
                forced_swing,
                pitch_around,
            };
            let (context, outcome) =
                resolve_pitch(self.cfg, self.pitcher_ai, self.batter_ai, &setup, self.rng)?;
            pitches += 1;
            self.record_pitch(&batter, &context, &outcome);
            if debug_log_enabled() {
                self.debug_log.push(format!(
                    "inning {} {} pitch {pitches}: {:?} at {}-{} dist {} swing {} \
                     contact {} -> {:?}",
                    self.inning,
                    batter.id,
                    context.pitch,
                    context.balls,
                    context.strikes,
                    context.location.dist,
                    outcome.swing,
                    outcome.contact,
                    outcome.event
                ));
            }

            if outcome.hbp {
                return Ok(self.hit_by_pitch(&batter, &pitcher, &fielders, pitches));
            }
            if outcome.ball_in_play {
                let location =
                    PitchLocation::from_offsets(context.location.dx, context.location.dy);
                let contact = Contact {
                    swing_type,
                    quality: outcome.contact_quality,
                    pitch_speed_mph: context.speed_mph,
                    location,
                };
                return Ok(self.ball_in_play(
                    &batter,
                    &pitcher,
                    &fielders,
                    alignment,
                    &contact,
                    play == OffensivePlay::Squeeze,
                    pitches,
                ));
            }
            if let Some(lead) = prior_lead.take() {
                if let Some(runner) = self.offense.bases.runner_mut(Base::First) {
                    runner.lead = lead;
                }
            }
            let Some(event) = outcome.event else {
                continue;
            };
            match count.apply(event) {
                CountState::InProgress => {}
                CountState::Walk => return Ok(self.walk(&batter, &pitcher, &fielders, pitches)),
                CountState::StrikeoutLooking => {
                    return Ok(self.strikeout(&batter, &pitcher, &fielders, true, pitches));
                }
                CountState::StrikeoutSwinging => {
                    return Ok(self.strikeout(&batter, &pitcher, &fielders, false, pitches));
                }
            }
        }
    }

    /// Leads, the hold, a pickoff throw and a steal. Returns the finished
    /// plate appearance when the inning ends on the bases.
    fn running_game(
        &mut self,
        batter: &Player,
        pitcher: &Pitcher,
        fielders: &[Fielder],
    ) -> Option<PlateAppearance> {
        let manager = Manager::new(self.cfg);
        let mut bases = Self::baserunning(
            self.cfg,
            self.offense,
            self.defense,
            fielders,
            pitcher.id(),
            &mut self.outs,
        );
        bases.take_leads();
        drop(bases);

        let held = match self.offense.bases.runner(Base::First) {
            Some(runner) => {
                let sp = self.offense.ratings_of(&runner.id).sp;
                let chance = manager.hold_runner_chance(sp);
                chance > 0.0 && roll_chance(self.rng, chance)
            }
            None => false,
        };

        let mut bases = Self::baserunning(
            self.cfg,
            self.offense,
            self.defense,
            fielders,
            pitcher.id(),
            &mut self.outs,
        );
        let pickoff = bases.attempt_pickoff(self.rng);
        let steal = if bases.outs() < OUTS_PER_HALF {
            bases.attempt_steal(held, self.rng)
        } else {
            None
        };
        drop(bases);
        match &pickoff {
            Some(PickoffOutcome::PickedOff { runner, base }) => {
                log::trace!("{runner} picked off at {base:?}");
            }
            Some(PickoffOutcome::Scared { runner, .. }) => log::trace!("{runner} scared back"),
            Some(PickoffOutcome::Safe { .. }) | None => {}
        }
        match &steal {
            Some(StealOutcome::Stolen { runner, base }) => log::trace!("{runner} steals {base:?}"),
            Some(StealOutcome::CaughtStealing { runner, base }) => {
                log::trace!("{runner} caught stealing {base:?}");
            }
            None => {}
        }
        (self.outs >= OUTS_PER_HALF).then(|| PlateAppearance {
            batter: batter.id.clone(),
            pitcher: pitcher.id().clone(),
            result: PlateAppearanceResult::InningEnded,
            pitches: 0,
            outs: self.outs,
            runs: 0,
            rbi: 0,
            batted_ball: None,
        })
    }

    fn record_pitch(&mut self, batter: &Player, context: &PitchContext, outcome: &PitchOutcome) {
        tally(&mut self.offense.batter_state_mut(batter).pitches, context, outcome);
        if let Some(state) = self.defense.current_pitcher_state_mut() {
            tally(&mut state.pitches, context, outcome);
            match outcome.event {
                Some(CountEvent::Ball) => state.balls += 1,
                Some(_) => state.strikes += 1,
                None if outcome.ball_in_play => state.strikes += 1,
                None => {}
            }
        }
    }

    /// Common bookkeeping for a finished plate appearance.
    fn finish(
        &mut self,
        batter: &Player,
        pitcher: &Pitcher,
        result: PlateAppearanceResult,
        pitches: u32,
        play: PlayResult,
        batted_ball: Option<BattedBall>,
    ) -> PlateAppearance {
        let stats = self.offense.batter_state_mut(batter);
        stats.pa += 1;
        if result.is_at_bat() {
            stats.ab += 1;
        }
        let state = self.defense.pitcher_state_mut(pitcher.id());
        state.batters_faced += 1;
        if !result.is_hit() {
            state.consecutive_hits = 0;
        }
        self.offense.batting_index += 1;
        log::trace!(
            "{} vs {}: {result:?} after {pitches} pitches, {} run(s), {} out",
            batter.id,
            pitcher.id(),
            play.runs,
            self.outs
        );
        PlateAppearance {
            batter: batter.id.clone(),
            pitcher: pitcher.id().clone(),
            result,
            pitches,
            outs: self.outs,
            runs: play.runs,
            rbi: play.rbi,
            batted_ball,
        }
    }

    fn intentional_walk(
        &mut self,
        batter: &Player,
        pitcher: &Pitcher,
        fielders: &[Fielder],
    ) -> PlateAppearance {
        let stats = self.offense.batter_state_mut(batter);
        stats.bb += 1;
        stats.ibb += 1;
        let toast = self.cfg.get("pitchScoringWalk");
        let state = self.defense.pitcher_state_mut(pitcher.id());
        state.walks += 1;
        state.ibb += 1;
        state.toast += toast;
        let mut bases = Self::baserunning(
            self.cfg,
            self.offense,
            self.defense,
            fielders,
            pitcher.id(),
            &mut self.outs,
        );
        let play = bases.advance_walk(batter);
        self.finish(batter, pitcher, PlateAppearanceResult::IntentionalWalk, 0, play, None)
    }

    fn walk(
        &mut self,
        batter: &Player,
        pitcher: &Pitcher,
        fielders: &[Fielder],
        pitches: u32,
    ) -> PlateAppearance {
        self.offense.batter_state_mut(batter).bb += 1;
        let toast = self.cfg.get("pitchScoringWalk");
        let state = self.defense.pitcher_state_mut(pitcher.id());
        state.walks += 1;
        state.toast += toast;
        let mut bases = Self::baserunning(
            self.cfg,
            self.offense,
            self.defense,
            fielders,
            pitcher.id(),
            &mut self.outs,
        );
        let play = bases.advance_walk(batter);
        self.finish(batter, pitcher, PlateAppearanceResult::Walk, pitches, play, None)
    }

    fn hit_by_pitch(
        &mut self,
        batter: &Player,
        pitcher: &Pitcher,
        fielders: &[Fielder],
        pitches: u32,
    ) -> PlateAppearance {
        self.offense.batter_state_mut(batter).hbp += 1;
        let toast = self.cfg.get("pitchScoringWalk");
        let state = self.defense.pitcher_state_mut(pitcher.id());
        state.hbp += 1;
        state.toast += toast;
        let mut bases = Self::baserunning(
            self.cfg,
            self.offense,
            self.defense,
            fielders,
            pitcher.id(),
            &mut self.outs,
        );
        let play = bases.advance_walk(batter);
        self.finish(batter, pitcher, PlateAppearanceResult::HitByPitch, pitches, play, None)
    }

    fn strikeout(
        &mut self,
        batter: &Player,
        pitcher: &Pitcher,
        fielders: &[Fielder],
        looking: bool,
        pitches: u32,
    ) -> PlateAppearance {
        let stats = self.offense.batter_state_mut(batter);
        stats.so += 1;
        if looking {
            stats.so_looking += 1;
        }
        let toast = self.cfg.get("pitchScoringStrikeOut");
        let state = self.defense.pitcher_state_mut(pitcher.id());
        state.strikeouts += 1;
        state.toast += toast;
        let mut bases = Self::baserunning(
            self.cfg,
            self.offense,
            self.defense,
            fielders,
            pitcher.id(),
            &mut self.outs,
        );
        bases.record_out(Some(Position::Catcher), None);
        let play = PlayResult {
            outs: 1,
            ..PlayResult::default()
        };
        self.finish(
            batter,
            pitcher,
            PlateAppearanceResult::Strikeout { looking },
            pitches,
            play,
            None,
        )
    }

    fn credit_hit(&mut self, batter: &Player, pitcher: &Pitcher, bases: u8) {
        self.offense.batter_state_mut(batter).record_hit(bases);
        self.offense.hits += 1;
        let cfg = self.cfg;
        let state = self.defense.pitcher_state_mut(pitcher.id());
        state.hits += 1;
        state.consecutive_hits += 1;
        if bases >= 4 {
            state.home_runs += 1;
            state.toast += cfg.get("pitchScoringHR");
        } else {
            state.toast += cfg.get("pitchScoringHit");
        }
        if state.consecutive_hits > 1 {
            state.toast += cfg.get("pitchScoringConsHit");
        }
    }

    fn credit_error(&mut self, fielders: &[Fielder], position: Position) {
        if let Some(fielder) = fielders.iter().find(|f| f.position == position) {
            let stats = self.defense.fielding_state_mut(&fielder.id);
            stats.errors += 1;
            stats.chances += 1;
        }
        self.defense.errors += 1;
    }

    fn record_batted_ball(&mut self, batter: &Player, pitcher: &Pitcher, kind: BattedBallType) {
        let stats = self.offense.batter_state_mut(batter);
        let state = self.defense.pitcher_state_mut(pitcher.id());
        match kind {
            BattedBallType::Ground => {
                stats.ground_balls += 1;
                state.ground_balls += 1;
            }
            BattedBallType::Line => {
                stats.line_drives += 1;
                state.line_drives += 1;
            }
            BattedBallType::Fly => {
                stats.fly_balls += 1;
                state.fly_balls += 1;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn ball_in_play(
        &mut self,
        batter: &Player,
        pitcher: &Pitcher,
        fielders: &[Fielder],
        alignment: Alignment,
        contact: &Contact,
        squeeze: bool,
        pitches: u32,
    ) -> PlateAppearance {
        if contact.swing_type == SwingType::Bunt {
            self.record_batted_ball(batter, pitcher, BattedBallType::Ground);
            let fielder = if self.offense.bases.is_occupied(Base::Second) {
                Position::ThirdBase
            } else {
                Position::Pitcher
            };
            let mut bases = Self::baserunning(
                self.cfg,
                self.offense,
                self.defense,
                fielders,
                pitcher.id(),
                &mut self.outs,
            );
            let play = bases.sacrifice(batter, fielder, squeeze);
            return self.finish(
                batter,
                pitcher,
                PlateAppearanceResult::Sacrifice,
                pitches,
                play,
                None,
            );
        }

        let ball = launch_batted_ball(
            self.cfg,
            self.environment,
            batter,
            &pitcher.ratings,
            contact,
            self.rng,
        );
        self.record_batted_ball(batter, pitcher, ball.kind);
        let defense = Defense::new(self.cfg, self.stadium, self.environment, fielders, alignment);
        let fielding = defense.field(
            &ball,
            batter.ratings.sp,
            self.outs,
            &self.offense.bases,
            self.rng,
        );

        let mut bases = Self::baserunning(
            self.cfg,
            self.offense,
            self.defense,
            fielders,
            pitcher.id(),
            &mut self.outs,
        );
        let mut error = None;
        let (result, play) = match fielding {
            FieldingPlay::HomeRun => {
                let play = bases.advance_hit(batter, 4, None, self.rng);
                (PlateAppearanceResult::Hit { bases: 4 }, play)
            }
            FieldingPlay::Hit { bases: n, retrieval } => {
                let play = bases.advance_hit(batter, n, retrieval.as_ref(), self.rng);
                (PlateAppearanceResult::Hit { bases: n }, play)
            }
            FieldingPlay::Caught { retrieval, kind } => {
                let play = bases.caught_ball(batter, &retrieval, kind);
                let result = if play.sacrifice_fly && kind == CaughtBall::Fly {
                    PlateAppearanceResult::SacrificeFly
                } else {
                    PlateAppearanceResult::Out
                };
                (result, play)
            }
            FieldingPlay::GroundOut {
                fielder,
                relay_margin,
                ..
            } => {
                let play = bases.ground_out(batter, fielder, relay_margin, self.rng);
                let result = if play.double_play {
                    PlateAppearanceResult::DoublePlay
                } else if play.fielders_choice {
                    PlateAppearanceResult::FieldersChoice
                } else {
                    PlateAppearanceResult::Out
                };
                (result, play)
            }
            FieldingPlay::Error { fielder, throwing } => {
                error = Some(fielder);
                let play = bases.advance_on_error(batter, if throwing { 2 } else { 1 });
                (PlateAppearanceResult::ReachedOnError, play)
            }
        };
        drop(bases);
        if let Some(fielder) = error {
            self.credit_error(fielders, fielder);
            self.offense.batter_state_mut(batter).roe += 1;
        }
        if let PlateAppearanceResult::Hit { bases: n } = result {
            self.credit_hit(batter, pitcher, n);
        }
        self.finish(batter, pitcher, result, pitches, play, Some(ball))
    }
}

fn tally(counters: &mut PitchCounters, context: &PitchContext, outcome: &PitchOutcome) {
    counters.record(context.in_zone, outcome.swing, outcome.contact);
    match outcome.event {
        Some(CountEvent::CalledStrike) => counters.called_strikes += 1,
        Some(CountEvent::SwingingStrike) => counters.swinging_strikes += 1,
        Some(CountEvent::Foul) => counters.fouls += 1,
        Some(CountEvent::Ball) | None => {}
    }
    if outcome.ball_in_play {
        counters.balls_in_play += 1;
    }
}
