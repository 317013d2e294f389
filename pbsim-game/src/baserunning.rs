//! Runner advancement, scoring and outs on the bases.
//!
//! Runners always move in reverse base order (third, second, first) so a slot
//! is vacated before anyone is placed on it. Runs that cross the plate during
//! a play are held until the play is over: if that play ends the inning with a
//! force out or an out on the batter, they never count.

use crate::config::ConfigTable;
use crate::constants::BASE_PATH_FT;
use crate::fielding_ai::FieldingAI;
use crate::numbers::{clamp01, usize_to_f64};
use crate::physics::Physics;
use crate::player::{Player, PlayerId, Position};
use crate::rng::roll_chance;
use crate::stadium::{FieldPoint, base_point};
use crate::state::{Base, Fielder, Runner, TeamState};
use crate::strategy::Manager;
use rand::RngCore;
use serde::Serialize;
use smallvec::SmallVec;

/// Where and when the defense first has the ball in hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Retrieval {
    pub position: Position,
    pub point: FieldPoint,
    /// Seconds after contact.
    pub time: f64,
}

/// How a caught ball left the bat, which decides whether runners may tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaughtBall {
    Fly,
    Line,
    InfieldFly,
}

/// Bookkeeping from one baserunning play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayResult {
    pub runs: u32,
    pub rbi: u32,
    pub outs: u8,
    pub sacrifice_fly: bool,
    pub sacrifice: bool,
    pub double_play: bool,
    pub fielders_choice: bool,
    /// A runner trying for an extra base was thrown out.
    pub runner_thrown_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StealOutcome {
    Stolen { runner: PlayerId, base: Base },
    CaughtStealing { runner: PlayerId, base: Base },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PickoffOutcome {
    PickedOff { runner: PlayerId, base: Base },
    /// The throw missed but scared the runner back to the bag.
    Scared { runner: PlayerId, base: Base },
    Safe { runner: PlayerId, base: Base },
}

/// At most four runs can score on one play.
type PendingRuns = SmallVec<[PendingRun; 4]>;

struct PendingRun {
    runner: Runner,
    rbi: bool,
    earned: bool,
}

/// Base-state mutator for one plate appearance.
///
/// Holds exclusive borrows of both teams and the half-inning out counter; the
/// engine builds one whenever runners may move.
pub struct Baserunning<'a> {
    cfg: &'a ConfigTable,
    offense: &'a mut TeamState,
    defense: &'a mut TeamState,
    fielders: &'a [Fielder],
    pitcher: PlayerId,
    outs: &'a mut u8,
}

impl<'a> Baserunning<'a> {
    #[must_use]
    pub fn new(
        cfg: &'a ConfigTable,
        offense: &'a mut TeamState,
        defense: &'a mut TeamState,
        fielders: &'a [Fielder],
        pitcher: PlayerId,
        outs: &'a mut u8,
    ) -> Self {
        Self {
            cfg,
            offense,
            defense,
            fielders,
            pitcher,
            outs,
        }
    }

    #[must_use]
    pub fn outs(&self) -> u8 {
        *self.outs
    }

    fn fielder(&self, position: Position) -> Option<&Fielder> {
        self.fielders.iter().find(|f| f.position == position)
    }

    fn speed_rating(&self, id: &PlayerId) -> u8 {
        self.offense.ratings_of(id).sp
    }

    fn runner_speed(&self, id: &PlayerId) -> f64 {
        Physics::new(self.cfg).player_speed(self.speed_rating(id))
    }

    fn batter_runner(&self, batter: &Player, earned: bool) -> Runner {
        Runner::new(batter.id.clone(), self.pitcher.clone(), earned)
    }

    fn move_runner(&mut self, from: Base, to: Base) {
        if let Some(mut runner) = self.offense.bases.take(from) {
            runner.lead = 0;
            self.offense.bases.place(to, runner);
        }
    }

    fn credit_fielder(&mut self, position: Position, putout: bool) {
        let Some(id) = self.fielder(position).map(|f| f.id.clone()) else {
            return;
        };
        let stats = self.defense.fielding_state_mut(&id);
        stats.chances += 1;
        if putout {
            stats.putouts += 1;
        } else {
            stats.assists += 1;
        }
    }

    /// Record one out, crediting the pitcher on the mound and the fielders.
    pub fn record_out(&mut self, putout: Option<Position>, assist: Option<Position>) {
        *self.outs += 1;
        let toast = self.cfg.get("pitchScoringOut");
        let pitcher = self.defense.pitcher_state_mut(&self.pitcher);
        pitcher.outs += 1;
        pitcher.toast += toast;
        if let Some(position) = assist {
            self.credit_fielder(position, false);
        }
        if let Some(position) = putout {
            self.credit_fielder(position, true);
        }
    }

    fn commit(&mut self, pending: PendingRuns, batter: &PlayerId, nullified: bool) -> (u32, u32) {
        if nullified {
            // Runners whose runs the third out wiped off are left on base.
            self.offense.left_on_base += u32::try_from(pending.len()).unwrap_or(0);
            return (0, 0);
        }
        let mut runs = 0;
        let mut rbi = 0;
        for run in pending {
            self.score(&run.runner, run.earned);
            runs += 1;
            if run.rbi {
                rbi += 1;
            }
        }
        if rbi > 0 {
            if let Some(stats) = self.offense.batter_state_by_id(batter) {
                stats.rbi += rbi;
            }
        }
        (runs, rbi)
    }

    fn score(&mut self, runner: &Runner, earned: bool) {
        self.offense.runs += 1;
        if let Some(inning) = self.offense.inning_runs.last_mut() {
            *inning += 1;
        }
        if let Some(stats) = self.offense.batter_state_by_id(&runner.id) {
            stats.r += 1;
        }
        let run_toast = self.cfg.get("pitchScoringRun");
        let er_toast = self.cfg.get("pitchScoringER");
        let charged = self.defense.pitcher_state_mut(&runner.charged_to);
        charged.runs += 1;
        charged.toast += run_toast;
        if earned {
            charged.earned_runs += 1;
            charged.toast += er_toast;
        }
    }

    /// Give every runner their lead for the coming plate appearance.
    pub fn take_leads(&mut self) {
        let manager = Manager::new(self.cfg);
        for base in Base::ALL {
            let sp = match self.offense.bases.runner(base) {
                Some(runner) => self.speed_rating(&runner.id),
                None => continue,
            };
            if let Some(runner) = self.offense.bases.runner_mut(base) {
                runner.lead = manager.lead_for_speed(sp);
            }
        }
    }

    /// Walk, intentional walk or hit batter: forced runners move up one base.
    pub fn advance_walk(&mut self, batter: &Player) -> PlayResult {
        let mut pending = PendingRuns::new();
        if self.offense.bases.is_forced(Base::Third) {
            if let Some(runner) = self.offense.bases.take(Base::Third) {
                let earned = runner.earned;
                pending.push(PendingRun {
                    runner,
                    rbi: true,
                    earned,
                });
            }
        }
        if self.offense.bases.is_forced(Base::Second) {
            self.move_runner(Base::Second, Base::Third);
        }
        if self.offense.bases.is_occupied(Base::First) {
            self.move_runner(Base::First, Base::Second);
        }
        let runner = self.batter_runner(batter, true);
        self.offense.bases.place(Base::First, runner);
        let (runs, rbi) = self.commit(pending, &batter.id, false);
        PlayResult {
            runs,
            rbi,
            ..PlayResult::default()
        }
    }

    /// Whether a runner going for an extra base on a hit should try it.
    fn extra_base_attempt(&self, from: Base, hit_bases: u8, sp: u8) -> bool {
        let sp = f64::from(sp);
        match (hit_bases, from) {
            (1, Base::Second) => sp >= self.cfg.get("runnerScoreFromSecondSpeed"),
            (1, Base::First) => {
                !self.offense.bases.is_occupied(Base::Third)
                    && sp >= self.cfg.get("runnerFirstToThirdSpeed")
            }
            (2, Base::First) => sp >= self.cfg.get("runnerScoreFromFirstSpeed"),
            _ => false,
        }
    }

    /// Throw from the retrieval point to the runner's target; consumes the
    /// throw-accuracy draw only when the throw arrives in time.
    fn thrown_out_advancing<R: RngCore + ?Sized>(
        &self,
        runner: &Runner,
        from: Base,
        target: Option<Base>,
        retrieval: &Retrieval,
        rng: &mut R,
    ) -> bool {
        let Some(fielder) = self.fielder(retrieval.position) else {
            return false;
        };
        let physics = Physics::new(self.cfg);
        let fielding = FieldingAI::new(self.cfg);
        let target_point = target.map_or(FieldPoint::HOME, base_point);
        let throw = retrieval.time
            + self.cfg.get("fieldingTransferTime")
            + physics.throw_time(
                fielder.arm,
                retrieval.point.distance_to(target_point),
                fielder.position,
            );
        let target_number = target.map_or(4, |base| base.index() + 1);
        let bases_to_run = target_number.saturating_sub(from.index() + 1);
        let lead = Manager::new(self.cfg).lead_feet(runner.lead);
        let distance = (usize_to_f64(bases_to_run) * BASE_PATH_FT - lead).max(0.0);
        let runner_time = distance / self.runner_speed(&runner.id);
        if !fielding.should_tag_runner(throw, runner_time) {
            return false;
        }
        roll_chance(rng, fielding.good_throw_chance(fielder.fa))
    }

    /// Advance runners and the batter on a clean hit worth `hit_bases` bases.
    pub fn advance_hit<R: RngCore + ?Sized>(
        &mut self,
        batter: &Player,
        hit_bases: u8,
        retrieval: Option<&Retrieval>,
        rng: &mut R,
    ) -> PlayResult {
        let hit_bases = hit_bases.clamp(1, 4);
        let mut pending = PendingRuns::new();
        let mut result = PlayResult::default();
        let mut throw_used = false;
        for from in [Base::Third, Base::Second, Base::First] {
            let sp = match self.offense.bases.runner(from) {
                Some(runner) => self.speed_rating(&runner.id),
                None => continue,
            };
            let extra = hit_bases < 4 && self.extra_base_attempt(from, hit_bases, sp);
            let Some(mut runner) = self.offense.bases.take(from) else {
                continue;
            };
            let target = from.advanced(hit_bases + u8::from(extra));
            if extra && !throw_used {
                if let Some(retrieval) = retrieval {
                    throw_used = true;
                    if self.thrown_out_advancing(&runner, from, target, retrieval, rng) {
                        let covering = target.map_or(Position::Catcher, covering_position);
                        self.record_out(Some(covering), Some(retrieval.position));
                        result.outs += 1;
                        result.runner_thrown_out = true;
                        continue;
                    }
                }
            }
            runner.lead = 0;
            match target {
                Some(base) => {
                    self.offense.bases.place(base, runner);
                }
                None => {
                    let earned = runner.earned;
                    pending.push(PendingRun {
                        runner,
                        rbi: true,
                        earned,
                    });
                }
            }
        }
        let runner = self.batter_runner(batter, true);
        match Base::First.advanced(hit_bases - 1) {
            Some(base) => {
                self.offense.bases.place(base, runner);
            }
            None => {
                pending.push(PendingRun {
                    runner,
                    rbi: true,
                    earned: true,
                });
            }
        }
        let (runs, rbi) = self.commit(pending, &batter.id, false);
        result.runs = runs;
        result.rbi = rbi;
        result
    }

    /// Batter reaches on an error; everyone moves up `bases` and any run is unearned.
    pub fn advance_on_error(&mut self, batter: &Player, bases: u8) -> PlayResult {
        let bases = bases.clamp(1, 3);
        let mut pending = PendingRuns::new();
        for from in [Base::Third, Base::Second, Base::First] {
            let Some(mut runner) = self.offense.bases.take(from) else {
                continue;
            };
            runner.lead = 0;
            match from.advanced(bases) {
                Some(base) => {
                    self.offense.bases.place(base, runner);
                }
                None => pending.push(PendingRun {
                    runner,
                    rbi: false,
                    earned: false,
                }),
            }
        }
        let runner = self.batter_runner(batter, false);
        if let Some(base) = Base::First.advanced(bases - 1) {
            self.offense.bases.place(base, runner);
        }
        let (runs, rbi) = self.commit(pending, &batter.id, false);
        PlayResult {
            runs,
            rbi,
            ..PlayResult::default()
        }
    }

    /// Double-play probability from the relay's margin over the batter, in
    /// seconds.
    #[must_use]
    pub fn double_play_chance(&self, margin: f64) -> f64 {
        let tenths = (margin * 10.0).floor();
        clamp01(
            (self.cfg.get("dpChanceBasePct") + tenths * self.cfg.get("dpChancePerTenthPct"))
                / 100.0,
        )
    }

    /// A fielded ground ball beat the batter to first.
    ///
    /// With a force at second and fewer than two outs the defense takes the
    /// lead runner. When the relay through the pivot can still beat the
    /// batter (`relay_margin` is set) it tries to turn two with one draw.
    /// Otherwise the batter is out at first and unforced runners take what
    /// the out gives them.
    pub fn ground_out<R: RngCore + ?Sized>(
        &mut self,
        batter: &Player,
        fielder: Position,
        relay_margin: Option<f64>,
        rng: &mut R,
    ) -> PlayResult {
        let mut result = PlayResult::default();
        let mut pending = PendingRuns::new();
        if *self.outs < 2 && self.offense.bases.is_occupied(Base::First) {
            let turn_two = match relay_margin {
                Some(margin) => roll_chance(rng, self.double_play_chance(margin)),
                None => false,
            };
            let loaded = self.offense.bases.is_forced(Base::Third);
            let second_forced = self.offense.bases.is_forced(Base::Second);
            if loaded {
                if let Some(runner) = self.offense.bases.take(Base::Third) {
                    let earned = runner.earned;
                    pending.push(PendingRun {
                        runner,
                        rbi: !turn_two,
                        earned,
                    });
                }
            }
            if second_forced {
                self.move_runner(Base::Second, Base::Third);
            }
            let lead_runner = self.offense.bases.take(Base::First);
            let pivot = pivot_position(fielder);
            self.record_out(Some(pivot), Some(fielder));
            result.outs += 1;
            if turn_two {
                self.record_out(Some(Position::FirstBase), Some(pivot));
                result.outs += 1;
                result.double_play = true;
                for position in [fielder, pivot, Position::FirstBase] {
                    if let Some(id) = self.fielder(position).map(|f| f.id.clone()) {
                        self.defense.fielding_state_mut(&id).double_plays += 1;
                    }
                }
                if let Some(stats) = self.offense.batter_state_by_id(&batter.id) {
                    stats.gidp += 1;
                }
            } else {
                let earned = lead_runner.as_ref().is_none_or(|runner| runner.earned);
                let runner = self.batter_runner(batter, earned);
                self.offense.bases.place(Base::First, runner);
                result.fielders_choice = true;
                if let Some(stats) = self.offense.batter_state_by_id(&batter.id) {
                    stats.fc += 1;
                }
            }
        } else {
            let assist = (fielder != Position::FirstBase).then_some(fielder);
            self.record_out(Some(Position::FirstBase), assist);
            result.outs += 1;
            if *self.outs < 3 {
                if let Some(runner) = self.offense.bases.runner(Base::Third) {
                    let sp = f64::from(self.speed_rating(&runner.id));
                    if sp >= self.cfg.get("groundOutScoreFromThirdSpeed") {
                        if let Some(runner) = self.offense.bases.take(Base::Third) {
                            let earned = runner.earned;
                            pending.push(PendingRun {
                                runner,
                                rbi: true,
                                earned,
                            });
                        }
                    }
                }
                if !self.offense.bases.is_occupied(Base::Third) {
                    self.move_runner(Base::Second, Base::Third);
                }
            }
        }
        let nullified = *self.outs >= 3;
        let (runs, rbi) = self.commit(pending, &batter.id, nullified);
        result.runs = runs;
        result.rbi = rbi;
        result
    }

    /// A batted ball caught in the air. Runners tag on fly balls only.
    pub fn caught_ball(
        &mut self,
        batter: &Player,
        catch: &Retrieval,
        kind: CaughtBall,
    ) -> PlayResult {
        self.record_out(Some(catch.position), None);
        let mut result = PlayResult {
            outs: 1,
            ..PlayResult::default()
        };
        if *self.outs >= 3 || kind != CaughtBall::Fly {
            return result;
        }
        let mut pending = PendingRuns::new();
        if let Some(runner) = self.offense.bases.runner(Base::Third) {
            let arm = self.fielder(catch.position).map_or(50, |f| f.arm);
            let physics = Physics::new(self.cfg);
            let throw = self.cfg.get("fieldingTransferTime")
                + physics.throw_time(
                    arm,
                    catch.point.distance_from_home(),
                    catch.position,
                );
            let runner_time =
                self.cfg.get("tagUpDelay") + BASE_PATH_FT / self.runner_speed(&runner.id);
            if !FieldingAI::new(self.cfg).throw_beats_tag_up(throw, runner_time) {
                if let Some(runner) = self.offense.bases.take(Base::Third) {
                    let earned = runner.earned;
                    pending.push(PendingRun {
                        runner,
                        rbi: true,
                        earned,
                    });
                    result.sacrifice_fly = true;
                }
            }
        }
        if !self.offense.bases.is_occupied(Base::Third)
            && catch.point.distance_from_home() >= self.cfg.get("deepFlyTagFromSecondDist")
        {
            self.move_runner(Base::Second, Base::Third);
        }
        if result.sacrifice_fly {
            if let Some(stats) = self.offense.batter_state_by_id(&batter.id) {
                stats.sf += 1;
            }
        }
        let (runs, rbi) = self.commit(pending, &batter.id, false);
        result.runs = runs;
        result.rbi = rbi;
        result
    }

    /// Sacrifice bunt or squeeze: the batter is retired at first and every
    /// runner moves up one base.
    pub fn sacrifice(&mut self, batter: &Player, fielder: Position, squeeze: bool) -> PlayResult {
        let mut pending = PendingRuns::new();
        for from in [Base::Third, Base::Second, Base::First] {
            if from.next().is_none() {
                if let Some(runner) = self.offense.bases.take(from) {
                    let earned = runner.earned;
                    pending.push(PendingRun {
                        runner,
                        rbi: squeeze,
                        earned,
                    });
                }
            } else if let Some(next) = from.next() {
                if !self.offense.bases.is_occupied(next) {
                    self.move_runner(from, next);
                }
            }
        }
        let assist = (fielder != Position::FirstBase).then_some(fielder);
        self.record_out(Some(Position::FirstBase), assist);
        if let Some(stats) = self.offense.batter_state_by_id(&batter.id) {
            stats.sh += 1;
        }
        let nullified = *self.outs >= 3;
        let (runs, rbi) = self.commit(pending, &batter.id, nullified);
        PlayResult {
            runs,
            rbi,
            outs: 1,
            sacrifice: true,
            ..PlayResult::default()
        }
    }

    /// Lead runner who could steal, with the base they would take.
    #[must_use]
    pub fn steal_candidate(&self) -> Option<(Base, Base)> {
        let bases = &self.offense.bases;
        if bases.is_occupied(Base::Second) && !bases.is_occupied(Base::Third) {
            Some((Base::Second, Base::Third))
        } else if bases.is_occupied(Base::First) && !bases.is_occupied(Base::Second) {
            Some((Base::First, Base::Second))
        } else {
            None
        }
    }

    /// Offer the lead runner a steal.
    ///
    /// Only a runner with a long lead is ever sent: anything shorter returns
    /// `None` without a draw. Otherwise one draw decides the attempt and, if the
    /// runner goes, a second decides the race against the catcher's throw.
    pub fn attempt_steal<R: RngCore + ?Sized>(
        &mut self,
        held: bool,
        rng: &mut R,
    ) -> Option<StealOutcome> {
        let (from, to) = self.steal_candidate()?;
        let runner = self.offense.bases.runner(from)?;
        if runner.lead < 2 {
            return None;
        }
        let manager = Manager::new(self.cfg);
        let sp = self.speed_rating(&runner.id);
        if !roll_chance(rng, manager.steal_chance(sp, held)) {
            return None;
        }
        let physics = Physics::new(self.cfg);
        let catcher_arm = self.fielder(Position::Catcher).map_or(50, |f| f.arm);
        let defense_time = self.cfg.get("pitchDeliveryTime")
            + self.cfg.get("catcherTransferTime")
            + physics.throw_time(
                catcher_arm,
                base_point(to).distance_from_home(),
                Position::Catcher,
            );
        let runner_time =
            (BASE_PATH_FT - manager.lead_feet(runner.lead)).max(0.0) / physics.player_speed(sp);
        let stolen = roll_chance(rng, manager.steal_success_chance(defense_time - runner_time));
        let mut runner = self.offense.bases.take(from)?;
        runner.lead = 0;
        let id = runner.id.clone();
        if stolen {
            self.offense.bases.place(to, runner);
            if let Some(stats) = self.offense.batter_state_by_id(&id) {
                stats.sb += 1;
            }
            Some(StealOutcome::Stolen { runner: id, base: to })
        } else {
            self.record_out(Some(covering_position(to)), Some(Position::Catcher));
            if let Some(stats) = self.offense.batter_state_by_id(&id) {
                stats.cs += 1;
            }
            Some(StealOutcome::CaughtStealing { runner: id, base: to })
        }
    }

    /// Runner the pitcher would throw over to: the longest lead, nearest first.
    #[must_use]
    pub fn pickoff_target(&self) -> Option<Base> {
        self.offense
            .bases
            .iter()
            .filter(|(base, runner)| runner.lead > 0 && *base != Base::Third)
            .fold(None, |best: Option<(Base, u8)>, (base, runner)| match best {
                Some((_, lead)) if lead >= runner.lead => best,
                _ => Some((base, runner.lead)),
            })
            .map(|(base, _)| base)
    }

    /// Throw over to the runner with the biggest lead.
    ///
    /// Draws once for the attempt, once for the pickoff itself and, if the
    /// runner gets back, once for whether the runner is scared off the lead.
    pub fn attempt_pickoff<R: RngCore + ?Sized>(&mut self, rng: &mut R) -> Option<PickoffOutcome> {
        let base = self.pickoff_target()?;
        let runner = self.offense.bases.runner(base)?;
        let manager = Manager::new(self.cfg);
        let id = runner.id.clone();
        let sp = self.speed_rating(&id);
        if !roll_chance(rng, manager.pickoff_chance(runner.lead)) {
            return None;
        }
        if roll_chance(rng, manager.pickoff_success_chance()) {
            self.offense.bases.take(base);
            self.record_out(Some(covering_position(base)), Some(Position::Pitcher));
            if let Some(stats) = self.offense.batter_state_by_id(&id) {
                stats.po += 1;
            }
            return Some(PickoffOutcome::PickedOff { runner: id, base });
        }
        if roll_chance(rng, manager.pickoff_scare_chance(sp)) {
            if let Some(runner) = self.offense.bases.runner_mut(base) {
                runner.lead = 0;
            }
            return Some(PickoffOutcome::Scared { runner: id, base });
        }
        Some(PickoffOutcome::Safe { runner: id, base })
    }
}

/// Fielder who takes a throw at `base`.
const fn covering_position(base: Base) -> Position {
    match base {
        Base::First => Position::FirstBase,
        Base::Second => Position::ShortStop,
        Base::Third => Position::ThirdBase,
    }
}

/// Middle infielder who takes the feed at second on a double-play ball.
pub(crate) const fn pivot_position(fielder: Position) -> Position {
    match fielder {
        Position::ShortStop | Position::ThirdBase => Position::SecondBase,
        _ => Position::ShortStop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{BattingRatings, Pitcher, PitchingRatings};

    struct StubRng {
        values: Vec<u32>,
        calls: usize,
    }

    impl StubRng {
        fn new(values: Vec<u32>) -> Self {
            Self { values, calls: 0 }
        }
    }

    impl RngCore for StubRng {
        fn next_u32(&mut self) -> u32 {
            let value = self.values.get(self.calls).copied().unwrap_or(0);
            self.calls += 1;
            value
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn player(id: &str, sp: u8) -> Player {
        Player::new(
            id,
            Position::LeftField,
            BattingRatings {
                sp,
                ..BattingRatings::default()
            },
        )
    }

    fn teams(lineup_speed: u8) -> (TeamState, TeamState) {
        let lineup = (0..9)
            .map(|i| player(&format!("o{i}"), lineup_speed))
            .collect();
        let mut offense = TeamState::new("off", lineup, Vec::new(), Vec::new()).unwrap();
        offense.inning_runs.push(0);
        let fielders = [
            Position::Catcher,
            Position::FirstBase,
            Position::SecondBase,
            Position::ThirdBase,
            Position::ShortStop,
            Position::LeftField,
            Position::CenterField,
            Position::RightField,
        ]
        .into_iter()
        .map(|pos| Player::new(pos.code(), pos, BattingRatings::default()))
        .collect();
        let pitcher = Pitcher::new(
            "ace",
            PitchingRatings {
                fb: 60,
                ..PitchingRatings::default()
            },
        );
        let defense = TeamState::new("def", fielders, Vec::new(), vec![pitcher]).unwrap();
        (offense, defense)
    }

    fn put(team: &mut TeamState, base: Base, id: &str) {
        let player = team.player(&PlayerId::new(id)).cloned().unwrap();
        team.batter_state_mut(&player);
        team.bases
            .place(base, Runner::new(player.id, PlayerId::new("ace"), true));
    }

    fn batter(team: &mut TeamState, id: &str) -> Player {
        let player = team.player(&PlayerId::new(id)).cloned().unwrap();
        team.batter_state_mut(&player);
        player
    }

    #[test]
    fn bases_loaded_walk_forces_in_a_run() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        for (base, id) in [(Base::First, "o1"), (Base::Second, "o2"), (Base::Third, "o3")] {
            put(&mut offense, base, id);
        }
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .advance_walk(&hitter);
        assert_eq!(result.runs, 1);
        assert_eq!(result.rbi, 1);
        assert_eq!(offense.bases().occupied_count(), 3);
        assert_eq!(offense.runs(), 1);
        assert_eq!(offense.lineup_stats()[&PlayerId::new("o4")].rbi, 1);
        assert_eq!(offense.lineup_stats()[&PlayerId::new("o3")].r, 1);
        assert_eq!(defense.pitcher_stats()[&PlayerId::new("ace")].earned_runs, 1);
    }

    #[test]
    fn walk_leaves_unforced_runners_alone() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::Third, "o1");
        let hitter = batter(&mut offense, "o2");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .advance_walk(&hitter);
        assert_eq!(result.runs, 0);
        let ids = offense.bases().ids();
        assert_eq!(ids[0].map(PlayerId::as_str), Some("o2"));
        assert_eq!(ids[2].map(PlayerId::as_str), Some("o1"));
        assert!(ids[1].is_none());
    }

    #[test]
    fn home_run_clears_the_bases() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::First, "o1");
        put(&mut offense, Base::Third, "o3");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let mut rng = StubRng::new(Vec::new());
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .advance_hit(&hitter, 4, None, &mut rng);
        assert_eq!(result.runs, 3);
        assert_eq!(result.rbi, 3);
        assert!(offense.bases().is_empty());
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn slow_runner_stops_at_third_on_a_single() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(10);
        put(&mut offense, Base::Second, "o2");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let mut rng = StubRng::new(Vec::new());
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .advance_hit(&hitter, 1, None, &mut rng);
        assert_eq!(result.runs, 0);
        assert!(offense.bases().is_occupied(Base::First));
        assert!(offense.bases().is_occupied(Base::Third));
    }

    #[test]
    fn strong_throw_cuts_down_runner_trying_to_score() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(30);
        put(&mut offense, Base::Second, "o2");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let retrieval = Retrieval {
            position: Position::LeftField,
            point: FieldPoint::from_polar(150.0, 70.0),
            time: 1.5,
        };
        let mut rng = StubRng::new(vec![0]);
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .advance_hit(&hitter, 1, Some(&retrieval), &mut rng);
        assert!(result.runner_thrown_out);
        assert_eq!(result.runs, 0);
        assert_eq!(outs, 1);
        assert_eq!(rng.calls, 1);
        assert_eq!(offense.bases().occupied_count(), 1);
    }

    #[test]
    fn double_play_ends_the_inning_without_a_run() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        for (base, id) in [(Base::First, "o1"), (Base::Second, "o2"), (Base::Third, "o3")] {
            put(&mut offense, base, id);
        }
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 1;
        let mut rng = StubRng::new(vec![0]);
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .ground_out(&hitter, Position::ShortStop, Some(0.5), &mut rng);
        assert!(result.double_play);
        assert_eq!(outs, 3);
        assert_eq!(result.runs, 0);
        assert_eq!(offense.runs(), 0);
        assert_eq!(offense.lineup_stats()[&PlayerId::new("o4")].gidp, 1);
        assert_eq!(offense.left_on_base(), 1);
    }

    #[test]
    fn fielders_choice_keeps_batter_on_first() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::First, "o1");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let mut rng = StubRng::new(vec![u32::MAX]);
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .ground_out(&hitter, Position::SecondBase, Some(0.0), &mut rng);
        assert!(result.fielders_choice);
        assert_eq!(outs, 1);
        assert_eq!(
            offense.bases().runner(Base::First).map(|r| r.id.as_str()),
            Some("o4")
        );
        assert!(!offense.bases().is_occupied(Base::Second));
    }

    #[test]
    fn late_relay_takes_only_the_lead_runner() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::First, "o1");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let mut rng = StubRng::new(vec![0]);
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .ground_out(&hitter, Position::ShortStop, None, &mut rng);
        assert!(!result.double_play);
        assert!(result.fielders_choice);
        assert_eq!(outs, 1);
        assert_eq!(rng.calls, 0);
        assert_eq!(offense.lineup_stats()[&PlayerId::new("o4")].gidp, 0);
    }

    #[test]
    fn thin_relay_margin_lowers_the_double_play_chance() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let bases = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        );
        assert!(bases.double_play_chance(0.05) < bases.double_play_chance(0.5));
        assert!(bases.double_play_chance(-0.5) < bases.double_play_chance(0.05));
    }

    #[test]
    fn productive_out_scores_fast_runner_from_third() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(60);
        put(&mut offense, Base::Third, "o3");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let mut rng = StubRng::new(Vec::new());
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .ground_out(&hitter, Position::SecondBase, None, &mut rng);
        assert_eq!(result.runs, 1);
        assert_eq!(result.rbi, 1);
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn deep_fly_is_a_sacrifice_fly() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::Third, "o3");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let catch = Retrieval {
            position: Position::CenterField,
            point: FieldPoint::from_polar(340.0, 45.0),
            time: 4.5,
        };
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .caught_ball(&hitter, &catch, CaughtBall::Fly);
        assert!(result.sacrifice_fly);
        assert_eq!(result.runs, 1);
        assert_eq!(offense.lineup_stats()[&PlayerId::new("o4")].sf, 1);
    }

    #[test]
    fn infield_fly_freezes_runners() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::First, "o1");
        put(&mut offense, Base::Second, "o2");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let catch = Retrieval {
            position: Position::ShortStop,
            point: FieldPoint::from_polar(120.0, 55.0),
            time: 5.0,
        };
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .caught_ball(&hitter, &catch, CaughtBall::InfieldFly);
        assert_eq!(result.outs, 1);
        assert_eq!(offense.bases().occupied_count(), 2);
    }

    #[test]
    fn error_runs_are_unearned_without_rbi() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::Third, "o3");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .advance_on_error(&hitter, 1);
        assert_eq!(result.runs, 1);
        assert_eq!(result.rbi, 0);
        let ace = &defense.pitcher_stats()[&PlayerId::new("ace")];
        assert_eq!((ace.runs, ace.earned_runs), (1, 0));
        assert!(!offense.bases().runner(Base::First).unwrap().earned);
    }

    #[test]
    fn squeeze_scores_runner_and_credits_sacrifice() {
        let cfg = ConfigTable::defaults();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::Third, "o3");
        put(&mut offense, Base::First, "o1");
        let hitter = batter(&mut offense, "o4");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let result = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        )
        .sacrifice(&hitter, Position::Pitcher, true);
        assert_eq!((result.runs, result.rbi), (1, 1));
        assert!(offense.bases().is_occupied(Base::Second));
        assert_eq!(offense.lineup_stats()[&PlayerId::new("o4")].sh, 1);
    }

    #[test]
    fn steals_need_a_long_lead() {
        let cfg = ConfigTable::with_overrides([("stealChanceBase", 100.0)]).unwrap();
        let (mut offense, mut defense) = teams(50);
        put(&mut offense, Base::First, "o1");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let mut rng = StubRng::new(vec![0, 0]);
        let mut running = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        );
        running.take_leads();
        assert!(running.attempt_steal(false, &mut rng).is_none());
        assert_eq!(rng.calls, 0);
        drop(running);

        let (mut offense, mut defense) = teams(90);
        put(&mut offense, Base::First, "o1");
        let mut outs = 0;
        let mut running = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        );
        running.take_leads();
        let outcome = running.attempt_steal(false, &mut rng);
        assert!(matches!(outcome, Some(StealOutcome::Stolen { base: Base::Second, .. })));
        assert_eq!(rng.calls, 2);
    }

    #[test]
    fn pickoff_retires_runner_on_success() {
        let cfg = ConfigTable::with_overrides([
            ("pickoffChanceBase", 100.0),
            ("pickoffSuccessPct", 100.0),
        ])
        .unwrap();
        let (mut offense, mut defense) = teams(90);
        put(&mut offense, Base::First, "o1");
        let fielders = defense.defensive_alignment();
        let mut outs = 0;
        let mut rng = StubRng::new(vec![0, 0]);
        let mut running = Baserunning::new(
            &cfg,
            &mut offense,
            &mut defense,
            &fielders,
            PlayerId::new("ace"),
            &mut outs,
        );
        running.take_leads();
        let outcome = running.attempt_pickoff(&mut rng);
        assert!(matches!(outcome, Some(PickoffOutcome::PickedOff { .. })));
        assert_eq!(running.outs(), 1);
        drop(running);
        assert!(offense.bases().is_empty());
        assert_eq!(offense.lineup_stats()[&PlayerId::new("o1")].po, 1);
    }
}
