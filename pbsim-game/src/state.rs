//! Per-game mutable state: accumulators, bases and the team container.
//!
//! Accumulators are created lazily on a player's first appearance and only ever
//! grow during a game. The bases array is owned by the engine; outside the crate
//! it is read-only.

use crate::engine::SimulationError;
use crate::player::{BattingRatings, FIELDING_POSITIONS, Pitcher, Player, PlayerId, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Pitch-level counters shared by batters and pitchers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchCounters {
    pub pitches: u32,
    pub zone_pitches: u32,
    pub o_zone_pitches: u32,
    pub zone_swings: u32,
    pub o_zone_swings: u32,
    pub zone_contacts: u32,
    pub o_zone_contacts: u32,
    pub called_strikes: u32,
    pub swinging_strikes: u32,
    pub fouls: u32,
    pub balls_in_play: u32,
}

impl PitchCounters {
    /// Record one pitch's location, swing and contact.
    pub fn record(&mut self, in_zone: bool, swung: bool, contact: bool) {
        self.pitches += 1;
        if in_zone {
            self.zone_pitches += 1;
            if swung {
                self.zone_swings += 1;
                if contact {
                    self.zone_contacts += 1;
                }
            }
        } else {
            self.o_zone_pitches += 1;
            if swung {
                self.o_zone_swings += 1;
                if contact {
                    self.o_zone_contacts += 1;
                }
            }
        }
    }

    pub fn absorb(&mut self, other: &Self) {
        self.pitches += other.pitches;
        self.zone_pitches += other.zone_pitches;
        self.o_zone_pitches += other.o_zone_pitches;
        self.zone_swings += other.zone_swings;
        self.o_zone_swings += other.o_zone_swings;
        self.zone_contacts += other.zone_contacts;
        self.o_zone_contacts += other.o_zone_contacts;
        self.called_strikes += other.called_strikes;
        self.swinging_strikes += other.swinging_strikes;
        self.fouls += other.fouls;
        self.balls_in_play += other.balls_in_play;
    }
}

/// Batting and baserunning line for one player in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterState {
    pub player: Player,
    pub pa: u32,
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub b1: u32,
    pub b2: u32,
    pub b3: u32,
    pub hr: u32,
    pub rbi: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hbp: u32,
    pub so: u32,
    pub so_looking: u32,
    pub sh: u32,
    pub sf: u32,
    pub roe: u32,
    pub fc: u32,
    pub ci: u32,
    pub gidp: u32,
    pub sb: u32,
    pub cs: u32,
    pub po: u32,
    pub pocs: u32,
    pub ground_balls: u32,
    pub line_drives: u32,
    pub fly_balls: u32,
    pub pitches: PitchCounters,
}

impl BatterState {
    #[must_use]
    pub fn new(player: Player) -> Self {
        Self {
            player,
            pa: 0,
            ab: 0,
            r: 0,
            h: 0,
            b1: 0,
            b2: 0,
            b3: 0,
            hr: 0,
            rbi: 0,
            bb: 0,
            ibb: 0,
            hbp: 0,
            so: 0,
            so_looking: 0,
            sh: 0,
            sf: 0,
            roe: 0,
            fc: 0,
            ci: 0,
            gidp: 0,
            sb: 0,
            cs: 0,
            po: 0,
            pocs: 0,
            ground_balls: 0,
            line_drives: 0,
            fly_balls: 0,
            pitches: PitchCounters::default(),
        }
    }

    /// Credit a hit worth `bases` bases (1–4).
    pub(crate) fn record_hit(&mut self, bases: u8) {
        self.h += 1;
        match bases {
            1 => self.b1 += 1,
            2 => self.b2 += 1,
            3 => self.b3 += 1,
            _ => self.hr += 1,
        }
    }

    #[must_use]
    pub const fn total_bases(&self) -> u32 {
        self.b1 + 2 * self.b2 + 3 * self.b3 + 4 * self.hr
    }
}

/// Pitching line for one pitcher in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitcherState {
    pub id: PlayerId,
    pub started: bool,
    pub batters_faced: u32,
    pub outs: u32,
    pub balls: u32,
    pub strikes: u32,
    pub hits: u32,
    pub walks: u32,
    pub ibb: u32,
    pub strikeouts: u32,
    pub hbp: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub home_runs: u32,
    pub consecutive_hits: u32,
    pub ground_balls: u32,
    pub line_drives: u32,
    pub fly_balls: u32,
    pub toast: f64,
    pub pitches: PitchCounters,
}

impl PitcherState {
    #[must_use]
    pub fn new(id: PlayerId, started: bool) -> Self {
        Self {
            id,
            started,
            batters_faced: 0,
            outs: 0,
            balls: 0,
            strikes: 0,
            hits: 0,
            walks: 0,
            ibb: 0,
            strikeouts: 0,
            hbp: 0,
            runs: 0,
            earned_runs: 0,
            home_runs: 0,
            consecutive_hits: 0,
            ground_balls: 0,
            line_drives: 0,
            fly_balls: 0,
            toast: 0.0,
            pitches: PitchCounters::default(),
        }
    }

    /// Total pitches delivered.
    #[must_use]
    pub const fn pitches_thrown(&self) -> u32 {
        self.pitches.pitches
    }
}

/// Fielding line for one player in one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldingState {
    pub putouts: u32,
    pub assists: u32,
    pub errors: u32,
    pub double_plays: u32,
    pub chances: u32,
}

/// Base slots, index 0 = first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Base {
    First,
    Second,
    Third,
}

impl Base {
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }

    /// The following base, `None` when the next stop is home.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::First => Some(Self::Second),
            Self::Second => Some(Self::Third),
            Self::Third => None,
        }
    }

    /// Base reached after advancing `bases` bases, `None` when that reaches home.
    #[must_use]
    pub const fn advanced(self, bases: u8) -> Option<Self> {
        match self.index() + bases as usize {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            _ => None,
        }
    }
}

/// A runner on base and the bookkeeping needed when they score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runner {
    pub id: PlayerId,
    /// Pitcher charged with the run if this runner scores.
    pub charged_to: PlayerId,
    /// False when the runner reached on an error.
    pub earned: bool,
    /// Lead level for the current plate appearance: 0 none, 1 short, 2 long.
    pub lead: u8,
}

impl Runner {
    #[must_use]
    pub const fn new(id: PlayerId, charged_to: PlayerId, earned: bool) -> Self {
        Self {
            id,
            charged_to,
            earned,
            lead: 0,
        }
    }
}

/// The three base slots. Each slot holds at most one runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bases {
    slots: [Option<Runner>; 3],
}

impl Bases {
    #[must_use]
    pub fn runner(&self, base: Base) -> Option<&Runner> {
        self.slots[base.index()].as_ref()
    }

    #[must_use]
    pub fn is_occupied(&self, base: Base) -> bool {
        self.slots[base.index()].is_some()
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Runner ids by slot, for snapshots and assertions.
    #[must_use]
    pub fn ids(&self) -> [Option<&PlayerId>; 3] {
        [
            self.slots[0].as_ref().map(|r| &r.id),
            self.slots[1].as_ref().map(|r| &r.id),
            self.slots[2].as_ref().map(|r| &r.id),
        ]
    }

    /// Whether the runner on `base` must advance when the batter becomes a runner.
    #[must_use]
    pub fn is_forced(&self, base: Base) -> bool {
        Base::ALL[..=base.index()]
            .iter()
            .all(|b| self.is_occupied(*b))
    }

    /// Any runner in scoring position.
    #[must_use]
    pub fn scoring_position(&self) -> bool {
        self.is_occupied(Base::Second) || self.is_occupied(Base::Third)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Base, &Runner)> {
        Base::ALL
            .into_iter()
            .filter_map(|base| self.runner(base).map(|runner| (base, runner)))
    }

    pub(crate) fn runner_mut(&mut self, base: Base) -> Option<&mut Runner> {
        self.slots[base.index()].as_mut()
    }

    /// Put `runner` on `base`, returning any displaced occupant.
    pub(crate) fn place(&mut self, base: Base, runner: Runner) -> Option<Runner> {
        debug_assert!(
            self.slots[base.index()].is_none(),
            "base {base:?} already occupied"
        );
        self.slots[base.index()].replace(runner)
    }

    pub(crate) fn take(&mut self, base: Base) -> Option<Runner> {
        self.slots[base.index()].take()
    }

    /// Empty every base, returning how many runners were stranded.
    pub(crate) fn clear(&mut self) -> u32 {
        let stranded = self.slots.iter_mut().filter_map(Option::take).count();
        u32::try_from(stranded).unwrap_or(0)
    }
}

/// A player standing at a defensive position for one play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fielder {
    pub id: PlayerId,
    pub position: Position,
    pub fa: u8,
    pub arm: u8,
    pub sp: u8,
}

impl Fielder {
    #[must_use]
    pub fn from_player(player: &Player, position: Position) -> Self {
        Self {
            id: player.id.clone(),
            position,
            fa: player.ratings.fa,
            arm: player.ratings.arm,
            sp: player.ratings.sp,
        }
    }
}

/// Mutable per-game container for one club.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamState {
    name: String,
    lineup: Vec<Player>,
    bench: Vec<Player>,
    pitchers: Vec<Pitcher>,
    pub(crate) lineup_stats: BTreeMap<PlayerId, BatterState>,
    pub(crate) pitcher_stats: BTreeMap<PlayerId, PitcherState>,
    pub(crate) fielding_stats: BTreeMap<PlayerId, FieldingState>,
    pub(crate) batting_index: usize,
    pub(crate) bases: Bases,
    pub(crate) runs: u32,
    pub(crate) hits: u32,
    pub(crate) errors: u32,
    pub(crate) left_on_base: u32,
    pub(crate) inning_runs: Vec<u32>,
    current_pitcher: Option<usize>,
    used_pitchers: BTreeSet<PlayerId>,
}

impl TeamState {
    /// Build a team; the first pitcher on the staff starts.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::EmptyLineup`] when `lineup` is empty.
    pub fn new(
        name: impl Into<String>,
        lineup: Vec<Player>,
        bench: Vec<Player>,
        pitchers: Vec<Pitcher>,
    ) -> Result<Self, SimulationError> {
        let name = name.into();
        if lineup.is_empty() {
            return Err(SimulationError::EmptyLineup { team: name });
        }
        let mut team = Self {
            name,
            lineup,
            bench,
            pitchers,
            lineup_stats: BTreeMap::new(),
            pitcher_stats: BTreeMap::new(),
            fielding_stats: BTreeMap::new(),
            batting_index: 0,
            bases: Bases::default(),
            runs: 0,
            hits: 0,
            errors: 0,
            left_on_base: 0,
            inning_runs: Vec::new(),
            current_pitcher: None,
            used_pitchers: BTreeSet::new(),
        };
        if let Some(starter) = team.pitchers.first() {
            let id = starter.id().clone();
            team.pitcher_stats
                .insert(id.clone(), PitcherState::new(id.clone(), true));
            team.used_pitchers.insert(id);
            team.current_pitcher = Some(0);
        }
        Ok(team)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn lineup(&self) -> &[Player] {
        &self.lineup
    }

    #[must_use]
    pub fn bench(&self) -> &[Player] {
        &self.bench
    }

    #[must_use]
    pub fn pitchers(&self) -> &[Pitcher] {
        &self.pitchers
    }

    #[must_use]
    pub const fn bases(&self) -> &Bases {
        &self.bases
    }

    #[must_use]
    pub const fn runs(&self) -> u32 {
        self.runs
    }

    #[must_use]
    pub const fn hits(&self) -> u32 {
        self.hits
    }

    #[must_use]
    pub const fn errors(&self) -> u32 {
        self.errors
    }

    #[must_use]
    pub const fn left_on_base(&self) -> u32 {
        self.left_on_base
    }

    #[must_use]
    pub fn inning_runs(&self) -> &[u32] {
        &self.inning_runs
    }

    #[must_use]
    pub const fn batting_index(&self) -> usize {
        self.batting_index
    }

    #[must_use]
    pub const fn lineup_stats(&self) -> &BTreeMap<PlayerId, BatterState> {
        &self.lineup_stats
    }

    #[must_use]
    pub const fn pitcher_stats(&self) -> &BTreeMap<PlayerId, PitcherState> {
        &self.pitcher_stats
    }

    #[must_use]
    pub const fn fielding_stats(&self) -> &BTreeMap<PlayerId, FieldingState> {
        &self.fielding_stats
    }

    /// Pitcher currently on the mound.
    #[must_use]
    pub fn current_pitcher(&self) -> Option<&Pitcher> {
        self.current_pitcher.and_then(|idx| self.pitchers.get(idx))
    }

    #[must_use]
    pub fn current_pitcher_state(&self) -> Option<&PitcherState> {
        self.current_pitcher()
            .and_then(|pitcher| self.pitcher_stats.get(pitcher.id()))
    }

    /// Staff members who have not pitched yet this game.
    pub fn available_relievers(&self) -> impl Iterator<Item = &Pitcher> {
        self.pitchers
            .iter()
            .filter(|pitcher| !self.used_pitchers.contains(pitcher.id()))
    }

    /// Bring `id` in from the staff to pitch.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownPlayer`] when `id` is not on the staff
    /// or has already been removed from this game.
    pub fn change_pitcher(&mut self, id: &PlayerId) -> Result<(), SimulationError> {
        if self.current_pitcher().is_some_and(|p| p.id() == id) {
            return Ok(());
        }
        let Some(idx) = self.pitchers.iter().position(|p| p.id() == id) else {
            return Err(SimulationError::UnknownPlayer { id: id.clone() });
        };
        if self.used_pitchers.contains(id) {
            return Err(SimulationError::UnknownPlayer { id: id.clone() });
        }
        self.used_pitchers.insert(id.clone());
        self.pitcher_stats
            .entry(id.clone())
            .or_insert_with(|| PitcherState::new(id.clone(), false));
        self.current_pitcher = Some(idx);
        Ok(())
    }

    /// Look a player up anywhere on the roster.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.lineup
            .iter()
            .chain(self.bench.iter())
            .chain(self.pitchers.iter().map(|p| &p.player))
            .find(|p| &p.id == id)
            .or_else(|| self.lineup_stats.get(id).map(|s| &s.player))
    }

    /// Batting ratings for a player in this game, defaulting when unknown.
    #[must_use]
    pub fn ratings_of(&self, id: &PlayerId) -> BattingRatings {
        self.player(id).map(|p| p.ratings).unwrap_or_default()
    }

    /// Lineup slot of the batter due up.
    #[must_use]
    pub fn due_up_slot(&self) -> usize {
        self.batting_index % self.lineup.len().max(1)
    }

    pub(crate) fn due_up(&self) -> Option<&Player> {
        self.lineup.get(self.due_up_slot())
    }

    /// Replace the player in `slot` with `id` from the bench.
    pub(crate) fn substitute_batter(
        &mut self,
        slot: usize,
        id: &PlayerId,
    ) -> Result<(), SimulationError> {
        let Some(bench_idx) = self.bench.iter().position(|p| &p.id == id) else {
            return Err(SimulationError::UnknownPlayer { id: id.clone() });
        };
        if slot >= self.lineup.len() {
            return Err(SimulationError::UnknownPlayer { id: id.clone() });
        }
        let incoming = self.bench.remove(bench_idx);
        self.lineup[slot] = incoming;
        Ok(())
    }

    /// Send `id` from the bench to run for whoever is on `base`. The pinch
    /// runner also takes over the replaced runner's lineup slot.
    pub(crate) fn substitute_runner(
        &mut self,
        base: Base,
        id: &PlayerId,
    ) -> Result<(), SimulationError> {
        let Some(bench_idx) = self.bench.iter().position(|p| &p.id == id) else {
            return Err(SimulationError::UnknownPlayer { id: id.clone() });
        };
        let Some(replaced) = self.bases.runner(base).map(|r| r.id.clone()) else {
            return Err(SimulationError::UnknownPlayer { id: id.clone() });
        };
        let incoming = self.bench.remove(bench_idx);
        if let Some(slot) = self.lineup.iter().position(|p| p.id == replaced) {
            self.lineup[slot] = incoming.clone();
        }
        self.batter_state_mut(&incoming);
        if let Some(runner) = self.bases.runner_mut(base) {
            runner.id = incoming.id;
        }
        Ok(())
    }

    pub(crate) fn batter_state_mut(&mut self, player: &Player) -> &mut BatterState {
        self.lineup_stats
            .entry(player.id.clone())
            .or_insert_with(|| BatterState::new(player.clone()))
    }

    /// Accumulator for a player already on the roster; created lazily.
    pub(crate) fn batter_state_by_id(&mut self, id: &PlayerId) -> Option<&mut BatterState> {
        if !self.lineup_stats.contains_key(id) {
            let player = self.player(id)?.clone();
            self.lineup_stats
                .insert(id.clone(), BatterState::new(player));
        }
        self.lineup_stats.get_mut(id)
    }

    pub(crate) fn current_pitcher_state_mut(&mut self) -> Option<&mut PitcherState> {
        let id = self.current_pitcher()?.id().clone();
        Some(
            self.pitcher_stats
                .entry(id.clone())
                .or_insert_with(|| PitcherState::new(id, false)),
        )
    }

    pub(crate) fn pitcher_state_mut(&mut self, id: &PlayerId) -> &mut PitcherState {
        self.pitcher_stats
            .entry(id.clone())
            .or_insert_with(|| PitcherState::new(id.clone(), false))
    }

    pub(crate) fn fielding_state_mut(&mut self, id: &PlayerId) -> &mut FieldingState {
        self.fielding_stats.entry(id.clone()).or_default()
    }

    /// Who stands at each of the nine positions right now.
    ///
    /// Players take their primary position first; open positions are filled
    /// from the remaining lineup, then the bench, then a generic replacement.
    #[must_use]
    pub fn defensive_alignment(&self) -> Vec<Fielder> {
        let mut assigned: BTreeSet<&PlayerId> = BTreeSet::new();
        let mut slots: BTreeMap<Position, Fielder> = BTreeMap::new();

        if let Some(pitcher) = self.current_pitcher() {
            let mut fielder = Fielder::from_player(&pitcher.player, Position::Pitcher);
            fielder.arm = pitcher.ratings.arm;
            assigned.insert(pitcher.id());
            slots.insert(Position::Pitcher, fielder);
        }

        let candidates: Vec<&Player> = self
            .lineup
            .iter()
            .filter(|p| p.primary_position != Position::Pitcher)
            .collect();
        for position in FIELDING_POSITIONS.iter().skip(1) {
            if let Some(player) = candidates
                .iter()
                .find(|p| p.primary_position == *position && !assigned.contains(&p.id))
            {
                assigned.insert(&player.id);
                slots.insert(*position, Fielder::from_player(player, *position));
            }
        }

        let mut spare = candidates
            .iter()
            .copied()
            .chain(self.bench.iter())
            .filter(|p| p.primary_position != Position::Pitcher);
        for position in FIELDING_POSITIONS {
            if slots.contains_key(&position) {
                continue;
            }
            let fielder = spare
                .by_ref()
                .find(|p| !assigned.contains(&p.id))
                .map_or_else(
                    || {
                        let id = PlayerId::new(format!("{}-{}", self.name, position.code()));
                        Fielder::from_player(
                            &Player::new(id.0, position, BattingRatings::default()),
                            position,
                        )
                    },
                    |p| Fielder::from_player(p, position),
                );
            slots.insert(position, fielder);
        }

        FIELDING_POSITIONS
            .iter()
            .filter_map(|position| slots.remove(position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PitchingRatings;

    fn player(id: &str, position: Position) -> Player {
        Player::new(id, position, BattingRatings::default())
    }

    fn team() -> TeamState {
        let lineup = vec![
            player("c", Position::Catcher),
            player("ss", Position::ShortStop),
            player("cf", Position::CenterField),
            player("dh", Position::DesignatedHitter),
        ];
        let pitchers = vec![
            Pitcher::new(
                "ace",
                PitchingRatings {
                    fb: 60,
                    ..PitchingRatings::default()
                },
            ),
            Pitcher::new("pen", PitchingRatings::default()),
        ];
        TeamState::new("home", lineup, vec![player("ph", Position::FirstBase)], pitchers)
            .unwrap()
    }

    #[test]
    fn counters_split_by_zone() {
        let mut counters = PitchCounters::default();
        counters.record(true, true, true);
        counters.record(false, true, false);
        counters.record(false, false, false);
        assert_eq!(counters.pitches, 3);
        assert_eq!(counters.zone_contacts, 1);
        assert_eq!(counters.o_zone_swings, 1);
        assert_eq!(counters.o_zone_pitches, 2);
    }

    #[test]
    fn forced_runners_need_a_full_chain_behind_them() {
        let mut bases = Bases::default();
        let runner = |id: &str| Runner::new(PlayerId::new(id), PlayerId::new("p"), true);
        bases.place(Base::First, runner("a"));
        bases.place(Base::Third, runner("b"));
        assert!(bases.is_forced(Base::First));
        assert!(!bases.is_forced(Base::Third));
        bases.place(Base::Second, runner("c"));
        assert!(bases.is_forced(Base::Third));
        assert_eq!(bases.clear(), 3);
        assert!(bases.is_empty());
    }

    #[test]
    fn base_advancement_reaches_home() {
        assert_eq!(Base::First.advanced(1), Some(Base::Second));
        assert_eq!(Base::Second.advanced(2), None);
        assert_eq!(Base::Third.next(), None);
    }

    #[test]
    fn starter_is_first_pitcher_and_changes_are_one_way() {
        let mut team = team();
        assert_eq!(team.current_pitcher().unwrap().id().as_str(), "ace");
        assert!(team.current_pitcher_state().unwrap().started);
        team.change_pitcher(&PlayerId::new("pen")).unwrap();
        assert_eq!(team.current_pitcher().unwrap().id().as_str(), "pen");
        assert!(team.change_pitcher(&PlayerId::new("ace")).is_err());
        assert_eq!(team.available_relievers().count(), 0);
    }

    #[test]
    fn empty_lineup_is_rejected() {
        let err = TeamState::new("away", Vec::new(), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, SimulationError::EmptyLineup { .. }));
    }

    #[test]
    fn alignment_covers_all_nine_positions_once() {
        let team = team();
        let alignment = team.defensive_alignment();
        assert_eq!(alignment.len(), 9);
        assert_eq!(alignment[0].id.as_str(), "ace");
        let ss = alignment
            .iter()
            .find(|f| f.position == Position::ShortStop)
            .unwrap();
        assert_eq!(ss.id.as_str(), "ss");
        let ids: BTreeSet<_> = alignment.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids.len(), 9, "no player may cover two positions");
    }

    #[test]
    fn pinch_hitter_replaces_lineup_slot() {
        let mut team = team();
        team.substitute_batter(3, &PlayerId::new("ph")).unwrap();
        assert_eq!(team.lineup()[3].id.as_str(), "ph");
        assert!(team.bench().is_empty());
        assert!(team.substitute_batter(0, &PlayerId::new("ghost")).is_err());
    }

    #[test]
    fn pinch_runner_takes_base_and_slot() {
        let mut team = team();
        assert!(team.substitute_runner(Base::Second, &PlayerId::new("ph")).is_err());
        team.bases.place(
            Base::Second,
            Runner::new(PlayerId::new("c"), PlayerId::new("ace"), false),
        );
        team.substitute_runner(Base::Second, &PlayerId::new("ph")).unwrap();
        let runner = team.bases().runner(Base::Second).unwrap();
        assert_eq!(runner.id.as_str(), "ph");
        assert!(!runner.earned, "the pinch runner inherits how the runner reached");
        assert_eq!(team.lineup()[0].id.as_str(), "ph");
        assert!(team.lineup_stats().contains_key(&PlayerId::new("ph")));
    }
}
