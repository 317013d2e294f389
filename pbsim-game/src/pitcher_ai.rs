//! Pitch-type and objective selection with per-game memory.

use crate::config::ConfigTable;
use crate::engine::SimulationError;
use crate::numbers::{i64_to_f64, round_f64_to_u32};
use crate::player::{PITCH_ORDER, PitchType, Pitcher, PlayerId};
use crate::rng::{roll_dice, weighted_pick};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What the pitcher is trying to do with the next pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PitchObjective {
    #[default]
    Establish,
    Outside,
    Best,
    BestCenter,
    FastCenter,
    Plus,
}

impl PitchObjective {
    pub const ALL: [Self; 6] = [
        Self::Establish,
        Self::Outside,
        Self::Best,
        Self::BestCenter,
        Self::FastCenter,
        Self::Plus,
    ];

    /// Name fragment in `pitchObj{bs}Count{name}Weight` and `targetDist{name}`.
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Establish => "Establish",
            Self::Outside => "Outside",
            Self::Best => "Best",
            Self::BestCenter => "BestCenter",
            Self::FastCenter => "FastCenter",
            Self::Plus => "Plus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSelection {
    pub pitch: PitchType,
    pub objective: PitchObjective,
    /// Final selection score of the chosen pitch.
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
struct PitcherMemory {
    variation: BTreeMap<PitchType, f64>,
    established: BTreeSet<PitchType>,
}

/// Pitch selector. One instance serves both staffs for a whole game.
#[derive(Debug, Clone, Default)]
pub struct PitcherAI {
    memory: BTreeMap<PlayerId, PitcherMemory>,
    last_selection: Option<PitchSelection>,
}

impl PitcherAI {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn last_selection(&self) -> Option<PitchSelection> {
        self.last_selection
    }

    /// Whether `pitcher` has already thrown `pitch` this game.
    #[must_use]
    pub fn is_established(&self, pitcher: &PlayerId, pitch: PitchType) -> bool {
        self.memory
            .get(pitcher)
            .is_some_and(|memory| memory.established.contains(&pitch))
    }

    /// Choose the next pitch type and objective for `pitcher` at `balls`-`strikes`.
    ///
    /// `rating_scale` is the fatigue multiplier applied to every pitch rating.
    /// The first call for a pitcher rolls one variation per repertoire pitch;
    /// later calls reuse those rolls. The objective costs one draw unless every
    /// weight for the count is zero.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NoPitchTypes`] when the pitcher has no pitch
    /// with a positive rating.
    pub fn select_pitch<R: RngCore + ?Sized>(
        &mut self,
        cfg: &ConfigTable,
        pitcher: &Pitcher,
        balls: u8,
        strikes: u8,
        rating_scale: f64,
        rng: &mut R,
    ) -> Result<PitchSelection, SimulationError> {
        let ratings = &pitcher.ratings;
        let Some(primary) = ratings.primary_pitch() else {
            return Err(SimulationError::NoPitchTypes {
                pitcher: pitcher.id().clone(),
            });
        };

        let memory = self.memory.entry(pitcher.id().clone()).or_default();
        if memory.variation.is_empty() {
            let count = round_f64_to_u32(cfg.get("pitchRatVariationCount"));
            let faces = round_f64_to_u32(cfg.get("pitchRatVariationFaces"));
            let base = cfg.get("pitchRatVariationBase");
            for pitch in ratings.repertoire() {
                let roll = if count > 0 && faces > 0 {
                    base + i64_to_f64(roll_dice(rng, count, faces))
                } else {
                    0.0
                };
                memory.variation.insert(pitch, roll);
            }
        }

        let non_established = cfg.get("nonEstablishedPitchTypeAdjust");
        let primary_adjust = cfg.get("primaryPitchTypeAdjust");
        let mut best: Option<(PitchType, f64)> = None;
        for pitch in PITCH_ORDER {
            let base = ratings.pitch(pitch);
            if base == 0 {
                continue;
            }
            let mut score = f64::from(base) * rating_scale
                + memory.variation.get(&pitch).copied().unwrap_or(0.0);
            if !memory.established.contains(&pitch) {
                score += non_established;
            }
            if pitch == primary {
                score += primary_adjust;
            }
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((pitch, score));
            }
        }
        let Some((pitch, score)) = best else {
            return Err(SimulationError::NoPitchTypes {
                pitcher: pitcher.id().clone(),
            });
        };
        memory.established.insert(pitch);

        let weights: Vec<(PitchObjective, f64)> = PitchObjective::ALL
            .into_iter()
            .map(|objective| {
                let suffix = format!("{}Weight", objective.config_name());
                (objective, cfg.count_value("pitchObj", balls, strikes, &format!("Count{suffix}")))
            })
            .collect();
        let objective = weighted_pick(rng, &weights).unwrap_or_default();

        let selection = PitchSelection {
            pitch,
            objective,
            score,
        };
        log::trace!(
            "pitch select {}: {:?}/{:?} score {score:.1} at {balls}-{strikes}",
            pitcher.id(),
            pitch,
            objective
        );
        self.last_selection = Some(selection);
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PitchingRatings;

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

    fn no_variation_cfg(extra: &[(&str, f64)]) -> ConfigTable {
        let mut overrides = vec![
            ("pitchRatVariationCount", 0.0),
            ("primaryPitchTypeAdjust", 0.0),
            ("nonEstablishedPitchTypeAdjust", 0.0),
        ];
        overrides.extend_from_slice(extra);
        ConfigTable::with_overrides(overrides).unwrap()
    }

    fn pitcher(fb: u8, sl: u8, cu: u8) -> Pitcher {
        Pitcher::new(
            "p1",
            PitchingRatings {
                fb,
                sl,
                cu,
                ..PitchingRatings::default()
            },
        )
    }

    #[test]
    fn highest_rated_pitch_wins_and_ties_keep_order() {
        let cfg = no_variation_cfg(&[]);
        let mut ai = PitcherAI::new();
        let mut rng = StubRng::new(vec![0; 8]);
        let pick = ai
            .select_pitch(&cfg, &pitcher(60, 70, 70), 0, 0, 1.0, &mut rng)
            .unwrap();
        assert_eq!(pick.pitch, PitchType::Slider);
    }

    #[test]
    fn non_established_bonus_rotates_repertoire() {
        let cfg = no_variation_cfg(&[("nonEstablishedPitchTypeAdjust", 20.0)]);
        let mut ai = PitcherAI::new();
        let mut rng = StubRng::new(vec![0; 8]);
        let p = pitcher(60, 50, 0);
        let first = ai.select_pitch(&cfg, &p, 0, 0, 1.0, &mut rng).unwrap();
        assert_eq!(first.pitch, PitchType::Fastball);
        let second = ai.select_pitch(&cfg, &p, 0, 0, 1.0, &mut rng).unwrap();
        assert_eq!(second.pitch, PitchType::Slider);
        assert!(ai.is_established(p.id(), PitchType::Fastball));
        assert!(ai.is_established(p.id(), PitchType::Slider));
    }

    #[test]
    fn primary_adjust_favours_top_pitch() {
        let cfg = no_variation_cfg(&[
            ("nonEstablishedPitchTypeAdjust", 30.0),
            ("primaryPitchTypeAdjust", 50.0),
        ]);
        let mut ai = PitcherAI::new();
        let mut rng = StubRng::new(vec![0; 8]);
        let p = pitcher(70, 60, 0);
        for _ in 0..3 {
            let pick = ai.select_pitch(&cfg, &p, 1, 1, 1.0, &mut rng).unwrap();
            assert_eq!(pick.pitch, PitchType::Fastball);
        }
    }

    #[test]
    fn variation_dice_roll_only_on_first_appearance() {
        let cfg = ConfigTable::defaults();
        let mut ai = PitcherAI::new();
        let p = pitcher(60, 55, 50);
        let mut rng = StubRng::new(vec![0; 16]);
        ai.select_pitch(&cfg, &p, 0, 0, 1.0, &mut rng).unwrap();
        // three repertoire dice plus one objective draw
        assert_eq!(rng.calls, 4);
        ai.select_pitch(&cfg, &p, 0, 0, 1.0, &mut rng).unwrap();
        assert_eq!(rng.calls, 5);
    }

    #[test]
    fn zero_weights_default_to_establish_without_drawing() {
        let cfg = no_variation_cfg(&[
            ("pitchObj00CountOutsideWeight", 0.0),
            ("pitchObj00CountPlusWeight", 0.0),
        ]);
        let mut ai = PitcherAI::new();
        let mut rng = StubRng::new(vec![u32::MAX; 4]);
        let pick = ai
            .select_pitch(&cfg, &pitcher(50, 0, 0), 0, 0, 1.0, &mut rng)
            .unwrap();
        assert_eq!(pick.objective, PitchObjective::Establish);
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn objective_follows_count_weights() {
        let cfg = no_variation_cfg(&[]);
        let mut ai = PitcherAI::new();
        // 3-0 weights: BestCenter 20, FastCenter 80 -> a low draw lands on BestCenter
        let mut rng = StubRng::new(vec![0, u32::MAX]);
        let p = pitcher(50, 40, 0);
        let low = ai.select_pitch(&cfg, &p, 3, 0, 1.0, &mut rng).unwrap();
        assert_eq!(low.objective, PitchObjective::BestCenter);
        let high = ai.select_pitch(&cfg, &p, 3, 0, 1.0, &mut rng).unwrap();
        assert_eq!(high.objective, PitchObjective::FastCenter);
    }

    #[test]
    fn empty_repertoire_is_an_error() {
        let cfg = ConfigTable::defaults();
        let mut ai = PitcherAI::new();
        let mut rng = StubRng::new(Vec::new());
        let err = ai
            .select_pitch(&cfg, &pitcher(0, 0, 0), 0, 0, 1.0, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SimulationError::NoPitchTypes { .. }));
    }
}
