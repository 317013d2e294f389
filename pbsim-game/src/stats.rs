//! League rates and the benchmark table they are judged against.
//!
//! [`LeagueTotals`] sums the per-game accumulators of any number of clubs;
//! [`LeagueRates`] turns those sums into the usual rate statistics, and
//! [`LeagueBenchmarks`] compares them with targets and tolerances.

use crate::numbers::u64_to_f64;
use crate::state::{BatterState, PitchCounters, PitcherState, TeamState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

const BENCHMARKS_JSON: &str = include_str!("../assets/benchmarks.json");

/// Metric keys [`LeagueRates::metric`] understands, in report order.
pub const METRIC_KEYS: [&str; 21] = [
    "pitches_per_pa",
    "zone_pct",
    "swing_pct",
    "z_swing_pct",
    "o_swing_pct",
    "contact_pct",
    "z_contact_pct",
    "o_contact_pct",
    "pitches_put_in_play_pct",
    "avg",
    "obp",
    "slg",
    "babip",
    "k_pct",
    "bb_pct",
    "hr_pct",
    "hr_per_fb_pct",
    "bip_gb_pct",
    "bip_ld_pct",
    "bip_fb_pct",
    "called_third_strike_share_of_so",
];

fn rate(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        u64_to_f64(numerator) / u64_to_f64(denominator)
    }
}

/// Pitch-level counts summed over many pitchers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PitchTotals {
    pub pitches: u64,
    pub zone_pitches: u64,
    pub o_zone_pitches: u64,
    pub zone_swings: u64,
    pub o_zone_swings: u64,
    pub zone_contacts: u64,
    pub o_zone_contacts: u64,
    pub called_strikes: u64,
    pub swinging_strikes: u64,
    pub fouls: u64,
    pub balls_in_play: u64,
}

impl PitchTotals {
    pub fn absorb(&mut self, counters: &PitchCounters) {
        self.pitches += u64::from(counters.pitches);
        self.zone_pitches += u64::from(counters.zone_pitches);
        self.o_zone_pitches += u64::from(counters.o_zone_pitches);
        self.zone_swings += u64::from(counters.zone_swings);
        self.o_zone_swings += u64::from(counters.o_zone_swings);
        self.zone_contacts += u64::from(counters.zone_contacts);
        self.o_zone_contacts += u64::from(counters.o_zone_contacts);
        self.called_strikes += u64::from(counters.called_strikes);
        self.swinging_strikes += u64::from(counters.swinging_strikes);
        self.fouls += u64::from(counters.fouls);
        self.balls_in_play += u64::from(counters.balls_in_play);
    }

    #[must_use]
    pub const fn swings(&self) -> u64 {
        self.zone_swings + self.o_zone_swings
    }

    #[must_use]
    pub const fn contacts(&self) -> u64 {
        self.zone_contacts + self.o_zone_contacts
    }
}

/// Batting line summed over many players and games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BattingTotals {
    pub pa: u64,
    pub ab: u64,
    pub h: u64,
    pub b1: u64,
    pub b2: u64,
    pub b3: u64,
    pub hr: u64,
    pub bb: u64,
    pub ibb: u64,
    pub hbp: u64,
    pub so: u64,
    pub so_looking: u64,
    pub sh: u64,
    pub sf: u64,
    pub roe: u64,
    pub gidp: u64,
    pub sb: u64,
    pub cs: u64,
    pub ground_balls: u64,
    pub line_drives: u64,
    pub fly_balls: u64,
    pub pitches: u64,
}

impl BattingTotals {
    pub fn absorb(&mut self, line: &BatterState) {
        self.pa += u64::from(line.pa);
        self.ab += u64::from(line.ab);
        self.h += u64::from(line.h);
        self.b1 += u64::from(line.b1);
        self.b2 += u64::from(line.b2);
        self.b3 += u64::from(line.b3);
        self.hr += u64::from(line.hr);
        self.bb += u64::from(line.bb);
        self.ibb += u64::from(line.ibb);
        self.hbp += u64::from(line.hbp);
        self.so += u64::from(line.so);
        self.so_looking += u64::from(line.so_looking);
        self.sh += u64::from(line.sh);
        self.sf += u64::from(line.sf);
        self.roe += u64::from(line.roe);
        self.gidp += u64::from(line.gidp);
        self.sb += u64::from(line.sb);
        self.cs += u64::from(line.cs);
        self.ground_balls += u64::from(line.ground_balls);
        self.line_drives += u64::from(line.line_drives);
        self.fly_balls += u64::from(line.fly_balls);
        self.pitches += u64::from(line.pitches.pitches);
    }

    #[must_use]
    pub const fn total_bases(&self) -> u64 {
        self.b1 + 2 * self.b2 + 3 * self.b3 + 4 * self.hr
    }

    #[must_use]
    pub const fn batted_balls(&self) -> u64 {
        self.ground_balls + self.line_drives + self.fly_balls
    }
}

/// Everything needed for league rates, summed across clubs and games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeagueTotals {
    pub games: u64,
    pub batting: BattingTotals,
    pub pitching: PitchTotals,
    pub batters_faced: u64,
    pub strikeouts: u64,
    pub walks: u64,
    pub runs: u64,
}

impl LeagueTotals {
    /// Add one club's game.
    pub fn absorb_team(&mut self, team: &TeamState) {
        for line in team.lineup_stats().values() {
            self.batting.absorb(line);
        }
        for line in team.pitcher_stats().values() {
            self.absorb_pitcher(line);
        }
        self.runs += u64::from(team.runs());
    }

    /// Add a finished game between `home` and `away`.
    pub fn absorb_game(&mut self, home: &TeamState, away: &TeamState) {
        self.absorb_team(home);
        self.absorb_team(away);
        self.games += 1;
    }

    fn absorb_pitcher(&mut self, line: &PitcherState) {
        self.pitching.absorb(&line.pitches);
        self.batters_faced += u64::from(line.batters_faced);
        self.strikeouts += u64::from(line.strikeouts);
        self.walks += u64::from(line.walks);
    }

    /// Fold another partial sum in.
    pub fn merge(&mut self, other: &Self) {
        let b = &other.batting;
        let mine = &mut self.batting;
        mine.pa += b.pa;
        mine.ab += b.ab;
        mine.h += b.h;
        mine.b1 += b.b1;
        mine.b2 += b.b2;
        mine.b3 += b.b3;
        mine.hr += b.hr;
        mine.bb += b.bb;
        mine.ibb += b.ibb;
        mine.hbp += b.hbp;
        mine.so += b.so;
        mine.so_looking += b.so_looking;
        mine.sh += b.sh;
        mine.sf += b.sf;
        mine.roe += b.roe;
        mine.gidp += b.gidp;
        mine.sb += b.sb;
        mine.cs += b.cs;
        mine.ground_balls += b.ground_balls;
        mine.line_drives += b.line_drives;
        mine.fly_balls += b.fly_balls;
        mine.pitches += b.pitches;
        let p = &other.pitching;
        let pitching = &mut self.pitching;
        pitching.pitches += p.pitches;
        pitching.zone_pitches += p.zone_pitches;
        pitching.o_zone_pitches += p.o_zone_pitches;
        pitching.zone_swings += p.zone_swings;
        pitching.o_zone_swings += p.o_zone_swings;
        pitching.zone_contacts += p.zone_contacts;
        pitching.o_zone_contacts += p.o_zone_contacts;
        pitching.called_strikes += p.called_strikes;
        pitching.swinging_strikes += p.swinging_strikes;
        pitching.fouls += p.fouls;
        pitching.balls_in_play += p.balls_in_play;
        self.games += other.games;
        self.batters_faced += other.batters_faced;
        self.strikeouts += other.strikeouts;
        self.walks += other.walks;
        self.runs += other.runs;
    }

    #[must_use]
    pub fn rates(&self) -> LeagueRates {
        LeagueRates {
            pitching: PitchingRates::from_totals(&self.pitching, self.batting.pa),
            batting: BattingRates::from_totals(&self.batting),
            runs_per_game: if self.games == 0 {
                0.0
            } else {
                u64_to_f64(self.runs) / u64_to_f64(self.games * 2)
            },
        }
    }
}

/// Plate-discipline rates from the pitch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PitchingRates {
    pub pitches_per_pa: f64,
    pub zone_pct: f64,
    pub swing_pct: f64,
    pub z_swing_pct: f64,
    pub o_swing_pct: f64,
    pub contact_pct: f64,
    pub z_contact_pct: f64,
    pub o_contact_pct: f64,
    pub pitches_put_in_play_pct: f64,
}

impl PitchingRates {
    #[must_use]
    pub fn from_totals(totals: &PitchTotals, plate_appearances: u64) -> Self {
        let located = totals.zone_pitches + totals.o_zone_pitches;
        Self {
            pitches_per_pa: rate(totals.pitches, plate_appearances),
            zone_pct: rate(totals.zone_pitches, located),
            swing_pct: rate(totals.swings(), located),
            z_swing_pct: rate(totals.zone_swings, totals.zone_pitches),
            o_swing_pct: rate(totals.o_zone_swings, totals.o_zone_pitches),
            contact_pct: rate(totals.contacts(), totals.swings()),
            z_contact_pct: rate(totals.zone_contacts, totals.zone_swings),
            o_contact_pct: rate(totals.o_zone_contacts, totals.o_zone_swings),
            pitches_put_in_play_pct: rate(totals.balls_in_play, totals.pitches),
        }
    }

    /// Rates for a single accumulator, e.g. one pitcher's game.
    #[must_use]
    pub fn from_counters(counters: &PitchCounters, plate_appearances: u32) -> Self {
        let mut totals = PitchTotals::default();
        totals.absorb(counters);
        Self::from_totals(&totals, u64::from(plate_appearances))
    }
}

/// Slash line, strikeout/walk rates and batted-ball mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BattingRates {
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    /// Hits minus home runs over at-bats minus strikeouts and home runs, plus
    /// sacrifice flies.
    pub babip: f64,
    pub k_pct: f64,
    pub bb_pct: f64,
    pub hr_pct: f64,
    pub hr_per_fb_pct: f64,
    pub bip_gb_pct: f64,
    pub bip_ld_pct: f64,
    pub bip_fb_pct: f64,
    pub called_third_strike_share_of_so: f64,
}

impl BattingRates {
    #[must_use]
    pub fn from_totals(t: &BattingTotals) -> Self {
        let batted = t.batted_balls();
        let babip_denominator = (t.ab + t.sf).saturating_sub(t.so + t.hr);
        Self {
            avg: rate(t.h, t.ab),
            obp: rate(t.h + t.bb + t.hbp, t.ab + t.bb + t.hbp + t.sf),
            slg: rate(t.total_bases(), t.ab),
            babip: rate(t.h.saturating_sub(t.hr), babip_denominator),
            k_pct: rate(t.so, t.pa),
            bb_pct: rate(t.bb, t.pa),
            hr_pct: rate(t.hr, t.pa),
            hr_per_fb_pct: rate(t.hr, t.fly_balls),
            bip_gb_pct: rate(t.ground_balls, batted),
            bip_ld_pct: rate(t.line_drives, batted),
            bip_fb_pct: rate(t.fly_balls, batted),
            called_third_strike_share_of_so: rate(t.so_looking, t.so),
        }
    }

    /// Rates for a single player line.
    #[must_use]
    pub fn from_line(line: &BatterState) -> Self {
        let mut totals = BattingTotals::default();
        totals.absorb(line);
        Self::from_totals(&totals)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LeagueRates {
    pub pitching: PitchingRates,
    pub batting: BattingRates,
    pub runs_per_game: f64,
}

impl LeagueRates {
    /// Look a rate up by its benchmark key.
    #[must_use]
    pub fn metric(&self, key: &str) -> Option<f64> {
        let p = &self.pitching;
        let b = &self.batting;
        let value = match key {
            "pitches_per_pa" => p.pitches_per_pa,
            "zone_pct" => p.zone_pct,
            "swing_pct" => p.swing_pct,
            "z_swing_pct" => p.z_swing_pct,
            "o_swing_pct" => p.o_swing_pct,
            "contact_pct" => p.contact_pct,
            "z_contact_pct" => p.z_contact_pct,
            "o_contact_pct" => p.o_contact_pct,
            "pitches_put_in_play_pct" => p.pitches_put_in_play_pct,
            "avg" => b.avg,
            "obp" => b.obp,
            "slg" => b.slg,
            "babip" => b.babip,
            "k_pct" => b.k_pct,
            "bb_pct" => b.bb_pct,
            "hr_pct" => b.hr_pct,
            "hr_per_fb_pct" => b.hr_per_fb_pct,
            "bip_gb_pct" => b.bip_gb_pct,
            "bip_ld_pct" => b.bip_ld_pct,
            "bip_fb_pct" => b.bip_fb_pct,
            "called_third_strike_share_of_so" => b.called_third_strike_share_of_so,
            "runs_per_game" => self.runs_per_game,
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BenchmarkError {
    #[error("benchmark table parse error: {0}")]
    Parse(String),
    #[error("unknown benchmark metric {metric}")]
    UnknownMetric { metric: String },
    #[error("benchmark {metric} has an invalid {field} ({value})")]
    Invalid {
        metric: String,
        field: &'static str,
        value: f64,
    },
}

/// Target value and allowed absolute deviation for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub target: f64,
    pub tolerance: f64,
}

/// League targets keyed by metric name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeagueBenchmarks {
    metrics: BTreeMap<String, Benchmark>,
}

impl Default for LeagueBenchmarks {
    fn default() -> Self {
        Self::from_json(BENCHMARKS_JSON).unwrap_or_else(|_| Self {
            metrics: BTreeMap::new(),
        })
    }
}

impl LeagueBenchmarks {
    /// Parse and validate a benchmark table.
    ///
    /// # Errors
    ///
    /// Returns [`BenchmarkError::Parse`] for malformed JSON and whatever
    /// [`LeagueBenchmarks::validate`] rejects.
    pub fn from_json(json_str: &str) -> Result<Self, BenchmarkError> {
        let table: Self =
            serde_json::from_str(json_str).map_err(|e| BenchmarkError::Parse(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Every metric must be one [`LeagueRates::metric`] knows, with a finite
    /// target and a positive finite tolerance.
    ///
    /// # Errors
    ///
    /// Returns the first offending entry.
    pub fn validate(&self) -> Result<(), BenchmarkError> {
        let probe = LeagueRates::default();
        for (metric, bench) in &self.metrics {
            if probe.metric(metric).is_none() {
                return Err(BenchmarkError::UnknownMetric {
                    metric: metric.clone(),
                });
            }
            if !bench.target.is_finite() {
                return Err(BenchmarkError::Invalid {
                    metric: metric.clone(),
                    field: "target",
                    value: bench.target,
                });
            }
            if !bench.tolerance.is_finite() || bench.tolerance <= 0.0 {
                return Err(BenchmarkError::Invalid {
                    metric: metric.clone(),
                    field: "tolerance",
                    value: bench.tolerance,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, metric: &str) -> Option<&Benchmark> {
        self.metrics.get(metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Benchmark)> {
        self.metrics.iter().map(|(key, bench)| (key.as_str(), bench))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// One check per benchmarked metric.
    #[must_use]
    pub fn compare(&self, rates: &LeagueRates) -> Vec<BenchmarkCheck> {
        self.metrics
            .iter()
            .filter_map(|(metric, bench)| {
                rates.metric(metric).map(|actual| BenchmarkCheck {
                    metric: metric.clone(),
                    actual,
                    target: bench.target,
                    tolerance: bench.tolerance,
                })
            })
            .collect()
    }
}

/// A simulated rate next to its league target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkCheck {
    pub metric: String,
    pub actual: f64,
    pub target: f64,
    pub tolerance: f64,
}

impl BenchmarkCheck {
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.actual - self.target
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.delta().abs() <= self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Player, PlayerId, Position};

    fn line() -> BatterState {
        let mut line = BatterState::new(Player::new("b", Position::LeftField, Default::default()));
        line.pa = 10;
        line.ab = 8;
        line.h = 3;
        line.b1 = 1;
        line.b2 = 1;
        line.hr = 1;
        line.bb = 1;
        line.hbp = 1;
        line.so = 2;
        line.so_looking = 1;
        line.ground_balls = 2;
        line.line_drives = 2;
        line.fly_balls = 2;
        line
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn slash_line_from_one_player() {
        let rates = BattingRates::from_line(&line());
        assert!(close(rates.avg, 3.0 / 8.0));
        assert!(close(rates.obp, 5.0 / 10.0));
        assert!(close(rates.slg, 7.0 / 8.0));
        assert!(close(rates.babip, 2.0 / 5.0));
        assert!(close(rates.k_pct, 0.2));
        assert!(close(rates.bip_gb_pct, 1.0 / 3.0));
        assert!(close(rates.called_third_strike_share_of_so, 0.5));
    }

    #[test]
    fn empty_totals_rate_to_zero() {
        let rates = LeagueTotals::default().rates();
        assert!(close(rates.batting.avg, 0.0));
        assert!(close(rates.pitching.swing_pct, 0.0));
        assert!(close(rates.runs_per_game, 0.0));
    }

    #[test]
    fn plate_discipline_from_counters() {
        let mut counters = PitchCounters::default();
        counters.record(true, true, true);
        counters.record(true, false, false);
        counters.record(false, true, false);
        counters.record(false, false, false);
        let rates = PitchingRates::from_counters(&counters, 1);
        assert!(close(rates.pitches_per_pa, 4.0));
        assert!(close(rates.zone_pct, 0.5));
        assert!(close(rates.swing_pct, 0.5));
        assert!(close(rates.z_swing_pct, 0.5));
        assert!(close(rates.o_swing_pct, 0.5));
        assert!(close(rates.contact_pct, 0.5));
        assert!(close(rates.o_contact_pct, 0.0));
    }

    #[test]
    fn merged_totals_match_sequential_absorb() {
        let mut team = TeamState::new(
            "t",
            vec![Player::new("b", Position::LeftField, Default::default())],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        *team.batter_state_mut(&line().player) = line();
        let mut one = LeagueTotals::default();
        one.absorb_game(&team, &team);
        let mut two = LeagueTotals::default();
        two.merge(&one);
        two.merge(&one);
        let mut seq = LeagueTotals::default();
        seq.absorb_game(&team, &team);
        seq.absorb_game(&team, &team);
        assert_eq!(two, seq);
        assert_eq!(seq.batting.pa, 40);
        assert!(team.lineup_stats().contains_key(&PlayerId::new("b")));
    }

    #[test]
    fn embedded_benchmarks_are_valid() {
        let table = LeagueBenchmarks::default();
        assert!(!table.is_empty());
        assert!(table.validate().is_ok());
        let swing = table.get("swing_pct").unwrap();
        assert!(close(swing.target, 0.46));
        assert!(close(swing.tolerance, 0.03));
        for (metric, _) in table.iter() {
            assert!(METRIC_KEYS.contains(&metric) || metric == "runs_per_game");
        }
    }

    #[test]
    fn bad_tables_are_rejected() {
        assert!(matches!(
            LeagueBenchmarks::from_json("[1, 2]"),
            Err(BenchmarkError::Parse(_))
        ));
        assert_eq!(
            LeagueBenchmarks::from_json(r#"{"ops_plus": {"target": 100, "tolerance": 5}}"#),
            Err(BenchmarkError::UnknownMetric {
                metric: "ops_plus".to_string()
            })
        );
        assert!(matches!(
            LeagueBenchmarks::from_json(r#"{"avg": {"target": 0.25, "tolerance": 0}}"#),
            Err(BenchmarkError::Invalid {
                field: "tolerance",
                ..
            })
        ));
    }

    #[test]
    fn checks_pass_inside_tolerance() {
        let table = LeagueBenchmarks::from_json(
            r#"{
                "avg": {"target": 0.250, "tolerance": 0.01},
                "k_pct": {"target": 0.22, "tolerance": 0.01}
            }"#,
        )
        .unwrap();
        let mut rates = LeagueRates::default();
        rates.batting.avg = 0.255;
        rates.batting.k_pct = 0.25;
        let checks = table.compare(&rates);
        assert_eq!(checks.len(), 2);
        let avg = checks.iter().find(|c| c.metric == "avg").unwrap();
        assert!(avg.passed());
        let k = checks.iter().find(|c| c.metric == "k_pct").unwrap();
        assert!(!k.passed());
        assert!(close(k.delta(), 0.03));
    }
}
