use pbsim_game::batter_ai::SwingInput;
use pbsim_game::engine::pitch::{PitchSetup, resolve_pitch};
use pbsim_game::{
    BatterAI, BattingRatings, ConfigTable, Count, FatigueBullpen, GameRng, GameSimulation,
    LeagueBenchmarks, LeagueTotals, PitchType, Pitcher, PitcherAI, PitchingRatings, Player,
    Position, SwingType, TeamState,
};
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use std::sync::Arc;

const SAMPLE_SIZE: usize = 10_000;
const GAMES: u64 = 120;
const TOLERANCE: f64 = 0.03;

const POSITIONS: [Position; 9] = [
    Position::CenterField,
    Position::SecondBase,
    Position::LeftField,
    Position::FirstBase,
    Position::RightField,
    Position::ThirdBase,
    Position::ShortStop,
    Position::Catcher,
    Position::Pitcher,
];

fn league_pitcher(id: &str) -> Pitcher {
    Pitcher::new(
        id,
        PitchingRatings {
            endurance: 100,
            control: 50,
            movement: 50,
            arm: 50,
            fb: 60,
            sl: 50,
            cu: 50,
            ..PitchingRatings::default()
        },
    )
}

fn club(name: &str) -> TeamState {
    let lineup = POSITIONS
        .iter()
        .enumerate()
        .map(|(slot, position)| {
            Player::new(format!("{name}-{slot}"), *position, BattingRatings::default())
        })
        .collect();
    let pitchers = (0..6)
        .map(|idx| league_pitcher(&format!("{name}-p{idx}")))
        .collect();
    TeamState::new(name, lineup, Vec::new(), pitchers).expect("club has a lineup")
}

fn play_games(cfg: &Arc<ConfigTable>, seed_base: u64) -> LeagueTotals {
    let mut totals = LeagueTotals::default();
    for game in 0..GAMES {
        let mut sim = GameSimulation::new(
            Arc::clone(cfg),
            club("home"),
            club("away"),
            GameRng::from_user_seed(seed_base + game),
            FatigueBullpen::default(),
        );
        sim.simulate_game(9).expect("game completes");
        let (home, away) = sim.into_teams();
        totals.absorb_game(&home, &away);
    }
    totals
}

#[test]
fn swing_rate_reproduces_the_league_benchmark() {
    let cfg = ConfigTable::with_overrides([("idRatingBase", 50.0)]).expect("valid override");
    let benchmarks = LeagueBenchmarks::default();
    let target = benchmarks.get("swing_pct").expect("swing benchmark").target;
    let batter = Player::new("b", Position::CenterField, BattingRatings::default());
    let pitcher = league_pitcher("p");
    let mut batter_ai = BatterAI::new();
    let mut rng = SmallRng::seed_from_u64(0x5EED_0046);

    let mut pitches = 0_u32;
    let mut swings = 0_u32;
    for _ in 0..SAMPLE_SIZE {
        let mut pitcher_ai = PitcherAI::new();
        let mut count = Count::new();
        loop {
            let setup = PitchSetup {
                batter: &batter,
                pitcher: &pitcher,
                count,
                pitches_thrown: 0,
                swing_type: SwingType::Normal,
                forced_swing: false,
                pitch_around: false,
            };
            let (_, outcome) =
                resolve_pitch(&cfg, &mut pitcher_ai, &mut batter_ai, &setup, &mut rng)
                    .expect("pitch resolves");
            pitches += 1;
            if outcome.swing {
                swings += 1;
            }
            let Some(event) = outcome.event else {
                break;
            };
            if count.apply(event).is_terminal() {
                break;
            }
        }
    }
    let observed = f64::from(swings) / f64::from(pitches);
    assert!(
        (observed - target).abs() <= TOLERANCE,
        "swing rate drifted: observed {observed:.4}, target {target:.3}"
    );
}

#[test]
fn perfect_identification_meets_the_ball_squarely() {
    let cfg = ConfigTable::with_overrides([("idRatingBase", 100.0)]).expect("valid override");
    let batter = BattingRatings::default();
    let pitcher = league_pitcher("p");
    let mut ai = BatterAI::new();
    let mut rng = SmallRng::seed_from_u64(0xA11);
    for _ in 0..SAMPLE_SIZE / 10 {
        let input = SwingInput {
            batter: &batter,
            pitcher: &pitcher.ratings,
            pitch: PitchType::Fastball,
            pitch_rating: 60.0,
            balls: 1,
            strikes: 1,
            dist: 0,
            dx: 0.0,
            dy: 0.0,
            swing_type: SwingType::Normal,
            forced: true,
        };
        let decision = ai.decide_swing(&cfg, &input, rng.r#gen::<f64>());
        assert!(decision.swing);
        assert!(
            (decision.contact_quality - 0.93).abs() < 1e-9,
            "quality {}",
            decision.contact_quality
        );
    }
}

#[test]
fn ground_ball_only_tables_keep_everything_on_the_ground() {
    let cfg = Arc::new(
        ConfigTable::with_overrides([
            ("groundBallBaseRate", 100.0),
            ("flyBallBaseRate", 0.0),
            ("lineDriveBaseRate", 0.0),
            ("groundBallMovementPct", 0.0),
            ("vertAngleGFPct", 0.0),
            ("flyBallPHPct", 0.0),
        ])
        .expect("valid overrides"),
    );
    let totals = play_games(&cfg, 0xC0);
    assert!(totals.batting.ground_balls > 0);
    assert_eq!(totals.batting.line_drives, 0);
    assert_eq!(totals.batting.fly_balls, 0);
    assert_eq!(totals.batting.sf, 0, "no fly balls to tag up on");
    let rates = totals.rates();
    assert!((rates.batting.bip_gb_pct - 1.0).abs() < f64::EPSILON);
}

#[test]
fn league_strikeout_and_walk_rates_stay_plausible() {
    let cfg = Arc::new(ConfigTable::defaults());
    let totals = play_games(&cfg, 0xBA5E);
    let rates = totals.rates();
    assert!(
        (0.10..=0.35).contains(&rates.batting.k_pct),
        "strikeout rate {:.3}",
        rates.batting.k_pct
    );
    assert!(
        (0.03..=0.20).contains(&rates.batting.bb_pct),
        "walk rate {:.3}",
        rates.batting.bb_pct
    );
    assert!(
        (0.35..=0.60).contains(&rates.pitching.swing_pct),
        "swing rate {:.3}",
        rates.pitching.swing_pct
    );
    assert!(rates.pitching.pitches_per_pa > 3.0 && rates.pitching.pitches_per_pa < 4.6);
}
