use pbsim_game::{
    BattingRatings, Hand, Pitcher, PitchingRatings, Player, Position, RosterLoader, TeamRoster,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Clubs of the generated league.
pub const CLUBS: [&str; 6] = ["Harbor", "Summit", "Prairie", "Canyon", "Delta", "Ridge"];

const MIN_RATING: i16 = 15;
const MAX_RATING: i16 = 95;
const RELIEVERS: usize = 6;
const LEFT_HANDED_SHARE: f64 = 0.3;
const OFFSPEED_SHARE: f64 = 0.6;
const SINKER_SHARE: f64 = 0.15;

const FIELDERS: [Position; 8] = [
    Position::CenterField,
    Position::ShortStop,
    Position::SecondBase,
    Position::FirstBase,
    Position::ThirdBase,
    Position::LeftField,
    Position::RightField,
    Position::Catcher,
];

const BENCH: [Position; 4] = [
    Position::Catcher,
    Position::SecondBase,
    Position::LeftField,
    Position::CenterField,
];

/// Rating offsets applied on top of the league-average 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterProfile {
    pub contact: i8,
    pub power: i8,
    pub loft: i8,
    pub eye: i8,
    pub speed: i8,
    pub control: i8,
    pub stuff: i8,
}

impl RosterProfile {
    pub const LEAGUE: Self = Self {
        contact: 0,
        power: 0,
        loft: 0,
        eye: 0,
        speed: 0,
        control: 0,
        stuff: 0,
    };
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no club named {0} in the generated league")]
    UnknownClub(String),
}

/// Roster source that invents every club from the run seed.
///
/// Each club draws from its own ChaCha stream keyed by scenario, seed and
/// club name, so a club's roster never depends on which other clubs were
/// loaded first.
#[derive(Debug, Clone)]
pub struct GeneratedRosters {
    scenario: String,
    seed: u64,
    profile: RosterProfile,
}

impl GeneratedRosters {
    pub fn new(scenario: impl Into<String>, seed: u64, profile: RosterProfile) -> Self {
        Self {
            scenario: scenario.into(),
            seed,
            profile,
        }
    }

    fn club_rng(&self, team: &str) -> ChaCha8Rng {
        let mut hasher = Sha256::new();
        hasher.update(self.scenario.as_bytes());
        hasher.update(b":");
        hasher.update(self.seed.to_le_bytes());
        hasher.update(b":");
        hasher.update(team.as_bytes());
        let digest = hasher.finalize();
        let mut seed = [0_u8; 32];
        seed.copy_from_slice(&digest);
        ChaCha8Rng::from_seed(seed)
    }

    fn batter<R: Rng>(&self, rng: &mut R, id: String, position: Position, base: i16) -> Player {
        let p = self.profile;
        let ratings = BattingRatings {
            ch: rating(rng, base, p.contact, 15),
            ph: rating(rng, base, p.power, 15),
            sp: rating(rng, base, p.speed, 20),
            gf: rating(rng, base, p.loft, 15),
            pl: rating(rng, 50, 0, 15),
            exp: rating(rng, base, p.eye, 15),
            fa: rating(rng, 55, 0, 15),
            arm: rating(rng, 55, 0, 15),
        };
        let mut player = Player::new(id, position, ratings);
        if rng.r#gen::<f64>() < LEFT_HANDED_SHARE {
            player.bats = Hand::Left;
        }
        player
    }

    fn pitcher<R: Rng>(&self, rng: &mut R, id: String, endurance: (u8, u8)) -> Pitcher {
        let p = self.profile;
        let mut ratings = PitchingRatings {
            endurance: rng.gen_range(endurance.0..=endurance.1),
            control: rating(rng, 50, p.control, 12),
            movement: rating(rng, 50, p.stuff / 2, 12),
            hold_runner: rating(rng, 50, 0, 15),
            arm: rating(rng, 50, p.stuff, 12),
            fb: rating(rng, 58, p.stuff, 10),
            sl: offspeed(rng, p.stuff, OFFSPEED_SHARE),
            cu: offspeed(rng, p.stuff, OFFSPEED_SHARE),
            cb: offspeed(rng, p.stuff, OFFSPEED_SHARE),
            si: offspeed(rng, p.stuff, SINKER_SHARE),
            ..PitchingRatings::default()
        };
        if ratings.best_offspeed().is_none() {
            ratings.sl = rating(rng, 50, p.stuff, 12);
        }
        let mut pitcher = Pitcher::new(id, ratings);
        if rng.r#gen::<f64>() < LEFT_HANDED_SHARE {
            pitcher.player.throws = Hand::Left;
        }
        pitcher
    }
}

impl RosterLoader for GeneratedRosters {
    type Error = RosterError;

    fn load_team(&self, team: &str) -> Result<TeamRoster, Self::Error> {
        if !CLUBS.contains(&team) {
            return Err(RosterError::UnknownClub(team.to_string()));
        }
        let mut rng = self.club_rng(team);

        let mut lineup: Vec<Player> = FIELDERS
            .iter()
            .map(|position| self.batter(&mut rng, format!("{team}-{position:?}"), *position, 50))
            .collect();
        let mut hitting_pitcher = Player::new(
            format!("{team}-PitcherBatting"),
            Position::Pitcher,
            BattingRatings {
                ch: rating(&mut rng, 25, 0, 8),
                ph: rating(&mut rng, 20, 0, 8),
                sp: rating(&mut rng, 30, 0, 10),
                exp: rating(&mut rng, 25, 0, 8),
                ..BattingRatings::default()
            },
        );
        hitting_pitcher.name = format!("{team} pitcher");
        lineup.push(hitting_pitcher);

        let bench = BENCH
            .iter()
            .enumerate()
            .map(|(idx, position)| {
                self.batter(&mut rng, format!("{team}-Bench{idx}"), *position, 45)
            })
            .collect();

        let mut pitchers = vec![self.pitcher(&mut rng, format!("{team}-SP"), (85, 100))];
        pitchers.extend(
            (1..=RELIEVERS).map(|idx| self.pitcher(&mut rng, format!("{team}-RP{idx}"), (25, 50))),
        );

        Ok(TeamRoster {
            name: team.to_string(),
            lineup,
            bench,
            pitchers,
        })
    }
}

/// Home and away clubs for game `game_index` of a run; every club meets
/// every other club before any pairing repeats.
pub fn pairing(game_index: u64) -> (&'static str, &'static str) {
    let clubs = CLUBS.len() as u64;
    let home = game_index % clubs;
    let offset = 1 + (game_index / clubs) % (clubs - 1);
    let away = (home + offset) % clubs;
    (club_at(home), club_at(away))
}

fn club_at(index: u64) -> &'static str {
    usize::try_from(index)
        .ok()
        .and_then(|idx| CLUBS.get(idx))
        .copied()
        .unwrap_or(CLUBS[0])
}

/// A secondary pitch with probability `share`, otherwise none.
fn offspeed<R: Rng>(rng: &mut R, bias: i8, share: f64) -> u8 {
    if rng.r#gen::<f64>() < share {
        rating(rng, 50, bias, 12)
    } else {
        0
    }
}

fn rating<R: Rng>(rng: &mut R, base: i16, bias: i8, spread: i16) -> u8 {
    let value = base + i16::from(bias) + rng.gen_range(-spread..=spread);
    u8::try_from(value.clamp(MIN_RATING, MAX_RATING)).unwrap_or(50)
}
