//! Player identity and rating records supplied by the roster collaborator.
//!
//! The engine only reads these; per-game accumulators live in [`crate::state`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a player within a game.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Hand {
    #[default]
    Right,
    Left,
}

/// Defensive positions, plus the designated hitter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "P")]
    Pitcher,
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    ShortStop,
    #[serde(rename = "LF")]
    LeftField,
    #[serde(rename = "CF")]
    CenterField,
    #[serde(rename = "RF")]
    RightField,
    #[serde(rename = "DH")]
    DesignatedHitter,
}

/// The nine positions that take the field, in scorekeeping order.
pub const FIELDING_POSITIONS: [Position; 9] = [
    Position::Pitcher,
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
];

impl Position {
    /// Suffix used by per-position config keys (`delayBase{suffix}`, `catch{suffix}Adjust`).
    #[must_use]
    pub const fn config_suffix(self) -> &'static str {
        match self {
            Self::Pitcher => "Pitcher",
            Self::Catcher => "Catcher",
            Self::FirstBase => "FirstBase",
            Self::SecondBase => "SecondBase",
            Self::ThirdBase => "ThirdBase",
            Self::ShortStop => "ShortStop",
            Self::LeftField => "LeftField",
            Self::CenterField => "CenterField",
            Self::RightField => "RightField",
            Self::DesignatedHitter => "DesignatedHitter",
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pitcher => "P",
            Self::Catcher => "C",
            Self::FirstBase => "1B",
            Self::SecondBase => "2B",
            Self::ThirdBase => "3B",
            Self::ShortStop => "SS",
            Self::LeftField => "LF",
            Self::CenterField => "CF",
            Self::RightField => "RF",
            Self::DesignatedHitter => "DH",
        }
    }

    #[must_use]
    pub const fn is_outfield(self) -> bool {
        matches!(self, Self::LeftField | Self::CenterField | Self::RightField)
    }

    #[must_use]
    pub const fn is_infield(self) -> bool {
        matches!(
            self,
            Self::FirstBase | Self::SecondBase | Self::ThirdBase | Self::ShortStop
        )
    }
}

/// Pitch repertoire entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchType {
    Fastball,
    Slider,
    Changeup,
    Curveball,
    Sinker,
    Screwball,
    Knuckleball,
}

/// Selection tie-break order.
pub const PITCH_ORDER: [PitchType; 7] = [
    PitchType::Fastball,
    PitchType::Slider,
    PitchType::Changeup,
    PitchType::Curveball,
    PitchType::Sinker,
    PitchType::Screwball,
    PitchType::Knuckleball,
];

impl PitchType {
    /// Short code used in ratings and reports.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Fastball => "fb",
            Self::Slider => "sl",
            Self::Changeup => "cu",
            Self::Curveball => "cb",
            Self::Sinker => "si",
            Self::Screwball => "scb",
            Self::Knuckleball => "kn",
        }
    }

    /// Prefix used by per-pitch config keys; screwball and knuckleball use legacy names.
    #[must_use]
    pub const fn config_prefix(self) -> &'static str {
        match self {
            Self::Screwball => "sb",
            Self::Knuckleball => "kb",
            other => other.code(),
        }
    }
}

/// Hitting, running and fielding ratings, each on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattingRatings {
    /// Contact.
    pub ch: u8,
    /// Power.
    pub ph: u8,
    /// Speed.
    pub sp: u8,
    /// Loft tendency; higher values produce more fly balls.
    pub gf: u8,
    /// Pull tendency.
    pub pl: u8,
    /// Plate experience / eye.
    pub exp: u8,
    /// Fielding ability.
    pub fa: u8,
    /// Throwing arm.
    pub arm: u8,
}

impl Default for BattingRatings {
    fn default() -> Self {
        Self {
            ch: 50,
            ph: 50,
            sp: 50,
            gf: 50,
            pl: 50,
            exp: 50,
            fa: 50,
            arm: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub bats: Hand,
    #[serde(default)]
    pub throws: Hand,
    pub primary_position: Position,
    #[serde(default)]
    pub ratings: BattingRatings,
}

impl Player {
    #[must_use]
    pub fn new(id: impl Into<String>, position: Position, ratings: BattingRatings) -> Self {
        let id = PlayerId::new(id);
        Self {
            name: id.0.clone(),
            id,
            bats: Hand::Right,
            throws: Hand::Right,
            primary_position: position,
            ratings,
        }
    }
}

/// Pitching ratings on a 0–100 scale; endurance is the pitch budget for a start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PitchingRatings {
    pub endurance: u8,
    pub control: u8,
    pub movement: u8,
    pub hold_runner: u8,
    pub arm: u8,
    #[serde(default)]
    pub fb: u8,
    #[serde(default)]
    pub sl: u8,
    #[serde(default)]
    pub cu: u8,
    #[serde(default)]
    pub cb: u8,
    #[serde(default)]
    pub si: u8,
    #[serde(default)]
    pub scb: u8,
    #[serde(default)]
    pub kn: u8,
}

impl PitchingRatings {
    /// Base rating of one pitch type.
    #[must_use]
    pub const fn pitch(&self, pitch: PitchType) -> u8 {
        match pitch {
            PitchType::Fastball => self.fb,
            PitchType::Slider => self.sl,
            PitchType::Changeup => self.cu,
            PitchType::Curveball => self.cb,
            PitchType::Sinker => self.si,
            PitchType::Screwball => self.scb,
            PitchType::Knuckleball => self.kn,
        }
    }

    /// Pitch types with a positive rating, in priority order.
    pub fn repertoire(&self) -> impl Iterator<Item = PitchType> + '_ {
        PITCH_ORDER.into_iter().filter(|pitch| self.pitch(*pitch) > 0)
    }

    /// Highest-rated pitch; ties resolve to the earlier type in [`PITCH_ORDER`].
    #[must_use]
    pub fn primary_pitch(&self) -> Option<PitchType> {
        self.repertoire()
            .fold(None, |best: Option<PitchType>, pitch| match best {
                Some(current) if self.pitch(current) >= self.pitch(pitch) => Some(current),
                _ => Some(pitch),
            })
    }

    /// Highest-rated pitch other than the fastball, the pitcher's out pitch.
    #[must_use]
    pub fn best_offspeed(&self) -> Option<PitchType> {
        self.repertoire()
            .filter(|pitch| *pitch != PitchType::Fastball)
            .fold(None, |best: Option<PitchType>, pitch| match best {
                Some(current) if self.pitch(current) >= self.pitch(pitch) => Some(current),
                _ => Some(pitch),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitcher {
    pub player: Player,
    pub ratings: PitchingRatings,
}

impl Pitcher {
    #[must_use]
    pub fn new(id: impl Into<String>, ratings: PitchingRatings) -> Self {
        Self {
            player: Player::new(id, Position::Pitcher, BattingRatings::default()),
            ratings,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &PlayerId {
        &self.player.id
    }
}
