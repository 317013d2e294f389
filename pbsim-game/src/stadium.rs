//! Field geometry, ballpark dimensions and playing conditions.
//!
//! Coordinates are in feet with home plate at the origin, the first-base line
//! along +x and the third-base line along +y. Spray angles are measured from
//! the first-base line, so 0° is the right-field line, 45° straightaway center
//! and 90° the left-field line.

use crate::constants::{
    BASE_PATH_FT, DEFAULT_CENTER_FIELD_FT, DEFAULT_DOUBLE_FRACTION, DEFAULT_LEFT_FIELD_FT,
    DEFAULT_RIGHT_FIELD_FT, DEFAULT_TRIPLE_FRACTION, NEUTRAL_TEMPERATURE_F, PITCHING_RUBBER_FT,
};
use crate::config::ConfigTable;
use crate::player::Position;
use crate::state::Base;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f64,
    pub y: f64,
}

impl FieldPoint {
    pub const HOME: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `distance` feet along a spray angle in degrees.
    #[must_use]
    pub fn from_polar(distance: f64, angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        Self {
            x: distance * rad.cos(),
            y: distance * rad.sin(),
        }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn distance_from_home(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Spray angle of this point in degrees.
    #[must_use]
    pub fn angle_deg(self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Move toward `target` by at most `feet`.
    #[must_use]
    pub fn toward(self, target: Self, feet: f64) -> Self {
        let dist = self.distance_to(target);
        if dist <= f64::EPSILON {
            return self;
        }
        let step = (feet / dist).clamp(-1.0, 1.0);
        Self {
            x: self.x + (target.x - self.x) * step,
            y: self.y + (target.y - self.y) * step,
        }
    }
}

/// Location of a base bag.
#[must_use]
pub const fn base_point(base: Base) -> FieldPoint {
    match base {
        Base::First => FieldPoint::new(BASE_PATH_FT, 0.0),
        Base::Second => FieldPoint::new(BASE_PATH_FT, BASE_PATH_FT),
        Base::Third => FieldPoint::new(0.0, BASE_PATH_FT),
    }
}

/// The pitching rubber.
#[must_use]
pub fn mound_point() -> FieldPoint {
    FieldPoint::from_polar(PITCHING_RUBBER_FT, 45.0)
}

/// Default fielder depth (feet) and spray angle (degrees) per position.
const DEFAULT_DEPTHS: [(Position, f64, f64); 8] = [
    (Position::Catcher, 3.5, 225.0),
    (Position::FirstBase, 110.0, 10.0),
    (Position::SecondBase, 145.0, 33.0),
    (Position::ThirdBase, 110.0, 80.0),
    (Position::ShortStop, 145.0, 57.0),
    (Position::LeftField, 290.0, 72.0),
    (Position::CenterField, 315.0, 45.0),
    (Position::RightField, 290.0, 18.0),
];

/// Defensive positioning shifts applied before a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Alignment {
    #[default]
    Normal,
    /// Middle infielders cheat toward second with a force at second in order.
    DoublePlayDepth,
    /// Infield drawn in to cut off a run at the plate.
    InfieldIn,
    /// Outfielders back against a power hitter.
    DeepOutfield,
}

/// Where a position stands under `alignment`.
#[must_use]
pub fn fielder_point(position: Position, alignment: Alignment, cfg: &ConfigTable) -> FieldPoint {
    if position == Position::Pitcher {
        return mound_point();
    }
    let Some((_, depth, angle)) = DEFAULT_DEPTHS.iter().find(|(pos, _, _)| *pos == position)
    else {
        return FieldPoint::HOME;
    };
    let base = FieldPoint::from_polar(*depth, *angle);
    match alignment {
        Alignment::Normal => base,
        Alignment::InfieldIn if position.is_infield() => {
            FieldPoint::from_polar((depth - cfg.get("alignInfieldInDepth")).max(60.0), *angle)
        }
        Alignment::DoublePlayDepth
            if matches!(position, Position::SecondBase | Position::ShortStop) =>
        {
            base.toward(base_point(Base::Second), cfg.get("alignDoublePlayShift"))
        }
        Alignment::DeepOutfield if position.is_outfield() => {
            FieldPoint::from_polar(depth + cfg.get("alignDeepOutfieldDepth"), *angle)
        }
        _ => base,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Surface {
    #[default]
    Grass,
    Turf,
    Dirt,
}

impl Surface {
    #[must_use]
    pub const fn config_suffix(self) -> &'static str {
        match self {
            Self::Grass => "Grass",
            Self::Turf => "Turf",
            Self::Dirt => "Dirt",
        }
    }
}

/// Ballpark dimensions and playing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stadium {
    pub left: f64,
    pub center: f64,
    pub right: f64,
    /// Fraction of the wall distance a ball must travel for a double.
    pub double_fraction: f64,
    /// Fraction of the wall distance a ball must travel for a triple.
    pub triple_fraction: f64,
    pub surface: Surface,
}

impl Default for Stadium {
    fn default() -> Self {
        Self {
            left: DEFAULT_LEFT_FIELD_FT,
            center: DEFAULT_CENTER_FIELD_FT,
            right: DEFAULT_RIGHT_FIELD_FT,
            double_fraction: DEFAULT_DOUBLE_FRACTION,
            triple_fraction: DEFAULT_TRIPLE_FRACTION,
            surface: Surface::Grass,
        }
    }
}

impl Stadium {
    /// Wall distance along a spray angle, interpolated between the foul poles and center.
    #[must_use]
    pub fn wall_distance(&self, angle_deg: f64) -> f64 {
        let angle = angle_deg.clamp(0.0, 90.0);
        if angle <= 45.0 {
            let t = angle / 45.0;
            self.right + (self.center - self.right) * t
        } else {
            let t = (angle - 45.0) / 45.0;
            self.center + (self.left - self.center) * t
        }
    }

    /// Bases earned by a ball that was not fielded in the air.
    ///
    /// `carry` is the in-air distance, `total` the distance after bounce and roll.
    #[must_use]
    pub fn bases_for(&self, angle_deg: f64, carry: f64, total: f64) -> u8 {
        let wall = self.wall_distance(angle_deg);
        if carry >= wall {
            4
        } else if total >= wall * self.triple_fraction {
            3
        } else if total >= wall * self.double_fraction {
            2
        } else {
            1
        }
    }
}

/// Weather for one game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub temperature_f: f64,
    pub wet: bool,
    pub altitude_ft: f64,
    /// Positive values blow out toward center field.
    pub wind_mph: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature_f: NEUTRAL_TEMPERATURE_F,
            wet: false,
            altitude_ft: 0.0,
            wind_mph: 0.0,
        }
    }
}
