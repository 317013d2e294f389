//! Ball/strike count state machine.

use crate::constants::{BALLS_FOR_WALK, STRIKES_FOR_OUT};
use serde::{Deserialize, Serialize};

/// What a single pitch did to the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountEvent {
    Ball,
    CalledStrike,
    SwingingStrike,
    Foul,
}

/// Where the plate appearance stands after a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountState {
    InProgress,
    Walk,
    StrikeoutLooking,
    StrikeoutSwinging,
}

impl CountState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Balls and strikes for one plate appearance.
///
/// A terminal event (fourth ball, third strike) is reported by [`Count::apply`]
/// and never stored: the visible count always stays within 0–3 balls and
/// 0–2 strikes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Count {
    balls: u8,
    strikes: u8,
}

impl Count {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            balls: 0,
            strikes: 0,
        }
    }

    #[must_use]
    pub const fn balls(self) -> u8 {
        self.balls
    }

    #[must_use]
    pub const fn strikes(self) -> u8 {
        self.strikes
    }

    /// Two-character `"{balls}{strikes}"` key used by count-specific tables.
    #[must_use]
    pub fn key(self) -> String {
        format!("{}{}", self.balls, self.strikes)
    }

    /// Apply one pitch. A foul with two strikes leaves the count unchanged.
    pub fn apply(&mut self, event: CountEvent) -> CountState {
        match event {
            CountEvent::Ball => {
                if self.balls + 1 >= BALLS_FOR_WALK {
                    return CountState::Walk;
                }
                self.balls += 1;
            }
            CountEvent::CalledStrike => {
                if self.strikes + 1 >= STRIKES_FOR_OUT {
                    return CountState::StrikeoutLooking;
                }
                self.strikes += 1;
            }
            CountEvent::SwingingStrike => {
                if self.strikes + 1 >= STRIKES_FOR_OUT {
                    return CountState::StrikeoutSwinging;
                }
                self.strikes += 1;
            }
            CountEvent::Foul => {
                if self.strikes + 1 < STRIKES_FOR_OUT {
                    self.strikes += 1;
                }
            }
        }
        CountState::InProgress
    }
}
