//! Fixed physical and structural constants for the engine.
//!
//! Tunable coefficients live in the play-balance table (`assets/playbalance.json`);
//! the values here are the ones that define the shape of the model rather than
//! its calibration.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "PBSIM_DEBUG";
pub(crate) const LOG_HALF_PA_CAP: &str = "half-inning stopped after plate appearances cap";
pub(crate) const LOG_HALF_RUN_CAP: &str = "half-inning stopped after runs cap";
pub(crate) const LOG_PITCHING_CHANGE: &str = "pitching change";
pub(crate) const LOG_PINCH_HIT: &str = "pinch hitter";
pub(crate) const LOG_PINCH_RUN: &str = "pinch runner";

// Field geometry (feet) ----------------------------------------------------
pub(crate) const BASE_PATH_FT: f64 = 90.0;
pub(crate) const PITCHING_RUBBER_FT: f64 = 60.5;
pub(crate) const DEFAULT_LEFT_FIELD_FT: f64 = 330.0;
pub(crate) const DEFAULT_CENTER_FIELD_FT: f64 = 400.0;
pub(crate) const DEFAULT_RIGHT_FIELD_FT: f64 = 330.0;
pub(crate) const DEFAULT_DOUBLE_FRACTION: f64 = 0.62;
pub(crate) const DEFAULT_TRIPLE_FRACTION: f64 = 0.92;

// Ballistics ---------------------------------------------------------------
pub(crate) const GRAVITY_FT_S2: f64 = 32.174;
pub(crate) const CONTACT_HEIGHT_FT: f64 = 3.0;
pub(crate) const MPH_TO_FT_PER_SEC: f64 = 5280.0 / 3600.0;
pub(crate) const HOT_TEMPERATURE_F: f64 = 85.0;
pub(crate) const COLD_TEMPERATURE_F: f64 = 50.0;
pub(crate) const NEUTRAL_TEMPERATURE_F: f64 = 70.0;
pub(crate) const FAIR_ANGLE_MIN_DEG: f64 = 1.0;
pub(crate) const FAIR_ANGLE_MAX_DEG: f64 = 89.0;
pub(crate) const GROUND_SCAN_STEP_FT: f64 = 5.0;
pub(crate) const WET_ROLL_FACTOR: f64 = 0.8;
pub(crate) const ALTITUDE_CARRY_PER_1000_FT: f64 = 0.02;
pub(crate) const WIND_CARRY_PER_MPH: f64 = 0.01;

// Swing model --------------------------------------------------------------
pub(crate) const RATING_MIDPOINT: f64 = 50.0;
pub(crate) const LOCATION_HIGH_DY: f64 = 2.0;
pub(crate) const LOCATION_LOW_DY: f64 = -2.0;
pub(crate) const LOCATION_OUTSIDE_DX: f64 = 3.0;

// Sub-stream splitter ------------------------------------------------------
pub(crate) const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
pub(crate) const SPLITMIX_MUL_A: u64 = 0xBF58_476D_1CE4_E5B9;
pub(crate) const SPLITMIX_MUL_B: u64 = 0x94D0_49BB_1331_11EB;
pub(crate) const UNIT_SCALE_53: f64 = 1.0 / 9_007_199_254_740_992.0;

// Game structure -----------------------------------------------------------
pub(crate) const OUTS_PER_HALF: u8 = 3;
pub(crate) const BALLS_FOR_WALK: u8 = 4;
pub(crate) const STRIKES_FOR_OUT: u8 = 3;
pub(crate) const DEFAULT_INNINGS: u8 = 9;
pub(crate) const TOAST_INNING_KEYS: u8 = 9;
