//! Play-balance configuration snapshot.
//!
//! A [`ConfigTable`] is the merged key→number table every component reads its
//! coefficients from. The base defaults are compiled in from
//! `assets/playbalance.json`; callers overlay overrides at construction time and
//! receive an immutable snapshot. Lookups never mutate the table, and a "reset"
//! is simply a freshly constructed snapshot.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

const DEFAULTS_JSON: &str = include_str!("../assets/playbalance.json");

/// Keys whose values are used as dice faces and therefore must be at least one.
const DICE_FACE_KEYS: [&str; 5] = [
    "pitchRatVariationFaces",
    "hitAngleFacesPower",
    "hitAngleFacesNormal",
    "hitAngleFacesContact",
    "hitAngleFacesBunt",
];

/// Keys that describe counts or caps and cannot be negative.
const NON_NEGATIVE_KEYS: [&str; 6] = [
    "pitchRatVariationCount",
    "maxHalfInningPA",
    "maxHalfInningRuns",
    "maxInnings",
    "automaticCatchDist",
    "pitchMissScale",
];

/// Errors raised when building a configuration snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("override for {key} is not a finite number")]
    NonFinite { key: String },
    #[error("{key} must be at least {min:.2} (got {value:.2})")]
    MinViolation { key: String, min: f64, value: f64 },
    #[error("override table parse error: {0}")]
    Parse(String),
}

/// Immutable merged configuration: base defaults overlaid with overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigTable {
    values: BTreeMap<String, f64>,
    #[serde(skip)]
    overridden: BTreeSet<String>,
}

impl Default for ConfigTable {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ConfigTable {
    /// Snapshot holding only the compiled-in defaults.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            values: base_defaults(),
            overridden: BTreeSet::new(),
        }
    }

    /// Overlay `overrides` on the defaults and resolve the merged table once.
    ///
    /// # Errors
    ///
    /// Returns an error if any override is not finite, or if a structural key
    /// (dice faces, counts, caps) ends up outside its valid range.
    pub fn with_overrides<I, K>(overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut table = Self::defaults();
        for (key, value) in overrides {
            let key = key.into();
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { key });
            }
            table.values.insert(key.clone(), value);
            table.overridden.insert(key);
        }
        table.validate()?;
        Ok(table)
    }

    /// Parse a flat JSON object of numeric overrides and overlay it on the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or non-numeric values,
    /// and any error [`ConfigTable::with_overrides`] reports.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let overrides: BTreeMap<String, f64> =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::with_overrides(overrides)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for key in DICE_FACE_KEYS {
            let value = self.get(key);
            if value < 1.0 {
                return Err(ConfigError::MinViolation {
                    key: key.to_string(),
                    min: 1.0,
                    value,
                });
            }
        }
        for key in NON_NEGATIVE_KEYS {
            let value = self.get(key);
            if value < 0.0 {
                return Err(ConfigError::MinViolation {
                    key: key.to_string(),
                    min: 0.0,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Value for `key`; missing keys resolve to 0.
    #[must_use]
    pub fn get(&self, key: &str) -> f64 {
        self.get_or(key, 0.0)
    }

    /// Value for `key`, or `default` when the key is absent from the merged table.
    #[must_use]
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    /// Value for `key` only if present.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Treat a numeric key as a switch (non-zero is on).
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).abs() > f64::EPSILON
    }

    /// Lookup for count-keyed entries such as `disciplineRating{bs}CountAdjust`.
    #[must_use]
    pub fn count_value(&self, prefix: &str, balls: u8, strikes: u8, suffix: &str) -> f64 {
        self.get(&count_key(prefix, balls, strikes, suffix))
    }

    /// Count-keyed lookup that reports absence instead of defaulting.
    #[must_use]
    pub fn count_lookup(&self, prefix: &str, balls: u8, strikes: u8, suffix: &str) -> Option<f64> {
        self.lookup(&count_key(prefix, balls, strikes, suffix))
    }

    /// Keys the caller overrode when building this snapshot.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.overridden
            .iter()
            .filter_map(|key| self.values.get(key).map(|value| (key.as_str(), *value)))
    }

    /// Number of resolved keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the merged table is empty (only possible if the embedded defaults failed to load).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stable digest of the merged table, used to label calibration runs.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for (key, value) in &self.values {
            hasher.write(key.as_bytes());
            hasher.write(&value.to_bits().to_le_bytes());
        }
        hasher.finish()
    }
}

/// Compose a count-keyed config name, e.g. `count_key("pitchObj", 3, 2, "CountPlusWeight")`.
#[must_use]
pub fn count_key(prefix: &str, balls: u8, strikes: u8, suffix: &str) -> String {
    format!("{prefix}{balls}{strikes}{suffix}")
}

fn base_defaults() -> BTreeMap<String, f64> {
    serde_json::from_str(DEFAULTS_JSON).unwrap_or_default()
}
