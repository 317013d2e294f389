//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Round a non-negative f64 into a `u32`, treating negatives and NaN as zero.
///
/// Used for config values that describe counts (dice, pitches, plate appearances).
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return if value == f64::INFINITY { u32::MAX } else { 0 };
    }
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(value.min(max).round()).unwrap_or(0)
}

/// Floor a f64 into a `usize` index, clamping negatives and NaN to zero.
#[must_use]
pub fn floor_f64_to_usize(value: f64) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    cast::<f64, usize>(value.floor()).unwrap_or(usize::MAX)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert i64 to f64; dice totals and run differentials stay far below 2^53.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Clamp a probability into `[0, 1]`; NaN becomes 0.
#[must_use]
pub const fn clamp01(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Clamp a percentage-scale value into `[0, 100]`; NaN becomes 0.
#[must_use]
pub const fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Ratio of two counters, 0 when the denominator is empty.
#[must_use]
pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
        assert_eq!(round_f64_to_u32(-3.0), 0);
        assert_eq!(round_f64_to_u32(4.4), 4);
        assert_eq!(round_f64_to_u32(f64::NAN), 0);
    }

    #[test]
    fn floor_index_clamps_negatives() {
        assert_eq!(floor_f64_to_usize(3.99), 3);
        assert_eq!(floor_f64_to_usize(-0.5), 0);
        assert_eq!(floor_f64_to_usize(f64::NAN), 0);
    }

    #[test]
    fn probability_clamps_handle_nan() {
        assert!((clamp01(1.7) - 1.0).abs() < f64::EPSILON);
        assert!(clamp01(f64::NAN).abs() < f64::EPSILON);
        assert!((clamp_pct(-12.0)).abs() < f64::EPSILON);
        assert!((clamp_pct(140.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_guards_empty_denominator() {
        assert!(ratio(3, 0).abs() < f64::EPSILON);
        assert!((ratio(1, 4) - 0.25).abs() < f64::EPSILON);
    }
}
