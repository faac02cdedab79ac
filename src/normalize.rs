//! Pure numeric conversion from raw hardware samples to normalized analog
//! values.
//!
//! All functions clamp the raw sample to the device range first, so
//! out-of-range samples never produce out-of-range output. Deadzone is
//! applied after normalization and forces small values to exactly 0.0; it
//! does not rescale the remaining range.

use thiserror::Error;

/// Lowest raw value a signed 16-bit axis reports.
pub const AXIS_RAW_MIN: i32 = -32768;
/// Highest raw value a signed 16-bit axis reports.
pub const AXIS_RAW_MAX: i32 = 32767;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid axis range: min {min} must be less than max {max}")]
    InvalidRange { min: i32, max: i32 },
}

/// Maps `raw` linearly from `[min, max]` to `[-1.0, 1.0]`, clamping first.
pub fn normalize_symmetric(raw: i32, min: i32, max: i32) -> Result<f32, NormalizeError> {
    if min >= max {
        return Err(NormalizeError::InvalidRange { min, max });
    }
    let clamped = raw.clamp(min, max);
    let unit = (clamped as i64 - min as i64) as f32 / (max as i64 - min as i64) as f32;
    Ok(unit * 2.0 - 1.0)
}

/// Bipolar normalization over the fixed signed 16-bit device range.
pub fn normalize_stick(raw: i32) -> f32 {
    let clamped = raw.clamp(AXIS_RAW_MIN, AXIS_RAW_MAX);
    (clamped - AXIS_RAW_MIN) as f32 / (AXIS_RAW_MAX - AXIS_RAW_MIN) as f32 * 2.0 - 1.0
}

/// Maps the device's raw signed range to `[0.0, 1.0]` without bipolar
/// recentering; rest position reports 0.0, fully pressed reports 1.0.
pub fn normalize_trigger(raw: i32) -> f32 {
    let clamped = raw.clamp(AXIS_RAW_MIN, AXIS_RAW_MAX);
    ((clamped - AXIS_RAW_MIN) as f32 / (AXIS_RAW_MAX - AXIS_RAW_MIN) as f32).clamp(0.0, 1.0)
}

/// Two-sided deadzone for stick axes: values inside the zone collapse to 0.0.
pub fn apply_stick_deadzone(value: f32, deadzone: f32) -> f32 {
    let deadzone = deadzone.clamp(0.0, 1.0);
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}

/// One-sided deadzone for trigger axes.
pub fn apply_trigger_deadzone(value: f32, deadzone: f32) -> f32 {
    let deadzone = deadzone.clamp(0.0, 1.0);
    if value < deadzone {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_endpoints() {
        assert_eq!(
            normalize_symmetric(AXIS_RAW_MIN, AXIS_RAW_MIN, AXIS_RAW_MAX).unwrap(),
            -1.0
        );
        assert_eq!(
            normalize_symmetric(AXIS_RAW_MAX, AXIS_RAW_MIN, AXIS_RAW_MAX).unwrap(),
            1.0
        );
    }

    #[test]
    fn symmetric_center_is_near_zero() {
        let center = normalize_symmetric(0, AXIS_RAW_MIN, AXIS_RAW_MAX).unwrap();
        assert!(center.abs() < 0.001, "center was {center}");
        let mid = normalize_symmetric(16383, 0, AXIS_RAW_MAX).unwrap();
        assert!(mid.abs() < 0.001, "midpoint was {mid}");
    }

    #[test]
    fn symmetric_clamps_out_of_range_samples() {
        assert_eq!(normalize_symmetric(99999, AXIS_RAW_MIN, AXIS_RAW_MAX).unwrap(), 1.0);
        assert_eq!(
            normalize_symmetric(-99999, AXIS_RAW_MIN, AXIS_RAW_MAX).unwrap(),
            -1.0
        );
    }

    #[test]
    fn symmetric_rejects_inverted_range() {
        assert_eq!(
            normalize_symmetric(0, 100, 100),
            Err(NormalizeError::InvalidRange { min: 100, max: 100 })
        );
        assert!(normalize_symmetric(0, 200, 100).is_err());
    }

    #[test]
    fn trigger_endpoints() {
        assert_eq!(normalize_trigger(AXIS_RAW_MIN), 0.0);
        assert_eq!(normalize_trigger(AXIS_RAW_MAX), 1.0);
        let rest = normalize_trigger(0);
        assert!((rest - 0.5).abs() < 0.001);
    }

    #[test]
    fn stick_deadzone_forces_exact_zero() {
        assert_eq!(apply_stick_deadzone(0.09, 0.1), 0.0);
        assert_eq!(apply_stick_deadzone(-0.09, 0.1), 0.0);
        assert_eq!(apply_stick_deadzone(0.1, 0.1), 0.1);
        assert_eq!(apply_stick_deadzone(-0.5, 0.1), -0.5);
    }

    #[test]
    fn trigger_deadzone_is_one_sided() {
        assert_eq!(apply_trigger_deadzone(0.19, 0.2), 0.0);
        assert_eq!(apply_trigger_deadzone(0.2, 0.2), 0.2);
        assert_eq!(apply_trigger_deadzone(1.0, 0.2), 1.0);
    }

    #[test]
    fn deadzone_parameter_is_clamped() {
        // Out-of-range deadzones clamp rather than reject.
        assert_eq!(apply_stick_deadzone(0.5, 7.0), 0.0);
        assert_eq!(apply_stick_deadzone(0.5, -1.0), 0.5);
    }
}
