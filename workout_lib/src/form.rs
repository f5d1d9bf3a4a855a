use chrono::{DateTime, Local};
use thiserror::Error;

use crate::workout::{Coords, Workout, WorkoutType};

/// Raw form field values, as typed by the user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormInput {
    pub workout_type: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown workout type: {0}")]
    UnknownType(String),

    #[error("{field} is not a number")]
    NotFinite { field: &'static str },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{metric} is out of range")]
    MetricOutOfRange { metric: &'static str },
}

/// Validated form values, ready to be placed at a location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutInput {
    Running { distance: f64, duration: f64, cadence: f64 },
    Cycling { distance: f64, duration: f64, elevation_gain: f64 },
}

impl WorkoutInput {
    pub fn build(self, coords: Coords, created: DateTime<Local>) -> Workout {
        match self {
            WorkoutInput::Running { distance, duration, cadence } => {
                Workout::running(coords, distance, duration, cadence, created)
            }
            WorkoutInput::Cycling { distance, duration, elevation_gain } => {
                Workout::cycling(coords, distance, duration, elevation_gain, created)
            }
        }
    }
}

/// Number coercion matching how browsers convert form text: surrounding
/// whitespace is ignored, a blank field is zero, `0x`/`0o`/`0b` literals are
/// read in their radix and anything unparsable is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.;
    }

    // radix literals take no sign
    let radix = match trimmed.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&trimmed[2..], radix);
    }

    // Rust accepts "inf" and "nan" spellings, the browser does not
    let unsigned = trimmed.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(trimmed);
    let lowered = unsigned.to_ascii_lowercase();
    if lowered.starts_with("inf") || lowered.starts_with("nan") {
        return match unsigned {
            "Infinity" if trimmed.starts_with('-') => f64::NEG_INFINITY,
            "Infinity" => f64::INFINITY,
            _ => f64::NAN,
        };
    }

    trimmed.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }

    digits
        .chars()
        .try_fold(0f64, |acc, c| c.to_digit(radix).map(|d| acc * radix as f64 + d as f64))
        .unwrap_or(f64::NAN)
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if finite(field, value)? > 0. {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if finite(field, value)? >= 0. {
        Ok(value)
    } else {
        Err(ValidationError::Negative { field })
    }
}

// Tiny positive inputs can still overflow the derived metric, which would not
// survive a save and reload
fn metric_in_range(metric: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::MetricOutOfRange { metric })
    }
}

impl FormInput {
    pub fn new(workout_type: WorkoutType) -> Self {
        Self {
            workout_type: workout_type.to_string(),
            ..Default::default()
        }
    }

    /// The form after a workout was accepted: numbers emptied, type kept.
    pub fn cleared(&self) -> Self {
        Self {
            workout_type: self.workout_type.clone(),
            ..Default::default()
        }
    }

    pub fn parse(&self) -> Result<WorkoutInput, ValidationError> {
        let workout_type: WorkoutType = self.workout_type.parse().map_err(ValidationError::UnknownType)?;

        let distance = coerce_number(&self.distance);
        let duration = coerce_number(&self.duration);

        match workout_type {
            WorkoutType::Running => {
                let cadence = coerce_number(&self.cadence);
                finite("distance", distance)?;
                finite("duration", duration)?;
                finite("cadence", cadence)?;

                let input = WorkoutInput::Running {
                    distance: positive("distance", distance)?,
                    duration: positive("duration", duration)?,
                    cadence: positive("cadence", cadence)?,
                };
                metric_in_range("pace", duration / distance)?;
                Ok(input)
            }
            WorkoutType::Cycling => {
                let elevation_gain = coerce_number(&self.elevation);
                finite("distance", distance)?;
                finite("duration", duration)?;
                finite("elevation gain", elevation_gain)?;

                let input = WorkoutInput::Cycling {
                    distance: positive("distance", distance)?,
                    duration: positive("duration", duration)?,
                    elevation_gain: non_negative("elevation gain", elevation_gain)?,
                };
                metric_in_range("speed", distance / (duration / 60.))?;
                Ok(input)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(distance: &str, duration: &str, cadence: &str) -> FormInput {
        FormInput {
            workout_type: "running".into(),
            distance: distance.into(),
            duration: duration.into(),
            cadence: cadence.into(),
            elevation: String::new(),
        }
    }

    fn cycling(distance: &str, duration: &str, elevation: &str) -> FormInput {
        FormInput {
            workout_type: "cycling".into(),
            distance: distance.into(),
            duration: duration.into(),
            cadence: String::new(),
            elevation: elevation.into(),
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("5"), 5.);
        assert_eq!(coerce_number(" 2.5 "), 2.5);
        assert_eq!(coerce_number(""), 0.);
        assert_eq!(coerce_number("   "), 0.);
        assert_eq!(coerce_number("-5"), -5.);
        assert_eq!(coerce_number("1e3"), 1000.);
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
        assert!(coerce_number("abc").is_nan());
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("NaN").is_nan());
        assert!(coerce_number("5km").is_nan());
    }

    #[test]
    fn test_coerce_radix_literals() {
        assert_eq!(coerce_number("0x10"), 16.);
        assert_eq!(coerce_number("0XfF"), 255.);
        assert_eq!(coerce_number("0b1"), 1.);
        assert_eq!(coerce_number("0o7"), 7.);
        assert_eq!(coerce_number(" 0x1a "), 26.);
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0b2").is_nan());
        assert!(coerce_number("-0x10").is_nan());
        assert!(coerce_number("0x1.5").is_nan());
    }

    #[test]
    fn test_valid_running() {
        let input = running("5", "25", "178").parse().unwrap();
        assert_eq!(input, WorkoutInput::Running { distance: 5., duration: 25., cadence: 178. });
    }

    #[test]
    fn test_valid_cycling() {
        let input = cycling("20", "60", "300").parse().unwrap();
        assert_eq!(input, WorkoutInput::Cycling { distance: 20., duration: 60., elevation_gain: 300. });
    }

    #[test]
    fn test_non_positive_rejected() {
        assert_eq!(running("0", "25", "178").parse(), Err(ValidationError::NotPositive { field: "distance" }));
        assert_eq!(running("5", "-5", "178").parse(), Err(ValidationError::NotPositive { field: "duration" }));
        assert_eq!(running("5", "25", "0").parse(), Err(ValidationError::NotPositive { field: "cadence" }));
        assert_eq!(cycling("0", "60", "300").parse(), Err(ValidationError::NotPositive { field: "distance" }));
        assert_eq!(cycling("20", "-5", "300").parse(), Err(ValidationError::NotPositive { field: "duration" }));
    }

    #[test]
    fn test_blank_field_is_zero() {
        assert_eq!(running("", "25", "178").parse(), Err(ValidationError::NotPositive { field: "distance" }));
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(running("5", "25", "abc").parse(), Err(ValidationError::NotFinite { field: "cadence" }));
        assert_eq!(cycling("20", "60", "lots").parse(), Err(ValidationError::NotFinite { field: "elevation gain" }));
        assert_eq!(running("Infinity", "25", "178").parse(), Err(ValidationError::NotFinite { field: "distance" }));
        assert_eq!(cycling("20", "-Infinity", "300").parse(), Err(ValidationError::NotFinite { field: "duration" }));
        assert_eq!(running("1e400", "25", "178").parse(), Err(ValidationError::NotFinite { field: "distance" }));
    }

    #[test]
    fn test_overflowing_metric_rejected() {
        assert_eq!(running("1e-320", "25", "178").parse(), Err(ValidationError::MetricOutOfRange { metric: "pace" }));
        assert_eq!(cycling("1e308", "1e-320", "0").parse(), Err(ValidationError::MetricOutOfRange { metric: "speed" }));
        assert_eq!(cycling("1e300", "1e-10", "0").parse(), Err(ValidationError::MetricOutOfRange { metric: "speed" }));
        assert!(running("0.001", "600", "178").parse().is_ok());
    }

    #[test]
    fn test_finiteness_checked_before_positivity() {
        // a negative distance with an unparsable cadence reports the cadence
        assert_eq!(running("-1", "25", "abc").parse(), Err(ValidationError::NotFinite { field: "cadence" }));
    }

    #[test]
    fn test_elevation_gain_bounds() {
        assert!(cycling("20", "60", "0").parse().is_ok());
        assert!(cycling("20", "60", "").parse().is_ok());
        assert_eq!(cycling("20", "60", "-10").parse(), Err(ValidationError::Negative { field: "elevation gain" }));
    }

    #[test]
    fn test_cleared_keeps_type() {
        let filled = cycling("20", "60", "300");
        assert_eq!(filled.cleared(), FormInput::new(WorkoutType::Cycling));

        let fresh = FormInput::new(WorkoutType::Running);
        assert_eq!(fresh.workout_type, "running");
        assert!(fresh.distance.is_empty() && fresh.cadence.is_empty());
    }

    #[test]
    fn test_unknown_type() {
        let mut input = running("5", "25", "178");
        input.workout_type = "swimming".into();
        assert_eq!(input.parse(), Err(ValidationError::UnknownType("swimming".into())));
    }

    #[test]
    fn test_unused_field_ignored() {
        let mut input = running("5", "25", "178");
        input.elevation = "abc".into();
        assert!(input.parse().is_ok());
    }
}
