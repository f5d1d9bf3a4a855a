use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Latitude and longitude, stored as `[lat, lng]`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♂️",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(other.to_owned()),
        }
    }
}

/// Variant specific fields. The derived metric is computed once, when the
/// workout is built, and stored next to the input it was derived from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        cadence: f64,
        /// min/km
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// km/h
        speed: f64,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Workout {
    pub id: String,
    pub date: DateTime<Utc>,
    pub coords: Coords,
    /// km
    pub distance: f64,
    /// min
    pub duration: f64,
    pub description: String,
    #[serde(flatten)]
    pub kind: WorkoutKind,
}

impl Workout {
    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64, created: DateTime<Local>) -> Self {
        let pace = duration / distance;
        Self::new(coords, distance, duration, WorkoutKind::Running { cadence, pace }, created)
    }

    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64, created: DateTime<Local>) -> Self {
        let speed = distance / (duration / 60.);
        Self::new(coords, distance, duration, WorkoutKind::Cycling { elevation_gain, speed }, created)
    }

    fn new(coords: Coords, distance: f64, duration: f64, kind: WorkoutKind, created: DateTime<Local>) -> Self {
        let workout_type = match kind {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        };

        Self {
            id: id_from_millis(created.timestamp_millis()),
            date: created.with_timezone(&Utc),
            coords,
            distance,
            duration,
            description: format!("{} on {}", workout_type.label(), created.format("%B, %-d")),
            kind,
        }
    }

    pub fn workout_type(&self) -> WorkoutType {
        match self.kind {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    /// Pace in min/km for runs, speed in km/h for rides.
    pub fn metric(&self) -> f64 {
        match self.kind {
            WorkoutKind::Running { pace, .. } => pace,
            WorkoutKind::Cycling { speed, .. } => speed,
        }
    }

    pub fn icon(&self) -> &'static str {
        self.workout_type().icon()
    }

    pub fn popup_class(&self) -> String {
        format!("{}-popup", self.workout_type())
    }
}

/// Last ten digits of a millisecond timestamp.
pub fn id_from_millis(millis: i64) -> String {
    let digits = millis.to_string();
    let start = digits.len().saturating_sub(10);
    digits[start..].to_owned()
}
