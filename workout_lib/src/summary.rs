use crate::workout::{Workout, WorkoutKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Detail {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// Everything a list entry shows for one workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub id: String,
    /// `workout--running` or `workout--cycling`
    pub class: String,
    pub title: String,
    pub details: Vec<Detail>,
}

impl WorkoutSummary {
    pub fn new(workout: &Workout) -> Self {
        let mut details = vec![
            Detail::new(workout.icon(), workout.distance.to_string(), "km"),
            Detail::new("⏱", workout.duration.to_string(), "min"),
        ];

        match workout.kind {
            WorkoutKind::Running { cadence, pace } => {
                details.push(Detail::new("⚡️", format!("{pace:.1}"), "min/km"));
                details.push(Detail::new("🦶🏼", cadence.to_string(), "spm"));
            }
            WorkoutKind::Cycling { elevation_gain, speed } => {
                details.push(Detail::new("⚡️", format!("{speed:.1}"), "km/h"));
                details.push(Detail::new("⛰", elevation_gain.to_string(), "m"));
            }
        }

        Self {
            id: workout.id.clone(),
            class: format!("workout workout--{}", workout.workout_type()),
            title: workout.description.clone(),
            details,
        }
    }
}

pub fn popup_content(workout: &Workout) -> String {
    format!("{} {}", workout.icon(), workout.description)
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::workout::Coords;

    fn values(summary: &WorkoutSummary) -> Vec<(&str, &str)> {
        summary.details.iter().map(|d| (d.value.as_str(), d.unit)).collect()
    }

    #[test]
    fn test_running_summary() {
        let created = Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        let run = Workout::running(Coords(40.0, -75.0), 5., 25., 178., created);
        let summary = WorkoutSummary::new(&run);

        assert_eq!(summary.id, run.id);
        assert_eq!(summary.class, "workout workout--running");
        assert_eq!(summary.title, "Running on April, 14");
        assert_eq!(values(&summary), vec![("5", "km"), ("25", "min"), ("5.0", "min/km"), ("178", "spm")]);
        assert_eq!(summary.details[0].icon, "🏃‍♂️");
    }

    #[test]
    fn test_cycling_summary() {
        let created = Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        let ride = Workout::cycling(Coords(40.0, -75.0), 27.5, 95., 300., created);
        let summary = WorkoutSummary::new(&ride);

        assert_eq!(summary.class, "workout workout--cycling");
        assert_eq!(values(&summary), vec![("27.5", "km"), ("95", "min"), ("17.4", "km/h"), ("300", "m")]);
        assert_eq!(summary.details[3].icon, "⛰");
    }

    #[test]
    fn test_popup_content() {
        let created = Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        let ride = Workout::cycling(Coords(40.0, -75.0), 20., 60., 300., created);
        assert_eq!(popup_content(&ride), "🚴‍♂️ Cycling on April, 14");
    }
}
