use chrono::{DateTime, Local, TimeDelta};
use thiserror::Error;

use crate::{
    config::AppConfig,
    form::{FormInput, ValidationError},
    store::{clear_workouts, load_workouts, save_workouts, Store, StoreError},
    workout::{Coords, Workout},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    AwaitingPosition,
    /// Geolocation failed, the map will never be shown this session.
    PositionUnavailable,
    MapReady,
    FormOpen,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("no location selected on the map")]
    NoLocation,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application state: the workout list, the last map click and where the
/// session is in its lifecycle. Rendering is left to the caller.
pub struct Tracker<S: Store> {
    store: S,
    config: AppConfig,
    phase: Phase,
    position: Option<Coords>,
    last_click: Option<Coords>,
    workouts: Vec<Workout>,
    last_millis: i64,
}

impl<S: Store> Tracker<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Self {
            store,
            config,
            phase: Phase::Uninitialized,
            position: None,
            last_click: None,
            workouts: Vec::new(),
            last_millis: i64::MIN,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> Option<Coords> {
        self.position
    }

    pub fn last_click(&self) -> Option<Coords> {
        self.last_click
    }

    /// In creation order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored workouts and starts waiting for a position. Returns
    /// the number of stored records that had to be skipped. A corrupt blob
    /// leaves the list empty.
    pub fn initialize(&mut self) -> Result<usize, StoreError> {
        self.phase = Phase::AwaitingPosition;

        let report = load_workouts(&self.store, &self.config.storage_key)?;
        self.last_millis = report
            .workouts
            .iter()
            .map(|w| w.date.timestamp_millis())
            .max()
            .unwrap_or(i64::MIN);
        self.workouts = report.workouts;

        Ok(report.skipped)
    }

    /// Returns the workouts that need a marker now that the map exists.
    pub fn position_acquired(&mut self, coords: Coords) -> &[Workout] {
        if self.phase != Phase::MapReady && self.phase != Phase::FormOpen {
            self.phase = Phase::MapReady;
            self.position = Some(coords);
        }
        &self.workouts
    }

    pub fn position_failed(&mut self) {
        if self.phase == Phase::AwaitingPosition || self.phase == Phase::Uninitialized {
            self.phase = Phase::PositionUnavailable;
        }
    }

    /// Returns whether the form should be shown.
    pub fn map_clicked(&mut self, coords: Coords) -> bool {
        match self.phase {
            Phase::MapReady | Phase::FormOpen => {
                self.last_click = Some(coords);
                self.phase = Phase::FormOpen;
                true
            }
            _ => false,
        }
    }

    /// Validates the form and, if it holds a workout, places it at the last
    /// map click and persists the whole list. Nothing changes on error.
    pub fn submit(&mut self, form: &FormInput, now: DateTime<Local>) -> Result<&Workout, SubmitError> {
        let input = form.parse()?;
        let coords = self.last_click.ok_or(SubmitError::NoLocation)?;

        let created = self.unique_time(now);
        self.workouts.push(input.build(coords, created));

        if let Err(err) = self.persist() {
            self.workouts.pop();
            return Err(err.into());
        }

        self.last_millis = created.timestamp_millis();
        self.last_click = None;
        self.phase = Phase::MapReady;

        let last = self.workouts.len() - 1;
        Ok(&self.workouts[last])
    }

    pub fn locate(&self, id: &str) -> Option<Coords> {
        self.workouts.iter().find(|w| w.id == id).map(|w| w.coords)
    }

    pub fn persist(&mut self) -> Result<(), StoreError> {
        save_workouts(&mut self.store, &self.config.storage_key, &self.workouts)
    }

    /// Drops every stored workout. The caller reloads the page afterwards.
    pub fn reset(&mut self) {
        clear_workouts(&mut self.store, &self.config.storage_key);
        self.workouts.clear();
        self.last_click = None;
    }

    // Ids come from the creation time, so never hand out the same millisecond twice
    fn unique_time(&self, now: DateTime<Local>) -> DateTime<Local> {
        let millis = now.timestamp_millis();
        if millis > self.last_millis {
            now
        } else {
            now + TimeDelta::milliseconds(self.last_millis + 1 - millis)
        }
    }
}
