/// Application configuration. Values are fixed at compile time; see
/// [`AppConfig::from_build_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub zoom_level: f64,
    /// Key the workout list is stored under.
    pub storage_key: String,
    pub tile_url: String,
    pub tile_attribution: String,
    pub popup_max_width: f64,
    pub popup_min_width: f64,
    /// Seconds the pan animation takes when focusing a workout.
    pub pan_duration: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            zoom_level: 13.,
            storage_key: "workouts".to_string(),
            tile_url: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            popup_max_width: 250.,
            popup_min_width: 100.,
            pan_duration: 1.,
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by `WORKOUT_TILE_URL` and `WORKOUT_STORAGE_KEY` if
    /// they were set when the crate was compiled.
    pub fn from_build_env() -> Self {
        Self::with_overrides(option_env!("WORKOUT_TILE_URL"), option_env!("WORKOUT_STORAGE_KEY"))
    }

    fn with_overrides(tile_url: Option<&str>, storage_key: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(url) = tile_url.map(str::trim).filter(|url| !url.is_empty()) {
            config.tile_url = url.to_string();
        }
        if let Some(key) = storage_key.map(str::trim).filter(|key| !key.is_empty()) {
            config.storage_key = key.to_string();
        }

        config
    }
}
