use gloo_console::error;
use gloo_utils::window;
use web_sys::Storage;
use workout_lib::store::Store;

/// [`Store`] over the browser's `localStorage`. Without one, reads find
/// nothing and writes are dropped.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = window().local_storage().ok().flatten();
        if storage.is_none() {
            error!("localStorage is not available, workouts will not be saved");
        }

        Self { storage }
    }
}

impl Store for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.set_item(key, value) {
                error!(format!("Failed to save {key}"), err);
            }
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.remove_item(key) {
                error!(format!("Failed to remove {key}"), err);
            }
        }
    }
}
