//! Window Repository.
//!
//! Owns the configured window list. The list is stored as a JSON array of
//! `{id, name, url, order}` under the `windows_json` settings key and is
//! rewritten in full on every edit, with `order` renumbered to `0..n-1`.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::database::connection::Database;
use crate::services::settings_store::{SettingsStore, SettingsStoreTrait};
use crate::types::errors::{SettingsError, WindowError};
use crate::types::window::WindowConfig;

pub const DEFAULT_WINDOW_NAME: &str = "Home";
pub const DEFAULT_WINDOW_URL: &str = "https://example.com";
pub const FALLBACK_WINDOW_NAME: &str = "Window";

/// Trait defining window list operations.
pub trait WindowRepositoryTrait {
    fn load(&mut self) -> Result<&[WindowConfig], WindowError>;
    fn windows(&self) -> &[WindowConfig];
    fn get_window(&self, window_id: &str) -> Option<&WindowConfig>;
    fn update_windows(&mut self, list: Vec<WindowConfig>) -> Result<(), WindowError>;
    fn add_window(&mut self, name: &str, url: &str) -> Result<WindowConfig, WindowError>;
    fn edit_window(&mut self, window_id: &str, name: &str, url: &str) -> Result<(), WindowError>;
    fn delete_window(&mut self, window_id: &str) -> Result<WindowConfig, WindowError>;
    fn move_window(&mut self, window_id: &str, new_index: usize) -> Result<(), WindowError>;
}

/// Persisted window entry; `order` may be absent in hand-edited data.
#[derive(Deserialize)]
struct StoredWindow {
    id: String,
    name: String,
    url: String,
    #[serde(default)]
    order: Option<i64>,
}

pub struct WindowRepository {
    settings: SettingsStore,
    windows: Vec<WindowConfig>,
}

impl WindowRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            settings: SettingsStore::new(db),
            windows: Vec::new(),
        }
    }

    /// Parses the stored list. Blank or malformed input yields an empty list.
    pub fn parse_windows(json: &str) -> Vec<WindowConfig> {
        if json.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Vec<StoredWindow>>(json) {
            Ok(stored) => stored
                .into_iter()
                .enumerate()
                .map(|(i, w)| WindowConfig {
                    id: w.id,
                    name: w.name,
                    url: w.url,
                    order: w.order.unwrap_or(i as i64),
                })
                .collect(),
            Err(e) => {
                log::warn!("stored window list is malformed, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn serialize_windows(list: &[WindowConfig]) -> Result<String, SettingsError> {
        serde_json::to_string(list).map_err(|e| SettingsError::SerializationError(e.to_string()))
    }

    pub fn default_window() -> WindowConfig {
        WindowConfig {
            id: Uuid::new_v4().to_string(),
            name: DEFAULT_WINDOW_NAME.to_string(),
            url: DEFAULT_WINDOW_URL.to_string(),
            order: 0,
        }
    }

    fn find_index(&self, window_id: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.id == window_id)
    }

    /// Renumbers `list` in its current sequence and writes it out.
    fn commit(&mut self, mut list: Vec<WindowConfig>) -> Result<(), WindowError> {
        for (i, window) in list.iter_mut().enumerate() {
            window.order = i as i64;
        }
        let json = Self::serialize_windows(&list)?;
        self.settings.set_windows_json(&json)?;
        self.windows = list;
        Ok(())
    }
}

impl WindowRepositoryTrait for WindowRepository {
    /// Reads the persisted list. When nothing usable is stored, a single
    /// default window is synthesized and persisted before returning.
    fn load(&mut self) -> Result<&[WindowConfig], WindowError> {
        let parsed = Self::parse_windows(&self.settings.windows_json());
        if parsed.is_empty() {
            log::info!("no configured windows; creating the default window");
            self.commit(vec![Self::default_window()])?;
        } else {
            self.windows = parsed;
        }
        Ok(&self.windows)
    }

    fn windows(&self) -> &[WindowConfig] {
        &self.windows
    }

    fn get_window(&self, window_id: &str) -> Option<&WindowConfig> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    /// Replaces the whole list, ordered by the supplied `order` values.
    fn update_windows(&mut self, mut list: Vec<WindowConfig>) -> Result<(), WindowError> {
        list.sort_by_key(|w| w.order);
        self.commit(list)
    }

    /// Appends a window. Blank names and URLs take fallback values.
    fn add_window(&mut self, name: &str, url: &str) -> Result<WindowConfig, WindowError> {
        let window = WindowConfig {
            id: Uuid::new_v4().to_string(),
            name: non_blank_or(name, FALLBACK_WINDOW_NAME),
            url: non_blank_or(url, DEFAULT_WINDOW_URL),
            order: self.windows.len() as i64,
        };
        let mut list = self.windows.clone();
        list.push(window.clone());
        self.commit(list)?;
        Ok(window)
    }

    fn edit_window(&mut self, window_id: &str, name: &str, url: &str) -> Result<(), WindowError> {
        let idx = self
            .find_index(window_id)
            .ok_or_else(|| WindowError::NotFound(window_id.to_string()))?;
        let mut list = self.windows.clone();
        list[idx].name = non_blank_or(name, FALLBACK_WINDOW_NAME);
        list[idx].url = non_blank_or(url, DEFAULT_WINDOW_URL);
        self.commit(list)
    }

    fn delete_window(&mut self, window_id: &str) -> Result<WindowConfig, WindowError> {
        let idx = self
            .find_index(window_id)
            .ok_or_else(|| WindowError::NotFound(window_id.to_string()))?;
        let mut list = self.windows.clone();
        let removed = list.remove(idx);
        self.commit(list)?;
        Ok(removed)
    }

    fn move_window(&mut self, window_id: &str, new_index: usize) -> Result<(), WindowError> {
        let idx = self
            .find_index(window_id)
            .ok_or_else(|| WindowError::NotFound(window_id.to_string()))?;
        if new_index >= self.windows.len() {
            return Err(WindowError::InvalidIndex(new_index));
        }
        let mut list = self.windows.clone();
        let window = list.remove(idx);
        list.insert(new_index, window);
        self.commit(list)
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
