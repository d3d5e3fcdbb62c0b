use serde::{Deserialize, Serialize};

/// A logical, user-configured browsing destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowConfig {
    pub id: String,
    pub name: String,
    pub url: String,
    pub order: i64,
}

/// Persisted runtime state of one window, keyed by `window_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowState {
    pub window_id: String,
    pub last_url: String,
    pub last_scroll_y: u32,
    /// Milliseconds since the Unix epoch, strictly increasing per pool.
    pub last_active_time: i64,
}
