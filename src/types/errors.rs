// === StoreError ===

/// Errors raised by the durable stores (window states, raw database access).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("Store database error: {0}")]
    DatabaseError(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to launcher settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Database operation failed.
    #[error("Settings database error: {0}")]
    DatabaseError(String),
    /// Failed to serialize or deserialize a settings value.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is not known.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value has the wrong shape for its key.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

impl From<rusqlite::Error> for SettingsError {
    fn from(e: rusqlite::Error) -> Self {
        SettingsError::DatabaseError(e.to_string())
    }
}

// === WindowError ===

/// Errors related to editing the configured window list.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    /// Window with the given ID was not found.
    #[error("Window not found: {0}")]
    NotFound(String),
    /// The provided list index is out of bounds.
    #[error("Invalid window index: {0}")]
    InvalidIndex(usize),
    /// Persisting the window list failed.
    #[error("Window persistence error: {0}")]
    Persistence(#[from] SettingsError),
}

// === LauncherError ===

/// Errors surfaced while constructing or starting the launcher.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("Launcher database error: {0}")]
    DatabaseError(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Window(#[from] WindowError),
}

impl From<rusqlite::Error> for LauncherError {
    fn from(e: rusqlite::Error) -> Self {
        LauncherError::DatabaseError(e.to_string())
    }
}
