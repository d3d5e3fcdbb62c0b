// Launcher platform abstraction
// Resolves where the launcher keeps its database on Windows, macOS, and Linux.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// File name of the launcher database inside the data directory.
pub const DATABASE_FILE: &str = "weblauncher.db";

/// Returns the platform-specific data directory for the launcher.
///
/// - **Linux**: `$XDG_DATA_HOME/weblauncher` or `~/.local/share/weblauncher`
/// - **macOS**: `~/Library/Application Support/WebLauncher`
/// - **Windows**: `%APPDATA%/WebLauncher`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// Full path of the launcher database, honouring `WEBLAUNCHER_DB` when set.
pub fn database_path() -> PathBuf {
    match std::env::var("WEBLAUNCHER_DB") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_data_dir().join(DATABASE_FILE),
    }
}
