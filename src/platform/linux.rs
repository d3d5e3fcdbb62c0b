// Launcher data path for Linux: $XDG_DATA_HOME/weblauncher or ~/.local/share/weblauncher

use std::env;
use std::path::PathBuf;

pub fn get_data_dir() -> PathBuf {
    data_dir_from(env::var("XDG_DATA_HOME").ok(), env::var("HOME").ok())
}

fn data_dir_from(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    match xdg_data_home {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("weblauncher"),
        _ => PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
            .join(".local")
            .join("share")
            .join("weblauncher"),
    }
}
