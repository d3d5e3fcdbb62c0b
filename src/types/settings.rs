use serde::{Deserialize, Serialize};

/// What happens to live sessions when the network becomes available again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshPolicy {
    Off,
    Current,
    All,
}

impl RefreshPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshPolicy::Off => "OFF",
            RefreshPolicy::Current => "CURRENT",
            RefreshPolicy::All => "ALL",
        }
    }
}

/// How the hardware/system back action is interpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackBehavior {
    WebBack,
    Disabled,
}

impl BackBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackBehavior::WebBack => "WEB_BACK",
            BackBehavior::Disabled => "DISABLED",
        }
    }
}

/// Immutable, total settings snapshot handed to the session pool.
///
/// The pool never merges partial updates: every change produces a new
/// snapshot with all fields populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LauncherSettings {
    pub max_alive: u32,
    pub third_party_cookies: bool,
    /// Empty means "use the engine's default user agent".
    pub user_agent: String,
    /// Domain suffixes allowed to load in-app. Empty disables the whitelist.
    pub whitelist_domains: Vec<String>,
    pub refresh_policy: RefreshPolicy,
    pub back_behavior: BackBehavior,
    pub foreground_service: bool,
    pub debug_mode: bool,
}

pub const DEFAULT_MAX_ALIVE: u32 = 5;

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            max_alive: DEFAULT_MAX_ALIVE,
            third_party_cookies: false,
            user_agent: String::new(),
            whitelist_domains: Vec::new(),
            refresh_policy: RefreshPolicy::Current,
            back_behavior: BackBehavior::WebBack,
            foreground_service: true,
            debug_mode: false,
        }
    }
}

impl LauncherSettings {
    /// Effective session budget: `max_alive` coerced into `[1, window_count]`.
    pub fn effective_max_alive(&self, window_count: usize) -> usize {
        let ceiling = window_count.max(1);
        (self.max_alive as usize).clamp(1, ceiling)
    }

    /// Parses the comma-separated whitelist format used by the settings store.
    pub fn parse_whitelist(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect()
    }
}
