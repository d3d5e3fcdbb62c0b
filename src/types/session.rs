use serde::{Deserialize, Serialize};

/// Opaque handle of a display surface a session can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Lifecycle state of a pooled session. A window with no pool entry is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Attached(SurfaceId),
    Detached,
}

impl SessionState {
    pub fn is_attached(&self) -> bool {
        matches!(self, SessionState::Attached(_))
    }
}

/// Outcome of a navigation request inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// The engine proceeds with the load in-app.
    Allow,
    /// The load is blocked and the URL was handed to the external opener.
    OpenedExternally,
    /// No live session for the window.
    Ignored,
}

/// Per-session engine configuration derived from the settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub user_agent: Option<String>,
    pub third_party_cookies: bool,
}

impl EngineConfig {
    pub fn from_settings(settings: &super::settings::LauncherSettings) -> Self {
        let user_agent = if settings.user_agent.trim().is_empty() {
            None
        } else {
            Some(settings.user_agent.clone())
        };
        Self {
            user_agent,
            third_party_cookies: settings.third_party_cookies,
        }
    }
}
