//! Session Pool.
//!
//! Owns every live rendering session, keyed by window id. A window with no
//! entry is absent; an entry is either attached to a surface or detached
//! (paused, resources still allocated). Attaching stamps the window as the
//! most recently active and then evicts (detaches) the least recently active
//! attached sessions above the `max_alive` budget.
//!
//! No operation here returns an error. Persistence failures are logged and
//! absorbed; the in-memory window state stays authoritative.

use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::{EngineFactory, RenderingEngine, SessionObserver};
use crate::managers::window_state_store::WindowStateStore;
use crate::services::collaborators::ExternalOpener;
use crate::services::navigation_policy::should_open_externally;
use crate::types::session::{EngineConfig, NavigationDecision, SessionState, SurfaceId};
use crate::types::settings::LauncherSettings;
use crate::types::window::{WindowConfig, WindowState};

/// Whether `attach` built a new session or re-showed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Created,
    Reused,
}

struct PooledSession {
    window: WindowConfig,
    engine: Box<dyn RenderingEngine>,
    state: SessionState,
    /// Persisted offset still to be applied once the first load finishes.
    pending_scroll: Option<u32>,
}

/// Millisecond timestamps that never repeat or go backwards within a pool.
struct ActivityClock {
    last: i64,
}

impl ActivityClock {
    /// Seeds from the newest persisted stamp; stamps from the future are
    /// pulled back to the wall clock.
    fn seeded(latest: Option<i64>) -> Self {
        Self {
            last: latest.unwrap_or(0).min(now_millis()),
        }
    }

    fn stamp(&mut self) -> i64 {
        self.last = now_millis().max(self.last.saturating_add(1));
        self.last
    }
}

fn now_millis() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    i64::try_from(millis).unwrap_or(i64::MAX)
}

pub struct SessionPool {
    sessions: HashMap<String, PooledSession>,
    factory: Box<dyn EngineFactory>,
    opener: Box<dyn ExternalOpener>,
    states: WindowStateStore,
    settings: LauncherSettings,
    window_count: usize,
    clock: ActivityClock,
    sessions_created: u64,
}

impl SessionPool {
    pub fn new(
        factory: Box<dyn EngineFactory>,
        opener: Box<dyn ExternalOpener>,
        states: WindowStateStore,
        settings: LauncherSettings,
    ) -> Self {
        let clock = ActivityClock::seeded(states.latest_active_time());
        let mut pool = Self {
            sessions: HashMap::new(),
            factory,
            opener,
            states,
            settings,
            window_count: 0,
            clock,
            sessions_created: 0,
        };
        pool.factory.set_debugging_enabled(pool.settings.debug_mode);
        pool
    }

    // --- lifecycle ---

    /// Shows `window` on `surface`, creating its session on first use.
    pub fn attach(&mut self, window: &WindowConfig, surface: SurfaceId) -> AttachOutcome {
        let outcome = if self.sessions.contains_key(&window.id) {
            AttachOutcome::Reused
        } else {
            self.create_session(window);
            AttachOutcome::Created
        };

        let (url, scroll_y) = match self.sessions.get_mut(&window.id) {
            Some(session) => {
                session.window = window.clone();
                if session.engine.surface().is_some() {
                    session.engine.detach_surface();
                }
                session.engine.attach_surface(surface);
                session.engine.resume();
                session.state = SessionState::Attached(surface);
                (
                    session.engine.url(),
                    session.pending_scroll.unwrap_or_else(|| session.engine.scroll_y()),
                )
            }
            None => return outcome,
        };

        let prior = self.states.get(&window.id).cloned();
        let last_url = url
            .filter(|u| !u.is_empty())
            .or_else(|| prior.as_ref().map(|s| s.last_url.clone()))
            .unwrap_or_else(|| window.url.clone());
        let last_active_time = self.clock.stamp();
        self.persist(WindowState {
            window_id: window.id.clone(),
            last_url,
            last_scroll_y: scroll_y,
            last_active_time,
        });

        log::info!("attached window {} to surface {:?} ({:?})", window.id, surface, outcome);
        self.enforce_max_alive();
        outcome
    }

    /// Unparents and pauses the session for `window_id`. No-op when absent.
    pub fn detach(&mut self, window_id: &str) {
        self.detach_session(window_id, true);
    }

    /// Detaches the least recently active attached sessions until no more
    /// than the budget remain attached. Returns the evicted window ids,
    /// oldest first.
    pub fn enforce_max_alive(&mut self) -> Vec<String> {
        let budget = self
            .settings
            .effective_max_alive(self.window_count.max(self.sessions.len()));
        let attached = self.attached_count();
        if attached <= budget {
            return Vec::new();
        }

        let mut candidates: Vec<(i64, String)> = self
            .sessions
            .iter()
            .filter(|(_, s)| s.state.is_attached())
            .filter_map(|(id, _)| self.states.get(id).map(|st| (st.last_active_time, id.clone())))
            .collect();
        candidates.sort();

        let evicted: Vec<String> = candidates
            .into_iter()
            .take(attached - budget)
            .map(|(_, id)| id)
            .collect();
        for id in &evicted {
            log::info!("evicting window {} (budget {})", id, budget);
            self.detach_session(id, false);
        }
        evicted
    }

    pub fn refresh(&mut self, window_id: &str) {
        if let Some(session) = self.sessions.get_mut(window_id) {
            session.engine.reload();
        }
    }

    pub fn refresh_all(&mut self) {
        for session in self.sessions.values_mut() {
            session.engine.reload();
        }
    }

    /// Replaces the session for `window` with a fresh one after a renderer crash.
    ///
    /// Works whether or not the old session was attached, or existed at all.
    /// A session that was on screen is put back on the same surface.
    pub fn recreate(&mut self, window: &WindowConfig) {
        let previous_surface = match self.sessions.remove(&window.id) {
            Some(mut session) => {
                let surface = match session.state {
                    SessionState::Attached(s) => Some(s),
                    SessionState::Detached => None,
                };
                destroy_engine(session.engine.as_mut());
                surface
            }
            None => None,
        };

        log::info!("recreating session for window {}", window.id);
        match previous_surface {
            Some(surface) => {
                self.attach(window, surface);
            }
            None => self.create_session(window),
        }
    }

    /// Pushes the new snapshot into every pooled session, attached or not.
    pub fn update_settings(&mut self, settings: LauncherSettings) {
        let config = EngineConfig::from_settings(&settings);
        for session in self.sessions.values_mut() {
            session.engine.apply_config(&config);
        }
        self.factory.set_debugging_enabled(settings.debug_mode);
        self.settings = settings;
        self.enforce_max_alive();
    }

    /// Tears down every session. Window state is not written.
    pub fn destroy_all(&mut self) {
        for (id, mut session) in self.sessions.drain() {
            log::debug!("destroying session for window {}", id);
            destroy_engine(session.engine.as_mut());
        }
    }

    /// Aligns the pool with the configured window list: sessions and states
    /// of removed windows are destroyed, kept sessions adopt the edited
    /// name and URL.
    pub fn sync_windows(&mut self, windows: &[WindowConfig]) {
        self.window_count = windows.len();
        let ids: HashSet<&str> = windows.iter().map(|w| w.id.as_str()).collect();

        let removed: Vec<String> = self
            .sessions
            .keys()
            .filter(|id| !ids.contains(id.as_str()))
            .cloned()
            .collect();
        for id in removed {
            if let Some(mut session) = self.sessions.remove(&id) {
                log::info!("window {} removed; destroying its session", id);
                destroy_engine(session.engine.as_mut());
            }
        }

        match self.states.retain(&ids) {
            Ok(0) => {}
            Ok(n) => log::debug!("dropped {} orphaned window states", n),
            Err(e) => log::warn!("orphaned window states not dropped: {}", e),
        }

        for window in windows {
            if let Some(session) = self.sessions.get_mut(&window.id) {
                session.window = window.clone();
            }
        }
        self.enforce_max_alive();
    }

    // --- navigation ---

    pub fn can_go_back(&self, window_id: &str) -> bool {
        self.sessions
            .get(window_id)
            .map(|s| s.engine.can_go_back())
            .unwrap_or(false)
    }

    pub fn go_back(&mut self, window_id: &str) {
        if let Some(session) = self.sessions.get_mut(window_id) {
            if session.engine.can_go_back() {
                session.engine.go_back();
            }
        }
    }

    /// Loads `url` in the window's session unless policy sends it outside.
    pub fn navigate(&mut self, window_id: &str, url: &str) -> NavigationDecision {
        let decision = self.on_navigation_requested(window_id, url);
        if decision == NavigationDecision::Allow {
            if let Some(session) = self.sessions.get_mut(window_id) {
                session.engine.load(url);
            }
        }
        decision
    }

    // --- inspection ---

    /// `None` means the window is absent from the pool.
    pub fn state(&self, window_id: &str) -> Option<SessionState> {
        self.sessions.get(window_id).map(|s| s.state)
    }

    pub fn session(&self, window_id: &str) -> Option<&dyn RenderingEngine> {
        self.sessions.get(window_id).map(|s| s.engine.as_ref())
    }

    pub fn session_mut(&mut self, window_id: &str) -> Option<&mut dyn RenderingEngine> {
        match self.sessions.get_mut(window_id) {
            Some(session) => Some(session.engine.as_mut()),
            None => None,
        }
    }

    pub fn window_state(&self, window_id: &str) -> Option<&WindowState> {
        self.states.get(window_id)
    }

    pub fn contains(&self, window_id: &str) -> bool {
        self.sessions.contains_key(window_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn attached_count(&self) -> usize {
        self.sessions.values().filter(|s| s.state.is_attached()).count()
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    /// Total engines constructed over the pool's lifetime.
    pub fn sessions_created(&self) -> u64 {
        self.sessions_created
    }

    // --- internals ---

    /// Builds a detached, paused session and starts loading the persisted
    /// URL, or the window's home URL when none is persisted. `attach` resumes it.
    fn create_session(&mut self, window: &WindowConfig) {
        let config = EngineConfig::from_settings(&self.settings);
        let mut engine = self.factory.create(&window.id, &config);

        let persisted = self.states.get(&window.id);
        let start_url = persisted
            .map(|s| s.last_url.as_str())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(window.url.as_str())
            .to_string();
        let pending_scroll = persisted.map(|s| s.last_scroll_y).filter(|y| *y > 0);

        log::debug!("creating session for window {} at {}", window.id, start_url);
        engine.load(&start_url);
        engine.pause();
        self.sessions_created += 1;
        self.sessions.insert(
            window.id.clone(),
            PooledSession {
                window: window.clone(),
                engine,
                state: SessionState::Detached,
                pending_scroll,
            },
        );
    }

    /// `touch` stamps the window as active; eviction leaves the stamp alone
    /// so a forced detach does not count as use.
    fn detach_session(&mut self, window_id: &str, touch: bool) {
        let (url, scroll_y, fallback_url) = match self.sessions.get_mut(window_id) {
            Some(session) => {
                session.engine.detach_surface();
                session.engine.pause();
                session.state = SessionState::Detached;
                (
                    session.engine.url(),
                    session.pending_scroll.unwrap_or_else(|| session.engine.scroll_y()),
                    session.window.url.clone(),
                )
            }
            None => return,
        };

        let prior = self.states.get(window_id).cloned();
        let last_active_time = match (&prior, touch) {
            (Some(p), false) => p.last_active_time,
            _ => self.clock.stamp(),
        };
        let last_url = url
            .filter(|u| !u.is_empty())
            .or_else(|| prior.map(|p| p.last_url))
            .unwrap_or(fallback_url);

        self.persist(WindowState {
            window_id: window_id.to_string(),
            last_url,
            last_scroll_y: scroll_y,
            last_active_time,
        });
        log::debug!("detached window {}", window_id);
    }

    fn persist(&mut self, state: WindowState) {
        let window_id = state.window_id.clone();
        if let Err(e) = self.states.put(state) {
            log::warn!("window state for {} not persisted: {}", window_id, e);
        }
    }
}

impl SessionObserver for SessionPool {
    fn on_navigation_requested(&mut self, window_id: &str, target_url: &str) -> NavigationDecision {
        let current = match self.sessions.get(window_id) {
            Some(session) => session.engine.url().unwrap_or_default(),
            None => return NavigationDecision::Ignored,
        };
        if should_open_externally(&current, target_url, &self.settings.whitelist_domains) {
            log::debug!("window {}: {} leaves the app", window_id, target_url);
            self.opener.open(target_url);
            NavigationDecision::OpenedExternally
        } else {
            NavigationDecision::Allow
        }
    }

    /// Applies the persisted scroll offset once, after the first load.
    fn on_page_finished(&mut self, window_id: &str, _url: &str) {
        if let Some(session) = self.sessions.get_mut(window_id) {
            if let Some(y) = session.pending_scroll.take() {
                session.engine.scroll_to(y);
            }
        }
    }

    fn on_renderer_crashed(&mut self, window_id: &str) {
        let window = match self.sessions.get(window_id) {
            Some(session) => session.window.clone(),
            None => {
                log::debug!("crash reported for absent window {}", window_id);
                return;
            }
        };
        log::warn!("renderer for window {} crashed", window_id);
        self.recreate(&window);
    }
}

fn destroy_engine(engine: &mut dyn RenderingEngine) {
    engine.detach_surface();
    engine.stop_loading();
    engine.clear_history();
    engine.destroy();
}
