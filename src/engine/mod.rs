//! Rendering-engine capability.
//!
//! The launcher never renders web content itself. A host supplies an
//! [`EngineFactory`] producing [`RenderingEngine`] handles, and forwards the
//! engine's callbacks into a [`SessionObserver`] (the session pool).

pub mod headless;

use crate::types::session::{EngineConfig, NavigationDecision, SurfaceId};

/// One live rendering-engine instance bound to a window.
///
/// Handles are not expected to be thread-safe; every call happens on the
/// pool's owning thread.
pub trait RenderingEngine {
    fn load(&mut self, url: &str);
    fn reload(&mut self);
    fn stop_loading(&mut self);

    fn can_go_back(&self) -> bool;
    fn go_back(&mut self);
    fn clear_history(&mut self);

    /// Pauses timers and rendering. Resources stay allocated.
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;

    /// Current (or in-flight) URL, if the engine has one.
    fn url(&self) -> Option<String>;
    fn scroll_y(&self) -> u32;
    fn scroll_to(&mut self, y: u32);

    /// Reparents the engine's view into `surface`, leaving any previous one.
    fn attach_surface(&mut self, surface: SurfaceId);
    fn detach_surface(&mut self);
    fn surface(&self) -> Option<SurfaceId>;

    /// Pushes cookie policy and user agent into this instance.
    fn apply_config(&mut self, config: &EngineConfig);
    fn config(&self) -> &EngineConfig;

    /// Releases every engine resource. The handle must not be used afterwards.
    fn destroy(&mut self);
}

/// Constructs engine instances for the session pool.
pub trait EngineFactory {
    fn create(&mut self, window_id: &str, config: &EngineConfig) -> Box<dyn RenderingEngine>;

    /// Toggles the engine's remote content debugging, when it has one.
    fn set_debugging_enabled(&mut self, _enabled: bool) {}
}

/// Receiver of engine callbacks for a given window.
pub trait SessionObserver {
    /// Synchronous veto point, invoked before a navigation proceeds.
    fn on_navigation_requested(&mut self, window_id: &str, target_url: &str) -> NavigationDecision;
    fn on_page_finished(&mut self, window_id: &str, url: &str);
    /// The renderer process backing `window_id` went away.
    fn on_renderer_crashed(&mut self, window_id: &str);
}
