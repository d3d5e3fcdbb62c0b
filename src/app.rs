//! Launcher core.
//!
//! Central struct wiring the settings store, the window list and the session
//! pool together, and translating host events (window shown/hidden, renderer
//! crash, network transitions, back presses) into pool operations.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::database::connection::Database;
use crate::engine::{EngineFactory, SessionObserver};
use crate::managers::session_pool::{AttachOutcome, SessionPool};
use crate::managers::window_repository::{WindowRepository, WindowRepositoryTrait};
use crate::managers::window_state_store::WindowStateStore;
use crate::services::collaborators::{ExternalOpener, KeepAlive};
use crate::services::file_chooser::{FileChooser, FileChooserBridge, FileChooserCallback, FileChooserRequest};
use crate::services::settings_store::{SettingsStore, SettingsStoreTrait};
use crate::types::errors::{LauncherError, WindowError};
use crate::types::session::SurfaceId;
use crate::types::settings::{BackBehavior, LauncherSettings, RefreshPolicy};
use crate::types::window::WindowConfig;

/// Host-side implementations the launcher drives.
pub struct Collaborators {
    pub engine_factory: Box<dyn EngineFactory>,
    pub external_opener: Box<dyn ExternalOpener>,
    pub keep_alive: Box<dyn KeepAlive>,
    pub file_chooser: Box<dyn FileChooser>,
}

/// Events delivered to [`Launcher::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum LauncherEvent {
    WindowShown { window_id: String, surface: SurfaceId },
    WindowHidden { window_id: String },
    PageFinished { window_id: String, url: String },
    RendererCrashed { window_id: String },
    NetworkChanged { available: bool },
    UpdateSetting { key: String, value: Value },
    FilesChosen { selection: Vec<String> },
    RefreshCurrent,
    RefreshAll,
    TrimMemory,
    Shutdown,
}

/// Result of a back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    WentBack,
    NoHistory,
    Disabled,
    /// No window is showing; the host should handle back itself.
    Unhandled,
}

pub struct Launcher {
    settings: SettingsStore,
    windows: WindowRepository,
    pool: SessionPool,
    keep_alive: Box<dyn KeepAlive>,
    keep_alive_running: bool,
    file_chooser: FileChooserBridge,
    current_window: Option<String>,
}

impl Launcher {
    /// Opens the database at `db_path` and starts the launcher on it.
    pub fn open<P: AsRef<Path>>(db_path: P, collaborators: Collaborators) -> Result<Self, LauncherError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| LauncherError::DatabaseError(e.to_string()))?;
            }
        }
        let db = Arc::new(Database::open(db_path)?);
        Self::with_database(db, collaborators)
    }

    /// Startup sequence: load the window list (synthesizing the default
    /// window when needed), load window states, drop orphaned states, and
    /// apply the current settings snapshot.
    pub fn with_database(db: Arc<Database>, collaborators: Collaborators) -> Result<Self, LauncherError> {
        let settings = SettingsStore::new(db.clone());
        let mut windows = WindowRepository::new(db.clone());
        windows.load()?;
        let states = WindowStateStore::new(db)?;

        let snapshot = settings.snapshot();
        let mut pool = SessionPool::new(
            collaborators.engine_factory,
            collaborators.external_opener,
            states,
            snapshot.clone(),
        );
        pool.sync_windows(windows.windows());

        let mut launcher = Self {
            settings,
            windows,
            pool,
            keep_alive: collaborators.keep_alive,
            keep_alive_running: false,
            file_chooser: FileChooserBridge::new(collaborators.file_chooser),
            current_window: None,
        };
        launcher.apply_keep_alive(&snapshot);
        log::info!("launcher started with {} windows", launcher.windows.windows().len());
        Ok(launcher)
    }

    // --- settings ---

    /// Pushes a full snapshot into the pool and the keep-alive collaborator.
    pub fn apply_settings(&mut self, snapshot: LauncherSettings) {
        log::debug!("applying settings snapshot: {:?}", snapshot);
        self.apply_keep_alive(&snapshot);
        self.pool.update_settings(snapshot);
    }

    /// Applies the store's snapshot if the pool is not already on it.
    pub fn sync_settings(&mut self) {
        let snapshot = self.settings.snapshot();
        if *self.pool.settings() != snapshot {
            self.apply_settings(snapshot);
        }
    }

    fn apply_keep_alive(&mut self, snapshot: &LauncherSettings) {
        if snapshot.foreground_service && !self.keep_alive_running {
            self.keep_alive.start();
            self.keep_alive_running = true;
        } else if !snapshot.foreground_service && self.keep_alive_running {
            self.keep_alive.stop();
            self.keep_alive_running = false;
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Settings writes made here reach the pool through [`Launcher::run`] or
    /// [`Launcher::sync_settings`].
    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    // --- windows ---

    pub fn windows(&self) -> &[WindowConfig] {
        self.windows.windows()
    }

    pub fn current_window(&self) -> Option<&str> {
        self.current_window.as_deref()
    }

    /// How many neighbouring windows a pager may keep attached.
    pub fn offscreen_limit(&self) -> usize {
        self.settings
            .snapshot()
            .effective_max_alive(self.windows.windows().len())
    }

    pub fn add_window(&mut self, name: &str, url: &str) -> Result<WindowConfig, WindowError> {
        let window = self.windows.add_window(name, url)?;
        self.pool.sync_windows(self.windows.windows());
        Ok(window)
    }

    pub fn edit_window(&mut self, window_id: &str, name: &str, url: &str) -> Result<(), WindowError> {
        self.windows.edit_window(window_id, name, url)?;
        self.pool.sync_windows(self.windows.windows());
        Ok(())
    }

    pub fn delete_window(&mut self, window_id: &str) -> Result<WindowConfig, WindowError> {
        let removed = self.windows.delete_window(window_id)?;
        if self.current_window.as_deref() == Some(window_id) {
            self.current_window = None;
        }
        self.pool.sync_windows(self.windows.windows());
        Ok(removed)
    }

    pub fn move_window(&mut self, window_id: &str, new_index: usize) -> Result<(), WindowError> {
        self.windows.move_window(window_id, new_index)?;
        self.pool.sync_windows(self.windows.windows());
        Ok(())
    }

    // --- session events ---

    /// Attaches the window's session to `surface` and makes it current.
    /// Unknown window ids are ignored.
    pub fn show_window(&mut self, window_id: &str, surface: SurfaceId) -> Option<AttachOutcome> {
        let window = self.windows.get_window(window_id)?.clone();
        let outcome = self.pool.attach(&window, surface);
        self.current_window = Some(window.id);
        Some(outcome)
    }

    pub fn hide_window(&mut self, window_id: &str) {
        self.pool.detach(window_id);
    }

    /// Recreates the crashed session from the current window configuration.
    /// Reports for windows without a pooled session are stale and ignored.
    pub fn on_renderer_crashed(&mut self, window_id: &str) {
        if !self.pool.contains(window_id) {
            log::debug!("crash for window {} without a session ignored", window_id);
            return;
        }
        match self.windows.get_window(window_id).cloned() {
            Some(window) => self.pool.recreate(&window),
            None => log::debug!("crash for unknown window {} ignored", window_id),
        }
    }

    /// On "became available", refreshes per the current refresh policy.
    pub fn on_network_changed(&mut self, available: bool) {
        log::info!("network {}", if available { "available" } else { "lost" });
        if !available {
            return;
        }
        match self.pool.settings().refresh_policy {
            RefreshPolicy::Off => {}
            RefreshPolicy::Current => self.refresh_current(),
            RefreshPolicy::All => self.pool.refresh_all(),
        }
    }

    pub fn refresh_current(&mut self) {
        if let Some(id) = self.current_window.clone() {
            self.pool.refresh(&id);
        }
    }

    pub fn on_back_pressed(&mut self) -> BackOutcome {
        let window_id = match self.current_window.clone() {
            Some(id) => id,
            None => return BackOutcome::Unhandled,
        };
        if self.pool.settings().back_behavior == BackBehavior::Disabled {
            return BackOutcome::Disabled;
        }
        if self.pool.can_go_back(&window_id) {
            self.pool.go_back(&window_id);
            BackOutcome::WentBack
        } else {
            BackOutcome::NoHistory
        }
    }

    /// Forwards an engine's file request to the picker.
    pub fn request_files(
        &mut self,
        callback: FileChooserCallback,
        allow_multiple: bool,
        accept_types: &[String],
    ) -> FileChooserRequest {
        self.file_chooser.request(callback, allow_multiple, accept_types)
    }

    pub fn pool(&self) -> &SessionPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut SessionPool {
        &mut self.pool
    }

    /// Shutdown sequence: cancel any pending file request and tear down every session.
    pub fn shutdown(&mut self) {
        self.file_chooser.cancel();
        self.pool.destroy_all();
        self.current_window = None;
        log::info!("launcher shut down");
    }

    // --- event loop ---

    /// Applies one event. Returns `false` once the launcher has shut down.
    pub fn handle_event(&mut self, event: LauncherEvent) -> bool {
        match event {
            LauncherEvent::WindowShown { window_id, surface } => {
                if self.show_window(&window_id, surface).is_none() {
                    log::debug!("show for unknown window {} ignored", window_id);
                }
            }
            LauncherEvent::WindowHidden { window_id } => self.hide_window(&window_id),
            LauncherEvent::PageFinished { window_id, url } => {
                self.pool.on_page_finished(&window_id, &url)
            }
            LauncherEvent::RendererCrashed { window_id } => self.on_renderer_crashed(&window_id),
            LauncherEvent::NetworkChanged { available } => self.on_network_changed(available),
            LauncherEvent::UpdateSetting { key, value } => {
                match self.settings.set_value(&key, value) {
                    Ok(()) => self.sync_settings(),
                    Err(e) => log::warn!("setting {} rejected: {}", key, e),
                }
            }
            LauncherEvent::FilesChosen { selection } => {
                if !self.file_chooser.complete(selection) {
                    log::debug!("file selection arrived with no pending request");
                }
            }
            LauncherEvent::RefreshCurrent => self.refresh_current(),
            LauncherEvent::RefreshAll => self.pool.refresh_all(),
            LauncherEvent::TrimMemory => {
                self.pool.enforce_max_alive();
            }
            LauncherEvent::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    /// Consumes host events and settings snapshots until `Shutdown` arrives
    /// or the event channel closes.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<LauncherEvent>) {
        let mut settings_rx = self.settings.subscribe();
        self.sync_settings();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if !self.handle_event(event) {
                            break;
                        }
                    }
                    None => {
                        self.shutdown();
                        break;
                    }
                },
                changed = settings_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = settings_rx.borrow_and_update().clone();
                    if *self.pool.settings() != snapshot {
                        self.apply_settings(snapshot);
                    }
                }
            }
        }
    }
}
