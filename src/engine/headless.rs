//! In-process rendering engine with no display.
//!
//! Keeps a navigation history, pause state and surface binding in memory and
//! writes every lifecycle call into a shared [`EngineJournal`], which the demo
//! binary prints and the tests inspect.

use std::cell::RefCell;
use std::rc::Rc;

use super::{EngineFactory, RenderingEngine};
use crate::types::session::{EngineConfig, SurfaceId};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineRecord {
    Created { window_id: String },
    Loaded { window_id: String, url: String },
    Reloaded { window_id: String },
    Configured { window_id: String },
    Destroyed { window_id: String },
    Debugging(bool),
}

/// Shared, cloneable log of engine calls.
#[derive(Debug, Clone, Default)]
pub struct EngineJournal {
    records: Rc<RefCell<Vec<EngineRecord>>>,
}

impl EngineJournal {
    fn push(&self, record: EngineRecord) {
        self.records.borrow_mut().push(record);
    }

    pub fn records(&self) -> Vec<EngineRecord> {
        self.records.borrow().clone()
    }

    pub fn created_count(&self, window_id: &str) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| matches!(r, EngineRecord::Created { window_id: w } if w == window_id))
            .count()
    }

    pub fn reload_count(&self, window_id: &str) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| matches!(r, EngineRecord::Reloaded { window_id: w } if w == window_id))
            .count()
    }

    pub fn loads(&self, window_id: &str) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter_map(|r| match r {
                EngineRecord::Loaded { window_id: w, url } if w == window_id => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed_count(&self, window_id: &str) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| matches!(r, EngineRecord::Destroyed { window_id: w } if w == window_id))
            .count()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

pub struct HeadlessEngine {
    window_id: String,
    config: EngineConfig,
    current: Option<String>,
    back_stack: Vec<String>,
    paused: bool,
    surface: Option<SurfaceId>,
    scroll_y: u32,
    destroyed: bool,
    journal: EngineJournal,
}

impl HeadlessEngine {
    pub fn new(window_id: &str, config: &EngineConfig, journal: EngineJournal) -> Self {
        journal.push(EngineRecord::Created {
            window_id: window_id.to_string(),
        });
        Self {
            window_id: window_id.to_string(),
            config: config.clone(),
            current: None,
            back_stack: Vec::new(),
            paused: false,
            surface: None,
            scroll_y: 0,
            destroyed: false,
            journal,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl RenderingEngine for HeadlessEngine {
    fn load(&mut self, url: &str) {
        if let Some(prev) = self.current.replace(url.to_string()) {
            self.back_stack.push(prev);
        }
        self.scroll_y = 0;
        self.journal.push(EngineRecord::Loaded {
            window_id: self.window_id.clone(),
            url: url.to_string(),
        });
    }

    fn reload(&mut self) {
        self.journal.push(EngineRecord::Reloaded {
            window_id: self.window_id.clone(),
        });
    }

    fn stop_loading(&mut self) {}

    fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    fn go_back(&mut self) {
        if let Some(prev) = self.back_stack.pop() {
            self.current = Some(prev);
            self.scroll_y = 0;
        }
    }

    fn clear_history(&mut self) {
        self.back_stack.clear();
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn url(&self) -> Option<String> {
        self.current.clone()
    }

    fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: u32) {
        self.scroll_y = y;
    }

    fn attach_surface(&mut self, surface: SurfaceId) {
        self.surface = Some(surface);
    }

    fn detach_surface(&mut self) {
        self.surface = None;
    }

    fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    fn apply_config(&mut self, config: &EngineConfig) {
        self.config = config.clone();
        self.journal.push(EngineRecord::Configured {
            window_id: self.window_id.clone(),
        });
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn destroy(&mut self) {
        self.surface = None;
        self.current = None;
        self.back_stack.clear();
        self.destroyed = true;
        self.journal.push(EngineRecord::Destroyed {
            window_id: self.window_id.clone(),
        });
    }
}

/// Factory producing [`HeadlessEngine`]s that all share one journal.
#[derive(Default)]
pub struct HeadlessEngineFactory {
    journal: EngineJournal,
    debugging: bool,
}

impl HeadlessEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the journal; clone it before boxing the factory into a pool.
    pub fn journal(&self) -> EngineJournal {
        self.journal.clone()
    }

    pub fn debugging_enabled(&self) -> bool {
        self.debugging
    }
}

impl EngineFactory for HeadlessEngineFactory {
    fn create(&mut self, window_id: &str, config: &EngineConfig) -> Box<dyn RenderingEngine> {
        Box::new(HeadlessEngine::new(window_id, config, self.journal.clone()))
    }

    fn set_debugging_enabled(&mut self, enabled: bool) {
        if self.debugging != enabled {
            self.debugging = enabled;
            self.journal.push(EngineRecord::Debugging(enabled));
        }
    }
}
