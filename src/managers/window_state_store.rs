//! Window State Store.
//!
//! Durable per-window runtime state (last URL, scroll offset, last-active
//! time) in the `window_states` table, fronted by an in-memory map. The map is
//! authoritative for the running process; writes go through to SQLite and a
//! failed write only costs fidelity across a restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rusqlite::params;

use crate::database::connection::Database;
use crate::types::errors::StoreError;
use crate::types::window::WindowState;

pub struct WindowStateStore {
    db: Arc<Database>,
    cache: HashMap<String, WindowState>,
}

impl WindowStateStore {
    /// Loads every persisted state into memory.
    pub fn new(db: Arc<Database>) -> Result<Self, StoreError> {
        let cache = {
            let conn = db.connection();
            let mut stmt = conn.prepare(
                "SELECT window_id, last_url, last_scroll_y, last_active_time FROM window_states",
            )?;
            let rows = stmt.query_map([], |row| {
                let scroll: i64 = row.get(2)?;
                Ok(WindowState {
                    window_id: row.get(0)?,
                    last_url: row.get(1)?,
                    last_scroll_y: scroll.clamp(0, u32::MAX as i64) as u32,
                    last_active_time: row.get(3)?,
                })
            })?;

            let mut cache = HashMap::new();
            for row in rows {
                let state = row?;
                cache.insert(state.window_id.clone(), state);
            }
            cache
        };
        Ok(Self { db, cache })
    }

    pub fn get(&self, window_id: &str) -> Option<&WindowState> {
        self.cache.get(window_id)
    }

    /// Overwrites the state for `state.window_id`.
    ///
    /// The in-memory copy is updated even when the database write fails.
    pub fn put(&mut self, state: WindowState) -> Result<(), StoreError> {
        let result = self
            .db
            .connection()
            .execute(
                "INSERT INTO window_states (window_id, last_url, last_scroll_y, last_active_time)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(window_id) DO UPDATE SET
                     last_url = excluded.last_url,
                     last_scroll_y = excluded.last_scroll_y,
                     last_active_time = excluded.last_active_time",
                params![
                    state.window_id,
                    state.last_url,
                    state.last_scroll_y as i64,
                    state.last_active_time
                ],
            )
            .map(|_| ())
            .map_err(StoreError::from);
        self.cache.insert(state.window_id.clone(), state);
        result
    }

    pub fn remove(&mut self, window_id: &str) -> Result<(), StoreError> {
        self.cache.remove(window_id);
        self.db
            .connection()
            .execute("DELETE FROM window_states WHERE window_id = ?1", params![window_id])?;
        Ok(())
    }

    /// Drops every state whose window is not in `window_ids`. Returns how many went.
    pub fn retain(&mut self, window_ids: &HashSet<&str>) -> Result<usize, StoreError> {
        let orphans: Vec<String> = self
            .cache
            .keys()
            .filter(|id| !window_ids.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &orphans {
            self.remove(id)?;
        }
        Ok(orphans.len())
    }

    /// Newest `last_active_time` on record.
    pub fn latest_active_time(&self) -> Option<i64> {
        self.cache.values().map(|s| s.last_active_time).max()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
