// Launcher Settings Store
// Durable key-value settings backed by the `settings` table. Each key holds a
// JSON-encoded value; reads assemble a total `LauncherSettings` snapshot with
// per-field defaults, and every successful write broadcasts the new snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use rusqlite::params;
use serde_json::Value;
use tokio::sync::watch;

use crate::database::connection::Database;
use crate::types::errors::SettingsError;
use crate::types::settings::{BackBehavior, LauncherSettings, RefreshPolicy};

pub const KEY_WINDOWS_JSON: &str = "windows_json";
pub const KEY_MAX_ALIVE: &str = "max_alive";
pub const KEY_REFRESH_POLICY: &str = "refresh_policy";
pub const KEY_THIRD_PARTY_COOKIES: &str = "third_party_cookies";
pub const KEY_USER_AGENT: &str = "user_agent";
pub const KEY_FOREGROUND_SERVICE: &str = "foreground_service";
pub const KEY_BACK_BEHAVIOR: &str = "back_behavior";
pub const KEY_WHITELIST_DOMAINS: &str = "whitelist_domains";
pub const KEY_DEBUG_WEBVIEW: &str = "debug_webview";

/// Expected JSON shape of each key's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Integer,
    Bool,
    Text,
    Refresh,
    Back,
}

const KNOWN_KEYS: &[(&str, ValueKind)] = &[
    (KEY_WINDOWS_JSON, ValueKind::Text),
    (KEY_MAX_ALIVE, ValueKind::Integer),
    (KEY_REFRESH_POLICY, ValueKind::Refresh),
    (KEY_THIRD_PARTY_COOKIES, ValueKind::Bool),
    (KEY_USER_AGENT, ValueKind::Text),
    (KEY_FOREGROUND_SERVICE, ValueKind::Bool),
    (KEY_BACK_BEHAVIOR, ValueKind::Back),
    (KEY_WHITELIST_DOMAINS, ValueKind::Text),
    (KEY_DEBUG_WEBVIEW, ValueKind::Bool),
];

/// Trait defining the settings store interface.
pub trait SettingsStoreTrait {
    fn snapshot(&self) -> LauncherSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn get_value(&self, key: &str) -> Result<Option<Value>, SettingsError>;
    fn windows_json(&self) -> String;
    fn set_windows_json(&mut self, json: &str) -> Result<(), SettingsError>;
    fn subscribe(&self) -> watch::Receiver<LauncherSettings>;
    fn reset(&mut self) -> Result<(), SettingsError>;
}

pub struct SettingsStore {
    db: Arc<Database>,
    sender: watch::Sender<LauncherSettings>,
}

impl SettingsStore {
    pub fn new(db: Arc<Database>) -> Self {
        let initial = read_snapshot(&db).unwrap_or_else(|e| {
            log::warn!("settings unreadable, using defaults: {}", e);
            LauncherSettings::default()
        });
        let (sender, _) = watch::channel(initial);
        Self { db, sender }
    }

    pub fn update_max_alive(&mut self, value: i64) -> Result<(), SettingsError> {
        self.set_value(KEY_MAX_ALIVE, Value::from(value))
    }

    pub fn update_refresh_policy(&mut self, value: RefreshPolicy) -> Result<(), SettingsError> {
        self.set_value(KEY_REFRESH_POLICY, Value::from(value.as_str()))
    }

    pub fn update_third_party_cookies(&mut self, value: bool) -> Result<(), SettingsError> {
        self.set_value(KEY_THIRD_PARTY_COOKIES, Value::Bool(value))
    }

    pub fn update_user_agent(&mut self, value: &str) -> Result<(), SettingsError> {
        self.set_value(KEY_USER_AGENT, Value::from(value))
    }

    pub fn update_foreground_service(&mut self, value: bool) -> Result<(), SettingsError> {
        self.set_value(KEY_FOREGROUND_SERVICE, Value::Bool(value))
    }

    pub fn update_back_behavior(&mut self, value: BackBehavior) -> Result<(), SettingsError> {
        self.set_value(KEY_BACK_BEHAVIOR, Value::from(value.as_str()))
    }

    /// Stores the comma-separated whitelist exactly as entered.
    pub fn update_whitelist_domains(&mut self, value: &str) -> Result<(), SettingsError> {
        self.set_value(KEY_WHITELIST_DOMAINS, Value::from(value))
    }

    pub fn update_debug_mode(&mut self, value: bool) -> Result<(), SettingsError> {
        self.set_value(KEY_DEBUG_WEBVIEW, Value::Bool(value))
    }

    fn publish(&self) {
        match read_snapshot(&self.db) {
            Ok(next) => {
                self.sender.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
            }
            Err(e) => log::warn!("settings snapshot not published: {}", e),
        }
    }
}

impl SettingsStoreTrait for SettingsStore {
    fn snapshot(&self) -> LauncherSettings {
        self.sender.borrow().clone()
    }

    /// Writes one field. Unknown keys and ill-typed values are rejected
    /// before anything touches the database.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let kind = KNOWN_KEYS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;
        validate(key, kind, &value)?;

        let encoded = serde_json::to_string(&value)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        self.db.connection().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, encoded],
        )?;

        log::debug!("setting {} updated", key);
        self.publish();
        Ok(())
    }

    fn get_value(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        if !KNOWN_KEYS.iter().any(|(k, _)| *k == key) {
            return Err(SettingsError::InvalidKey(key.to_string()));
        }
        Ok(read_all(&self.db)?.remove(key))
    }

    fn windows_json(&self) -> String {
        match self.get_value(KEY_WINDOWS_JSON) {
            Ok(Some(Value::String(s))) => s,
            Ok(_) => String::new(),
            Err(e) => {
                log::warn!("window list unreadable: {}", e);
                String::new()
            }
        }
    }

    fn set_windows_json(&mut self, json: &str) -> Result<(), SettingsError> {
        self.set_value(KEY_WINDOWS_JSON, Value::from(json))
    }

    fn subscribe(&self) -> watch::Receiver<LauncherSettings> {
        self.sender.subscribe()
    }

    /// Drops every policy key. The window list is kept.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.db.connection().execute(
            "DELETE FROM settings WHERE key != ?1",
            params![KEY_WINDOWS_JSON],
        )?;
        self.publish();
        Ok(())
    }
}

fn validate(key: &str, kind: ValueKind, value: &Value) -> Result<(), SettingsError> {
    let ok = match kind {
        ValueKind::Integer => value.as_i64().is_some(),
        ValueKind::Bool => value.is_boolean(),
        ValueKind::Text => value.is_string(),
        ValueKind::Refresh => serde_json::from_value::<RefreshPolicy>(value.clone()).is_ok(),
        ValueKind::Back => serde_json::from_value::<BackBehavior>(value.clone()).is_ok(),
    };
    if ok {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue(format!(
            "Invalid value for key '{}': {}",
            key, value
        )))
    }
}

fn read_all(db: &Database) -> Result<HashMap<String, Value>, SettingsError> {
    let conn = db.connection();
    let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
    let rows = stmt.query_map([], |row| {
        let key: String = row.get(0)?;
        let value: String = row.get(1)?;
        Ok((key, value))
    })?;

    let mut values = HashMap::new();
    for row in rows {
        let (key, raw) = row?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(v) => {
                values.insert(key, v);
            }
            Err(e) => log::warn!("ignoring unreadable setting {}: {}", key, e),
        }
    }
    Ok(values)
}

/// Builds a total snapshot; any missing or ill-typed field takes its default.
fn read_snapshot(db: &Database) -> Result<LauncherSettings, SettingsError> {
    let values = read_all(db)?;
    let defaults = LauncherSettings::default();

    let max_alive = values
        .get(KEY_MAX_ALIVE)
        .and_then(Value::as_i64)
        .map(|v| v.clamp(1, u32::MAX as i64) as u32)
        .unwrap_or(defaults.max_alive);
    let bool_or = |key: &str, default: bool| values.get(key).and_then(Value::as_bool).unwrap_or(default);
    let text_or = |key: &str| {
        values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default()
    };

    Ok(LauncherSettings {
        max_alive,
        third_party_cookies: bool_or(KEY_THIRD_PARTY_COOKIES, defaults.third_party_cookies),
        user_agent: text_or(KEY_USER_AGENT),
        whitelist_domains: LauncherSettings::parse_whitelist(&text_or(KEY_WHITELIST_DOMAINS)),
        refresh_policy: values
            .get(KEY_REFRESH_POLICY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(defaults.refresh_policy),
        back_behavior: values
            .get(KEY_BACK_BEHAVIOR)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(defaults.back_behavior),
        foreground_service: bool_or(KEY_FOREGROUND_SERVICE, defaults.foreground_service),
        debug_mode: bool_or(KEY_DEBUG_WEBVIEW, defaults.debug_mode),
    })
}
