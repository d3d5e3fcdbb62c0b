//! Weblauncher: a multi-window web-session launcher.
//!
//! Each configured window owns one rendering session; a bounded pool keeps at
//! most `max_alive` of them attached to a surface. This library crate exposes
//! all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod engine;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
