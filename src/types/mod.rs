// Weblauncher shared type definitions
// Each submodule defines types used across the launcher.

pub mod errors;
pub mod session;
pub mod settings;
pub mod window;
