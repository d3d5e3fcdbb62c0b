// Weblauncher services
// Services provide settings storage, the navigation whitelist, the file chooser bridge and host collaborators.

pub mod collaborators;
pub mod file_chooser;
pub mod navigation_policy;
pub mod settings_store;
