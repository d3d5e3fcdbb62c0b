// Weblauncher state managers
// Managers hold stateful parts of the launcher: the window list, persisted window state and the session pool.

pub mod session_pool;
pub mod window_repository;
pub mod window_state_store;
