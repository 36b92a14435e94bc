//! Input plumbing for the host: the actuator backend and terminal hotkeys

pub mod backend;
pub mod hotkeys;

pub use backend::select_backend;
pub use hotkeys::spawn_hotkey_reader;
