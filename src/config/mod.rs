//! Configuration management for the reticle overlay
//!
//! - **file**: lenient `config.json` parsing and loading
//! - **reticle**: the resolved, immutable `ReticleConfig` snapshot
//! - **watcher**: modification-time polling and whole-object reload

pub mod file;
pub mod reticle;
pub mod watcher;

pub use file::{config_path, load_or_default, write_config};
pub use reticle::{ReticleConfig, Style};
pub use watcher::ConfigWatcher;
