//! Overlay runtime state
//!
//! Owns the live config snapshot, the start instant and the config watcher.
//! Everything runs on the UI thread; a reload swaps the whole snapshot in a
//! single assignment, so a frame never sees a mix of old and new fields.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::{ConfigWatcher, ReticleConfig};
use crate::constants::timing;
use crate::render::{self, Primitive};

pub struct OverlayState {
    config: ReticleConfig,
    watcher: ConfigWatcher,
    started: Instant,
}

impl OverlayState {
    pub fn new(config: ReticleConfig, watcher: ConfigWatcher, started: Instant) -> Self {
        Self {
            config,
            watcher,
            started,
        }
    }

    pub fn config(&self) -> &ReticleConfig {
        &self.config
    }

    pub fn elapsed(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started).as_secs_f64()
    }

    pub fn replace_config(&mut self, config: ReticleConfig) {
        self.config = config;
    }

    /// Run the watcher if due; true when a new snapshot was swapped in
    pub fn poll_config(&mut self, now: Instant) -> bool {
        match self.watcher.poll(now) {
            Some(config) => {
                debug!(animated = config.modules.is_animated(), "Publishing new reticle config");
                self.replace_config(config);
                true
            }
            None => false,
        }
    }

    pub fn tick_wants_redraw(&self) -> bool {
        render::tick_wants_redraw(&self.config)
    }

    /// How long the event loop may sleep before the next tick or config check
    pub fn next_wake(&self, now: Instant) -> Duration {
        let until_check = self.watcher.time_until_due(now);
        if self.tick_wants_redraw() {
            timing::RENDER_TICK.min(until_check)
        } else {
            until_check
        }
    }

    pub fn frame(&self, width: f32, height: f32, now: Instant) -> Vec<Primitive> {
        render::build_frame(&self.config, width, height, self.elapsed(now))
    }
}
