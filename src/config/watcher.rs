//! Polling config watcher
//!
//! Checks the config file's modification time on a fixed cadence and hands
//! back a complete new `ReticleConfig` whenever it changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info};

use super::file::load_or_default;
use super::reticle::ReticleConfig;

#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    interval: Duration,
    next_check: Instant,
    /// `None` while the file cannot be stat'ed
    last_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    /// Start watching `path`; the current timestamp counts as already seen
    pub fn new(path: PathBuf, interval: Duration, now: Instant) -> Self {
        let last_modified = modified_time(&path);
        Self {
            path,
            interval,
            next_check: now + interval,
            last_modified,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_check
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_check.saturating_duration_since(now)
    }

    /// Check the file if the interval has elapsed
    ///
    /// Returns a freshly loaded snapshot when the modification time changed.
    /// A file that vanished yields the default configuration.
    pub fn poll(&mut self, now: Instant) -> Option<ReticleConfig> {
        if !self.is_due(now) {
            return None;
        }
        self.next_check = now + self.interval;
        self.check()
    }

    /// Check the file regardless of the cadence
    fn check(&mut self) -> Option<ReticleConfig> {
        let modified = modified_time(&self.path);
        if modified == self.last_modified {
            return None;
        }

        debug!(path = %self.path.display(), previous = ?self.last_modified, current = ?modified, "Config timestamp changed");
        self.last_modified = modified;

        let config = load_or_default(&self.path);
        info!(path = %self.path.display(), style = config.style.as_str(), "Reloaded reticle config");
        Some(config)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::reticle::Style;
    use std::fs::File;

    const INTERVAL: Duration = Duration::from_millis(400);

    fn set_mtime(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
    }

    fn write(path: &Path, contents: &str, secs: u64) {
        fs::write(path, contents).unwrap();
        set_mtime(path, secs);
    }

    #[test]
    fn test_no_change_no_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        write(&path, r#"{ "style": "dot" }"#, 1_000);

        let start = Instant::now();
        let mut watcher = ConfigWatcher::new(path, INTERVAL, start);
        assert_eq!(watcher.poll(start + INTERVAL), None);
    }

    #[test]
    fn test_modification_reloads_whole_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        write(&path, r#"{ "style": "dot", "size": 50 }"#, 1_000);

        let start = Instant::now();
        let mut watcher = ConfigWatcher::new(path.clone(), INTERVAL, start);

        write(&path, r#"{ "style": "circle" }"#, 2_000);
        let config = watcher.poll(start + INTERVAL).expect("reload");

        // Fields absent from the new file revert to defaults, not the old values
        assert_eq!(config.style, Style::Circle);
        assert_eq!(config.size, 20);

        // Same timestamp on the next cycle: nothing to do
        assert_eq!(watcher.poll(start + INTERVAL * 2), None);
    }

    #[test]
    fn test_not_due_skips_stat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        write(&path, "{}", 1_000);

        let start = Instant::now();
        let mut watcher = ConfigWatcher::new(path.clone(), INTERVAL, start);
        write(&path, r#"{ "style": "square" }"#, 2_000);

        assert!(!watcher.is_due(start + INTERVAL / 2));
        assert_eq!(watcher.poll(start + INTERVAL / 2), None);
        assert_eq!(watcher.time_until_due(start + INTERVAL / 2), INTERVAL / 2);
        assert!(watcher.poll(start + INTERVAL).is_some());
    }

    #[test]
    fn test_malformed_update_publishes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        write(&path, r#"{ "style": "dot" }"#, 1_000);

        let start = Instant::now();
        let mut watcher = ConfigWatcher::new(path.clone(), INTERVAL, start);
        write(&path, "{ broken", 2_000);

        assert_eq!(watcher.poll(start + INTERVAL), Some(ReticleConfig::default()));
    }

    #[test]
    fn test_deleted_file_publishes_default_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        write(&path, r#"{ "style": "dot" }"#, 1_000);

        let start = Instant::now();
        let mut watcher = ConfigWatcher::new(path.clone(), INTERVAL, start);
        fs::remove_file(&path).unwrap();

        assert_eq!(watcher.poll(start + INTERVAL), Some(ReticleConfig::default()));
        assert_eq!(watcher.poll(start + INTERVAL * 2), None);
    }

    #[test]
    fn test_file_appearing_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let start = Instant::now();
        let mut watcher = ConfigWatcher::new(path.clone(), INTERVAL, start);
        assert_eq!(watcher.poll(start + INTERVAL), None);

        write(&path, r#"{ "style": "square" }"#, 3_000);
        let config = watcher.poll(start + INTERVAL * 2).expect("reload");
        assert_eq!(config.style, Style::Square);
    }
}
