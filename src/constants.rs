//! Application-wide constants
//!
//! Every magic number used by the renderer, the config watcher and the
//! overlay window lives here, grouped by the concern that owns it.

/// Event loop timing
pub mod timing {
    use std::time::Duration;

    /// Render tick while an animated module is active (~60 Hz)
    pub const RENDER_TICK: Duration = Duration::from_millis(16);

    /// Config file modification check interval (~2.5 Hz)
    pub const CONFIG_CHECK_INTERVAL: Duration = Duration::from_millis(400);

    /// Frames to keep retrying the platform click-through setup while the
    /// native window is not yet mapped
    pub const CLICK_THROUGH_MAX_ATTEMPTS: u32 = 120;
}

/// Hue cycling (dynamicColor module)
pub mod hue {
    /// Hue advance in degrees per second
    pub const DEGREES_PER_SECOND: f64 = 60.0;

    pub const FULL_TURN: f64 = 360.0;
}

/// Size pulsing (pulsing module)
pub mod pulse {
    /// Seconds per full pulse cycle
    pub const PERIOD_SECS: f64 = 1.2;

    /// Scale at the trough of the pulse
    pub const MIN_SCALE: f64 = 0.9;

    /// Distance from trough to crest
    pub const SCALE_RANGE: f64 = 0.2;
}

/// Outline module appearance
pub mod outline {
    pub const STROKE_WIDTH: f32 = 2.0;

    /// Outline alpha never drops below this, even at zero opacity
    pub const MIN_ALPHA: f32 = 0.2;

    /// Outline alpha relative to the reticle opacity
    pub const ALPHA_FACTOR: f32 = 0.7;
}

/// Config file defaults and location
pub mod config {
    /// File name, resolved next to the executable
    pub const FILENAME: &str = "config.json";

    pub const DEFAULT_SIZE: i32 = 20;
    pub const DEFAULT_THICKNESS: i32 = 2;
    pub const DEFAULT_GAP: i32 = 3;
    pub const DEFAULT_OFFSET: i32 = 0;
    pub const DEFAULT_COLOR: &str = "#00ff41";
    pub const DEFAULT_OPACITY: f32 = 1.0;
}

/// Overlay window identity
pub mod window {
    pub const APP_ID: &str = "reticle-overlay";
    pub const TITLE: &str = "Crosshair Overlay";
}

/// X11 protocol constants (EWMH)
#[cfg(all(unix, not(target_os = "macos")))]
pub mod x11 {
    /// _NET_WM_STATE action: add the property
    pub const NET_WM_STATE_ADD: u32 = 1;

    /// Source indication for EWMH client messages (1 = normal application)
    pub const SOURCE_APPLICATION: u32 = 1;
}
