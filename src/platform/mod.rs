//! Platform mechanics for the click-through, topmost overlay window
//!
//! The renderer never sees any of this. One capability is exposed: make the
//! overlay window ignore input and stay above everything else.

#[cfg(all(unix, not(target_os = "macos")))]
mod x11;

use anyhow::Result;
use eframe::egui;
use tracing::info;

pub trait ClickThrough {
    /// Human-readable backend name for the startup line
    fn backend(&self) -> &'static str;

    /// Apply the window flags
    ///
    /// `Ok(false)` means the native window is not available yet and the
    /// caller should try again on a later frame.
    fn apply(&mut self, ctx: &egui::Context) -> Result<bool>;
}

/// Portable implementation through winit viewport commands
#[derive(Debug, Default)]
pub struct ViewportClickThrough;

impl ClickThrough for ViewportClickThrough {
    fn backend(&self) -> &'static str {
        "winit"
    }

    fn apply(&mut self, ctx: &egui::Context) -> Result<bool> {
        ctx.send_viewport_cmd(egui::ViewportCommand::MousePassthrough(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(egui::WindowLevel::AlwaysOnTop));
        Ok(true)
    }
}

/// Pick the most capable implementation for the running session
pub fn detect() -> Box<dyn ClickThrough> {
    let platform = native().unwrap_or_else(|| Box::new(ViewportClickThrough));
    info!(backend = platform.backend(), "Selected click-through backend");
    platform
}

#[cfg(all(unix, not(target_os = "macos")))]
fn native() -> Option<Box<dyn ClickThrough>> {
    // XWayland windows cannot be reshaped reliably; leave Wayland to winit
    if std::env::var_os("WAYLAND_DISPLAY").is_some() || std::env::var_os("DISPLAY").is_none() {
        return None;
    }

    match x11::X11ClickThrough::connect() {
        Ok(platform) => Some(Box::new(platform)),
        Err(err) => {
            tracing::warn!(error = ?err, "X11 setup failed, falling back to viewport commands");
            None
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn native() -> Option<Box<dyn ClickThrough>> {
    None
}
