//! Transparent fullscreen overlay implemented with egui/eframe

mod state;
mod surface;

pub use state::OverlayState;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use eframe::{egui, NativeOptions};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigWatcher, ReticleConfig};
use crate::constants::{timing, window};
use crate::platform::{self, ClickThrough};
use crate::render::paint_all;
use surface::EguiSurface;

struct OverlayApp {
    state: OverlayState,
    platform: Box<dyn ClickThrough>,
    platform_attempts: u32,
    platform_ready: bool,
    shutdown: Arc<AtomicBool>,
}

impl OverlayApp {
    fn new(state: OverlayState, platform: Box<dyn ClickThrough>, shutdown: Arc<AtomicBool>) -> Self {
        info!("Initializing overlay window");
        Self {
            state,
            platform,
            platform_attempts: 0,
            platform_ready: false,
            shutdown,
        }
    }

    /// Retry the platform setup until the native window shows up
    fn apply_platform(&mut self, ctx: &egui::Context) {
        if self.platform_ready || self.platform_attempts >= timing::CLICK_THROUGH_MAX_ATTEMPTS {
            return;
        }
        self.platform_attempts += 1;

        match self.platform.apply(ctx) {
            Ok(true) => self.platform_ready = true,
            Ok(false) if self.platform_attempts == timing::CLICK_THROUGH_MAX_ATTEMPTS => {
                warn!(attempts = self.platform_attempts, "Gave up waiting for overlay window, input may not pass through");
            }
            Ok(false) => {}
            Err(err) => {
                error!(error = ?err, "Failed to make overlay click-through");
                self.platform_attempts = timing::CLICK_THROUGH_MAX_ATTEMPTS;
            }
        }
    }

    fn platform_pending(&self) -> bool {
        !self.platform_ready && self.platform_attempts < timing::CLICK_THROUGH_MAX_ATTEMPTS
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.shutdown.load(Ordering::Relaxed) {
            info!("Shutdown signal received");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.apply_platform(ctx);

        let now = Instant::now();
        if self.state.poll_config(now) {
            debug!(style = self.state.config().style.as_str(), "Config changed, redrawing");
        }

        let screen = ctx.content_rect();
        let frame = self.state.frame(screen.width(), screen.height(), now);
        let mut surface = EguiSurface::new(ctx.layer_painter(egui::LayerId::background()));
        paint_all(&frame, &mut surface);

        let mut wake = self.state.next_wake(Instant::now());
        if self.platform_pending() {
            wake = wake.min(timing::RENDER_TICK);
        }
        ctx.request_repaint_after(wake);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Overlay exiting");
    }
}

/// SIGINT/SIGTERM flip a flag the UI thread checks every update
fn register_shutdown_signals() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    register_signal_flags(&flag);
    flag
}

#[cfg(unix)]
fn register_signal_flags(flag: &Arc<AtomicBool>) {
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        if let Err(err) = signal_hook::flag::register(signal, Arc::clone(flag)) {
            warn!(signal, error = %err, "Failed to register signal handler");
        }
    }
}

#[cfg(not(unix))]
fn register_signal_flags(_flag: &Arc<AtomicBool>) {}

pub fn run_overlay(config_path: PathBuf, config: ReticleConfig) -> Result<()> {
    let started = Instant::now();
    let watcher = ConfigWatcher::new(config_path.clone(), timing::CONFIG_CHECK_INTERVAL, started);
    let state = OverlayState::new(config, watcher, started);
    let platform = platform::detect();
    let shutdown = register_shutdown_signals();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(window::TITLE)
            .with_app_id(window::APP_ID)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_mouse_passthrough(true)
            .with_taskbar(false)
            .with_fullscreen(true),
        ..Default::default()
    };

    let file_name = config_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config_path.display().to_string());
    println!(
        "Overlay started using eframe/glow ({}). Editing {file_name} will update the overlay.",
        platform.backend()
    );

    eframe::run_native(
        window::TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(OverlayApp::new(state, platform, shutdown)))),
    )
    .map_err(|err| anyhow!("Failed to launch overlay window: {err}"))
}
