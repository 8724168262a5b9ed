#![forbid(unsafe_code)]

mod color;
mod config;
mod constants;
mod overlay;
mod platform;
mod render;

use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = config::config_path();
    let reticle = config::load_or_default(&config_path);
    info!(path = %config_path.display(), config = ?reticle, "Loaded reticle config");

    // First run: leave an editable file behind
    if !config_path.exists() {
        if let Err(err) = config::write_config(&config_path, &reticle) {
            warn!(error = ?err, "Could not write default config");
        }
    }

    overlay::run_overlay(config_path, reticle)?;
    Ok(())
}
