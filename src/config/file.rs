//! On-disk `config.json` format
//!
//! The file is parsed leniently: every field is captured as a `Field`, so a
//! single bad value only costs that value its setting. `build_reticle_config`
//! then resolves the raw file into an immutable `ReticleConfig`.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::color::HexColor;
use crate::config::reticle::{default_color, Modules, ReticleConfig, Style};
use crate::constants::config::*;

/// Whole-file failures; both fall back to the default configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One raw field from the file
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Missing,
    Valid(T),
    /// Present but unusable even after coercion
    Invalid(Value),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T: Clone> Field<T> {
    /// Take the valid value, or the default (warning when the value was bad)
    fn resolve(&self, name: &str, default: T) -> T {
        self.resolve_if(name, default, |_| true)
    }

    /// Like `resolve`, but a valid value that fails `accept` also falls back
    fn resolve_if(&self, name: &str, default: T, accept: impl Fn(&T) -> bool) -> T {
        match self {
            Field::Missing => default,
            Field::Valid(value) if accept(value) => value.clone(),
            Field::Valid(_) => {
                warn!(field = name, "config value out of range, using default");
                default
            }
            Field::Invalid(raw) => {
                warn!(field = name, value = %raw, "invalid config value, using default");
                default
            }
        }
    }
}

/// Conversion from an arbitrary JSON value, with numeric coercion
trait Coerce: Sized {
    fn coerce(value: &Value) -> Option<Self>;
}

impl Coerce for i32 {
    fn coerce(value: &Value) -> Option<Self> {
        let number = match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => return i32::try_from(i).ok(),
                None => n.as_f64()?,
            },
            Value::String(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(i) => return i32::try_from(i).ok(),
                    Err(_) => s.parse::<f64>().ok()?,
                }
            }
            _ => return None,
        };

        // Fractional values truncate toward zero
        let truncated = number.trunc();
        if truncated.is_finite() && truncated >= i32::MIN as f64 && truncated <= i32::MAX as f64 {
            Some(truncated as i32)
        } else {
            None
        }
    }
}

impl Coerce for f32 {
    fn coerce(value: &Value) -> Option<Self> {
        let number = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number as f32)
    }
}

impl Coerce for bool {
    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            _ => None,
        }
    }
}

impl Coerce for HexColor {
    fn coerce(value: &Value) -> Option<Self> {
        value.as_str().and_then(HexColor::parse)
    }
}

impl Coerce for Style {
    fn coerce(value: &Value) -> Option<Self> {
        value.as_str().map(Style::parse)
    }
}

impl Coerce for ModulesFile {
    fn coerce(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Deserializer that never fails on a bad value; it records it instead
fn lenient<'de, D, T>(deserializer: D) -> Result<Field<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Coerce,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match T::coerce(&raw) {
        Some(value) => Field::Valid(value),
        None => Field::Invalid(raw),
    })
}

/// Raw `modules` object
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulesFile {
    #[serde(default, deserialize_with = "lenient")]
    pub dynamic_color: Field<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub outline: Field<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub center_dot: Field<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub pulsing: Field<bool>,
}

impl ModulesFile {
    fn build_modules(&self) -> Modules {
        let defaults = Modules::default();
        Modules {
            dynamic_color: self.dynamic_color.resolve("modules.dynamicColor", defaults.dynamic_color),
            outline: self.outline.resolve("modules.outline", defaults.outline),
            center_dot: self.center_dot.resolve("modules.centerDot", defaults.center_dot),
            pulsing: self.pulsing.resolve("modules.pulsing", defaults.pulsing),
        }
    }
}

/// Raw `config.json` contents, one `Field` per setting
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, deserialize_with = "lenient")]
    pub style: Field<Style>,
    #[serde(default, deserialize_with = "lenient")]
    pub size: Field<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub thickness: Field<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub gap: Field<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub offset_x: Field<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub offset_y: Field<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub color: Field<HexColor>,
    #[serde(default, deserialize_with = "lenient")]
    pub opacity: Field<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub modules: Field<ModulesFile>,
}

impl ConfigFile {
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve every field, substituting defaults for missing or bad values
    pub fn build_reticle_config(&self) -> ReticleConfig {
        let modules = match &self.modules {
            Field::Valid(modules) => modules.build_modules(),
            Field::Missing => Modules::default(),
            Field::Invalid(raw) => {
                warn!(field = "modules", value = %raw, "modules is not an object, using defaults");
                Modules::default()
            }
        };

        ReticleConfig {
            style: self.style.resolve("style", Style::Cross),
            size: self.size.resolve_if("size", DEFAULT_SIZE, |size| *size > 0),
            thickness: self.thickness.resolve("thickness", DEFAULT_THICKNESS),
            gap: self.gap.resolve_if("gap", DEFAULT_GAP, |gap| *gap >= 0),
            offset_x: self.offset_x.resolve("offsetX", DEFAULT_OFFSET),
            offset_y: self.offset_y.resolve("offsetY", DEFAULT_OFFSET),
            color: self.color.resolve("color", default_color()),
            opacity: self.opacity.resolve("opacity", DEFAULT_OPACITY),
            modules,
        }
    }
}

/// `config.json` next to the running executable
pub fn config_path() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(FILENAME)
}

pub fn load(path: &Path) -> Result<ReticleConfig, ConfigError> {
    ConfigFile::read(path).map(|file| file.build_reticle_config())
}

/// Load the config, degrading to the defaults on any whole-file failure
pub fn load_or_default(path: &Path) -> ReticleConfig {
    match load(path) {
        Ok(config) => {
            debug!(path = %path.display(), config = ?config, "Loaded reticle config");
            config
        }
        Err(ConfigError::Read { path, source }) if source.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file, using defaults");
            ReticleConfig::default()
        }
        Err(err) => {
            let source = std::error::Error::source(&err).map(ToString::to_string).unwrap_or_default();
            warn!(error = %err, cause = %source, "Config unusable, using defaults");
            ReticleConfig::default()
        }
    }
}

/// Write `config` as pretty JSON so users have a file to edit
pub fn write_config(path: &Path, config: &ReticleConfig) -> Result<()> {
    let contents = serde_json::to_string_pretty(config)
        .context("Failed to serialize reticle config")?;
    fs::write(path, contents + "\n")
        .context(format!("Failed to write config to {}", path.display()))?;
    info!(path = %path.display(), "Generated default config file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ReticleConfig {
        ConfigFile::from_json(json).unwrap().build_reticle_config()
    }

    #[test]
    fn test_full_file() {
        let config = parse(
            r##"{
                "style": "square", "size": 32, "thickness": 4, "gap": 0,
                "offsetX": -5, "offsetY": 12, "color": "#ff0000", "opacity": 0.5,
                "modules": { "dynamicColor": true, "outline": true,
                             "centerDot": false, "pulsing": true }
            }"##,
        );

        assert_eq!(config.style, Style::Square);
        assert_eq!(config.size, 32);
        assert_eq!(config.thickness, 4);
        assert_eq!(config.gap, 0);
        assert_eq!(config.offset_x, -5);
        assert_eq!(config.offset_y, 12);
        assert_eq!(config.color, HexColor::rgb(255, 0, 0));
        assert_eq!(config.opacity, 0.5);
        assert_eq!(
            config.modules,
            Modules { dynamic_color: true, outline: true, center_dot: false, pulsing: true }
        );
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(parse("{}"), ReticleConfig::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(ConfigFile::from_json("{ \"size\": ").is_err());
        assert!(ConfigFile::from_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_bad_field_keeps_the_rest() {
        let config = parse(r#"{ "size": "huge", "gap": 7, "color": "not a colour" }"#);
        assert_eq!(config.size, DEFAULT_SIZE);
        assert_eq!(config.gap, 7);
        assert_eq!(config.color, default_color());
    }

    #[test]
    fn test_numeric_coercion() {
        let config = parse(r#"{ "size": 24.9, "thickness": "3", "offsetX": "-4.5", "opacity": "0.25" }"#);
        assert_eq!(config.size, 24);
        assert_eq!(config.thickness, 3);
        assert_eq!(config.offset_x, -4);
        assert_eq!(config.opacity, 0.25);
    }

    #[test]
    fn test_out_of_range_values() {
        let config = parse(r#"{ "size": -10, "gap": -1, "offsetY": 99999999999 }"#);
        assert_eq!(config.size, DEFAULT_SIZE);
        assert_eq!(config.gap, DEFAULT_GAP);
        assert_eq!(config.offset_y, DEFAULT_OFFSET);
    }

    #[test]
    fn test_opacity_kept_raw() {
        // Clamping happens at draw time, not at load time
        let config = parse(r#"{ "opacity": 1.5 }"#);
        assert_eq!(config.opacity, 1.5);
        assert_eq!(config.clamped_opacity(), 1.0);
    }

    #[test]
    fn test_null_falls_back() {
        let config = parse(r#"{ "thickness": null, "style": null }"#);
        assert_eq!(config.thickness, DEFAULT_THICKNESS);
        assert_eq!(config.style, Style::Cross);
    }

    #[test]
    fn test_unknown_style_is_kept() {
        let config = parse(r#"{ "style": "hexagon" }"#);
        assert_eq!(config.style, Style::Unknown("hexagon".to_string()));
    }

    #[test]
    fn test_non_string_style_falls_back() {
        let config = parse(r#"{ "style": 3 }"#);
        assert_eq!(config.style, Style::Cross);
    }

    #[test]
    fn test_partial_modules_use_module_defaults() {
        let config = parse(r#"{ "modules": { "outline": true } }"#);
        assert!(config.modules.outline);
        assert!(config.modules.center_dot);
        assert!(!config.modules.pulsing);
    }

    #[test]
    fn test_module_coercion() {
        let config = parse(r#"{ "modules": { "pulsing": 1, "centerDot": 0, "outline": "yes" } }"#);
        assert!(config.modules.pulsing);
        assert!(!config.modules.center_dot);
        assert!(!config.modules.outline);
    }

    #[test]
    fn test_modules_not_an_object() {
        let config = parse(r#"{ "modules": [true, false] }"#);
        assert_eq!(config.modules, Modules::default());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("config.json"));
        assert_eq!(config, ReticleConfig::default());
    }

    #[test]
    fn test_load_or_default_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ this is not json").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(load_or_default(&path), ReticleConfig::default());
    }

    #[test]
    fn test_load_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(&dir.path().join("nope.json")), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = ReticleConfig {
            style: Style::Circle,
            size: 40,
            opacity: 0.75,
            ..ReticleConfig::default()
        };

        write_config(&path, &config).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }
}
