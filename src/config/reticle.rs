//! Resolved reticle configuration
//!
//! `ReticleConfig` is the immutable snapshot the renderer reads. It is built
//! once per load from a `ConfigFile` and replaced wholesale on reload.

use serde::{Serialize, Serializer};

use crate::color::HexColor;
use crate::constants::config::*;

/// Primitive shape drawn at the anchor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Cross,
    Dot,
    Circle,
    Square,
    /// Unrecognised style name; draws nothing
    Unknown(String),
}

impl Style {
    pub fn parse(name: &str) -> Self {
        match name {
            "cross" => Style::Cross,
            "dot" => Style::Dot,
            "circle" => Style::Circle,
            "square" => Style::Square,
            other => Style::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Style::Cross => "cross",
            Style::Dot => "dot",
            Style::Circle => "circle",
            Style::Square => "square",
            Style::Unknown(name) => name,
        }
    }
}

impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Independently toggleable visual behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Modules {
    pub dynamic_color: bool,
    pub outline: bool,
    pub center_dot: bool,
    pub pulsing: bool,
}

impl Default for Modules {
    fn default() -> Self {
        Self {
            dynamic_color: false,
            outline: false,
            center_dot: true,
            pulsing: false,
        }
    }
}

impl Modules {
    /// True when the frame changes with time and must be redrawn every tick
    pub fn is_animated(&self) -> bool {
        self.pulsing || self.dynamic_color
    }
}

/// Fully populated reticle settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReticleConfig {
    pub style: Style,
    pub size: i32,
    pub thickness: i32,
    pub gap: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub color: HexColor,
    /// Raw configured opacity; clamped to [0,1] at use
    pub opacity: f32,
    pub modules: Modules,
}

impl Default for ReticleConfig {
    fn default() -> Self {
        Self {
            style: Style::Cross,
            size: DEFAULT_SIZE,
            thickness: DEFAULT_THICKNESS,
            gap: DEFAULT_GAP,
            offset_x: DEFAULT_OFFSET,
            offset_y: DEFAULT_OFFSET,
            color: default_color(),
            opacity: DEFAULT_OPACITY,
            modules: Modules::default(),
        }
    }
}

impl ReticleConfig {
    pub fn clamped_opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0)
    }

    /// Stroke width for the main shape
    pub fn stroke_width(&self) -> f32 {
        self.thickness.max(1) as f32
    }
}

pub(crate) fn default_color() -> HexColor {
    HexColor::parse(DEFAULT_COLOR).unwrap_or(HexColor::rgb(0x00, 0xFF, 0x41))
}
