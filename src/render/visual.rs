//! Time-dependent visual parameters
//!
//! Everything here is a pure function of the config and the elapsed time in
//! seconds, so frames can be reproduced exactly in tests.

use std::f64::consts::TAU;

use crate::color::{HexColor, Rgba};
use crate::config::ReticleConfig;
use crate::constants::{hue, pulse};

/// Per-frame colour and size scale for the main shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub color: Rgba,
    pub scale: f64,
}

impl VisualState {
    pub fn at(config: &ReticleConfig, elapsed: f64) -> Self {
        Self {
            color: resolve_color(config, elapsed),
            scale: if config.modules.pulsing {
                pulse_scale(elapsed)
            } else {
                1.0
            },
        }
    }
}

/// Hue in whole degrees for the dynamicColor module
pub fn hue_degrees(elapsed: f64) -> u16 {
    (elapsed * hue::DEGREES_PER_SECOND)
        .rem_euclid(hue::FULL_TURN)
        .floor() as u16
}

/// Size multiplier for the pulsing module, within [0.9, 1.1]
pub fn pulse_scale(elapsed: f64) -> f64 {
    let phase = 0.5 + 0.5 * (elapsed * TAU / pulse::PERIOD_SECS).sin();
    pulse::MIN_SCALE + pulse::SCALE_RANGE * phase
}

/// Main shape colour with the clamped opacity as alpha
pub fn resolve_color(config: &ReticleConfig, elapsed: f64) -> Rgba {
    let base = if config.modules.dynamic_color {
        HexColor::from_hsv(f64::from(hue_degrees(elapsed)), 1.0, 1.0)
    } else {
        config.color
    };
    base.with_alpha(config.clamped_opacity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::reticle::Modules;
    use crate::config::Style;

    fn config_with(modules: Modules, opacity: f32) -> ReticleConfig {
        ReticleConfig {
            modules,
            opacity,
            ..ReticleConfig::default()
        }
    }

    #[test]
    fn test_hue_wraps_every_six_seconds() {
        assert_eq!(hue_degrees(0.0), 0);
        assert_eq!(hue_degrees(3.0), 180);
        assert_eq!(hue_degrees(6.0), 0);
        assert_eq!(hue_degrees(1.0), 60);
        assert_eq!(hue_degrees(5.999), 359);
        assert_eq!(hue_degrees(7.5), 90);
    }

    #[test]
    fn test_pulse_is_one_at_start() {
        assert!((pulse_scale(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pulse_bounds() {
        for step in 0..10_000 {
            let t = step as f64 * 0.0037;
            let scale = pulse_scale(t);
            assert!((0.9 - 1e-12..=1.1 + 1e-12).contains(&scale), "t={t} scale={scale}");
        }
        // Crest at a quarter period, trough at three quarters
        assert!((pulse_scale(0.3) - 1.1).abs() < 1e-9);
        assert!((pulse_scale(0.9) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_pulse_period() {
        for step in 0..100 {
            let t = step as f64 * 0.113;
            assert!((pulse_scale(t) - pulse_scale(t + 1.2)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_alpha_is_clamped_opacity_everywhere() {
        let module_sets = [
            Modules::default(),
            Modules { dynamic_color: true, outline: true, center_dot: false, pulsing: true },
            Modules { dynamic_color: true, ..Modules::default() },
        ];
        let styles = [Style::Cross, Style::Dot, Style::Circle, Style::Square, Style::Unknown("x".into())];

        for modules in module_sets {
            for style in &styles {
                for opacity in [-1.0_f32, 0.0, 0.33, 1.0, 4.2] {
                    let config = ReticleConfig { style: style.clone(), ..config_with(modules, opacity) };
                    for t in [0.0, 1.7, 42.0] {
                        assert_eq!(resolve_color(&config, t).a, opacity.clamp(0.0, 1.0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_static_color_used_without_dynamic_module() {
        let config = config_with(Modules::default(), 1.0);
        let color = resolve_color(&config, 3.0);
        assert_eq!((color.r, color.g, color.b), (0x00, 0xFF, 0x41));
    }

    #[test]
    fn test_dynamic_color_overrides_configured() {
        let config = config_with(Modules { dynamic_color: true, ..Modules::default() }, 1.0);
        // t=2 → hue 120 → pure green
        let color = resolve_color(&config, 2.0);
        assert_eq!((color.r, color.g, color.b), (0, 255, 0));
        // t=0 → hue 0 → pure red
        let color = resolve_color(&config, 0.0);
        assert_eq!((color.r, color.g, color.b), (255, 0, 0));
    }

    #[test]
    fn test_visual_state_scale_without_pulse() {
        let config = config_with(Modules::default(), 1.0);
        assert_eq!(VisualState::at(&config, 0.3).scale, 1.0);

        let pulsing = config_with(Modules { pulsing: true, ..Modules::default() }, 1.0);
        assert!((VisualState::at(&pulsing, 0.3).scale - 1.1).abs() < 1e-9);
    }
}
