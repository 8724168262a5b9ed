//! Reticle frame construction
//!
//! `build_frame` turns a config snapshot, the window size and the elapsed
//! time into the ordered primitive list for one frame: main shape first,
//! then the centre dot, then the outline.

use crate::color::HexColor;
use crate::config::{ReticleConfig, Style};
use crate::constants::outline;

use super::primitive::{LineCap, Pen, Point, Primitive, Rect};
use super::visual::VisualState;

/// Screen-space reticle centre after offsets
pub fn anchor(config: &ReticleConfig, width: f32, height: f32) -> Point {
    Point::new(
        width / 2.0 + config.offset_x as f32,
        height / 2.0 + config.offset_y as f32,
    )
}

/// Whether a fixed-rate tick should redraw; static reticles only redraw on reload
pub fn tick_wants_redraw(config: &ReticleConfig) -> bool {
    config.modules.is_animated()
}

pub fn build_frame(config: &ReticleConfig, width: f32, height: f32, elapsed: f64) -> Vec<Primitive> {
    let visual = VisualState::at(config, elapsed);
    let center = anchor(config, width, height);

    let mut frame = Vec::with_capacity(7);
    push_shape(&mut frame, config, &visual, center);
    if config.modules.outline {
        push_outline(&mut frame, config, center);
    }
    frame
}

fn push_shape(frame: &mut Vec<Primitive>, config: &ReticleConfig, visual: &VisualState, center: Point) {
    let pen = Pen {
        color: visual.color,
        width: config.stroke_width(),
        cap: LineCap::Round,
    };
    let extent = (f64::from(config.size) * visual.scale) as f32;
    let gap = config.gap as f32;

    match &config.style {
        Style::Cross => {
            let half = extent / 2.0;
            for (dx, dy) in [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)] {
                frame.push(Primitive::Line {
                    from: Point::new(center.x + dx * gap, center.y + dy * gap),
                    to: Point::new(center.x + dx * (gap + half), center.y + dy * (gap + half)),
                    pen,
                });
            }
            if config.modules.center_dot {
                frame.push(Primitive::circle(center, config.stroke_width() / 2.0, None, Some(visual.color)));
            }
        }
        Style::Dot => frame.push(Primitive::circle(center, extent / 2.0, None, Some(visual.color))),
        Style::Circle => frame.push(Primitive::circle(center, extent / 2.0, Some(pen), None)),
        Style::Square => frame.push(Primitive::Rect {
            bounds: Rect::centered(center, extent),
            stroke: Some(pen),
            fill: None,
        }),
        Style::Unknown(_) => {}
    }
}

/// Dark outline at the unpulsed base size
fn push_outline(frame: &mut Vec<Primitive>, config: &ReticleConfig, center: Point) {
    let alpha = (config.clamped_opacity() * outline::ALPHA_FACTOR).max(outline::MIN_ALPHA);
    let pen = Pen {
        color: HexColor::BLACK.with_alpha(alpha),
        width: outline::STROKE_WIDTH,
        cap: LineCap::Square,
    };
    let size = config.size as f32;

    match &config.style {
        Style::Cross => {
            let reach = size / 2.0 + config.gap as f32;
            frame.push(Primitive::Line {
                from: Point::new(center.x - reach, center.y),
                to: Point::new(center.x + reach, center.y),
                pen,
            });
            frame.push(Primitive::Line {
                from: Point::new(center.x, center.y - reach),
                to: Point::new(center.x, center.y + reach),
                pen,
            });
        }
        Style::Dot | Style::Circle => frame.push(Primitive::circle(center, size / 2.0, Some(pen), None)),
        Style::Square => frame.push(Primitive::Rect {
            bounds: Rect::centered(center, size),
            stroke: Some(pen),
            fill: None,
        }),
        Style::Unknown(_) => {}
    }
}
