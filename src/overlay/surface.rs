//! egui painter adapter for reticle primitives

use std::f32::consts::PI;

use egui::{Color32, Painter, Pos2, Shape, Stroke, StrokeKind, Vec2};

use crate::color::Rgba;
use crate::render::{LineCap, Pen, Point, Rect, Surface};

/// Points per semicircular line cap
const ROUND_CAP_SEGMENTS: usize = 8;

pub struct EguiSurface {
    painter: Painter,
}

impl EguiSurface {
    pub fn new(painter: Painter) -> Self {
        Self { painter }
    }
}

fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.alpha_u8())
}

fn to_stroke(pen: &Pen) -> Stroke {
    Stroke::new(pen.width, to_color32(pen.color))
}

fn to_pos(point: Point) -> Pos2 {
    Pos2::new(point.x, point.y)
}

fn to_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(Pos2::new(rect.x, rect.y), Vec2::new(rect.width, rect.height))
}

/// Push both ends of a segment outward by `by` along its direction
fn extend_segment(from: Point, to: Point, by: f32) -> (Point, Point) {
    let length = from.distance(to);
    if length <= f32::EPSILON {
        return (from, to);
    }
    let ux = (to.x - from.x) / length * by;
    let uy = (to.y - from.y) / length * by;
    (
        Point::new(from.x - ux, from.y - uy),
        Point::new(to.x + ux, to.y + uy),
    )
}

/// Stadium outline of a segment with semicircular ends, clockwise on screen
///
/// A zero-length segment degenerates to a circle of `radius` around `from`.
fn round_capped_outline(from: Point, to: Point, radius: f32) -> Vec<Pos2> {
    let length = from.distance(to);
    let (ux, uy) = if length <= f32::EPSILON {
        (1.0, 0.0)
    } else {
        ((to.x - from.x) / length, (to.y - from.y) / length)
    };
    let (nx, ny) = (uy, -ux);

    let mut points = Vec::with_capacity(2 * (ROUND_CAP_SEGMENTS + 1));
    for (center, sign) in [(to, 1.0), (from, -1.0)] {
        for step in 0..=ROUND_CAP_SEGMENTS {
            let angle = step as f32 / ROUND_CAP_SEGMENTS as f32 * PI;
            let (sin, cos) = angle.sin_cos();
            points.push(Pos2::new(
                center.x + sign * radius * (nx * cos + ux * sin),
                center.y + sign * radius * (ny * cos + uy * sin),
            ));
        }
    }
    points
}

impl Surface for EguiSurface {
    fn line(&mut self, from: Point, to: Point, pen: &Pen) {
        match pen.cap {
            LineCap::Square => {
                let (from, to) = extend_segment(from, to, pen.width / 2.0);
                self.painter.line_segment([to_pos(from), to_pos(to)], to_stroke(pen));
            }
            // One filled shape so translucent caps never overlap the stroke
            LineCap::Round => {
                let outline = round_capped_outline(from, to, pen.width / 2.0);
                self.painter
                    .add(Shape::convex_polygon(outline, to_color32(pen.color), Stroke::NONE));
            }
        }
    }

    fn ellipse(&mut self, bounds: Rect, stroke: Option<&Pen>, fill: Option<Rgba>) {
        let center = to_pos(bounds.center());
        let radius = Vec2::new(bounds.width / 2.0, bounds.height / 2.0);
        if let Some(fill) = fill {
            self.painter.add(Shape::ellipse_filled(center, radius, to_color32(fill)));
        }
        if let Some(pen) = stroke {
            self.painter.add(Shape::ellipse_stroke(center, radius, to_stroke(pen)));
        }
    }

    fn rect(&mut self, bounds: Rect, stroke: Option<&Pen>, fill: Option<Rgba>) {
        let rect = to_rect(bounds);
        if let Some(fill) = fill {
            self.painter.rect_filled(rect, 0.0, to_color32(fill));
        }
        if let Some(pen) = stroke {
            // Centred on the edge, like a pen stroke
            self.painter.rect_stroke(rect, 0.0, to_stroke(pen), StrokeKind::Middle);
        }
    }
}
