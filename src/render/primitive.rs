//! Drawing primitives and the painter seam

use crate::color::Rgba;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Square of side `side` centred on `center`
    pub fn centered(center: Point, side: f32) -> Self {
        Self {
            x: center.x - side / 2.0,
            y: center.y - side / 2.0,
            width: side,
            height: side,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Round,
    /// Extends past each end by half the stroke width
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Rgba,
    pub width: f32,
    pub cap: LineCap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        pen: Pen,
    },
    /// Ellipse inscribed in `bounds`
    Ellipse {
        bounds: Rect,
        stroke: Option<Pen>,
        fill: Option<Rgba>,
    },
    Rect {
        bounds: Rect,
        stroke: Option<Pen>,
        fill: Option<Rgba>,
    },
}

impl Primitive {
    /// Circle of `radius` around `center`
    pub fn circle(center: Point, radius: f32, stroke: Option<Pen>, fill: Option<Rgba>) -> Self {
        Primitive::Ellipse {
            bounds: Rect::centered(center, radius * 2.0),
            stroke,
            fill,
        }
    }

    pub fn paint(&self, surface: &mut impl Surface) {
        match self {
            Primitive::Line { from, to, pen } => surface.line(*from, *to, pen),
            Primitive::Ellipse { bounds, stroke, fill } => {
                surface.ellipse(*bounds, stroke.as_ref(), *fill)
            }
            Primitive::Rect { bounds, stroke, fill } => surface.rect(*bounds, stroke.as_ref(), *fill),
        }
    }
}

/// Target that primitives are replayed onto
pub trait Surface {
    fn line(&mut self, from: Point, to: Point, pen: &Pen);
    fn ellipse(&mut self, bounds: Rect, stroke: Option<&Pen>, fill: Option<Rgba>);
    fn rect(&mut self, bounds: Rect, stroke: Option<&Pen>, fill: Option<Rgba>);
}

/// Replay a whole frame in order
pub fn paint_all(primitives: &[Primitive], surface: &mut impl Surface) {
    for primitive in primitives {
        primitive.paint(surface);
    }
}
