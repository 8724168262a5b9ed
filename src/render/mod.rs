//! Reticle rendering core
//!
//! Pure per-frame arithmetic: config + window size + elapsed time in,
//! ordered drawing primitives out. Nothing here touches a real display.

pub mod frame;
pub mod primitive;
pub mod visual;

pub use frame::{build_frame, tick_wants_redraw};
pub use primitive::{paint_all, LineCap, Pen, Point, Primitive, Rect, Surface};
