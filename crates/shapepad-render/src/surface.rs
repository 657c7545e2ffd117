//! Drawing surface abstraction.

use kurbo::{Arc, BezPath, Point, Vec2};
use shapepad_core::TextMeasure;

/// Flattening tolerance for arcs, in surface pixels.
const ARC_TOLERANCE: f64 = 0.1;

/// An immediate-mode 2D surface with a single current path.
///
/// Text width comes from the same fonts `fill_text` draws with, which is
/// why every surface is also a [`TextMeasure`].
pub trait DrawingSurface: TextMeasure {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Stroke width for subsequent `stroke` calls.
    fn set_line_width(&mut self, width: f64);

    /// Font size for subsequent `fill_text` calls and measurements.
    fn set_font_size(&mut self, size: f64);

    /// Discard the current path and start a new one.
    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Add a circular arc, joined to the current path with a straight line.
    /// Angles are in radians, clockwise on a y-down surface.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, sweep_angle: f64);

    /// Stroke the current path with the current line width.
    fn stroke(&mut self);

    /// Fill `text` with its baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point);
}

/// Append an arc to `path` the way a canvas does: move to the arc start if
/// the path is empty, otherwise draw a line to it.
pub(crate) fn append_arc(
    path: &mut BezPath,
    center: Point,
    radius: f64,
    start_angle: f64,
    sweep_angle: f64,
) {
    let start = center + Vec2::from_angle(start_angle) * radius;
    if path.elements().is_empty() {
        path.move_to(start);
    } else {
        path.line_to(start);
    }
    let arc = Arc::new(center, (radius, radius), start_angle, sweep_angle, 0.0);
    path.extend(arc.append_iter(ARC_TOLERANCE));
}
