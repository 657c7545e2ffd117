//! Scene renderer.

use crate::surface::DrawingSurface;
use shapepad_core::{Scene, Shape};
use std::f64::consts::TAU;

/// Stroke width used for every outline.
pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;
/// Font size for text labels.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Context for a single render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The scene to draw.
    pub scene: &'a Scene,
    pub stroke_width: f64,
    pub font_size: f64,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }
}

/// Clear the surface and draw every shape, back to front.
///
/// Text is filled, polylines and circles are stroked. The pass only
/// reads the scene, so running it twice produces the same picture.
pub fn render(ctx: &RenderContext, surface: &mut dyn DrawingSurface) {
    surface.clear();
    surface.set_line_width(ctx.stroke_width);
    surface.set_font_size(ctx.font_size);

    for shape in ctx.scene.iter() {
        match shape {
            Shape::Text(text) => surface.fill_text(&text.text, text.position()),
            Shape::Polyline(polyline) => {
                let Some(first) = polyline.points.first() else {
                    log::warn!("Skipping empty polyline {}", polyline.id());
                    continue;
                };
                surface.begin_path();
                surface.move_to(*first);
                for point in &polyline.points {
                    surface.line_to(*point);
                }
                surface.stroke();
            }
            Shape::Circle(circle) => {
                surface.begin_path();
                surface.arc(circle.center(), circle.radius, 0.0, TAU);
                surface.stroke();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use kurbo::{PathEl, Point, Shape as _};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_text("hi", None).unwrap();
        scene
            .add_polyline(vec![
                Point::new(100.0, 100.0),
                Point::new(200.0, 200.0),
                Point::new(300.0, 100.0),
            ])
            .unwrap();
        scene.add_circle(Point::new(400.0, 400.0), 50.0).unwrap();
        scene
    }

    #[test]
    fn test_render_empty_scene_only_clears() {
        let scene = Scene::new();
        let mut surface = RecordingSurface::new();
        render(&RenderContext::new(&scene), &mut surface);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Clear,
                DrawCommand::SetLineWidth(DEFAULT_STROKE_WIDTH),
                DrawCommand::SetFontSize(DEFAULT_FONT_SIZE),
            ]
        );
    }

    #[test]
    fn test_render_draws_in_z_order() {
        let scene = sample_scene();
        let mut surface = RecordingSurface::new();
        render(&RenderContext::new(&scene), &mut surface);

        let commands = &surface.commands()[3..];
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[0],
            DrawCommand::FillText {
                text: "hi".to_string(),
                origin: Point::new(50.0, 50.0),
                font_size: DEFAULT_FONT_SIZE,
            }
        );
        assert!(matches!(commands[1], DrawCommand::Stroke { .. }));
        assert!(matches!(commands[2], DrawCommand::Stroke { .. }));
    }

    #[test]
    fn test_polyline_path_follows_points() {
        let mut scene = Scene::new();
        scene
            .add_polyline(vec![Point::new(100.0, 100.0), Point::new(200.0, 200.0)])
            .unwrap();
        let mut surface = RecordingSurface::new();
        render(&RenderContext::new(&scene), &mut surface);

        let Some(DrawCommand::Stroke { path, width }) = surface.commands().last() else {
            panic!("expected a stroke");
        };
        assert!((width - 5.0).abs() < f64::EPSILON);
        let elements = path.elements();
        assert_eq!(elements[0], PathEl::MoveTo(Point::new(100.0, 100.0)));
        assert_eq!(elements.last(), Some(&PathEl::LineTo(Point::new(200.0, 200.0))));
    }

    #[test]
    fn test_circle_is_full_arc() {
        let mut scene = Scene::new();
        scene.add_circle(Point::new(400.0, 400.0), 50.0).unwrap();
        let mut surface = RecordingSurface::new();
        render(&RenderContext::new(&scene), &mut surface);

        let Some(DrawCommand::Stroke { path, .. }) = surface.commands().last() else {
            panic!("expected a stroke");
        };
        let bounds = path.bounding_box();
        assert!((bounds.x0 - 350.0).abs() < 0.1);
        assert!((bounds.y0 - 350.0).abs() < 0.1);
        assert!((bounds.x1 - 450.0).abs() < 0.1);
        assert!((bounds.y1 - 450.0).abs() < 0.1);
    }

    #[test]
    fn test_render_is_idempotent() {
        let scene = sample_scene();
        let mut surface = RecordingSurface::new();
        render(&RenderContext::new(&scene), &mut surface);
        let first = surface.commands().to_vec();
        render(&RenderContext::new(&scene), &mut surface);
        assert_eq!(surface.commands(), first.as_slice());
    }

    #[test]
    fn test_context_overrides() {
        let scene = Scene::new();
        let ctx = RenderContext::new(&scene)
            .with_stroke_width(2.0)
            .with_font_size(16.0);
        let mut surface = RecordingSurface::new();
        render(&ctx, &mut surface);
        assert_eq!(surface.commands()[1], DrawCommand::SetLineWidth(2.0));
        assert_eq!(surface.commands()[2], DrawCommand::SetFontSize(16.0));
    }
}
