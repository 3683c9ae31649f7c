use egui::{Color32, Pos2, Rect, TextureHandle, TextureOptions, Vec2};

use crate::frame::Frame;

/// Uploads composited frames to the GPU and paints them.
///
/// The texture is only re-uploaded when the canvas reports a change, so idle
/// frames cost one textured quad.
pub struct CanvasRenderer {
    name: String,
    texture: Option<TextureHandle>,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("name", &self.name)
            .field("texture", &self.texture.as_ref().map(|t| t.size()))
            .finish()
    }
}

impl CanvasRenderer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: None,
        }
    }

    /// Replaces the texture contents with a newly composited frame
    ///
    /// Args:
    ///     ctx (Context): The egui context that owns the texture
    ///     frame (Frame): Pixels to show; an empty frame drops the texture
    pub fn upload(&mut self, ctx: &egui::Context, frame: &Frame) {
        if frame.is_empty() {
            self.texture = None;
            return;
        }
        let image = frame.to_color_image();
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture(&self.name, image, TextureOptions::NEAREST));
            }
        }
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Draws the last uploaded frame at the top-left of `rect`
    ///
    /// Args:
    ///     painter (Painter): Painter for the target layer
    ///     rect (Rect): Target area in points
    ///
    /// Returns:
    ///     Option<Rect>: The area covered, or None when nothing was uploaded
    ///
    /// The texture holds physical pixels, so it is shown at its pixel size
    /// divided by `pixels_per_point`; at 2x a 200 px texture covers 100 points.
    pub fn paint(&self, painter: &egui::Painter, rect: Rect) -> Option<Rect> {
        let texture = self.texture.as_ref()?;
        let target = display_rect(rect.min, texture.size_vec2(), painter.ctx().pixels_per_point());
        painter.image(
            texture.id(),
            target,
            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );
        Some(target)
    }
}

/// Where a texture of `size_px` physical pixels lands when shown at `min`.
fn display_rect(min: Pos2, size_px: Vec2, pixels_per_point: f32) -> Rect {
    Rect::from_min_size(min, size_px / pixels_per_point.max(f32::EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::PaintStyle;
    use crate::surface::Surface;
    use crate::tracker::StrokeTracker;

    #[test]
    fn test_upload_creates_texture() {
        let ctx = egui::Context::default();
        let mut renderer = CanvasRenderer::new("canvas");
        let mut surface = Surface::new(Color32::WHITE, PaintStyle::default());
        surface.resize(10, 10);
        let frame = StrokeTracker::default().render(&surface);

        renderer.upload(&ctx, &frame);
        assert!(renderer.has_texture());

        renderer.upload(&ctx, &Frame::empty());
        assert!(!renderer.has_texture());
    }

    #[test]
    fn test_paint_without_texture_is_noop() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let painter = egui::Painter::new(ctx, egui::LayerId::background(), rect);
        assert_eq!(CanvasRenderer::new("canvas").paint(&painter, rect), None);
    }

    #[test]
    fn test_display_rect_is_in_points() {
        let min = egui::pos2(10.0, 20.0);
        assert_eq!(
            display_rect(min, egui::vec2(200.0, 100.0), 2.0),
            Rect::from_min_size(min, egui::vec2(100.0, 50.0))
        );
        assert_eq!(
            display_rect(min, egui::vec2(200.0, 100.0), 1.0),
            Rect::from_min_size(min, egui::vec2(200.0, 100.0))
        );
    }

    #[test]
    fn test_paint_reports_covered_area() {
        let ctx = egui::Context::default();
        let mut renderer = CanvasRenderer::new("canvas");
        let mut surface = Surface::new(Color32::WHITE, PaintStyle::default());
        surface.resize(40, 30);
        renderer.upload(&ctx, &StrokeTracker::default().render(&surface));

        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let painter = egui::Painter::new(ctx.clone(), egui::LayerId::background(), rect);
        let expected = display_rect(rect.min, egui::vec2(40.0, 30.0), ctx.pixels_per_point());

        assert_eq!(renderer.paint(&painter, rect), Some(expected));
    }
}
