use egui::{Color32, ColorImage};
use tiny_skia::Pixmap;

use crate::stroke::{PaintStyle, StrokePath};
use crate::surface::{color_from_premultiplied, stroke_onto, Surface};

/// A composited, ready-to-display image: the surface with in-progress strokes
/// drawn on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixmap: Option<Pixmap>,
}

impl Frame {
    pub fn empty() -> Self {
        Self { pixmap: None }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::width)
    }

    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixmap.as_ref()?.pixel(x, y).map(color_from_premultiplied)
    }

    /// True when every pixel has the given color.
    pub fn is_uniform(&self, color: Color32) -> bool {
        let Some(pixmap) = &self.pixmap else {
            return true;
        };
        pixmap
            .pixels()
            .iter()
            .all(|&p| color_from_premultiplied(p) == color)
    }

    pub fn to_color_image(&self) -> ColorImage {
        match &self.pixmap {
            Some(pixmap) => ColorImage::from_rgba_premultiplied(
                [pixmap.width() as usize, pixmap.height() as usize],
                pixmap.data(),
            ),
            None => ColorImage::new([0, 0], Color32::TRANSPARENT),
        }
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap: Some(pixmap),
        }
    }
}

/// Composites `paths` over the surface. The surface itself is left untouched.
pub fn compose<'a>(
    surface: &Surface,
    paths: impl IntoIterator<Item = &'a StrokePath>,
    style: &PaintStyle,
) -> Frame {
    let Some(base) = surface.pixmap() else {
        return Frame::empty();
    };
    let mut pixmap = base.clone();
    for path in paths {
        if let Some(path) = path.to_skia_path() {
            stroke_onto(&mut pixmap, &path, style);
        }
    }
    Frame::from_pixmap(pixmap)
}

/// Preview shown in the width dialog: a single horizontal line on a white
/// 400x100 card.
pub fn width_preview(style: &PaintStyle) -> Frame {
    let Some(mut pixmap) = Pixmap::new(400, 100) else {
        return Frame::empty();
    };
    pixmap.fill(tiny_skia::Color::WHITE);
    let mut path = StrokePath::new();
    path.move_to(egui::pos2(30.0, 50.0));
    path.quad_to(egui::pos2(30.0, 50.0), egui::pos2(370.0, 50.0));
    if let Some(path) = path.to_skia_path() {
        stroke_onto(&mut pixmap, &path, style);
    }
    Frame::from_pixmap(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_buffer_is_empty() {
        let surface = Surface::new(Color32::WHITE, PaintStyle::default());
        let frame = compose(&surface, std::iter::empty(), &surface.style());
        assert!(frame.is_empty());
        assert_eq!(frame.to_color_image().size, [0, 0]);
    }

    #[test]
    fn test_width_preview_draws_line() {
        let frame = width_preview(&PaintStyle::new(Color32::BLACK, 10.0));
        assert_eq!((frame.width(), frame.height()), (400, 100));
        assert_eq!(frame.pixel(200, 20), Some(Color32::WHITE));
        let center = frame.pixel(200, 50).unwrap();
        assert!(center.r() < 64);
    }

    #[test]
    fn test_color_image_matches_size() {
        let mut surface = Surface::new(Color32::WHITE, PaintStyle::default());
        surface.resize(7, 5);
        let frame = compose(&surface, std::iter::empty(), &surface.style());
        let image = frame.to_color_image();
        assert_eq!(image.size, [7, 5]);
        assert!(frame.is_uniform(Color32::WHITE));
    }
}
