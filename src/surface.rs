use egui::Color32;
use image::RgbImage;
use tiny_skia::{Pixmap, Transform};

use crate::stroke::{PaintStyle, StrokePath};

/// Persistent raster holding every finished stroke.
///
/// The buffer only changes through [`Surface::clear`] and [`Surface::commit`].
/// [`Surface::resize`] throws the old buffer away: the canvas starts blank at
/// every new size. A zero-sized surface has no buffer and ignores drawing.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Option<Pixmap>,
    background: Color32,
    style: PaintStyle,
}

impl Surface {
    pub fn new(background: Color32, style: PaintStyle) -> Self {
        Self {
            pixmap: None,
            background,
            style,
        }
    }

    /// Reallocates the buffer at the given size and fills it with the
    /// background color. All prior pixels are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.pixmap.is_some() {
            log::debug!("Surface resized to {}x{}, discarding committed strokes", width, height);
        }
        self.pixmap = Pixmap::new(width, height);
        self.clear();
    }

    /// Fills the buffer with the background color.
    pub fn clear(&mut self) {
        let background = to_skia_color(self.background);
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(background);
        }
    }

    /// Rasterizes `path` onto the buffer. Every call accumulates; there is
    /// no way to take a commit back.
    pub fn commit(&mut self, path: &StrokePath, style: &PaintStyle) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        if let Some(path) = path.to_skia_path() {
            stroke_onto(pixmap, &path, style);
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        self.style.color = color;
    }

    pub fn color(&self) -> Color32 {
        self.style.color
    }

    pub fn set_width(&mut self, width: f32) {
        self.style.width = width.max(0.0);
    }

    pub fn width(&self) -> f32 {
        self.style.width
    }

    pub fn style(&self) -> PaintStyle {
        self.style
    }

    /// Paints with the background color from now on.
    pub fn use_eraser(&mut self) {
        self.style.color = self.background;
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn width_px(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::width)
    }

    pub fn height_px(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::height)
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Reads one pixel, unpremultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        let pixmap = self.pixmap.as_ref()?;
        pixmap.pixel(x, y).map(color_from_premultiplied)
    }

    /// Copies the buffer into an opaque RGB image for export.
    pub fn snapshot_rgb(&self) -> Option<RgbImage> {
        let pixmap = self.pixmap.as_ref()?;
        Some(pixmap_to_rgb(pixmap))
    }
}

pub(crate) fn stroke_onto(pixmap: &mut Pixmap, path: &tiny_skia::Path, style: &PaintStyle) {
    pixmap.stroke_path(
        path,
        &style.to_skia_paint(),
        &style.to_skia_stroke(),
        Transform::identity(),
        None,
    );
}

pub(crate) fn to_skia_color(color: Color32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

pub(crate) fn color_from_premultiplied(pixel: tiny_skia::PremultipliedColorU8) -> Color32 {
    let c = pixel.demultiply();
    Color32::from_rgba_unmultiplied(c.red(), c.green(), c.blue(), c.alpha())
}

pub(crate) fn pixmap_to_rgb(pixmap: &Pixmap) -> RgbImage {
    RgbImage::from_fn(pixmap.width(), pixmap.height(), |x, y| {
        let c = pixmap
            .pixel(x, y)
            .map(|p| p.demultiply())
            .unwrap_or_else(|| tiny_skia::ColorU8::from_rgba(0, 0, 0, 0));
        image::Rgb([c.red(), c.green(), c.blue()])
    })
}
