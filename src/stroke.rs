use egui::{Color32, Pos2};

/// One drawing command of a stroke path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    /// Quadratic curve from the current point through `ctrl` to `end`.
    QuadTo { ctrl: Pos2, end: Pos2 },
}

/// Mutable vector path for one in-progress stroke.
///
/// Paths are reset rather than dropped when a contact lifts, so the command
/// buffer keeps its capacity for the next gesture on the same contact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokePath {
    commands: Vec<PathCommand>,
}

impl StrokePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, pos: Pos2) {
        self.commands.push(PathCommand::MoveTo(pos));
    }

    pub fn quad_to(&mut self, ctrl: Pos2, end: Pos2) {
        self.commands.push(PathCommand::QuadTo { ctrl, end });
    }

    /// Empty the path, keeping its allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of curve segments, not counting move-to commands.
    pub fn segment_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::QuadTo { .. }))
            .count()
    }

    /// Builds the rasterizer's path.
    ///
    /// Returns `None` for paths that cover no area: empty paths and lone
    /// move-to points (a tap that never passed the drag tolerance).
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => pb.move_to(p.x, p.y),
                PathCommand::QuadTo { ctrl, end } => pb.quad_to(ctrl.x, ctrl.y, end.x, end.y),
            }
        }
        pb.finish()
    }
}

/// Color and width used to stroke paths. Caps are always round and strokes
/// are always anti-aliased.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaintStyle {
    pub color: Color32,
    pub width: f32,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            width: 5.0,
        }
    }
}

impl PaintStyle {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width: width.max(0.0),
        }
    }

    pub(crate) fn to_skia_paint(&self) -> tiny_skia::Paint<'static> {
        let [r, g, b, a] = self.color.to_srgba_unmultiplied();
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }

    pub(crate) fn to_skia_stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width,
            line_cap: tiny_skia::LineCap::Round,
            ..tiny_skia::Stroke::default()
        }
    }
}

/// Packs a color as `0xAARRGGBB`.
pub fn color_to_argb(color: Color32) -> u32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    u32::from_be_bytes([a, r, g, b])
}

/// Unpacks a `0xAARRGGBB` color.
pub fn color_from_argb(argb: u32) -> Color32 {
    let [a, r, g, b] = argb.to_be_bytes();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}
