use egui::{Color32, Slider};

use crate::frame::width_preview;
use crate::renderer::CanvasRenderer;
use crate::stroke::{color_from_argb, color_to_argb, PaintStyle};

/// What the user decided in a dialog this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogOutcome<T> {
    Open,
    Accepted(T),
    Dismissed,
}

/// ARGB sliders with a live swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorDialog {
    /// `0xAARRGGBB`
    argb: u32,
}

impl ColorDialog {
    pub fn new(current: Color32) -> Self {
        Self {
            argb: color_to_argb(current),
        }
    }

    pub fn color(&self) -> Color32 {
        color_from_argb(self.argb)
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome<Color32> {
        let mut open = true;
        let mut accepted = false;
        egui::Window::new("Choose Color")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let mut channels = self.argb.to_be_bytes();
                for (label, value) in ["Alpha", "Red", "Green", "Blue"].into_iter().zip(&mut channels) {
                    ui.add(Slider::new(value, 0..=255).text(label));
                }
                self.argb = u32::from_be_bytes(channels);
                let (rect, _) = ui.allocate_exact_size(egui::vec2(240.0, 40.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 4.0, self.color());
                accepted = ui.button("Set Color").clicked();
            });
        resolve(open, accepted, self.color())
    }
}

/// Width slider with a preview line drawn in the current color.
#[derive(Debug)]
pub struct WidthDialog {
    style: PaintStyle,
    preview: CanvasRenderer,
    shown_width: Option<f32>,
}

impl WidthDialog {
    pub const MIN_WIDTH: f32 = 1.0;
    pub const MAX_WIDTH: f32 = 50.0;

    pub fn new(current: PaintStyle) -> Self {
        Self {
            style: PaintStyle::new(
                current.color,
                current.width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH),
            ),
            preview: CanvasRenderer::new("width_preview"),
            shown_width: None,
        }
    }

    pub fn width(&self) -> f32 {
        self.style.width
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome<f32> {
        let mut open = true;
        let mut accepted = false;
        egui::Window::new("Choose Line Width")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add(
                    Slider::new(&mut self.style.width, Self::MIN_WIDTH..=Self::MAX_WIDTH)
                        .step_by(1.0)
                        .text("Width"),
                );
                if self.shown_width != Some(self.style.width) {
                    self.preview.upload(ui.ctx(), &width_preview(&self.style));
                    self.shown_width = Some(self.style.width);
                }
                let (rect, _) = ui.allocate_exact_size(egui::vec2(400.0, 100.0), egui::Sense::hover());
                self.preview.paint(ui.painter(), rect);
                accepted = ui.button("Set Line Width").clicked();
            });
        resolve(open, accepted, self.style.width)
    }
}

/// Shown after a shake: erase the drawing or keep it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErasePrompt;

impl ErasePrompt {
    pub fn show(&self, ctx: &egui::Context) -> DialogOutcome<()> {
        let mut open = true;
        let mut outcome = DialogOutcome::Open;
        egui::Window::new("Erase")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Erase the entire drawing?");
                ui.horizontal(|ui| {
                    if ui.button("Erase").clicked() {
                        outcome = DialogOutcome::Accepted(());
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = DialogOutcome::Dismissed;
                    }
                });
            });
        if open { outcome } else { DialogOutcome::Dismissed }
    }
}

fn resolve<T>(open: bool, accepted: bool, value: T) -> DialogOutcome<T> {
    if accepted {
        DialogOutcome::Accepted(value)
    } else if !open {
        DialogOutcome::Dismissed
    } else {
        DialogOutcome::Open
    }
}
