use futures::channel::mpsc;

use crate::canvas::Canvas;
use crate::config::DoodleConfig;
use crate::dialogs::{ColorDialog, DialogOutcome, ErasePrompt, WidthDialog};
use crate::export::{spawn_export, JpegFileSink, PendingExport};
use crate::input::InputTranslator;
use crate::renderer::CanvasRenderer;
use crate::shake::{drain_requests, DialogGuard, EraseRequested};
use crate::stroke::PaintStyle;
use crate::util::time;

const NOTICE_SECS: f64 = 2.0;

/// Storage key for the persisted paint style.
const STYLE_KEY: &str = "doodle_paint_style";

#[derive(Debug)]
enum OpenDialog {
    Color(ColorDialog),
    Width(WidthDialog),
    Erase(ErasePrompt),
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    expires_at: f64,
}

/// The doodle window: menu, canvas and dialogs.
pub struct DoodleApp {
    config: DoodleConfig,
    canvas: Canvas,
    renderer: CanvasRenderer,
    input: InputTranslator,
    guard: DialogGuard,
    erase_requests: mpsc::UnboundedReceiver<EraseRequested>,
    dialog: Option<OpenDialog>,
    export: Option<PendingExport>,
    notice: Option<Notice>,
}

impl DoodleApp {
    /// Called once before the first frame.
    ///
    /// Args:
    ///     cc (CreationContext): The eframe creation context; its storage holds the saved paint style
    ///     config (DoodleConfig): Startup settings for the canvas and exports
    ///     guard (DialogGuard): Flag shared with the shake monitor
    ///     erase_requests (UnboundedReceiver): Erase prompts sent by the shake monitor
    ///
    /// Returns:
    ///     Self: App ready to run, with a style restored from the last session if any
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: DoodleConfig,
        guard: DialogGuard,
        erase_requests: mpsc::UnboundedReceiver<EraseRequested>,
    ) -> Self {
        let mut canvas = Canvas::from_config(&config);
        if let Some(style) = cc
            .storage
            .and_then(|storage| eframe::get_value::<PaintStyle>(storage, STYLE_KEY))
        {
            log::debug!("Restored paint style {:?}", style);
            canvas.set_color(style.color);
            canvas.set_width(style.width);
        }

        Self {
            config,
            canvas,
            renderer: CanvasRenderer::new("doodle_canvas"),
            input: InputTranslator::new(egui::Rect::NOTHING),
            guard,
            erase_requests,
            dialog: None,
            export: None,
            notice: None,
        }
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            expires_at: time::current_time_secs() + NOTICE_SECS,
        });
    }

    /// Opens a dialog unless another prompt already holds the guard.
    fn open_dialog(&mut self, dialog: OpenDialog) {
        if self.guard.try_raise() {
            self.dialog = Some(dialog);
        }
    }

    fn close_dialog(&mut self) {
        self.dialog = None;
        self.guard.dismiss();
    }

    fn save_image(&mut self) {
        if self.export.is_some() {
            return;
        }
        match self.canvas.surface().snapshot_rgb() {
            Some(image) => {
                let sink = JpegFileSink::new(&self.config.export_dir, self.config.jpeg_quality);
                self.export = Some(spawn_export(image, sink));
            }
            None => self.notify("Nothing to save yet"),
        }
    }

    fn poll_export(&mut self) {
        let Some(outcome) = self.export.as_mut().and_then(PendingExport::poll) else {
            return;
        };
        self.export = None;
        match outcome {
            Ok(path) => self.notify(format!("Image saved to {}", path.display())),
            Err(err) => self.notify(format!("There was an error saving the image: {}", err)),
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Menu", |ui| {
                    if ui.button("Color").clicked() {
                        self.open_dialog(OpenDialog::Color(ColorDialog::new(self.canvas.color())));
                        ui.close_menu();
                    }
                    if ui.button("Line Width").clicked() {
                        let style = self.canvas.surface().style();
                        self.open_dialog(OpenDialog::Width(WidthDialog::new(style)));
                        ui.close_menu();
                    }
                    if ui.button("Erase").clicked() {
                        self.canvas.use_eraser();
                        ui.close_menu();
                    }
                    if ui.button("Clear").clicked() {
                        self.canvas.clear();
                        ui.close_menu();
                    }
                    if ui.add_enabled(self.export.is_none(), egui::Button::new("Save Image")).clicked() {
                        self.save_image();
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.dialog else {
            return;
        };
        let finished = match dialog {
            OpenDialog::Color(dialog) => match dialog.show(ctx) {
                DialogOutcome::Accepted(color) => {
                    self.canvas.set_color(color);
                    true
                }
                DialogOutcome::Dismissed => true,
                DialogOutcome::Open => false,
            },
            OpenDialog::Width(dialog) => match dialog.show(ctx) {
                DialogOutcome::Accepted(width) => {
                    self.canvas.set_width(width);
                    true
                }
                DialogOutcome::Dismissed => true,
                DialogOutcome::Open => false,
            },
            OpenDialog::Erase(prompt) => match prompt.show(ctx) {
                DialogOutcome::Accepted(()) => {
                    self.canvas.clear();
                    true
                }
                DialogOutcome::Dismissed => true,
                DialogOutcome::Open => false,
            },
        };
        if finished {
            self.close_dialog();
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        if time::current_time_secs() > notice.expires_at {
            self.notice = None;
            return;
        }
        egui::Area::new(egui::Id::new("notice"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -40.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(&notice.text);
                });
            });
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }

    fn canvas_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
                let rect = response.rect;
                let ppp = ctx.pixels_per_point();
                let size = [(rect.width() * ppp).round() as u32, (rect.height() * ppp).round() as u32];
                if size != self.canvas.size() {
                    self.canvas.resize(size[0], size[1]);
                }
                self.canvas.set_pixels_per_point(ppp);

                self.input.set_canvas_rect(rect);
                self.input.set_pixels_per_point(ppp);
                // New touches are ignored while a dialog or popup is up.
                let modal = self.dialog.is_some() || ctx.memory(|mem| mem.any_popup_open());
                let events = self.input.process_input(ctx);
                self.canvas.handle_all_modal(events, modal);

                if self.canvas.take_dirty() {
                    self.renderer.upload(ctx, &self.canvas.render());
                }
                self.renderer.paint(&painter, rect);
            });
    }
}

impl eframe::App for DoodleApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, STYLE_KEY, &self.canvas.surface().style());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if drain_requests(&mut self.erase_requests) {
            // The monitor already holds the guard for this prompt.
            self.dialog = Some(OpenDialog::Erase(ErasePrompt));
        }
        self.poll_export();

        self.menu_bar(ctx);
        self.canvas_panel(ctx);
        self.show_dialog(ctx);
        self.show_notice(ctx);

        if self.export.is_some() || self.guard.is_visible() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
