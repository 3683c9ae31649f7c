use egui::{Color32, Pos2};

use crate::config::DoodleConfig;
use crate::frame::Frame;
use crate::stroke::PaintStyle;
use crate::surface::Surface;
use crate::tracker::{ContactId, StrokeTracker, TouchSample};

/// A discrete touch event, in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchEvent {
    Press { id: ContactId, pos: Pos2 },
    Move(Vec<TouchSample>),
    Release { id: ContactId },
}

/// The drawing view: a surface plus the strokes currently being drawn on it.
///
/// Everything here runs on the UI thread. Events must be applied in the order
/// they were received; [`Canvas::render`] only reads.
#[derive(Debug, Clone)]
pub struct Canvas {
    surface: Surface,
    tracker: StrokeTracker,
    /// Movement tolerance in logical points, before display scaling.
    base_tolerance: f32,
    dirty: bool,
}

impl Canvas {
    pub fn new(surface: Surface, tracker: StrokeTracker) -> Self {
        Self {
            base_tolerance: tracker.tolerance(),
            surface,
            tracker,
            dirty: true,
        }
    }

    pub fn from_config(config: &DoodleConfig) -> Self {
        let style = PaintStyle::new(config.stroke_color(), config.stroke_width);
        Self::new(
            Surface::new(config.background(), style),
            StrokeTracker::new(config.touch_tolerance, config.release_policy),
        )
    }

    pub fn handle(&mut self, event: TouchEvent) {
        match event {
            TouchEvent::Press { id, pos } => self.tracker.on_press(id, pos),
            TouchEvent::Move(batch) => self.tracker.on_move(&batch),
            TouchEvent::Release { id } => {
                self.tracker.on_release(id, &mut self.surface);
            }
        }
        self.dirty = true;
    }

    /// Applies a queue of events in order.
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = TouchEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Applies a queue of events while a modal dialog may be covering the
    /// canvas.
    ///
    /// Args:
    ///     events: Translated events for this frame, in arrival order
    ///     modal: Whether a dialog or popup currently owns the input
    ///
    /// Returns:
    ///     usize: Number of events that were applied
    ///
    /// While `modal` is set, presses and moves are dropped but releases still
    /// go through, so a contact lifted under a dialog commits its stroke.
    pub fn handle_all_modal(&mut self, events: impl IntoIterator<Item = TouchEvent>, modal: bool) -> usize {
        let mut applied = 0;
        for event in events {
            if modal && !matches!(event, TouchEvent::Release { .. }) {
                continue;
            }
            self.handle(event);
            applied += 1;
        }
        applied
    }

    pub fn render(&self) -> Frame {
        self.tracker.render(&self.surface)
    }

    /// Starts over with a blank surface of the new size. Committed strokes
    /// are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.dirty = true;
    }

    /// Sets how many surface pixels make up one logical point.
    ///
    /// The surface is sized in physical pixels, so the movement tolerance is
    /// scaled along with it to stay in device-independent pixels.
    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        let tolerance = self.base_tolerance * pixels_per_point.max(f32::EPSILON);
        if tolerance != self.tracker.tolerance() {
            log::debug!("Touch tolerance now {} px ({}x)", tolerance, pixels_per_point);
            self.tracker.set_tolerance(tolerance);
        }
    }

    /// Erases everything, including strokes still being drawn.
    pub fn clear(&mut self) {
        self.tracker.clear();
        self.surface.clear();
        self.dirty = true;
        log::info!("Canvas cleared");
    }

    pub fn set_color(&mut self, color: Color32) {
        self.surface.set_color(color);
        self.dirty = true;
    }

    pub fn color(&self) -> Color32 {
        self.surface.color()
    }

    pub fn set_width(&mut self, width: f32) {
        self.surface.set_width(width);
        self.dirty = true;
    }

    pub fn width(&self) -> f32 {
        self.surface.width()
    }

    pub fn use_eraser(&mut self) {
        self.surface.use_eraser();
        self.dirty = true;
    }

    pub fn size(&self) -> [u32; 2] {
        [self.surface.width_px(), self.surface.height_px()]
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn tracker(&self) -> &StrokeTracker {
        &self.tracker
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether a redraw was pending and marks the canvas clean.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const MOUSE_ID: u64 = u64::MAX;

    #[test]
    fn test_events_mark_dirty() {
        let mut canvas = Canvas::from_config(&DoodleConfig::default());
        canvas.resize(32, 32);
        assert!(canvas.take_dirty());
        assert!(!canvas.is_dirty());

        canvas.handle(TouchEvent::Release { id: ContactId(4) });
        assert!(canvas.take_dirty());
    }

    #[test]
    fn test_clear_drops_live_strokes() {
        let mut canvas = Canvas::from_config(&DoodleConfig::default());
        canvas.resize(32, 32);
        canvas.handle(TouchEvent::Press {
            id: ContactId(1),
            pos: pos2(2.0, 2.0),
        });

        canvas.clear();

        assert_eq!(canvas.tracker().live_count(), 0);
        assert_eq!(canvas.size(), [32, 32]);
    }

    #[test]
    fn test_release_under_modal_commits_stroke() {
        let mut canvas = Canvas::from_config(&DoodleConfig::default());
        canvas.resize(64, 64);
        canvas.handle_all([
            TouchEvent::Press {
                id: ContactId(1),
                pos: pos2(5.0, 30.0),
            },
            TouchEvent::Move(vec![TouchSample::new(1, 30.0, 30.0)]),
            TouchEvent::Move(vec![TouchSample::new(1, 60.0, 30.0)]),
        ]);
        let blank = canvas.surface().pixel(20, 30);

        // The erase prompt came up; the finger keeps moving, then lifts.
        let applied = canvas.handle_all_modal(
            [
                TouchEvent::Move(vec![TouchSample::new(1, 40.0, 50.0)]),
                TouchEvent::Release { id: ContactId(1) },
            ],
            true,
        );

        assert_eq!(applied, 1);
        assert!(!canvas.tracker().is_live(ContactId(1)));
        assert_ne!(canvas.surface().pixel(20, 30), blank);
        assert_eq!(canvas.tracker().path(ContactId(1)).map(|p| p.is_empty()), Some(true));
    }

    #[test]
    fn test_press_under_modal_is_dropped() {
        let mut canvas = Canvas::from_config(&DoodleConfig::default());
        canvas.resize(64, 64);

        let applied = canvas.handle_all_modal(
            [
                TouchEvent::Press {
                    id: ContactId(MOUSE_ID),
                    pos: pos2(5.0, 5.0),
                },
                TouchEvent::Move(vec![TouchSample::new(MOUSE_ID, 40.0, 40.0)]),
            ],
            true,
        );

        assert_eq!(applied, 0);
        assert!(!canvas.tracker().is_live(ContactId(MOUSE_ID)));
        assert_eq!(canvas.handle_all_modal([TouchEvent::Release { id: ContactId(MOUSE_ID) }], false), 1);
    }

    #[test]
    fn test_tolerance_follows_pixels_per_point() {
        let mut canvas = Canvas::from_config(&DoodleConfig::default());
        canvas.resize(128, 128);
        canvas.set_pixels_per_point(2.0);
        canvas.handle(TouchEvent::Press {
            id: ContactId(1),
            pos: pos2(10.0, 10.0),
        });

        // 15 physical pixels is only 7.5 points.
        canvas.handle(TouchEvent::Move(vec![TouchSample::new(1, 25.0, 10.0)]));
        assert_eq!(canvas.tracker().path(ContactId(1)).unwrap().segment_count(), 0);

        canvas.handle(TouchEvent::Move(vec![TouchSample::new(1, 30.0, 10.0)]));
        assert_eq!(canvas.tracker().path(ContactId(1)).unwrap().segment_count(), 1);

        canvas.set_pixels_per_point(1.0);
        canvas.handle(TouchEvent::Move(vec![TouchSample::new(1, 40.0, 10.0)]));
        assert_eq!(canvas.tracker().path(ContactId(1)).unwrap().segment_count(), 2);
    }
}
