use egui::{Context, Event, PointerButton, Pos2, Rect, TouchPhase};

use crate::canvas::TouchEvent;
use crate::tracker::{ContactId, TouchSample};

/// Contact id used for the primary mouse button.
///
/// Touch contacts take their id from `egui::TouchId`, which winit fills with
/// the platform's finger or pointer id. Those are small, reused per gesture,
/// and never reach `u64::MAX`, so the mouse cannot alias a finger.
pub const MOUSE_CONTACT: ContactId = ContactId(u64::MAX);

/// Converts raw egui input into [`TouchEvent`]s in canvas-local coordinates.
///
/// Consecutive moves in one frame are coalesced into a single batch; a new
/// batch starts as soon as a contact would appear twice. Once a real touch
/// event has been seen, the pointer events egui synthesizes from touches are
/// ignored so a finger is not tracked twice.
///
/// Positions come out in surface pixels: points relative to the canvas
/// corner, multiplied by the display's pixels per point.
#[derive(Debug, Clone)]
pub struct InputTranslator {
    canvas_rect: Rect,
    pixels_per_point: f32,
    mouse_down: bool,
    touch_seen: bool,
}

impl InputTranslator {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            pixels_per_point: 1.0,
            mouse_down: false,
            touch_seen: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        self.pixels_per_point = pixels_per_point;
    }

    /// Translate this frame's input.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<TouchEvent> {
        let events = ctx.input(|input| input.events.clone());
        self.translate(&events)
    }

    pub fn translate(&mut self, events: &[Event]) -> Vec<TouchEvent> {
        let mut out = Vec::new();
        let mut batch: Vec<TouchSample> = Vec::new();

        for event in events {
            match event {
                Event::Touch { id, phase, pos, .. } => {
                    self.touch_seen = true;
                    let contact = ContactId(id.0);
                    match phase {
                        TouchPhase::Start => {
                            if self.canvas_rect.contains(*pos) {
                                flush(&mut batch, &mut out);
                                out.push(TouchEvent::Press {
                                    id: contact,
                                    pos: self.local(*pos),
                                });
                            }
                        }
                        TouchPhase::Move => self.push_move(contact, *pos, &mut batch, &mut out),
                        // A cancelled contact still commits what it drew.
                        TouchPhase::End | TouchPhase::Cancel => {
                            flush(&mut batch, &mut out);
                            out.push(TouchEvent::Release { id: contact });
                        }
                    }
                }
                _ if self.touch_seen => {}
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    flush(&mut batch, &mut out);
                    if *pressed && self.canvas_rect.contains(*pos) {
                        self.mouse_down = true;
                        out.push(TouchEvent::Press {
                            id: MOUSE_CONTACT,
                            pos: self.local(*pos),
                        });
                    } else if !*pressed && self.mouse_down {
                        self.mouse_down = false;
                        out.push(TouchEvent::Release { id: MOUSE_CONTACT });
                    }
                }
                Event::PointerMoved(pos) if self.mouse_down => {
                    self.push_move(MOUSE_CONTACT, *pos, &mut batch, &mut out);
                }
                Event::PointerGone if self.mouse_down => {
                    flush(&mut batch, &mut out);
                    self.mouse_down = false;
                    out.push(TouchEvent::Release { id: MOUSE_CONTACT });
                }
                _ => {}
            }
        }

        flush(&mut batch, &mut out);
        out
    }

    fn push_move(&self, id: ContactId, pos: Pos2, batch: &mut Vec<TouchSample>, out: &mut Vec<TouchEvent>) {
        if batch.iter().any(|s| s.id == id) {
            flush(batch, out);
        }
        batch.push(TouchSample {
            id,
            pos: self.local(pos),
        });
    }

    fn local(&self, pos: Pos2) -> Pos2 {
        ((pos - self.canvas_rect.min) * self.pixels_per_point).to_pos2()
    }
}

fn flush(batch: &mut Vec<TouchSample>, out: &mut Vec<TouchEvent>) {
    if !batch.is_empty() {
        out.push(TouchEvent::Move(std::mem::take(batch)));
    }
}
