use std::collections::BTreeMap;
use std::fmt;

use egui::{pos2, Pos2};

use crate::frame::{compose, Frame};
use crate::stroke::StrokePath;
use crate::surface::Surface;

/// Minimum movement, in logical pixels, before a sample extends a stroke.
pub const TOUCH_TOLERANCE: f32 = 10.0;

/// Identifier the input system assigns to one touch contact. Stable from
/// press to release and reused afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One position report for one contact inside a move batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub id: ContactId,
    pub pos: Pos2,
}

impl TouchSample {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id: ContactId(id),
            pos: pos2(x, y),
        }
    }
}

/// What happens to a contact's slot once its stroke is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Keep the emptied path and last point for the next press on this id.
    #[default]
    RetainSlot,
    /// Drop the slot entirely.
    RemoveSlot,
}

#[derive(Debug, Clone)]
struct ActiveStroke {
    path: StrokePath,
    last_point: Pos2,
    live: bool,
}

/// Tracks one stroke per touch contact and commits finished strokes into a
/// [`Surface`].
///
/// Slots are kept in a map ordered by contact id, so in-progress strokes are
/// always drawn in ascending id order.
#[derive(Debug, Clone)]
pub struct StrokeTracker {
    slots: BTreeMap<ContactId, ActiveStroke>,
    tolerance: f32,
    release_policy: ReleasePolicy,
}

impl Default for StrokeTracker {
    fn default() -> Self {
        Self::new(TOUCH_TOLERANCE, ReleasePolicy::default())
    }
}

impl StrokeTracker {
    pub fn new(tolerance: f32, release_policy: ReleasePolicy) -> Self {
        Self {
            slots: BTreeMap::new(),
            tolerance,
            release_policy,
        }
    }

    /// Starts a stroke at `pos`. A slot left over from an earlier gesture on
    /// the same id is reset and reused.
    pub fn on_press(&mut self, id: ContactId, pos: Pos2) {
        let slot = self.slots.entry(id).or_insert_with(|| ActiveStroke {
            path: StrokePath::new(),
            last_point: pos,
            live: false,
        });
        if slot.live {
            log::trace!("Contact {} pressed again while live, restarting its stroke", id);
        }
        slot.path.reset();
        slot.path.move_to(pos);
        slot.last_point = pos;
        slot.live = true;
    }

    /// Extends strokes with a batch of samples.
    ///
    /// A sample only counts once it is at least `tolerance` away from the last
    /// accepted point on either axis. It then adds a quadratic segment through
    /// the previous point to the midpoint of the two, which smooths the polyline.
    /// Samples for ids without a live stroke are ignored.
    pub fn on_move(&mut self, batch: &[TouchSample]) {
        for sample in batch {
            let Some(slot) = self.slots.get_mut(&sample.id).filter(|s| s.live) else {
                log::trace!("Ignoring move for inactive contact {}", sample.id);
                continue;
            };
            let last = slot.last_point;
            let dx = (sample.pos.x - last.x).abs();
            let dy = (sample.pos.y - last.y).abs();
            if dx >= self.tolerance || dy >= self.tolerance {
                let mid = pos2((sample.pos.x + last.x) / 2.0, (sample.pos.y + last.y) / 2.0);
                slot.path.quad_to(last, mid);
                slot.last_point = sample.pos;
            }
        }
    }

    /// Commits the contact's stroke into `surface` with the surface's current
    /// paint style, then empties the path.
    ///
    /// Returns `false` without touching anything when the id has no live
    /// stroke.
    pub fn on_release(&mut self, id: ContactId, surface: &mut Surface) -> bool {
        let Some(slot) = self.slots.get_mut(&id).filter(|s| s.live) else {
            log::trace!("Ignoring release for inactive contact {}", id);
            return false;
        };
        let style = surface.style();
        surface.commit(&slot.path, &style);
        log::debug!("Committed stroke for contact {} ({} segments)", id, slot.path.segment_count());
        slot.path.reset();
        slot.live = false;

        if self.release_policy == ReleasePolicy::RemoveSlot {
            self.slots.remove(&id);
        }
        true
    }

    /// Surface first, then every live stroke in ascending contact id order.
    pub fn render(&self, surface: &Surface) -> Frame {
        let live = self.slots.values().filter(|s| s.live).map(|s| &s.path);
        compose(surface, live, &surface.style())
    }

    /// Drops every in-progress stroke without committing it.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_live(&self, id: ContactId) -> bool {
        self.slots.get(&id).is_some_and(|s| s.live)
    }

    /// The contact's current path, if it has a slot.
    pub fn path(&self, id: ContactId) -> Option<&StrokePath> {
        self.slots.get(&id).map(|s| &s.path)
    }

    pub fn last_point(&self, id: ContactId) -> Option<Pos2> {
        self.slots.get(&id).map(|s| s.last_point)
    }

    pub fn live_count(&self) -> usize {
        self.slots.values().filter(|s| s.live).count()
    }

    /// Number of slots held, live or waiting for reuse.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Changes the movement tolerance for samples that arrive from now on.
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = tolerance.max(0.0);
    }
}
