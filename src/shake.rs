//! Shake-to-erase: turns accelerometer samples into "erase requested" signals.
//!
//! Samples are produced on a sensor context that runs concurrently with the
//! UI. The only state both sides touch is the [`DialogGuard`] flag; requests
//! travel to the UI loop over a channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::channel::mpsc;

/// Shake strength above which an erase prompt is raised.
pub const ACCELERATION_THRESHOLD: f32 = 15000.0;

/// Standard gravity in m/s², the resting reading before any sample arrives.
pub const GRAVITY_EARTH: f32 = 9.80665;

/// One 3-axis accelerometer reading in m/s².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared length of the acceleration vector.
    pub fn magnitude(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// Signal sent to the UI loop when the device was shaken hard enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraseRequested;

/// Stateful threshold test over a stream of samples.
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    previous_magnitude: f32,
    current_magnitude: f32,
    threshold: f32,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(ACCELERATION_THRESHOLD)
    }
}

impl ShakeDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            previous_magnitude: GRAVITY_EARTH,
            current_magnitude: GRAVITY_EARTH,
            threshold,
        }
    }

    /// Feeds one sample; returns true when it crosses the shake threshold.
    pub fn feed(&mut self, sample: AccelSample) -> bool {
        self.previous_magnitude = self.current_magnitude;
        self.current_magnitude = sample.magnitude();
        let delta = self.current_magnitude * (self.current_magnitude - self.previous_magnitude);
        delta > self.threshold
    }
}

/// "A modal prompt is on screen" flag, shared between the sensor context and
/// the UI.
#[derive(Debug, Clone, Default)]
pub struct DialogGuard {
    visible: Arc<AtomicBool>,
}

impl DialogGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard. Only one caller wins until [`DialogGuard::dismiss`].
    pub fn try_raise(&self) -> bool {
        self.visible
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn dismiss(&self) {
        self.visible.store(false, Ordering::Release);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }
}

/// Sensor-side half of shake-to-erase.
///
/// Skips samples while a prompt is visible, and claims the guard before
/// sending a request so repeated shakes queue at most one prompt.
#[derive(Debug)]
pub struct ShakeMonitor {
    detector: ShakeDetector,
    guard: DialogGuard,
    requests: mpsc::UnboundedSender<EraseRequested>,
}

impl ShakeMonitor {
    /// Creates a monitor and the receiving end the UI loop drains.
    pub fn channel(
        detector: ShakeDetector,
        guard: DialogGuard,
    ) -> (Self, mpsc::UnboundedReceiver<EraseRequested>) {
        let (requests, receiver) = mpsc::unbounded();
        (
            Self {
                detector,
                guard,
                requests,
            },
            receiver,
        )
    }

    /// Returns true when this sample raised an erase request.
    pub fn feed(&mut self, sample: AccelSample) -> bool {
        if self.guard.is_visible() {
            return false;
        }
        if !self.detector.feed(sample) || !self.guard.try_raise() {
            return false;
        }
        log::info!("Shake detected, requesting erase");
        if self.requests.unbounded_send(EraseRequested).is_err() {
            log::warn!("UI stopped listening for erase requests");
            self.guard.dismiss();
            return false;
        }
        true
    }
}

/// Takes every pending request without blocking. Returns true if at least one
/// arrived.
pub fn drain_requests(receiver: &mut mpsc::UnboundedReceiver<EraseRequested>) -> bool {
    let mut any = false;
    while let Ok(Some(EraseRequested)) = receiver.try_next() {
        any = true;
    }
    any
}
