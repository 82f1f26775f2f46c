//! Wall-clock time and frame scheduling seams for playback.

use std::cell::Cell;
use std::rc::Rc;

// Use web-time on WASM, std::time otherwise
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Source of wall-clock time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Host hook for per-frame callbacks (e.g. `requestAnimationFrame`).
///
/// The engine requests a frame while playing and cancels any pending one
/// on pause and stop. The host calls
/// [`AnimationEngine::on_frame`](super::AnimationEngine::on_frame) when the
/// frame fires.
pub trait FrameScheduler {
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
}

/// A pending-frame flag the host polls. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct FrameFlag {
    pending: Rc<Cell<bool>>,
}

impl FrameFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Consume the pending request, returning whether there was one.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}

impl FrameScheduler for FrameFlag {
    fn request_frame(&mut self) {
        self.pending.set(true);
    }

    fn cancel_frame(&mut self) {
        self.pending.set(false);
    }
}
