use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Source of time for the timer engine. Wall-clock timestamps go into
/// session records; the monotonic reading drives elapsed accounting so a
/// system clock jump never corrupts a running timer.
pub trait Clock {
    fn wall(&self) -> DateTime<Local>;

    /// Monotonic time since some fixed origin.
    fn monotonic(&self) -> Duration;
}

/// Production clock backed by `Instant` and `chrono::Local`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn wall(&self) -> DateTime<Local> {
        Local::now()
    }

    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug)]
struct ManualInner {
    wall: DateTime<Local>,
    monotonic: Duration,
}

/// Hand-advanced clock for tests. Clones share the same underlying time, so
/// a test can keep a handle while the controller owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualClock {
    pub fn new(wall: DateTime<Local>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                wall,
                monotonic: Duration::ZERO,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.monotonic += by;
        inner.wall += chrono::Duration::from_std(by).unwrap_or_default();
    }
}

impl Clock for ManualClock {
    fn wall(&self) -> DateTime<Local> {
        self.inner.lock().unwrap().wall
    }

    fn monotonic(&self) -> Duration {
        self.inner.lock().unwrap().monotonic
    }
}
