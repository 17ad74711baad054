//! Time primitives for the docent engine
//!
//! All motion and gesture logic runs on `SessionTime`, microseconds since
//! the session started. `FrameClock` is the only place wall-clock time
//! enters; tests drive components with synthetic `SessionTime` directly.

use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

/// Session time - microseconds since session start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionTime(pub i64);

impl SessionTime {
    pub const ZERO: SessionTime = SessionTime(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        SessionTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        SessionTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f32(secs: f32) -> Self {
        SessionTime((secs as f64 * 1_000_000.0) as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        (self.0 as f64 / 1_000_000.0) as f32
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        SessionTime(self.0.saturating_add(duration.as_micros() as i64))
    }
}

impl Add<Duration> for SessionTime {
    type Output = SessionTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        SessionTime(self.0 + rhs.as_micros() as i64)
    }
}

impl Sub<SessionTime> for SessionTime {
    type Output = Duration;

    /// Saturates at zero so a non-monotonic pair never panics
    #[inline]
    fn sub(self, rhs: SessionTime) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for SessionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t+{:.3}ms", self.0 as f64 / 1000.0)
    }
}

/// One advance of the frame clock
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    pub now: SessionTime,
    pub dt: Duration,
}

/// Monotonic frame clock
/// INVARIANT: `now` never decreases; per-tick elapsed time is clamped
pub struct FrameClock {
    value: SessionTime,
    last_update: Instant,
}

impl FrameClock {
    /// Largest dt a single tick may report (survives host suspends)
    const MAX_TICK: Duration = Duration::from_millis(100);

    /// Create a new frame clock starting at zero
    pub fn new() -> Self {
        FrameClock {
            value: SessionTime::ZERO,
            last_update: Instant::now(),
        }
    }

    /// Advance the clock based on elapsed real time
    pub fn tick(&mut self) -> FrameTick {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);

        // Clamp to prevent large jumps (e.g., after app backgrounding)
        let dt = elapsed.min(Self::MAX_TICK);

        self.value = self.value.saturating_add(dt);
        self.last_update = now;
        FrameTick {
            now: self.value,
            dt,
        }
    }

    /// Get current session time without advancing
    pub fn now(&self) -> SessionTime {
        self.value
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
