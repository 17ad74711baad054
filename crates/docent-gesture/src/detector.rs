//! Jerk + pitch-delta swing detector
//!
//! Per sample: low-pass the gravity estimate, approximate jerk from the
//! acceleration delta over a clamped sample interval, and track the device
//! pitch under two axis conventions. A forward swing fires when jerk and
//! pitch change both exceed their thresholds and the cooldown has elapsed.

use std::time::Duration;

use docent_core::{SessionTime, Vec3};

/// Pitch axis convention.
///
/// Landscape devices report the "forward flick" tilt on different axes
/// depending on how they are held; `AutoMax` evaluates both conventions and
/// takes the larger change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitchModel {
    #[default]
    AutoMax,
    ZAxis,
    YAxis,
}

/// Detector tunables
#[derive(Debug, Clone)]
pub struct SwingConfig {
    /// Jerk threshold (m/s^3 approximation)
    pub jerk_threshold: f32,
    /// Short-window pitch change threshold (degrees)
    pub pitch_delta_deg: f32,
    /// Minimum interval between two triggers
    pub cooldown: Duration,
    /// Gravity low-pass filter factor in [0, 1]; smaller = slower
    pub gravity_lerp: f32,
    /// Sample interval clamp, bounds jerk noise at irregular rates
    pub min_dt: Duration,
    pub max_dt: Duration,
    pub pitch_model: PitchModel,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            jerk_threshold: 30.0,
            pitch_delta_deg: 12.0,
            cooldown: Duration::from_millis(650),
            gravity_lerp: 0.12,
            min_dt: Duration::from_millis(20),
            max_dt: Duration::from_millis(80),
            pitch_model: PitchModel::AutoMax,
        }
    }
}

/// One timestamped 3-axis acceleration sample, device-local axes
#[derive(Debug, Clone, Copy)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub timestamp: SessionTime,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32, timestamp: SessionTime) -> Self {
        Self { x, y, z, timestamp }
    }

    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Per-sample detector output
#[derive(Debug, Clone, Copy)]
pub struct SwingReading {
    pub accel: Vec3,
    pub gravity: Vec3,
    pub jerk: f32,
    pub pitch_delta_deg: f32,
    pub fired: bool,
}

impl SwingReading {
    /// Free-form diagnostic line for a debug HUD; never consumed by the
    /// motion controller.
    pub fn telemetry(&self) -> String {
        format!(
            "a=({:.2},{:.2},{:.2}) g=({:.2},{:.2},{:.2}) jerk={:.1} dPitch={:.1}",
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.gravity.x,
            self.gravity.y,
            self.gravity.z,
            self.jerk,
            self.pitch_delta_deg,
        )
    }
}

/// Forward-swing detector state
///
/// INVARIANT: the first sample seeds gravity and both pitch histories, so the
/// first delta is always zero; every later sample updates gravity and both
/// pitch histories whether or not it fires.
#[derive(Debug)]
pub struct SwingDetector {
    config: SwingConfig,
    accel: Vec3,
    gravity: Option<Vec3>,
    prev_pitch_z_deg: f32,
    prev_pitch_y_deg: f32,
    last_sample: Option<SessionTime>,
    last_trigger: Option<SessionTime>,
}

impl SwingDetector {
    pub fn new(config: SwingConfig) -> Self {
        Self {
            config,
            accel: Vec3::ZERO,
            gravity: None,
            prev_pitch_z_deg: 0.0,
            prev_pitch_y_deg: 0.0,
            last_sample: None,
            last_trigger: None,
        }
    }

    pub fn config(&self) -> &SwingConfig {
        &self.config
    }

    /// Current gravity estimate; None before the first sample
    pub fn gravity(&self) -> Option<Vec3> {
        self.gravity
    }

    /// Consume one sample. Never drops a sample and never panics on
    /// malformed timestamps; a non-monotonic or zero interval clamps to
    /// `min_dt`.
    pub fn ingest(&mut self, sample: AccelSample) -> SwingReading {
        let a = sample.vector();
        let now = sample.timestamp;

        let Some(gravity) = self.gravity else {
            // Cold start: seed gravity and pitch history so the first
            // sample cannot produce a spurious delta.
            self.accel = a;
            self.gravity = Some(a);
            let (pitch_z, pitch_y) = pitch_angles(a);
            self.prev_pitch_z_deg = pitch_z;
            self.prev_pitch_y_deg = pitch_y;
            self.last_sample = Some(now);

            let reading = SwingReading {
                accel: a,
                gravity: a,
                jerk: 0.0,
                pitch_delta_deg: 0.0,
                fired: false,
            };
            tracing::trace!(telemetry = %reading.telemetry(), "accel sample (seed)");
            return reading;
        };

        let prev = self.accel;
        self.accel = a;

        let gravity = gravity.lerp(&a, self.config.gravity_lerp);
        self.gravity = Some(gravity);

        // Clamped sample interval; self.last_sample is Some past cold start
        let raw_dt = self
            .last_sample
            .map(|t| now - t)
            .unwrap_or(self.config.min_dt);
        let dt = raw_dt.clamp(self.config.min_dt, self.config.max_dt);
        self.last_sample = Some(now);

        let jerk = ((a - prev) * (1.0 / dt.as_secs_f32())).length();

        let (pitch_z, pitch_y) = pitch_angles(gravity);
        let d_z = (pitch_z - self.prev_pitch_z_deg).abs();
        let d_y = (pitch_y - self.prev_pitch_y_deg).abs();
        self.prev_pitch_z_deg = pitch_z;
        self.prev_pitch_y_deg = pitch_y;

        let d_pitch = match self.config.pitch_model {
            PitchModel::ZAxis => d_z,
            PitchModel::YAxis => d_y,
            PitchModel::AutoMax => d_z.max(d_y),
        };

        let cooled_down = self
            .last_trigger
            .map(|t| now - t >= self.config.cooldown)
            .unwrap_or(true);

        let fired = jerk > self.config.jerk_threshold
            && d_pitch > self.config.pitch_delta_deg
            && cooled_down;
        if fired {
            self.last_trigger = Some(now);
        }

        let reading = SwingReading {
            accel: a,
            gravity,
            jerk,
            pitch_delta_deg: d_pitch,
            fired,
        };

        tracing::trace!(telemetry = %reading.telemetry(), "accel sample");
        if fired {
            tracing::debug!(jerk, d_pitch, "forward swing triggered");
        }

        reading
    }
}

/// Device pitch (degrees) under the Z and Y axis conventions
fn pitch_angles(g: Vec3) -> (f32, f32) {
    let horiz_z = (g.x * g.x + g.y * g.y).sqrt();
    let pitch_z = (-g.z).atan2(horiz_z).to_degrees();

    let horiz_y = (g.x * g.x + g.z * g.z).sqrt();
    let pitch_y = (-g.y).atan2(horiz_y).to_degrees();

    (pitch_z, pitch_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAVITY_FLAT: (f32, f32, f32) = (0.0, 0.0, -9.8);

    fn sample(xyz: (f32, f32, f32), ms: i64) -> AccelSample {
        AccelSample::new(xyz.0, xyz.1, xyz.2, SessionTime::from_millis(ms))
    }

    fn detector() -> SwingDetector {
        SwingDetector::new(SwingConfig::default())
    }

    #[test]
    fn test_first_sample_seeds_gravity_exactly() {
        let mut det = detector();
        let reading = det.ingest(sample(GRAVITY_FLAT, 0));

        assert!(!reading.fired);
        assert_eq!(reading.jerk, 0.0);
        assert_eq!(reading.pitch_delta_deg, 0.0);
        let g = det.gravity().unwrap();
        assert_eq!((g.x, g.y, g.z), GRAVITY_FLAT);
    }

    #[test]
    fn test_gravity_strictly_between_after_second_sample() {
        let mut det = detector();
        det.ingest(sample((0.0, 0.0, -9.8), 0));
        det.ingest(sample((0.0, 4.0, -5.0), 40));

        let g = det.gravity().unwrap();
        // Component-wise strictly between sample 1 and sample 2
        assert!(g.y > 0.0 && g.y < 4.0);
        assert!(g.z > -9.8 && g.z < -5.0);
    }

    #[test]
    fn test_composite_trigger_fires_on_swing() {
        let mut det = detector();
        det.ingest(sample(GRAVITY_FLAT, 0));
        // Hard flick: large accel delta plus a real tilt change
        let reading = det.ingest(sample((0.0, -20.0, 5.0), 40));

        assert!(reading.jerk > det.config().jerk_threshold);
        assert!(reading.pitch_delta_deg > det.config().pitch_delta_deg);
        assert!(reading.fired);
    }

    #[test]
    fn test_jerk_alone_does_not_fire() {
        let mut det = detector();
        det.ingest(sample(GRAVITY_FLAT, 0));
        // Sharp accel spike along the gravity axis: huge jerk, but the
        // filtered gravity direction barely tilts
        let reading = det.ingest(sample((0.0, 0.0, -25.0), 40));

        assert!(reading.jerk > det.config().jerk_threshold);
        assert!(reading.pitch_delta_deg < det.config().pitch_delta_deg);
        assert!(!reading.fired);
    }

    #[test]
    fn test_tilt_alone_does_not_fire() {
        let mut det = detector();
        det.ingest(sample(GRAVITY_FLAT, 0));
        // Slow tilt: spread over many samples so per-sample jerk stays low,
        // then check a sample whose pitch delta is real but jerk is small
        let mut last = det.ingest(sample((0.0, -1.0, -9.7), 40));
        for i in 2..20 {
            let y = -1.0 - i as f32 * 0.04;
            last = det.ingest(sample((0.0, y, -9.7), i * 40));
        }
        assert!(last.jerk < det.config().jerk_threshold);
        assert!(!last.fired);
    }

    #[test]
    fn test_cooldown_allows_exactly_one_trigger() {
        let mut det = detector();
        det.ingest(sample(GRAVITY_FLAT, 0));

        let first = det.ingest(sample((0.0, -20.0, 5.0), 40));
        assert!(first.fired);

        // Qualifying swing inside the cooldown window: suppressed
        let second = det.ingest(sample((0.0, 15.0, -20.0), 80));
        assert!(second.jerk > det.config().jerk_threshold);
        assert!(!second.fired);

        // Past the cooldown the detector is armed again
        det.ingest(sample(GRAVITY_FLAT, 700));
        let third = det.ingest(sample((0.0, -20.0, 5.0), 740));
        assert!(third.fired);
    }

    #[test]
    fn test_non_monotonic_timestamp_does_not_panic() {
        let mut det = detector();
        det.ingest(sample(GRAVITY_FLAT, 100));
        // Timestamp going backwards clamps dt to min_dt
        let reading = det.ingest(sample((0.0, -20.0, 5.0), 50));
        assert!(reading.jerk.is_finite());
    }

    #[test]
    fn test_pitch_history_updates_during_cooldown() {
        let mut det = detector();
        det.ingest(sample(GRAVITY_FLAT, 0));
        let first = det.ingest(sample((0.0, -20.0, 5.0), 40));
        assert!(first.fired);

        // Back to rest while cooling down: each sample must keep updating
        // the pitch history, so successive deltas shrink toward zero
        // instead of accumulating against the pre-swing history.
        det.ingest(sample(GRAVITY_FLAT, 80));
        let reading = det.ingest(sample(GRAVITY_FLAT, 120));
        assert!(reading.pitch_delta_deg < det.config().pitch_delta_deg);
    }
}
