//! Scripted accelerometer input and fixed-timestep frame driving
//!
//! `SensorScript` composes timed motion phases into a deterministic, seeded
//! sample sequence; `FrameSimulator` advances the progression pipeline on
//! synthetic session time so whole-tour behavior is reproducible in tests.

use std::time::Duration;

use docent_core::{DocentResult, SessionTime, Vec3};
use docent_gesture::{AccelSample, Accelerometer, SensorLink};
use docent_motion::{ProgressionController, ProgressionSession};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;

const GRAVITY: f32 = 9.8;

/// One timed phase of scripted device motion
#[derive(Debug, Clone, Copy)]
enum Segment {
    /// Device held still, flat
    Rest(Duration),
    /// Forward flick: accel spike plus a real tilt change
    Swing(Duration),
    /// Magnitude-only spike along the gravity axis (no tilt)
    Spike(Duration),
    /// Slow tilt spread over the whole phase (no spike)
    Tilt { duration: Duration, total_deg: f32 },
}

impl Segment {
    fn duration(&self) -> Duration {
        match *self {
            Segment::Rest(d) | Segment::Swing(d) | Segment::Spike(d) => d,
            Segment::Tilt { duration, .. } => duration,
        }
    }
}

/// Builder for a deterministic accelerometer sample sequence
pub struct SensorScript {
    segments: Vec<Segment>,
    sample_interval: Duration,
    noise: f32,
    seed: u64,
}

impl SensorScript {
    pub fn new(seed: u64) -> Self {
        Self {
            segments: Vec::new(),
            sample_interval: Duration::from_millis(20),
            noise: 0.05,
            seed,
        }
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    pub fn rest(mut self, ms: u64) -> Self {
        self.segments.push(Segment::Rest(Duration::from_millis(ms)));
        self
    }

    pub fn swing(mut self, ms: u64) -> Self {
        self.segments.push(Segment::Swing(Duration::from_millis(ms)));
        self
    }

    pub fn spike(mut self, ms: u64) -> Self {
        self.segments.push(Segment::Spike(Duration::from_millis(ms)));
        self
    }

    pub fn tilt(mut self, ms: u64, total_deg: f32) -> Self {
        self.segments.push(Segment::Tilt {
            duration: Duration::from_millis(ms),
            total_deg,
        });
        self
    }

    /// Render the script into timestamped samples starting at `start`
    pub fn samples(&self, start: SessionTime) -> Vec<AccelSample> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut out = Vec::new();
        let mut t = start;

        for segment in &self.segments {
            let n = (segment.duration().as_micros() / self.sample_interval.as_micros()).max(1);
            for i in 0..n {
                let base = match *segment {
                    Segment::Rest(_) => Vec3::new(0.0, 0.0, -GRAVITY),
                    Segment::Swing(_) => Vec3::new(0.0, -20.0, 5.0),
                    Segment::Spike(_) => Vec3::new(0.0, 0.0, -25.0),
                    Segment::Tilt { total_deg, .. } => {
                        let angle = (total_deg * (i + 1) as f32 / n as f32).to_radians();
                        Vec3::new(0.0, -GRAVITY * angle.sin(), -GRAVITY * angle.cos())
                    }
                };
                out.push(AccelSample::new(
                    base.x + rng.gen_range(-1.0..1.0) * self.noise,
                    base.y + rng.gen_range(-1.0..1.0) * self.noise,
                    base.z + rng.gen_range(-1.0..1.0) * self.noise,
                    t,
                ));
                t = t + self.sample_interval;
            }
        }

        out
    }
}

/// Always-ready accelerometer for scripted tests
pub struct ScriptedAccelerometer {
    // Keeps the readiness channel alive for the link's lifetime
    _ready_tx: watch::Sender<bool>,
    ready_rx: watch::Receiver<bool>,
}

impl ScriptedAccelerometer {
    pub fn new() -> Self {
        let (ready_tx, ready_rx) = watch::channel(true);
        Self {
            _ready_tx: ready_tx,
            ready_rx,
        }
    }
}

impl Default for ScriptedAccelerometer {
    fn default() -> Self {
        Self::new()
    }
}

impl Accelerometer for ScriptedAccelerometer {
    fn readiness(&self) -> watch::Receiver<bool> {
        self.ready_rx.clone()
    }

    fn start(&mut self) {}

    fn stop(&mut self) {}
}

/// Fixed-timestep driver for the progression pipeline
pub struct FrameSimulator {
    now: SessionTime,
    frame: Duration,
}

impl FrameSimulator {
    /// 60 fps simulator starting at session time zero
    pub fn new() -> Self {
        Self::with_frame(Duration::from_micros(16_667))
    }

    pub fn with_frame(frame: Duration) -> Self {
        Self {
            now: SessionTime::ZERO,
            frame,
        }
    }

    pub fn now(&self) -> SessionTime {
        self.now
    }

    /// Advance the controller by one frame
    pub fn step(&mut self, controller: &mut ProgressionController) {
        self.now = self.now + self.frame;
        controller.update(self.now, self.frame);
    }

    pub fn run(&mut self, controller: &mut ProgressionController, frames: u32) {
        for _ in 0..frames {
            self.step(controller);
        }
    }

    /// Run until the controller reports idle; false if the frame budget
    /// runs out first.
    pub fn run_until_idle(&mut self, controller: &mut ProgressionController, budget: u32) -> bool {
        for _ in 0..budget {
            if !controller.is_advancing() {
                return true;
            }
            self.step(controller);
        }
        !controller.is_advancing()
    }

    pub fn run_session(
        &mut self,
        session: &mut ProgressionSession,
        frames: u32,
    ) -> DocentResult<()> {
        for _ in 0..frames {
            self.now = self.now + self.frame;
            session.update_at(self.now, self.frame)?;
        }
        Ok(())
    }

    /// Feed scripted samples through the sensor link in timestamp order,
    /// interleaved with session frames, then run `tail_frames` more so
    /// in-flight motion can finish.
    pub fn drive_script<S: Accelerometer>(
        &mut self,
        link: &mut SensorLink<S>,
        session: &mut ProgressionSession,
        samples: &[AccelSample],
        tail_frames: u32,
    ) -> DocentResult<()> {
        let mut next = 0;
        while next < samples.len() {
            self.now = self.now + self.frame;
            while next < samples.len() && samples[next].timestamp <= self.now {
                link.handle_sample(samples[next]);
                next += 1;
            }
            session.update_at(self.now, self.frame)?;
        }
        self.run_session(session, tail_frames)
    }
}

impl Default for FrameSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_deterministic() {
        let a = SensorScript::new(11).rest(100).swing(40).samples(SessionTime::ZERO);
        let b = SensorScript::new(11).rest(100).swing(40).samples(SessionTime::ZERO);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!((x.x, x.y, x.z, x.timestamp), (y.x, y.y, y.z, y.timestamp));
        }
    }

    #[test]
    fn test_script_sample_spacing() {
        let samples = SensorScript::new(0).rest(100).samples(SessionTime::ZERO);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[1].timestamp - samples[0].timestamp, Duration::from_millis(20));
    }

    #[test]
    fn test_rest_noise_stays_small() {
        let samples = SensorScript::new(3).rest(500).samples(SessionTime::ZERO);
        for s in &samples {
            assert!((s.vector() - Vec3::new(0.0, 0.0, -GRAVITY)).length() < 0.2);
        }
    }
}
