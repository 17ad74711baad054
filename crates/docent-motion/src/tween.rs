//! Single-leg damped tween
//!
//! One leg moves the camera from a source pose to a target pose over a
//! fixed duration. The position chases an eased interpolation target through
//! a critically-damped filter instead of being assigned, which absorbs
//! frame-time irregularity on a frame-locked display; the rotation decays
//! its remaining angle exponentially, independent of the positional ease.
//!
//! A leg completes on settlement (distance, residual velocity and residual
//! angle all under epsilon for several consecutive frames) or on the
//! time-based fallback. The final pose is deliberately never snapped to the
//! exact target: forcing an exact assignment after a damped approach is what
//! produces a visible snap.

use std::time::Duration;

use docent_core::{Pose, SessionTime, Vec3};

/// Ease curve applied to the normalized leg time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// 3t^2 - 2t^3 ease-in-out
    #[default]
    SmoothStep,
}

impl Ease {
    pub fn eval(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Smoothing and convergence tunables shared by every leg
#[derive(Debug, Clone)]
pub struct TweenConfig {
    /// Position filter time constant (seconds); larger = softer
    pub smooth_time: f32,
    /// Position filter speed bound (units/second)
    pub max_speed: f32,
    /// Rotation decay time constant (seconds)
    pub rot_smooth_time: f32,
    /// Settlement epsilons
    pub pos_epsilon: f32,
    pub vel_epsilon: f32,
    pub ang_epsilon_deg: f32,
    /// Consecutive qualifying frames required to settle
    pub settle_frames: u32,
    pub ease: Ease,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            smooth_time: 0.12,
            max_speed: 100.0,
            rot_smooth_time: 0.10,
            pos_epsilon: 0.002,
            vel_epsilon: 0.002,
            ang_epsilon_deg: 0.15,
            settle_frames: 2,
            ease: Ease::SmoothStep,
        }
    }
}

/// Critically-damped approach of `current` toward `target`.
///
/// Game Programming Gems smooth-damp form: stable for any `dt`, speed
/// bounded by `max_speed`, and never overshoots the target.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    vel: &mut Vec3,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> Vec3 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = (current - target).clamp_length(max_speed * smooth_time);
    let clamped_target = current - change;

    let temp = (*vel + change * omega) * dt;
    *vel = (*vel - temp * omega) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    // Overshoot guard
    if (target - current).dot(&(output - target)) > 0.0 {
        output = target;
        *vel = Vec3::ZERO;
    }

    output
}

/// One in-flight motion leg
#[derive(Debug, Clone)]
pub struct Tween {
    from: Pose,
    to: Pose,
    start: SessionTime,
    duration: Duration,
    vel: Vec3,
    settled_count: u32,
}

impl Tween {
    /// Elapsed fraction past which completion is forced
    const FALLBACK_FRACTION: f32 = 1.2;

    pub fn new(from: Pose, to: Pose, start: SessionTime, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(Duration::from_micros(100)),
            vel: Vec3::ZERO,
            settled_count: 0,
        }
    }

    pub fn target(&self) -> &Pose {
        &self.to
    }

    /// Advance the leg by one frame. Returns true once the leg is complete,
    /// either by settlement or by the time-based fallback.
    pub fn step(
        &mut self,
        pose: &mut Pose,
        now: SessionTime,
        dt: Duration,
        config: &TweenConfig,
    ) -> bool {
        let dt_s = dt.as_secs_f32();

        // Absolute-time progression: a dropped frame cannot under-step
        let raw_t = (now - self.start).as_secs_f32() / self.duration.as_secs_f32();
        let k = config.ease.eval(raw_t);

        let eased_target = self.from.position.lerp(&self.to.position, k);
        pose.position = smooth_damp(
            pose.position,
            eased_target,
            &mut self.vel,
            config.smooth_time,
            config.max_speed,
            dt_s,
        );

        // Rotation: exponential step toward the final target, decoupled
        // from the positional ease curve
        let angle = pose.rotation.angle_to(&self.to.rotation);
        let step_deg = angle * (1.0 - (-dt_s / config.rot_smooth_time.max(1e-4)).exp());
        pose.rotation = pose.rotation.rotate_towards(&self.to.rotation, step_deg);

        let dist = pose.position.distance(&self.to.position);
        let speed = self.vel.length();
        let angle_left = pose.rotation.angle_to(&self.to.rotation);

        let settled_this_frame = dist <= config.pos_epsilon
            && speed <= config.vel_epsilon
            && angle_left <= config.ang_epsilon_deg;
        self.settled_count = if settled_this_frame {
            self.settled_count + 1
        } else {
            0
        };

        self.settled_count >= config.settle_frames || raw_t >= Self::FALLBACK_FRACTION
    }
}
