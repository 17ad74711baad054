//! Ready-made gesture scripts
//!
//! Each scenario produces motion whose trigger outcome is known in advance
//! against the default detector thresholds.

use crate::simulator::SensorScript;

/// One clean forward flick: exactly one trigger
pub fn single_swing(seed: u64) -> SensorScript {
    SensorScript::new(seed).rest(500).swing(60).rest(200)
}

/// Two qualifying flicks inside one cooldown window: exactly one trigger
pub fn double_swing_inside_cooldown(seed: u64) -> SensorScript {
    SensorScript::new(seed)
        .rest(500)
        .swing(60)
        .rest(300)
        .swing(60)
        .rest(200)
}

/// Two flicks far enough apart to both trigger
pub fn separated_swings(seed: u64) -> SensorScript {
    SensorScript::new(seed)
        .rest(500)
        .swing(60)
        .rest(2000)
        .swing(60)
        .rest(200)
}

/// Accel spike with no tilt change: never triggers
pub fn jerk_only(seed: u64) -> SensorScript {
    SensorScript::new(seed).rest(500).spike(60).rest(200)
}

/// Slow tilt with no spike: never triggers.
///
/// The script ends tilted; snapping back to rest would itself look like a
/// flick.
pub fn tilt_only(seed: u64) -> SensorScript {
    SensorScript::new(seed).rest(300).tilt(800, 40.0)
}
