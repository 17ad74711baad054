//! Docent Gesture - Forward-swing recognition
//!
//! Turns a noisy 3-axis accelerometer stream into a discrete, rate-limited
//! "forward swing" event. The trigger is composite: a jerk spike alone or a
//! tilt change alone never fires; both must exceed their thresholds inside
//! one sample, and triggers are spaced by a cooldown.

pub mod detector;
pub mod sensor;

pub use detector::*;
pub use sensor::*;
