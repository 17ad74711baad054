//! Screen fade sub-operation
//!
//! The fade surface is an external renderable overlay; the controller only
//! ever sets its opacity and its input-blocking flag. Alpha runs on a linear
//! ramp over unscaled time. Input is blocked the moment a fade starts and is
//! released only once the surface is fully transparent again.

use std::sync::Arc;
use std::time::Duration;

use docent_core::SessionTime;
use parking_lot::Mutex;

/// Alpha below which the surface counts as fully transparent
pub const TRANSPARENT_ALPHA: f32 = 0.01;

/// The two properties of the external fade surface the controller touches
pub trait FadeOverlay: Send {
    fn alpha(&self) -> f32;

    fn set_alpha(&mut self, alpha: f32);

    fn set_blocks_input(&mut self, blocks: bool);

    /// Whether a real surface is attached; fades complete immediately
    /// when there is none.
    fn is_attached(&self) -> bool {
        true
    }
}

/// Plain fade surface state, shared with the host renderer
#[derive(Debug, Default)]
pub struct ScreenFade {
    alpha: f32,
    blocks_input: bool,
}

impl ScreenFade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn blocks_input(&self) -> bool {
        self.blocks_input
    }
}

impl FadeOverlay for ScreenFade {
    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_blocks_input(&mut self, blocks: bool) {
        self.blocks_input = blocks;
    }
}

/// Handle shared between the controller (writer) and the host renderer
pub type SharedFade = Arc<Mutex<ScreenFade>>;

pub fn shared_fade() -> SharedFade {
    Arc::new(Mutex::new(ScreenFade::new()))
}

impl FadeOverlay for SharedFade {
    fn alpha(&self) -> f32 {
        self.lock().alpha()
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.lock().set_alpha(alpha);
    }

    fn set_blocks_input(&mut self, blocks: bool) {
        self.lock().set_blocks_input(blocks);
    }
}

/// For hosts without a fade surface
#[derive(Debug, Default)]
pub struct NullOverlay;

impl FadeOverlay for NullOverlay {
    fn alpha(&self) -> f32 {
        0.0
    }

    fn set_alpha(&mut self, _alpha: f32) {}

    fn set_blocks_input(&mut self, _blocks: bool) {}

    fn is_attached(&self) -> bool {
        false
    }
}

/// One in-flight fade toward a target alpha
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    start_alpha: f32,
    target_alpha: f32,
    start: SessionTime,
    duration: Duration,
}

impl Fade {
    /// Capture the current alpha and raise input blocking
    pub fn begin(
        overlay: &mut dyn FadeOverlay,
        target_alpha: f32,
        now: SessionTime,
        duration: Duration,
    ) -> Self {
        overlay.set_blocks_input(true);
        Self {
            start_alpha: overlay.alpha(),
            target_alpha,
            start: now,
            duration: duration.max(Duration::from_millis(10)),
        }
    }

    /// Advance the fade. Returns true once complete; the final alpha is
    /// assigned exactly and blocking is released only when fully
    /// transparent.
    pub fn step(&self, overlay: &mut dyn FadeOverlay, now: SessionTime) -> bool {
        let k = ((now - self.start).as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);

        if k < 1.0 {
            overlay.set_alpha(self.start_alpha + (self.target_alpha - self.start_alpha) * k);
            return false;
        }

        overlay.set_alpha(self.target_alpha);
        overlay.set_blocks_input(self.target_alpha > TRANSPARENT_ALPHA);
        true
    }
}
