//! Progression session lifecycle
//!
//! Ties the pieces together for a host application: the forward-event
//! channel from the sensor link, the frame clock, and the controller. The
//! host calls `update()` once per rendered frame; everything else is
//! explicit lifecycle (`start`, `on_scene_reloaded`, `shutdown`).

use docent_core::{DocentError, DocentResult, FrameClock, SessionTime};
use docent_gesture::ForwardSwing;
use docent_scene::ChapterSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::controller::{ProgressionConfig, ProgressionController};
use crate::fade::FadeOverlay;

/// A running tour: event drain, frame clock and controller in one object
pub struct ProgressionSession {
    controller: ProgressionController,
    events: Option<mpsc::UnboundedReceiver<ForwardSwing>>,
    clock: FrameClock,
    started: bool,
}

impl ProgressionSession {
    /// Build a session around the forward-event receiver taken from
    /// `SensorLink::events()`.
    pub fn new(
        config: ProgressionConfig,
        overlay: Box<dyn FadeOverlay>,
        events: mpsc::UnboundedReceiver<ForwardSwing>,
    ) -> Self {
        Self {
            controller: ProgressionController::new(config, overlay),
            events: Some(events),
            clock: FrameClock::new(),
            started: false,
        }
    }

    /// Bootstrap the chapter set and hard-jump to the default origin
    pub fn start(&mut self, chapters: ChapterSet) {
        self.controller.bootstrap(chapters);
        self.started = true;
        info!("progression session started");
    }

    /// Scene reload: re-run bootstrap over the freshly authored content
    pub fn on_scene_reloaded(&mut self, chapters: ChapterSet) {
        self.controller.bootstrap(chapters);
        info!("progression rebuilt after scene reload");
    }

    /// Per-frame entry point driven by wall-clock time
    pub fn update(&mut self) -> DocentResult<()> {
        let tick = self.clock.tick();
        self.update_at(tick.now, tick.dt)
    }

    /// Frame body on explicit time, used directly by simulators
    pub fn update_at(&mut self, now: SessionTime, dt: Duration) -> DocentResult<()> {
        if !self.started {
            return Err(DocentError::SessionNotStarted);
        }

        // Drain forward events in arrival order before the motion frame;
        // the controller drops the ones it cannot act on
        if let Some(rx) = self.events.as_mut() {
            while rx.try_recv().is_ok() {
                self.controller.handle_forward(now);
            }
        }

        self.controller.update(now, dt);
        Ok(())
    }

    /// UI passthrough for the chapter-advance button
    pub fn request_next_chapter(&mut self) -> DocentResult<()> {
        if !self.started {
            return Err(DocentError::SessionNotStarted);
        }
        self.controller.request_next_chapter(self.clock.now());
        Ok(())
    }

    /// Detach the event channel and drop in-flight motion. The pose stays
    /// wherever the last frame left it.
    pub fn shutdown(&mut self) {
        self.events = None;
        self.controller.clear_motion();
        self.started = false;
        info!("progression session shut down");
    }

    pub fn controller(&self) -> &ProgressionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ProgressionController {
        &mut self.controller
    }
}
