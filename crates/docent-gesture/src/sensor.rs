//! Sensor subscription boundary
//!
//! The platform pushes accelerometer samples at a rate it chooses; docent
//! never polls. `SensorLink` owns that boundary: it waits for the sensor to
//! report ready (no global readiness flag), starts and stops the hardware
//! idempotently, and forwards fired swings into a channel drained by the
//! progression session on its own frame. The push callback only ever mutates
//! detector state - it never touches progression state.

use docent_core::{DocentError, DocentResult};
use tokio::sync::{mpsc, watch};

use crate::{AccelSample, SwingConfig, SwingDetector};

/// Discrete zero-argument forward event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardSwing;

/// A push-style acceleration source.
///
/// `start` and `stop` must be idempotent; implementations deliver samples to
/// `SensorLink::handle_sample` from their platform callback.
pub trait Accelerometer {
    /// Readiness channel: flips to `true` once the underlying sensor
    /// subsystem can deliver samples.
    fn readiness(&self) -> watch::Receiver<bool>;

    fn start(&mut self);

    fn stop(&mut self);
}

/// Hook receiving the per-sample telemetry line, for an external debug HUD
pub type DebugHook = Box<dyn FnMut(&str) + Send>;

/// Owns an accelerometer subscription and the swing detector behind it
pub struct SensorLink<S: Accelerometer> {
    sensor: S,
    detector: SwingDetector,
    tx: mpsc::UnboundedSender<ForwardSwing>,
    rx: Option<mpsc::UnboundedReceiver<ForwardSwing>>,
    debug_hook: Option<DebugHook>,
    subscribed: bool,
}

impl<S: Accelerometer> SensorLink<S> {
    /// Wait until the sensor subsystem reports ready, then subscribe.
    ///
    /// Errors with [`DocentError::SensorUnavailable`] if the sensor drops
    /// its readiness channel without ever becoming ready.
    pub async fn connect(sensor: S, config: SwingConfig) -> DocentResult<Self> {
        let mut readiness = sensor.readiness();
        while !*readiness.borrow() {
            readiness
                .changed()
                .await
                .map_err(|_| DocentError::SensorUnavailable)?;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut link = Self {
            sensor,
            detector: SwingDetector::new(config),
            tx,
            rx: Some(rx),
            debug_hook: None,
            subscribed: false,
        };
        link.subscribe();
        tracing::info!("sensor link connected");
        Ok(link)
    }

    /// Start sample delivery; safe to call repeatedly
    pub fn subscribe(&mut self) {
        if !self.subscribed {
            self.sensor.start();
            self.subscribed = true;
        }
    }

    /// Stop sample delivery; safe to call repeatedly
    pub fn unsubscribe(&mut self) {
        if self.subscribed {
            self.sensor.stop();
            self.subscribed = false;
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Platform push callback: feed one sample through the detector and
    /// forward a fired swing into the event channel.
    pub fn handle_sample(&mut self, sample: AccelSample) {
        let reading = self.detector.ingest(sample);

        if let Some(hook) = self.debug_hook.as_mut() {
            hook(&reading.telemetry());
        }

        if reading.fired {
            // Receiver gone means the session shut down; the event is
            // deliberately dropped, not an error.
            let _ = self.tx.send(ForwardSwing);
        }
    }

    /// Take the forward-event receiver; valid exactly once
    pub fn events(&mut self) -> DocentResult<mpsc::UnboundedReceiver<ForwardSwing>> {
        self.rx.take().ok_or(DocentError::EventsAlreadyClaimed)
    }

    /// Install the diagnostic HUD hook
    pub fn set_debug_hook(&mut self, hook: DebugHook) {
        self.debug_hook = Some(hook);
    }

    pub fn detector(&self) -> &SwingDetector {
        &self.detector
    }
}

impl<S: Accelerometer> Drop for SensorLink<S> {
    /// Matched teardown: every subscribe gets its unsubscribe
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
