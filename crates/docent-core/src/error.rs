//! Error types for the docent engine

use thiserror::Error;

/// Core docent errors
#[derive(Error, Debug)]
pub enum DocentError {
    // Sensor errors
    #[error("Sensor unavailable: readiness channel closed")]
    SensorUnavailable,

    #[error("Sensor events already claimed")]
    EventsAlreadyClaimed,

    // Session errors
    #[error("Session not started")]
    SessionNotStarted,
}

/// Result type for docent operations
pub type DocentResult<T> = Result<T, DocentError>;
