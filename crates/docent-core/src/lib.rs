//! Docent Core - Fundamental types and primitives
//!
//! This crate defines the types used throughout the docent engine:
//! - Pose math (Vec3, Quat, Pose)
//! - Time primitives (SessionTime, FrameClock)
//! - Error types

pub mod error;
pub mod math;
pub mod time;

pub use error::*;
pub use math::*;
pub use time::*;
