//! Docent Test Harness - Scripted sensors and frame simulation
//!
//! This crate provides:
//! - Deterministic, seeded accelerometer scripts
//! - A fixed-timestep frame simulator for the progression pipeline
//! - Ready-made gesture scenarios

pub mod scenarios;
pub mod simulator;

pub use simulator::*;
