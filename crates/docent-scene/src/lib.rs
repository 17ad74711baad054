//! Docent Scene - Authored content data model
//!
//! Anchors, anchor chapters and the per-session chapter set. Everything in
//! this crate is constructed once from authored content at load time and is
//! read-only afterwards; the motion controller never mutates it.

pub mod anchor;
pub mod chapter;
pub mod hint;

pub use anchor::*;
pub use chapter::*;
pub use hint::*;
