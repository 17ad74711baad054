//! Docent Motion - Camera progression
//!
//! Advances the camera one anchor at a time on forward-swing events and
//! performs chapter-to-chapter transitions (retreat to origin, screen fade,
//! teleport or smooth move) as a fixed sequence of sub-operations. Motion is
//! jitter-resistant: an eased target is chased with a critically-damped
//! filter and a leg ends on a multi-frame convergence test, never a snap.

pub mod controller;
pub mod fade;
pub mod sequence;
pub mod session;
pub mod tween;

pub use controller::*;
pub use fade::*;
pub use sequence::*;
pub use session::*;
pub use tween::*;
