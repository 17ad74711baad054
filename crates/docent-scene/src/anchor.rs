//! Anchors and hotspots - authored points in the scene

use docent_core::{Pose, Quat, Vec3};

/// A single authored camera pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Anchor {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Anchor at a position, looking along the default forward axis
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// A secondary point of interest inside a chapter.
///
/// Hotspots are consumed by the direction-hint collaborator only; the motion
/// controller never reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub label: String,
    pub position: Vec3,
}

impl Hotspot {
    pub fn new(label: impl Into<String>, position: Vec3) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}
