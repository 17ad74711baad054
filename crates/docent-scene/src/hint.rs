//! Off-screen hotspot direction hints
//!
//! Classifies the active chapter's unvisited hotspots against the current
//! camera pose: on-screen hotspots need no hint, off-screen ones raise a
//! left or right indicator, hotspots behind the camera are ignored. The
//! bearing test is horizontal only; the host UI owns the actual indicators.

use std::collections::HashSet;

use docent_core::Pose;

use crate::AnchorChapter;

/// Where a hotspot sits relative to the camera view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotPlacement {
    OnScreen,
    OffLeft,
    OffRight,
    Behind,
}

/// Which hint indicators should show this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintReport {
    pub left: bool,
    pub right: bool,
}

/// Signed horizontal bearing from the camera forward axis to `target`,
/// in degrees; positive means the target is to the right.
pub fn horizontal_bearing(pose: &Pose, target: docent_core::Vec3) -> f32 {
    let f = pose.rotation.forward();
    let d = target - pose.position;

    let cross = f.x * d.z - f.z * d.x;
    let dot = f.x * d.x + f.z * d.z;
    cross.atan2(dot).to_degrees()
}

/// Classify one hotspot position against the camera
pub fn classify(pose: &Pose, target: docent_core::Vec3, half_fov_deg: f32) -> HotspotPlacement {
    let bearing = horizontal_bearing(pose, target);

    if bearing.abs() >= 90.0 {
        HotspotPlacement::Behind
    } else if bearing.abs() <= half_fov_deg {
        HotspotPlacement::OnScreen
    } else if bearing < 0.0 {
        HotspotPlacement::OffLeft
    } else {
        HotspotPlacement::OffRight
    }
}

/// Aggregate hint state for the active chapter.
///
/// Hotspots whose label appears in `visited` no longer participate.
pub fn hint_report(
    pose: &Pose,
    chapter: &AnchorChapter,
    half_fov_deg: f32,
    visited: &HashSet<String>,
) -> HintReport {
    let mut report = HintReport::default();

    for hotspot in &chapter.hotspots {
        if visited.contains(&hotspot.label) {
            continue;
        }
        match classify(pose, hotspot.position, half_fov_deg) {
            HotspotPlacement::OffLeft => report.left = true,
            HotspotPlacement::OffRight => report.right = true,
            HotspotPlacement::OnScreen | HotspotPlacement::Behind => {}
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Anchor, Hotspot};
    use docent_core::{Quat, Vec3};

    fn camera_at_origin() -> Pose {
        // Identity rotation looks along -Z
        Pose::new(Vec3::ZERO, Quat::IDENTITY)
    }

    #[test]
    fn test_bearing_signs() {
        let pose = camera_at_origin();

        // Directly ahead
        assert!(horizontal_bearing(&pose, Vec3::new(0.0, 0.0, -5.0)).abs() < 0.01);
        // To the right (+X when looking down -Z)
        assert!(horizontal_bearing(&pose, Vec3::new(5.0, 0.0, -5.0)) > 0.0);
        // To the left
        assert!(horizontal_bearing(&pose, Vec3::new(-5.0, 0.0, -5.0)) < 0.0);
    }

    #[test]
    fn test_classify_placements() {
        let pose = camera_at_origin();
        let half_fov = 30.0;

        assert_eq!(
            classify(&pose, Vec3::new(0.0, 0.0, -5.0), half_fov),
            HotspotPlacement::OnScreen
        );
        assert_eq!(
            classify(&pose, Vec3::new(5.0, 0.0, -1.0), half_fov),
            HotspotPlacement::OffRight
        );
        assert_eq!(
            classify(&pose, Vec3::new(-5.0, 0.0, -1.0), half_fov),
            HotspotPlacement::OffLeft
        );
        assert_eq!(
            classify(&pose, Vec3::new(0.0, 0.0, 5.0), half_fov),
            HotspotPlacement::Behind
        );
    }

    #[test]
    fn test_visited_hotspots_excluded() {
        let pose = camera_at_origin();
        let chapter = AnchorChapter::new(vec![Anchor::at(Vec3::ZERO)]).with_hotspots(vec![
            Hotspot::new("vase", Vec3::new(5.0, 0.0, -1.0)),
            Hotspot::new("mural", Vec3::new(-5.0, 0.0, -1.0)),
        ]);

        let mut visited = HashSet::new();
        let report = hint_report(&pose, &chapter, 30.0, &visited);
        assert!(report.left && report.right);

        visited.insert("mural".to_string());
        let report = hint_report(&pose, &chapter, 30.0, &visited);
        assert!(!report.left && report.right);
    }

    #[test]
    fn test_behind_raises_no_hint() {
        let pose = camera_at_origin();
        let chapter = AnchorChapter::new(vec![Anchor::at(Vec3::ZERO)])
            .with_hotspots(vec![Hotspot::new("door", Vec3::new(0.0, 0.0, 5.0))]);

        let report = hint_report(&pose, &chapter, 30.0, &HashSet::new());
        assert_eq!(report, HintReport::default());
    }
}
