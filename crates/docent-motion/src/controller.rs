//! Camera progression controller
//!
//! Owns the camera pose and the progression cursor (chapter index, anchor
//! index). Forward-swing events advance one anchor at a time; a chapter
//! advance runs a fixed transition sequence built from the active chapter's
//! policy and the configured transition mode. Requests that arrive while any
//! motion is in flight are discarded, never queued.

use std::time::Duration;

use docent_core::{Pose, SessionTime};
use docent_scene::{AnchorChapter, ChapterSet};
use tracing::{debug, info, trace, warn};

use crate::fade::{Fade, FadeOverlay};
use crate::sequence::{Sequence, Step};
use crate::tween::{Tween, TweenConfig};

/// How the camera crosses from one chapter's origin to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionMode {
    /// Instant cut to the next chapter's origin
    Teleport,
    /// Damped move from the old origin to the new one
    SmoothMove,
    /// Fade to black, cut, fade back
    #[default]
    FadeAndTeleport,
    /// Fade to black, cut to the old origin, switch, fade back, then move
    FadeAndSmoothMove,
}

/// Progression tunables
#[derive(Debug, Clone)]
pub struct ProgressionConfig {
    /// Duration of a single anchor-to-anchor leg
    pub move_duration: Duration,
    /// Duration of the origin-to-origin leg in SmoothMove modes
    pub chapter_move_duration: Duration,
    /// Duration of each half of a screen fade
    pub fade_duration: Duration,
    pub transition_mode: TransitionMode,
    pub tween: TweenConfig,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            move_duration: Duration::from_millis(1200),
            chapter_move_duration: Duration::from_millis(1000),
            fade_duration: Duration::from_millis(300),
            transition_mode: TransitionMode::default(),
            tween: TweenConfig::default(),
        }
    }
}

/// What the controller is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A single anchor-to-anchor leg is in flight
    AdvancingAnchor,
    /// A chapter transition sequence is running
    ChapterTransition,
}

/// Per-frame owner of the camera pose and progression cursor
pub struct ProgressionController {
    config: ProgressionConfig,
    chapters: ChapterSet,
    chapter_index: usize,
    anchor_index: usize,
    phase: Phase,
    pose: Pose,
    overlay: Box<dyn FadeOverlay>,
    tween: Option<Tween>,
    fade: Option<Fade>,
    sequence: Sequence,
    /// Anchor index committed when the forward advance leg completes
    pending_index: Option<usize>,
}

impl ProgressionController {
    pub fn new(config: ProgressionConfig, overlay: Box<dyn FadeOverlay>) -> Self {
        Self {
            config,
            chapters: ChapterSet::default(),
            chapter_index: 0,
            anchor_index: 0,
            phase: Phase::Idle,
            pose: Pose::default(),
            overlay,
            tween: None,
            fade: None,
            sequence: Sequence::new(),
            pending_index: None,
        }
    }

    /// Install a chapter set, select its default chapter and hard-jump to
    /// that chapter's origin. Discards any in-flight motion. Safe to re-run
    /// on every scene load.
    pub fn bootstrap(&mut self, chapters: ChapterSet) {
        self.chapters = chapters;
        self.chapter_index = self.chapters.default_index();
        self.anchor_index = 0;
        self.clear_motion();
        self.jump_to_origin();
        info!(
            chapters = self.chapters.len(),
            chapter = self.chapter_index,
            "progression bootstrapped"
        );
    }

    /// Hard pose assignment to the active chapter's origin, no tween
    pub fn jump_to_origin(&mut self) {
        let origin = self
            .chapters
            .get(self.chapter_index)
            .and_then(|c| c.origin())
            .map(|a| a.pose());
        match origin {
            Some(pose) => {
                self.pose = pose;
                self.anchor_index = 0;
            }
            None => warn!("no usable chapter, camera left in place"),
        }
    }

    /// Discard the active tween, fade and any queued transition steps
    pub fn clear_motion(&mut self) {
        self.tween = None;
        self.fade = None;
        self.sequence.clear();
        self.pending_index = None;
        self.phase = Phase::Idle;
    }

    /// Advance one anchor on a forward-swing event. Dropped silently unless
    /// idle and not already at the chapter's final anchor.
    pub fn handle_forward(&mut self, now: SessionTime) {
        if self.phase != Phase::Idle {
            trace!(phase = ?self.phase, "forward event dropped while busy");
            return;
        }
        let Some(chapter) = self.chapters.get(self.chapter_index) else {
            return;
        };
        if self.anchor_index >= chapter.last_index() {
            trace!(
                anchor = self.anchor_index,
                "forward event dropped at final anchor"
            );
            return;
        }

        let next = self.anchor_index + 1;
        let Some(anchor) = chapter.anchor(next) else {
            return;
        };
        let target = anchor.pose();
        self.pending_index = Some(next);
        self.tween = Some(Tween::new(self.pose, target, now, self.config.move_duration));
        self.phase = Phase::AdvancingAnchor;
        debug!(from = self.anchor_index, to = next, "anchor advance started");
    }

    /// Begin the chapter transition. Accepted only while idle and at the
    /// active chapter's final anchor; the first step starts this frame.
    pub fn request_next_chapter(&mut self, now: SessionTime) {
        if self.phase != Phase::Idle {
            trace!(phase = ?self.phase, "chapter request dropped while busy");
            return;
        }
        let Some(chapter) = self.chapters.get(self.chapter_index) else {
            return;
        };
        if self.anchor_index != chapter.last_index() {
            trace!(
                anchor = self.anchor_index,
                "chapter request dropped before final anchor"
            );
            return;
        }

        let mut seq = Sequence::new();

        // Retreat legs back through every prior anchor to the origin; the
        // cursor commits after each leg settles
        if chapter.return_to_origin_on_advance && self.anchor_index > 0 {
            for i in (0..self.anchor_index).rev() {
                if let Some(anchor) = chapter.anchor(i) {
                    seq.push(Step::MoveTo {
                        target: anchor.pose(),
                        duration: self.config.move_duration,
                    });
                    seq.push(Step::SetAnchorIndex(i));
                }
            }
        }

        let next_index = self.chapter_index + 1;
        if let Some(next) = self.chapters.get(next_index) {
            let (Some(old_origin), Some(new_origin)) = (chapter.origin(), next.origin()) else {
                return;
            };
            let (old_origin, new_origin) = (old_origin.pose(), new_origin.pose());

            match self.config.transition_mode {
                TransitionMode::Teleport => {
                    seq.push(Step::ActivateChapter(next_index));
                    seq.push(Step::SnapTo(new_origin));
                }
                TransitionMode::SmoothMove => {
                    seq.push(Step::SnapTo(old_origin));
                    seq.push(Step::ActivateChapter(next_index));
                    seq.push(Step::MoveTo {
                        target: new_origin,
                        duration: self.config.chapter_move_duration,
                    });
                }
                TransitionMode::FadeAndTeleport => {
                    seq.push(Step::FadeTo(1.0));
                    seq.push(Step::ActivateChapter(next_index));
                    seq.push(Step::SnapTo(new_origin));
                    seq.push(Step::FadeTo(0.0));
                }
                TransitionMode::FadeAndSmoothMove => {
                    seq.push(Step::FadeTo(1.0));
                    seq.push(Step::SnapTo(old_origin));
                    seq.push(Step::ActivateChapter(next_index));
                    seq.push(Step::FadeTo(0.0));
                    seq.push(Step::MoveTo {
                        target: new_origin,
                        duration: self.config.chapter_move_duration,
                    });
                }
            }
        } else if seq.is_empty() {
            // Final chapter with nothing to retreat through
            trace!("chapter request dropped at final chapter");
            return;
        }

        debug!(
            steps = seq.len(),
            mode = ?self.config.transition_mode,
            "chapter transition started"
        );
        self.sequence = seq;
        self.phase = Phase::ChapterTransition;
        self.pump(now);
    }

    /// The single per-frame mutator. Drives the active fade or tween, then
    /// pumps the pending transition sequence.
    pub fn update(&mut self, now: SessionTime, dt: Duration) {
        if let Some(fade) = self.fade {
            if !fade.step(self.overlay.as_mut(), now) {
                return;
            }
            self.fade = None;
        } else if let Some(tween) = self.tween.as_mut() {
            if !tween.step(&mut self.pose, now, dt, &self.config.tween) {
                return;
            }
            self.tween = None;
            if let Some(index) = self.pending_index.take() {
                self.anchor_index = index;
            }
            if self.phase == Phase::AdvancingAnchor {
                self.phase = Phase::Idle;
                debug!(anchor = self.anchor_index, "anchor advance settled");
                if self.auto_advance_ready() {
                    // Reached the final anchor of an auto-advancing chapter:
                    // the chapter request re-enters this same frame
                    self.request_next_chapter(now);
                }
            }
        }

        self.pump(now);
    }

    /// Start queued steps until one occupies the frame or the queue drains
    fn pump(&mut self, now: SessionTime) {
        while self.tween.is_none() && self.fade.is_none() {
            let Some(step) = self.sequence.pop_front() else {
                if self.phase == Phase::ChapterTransition {
                    self.phase = Phase::Idle;
                    debug!(
                        chapter = self.chapter_index,
                        "chapter transition complete"
                    );
                }
                return;
            };
            self.start_step(step, now);
        }
    }

    fn start_step(&mut self, step: Step, now: SessionTime) {
        match step {
            Step::MoveTo { target, duration } => {
                self.tween = Some(Tween::new(self.pose, target, now, duration));
            }
            Step::SnapTo(pose) => {
                self.pose = pose;
            }
            Step::FadeTo(alpha) => {
                // Without a fade surface the step completes immediately
                if self.overlay.is_attached() {
                    self.fade = Some(Fade::begin(
                        self.overlay.as_mut(),
                        alpha,
                        now,
                        self.config.fade_duration,
                    ));
                }
            }
            Step::ActivateChapter(index) => {
                self.chapter_index = index;
                self.anchor_index = 0;
                info!(chapter = index, "chapter activated");
            }
            Step::SetAnchorIndex(index) => {
                self.anchor_index = index;
            }
        }
    }

    fn auto_advance_ready(&self) -> bool {
        self.chapters
            .get(self.chapter_index)
            .map(|c| c.auto_advance_on_last_anchor && self.anchor_index == c.last_index())
            .unwrap_or(false)
    }

    pub fn active_chapter(&self) -> Option<&AnchorChapter> {
        self.chapters.get(self.chapter_index)
    }

    pub fn active_chapter_index(&self) -> usize {
        self.chapter_index
    }

    pub fn active_anchor_index(&self) -> usize {
        self.anchor_index
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_advancing(&self) -> bool {
        self.phase != Phase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fade::{shared_fade, NullOverlay};
    use docent_scene::Anchor;
    use docent_core::{Quat, Vec3};

    const FRAME: Duration = Duration::from_micros(16_667);

    fn chapter_at(xs: &[f32]) -> AnchorChapter {
        let anchors = xs
            .iter()
            .map(|&x| Anchor::new(Vec3::new(x, 0.0, 0.0), Quat::from_euler(x, 0.0, 0.0)))
            .collect();
        AnchorChapter::new(anchors)
    }

    fn controller(chapters: Vec<AnchorChapter>, mode: TransitionMode) -> ProgressionController {
        let config = ProgressionConfig {
            transition_mode: mode,
            ..ProgressionConfig::default()
        };
        let mut ctrl = ProgressionController::new(config, Box::new(NullOverlay));
        ctrl.bootstrap(ChapterSet::bootstrap(chapters));
        ctrl
    }

    fn run(ctrl: &mut ProgressionController, mut now: SessionTime, frames: u32) -> SessionTime {
        for _ in 0..frames {
            now = now + FRAME;
            ctrl.update(now, FRAME);
        }
        now
    }

    fn run_until_idle(ctrl: &mut ProgressionController, mut now: SessionTime) -> SessionTime {
        for _ in 0..600 {
            if !ctrl.is_advancing() {
                return now;
            }
            now = now + FRAME;
            ctrl.update(now, FRAME);
        }
        panic!("controller did not come back to idle");
    }

    #[test]
    fn test_single_anchor_chapter_never_advances() {
        let mut ctrl = controller(vec![chapter_at(&[0.0])], TransitionMode::Teleport);
        let before = ctrl.pose();

        ctrl.handle_forward(SessionTime::ZERO);
        assert_eq!(ctrl.phase(), Phase::Idle);

        let now = run(&mut ctrl, SessionTime::ZERO, 10);
        assert_eq!(ctrl.active_anchor_index(), 0);
        assert_eq!(ctrl.pose(), before);
        let _ = now;
    }

    #[test]
    fn test_one_anchor_per_event_and_drops_while_busy() {
        let mut ctrl = controller(
            vec![chapter_at(&[0.0, 2.0, 4.0])],
            TransitionMode::Teleport,
        );

        ctrl.handle_forward(SessionTime::ZERO);
        assert_eq!(ctrl.phase(), Phase::AdvancingAnchor);

        // Second event while the leg is in flight is discarded
        ctrl.handle_forward(SessionTime::from_millis(50));

        let now = run(&mut ctrl, SessionTime::ZERO, 120);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.active_anchor_index(), 1);
        assert!(ctrl.pose().position.distance(&Vec3::new(2.0, 0.0, 0.0)) < 0.05);
        let _ = now;
    }

    #[test]
    fn test_forward_dropped_at_final_anchor() {
        let mut ctrl = controller(vec![chapter_at(&[0.0, 2.0])], TransitionMode::Teleport);

        ctrl.handle_forward(SessionTime::ZERO);
        let now = run_until_idle(&mut ctrl, SessionTime::ZERO);
        assert_eq!(ctrl.active_anchor_index(), 1);

        ctrl.handle_forward(now);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.active_anchor_index(), 1);
    }

    #[test]
    fn test_no_retreat_teleport_completes_in_one_frame() {
        let mut ctrl = controller(
            vec![
                chapter_at(&[0.0, 2.0]).with_return_to_origin(false),
                chapter_at(&[10.0]).with_order(1),
            ],
            TransitionMode::Teleport,
        );

        ctrl.handle_forward(SessionTime::ZERO);
        let now = run_until_idle(&mut ctrl, SessionTime::ZERO);

        // No retreat legs and no fade: the whole sequence is instant steps
        ctrl.request_next_chapter(now);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.active_chapter_index(), 1);
        assert_eq!(ctrl.active_anchor_index(), 0);
        assert_eq!(ctrl.pose().position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_retreat_walks_back_then_teleport_is_exact() {
        let mut ctrl = controller(
            vec![
                chapter_at(&[0.0, 2.0, 4.0]),
                chapter_at(&[10.0]).with_order(1),
            ],
            TransitionMode::Teleport,
        );

        let mut now = SessionTime::ZERO;
        ctrl.handle_forward(now);
        now = run_until_idle(&mut ctrl, now);
        ctrl.handle_forward(now);
        now = run_until_idle(&mut ctrl, now);
        assert_eq!(ctrl.active_anchor_index(), 2);

        ctrl.request_next_chapter(now);
        assert_eq!(ctrl.phase(), Phase::ChapterTransition);

        // The retreat passes through anchor 1 before reaching the origin
        let mut saw_anchor_one = false;
        for _ in 0..600 {
            if !ctrl.is_advancing() {
                break;
            }
            now = now + FRAME;
            ctrl.update(now, FRAME);
            if ctrl.active_chapter_index() == 0 && ctrl.active_anchor_index() == 1 {
                saw_anchor_one = true;
            }
        }
        assert!(saw_anchor_one);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.active_chapter_index(), 1);
        assert_eq!(ctrl.active_anchor_index(), 0);
        // Teleport lands the camera bit-exact on the next chapter's origin
        let origin = Pose::new(Vec3::new(10.0, 0.0, 0.0), Quat::from_euler(10.0, 0.0, 0.0));
        assert_eq!(ctrl.pose(), origin);
    }

    #[test]
    fn test_fade_and_teleport_switches_while_opaque() {
        let shared = shared_fade();
        let config = ProgressionConfig {
            transition_mode: TransitionMode::FadeAndTeleport,
            ..ProgressionConfig::default()
        };
        let mut ctrl = ProgressionController::new(config, Box::new(shared.clone()));
        ctrl.bootstrap(ChapterSet::bootstrap(vec![
            chapter_at(&[0.0]).with_return_to_origin(false),
            chapter_at(&[10.0]).with_order(1),
        ]));

        let mut now = SessionTime::ZERO;
        ctrl.request_next_chapter(now);
        assert_eq!(ctrl.phase(), Phase::ChapterTransition);

        let mut alpha_at_switch = 0.0;
        let mut switched = false;
        for _ in 0..600 {
            if !ctrl.is_advancing() {
                break;
            }
            now = now + FRAME;
            ctrl.update(now, FRAME);
            if !switched && ctrl.active_chapter_index() == 1 {
                switched = true;
                alpha_at_switch = shared.lock().alpha();
            }
        }

        assert!(switched);
        // Fully opaque at the cut, transparent and unblocked at the end
        assert_eq!(alpha_at_switch, 1.0);
        assert_eq!(shared.lock().alpha(), 0.0);
        assert!(!shared.lock().blocks_input());
        assert_eq!(ctrl.pose().position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_smooth_move_runs_after_chapter_switch() {
        let mut ctrl = controller(
            vec![
                chapter_at(&[0.0, 2.0]),
                chapter_at(&[10.0]).with_order(1),
            ],
            TransitionMode::SmoothMove,
        );

        let mut now = SessionTime::ZERO;
        ctrl.handle_forward(now);
        now = run_until_idle(&mut ctrl, now);

        ctrl.request_next_chapter(now);
        assert_eq!(ctrl.phase(), Phase::ChapterTransition);

        // The origin-to-origin leg runs with the next chapter already active
        let mut moved_after_switch = false;
        for _ in 0..600 {
            if !ctrl.is_advancing() {
                break;
            }
            now = now + FRAME;
            ctrl.update(now, FRAME);
            if ctrl.active_chapter_index() == 1 && ctrl.is_advancing() {
                moved_after_switch = true;
            }
        }
        assert!(moved_after_switch);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.active_chapter_index(), 1);
        assert_eq!(ctrl.active_anchor_index(), 0);
        // Damped approach: close to the new origin, never snapped onto it
        assert!(ctrl.pose().position.distance(&Vec3::new(10.0, 0.0, 0.0)) < 0.2);
    }

    #[test]
    fn test_fade_and_smooth_move_holds_pose_until_transparent() {
        let shared = shared_fade();
        let config = ProgressionConfig {
            transition_mode: TransitionMode::FadeAndSmoothMove,
            ..ProgressionConfig::default()
        };
        let mut ctrl = ProgressionController::new(config, Box::new(shared.clone()));
        ctrl.bootstrap(ChapterSet::bootstrap(vec![
            chapter_at(&[0.0]),
            chapter_at(&[10.0]).with_order(1),
        ]));

        let mut now = SessionTime::ZERO;
        ctrl.request_next_chapter(now);
        assert_eq!(ctrl.phase(), Phase::ChapterTransition);

        let mut alpha_at_switch = 0.0;
        let mut switched = false;
        let mut moved_while_faded = false;
        for _ in 0..600 {
            if !ctrl.is_advancing() {
                break;
            }
            now = now + FRAME;
            ctrl.update(now, FRAME);
            if !switched && ctrl.active_chapter_index() == 1 {
                switched = true;
                alpha_at_switch = shared.lock().alpha();
            }
            if shared.lock().alpha() > 0.01 && ctrl.pose().position.x > 0.01 {
                moved_while_faded = true;
            }
        }

        assert!(switched);
        assert_eq!(alpha_at_switch, 1.0);
        // The camera stays on the old origin until the fade-out finishes,
        // then the origin-to-origin leg runs in the clear
        assert!(!moved_while_faded);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.active_chapter_index(), 1);
        assert_eq!(shared.lock().alpha(), 0.0);
        assert!(!shared.lock().blocks_input());
        assert!(ctrl.pose().position.distance(&Vec3::new(10.0, 0.0, 0.0)) < 0.2);
    }

    #[test]
    fn test_auto_advance_enters_next_chapter() {
        let mut ctrl = controller(
            vec![
                chapter_at(&[0.0, 2.0])
                    .with_return_to_origin(false)
                    .with_auto_advance(true),
                chapter_at(&[10.0]).with_order(1),
            ],
            TransitionMode::Teleport,
        );

        // A single forward event carries through to the next chapter
        ctrl.handle_forward(SessionTime::ZERO);
        run(&mut ctrl, SessionTime::ZERO, 120);

        assert_eq!(ctrl.active_chapter_index(), 1);
        assert_eq!(ctrl.active_anchor_index(), 0);
        assert_eq!(ctrl.phase(), Phase::Idle);
    }

    #[test]
    fn test_terminal_chapter_retreats_only() {
        let mut ctrl = controller(vec![chapter_at(&[0.0, 2.0])], TransitionMode::Teleport);

        let mut now = SessionTime::ZERO;
        ctrl.handle_forward(now);
        now = run_until_idle(&mut ctrl, now);

        ctrl.request_next_chapter(now);
        run_until_idle(&mut ctrl, now);

        assert_eq!(ctrl.active_chapter_index(), 0);
        assert_eq!(ctrl.active_anchor_index(), 0);
        assert!(ctrl.pose().position.distance(&Vec3::ZERO) < 0.05);
    }

    #[test]
    fn test_request_dropped_before_final_anchor() {
        let mut ctrl = controller(
            vec![chapter_at(&[0.0, 2.0]), chapter_at(&[10.0]).with_order(1)],
            TransitionMode::Teleport,
        );

        ctrl.request_next_chapter(SessionTime::ZERO);
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.active_chapter_index(), 0);
    }

    #[test]
    fn test_empty_chapter_set_is_inert() {
        let mut ctrl = controller(vec![], TransitionMode::FadeAndTeleport);

        ctrl.handle_forward(SessionTime::ZERO);
        ctrl.request_next_chapter(SessionTime::ZERO);
        run(&mut ctrl, SessionTime::ZERO, 10);

        assert_eq!(ctrl.phase(), Phase::Idle);
        assert!(ctrl.active_chapter().is_none());
        assert_eq!(ctrl.pose(), Pose::default());
    }

    #[test]
    fn test_bootstrap_twice_is_idempotent() {
        let authored = vec![
            chapter_at(&[1.0, 2.0]).with_order(2),
            chapter_at(&[5.0]).with_order(1).with_default(true),
        ];
        let mut ctrl = controller(authored.clone(), TransitionMode::Teleport);
        let first = (ctrl.active_chapter_index(), ctrl.pose());

        ctrl.bootstrap(ChapterSet::bootstrap(authored));
        assert_eq!((ctrl.active_chapter_index(), ctrl.pose()), first);
    }
}
