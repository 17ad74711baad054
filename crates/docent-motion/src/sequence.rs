//! Transition step queue
//!
//! A chapter transition is a fixed recipe of sub-operations built up front
//! and consumed one at a time. Each step runs to completion before the next
//! one starts; the controller pumps the queue every frame.

use std::collections::VecDeque;
use std::time::Duration;

use docent_core::Pose;

/// One sub-operation of a transition
#[derive(Debug, Clone)]
pub enum Step {
    /// Damped move to a pose
    MoveTo { target: Pose, duration: Duration },
    /// Instant pose assignment
    SnapTo(Pose),
    /// Screen fade to the given alpha
    FadeTo(f32),
    /// Switch the active chapter and reset the anchor cursor
    ActivateChapter(usize),
    /// Commit the anchor cursor, used after each retreat leg
    SetAnchorIndex(usize),
}

/// FIFO of pending transition steps
#[derive(Debug, Default)]
pub struct Sequence {
    steps: VecDeque<Step>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push_back(step);
    }

    pub fn pop_front(&mut self) -> Option<Step> {
        self.steps.pop_front()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}
