//! Anchor chapters and the session chapter set
//!
//! A chapter is an ordered run of anchors plus its transition policy. The
//! chapter set is rebuilt on every scene (re)load: invalid chapters are
//! excluded, the rest are sorted by their order key, and the default chapter
//! is picked once.

use crate::{Anchor, Hotspot};

/// An ordered group of anchors plus per-chapter transition policy
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorChapter {
    /// Ordered anchors: index 0 is the chapter origin
    pub anchors: Vec<Anchor>,

    /// Secondary points of interest (hint collaborator only)
    pub hotspots: Vec<Hotspot>,

    /// Whether advancing past the final anchor first retreats through all
    /// prior anchors back to the origin
    pub return_to_origin_on_advance: bool,

    /// Whether reaching the final anchor immediately triggers chapter advance
    pub auto_advance_on_last_anchor: bool,

    /// Default-chapter flag, consulted once at session bootstrap
    pub is_default: bool,

    /// Sort key for the bootstrap ordering (smaller comes first)
    pub order: i32,
}

impl AnchorChapter {
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self {
            anchors,
            hotspots: Vec::new(),
            return_to_origin_on_advance: true,
            auto_advance_on_last_anchor: false,
            is_default: false,
            order: 0,
        }
    }

    pub fn with_hotspots(mut self, hotspots: Vec<Hotspot>) -> Self {
        self.hotspots = hotspots;
        self
    }

    pub fn with_return_to_origin(mut self, value: bool) -> Self {
        self.return_to_origin_on_advance = value;
        self
    }

    pub fn with_auto_advance(mut self, value: bool) -> Self {
        self.auto_advance_on_last_anchor = value;
        self
    }

    pub fn with_default(mut self, value: bool) -> Self {
        self.is_default = value;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// A chapter is usable only with at least one anchor
    pub fn is_valid(&self) -> bool {
        !self.anchors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Index of the final anchor
    pub fn last_index(&self) -> usize {
        self.anchors.len().saturating_sub(1)
    }

    /// Anchor at `index`, clamped into range; None only for an empty chapter
    pub fn anchor(&self, index: usize) -> Option<&Anchor> {
        if self.anchors.is_empty() {
            return None;
        }
        let index = index.min(self.anchors.len() - 1);
        self.anchors.get(index)
    }

    /// The chapter origin (anchor 0)
    pub fn origin(&self) -> Option<&Anchor> {
        self.anchor(0)
    }
}

/// The ordered list of valid chapters for the current session
#[derive(Debug, Clone, Default)]
pub struct ChapterSet {
    chapters: Vec<AnchorChapter>,
    default_index: usize,
}

impl ChapterSet {
    /// Build the session chapter set from authored content.
    ///
    /// Invalid (empty) chapters are excluded, the rest are stable-sorted by
    /// their order key, and the default is the first chapter flagged
    /// `is_default`, else index 0. Safe to re-run on every scene load.
    pub fn bootstrap(chapters: Vec<AnchorChapter>) -> Self {
        let mut chapters: Vec<AnchorChapter> =
            chapters.into_iter().filter(|c| c.is_valid()).collect();
        chapters.sort_by_key(|c| c.order);

        let default_index = chapters
            .iter()
            .position(|c| c.is_default)
            .unwrap_or(0)
            .min(chapters.len().saturating_sub(1));

        Self {
            chapters,
            default_index,
        }
    }

    pub fn get(&self, index: usize) -> Option<&AnchorChapter> {
        self.chapters.get(index)
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Index of the bootstrap-selected default chapter
    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnchorChapter> {
        self.chapters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_core::Vec3;

    fn chapter_of(n: usize) -> AnchorChapter {
        let anchors = (0..n)
            .map(|i| Anchor::at(Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        AnchorChapter::new(anchors)
    }

    #[test]
    fn test_empty_chapter_is_invalid() {
        let chapter = chapter_of(0);
        assert!(!chapter.is_valid());
        assert!(chapter.anchor(0).is_none());
        assert!(chapter.origin().is_none());
    }

    #[test]
    fn test_anchor_index_clamped() {
        let chapter = chapter_of(3);
        let last = chapter.anchor(2).copied();
        // Out-of-range indices clamp to the final anchor
        assert_eq!(chapter.anchor(99).copied(), last);
        assert_eq!(chapter.last_index(), 2);
    }

    #[test]
    fn test_bootstrap_filters_and_sorts() {
        let set = ChapterSet::bootstrap(vec![
            chapter_of(2).with_order(5),
            chapter_of(0).with_order(1), // invalid, excluded
            chapter_of(3).with_order(2),
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).map(|c| c.order), Some(2));
        assert_eq!(set.get(1).map(|c| c.order), Some(5));
    }

    #[test]
    fn test_bootstrap_default_selection() {
        let set = ChapterSet::bootstrap(vec![
            chapter_of(2).with_order(1),
            chapter_of(2).with_order(2).with_default(true),
            chapter_of(2).with_order(3),
        ]);
        assert_eq!(set.default_index(), 1);

        // Without a flagged default: first in sorted order
        let set = ChapterSet::bootstrap(vec![
            chapter_of(2).with_order(9),
            chapter_of(2).with_order(4),
        ]);
        assert_eq!(set.default_index(), 0);
        assert_eq!(set.get(0).map(|c| c.order), Some(4));
    }

    #[test]
    fn test_bootstrap_idempotent() {
        let authored = vec![
            chapter_of(2).with_order(3),
            chapter_of(4).with_order(1).with_default(true),
        ];

        let first = ChapterSet::bootstrap(authored.clone());
        let second = ChapterSet::bootstrap(authored);

        assert_eq!(first.default_index(), second.default_index());
        assert_eq!(first.len(), second.len());
        for i in 0..first.len() {
            assert_eq!(first.get(i), second.get(i));
        }
    }

    #[test]
    fn test_bootstrap_empty_set() {
        let set = ChapterSet::bootstrap(vec![chapter_of(0)]);
        assert!(set.is_empty());
        assert_eq!(set.default_index(), 0);
        assert!(set.get(0).is_none());
    }
}
