//! Scroll reveal
//!
//! Page sections fade in the first time they scroll into view. Elements that
//! come into view together are staggered by their order among visible
//! siblings, then never watched again.

use std::collections::HashSet;
use std::hash::Hash;

use crate::consts::{REVEAL_BOTTOM_MARGIN, REVEAL_STAGGER_MS, REVEAL_THRESHOLD};
use crate::platform::{Margin, ObserveOptions, VisibilityEntry, VisibilityReporter};

/// Selector for every element category that reveals on scroll
pub const REVEAL_SELECTOR: &str = ".section-header, .about-card, .feature-item, .link-card, \
    .links-group-title, .form-cta, .event-detail-card, .tutrain-hero-card, .tutrain-boards, \
    .stats-row, .certifications, .video-card, .brochure-card";

/// Class added to a revealed element
pub const VISIBLE_CLASS: &str = "visible";

/// An element due to be revealed after `delay_ms`
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReveal<E> {
    pub element: E,
    pub delay_ms: f64,
}

/// One-shot reveal tracker
#[derive(Debug, Clone)]
pub struct Reveal<E> {
    options: ObserveOptions,
    stagger_ms: f64,
    watched: HashSet<E>,
    /// Watched, unrevealed elements currently in view
    visible: HashSet<E>,
    revealed: HashSet<E>,
}

impl<E: Clone + Eq + Hash> Default for Reveal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + Eq + Hash> Reveal<E> {
    pub fn new() -> Self {
        Self {
            options: ObserveOptions {
                threshold: REVEAL_THRESHOLD,
                root_margin: Margin {
                    bottom: REVEAL_BOTTOM_MARGIN,
                    ..Default::default()
                },
            },
            stagger_ms: REVEAL_STAGGER_MS,
            watched: HashSet::new(),
            visible: HashSet::new(),
            revealed: HashSet::new(),
        }
    }

    /// Observer options the reporter should be created with
    pub fn options(&self) -> ObserveOptions {
        self.options
    }

    /// Start watching `elements`
    pub fn watch<R>(&mut self, elements: impl IntoIterator<Item = E>, reporter: &mut R)
    where
        R: VisibilityReporter<E> + ?Sized,
    {
        for element in elements {
            if !self.revealed.contains(&element) && self.watched.insert(element.clone()) {
                reporter.observe(&element);
            }
        }
    }

    /// Handle a batch of visibility changes.
    ///
    /// `siblings` returns the children of an element's parent in document
    /// order. Each qualifying element is delayed by its index among the
    /// siblings that are visible and not yet revealed, unobserved, and
    /// returned. Siblings revealed in an earlier batch no longer count toward
    /// the index, even while they are still on screen.
    pub fn on_entries<R, F>(
        &mut self,
        entries: &[VisibilityEntry<E>],
        siblings: F,
        reporter: &mut R,
    ) -> Vec<PendingReveal<E>>
    where
        R: VisibilityReporter<E> + ?Sized,
        F: Fn(&E) -> Vec<E>,
    {
        // Settle visibility for the whole batch first so siblings entering
        // together see each other
        for entry in entries {
            if !self.watched.contains(&entry.element) {
                continue;
            }
            if self.options.qualifies(entry.is_intersecting, entry.ratio) {
                self.visible.insert(entry.element.clone());
            } else {
                self.visible.remove(&entry.element);
            }
        }

        let mut pending = Vec::new();
        for entry in entries {
            let element = &entry.element;
            if !self.visible.contains(element) || self.revealed.contains(element) {
                continue;
            }
            let index = siblings(element)
                .iter()
                .filter(|s| self.visible.contains(*s))
                .position(|s| s == element)
                .unwrap_or(0);
            pending.push(PendingReveal {
                element: element.clone(),
                delay_ms: index as f64 * self.stagger_ms,
            });
            self.revealed.insert(element.clone());
            reporter.unobserve(element);
        }

        for p in &pending {
            self.visible.remove(&p.element);
            self.watched.remove(&p.element);
        }
        pending
    }

    pub fn is_revealed(&self, element: &E) -> bool {
        self.revealed.contains(element)
    }

    /// Elements still waiting to be revealed
    pub fn remaining(&self) -> usize {
        self.watched.len()
    }
}
