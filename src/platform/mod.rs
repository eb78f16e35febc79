//! Platform abstraction layer
//!
//! Effects never talk to the browser directly. They go through:
//! - `TickSource`: per-frame callbacks (requestAnimationFrame on web)
//! - `VisibilityReporter`: intersection observation of page elements
//!
//! `ManualTicker` and `ManualVisibility` drive both seams by hand for native
//! runs and tests.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;
use std::ops::ControlFlow;

/// Per-frame callback. Receives a millisecond timestamp and returns
/// `Continue` to run again on the next frame or `Break` to stop.
pub type TickCallback = Box<dyn FnMut(f64) -> ControlFlow<()>>;

/// A source of display-frame ticks
pub trait TickSource {
    /// Run `callback` on every frame until it breaks
    fn subscribe(&self, callback: TickCallback);
}

/// Tick source advanced explicitly by the caller
#[derive(Default)]
pub struct ManualTicker {
    active: RefCell<Vec<TickCallback>>,
    /// Subscriptions made while a frame is running start on the next frame
    incoming: RefCell<Vec<TickCallback>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame at time `now` (ms)
    pub fn advance(&self, now: f64) {
        let incoming = std::mem::take(&mut *self.incoming.borrow_mut());
        let mut callbacks = std::mem::take(&mut *self.active.borrow_mut());
        callbacks.extend(incoming);
        callbacks.retain_mut(|cb| cb(now).is_continue());
        // Anything subscribed during this frame waits in `incoming`
        *self.active.borrow_mut() = callbacks;
    }

    /// Run `frames` frames `interval` ms apart, starting at `start`
    pub fn run(&self, start: f64, interval: f64, frames: u32) {
        for i in 0..frames {
            self.advance(start + i as f64 * interval);
        }
    }

    /// Callback chains still running (including ones not started yet)
    pub fn pending(&self) -> usize {
        self.active.borrow().len() + self.incoming.borrow().len()
    }
}

impl TickSource for ManualTicker {
    fn subscribe(&self, callback: TickCallback) {
        self.incoming.borrow_mut().push(callback);
    }
}

/// Offsets applied to the viewport before testing intersection (px).
/// Negative values shrink the viewport, like a CSS root margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    /// CSS `rootMargin` string, e.g. `0px 0px -40px 0px`
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

const RATIO_SLACK: f32 = 1e-3;

/// When an observed element counts as visible
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Visible fraction of the element (0-1) that triggers a report
    pub threshold: f32,
    pub root_margin: Margin,
}

impl ObserveOptions {
    pub fn threshold(threshold: f32) -> Self {
        Self {
            threshold,
            root_margin: Margin::default(),
        }
    }

    /// Whether `ratio` is enough to count as visible. Browsers report ratios
    /// a hair under the threshold they just crossed, hence the slack.
    #[inline]
    pub fn qualifies(&self, is_intersecting: bool, ratio: f32) -> bool {
        is_intersecting && ratio + RATIO_SLACK >= self.threshold
    }
}

/// One visibility change reported for an observed element
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry<E> {
    pub element: E,
    pub is_intersecting: bool,
    /// Visible fraction of the element
    pub ratio: f32,
}

impl<E> VisibilityEntry<E> {
    pub fn visible(element: E, ratio: f32) -> Self {
        Self {
            element,
            is_intersecting: true,
            ratio,
        }
    }

    pub fn hidden(element: E) -> Self {
        Self {
            element,
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// Something that watches elements and reports visibility changes
pub trait VisibilityReporter<E> {
    fn observe(&mut self, element: &E);
    /// Stop reporting `element`
    fn unobserve(&mut self, element: &E);
    /// Stop reporting everything
    fn disconnect(&mut self);
}

/// Reporter that only tracks what is being watched
#[derive(Debug, Clone)]
pub struct ManualVisibility<E> {
    watched: HashSet<E>,
}

impl<E> Default for ManualVisibility<E> {
    fn default() -> Self {
        Self {
            watched: HashSet::new(),
        }
    }
}

impl<E: Clone + Eq + Hash> ManualVisibility<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watching(&self, element: &E) -> bool {
        self.watched.contains(element)
    }

    pub fn watched(&self) -> usize {
        self.watched.len()
    }
}

impl<E: Clone + Eq + Hash> VisibilityReporter<E> for ManualVisibility<E> {
    fn observe(&mut self, element: &E) {
        self.watched.insert(element.clone());
    }

    fn unobserve(&mut self, element: &E) {
        self.watched.remove(element);
    }

    fn disconnect(&mut self) {
        self.watched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_manual_ticker_runs_until_break() {
        let ticker = ManualTicker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            ticker.subscribe(Box::new(move |now| {
                seen.borrow_mut().push(now);
                if now >= 32.0 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }));
        }
        ticker.run(0.0, 16.0, 5);
        assert_eq!(*seen.borrow(), vec![0.0, 16.0, 32.0]);
        assert_eq!(ticker.pending(), 0);
    }

    #[test]
    fn test_subscribe_during_frame_starts_next_frame() {
        let ticker = Rc::new(ManualTicker::new());
        let hits = Rc::new(RefCell::new(0));
        {
            let inner_ticker = ticker.clone();
            let hits = hits.clone();
            ticker.subscribe(Box::new(move |_| {
                let hits = hits.clone();
                inner_ticker.subscribe(Box::new(move |_| {
                    *hits.borrow_mut() += 1;
                    ControlFlow::Break(())
                }));
                ControlFlow::Break(())
            }));
        }
        ticker.advance(0.0);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(ticker.pending(), 1);
        ticker.advance(16.0);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(ticker.pending(), 0);
    }

    #[test]
    fn test_margin_css() {
        let margin = Margin {
            bottom: -40.0,
            ..Default::default()
        };
        assert_eq!(margin.to_css(), "0px 0px -40px 0px");
    }

    #[test]
    fn test_threshold_qualifies() {
        let options = ObserveOptions::threshold(0.3);
        assert!(options.qualifies(true, 0.3));
        assert!(options.qualifies(true, 0.2999));
        assert!(!options.qualifies(true, 0.29));
        assert!(!options.qualifies(false, 1.0));
    }
}
