//! Stat counters
//!
//! When the stats row first scrolls into view every counter counts up from 0
//! to its `data-target` with an ease-out cubic curve. This happens once per
//! page, guarded by a latch.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::consts::{COUNTER_DURATION_MS, COUNTER_THRESHOLD};
use crate::platform::{ObserveOptions, TickSource, VisibilityEntry, VisibilityReporter};

pub const COUNTER_SELECTOR: &str = ".stat-number";
/// Container whose visibility starts the counters
pub const COUNTER_CONTAINER_SELECTOR: &str = ".stats-row";
pub const TARGET_ATTRIBUTE: &str = "data-target";

/// Ease-out cubic: fast start, slow finish. `p` is clamped to [0, 1].
#[inline]
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Displayed value at progress `p`
pub fn eased_value(target: i64, p: f64) -> i64 {
    if p >= 1.0 {
        return target;
    }
    (ease_out_cubic(p) * target as f64).floor() as i64
}

/// Read a counter target the way `parseInt` would: optional sign then leading
/// digits, anything else after is ignored. No digits reads as 0.
pub fn parse_target(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative { -value } else { value }
}

/// A single counter's timeline. Time starts at the first sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    pub target: i64,
    pub duration_ms: f64,
    start: Option<f64>,
}

impl CounterAnimation {
    pub fn new(target: i64) -> Self {
        Self::with_duration(target, COUNTER_DURATION_MS)
    }

    pub fn with_duration(target: i64, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms,
            start: None,
        }
    }

    /// Value to display at `now` (ms) and whether the animation is finished
    pub fn sample(&mut self, now: f64) -> (i64, bool) {
        let start = *self.start.get_or_insert(now);
        let progress = if self.duration_ms > 0.0 {
            ((now - start) / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        if progress < 1.0 {
            (eased_value(self.target, progress), false)
        } else {
            (self.target, true)
        }
    }
}

/// Fires at most once
#[derive(Debug, Clone, Default)]
pub struct Latch {
    fired: bool,
}

impl Latch {
    /// True the first time only
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// The page's counter group
#[derive(Debug, Clone)]
pub struct Counters<E> {
    options: ObserveOptions,
    latch: Latch,
    targets: Vec<(E, i64)>,
}

impl<E: Clone> Counters<E> {
    /// Targets are read once, here
    pub fn new(targets: Vec<(E, i64)>) -> Self {
        Self {
            options: ObserveOptions::threshold(COUNTER_THRESHOLD),
            latch: Latch::default(),
            targets,
        }
    }

    pub fn options(&self) -> ObserveOptions {
        self.options
    }

    pub fn started(&self) -> bool {
        self.latch.has_fired()
    }

    /// Handle container visibility changes. The first qualifying entry starts
    /// every counter and disconnects the reporter; later calls return nothing.
    pub fn on_entries<C, R>(
        &mut self,
        entries: &[VisibilityEntry<C>],
        reporter: &mut R,
    ) -> Vec<(E, CounterAnimation)>
    where
        R: VisibilityReporter<C> + ?Sized,
    {
        let qualifies = entries
            .iter()
            .any(|e| self.options.qualifies(e.is_intersecting, e.ratio));
        if !qualifies || !self.latch.fire() {
            return Vec::new();
        }
        reporter.disconnect();
        log::info!("Starting {} counters", self.targets.len());
        self.targets
            .iter()
            .map(|(element, target)| (element.clone(), CounterAnimation::new(*target)))
            .collect()
    }
}

/// Drive `animation` on `ticker`, handing each displayed value to `display`.
/// Returns a flag that flips once the final value has been shown.
pub fn run_counter<T, F>(ticker: &T, mut animation: CounterAnimation, mut display: F) -> Rc<Cell<bool>>
where
    T: TickSource + ?Sized,
    F: FnMut(i64) + 'static,
{
    let done = Rc::new(Cell::new(false));
    let flag = done.clone();
    ticker.subscribe(Box::new(move |now| {
        let (value, finished) = animation.sample(now);
        display(value);
        if finished {
            flag.set(true);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }));
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ManualTicker, ManualVisibility};
    use proptest::prelude::*;
    use std::cell::RefCell;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(-3.0), 0.0);
        assert_eq!(ease_out_cubic(7.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
    }

    #[test]
    fn test_eased_value() {
        assert_eq!(eased_value(500, 0.0), 0);
        assert_eq!(eased_value(500, 0.5), 437);
        assert_eq!(eased_value(500, 1.0), 500);
        assert_eq!(eased_value(7, 0.99), 6);
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("1200"), 1200);
        assert_eq!(parse_target("  35"), 35);
        assert_eq!(parse_target("98%"), 98);
        assert_eq!(parse_target("-4"), -4);
        assert_eq!(parse_target("+4"), 4);
        assert_eq!(parse_target("abc"), 0);
        assert_eq!(parse_target(""), 0);
        assert_eq!(parse_target("-"), 0);
    }

    #[test]
    fn test_animation_timeline() {
        let mut anim = CounterAnimation::new(1000);
        assert_eq!(anim.sample(500.0), (0, false));
        assert_eq!(anim.sample(1500.0), (875, false));
        assert_eq!(anim.sample(2499.0), (999, false));
        assert_eq!(anim.sample(2500.0), (1000, true));
    }

    #[test]
    fn test_latch_fires_once() {
        let mut latch = Latch::default();
        assert!(latch.fire());
        assert!(!latch.fire());
        assert!(latch.has_fired());
    }

    #[test]
    fn test_counters_start_once() {
        let mut counters = Counters::new(vec![("a", 50), ("b", 1200)]);
        let mut reporter = ManualVisibility::new();
        reporter.observe(&"row");

        // 20% visible is not enough
        let started = counters.on_entries(&[VisibilityEntry::visible("row", 0.2)], &mut reporter);
        assert!(started.is_empty());
        assert!(reporter.is_watching(&"row"));

        let started = counters.on_entries(&[VisibilityEntry::visible("row", 0.3)], &mut reporter);
        assert_eq!(started.len(), 2);
        assert_eq!(started[1].1.target, 1200);
        assert!(counters.started());
        assert_eq!(reporter.watched(), 0);

        // Both entries in one batch, or any later batch: nothing more
        let again = counters.on_entries(
            &[VisibilityEntry::visible("row", 1.0), VisibilityEntry::visible("row", 1.0)],
            &mut reporter,
        );
        assert!(again.is_empty());
    }

    #[test]
    fn test_run_counter_ends_on_target() {
        let ticker = ManualTicker::new();
        let shown = Rc::new(RefCell::new(Vec::new()));
        let sink = shown.clone();
        let done = run_counter(&ticker, CounterAnimation::new(42), move |v| sink.borrow_mut().push(v));

        // 16ms frames for a bit over two seconds
        ticker.run(1000.0, 16.0, 140);
        assert!(done.get());
        assert_eq!(ticker.pending(), 0);

        let shown = shown.borrow();
        assert_eq!(shown.first(), Some(&0));
        assert_eq!(shown.last(), Some(&42));
        assert!(shown.windows(2).all(|w| w[0] <= w[1]));
    }

    proptest! {
        #[test]
        fn prop_eased_value_monotonic(target in 0i64..1_000_000, p1 in 0.0f64..=1.0, p2 in 0.0f64..=1.0) {
            let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            prop_assert!(eased_value(target, lo) <= eased_value(target, hi));
            prop_assert!(eased_value(target, hi) <= target);
        }
    }
}
