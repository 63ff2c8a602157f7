#![forbid(unsafe_code)]

//! One-shot visibility observation.
//!
//! Counters, reveal-on-scroll and lazy images all follow the same rule:
//! watch an element until it first becomes visible, fire once, then stop
//! watching it. [`OnceObserver`] holds that bookkeeping independently of the
//! browser's `IntersectionObserver`, which the web host drives.

use std::collections::HashSet;
use std::hash::Hash;

use crate::config::{CounterConfig, LazyImageConfig, RevealConfig};

/// CSS-style root margin (`top right bottom left`), in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Same margin above and below the viewport.
    #[must_use]
    pub const fn vertical(px: f64) -> Self {
        Self {
            top: px,
            right: 0.0,
            bottom: px,
            left: 0.0,
        }
    }

    /// Pull the bottom edge of the viewport in by `px`.
    #[must_use]
    pub const fn inset_bottom(px: f64) -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: -px,
            left: 0.0,
        }
    }

    /// Value for `IntersectionObserverInit.rootMargin`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Options for one observer instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction required to count as intersecting.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    /// Stat counters: half visible.
    #[must_use]
    pub fn counters(config: &CounterConfig) -> Self {
        Self {
            threshold: config.visibility_threshold,
            root_margin: RootMargin::default(),
        }
    }

    /// Reveal-on-scroll: a sliver visible, slightly above the viewport bottom.
    #[must_use]
    pub fn reveal(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            root_margin: RootMargin::inset_bottom(config.bottom_margin_px),
        }
    }

    /// Lazy images: start loading just before the image scrolls in.
    #[must_use]
    pub fn lazy_images(config: &LazyImageConfig) -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::vertical(config.margin_px),
        }
    }
}

/// Observe-until-first-trigger bookkeeping.
#[derive(Debug, Clone)]
pub struct OnceObserver<K> {
    pending: HashSet<K>,
    fired: usize,
}

impl<K: Eq + Hash> Default for OnceObserver<K> {
    fn default() -> Self {
        Self {
            pending: HashSet::new(),
            fired: 0,
        }
    }
}

impl<K: Eq + Hash> OnceObserver<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `key`. Returns `false` if it was already watched.
    pub fn observe(&mut self, key: K) -> bool {
        self.pending.insert(key)
    }

    /// Feed one intersection report.
    ///
    /// Returns `true` exactly once per observed key: on its first
    /// intersecting report. The key is detached at that point and later
    /// reports are ignored.
    pub fn notify(&mut self, key: &K, intersecting: bool) -> bool {
        if intersecting && self.pending.remove(key) {
            self.fired += 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_observing(&self, key: &K) -> bool {
        self.pending.contains(key)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Keys that have fired so far.
    #[must_use]
    pub const fn fired(&self) -> usize {
        self.fired
    }

    /// Stop watching everything.
    pub fn disconnect(&mut self) {
        self.pending.clear();
    }
}
