#![forbid(unsafe_code)]

//! Testimonial carousel index.

use core::num::NonZeroUsize;

/// Cyclic index over a fixed, non-empty set of testimonial cards.
///
/// Exactly one card is active at any time; every transition updates the
/// index and returns the card to show in the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: NonZeroUsize,
    current: usize,
}

impl Carousel {
    /// Returns `None` when there are no cards.
    #[must_use]
    pub fn new(len: usize) -> Option<Self> {
        NonZeroUsize::new(len).map(|len| Self { len, current: 0 })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len.get()
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Make card `index` the active one. Out-of-range indices are ignored.
    pub fn show(&mut self, index: usize) -> bool {
        if index < self.len.get() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.len.get();
        self.current
    }

    pub fn prev(&mut self) -> usize {
        let len = self.len.get();
        self.current = (self.current + len - 1) % len;
        self.current
    }

    #[must_use]
    pub const fn is_active(&self, index: usize) -> bool {
        index == self.current
    }

    /// Active flag per card, in order.
    pub fn active_flags(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len.get()).map(|i| self.is_active(i))
    }
}
