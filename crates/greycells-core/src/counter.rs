#![forbid(unsafe_code)]

//! Stat counter animation.
//!
//! Frame-driven rather than clock-driven: every animation frame adds
//! `target / nominal_frames`, so the wall-clock length follows the real frame
//! rate. The displayed value is always an integer and never passes `target`.

use crate::config::CounterConfig;

/// Identifies one `.stat-number` element (its document index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterId(pub u32);

/// What to display after one animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterFrame {
    pub display: u64,
    /// No further frames are needed.
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    current: f64,
    target: u64,
    step: f64,
    finished: bool,
}

impl CounterAnimation {
    #[must_use]
    pub fn new(target: u64, config: &CounterConfig) -> Self {
        Self {
            current: 0.0,
            target,
            step: target as f64 / config.nominal_frames(),
            finished: false,
        }
    }

    /// Parse a `data-count` attribute.
    ///
    /// Leading whitespace and a `+` sign are accepted, then the leading run
    /// of digits is used (`"1500+"` → 1500). Negative or digit-less values
    /// yield `None`.
    #[must_use]
    pub fn parse_target(raw: &str) -> Option<u64> {
        let trimmed = raw.trim_start();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let digits_end = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        unsigned[..digits_end].parse().ok()
    }

    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by one frame.
    pub fn tick(&mut self) -> CounterFrame {
        if !self.finished {
            self.current += self.step;
            if self.current < self.target as f64 {
                return CounterFrame {
                    display: self.current.floor() as u64,
                    finished: false,
                };
            }
            self.finished = true;
        }
        CounterFrame {
            display: self.target,
            finished: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(target: u64) -> Vec<u64> {
        let mut anim = CounterAnimation::new(target, &CounterConfig::default());
        let mut out = Vec::new();
        loop {
            let frame = anim.tick();
            out.push(frame.display);
            if frame.finished {
                return out;
            }
        }
    }

    #[test]
    fn parse_target_like_parse_int() {
        assert_eq!(CounterAnimation::parse_target("250"), Some(250));
        assert_eq!(CounterAnimation::parse_target("  98"), Some(98));
        assert_eq!(CounterAnimation::parse_target("+15"), Some(15));
        assert_eq!(CounterAnimation::parse_target("1500+"), Some(1500));
        assert_eq!(CounterAnimation::parse_target("-3"), None);
        assert_eq!(CounterAnimation::parse_target("abc"), None);
        assert_eq!(CounterAnimation::parse_target(""), None);
    }

    #[test]
    fn ends_exactly_at_target() {
        let frames = run(250);
        assert_eq!(frames.last(), Some(&250));
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
        assert!(frames.iter().all(|&v| v <= 250));
    }

    #[test]
    fn takes_about_nominal_frame_count() {
        let frames = run(1000);
        assert!((124..=126).contains(&frames.len()), "{}", frames.len());
    }

    #[test]
    fn zero_target_finishes_immediately() {
        assert_eq!(run(0), vec![0]);
    }

    #[test]
    fn ticking_after_finish_is_stable() {
        let mut anim = CounterAnimation::new(3, &CounterConfig::default());
        while !anim.tick().finished {}
        assert!(anim.is_finished());
        assert_eq!(
            anim.tick(),
            CounterFrame {
                display: 3,
                finished: true,
            }
        );
    }
}
