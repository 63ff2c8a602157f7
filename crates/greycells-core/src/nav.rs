#![forbid(unsafe_code)]

//! Navigation controller state: mobile menu, scroll-driven header effects,
//! active-section highlighting and anchor scroll targets.

use crate::config::NavConfig;

/// Open/closed state of the mobile menu.
///
/// Reflected on the page as the `active` class on both the menu button and
/// the link panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the state and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Force the menu closed. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// Header and back-to-top visibility for one scroll offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollEffects {
    pub header_scrolled: bool,
    pub back_to_top_visible: bool,
}

impl ScrollEffects {
    #[must_use]
    pub fn at(scroll_y: f64, config: &NavConfig) -> Self {
        Self {
            header_scrolled: scroll_y > config.scrolled_threshold_px,
            back_to_top_visible: scroll_y > config.back_to_top_threshold_px,
        }
    }
}

/// Measured layout of one `section[id]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    /// Document offset of the section's top edge.
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// `scroll_y ∈ [top - probe, top - probe + height)`.
    #[must_use]
    pub fn contains(&self, scroll_y: f64, probe_offset: f64) -> bool {
        let start = self.top - probe_offset;
        scroll_y >= start && scroll_y < start + self.height
    }
}

/// Desired `active` state for the nav link pointing at `#section_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    pub section_id: String,
    pub active: bool,
}

/// Compute nav-link states for a scroll offset.
///
/// Sections are scanned in document order and each one decides the state of
/// its own link. Sections are not assumed to be contiguous, so any number of
/// links may end up active. When several sections share an id the last one
/// scanned wins. Output order is first appearance of each id.
#[must_use]
pub fn active_links(
    scroll_y: f64,
    sections: &[SectionBounds],
    probe_offset: f64,
) -> Vec<LinkState> {
    let mut states: Vec<LinkState> = Vec::with_capacity(sections.len());
    for section in sections {
        let active = section.contains(scroll_y, probe_offset);
        match states.iter_mut().find(|s| s.section_id == section.id) {
            Some(existing) => existing.active = active,
            None => states.push(LinkState {
                section_id: section.id.clone(),
                active,
            }),
        }
    }
    states
}

/// Where an in-page anchor should scroll to.
///
/// `viewport_top` is the target's bounding-rect top, `page_offset` the
/// current vertical page offset.
#[must_use]
pub fn anchor_scroll_target(viewport_top: f64, page_offset: f64, header_offset: f64) -> f64 {
    viewport_top + page_offset - header_offset
}

/// Extract the fragment id from an in-page `href`.
///
/// Returns `None` for anything that is not `#<id>` (including a bare `#`).
#[must_use]
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Selector of the nav link that points at a section.
#[must_use]
pub fn nav_link_selector(section_id: &str) -> String {
    format!(".nav-links a[href=\"#{section_id}\"]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_and_close() {
        let mut menu = MenuState::new();
        assert!(menu.toggle());
        assert!(menu.is_open());
        assert!(!menu.toggle());
        assert!(!menu.close());
        menu.toggle();
        assert!(menu.close());
        assert!(!menu.is_open());
    }

    #[test]
    fn scroll_effects_thresholds_are_strict() {
        let cfg = NavConfig::default();
        assert_eq!(ScrollEffects::at(10.0, &cfg), ScrollEffects::default());
        assert!(!ScrollEffects::at(50.0, &cfg).header_scrolled);
        assert!(ScrollEffects::at(51.0, &cfg).header_scrolled);
        assert!(!ScrollEffects::at(500.0, &cfg).back_to_top_visible);
        assert_eq!(
            ScrollEffects::at(600.0, &cfg),
            ScrollEffects {
                header_scrolled: true,
                back_to_top_visible: true,
            }
        );
    }

    #[test]
    fn section_window_is_half_open() {
        let s = SectionBounds::new("about", 1000.0, 400.0);
        assert!(!s.contains(899.0, 100.0));
        assert!(s.contains(900.0, 100.0));
        assert!(s.contains(1299.0, 100.0));
        assert!(!s.contains(1300.0, 100.0));
    }

    #[test]
    fn contiguous_sections_activate_one_link() {
        let sections = vec![
            SectionBounds::new("home", 0.0, 800.0),
            SectionBounds::new("services", 800.0, 600.0),
            SectionBounds::new("contact", 1400.0, 500.0),
        ];
        let states = active_links(750.0, &sections, 100.0);
        let active: Vec<_> = states
            .iter()
            .filter(|s| s.active)
            .map(|s| s.section_id.as_str())
            .collect();
        assert_eq!(active, vec!["services"]);
        assert_eq!(states.len(), 3);
    }

    #[test]
    fn overlapping_sections_can_activate_several_links() {
        let sections = vec![
            SectionBounds::new("a", 0.0, 1000.0),
            SectionBounds::new("b", 300.0, 1000.0),
        ];
        let states = active_links(400.0, &sections, 100.0);
        assert!(states.iter().all(|s| s.active));
    }

    #[test]
    fn gap_between_sections_activates_nothing() {
        let sections = vec![
            SectionBounds::new("a", 0.0, 200.0),
            SectionBounds::new("b", 1000.0, 200.0),
        ];
        assert!(active_links(500.0, &sections, 100.0).iter().all(|s| !s.active));
    }

    #[test]
    fn duplicate_ids_last_match_wins() {
        let sections = vec![
            SectionBounds::new("dup", 0.0, 1000.0),
            SectionBounds::new("dup", 5000.0, 100.0),
        ];
        let states = active_links(200.0, &sections, 100.0);
        assert_eq!(
            states,
            vec![LinkState {
                section_id: "dup".into(),
                active: false,
            }]
        );
    }

    #[test]
    fn anchor_target_subtracts_header() {
        assert_eq!(anchor_scroll_target(300.0, 1200.0, 80.0), 1420.0);
    }

    #[test]
    fn fragment_ids() {
        assert_eq!(fragment_id("#services"), Some("services"));
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id("/about"), None);
        assert_eq!(nav_link_selector("about"), ".nav-links a[href=\"#about\"]");
    }
}
