#![forbid(unsafe_code)]

//! Inline style plans for reveal-on-scroll, hover lift and lazy images.

use crate::config::RevealConfig;

/// Attribute holding the deferred image source.
pub const LAZY_SRC_ATTR: &str = "data-src";

/// Selector for images waiting to be lazy-loaded.
pub const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";

/// One inline style property assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecl {
    pub property: &'static str,
    pub value: String,
}

impl StyleDecl {
    fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

/// Comma-joined selector list for the reveal targets.
#[must_use]
pub fn reveal_selector(config: &RevealConfig) -> String {
    config.selectors.join(", ")
}

/// Initial hidden style for the `index`-th reveal target.
///
/// Each element's transition is delayed by `index × stagger` so a row of
/// cards fades in one after another.
#[must_use]
pub fn hidden_style(index: usize, config: &RevealConfig) -> Vec<StyleDecl> {
    let delay_ms = (index as f64 * config.stagger_s * 1000.0).round() as u64;
    vec![
        StyleDecl::new("opacity", "0"),
        StyleDecl::new("transform", format!("translateY({}px)", config.offset_px)),
        StyleDecl::new(
            "transition",
            format!("all {}s ease {delay_ms}ms", config.transition_s),
        ),
    ]
}

/// Style applied once a target scrolls into view.
#[must_use]
pub fn revealed_style() -> Vec<StyleDecl> {
    vec![
        StyleDecl::new("opacity", "1"),
        StyleDecl::new("transform", "translateY(0)"),
    ]
}

/// `transform` value for a hover-lift card.
#[must_use]
pub fn hover_transform(lift_px: f64, hovered: bool) -> String {
    if hovered {
        format!("translateY({}px)", -lift_px)
    } else {
        "translateY(0)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_style_staggers_delay() {
        let cfg = RevealConfig::default();
        let first = hidden_style(0, &cfg);
        assert_eq!(first[0], StyleDecl::new("opacity", "0"));
        assert_eq!(first[1].value, "translateY(30px)");
        assert_eq!(first[2].value, "all 0.6s ease 0ms");
        assert_eq!(hidden_style(3, &cfg)[2].value, "all 0.6s ease 300ms");
    }

    #[test]
    fn selector_joins_all_targets() {
        let sel = reveal_selector(&RevealConfig::default());
        assert!(sel.starts_with(".service-card, .product-card"));
        assert!(sel.ends_with(".contact-item"));
    }

    #[test]
    fn hover_lifts_up() {
        assert_eq!(hover_transform(8.0, true), "translateY(-8px)");
        assert_eq!(hover_transform(8.0, false), "translateY(0)");
    }

    #[test]
    fn revealed_resets_offset() {
        assert_eq!(revealed_style()[1].value, "translateY(0)");
    }
}
