#![forbid(unsafe_code)]

//! Site configuration.
//!
//! Every tunable the controller uses lives here with the production values as
//! defaults. The web host accepts a partial JSON object that is merged over
//! [`SiteConfig::default`] (each section is `#[serde(default)]`), then
//! checked with [`SiteConfig::validate`].

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub nav: NavConfig,
    pub counter: CounterConfig,
    pub carousel: CarouselConfig,
    pub notification: NotificationConfig,
    pub reveal: RevealConfig,
    pub lazy_images: LazyImageConfig,
    pub api: ApiEndpoints,
    /// `<link rel="preload">` entries appended to `<head>` at startup.
    pub preload: Vec<PreloadLink>,
    /// Cards that lift on hover.
    pub hover_lift: Vec<HoverLift>,
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            nav: NavConfig::default(),
            counter: CounterConfig::default(),
            carousel: CarouselConfig::default(),
            notification: NotificationConfig::default(),
            reveal: RevealConfig::default(),
            lazy_images: LazyImageConfig::default(),
            api: ApiEndpoints::default(),
            preload: vec![PreloadLink::default()],
            hover_lift: vec![
                HoverLift {
                    selector: ".service-card".to_string(),
                    lift_px: 8.0,
                },
                HoverLift {
                    selector: ".product-card".to_string(),
                    lift_px: 4.0,
                },
            ],
            log_level: LogLevel::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON options document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counter.frame_period_ms == 0 {
            return Err(invalid("counter.frame_period_ms", "must be greater than zero"));
        }
        if self.counter.duration_ms < self.counter.frame_period_ms {
            return Err(invalid(
                "counter.duration_ms",
                "must be at least one frame period",
            ));
        }
        if !is_ratio(self.counter.visibility_threshold) {
            return Err(invalid("counter.visibility_threshold", "must be within [0, 1]"));
        }
        if !is_ratio(self.reveal.threshold) {
            return Err(invalid("reveal.threshold", "must be within [0, 1]"));
        }
        if self.carousel.auto_advance_ms == 0 {
            return Err(invalid("carousel.auto_advance_ms", "must be greater than zero"));
        }
        if self.api.contact.is_empty() {
            return Err(invalid("api.contact", "must not be empty"));
        }
        if self.api.contacts.is_empty() {
            return Err(invalid("api.contacts", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn is_ratio(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Scroll thresholds and offsets used by the navigation controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Header gets `scrolled` strictly above this offset.
    pub scrolled_threshold_px: f64,
    /// Back-to-top gets `visible` strictly above this offset.
    pub back_to_top_threshold_px: f64,
    /// Sections are matched as if they started this much earlier.
    pub section_probe_offset_px: f64,
    /// Fixed header height subtracted from anchor scroll targets.
    pub header_offset_px: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: 50.0,
            back_to_top_threshold_px: 500.0,
            section_probe_offset_px: 100.0,
            header_offset_px: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Nominal animation length. The real length follows the frame rate.
    pub duration_ms: u64,
    /// Nominal frame period used to derive the per-frame increment.
    pub frame_period_ms: u64,
    /// Fraction of the element that must be visible to start.
    pub visibility_threshold: f64,
}

impl CounterConfig {
    /// Number of nominal frames in one animation (`2000 / 16 = 125`).
    #[must_use]
    pub fn nominal_frames(&self) -> f64 {
        self.duration_ms as f64 / self.frame_period_ms as f64
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            frame_period_ms: 16,
            visibility_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub auto_advance_ms: u64,
}

impl CarouselConfig {
    #[must_use]
    pub const fn auto_advance(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Time a toast stays before its exit animation starts.
    pub display_ms: u64,
    /// Length of the exit animation; the element is removed afterwards.
    pub exit_ms: u64,
}

impl NotificationConfig {
    #[must_use]
    pub const fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    #[must_use]
    pub const fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: 5000,
            exit_ms: 300,
        }
    }
}

/// Reveal-on-scroll parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    /// Initial downward offset of hidden elements.
    pub offset_px: f64,
    /// Extra transition delay per element, in document order.
    pub stagger_s: f64,
    pub transition_s: f64,
    pub threshold: f64,
    /// Shrinks the viewport bottom so elements reveal slightly later.
    pub bottom_margin_px: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: [
                ".service-card",
                ".product-card",
                ".about-content",
                ".contact-info",
                ".contact-form",
                ".contact-item",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            offset_px: 30.0,
            stagger_s: 0.1,
            transition_s: 0.6,
            threshold: 0.1,
            bottom_margin_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyImageConfig {
    /// Vertical distance outside the viewport at which loading starts.
    pub margin_px: f64,
}

impl Default for LazyImageConfig {
    fn default() -> Self {
        Self { margin_px: 50.0 }
    }
}

/// Backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpoints {
    /// `POST` target for new submissions.
    pub contact: String,
    /// Collection endpoint; `DELETE {contacts}/{id}` removes one record.
    pub contacts: String,
}

impl ApiEndpoints {
    /// Per-record URL.
    #[must_use]
    pub fn contact_url(&self, id: impl core::fmt::Display) -> String {
        format!("{}/{id}", self.contacts.trim_end_matches('/'))
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            contact: "/api/contact".to_string(),
            contacts: "/api/contacts".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadLink {
    pub href: String,
    /// Value of the `as` attribute.
    #[serde(rename = "as", default = "default_preload_as")]
    pub as_type: String,
}

fn default_preload_as() -> String {
    "style".to_string()
}

impl Default for PreloadLink {
    fn default() -> Self {
        Self {
            href: "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap"
                .to_string(),
            as_type: default_preload_as(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverLift {
    pub selector: String,
    pub lift_px: f64,
}

/// Minimum level forwarded to the browser console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[must_use]
    pub const fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_constants() {
        let config = SiteConfig::default();
        assert_eq!(config.nav.scrolled_threshold_px, 50.0);
        assert_eq!(config.nav.back_to_top_threshold_px, 500.0);
        assert_eq!(config.nav.header_offset_px, 80.0);
        assert_eq!(config.counter.nominal_frames(), 125.0);
        assert_eq!(config.carousel.auto_advance(), Duration::from_secs(5));
        assert_eq!(config.notification.exit(), Duration::from_millis(300));
        assert_eq!(config.reveal.selectors.len(), 6);
        assert_eq!(config.hover_lift.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let config =
            SiteConfig::from_json(r#"{"carousel":{"auto_advance_ms":7000},"log_level":"debug"}"#)
                .unwrap();
        assert_eq!(config.carousel.auto_advance_ms, 7000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.nav, NavConfig::default());
        assert_eq!(config.api.contacts, "/api/contacts");
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn rejects_zero_frame_period() {
        let err = SiteConfig::from_json(r#"{"counter":{"frame_period_ms":0}}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "counter.frame_period_ms",
                reason: "must be greater than zero",
            }
        );
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = SiteConfig::from_json(r#"{"reveal":{"threshold":1.5}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "reveal.threshold",
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            SiteConfig::from_json("{nav:"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn contact_url_joins_id() {
        let api = ApiEndpoints {
            contact: "/api/contact".into(),
            contacts: "/api/contacts/".into(),
        };
        assert_eq!(api.contact_url(42), "/api/contacts/42");
    }

    #[test]
    fn preload_as_defaults_to_style() {
        let link: PreloadLink = serde_json::from_str(r#"{"href":"/font.css"}"#).unwrap();
        assert_eq!(link.as_type, "style");
    }
}
