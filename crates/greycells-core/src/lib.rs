#![forbid(unsafe_code)]

//! GreyCells Core
//!
//! Host-independent state machines behind the GreyCells Tech Consulting
//! site: navigation and scroll effects, stat counters, the testimonial
//! carousel, contact form validation, the contacts admin panel and toast
//! notifications.
//!
//! # Key Components
//!
//! - [`Site`] - Elm-style controller model owning all UI state
//! - [`Msg`] / [`Cmd`] - Inputs to the model and the effects it requests
//! - [`SiteConfig`] - Thresholds, timings and endpoints with page defaults
//! - [`PageSimulator`] - Deterministic host for tests
//! - [`SiteLogLayer`] - `tracing` layer writing to a pluggable sink
//!
//! # Role in GreyCells
//! `greycells-core` never touches the DOM, timers or the network. The
//! `greycells-web` crate binds it to a browser page: it turns DOM events
//! into [`Msg`] values and carries out each [`Cmd`].

pub mod api;
pub mod carousel;
pub mod config;
pub mod contacts;
pub mod counter;
pub mod error;
pub mod form;
pub mod logging;
pub mod nav;
pub mod notification;
pub mod observe;
pub mod reveal;
pub mod simulator;
pub mod site;
pub mod subscription;

pub use api::{ApiRequest, ApiResponse, Contact, ContactId, ContactSubmission, HttpOutcome};
pub use config::SiteConfig;
pub use error::{ConfigError, SiteError, SiteResult, ValidationError};
pub use logging::{LogSink, SiteLogLayer};
pub use simulator::PageSimulator;
pub use site::{Cmd, Msg, PageFeatures, Site};
