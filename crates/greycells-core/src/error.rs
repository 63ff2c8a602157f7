#![forbid(unsafe_code)]

//! Error types shared by the core controller and the web host.

use core::fmt;

/// Client-side validation failure for the contact form.
///
/// These never reach the network; the controller turns them into an error
/// notification using [`ValidationError::user_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty. Carries the form field name.
    MissingField(&'static str),
    /// The email field did not look like `local@domain.tld`.
    InvalidEmail,
}

impl ValidationError {
    /// Message shown to the visitor.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::MissingField(_) => "Please fill in all required fields.",
            Self::InvalidEmail => "Please enter a valid email address.",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidEmail => write!(f, "invalid email address"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Configuration rejected while parsing or validating [`crate::SiteConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The options document was not valid JSON for the config schema.
    Parse(String),
    /// A field held a value outside its accepted range.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error for the site controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// A required page element was not found at initialization.
    MissingElement(&'static str),
    /// Configuration could not be used.
    Config(ConfigError),
    /// The server answered with a non-success status.
    Http { status: u16 },
    /// The request never produced a response (network down, CORS, abort).
    Transport(String),
    /// A response body could not be decoded.
    Decode(String),
    /// A DOM or JS call failed.
    Dom(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(selector) => write!(f, "required element `{selector}` not found"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Http { status } => write!(f, "server responded with status {status}"),
            Self::Transport(msg) => write!(f, "request failed: {msg}"),
            Self::Decode(msg) => write!(f, "could not decode response: {msg}"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SiteError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type SiteResult<T> = Result<T, SiteError>;
