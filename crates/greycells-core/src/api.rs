#![forbid(unsafe_code)]

//! HTTP contract with the contacts backend.
//!
//! The core never performs I/O. It emits [`ApiRequest`] values; the host
//! sends them and reports back an [`HttpOutcome`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ApiEndpoints;
use crate::error::{SiteError, SiteResult};

/// Server-assigned contact id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A stored submission as returned by `GET /api/contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    /// ISO-8601 timestamp as stored by the server.
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsEnvelope {
    pub contacts: Vec<Contact>,
}

/// Contact form contents, sent as the `POST` body.
///
/// Fields other than the four known ones are kept in `extra` and sent along
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl ContactSubmission {
    /// Build from form entries. Repeated names keep the last value.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut submission = Self::default();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "name" => submission.name = value,
                "email" => submission.email = value,
                "service" => submission.service = value,
                "message" => submission.message = value,
                _ => {
                    submission.extra.insert(key, value);
                }
            }
        }
        submission
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Which call a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    SubmitContact,
    FetchContacts,
    DeleteContact(ContactId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    SubmitContact(ContactSubmission),
    FetchContacts,
    DeleteContact(ContactId),
}

impl ApiRequest {
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::SubmitContact(_) => RequestKind::SubmitContact,
            Self::FetchContacts => RequestKind::FetchContacts,
            Self::DeleteContact(id) => RequestKind::DeleteContact(*id),
        }
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::SubmitContact(_) => Method::Post,
            Self::FetchContacts => Method::Get,
            Self::DeleteContact(_) => Method::Delete,
        }
    }

    #[must_use]
    pub fn url(&self, endpoints: &ApiEndpoints) -> String {
        match self {
            Self::SubmitContact(_) => endpoints.contact.clone(),
            Self::FetchContacts => endpoints.contacts.clone(),
            Self::DeleteContact(id) => endpoints.contact_url(id),
        }
    }

    /// JSON body, if the request carries one.
    pub fn json_body(&self) -> SiteResult<Option<String>> {
        match self {
            Self::SubmitContact(submission) => Ok(Some(serde_json::to_string(submission)?)),
            Self::FetchContacts | Self::DeleteContact(_) => Ok(None),
        }
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Turn a non-2xx response into [`SiteError::Http`].
    pub fn error_for_status(self) -> SiteResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SiteError::Http {
                status: self.status,
            })
        }
    }
}

/// Result of sending an [`ApiRequest`]. Transport failures use
/// [`SiteError::Transport`].
pub type HttpOutcome = Result<ApiResponse, SiteError>;

/// Collapse an outcome to success or the error that prevented it.
pub fn expect_success(outcome: HttpOutcome) -> SiteResult<ApiResponse> {
    outcome.and_then(ApiResponse::error_for_status)
}

/// Decode a `GET /api/contacts` outcome.
pub fn decode_contacts(outcome: HttpOutcome) -> SiteResult<Vec<Contact>> {
    let response = expect_success(outcome)?;
    let envelope: ContactsEnvelope = serde_json::from_str(&response.body)?;
    Ok(envelope.contacts)
}
