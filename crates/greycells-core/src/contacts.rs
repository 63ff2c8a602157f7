#![forbid(unsafe_code)]

//! Contacts admin panel: markup rendering and panel state.
//!
//! The list is re-rendered from scratch after every fetch. Delete buttons
//! carry [`DELETE_ID_ATTR`] so the host can route clicks with a single
//! delegated listener on the list container.

use std::fmt::Write as _;

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::api::{Contact, ContactId};

pub const NO_CONTACTS_HTML: &str = r#"<p class="no-contacts">No contact submissions yet.</p>"#;
pub const FETCH_ERROR_HTML: &str = r#"<p class="error-message">Error fetching contacts.</p>"#;
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this contact?";
pub const DELETE_SUCCESS_MESSAGE: &str = "Contact deleted successfully.";
pub const DELETE_ERROR_MESSAGE: &str = "Error deleting contact.";

/// Attribute on delete buttons holding the contact id.
pub const DELETE_ID_ATTR: &str = "data-contact-id";

/// Selector matching delete buttons inside the list.
pub const DELETE_BUTTON_SELECTOR: &str = "[data-contact-id]";

/// Turns a stored `submitted_at` into display text.
pub trait TimestampFormatter {
    fn format_timestamp(&self, raw: &str) -> String;
}

impl<F> TimestampFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format_timestamp(&self, raw: &str) -> String {
        self(raw)
    }
}

/// US-style `M/D/YYYY, h:mm:ss AM` rendering of ISO-8601 timestamps.
///
/// Host-independent fallback used by native builds and tests; the browser
/// host swaps in the visitor's locale. Timestamps carrying an offset are
/// shown in UTC with a ` UTC` suffix, naive ones as stored. Unparseable
/// input is shown verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoTimestampFormatter;

impl TimestampFormatter for IsoTimestampFormatter {
    fn format_timestamp(&self, raw: &str) -> String {
        let display = format_description!(
            "[month padding:none]/[day padding:none]/[year], [hour repr:12 padding:none]:[minute]:[second] [period]"
        );
        if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
            let utc = dt.to_offset(UtcOffset::UTC);
            return match utc.format(display) {
                Ok(text) => format!("{text} UTC"),
                Err(_) => raw.to_string(),
            };
        }
        PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
            .ok()
            .and_then(|dt| dt.format(display).ok())
            .unwrap_or_else(|| raw.to_string())
    }
}

/// HTML-escape `s` into `out`.
fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn escaped(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

/// Markup for one contact block.
#[must_use]
pub fn render_contact(contact: &Contact, timestamps: &dyn TimestampFormatter) -> String {
    let mut html = String::new();
    let id = contact.id;
    let _ = write!(
        html,
        "<div class=\"contact-item\" data-id=\"{id}\">\
         <div class=\"contact-header\"><h4>{name}</h4>\
         <span class=\"contact-date\">{date}</span></div>\
         <div class=\"contact-details\">\
         <p><strong>Email:</strong> {email}</p>\
         <p><strong>Service:</strong> {service}</p>\
         <p><strong>Message:</strong> {message}</p>\
         </div>\
         <button class=\"delete-btn\" type=\"button\" {DELETE_ID_ATTR}=\"{id}\">Delete</button>\
         </div>",
        name = escaped(&contact.name),
        date = escaped(&timestamps.format_timestamp(&contact.submitted_at)),
        email = escaped(&contact.email),
        service = escaped(&contact.service),
        message = escaped(&contact.message),
    );
    html
}

/// Markup for the whole list. An empty list renders the placeholder.
#[must_use]
pub fn render_contacts(contacts: &[Contact], timestamps: &dyn TimestampFormatter) -> String {
    if contacts.is_empty() {
        return NO_CONTACTS_HTML.to_string();
    }
    contacts
        .iter()
        .map(|contact| render_contact(contact, timestamps))
        .collect()
}

/// Read the contact id off a delete button's attribute.
#[must_use]
pub fn parse_delete_target(attr: &str) -> Option<ContactId> {
    attr.parse().ok()
}

/// What the panel currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactsView {
    /// Nothing fetched yet.
    #[default]
    Idle,
    Empty,
    /// Number of contacts rendered.
    List(usize),
    Error,
}

/// Contacts panel state: what the last fetch rendered.
#[derive(Debug, Clone, Default)]
pub struct ContactsPanel {
    view: ContactsView,
}

impl ContactsPanel {
    #[must_use]
    pub fn view(&self) -> &ContactsView {
        &self.view
    }

    /// Replace the view with a fetch result and return the markup to show.
    pub fn apply<E>(
        &mut self,
        result: Result<Vec<Contact>, E>,
        timestamps: &dyn TimestampFormatter,
    ) -> String {
        match result {
            Ok(contacts) => {
                self.view = if contacts.is_empty() {
                    ContactsView::Empty
                } else {
                    ContactsView::List(contacts.len())
                };
                render_contacts(&contacts, timestamps)
            }
            Err(_) => {
                self.view = ContactsView::Error;
                FETCH_ERROR_HTML.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: i64, name: &str) -> Contact {
        Contact {
            id: ContactId(id),
            name: name.into(),
            email: "x@y.io".into(),
            service: "strategy".into(),
            message: "Call me".into(),
            submitted_at: "2024-05-01T14:05:09".into(),
        }
    }

    #[test]
    fn iso_timestamps_render_us_style() {
        let fmt = IsoTimestampFormatter;
        assert_eq!(fmt.format_timestamp("2024-05-01T14:05:09"), "5/1/2024, 2:05:09 PM");
        assert_eq!(fmt.format_timestamp("2024-05-01T14:05:09.123456"), "5/1/2024, 2:05:09 PM");
        assert_eq!(fmt.format_timestamp("2024-12-25T09:00:00Z"), "12/25/2024, 9:00:00 AM UTC");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let fmt = IsoTimestampFormatter;
        assert_eq!(fmt.format_timestamp("2024-12-25T09:00:00+05:00"), "12/25/2024, 4:00:00 AM UTC");
        assert_ne!(
            fmt.format_timestamp("2024-12-25T09:00:00+05:00"),
            fmt.format_timestamp("2024-12-25T09:00:00Z")
        );
    }

    #[test]
    fn unparseable_timestamp_is_verbatim() {
        assert_eq!(IsoTimestampFormatter.format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn empty_list_renders_placeholder() {
        assert_eq!(render_contacts(&[], &IsoTimestampFormatter), NO_CONTACTS_HTML);
    }

    #[test]
    fn contact_block_has_delete_hook_and_fields() {
        let html = render_contact(&contact(7, "Ada"), &IsoTimestampFormatter);
        assert!(html.contains("data-contact-id=\"7\""));
        assert!(html.contains("<h4>Ada</h4>"));
        assert!(html.contains("<strong>Service:</strong> strategy"));
        assert!(html.contains("5/1/2024, 2:05:09 PM"));
    }

    #[test]
    fn user_data_is_escaped() {
        let name = "<script>alert('x')</script>";
        let html = render_contact(&contact(1, name), &IsoTimestampFormatter);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn closure_formatter() {
        let fmt = |raw: &str| format!("at {raw}");
        let html = render_contact(&contact(2, "Bo"), &fmt);
        assert!(html.contains("at 2024-05-01T14:05:09"));
    }

    #[test]
    fn panel_tracks_last_result() {
        let mut panel = ContactsPanel::default();
        assert_eq!(panel.view(), &ContactsView::Idle);
        let contacts = vec![contact(1, "A"), contact(2, "B")];
        let html = panel.apply::<()>(Ok(contacts), &IsoTimestampFormatter);
        assert_eq!(html.matches("contact-item").count(), 2);
        assert_eq!(panel.view(), &ContactsView::List(2));
        assert_eq!(panel.apply(Err(()), &IsoTimestampFormatter), FETCH_ERROR_HTML);
        assert_eq!(panel.view(), &ContactsView::Error);
        assert_eq!(panel.apply::<()>(Ok(vec![]), &IsoTimestampFormatter), NO_CONTACTS_HTML);
        assert_eq!(panel.view(), &ContactsView::Empty);
    }

    #[test]
    fn delete_target_parsing() {
        assert_eq!(parse_delete_target("15"), Some(ContactId(15)));
        assert_eq!(parse_delete_target("abc"), None);
    }
}
