#![forbid(unsafe_code)]

//! DOM lookups and mutations used by the runtime.

use greycells_core::api::ContactSubmission;
use greycells_core::config::PreloadLink;
use greycells_core::error::{SiteError, SiteResult};
use greycells_core::nav::SectionBounds;
use greycells_core::notification::{NOTIFICATION_CLASS, NOTIFICATION_KEYFRAMES, Notification};
use greycells_core::reveal::StyleDecl;
use greycells_core::site::Target;
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, FormData, HtmlElement, HtmlFormElement, Window};

const KEYFRAMES_STYLE_ID: &str = "greycells-notification-keyframes";
const SUBMIT_BUTTON_SELECTOR: &str = "button[type=\"submit\"]";

pub(crate) fn dom_err(context: &str, err: &JsValue) -> SiteError {
    SiteError::Dom(format!("{context}: {err:?}"))
}

/// Elements resolved once at startup.
pub(crate) struct PageDom {
    pub window: Window,
    pub document: Document,
    pub header: Element,
    pub menu_button: Element,
    pub nav_links: Element,
    pub contact_form: HtmlFormElement,
    pub back_to_top: Option<Element>,
    pub testimonial_cards: Vec<Element>,
    pub testimonial_prev: Option<Element>,
    pub testimonial_next: Option<Element>,
    pub contacts_list: Option<Element>,
    pub refresh_button: Option<Element>,
}

impl PageDom {
    /// Resolve the page contract. Fails on the first missing required element.
    pub fn resolve() -> SiteResult<Self> {
        let window = web_sys::window().ok_or(SiteError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(SiteError::MissingElement("document"))?;

        let required = |selector: &'static str| -> SiteResult<Element> {
            query(&document, selector)?.ok_or(SiteError::MissingElement(selector))
        };
        let header = required(".header")?;
        let menu_button = required(".mobile-menu-btn")?;
        let nav_links = required(".nav-links")?;
        let contact_form = document
            .get_element_by_id("contactForm")
            .ok_or(SiteError::MissingElement("#contactForm"))?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| SiteError::Dom("#contactForm is not a <form>".into()))?;

        let nav = query(&document, ".testimonial-nav")?;
        let (testimonial_prev, testimonial_next) = match &nav {
            Some(nav) => (query_in(nav, ".prev")?, query_in(nav, ".next")?),
            None => (None, None),
        };

        Ok(Self {
            back_to_top: query(&document, ".back-to-top")?,
            testimonial_cards: query_all(&document, ".testimonial-card")?,
            testimonial_prev,
            testimonial_next,
            contacts_list: document.get_element_by_id("contactsList"),
            refresh_button: document.get_element_by_id("refreshContacts"),
            window,
            document,
            header,
            menu_button,
            nav_links,
            contact_form,
        })
    }

    /// Whether the testimonial navigation block exists.
    pub fn has_testimonial_nav(&self) -> bool {
        self.testimonial_prev.is_some() || self.testimonial_next.is_some()
    }

    pub fn target(&self, target: Target) -> Option<&Element> {
        match target {
            Target::MenuButton => Some(&self.menu_button),
            Target::NavLinks => Some(&self.nav_links),
            Target::Header => Some(&self.header),
            Target::BackToTop => self.back_to_top.as_ref(),
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    /// Offsets of every `section[id]`, in document order.
    pub fn sections(&self) -> Vec<SectionBounds> {
        query_all(&self.document, "section[id]")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|el| {
                let id = el.id();
                let el = el.dyn_into::<HtmlElement>().ok()?;
                Some(SectionBounds::new(
                    id,
                    f64::from(el.offset_top()),
                    f64::from(el.offset_height()),
                ))
            })
            .collect()
    }

    pub fn submit_button(&self) -> Option<Element> {
        self.contact_form
            .query_selector(SUBMIT_BUTTON_SELECTOR)
            .ok()
            .flatten()
    }

    /// Read every form field.
    pub fn form_submission(&self) -> SiteResult<ContactSubmission> {
        let data = FormData::new_with_form(&self.contact_form)
            .map_err(|err| dom_err("FormData", &err))?;
        let iter = js_sys::try_iter(&data)
            .map_err(|err| dom_err("FormData iterator", &err))?
            .ok_or_else(|| SiteError::Dom("FormData is not iterable".into()))?;
        let mut entries = Vec::new();
        for entry in iter {
            let entry = Array::from(&entry.map_err(|err| dom_err("FormData entry", &err))?);
            // File inputs yield non-string values; they are not part of the form contract.
            if let (Some(key), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string())
            {
                entries.push((key, value));
            }
        }
        Ok(ContactSubmission::from_entries(entries))
    }

    /// Remove any toast, then append `notification` to the body.
    pub fn show_notification(&self, notification: &Notification) -> SiteResult<Element> {
        self.remove_notification();
        let el = self
            .document
            .create_element("div")
            .map_err(|err| dom_err("create notification", &err))?;
        el.set_class_name(&notification.class_list());
        el.set_text_content(Some(&notification.message));
        el.set_attribute("style", &notification.css_text())
            .map_err(|err| dom_err("notification style", &err))?;
        let body = self
            .document
            .body()
            .ok_or(SiteError::MissingElement("body"))?;
        body.append_child(&el)
            .map_err(|err| dom_err("append notification", &err))?;
        Ok(el)
    }

    pub fn remove_notification(&self) {
        if let Ok(Some(existing)) = query(&self.document, &format!(".{NOTIFICATION_CLASS}")) {
            existing.remove();
        }
    }

    /// Add the toast keyframes unless a previous call already did.
    pub fn ensure_keyframes(&self) -> SiteResult<()> {
        if self.document.get_element_by_id(KEYFRAMES_STYLE_ID).is_some() {
            return Ok(());
        }
        let style = self
            .document
            .create_element("style")
            .map_err(|err| dom_err("create style", &err))?;
        style.set_id(KEYFRAMES_STYLE_ID);
        style.set_text_content(Some(NOTIFICATION_KEYFRAMES));
        self.append_to_head(&style)
    }

    pub fn preload(&self, link: &PreloadLink) -> SiteResult<()> {
        let el = self
            .document
            .create_element("link")
            .map_err(|err| dom_err("create link", &err))?;
        let attrs = [
            ("rel", "preload"),
            ("href", link.href.as_str()),
            ("as", link.as_type.as_str()),
        ];
        for (name, value) in attrs {
            el.set_attribute(name, value)
                .map_err(|err| dom_err("preload attribute", &err))?;
        }
        self.append_to_head(&el)
    }

    fn append_to_head(&self, el: &Element) -> SiteResult<()> {
        let head = self
            .document
            .head()
            .ok_or(SiteError::MissingElement("head"))?;
        head.append_child(el)
            .map(|_| ())
            .map_err(|err| dom_err("append to head", &err))
    }
}

pub(crate) fn query(document: &Document, selector: &str) -> SiteResult<Option<Element>> {
    document
        .query_selector(selector)
        .map_err(|err| dom_err(selector, &err))
}

pub(crate) fn query_in(parent: &Element, selector: &str) -> SiteResult<Option<Element>> {
    parent
        .query_selector(selector)
        .map_err(|err| dom_err(selector, &err))
}

pub(crate) fn query_all(document: &Document, selector: &str) -> SiteResult<Vec<Element>> {
    let list = document
        .query_selector_all(selector)
        .map_err(|err| dom_err(selector, &err))?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub(crate) fn set_class(el: &Element, class: &str, enabled: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, enabled) {
        tracing::warn!(class, error = ?err, "class toggle failed");
    }
}

pub(crate) fn apply_style(el: &Element, decls: &[StyleDecl]) {
    let Some(el) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = el.style();
    for decl in decls {
        if let Err(err) = style.set_property(decl.property, &decl.value) {
            tracing::warn!(property = decl.property, error = ?err, "style update failed");
        }
    }
}
