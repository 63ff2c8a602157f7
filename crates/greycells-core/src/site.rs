#![forbid(unsafe_code)]

//! Elm-style site controller.
//!
//! [`Site`] owns every piece of UI state. The host turns DOM events, timer
//! firings and HTTP completions into [`Msg`] values, feeds them to
//! [`Site::update`], and carries out the returned [`Cmd`]. The model never
//! touches the DOM or the network itself.
//!
//! ```ignore
//! let mut site = Site::new(SiteConfig::default(), PageFeatures::all(), 3);
//! run(site.init());
//! run(site.update(Msg::Scrolled { scroll_y: 600.0, sections: vec![] }));
//! ```

use core::fmt;
use core::time::Duration;
use std::collections::HashMap;

use bitflags::bitflags;
use tracing::{debug, info, warn};

use crate::api::{
    ApiRequest, ContactId, ContactSubmission, HttpOutcome, RequestKind, decode_contacts,
    expect_success,
};
use crate::carousel::Carousel;
use crate::config::SiteConfig;
use crate::contacts::{
    ContactsPanel, DELETE_CONFIRM_PROMPT, DELETE_ERROR_MESSAGE, DELETE_SUCCESS_MESSAGE,
    IsoTimestampFormatter, TimestampFormatter,
};
use crate::counter::{CounterAnimation, CounterId};
use crate::form::{self, SENDING_LABEL, SUBMIT_ERROR_MESSAGE, SUBMIT_SUCCESS_MESSAGE, SubmitState};
use crate::nav::{self, MenuState, ScrollEffects, SectionBounds};
use crate::notification::{Notification, NotificationId, NotificationSlot};
use crate::subscription::{SubId, Subscription};

pub const ACTIVE_CLASS: &str = "active";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const VISIBLE_CLASS: &str = "visible";

/// Subscription id of the testimonial auto-advance timer.
pub const AUTO_ADVANCE_SUB: SubId = 1;

bitflags! {
    /// Optional page elements found at startup.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PageFeatures: u8 {
        const BACK_TO_TOP     = 0b0001;
        const TESTIMONIAL_NAV = 0b0010;
        const CONTACTS_PANEL  = 0b0100;
    }
}

/// Fixed page elements whose classes the controller toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    MenuButton,
    NavLinks,
    Header,
    BackToTop,
}

impl Target {
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::MenuButton => ".mobile-menu-btn",
            Self::NavLinks => ".nav-links",
            Self::Header => ".header",
            Self::BackToTop => ".back-to-top",
        }
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            _ => Self::Other,
        }
    }
}

/// Measured position of an anchor's target element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorTarget {
    /// Bounding-rect top relative to the viewport.
    pub viewport_top: f64,
    /// Current vertical page offset.
    pub page_offset: f64,
}

/// Inputs to [`Site::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    MenuToggled,
    NavLinkClicked,
    KeyDown(Key),
    Scrolled {
        scroll_y: f64,
        sections: Vec<SectionBounds>,
    },
    BackToTopClicked,
    /// An in-page anchor was clicked; `None` when its target does not exist.
    AnchorClicked(Option<AnchorTarget>),
    CounterVisible {
        counter: CounterId,
        raw_target: String,
    },
    CounterFrame(CounterId),
    TestimonialNext,
    TestimonialPrev,
    TestimonialAutoAdvance,
    FormSubmitted {
        submission: ContactSubmission,
        submit_label: String,
    },
    RefreshContacts,
    DeleteRequested(ContactId),
    DeleteConfirmed(ContactId),
    HttpCompleted {
        request: RequestKind,
        outcome: HttpOutcome,
    },
    NotificationExpired(NotificationId),
    NotificationRemoved(NotificationId),
}

/// Side effects requested by the model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cmd {
    #[default]
    None,
    Batch(Vec<Cmd>),
    SetClass {
        target: Target,
        class: &'static str,
        enabled: bool,
    },
    /// Toggle `active` on the nav link for `#section_id`, if one exists.
    SetNavLinkActive {
        section_id: String,
        active: bool,
    },
    /// Smooth-scroll the window.
    ScrollTo {
        top: f64,
    },
    SetCounterText {
        counter: CounterId,
        text: String,
    },
    /// Deliver [`Msg::CounterFrame`] on the next animation frame.
    RequestFrame(CounterId),
    /// Mark exactly this testimonial card active.
    ShowTestimonial(usize),
    /// Remove any existing toast, then show this one.
    ShowNotification {
        id: NotificationId,
        notification: Notification,
    },
    BeginNotificationExit(NotificationId),
    RemoveNotification(NotificationId),
    /// Deliver `msg` after `delay`.
    After {
        delay: Duration,
        msg: Box<Msg>,
    },
    SetSubmitButton {
        label: String,
        disabled: bool,
    },
    ResetForm,
    Http(ApiRequest),
    /// Replace the contacts list markup.
    RenderContacts(String),
    /// Ask the visitor; deliver `on_accept` only if they agree.
    Confirm {
        prompt: String,
        on_accept: Box<Msg>,
    },
}

impl Cmd {
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Combine commands, dropping no-ops. Preserves order.
    #[must_use]
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Flatten nested batches into execution order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Cmd> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Cmd>) {
        match self {
            Self::None => {}
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.flatten_into(out);
                }
            }
            other => out.push(other),
        }
    }
}

/// The site controller model.
pub struct Site {
    config: SiteConfig,
    features: PageFeatures,
    menu: MenuState,
    carousel: Option<Carousel>,
    counters: HashMap<CounterId, CounterAnimation>,
    submit: SubmitState,
    contacts: ContactsPanel,
    notifications: NotificationSlot,
    timestamps: Box<dyn TimestampFormatter>,
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("features", &self.features)
            .field("menu", &self.menu)
            .field("carousel", &self.carousel)
            .field("counters", &self.counters.len())
            .field("submit", &self.submit)
            .field("contacts", self.contacts.view())
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

impl Site {
    /// `testimonial_count` is the number of `.testimonial-card` elements.
    #[must_use]
    pub fn new(config: SiteConfig, features: PageFeatures, testimonial_count: usize) -> Self {
        Self {
            config,
            features,
            menu: MenuState::new(),
            carousel: Carousel::new(testimonial_count),
            counters: HashMap::new(),
            submit: SubmitState::default(),
            contacts: ContactsPanel::default(),
            notifications: NotificationSlot::new(),
            timestamps: Box::new(IsoTimestampFormatter),
        }
    }

    /// Replace the formatter used for contact timestamps.
    #[must_use]
    pub fn with_timestamp_formatter(
        mut self,
        formatter: impl TimestampFormatter + 'static,
    ) -> Self {
        self.timestamps = Box::new(formatter);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub const fn features(&self) -> PageFeatures {
        self.features
    }

    #[must_use]
    pub const fn menu(&self) -> MenuState {
        self.menu
    }

    #[must_use]
    pub const fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    #[must_use]
    pub fn counter(&self, id: CounterId) -> Option<&CounterAnimation> {
        self.counters.get(&id)
    }

    #[must_use]
    pub fn contacts(&self) -> &ContactsPanel {
        &self.contacts
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationSlot {
        &self.notifications
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submit.is_pending()
    }

    /// Startup commands: show the first testimonial and load the contacts
    /// panel when present.
    pub fn init(&mut self) -> Cmd {
        info!(
            features = ?self.features,
            testimonials = self.carousel.map_or(0, |c| c.len()),
            "site controller initialized"
        );
        let mut cmds = Vec::new();
        if let Some(carousel) = &self.carousel {
            cmds.push(Cmd::ShowTestimonial(carousel.current()));
        }
        if self.features.contains(PageFeatures::CONTACTS_PANEL) {
            cmds.push(Cmd::Http(ApiRequest::FetchContacts));
        }
        Cmd::batch(cmds)
    }

    /// Recurring sources that should be running in the current state.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        if self.features.contains(PageFeatures::TESTIMONIAL_NAV) && self.carousel.is_some() {
            vec![Subscription::Every {
                id: AUTO_ADVANCE_SUB,
                period: self.config.carousel.auto_advance(),
                message: Msg::TestimonialAutoAdvance,
            }]
        } else {
            Vec::new()
        }
    }

    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::MenuToggled => {
                let open = self.menu.toggle();
                debug!(open, "menu toggled");
                menu_classes(open)
            }
            Msg::NavLinkClicked => {
                self.menu.close();
                menu_classes(false)
            }
            Msg::KeyDown(key) => self.on_key(key),
            Msg::Scrolled { scroll_y, sections } => self.on_scroll(scroll_y, &sections),
            Msg::BackToTopClicked => Cmd::ScrollTo { top: 0.0 },
            Msg::AnchorClicked(Some(target)) => Cmd::ScrollTo {
                top: nav::anchor_scroll_target(
                    target.viewport_top,
                    target.page_offset,
                    self.config.nav.header_offset_px,
                ),
            },
            Msg::AnchorClicked(None) => Cmd::none(),
            Msg::CounterVisible {
                counter,
                raw_target,
            } => self.start_counter(counter, &raw_target),
            Msg::CounterFrame(counter) => self.step_counter(counter),
            Msg::TestimonialNext | Msg::TestimonialAutoAdvance => {
                self.move_carousel(Carousel::next)
            }
            Msg::TestimonialPrev => self.move_carousel(Carousel::prev),
            Msg::FormSubmitted {
                submission,
                submit_label,
            } => self.submit_form(submission, submit_label),
            Msg::RefreshContacts => self.fetch_contacts(),
            Msg::DeleteRequested(id) => Cmd::Confirm {
                prompt: DELETE_CONFIRM_PROMPT.to_string(),
                on_accept: Box::new(Msg::DeleteConfirmed(id)),
            },
            Msg::DeleteConfirmed(id) => {
                debug!(contact_id = id.0, "deleting contact");
                Cmd::Http(ApiRequest::DeleteContact(id))
            }
            Msg::HttpCompleted { request, outcome } => self.on_http(request, outcome),
            Msg::NotificationExpired(id) => {
                if self.notifications.begin_exit(id) {
                    Cmd::batch(vec![
                        Cmd::BeginNotificationExit(id),
                        Cmd::After {
                            delay: self.config.notification.exit(),
                            msg: Box::new(Msg::NotificationRemoved(id)),
                        },
                    ])
                } else {
                    Cmd::none()
                }
            }
            Msg::NotificationRemoved(id) => {
                if self.notifications.remove(id) {
                    Cmd::RemoveNotification(id)
                } else {
                    Cmd::none()
                }
            }
        }
    }

    /// Show a toast, replacing any current one, and schedule its dismissal.
    pub fn notify(&mut self, notification: Notification) -> Cmd {
        let id = self.notifications.show();
        debug!(id = id.0, kind = ?notification.kind, "notification shown");
        Cmd::batch(vec![
            Cmd::ShowNotification { id, notification },
            Cmd::After {
                delay: self.config.notification.display(),
                msg: Box::new(Msg::NotificationExpired(id)),
            },
        ])
    }

    fn on_key(&mut self, key: Key) -> Cmd {
        let carousel_keys = self.features.contains(PageFeatures::TESTIMONIAL_NAV);
        match key {
            Key::Escape if self.menu.is_open() => {
                self.menu.close();
                menu_classes(false)
            }
            Key::ArrowLeft if carousel_keys => self.move_carousel(Carousel::prev),
            Key::ArrowRight if carousel_keys => self.move_carousel(Carousel::next),
            _ => Cmd::none(),
        }
    }

    fn on_scroll(&self, scroll_y: f64, sections: &[SectionBounds]) -> Cmd {
        let nav_config = &self.config.nav;
        let effects = ScrollEffects::at(scroll_y, nav_config);
        let mut cmds = vec![Cmd::SetClass {
            target: Target::Header,
            class: SCROLLED_CLASS,
            enabled: effects.header_scrolled,
        }];
        if self.features.contains(PageFeatures::BACK_TO_TOP) {
            cmds.push(Cmd::SetClass {
                target: Target::BackToTop,
                class: VISIBLE_CLASS,
                enabled: effects.back_to_top_visible,
            });
        }
        cmds.extend(
            nav::active_links(scroll_y, sections, nav_config.section_probe_offset_px)
                .into_iter()
                .map(|link| Cmd::SetNavLinkActive {
                    section_id: link.section_id,
                    active: link.active,
                }),
        );
        Cmd::batch(cmds)
    }

    fn start_counter(&mut self, counter: CounterId, raw_target: &str) -> Cmd {
        if self.counters.contains_key(&counter) {
            return Cmd::none();
        }
        let Some(target) = CounterAnimation::parse_target(raw_target) else {
            warn!(counter = counter.0, raw_target, "ignoring stat with invalid data-count");
            return Cmd::none();
        };
        debug!(counter = counter.0, target, "counter animation started");
        self.counters
            .insert(counter, CounterAnimation::new(target, &self.config.counter));
        self.step_counter(counter)
    }

    fn step_counter(&mut self, counter: CounterId) -> Cmd {
        let Some(animation) = self.counters.get_mut(&counter) else {
            return Cmd::none();
        };
        if animation.is_finished() {
            return Cmd::none();
        }
        let frame = animation.tick();
        let text = Cmd::SetCounterText {
            counter,
            text: frame.display.to_string(),
        };
        if frame.finished {
            text
        } else {
            Cmd::batch(vec![text, Cmd::RequestFrame(counter)])
        }
    }

    fn move_carousel(&mut self, step: fn(&mut Carousel) -> usize) -> Cmd {
        match self.carousel.as_mut() {
            Some(carousel) => {
                let index = step(carousel);
                debug!(index, "testimonial shown");
                Cmd::ShowTestimonial(index)
            }
            None => Cmd::none(),
        }
    }

    fn submit_form(&mut self, submission: ContactSubmission, submit_label: String) -> Cmd {
        if self.submit.is_pending() {
            debug!("submission already in flight");
            return Cmd::none();
        }
        if let Err(err) = form::validate(&submission) {
            debug!(error = %err, "contact form rejected");
            return self.notify(Notification::error(err.user_message()));
        }
        self.submit.begin(submit_label);
        Cmd::batch(vec![
            Cmd::SetSubmitButton {
                label: SENDING_LABEL.to_string(),
                disabled: true,
            },
            Cmd::Http(ApiRequest::SubmitContact(submission)),
        ])
    }

    fn fetch_contacts(&self) -> Cmd {
        if self.features.contains(PageFeatures::CONTACTS_PANEL) {
            Cmd::Http(ApiRequest::FetchContacts)
        } else {
            Cmd::none()
        }
    }

    fn on_http(&mut self, request: RequestKind, outcome: HttpOutcome) -> Cmd {
        match request {
            RequestKind::SubmitContact => {
                let mut cmds = match expect_success(outcome) {
                    Ok(response) => {
                        info!(status = response.status, "contact submitted");
                        vec![
                            self.notify(Notification::success(SUBMIT_SUCCESS_MESSAGE)),
                            Cmd::ResetForm,
                            self.fetch_contacts(),
                        ]
                    }
                    Err(err) => {
                        warn!(error = %err, "contact submission failed");
                        vec![self.notify(Notification::error(SUBMIT_ERROR_MESSAGE))]
                    }
                };
                if let Some(label) = self.submit.finish() {
                    cmds.push(Cmd::SetSubmitButton {
                        label,
                        disabled: false,
                    });
                }
                Cmd::batch(cmds)
            }
            RequestKind::FetchContacts => {
                let result = decode_contacts(outcome);
                match &result {
                    Ok(contacts) => info!(count = contacts.len(), "contacts loaded"),
                    Err(err) => warn!(error = %err, "fetching contacts failed"),
                }
                let html = self.contacts.apply(result, self.timestamps.as_ref());
                Cmd::RenderContacts(html)
            }
            RequestKind::DeleteContact(id) => match expect_success(outcome) {
                Ok(_) => {
                    info!(contact_id = id.0, "contact deleted");
                    Cmd::batch(vec![
                        self.notify(Notification::success(DELETE_SUCCESS_MESSAGE)),
                        self.fetch_contacts(),
                    ])
                }
                Err(err) => {
                    warn!(contact_id = id.0, error = %err, "deleting contact failed");
                    self.notify(Notification::error(DELETE_ERROR_MESSAGE))
                }
            },
        }
    }
}

fn menu_classes(open: bool) -> Cmd {
    Cmd::Batch(vec![
        Cmd::SetClass {
            target: Target::MenuButton,
            class: ACTIVE_CLASS,
            enabled: open,
        },
        Cmd::SetClass {
            target: Target::NavLinks,
            class: ACTIVE_CLASS,
            enabled: open,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiResponse;
    use crate::contacts::{FETCH_ERROR_HTML, NO_CONTACTS_HTML};
    use crate::error::SiteError;
    use pretty_assertions::assert_eq;

    fn site() -> Site {
        Site::new(SiteConfig::default(), PageFeatures::all(), 3)
    }

    fn filled_form() -> ContactSubmission {
        ContactSubmission::from_entries([
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("service", "consulting"),
            ("message", "Hi"),
        ])
    }

    #[test]
    fn batch_drops_noops_and_unwraps_single() {
        assert_eq!(Cmd::batch(vec![Cmd::None, Cmd::None]), Cmd::None);
        assert_eq!(Cmd::batch(vec![Cmd::None, Cmd::ResetForm]), Cmd::ResetForm);
        let nested = Cmd::Batch(vec![
            Cmd::ResetForm,
            Cmd::Batch(vec![Cmd::None, Cmd::ShowTestimonial(1)]),
        ]);
        assert_eq!(nested.into_vec(), vec![Cmd::ResetForm, Cmd::ShowTestimonial(1)]);
    }

    #[test]
    fn init_shows_first_card_and_loads_contacts() {
        let mut s = site();
        assert_eq!(
            s.init().into_vec(),
            vec![
                Cmd::ShowTestimonial(0),
                Cmd::Http(ApiRequest::FetchContacts)
            ]
        );
    }

    #[test]
    fn init_without_optional_elements_is_quiet() {
        let mut s = Site::new(SiteConfig::default(), PageFeatures::empty(), 0);
        assert_eq!(s.init(), Cmd::None);
        assert!(s.subscriptions().is_empty());
    }

    #[test]
    fn auto_advance_needs_nav_and_cards() {
        assert_eq!(site().subscriptions().len(), 1);
        let no_nav = Site::new(SiteConfig::default(), PageFeatures::CONTACTS_PANEL, 3);
        assert!(no_nav.subscriptions().is_empty());
        let no_cards = Site::new(SiteConfig::default(), PageFeatures::all(), 0);
        assert!(no_cards.subscriptions().is_empty());
    }

    #[test]
    fn menu_toggle_and_escape() {
        let mut s = site();
        assert_eq!(s.update(Msg::MenuToggled), menu_classes(true));
        assert!(s.menu().is_open());
        assert_eq!(s.update(Msg::KeyDown(Key::Escape)), menu_classes(false));
        assert_eq!(s.update(Msg::KeyDown(Key::Escape)), Cmd::None);
    }

    #[test]
    fn nav_link_click_closes_menu() {
        let mut s = site();
        s.update(Msg::MenuToggled);
        assert_eq!(s.update(Msg::NavLinkClicked), menu_classes(false));
        assert!(!s.menu().is_open());
    }

    #[test]
    fn arrow_keys_only_with_carousel_nav() {
        let mut s = site();
        assert_eq!(s.update(Msg::KeyDown(Key::ArrowLeft)), Cmd::ShowTestimonial(2));
        assert_eq!(s.update(Msg::KeyDown(Key::ArrowRight)), Cmd::ShowTestimonial(0));

        let mut plain = Site::new(SiteConfig::default(), PageFeatures::empty(), 3);
        assert_eq!(plain.update(Msg::KeyDown(Key::ArrowRight)), Cmd::None);
        assert_eq!(plain.carousel().map(Carousel::current), Some(0));
    }

    #[test]
    fn anchor_click_scrolls_below_header() {
        let mut s = site();
        let cmd = s.update(Msg::AnchorClicked(Some(AnchorTarget {
            viewport_top: 400.0,
            page_offset: 1000.0,
        })));
        assert_eq!(cmd, Cmd::ScrollTo { top: 1320.0 });
        assert_eq!(s.update(Msg::AnchorClicked(None)), Cmd::None);
        assert_eq!(s.update(Msg::BackToTopClicked), Cmd::ScrollTo { top: 0.0 });
    }

    #[test]
    fn scroll_without_back_to_top_skips_it() {
        let mut s = Site::new(SiteConfig::default(), PageFeatures::empty(), 0);
        let cmds = s
            .update(Msg::Scrolled {
                scroll_y: 900.0,
                sections: vec![],
            })
            .into_vec();
        assert_eq!(
            cmds,
            vec![Cmd::SetClass {
                target: Target::Header,
                class: SCROLLED_CLASS,
                enabled: true,
            }]
        );
    }

    #[test]
    fn counter_starts_once_and_steps() {
        let mut s = site();
        let cmds = s
            .update(Msg::CounterVisible {
                counter: CounterId(0),
                raw_target: "250".into(),
            })
            .into_vec();
        assert_eq!(
            cmds,
            vec![
                Cmd::SetCounterText {
                    counter: CounterId(0),
                    text: "2".into(),
                },
                Cmd::RequestFrame(CounterId(0)),
            ]
        );
        assert_eq!(
            s.update(Msg::CounterVisible {
                counter: CounterId(0),
                raw_target: "250".into(),
            }),
            Cmd::None
        );
    }

    #[test]
    fn invalid_counter_target_is_ignored() {
        let mut s = site();
        assert_eq!(
            s.update(Msg::CounterVisible {
                counter: CounterId(1),
                raw_target: "lots".into(),
            }),
            Cmd::None
        );
        assert!(s.counter(CounterId(1)).is_none());
    }

    #[test]
    fn invalid_form_notifies_without_request() {
        let mut s = site();
        let mut submission = filled_form();
        submission.message.clear();
        let cmds = s
            .update(Msg::FormSubmitted {
                submission,
                submit_label: "Send".into(),
            })
            .into_vec();
        assert!(!cmds.iter().any(|c| matches!(c, Cmd::Http(_))));
        assert!(matches!(
            &cmds[0],
            Cmd::ShowNotification { notification, .. }
                if notification.message == "Please fill in all required fields."
        ));
        assert!(!s.is_submitting());
    }

    #[test]
    fn successful_submit_resets_and_refreshes() {
        let mut s = site();
        let cmds = s
            .update(Msg::FormSubmitted {
                submission: filled_form(),
                submit_label: "Send Message".into(),
            })
            .into_vec();
        assert_eq!(
            cmds[0],
            Cmd::SetSubmitButton {
                label: SENDING_LABEL.into(),
                disabled: true,
            }
        );
        assert!(matches!(cmds[1], Cmd::Http(ApiRequest::SubmitContact(_))));
        assert!(s.is_submitting());

        let done = s
            .update(Msg::HttpCompleted {
                request: RequestKind::SubmitContact,
                outcome: Ok(ApiResponse::new(201, "{}")),
            })
            .into_vec();
        assert!(done.contains(&Cmd::ResetForm));
        assert!(done.contains(&Cmd::Http(ApiRequest::FetchContacts)));
        assert_eq!(
            done.last(),
            Some(&Cmd::SetSubmitButton {
                label: "Send Message".into(),
                disabled: false,
            })
        );
        assert!(!s.is_submitting());
    }

    #[test]
    fn failed_submit_restores_button() {
        let mut s = site();
        s.update(Msg::FormSubmitted {
            submission: filled_form(),
            submit_label: "Send".into(),
        });
        let done = s
            .update(Msg::HttpCompleted {
                request: RequestKind::SubmitContact,
                outcome: Err(SiteError::Transport("offline".into())),
            })
            .into_vec();
        assert!(!done.contains(&Cmd::ResetForm));
        assert!(matches!(
            &done[0],
            Cmd::ShowNotification { notification, .. }
                if notification.message == SUBMIT_ERROR_MESSAGE
        ));
        assert_eq!(
            done.last(),
            Some(&Cmd::SetSubmitButton {
                label: "Send".into(),
                disabled: false,
            })
        );
    }

    #[test]
    fn double_submit_is_ignored_while_pending() {
        let mut s = site();
        s.update(Msg::FormSubmitted {
            submission: filled_form(),
            submit_label: "Send".into(),
        });
        assert_eq!(
            s.update(Msg::FormSubmitted {
                submission: filled_form(),
                submit_label: "Sending...".into(),
            }),
            Cmd::None
        );
    }

    #[test]
    fn fetch_results_render_placeholders() {
        let mut s = site();
        assert_eq!(
            s.update(Msg::HttpCompleted {
                request: RequestKind::FetchContacts,
                outcome: Ok(ApiResponse::new(200, r#"{"contacts":[]}"#)),
            }),
            Cmd::RenderContacts(NO_CONTACTS_HTML.into())
        );
        assert_eq!(
            s.update(Msg::HttpCompleted {
                request: RequestKind::FetchContacts,
                outcome: Ok(ApiResponse::new(200, "not json")),
            }),
            Cmd::RenderContacts(FETCH_ERROR_HTML.into())
        );
    }

    #[test]
    fn contacts_render_through_injected_formatter() {
        let mut s = site().with_timestamp_formatter(|raw: &str| format!("local({raw})"));
        let body = r#"{"contacts":[{"id":9,"name":"Cy","email":"cy@x.io","service":"web","message":"hey","submitted_at":"2024-12-25T09:00:00+05:00"}]}"#;
        let cmd = s.update(Msg::HttpCompleted {
            request: RequestKind::FetchContacts,
            outcome: Ok(ApiResponse::new(200, body)),
        });
        let Cmd::RenderContacts(html) = cmd else {
            panic!("expected RenderContacts, got {cmd:?}");
        };
        assert!(html.contains("local(2024-12-25T09:00:00+05:00)"));
    }

    #[test]
    fn delete_asks_first() {
        let mut s = site();
        assert_eq!(
            s.update(Msg::DeleteRequested(ContactId(4))),
            Cmd::Confirm {
                prompt: DELETE_CONFIRM_PROMPT.into(),
                on_accept: Box::new(Msg::DeleteConfirmed(ContactId(4))),
            }
        );
        assert_eq!(
            s.update(Msg::DeleteConfirmed(ContactId(4))),
            Cmd::Http(ApiRequest::DeleteContact(ContactId(4)))
        );
    }

    #[test]
    fn delete_failure_notifies_error() {
        let mut s = site();
        let cmds = s
            .update(Msg::HttpCompleted {
                request: RequestKind::DeleteContact(ContactId(4)),
                outcome: Ok(ApiResponse::new(404, "")),
            })
            .into_vec();
        assert!(!cmds.contains(&Cmd::Http(ApiRequest::FetchContacts)));
        assert!(matches!(
            &cmds[0],
            Cmd::ShowNotification { notification, .. }
                if notification.message == DELETE_ERROR_MESSAGE
        ));
    }

    #[test]
    fn notification_expiry_ignores_replaced_toasts() {
        let mut s = site();
        s.notify(Notification::success("first"));
        let first = s.notifications().current().map(|(id, _)| id).unwrap();
        s.notify(Notification::success("second"));
        assert_eq!(s.update(Msg::NotificationExpired(first)), Cmd::None);
        assert_eq!(s.update(Msg::NotificationRemoved(first)), Cmd::None);
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_dom("a"), Key::Other);
    }
}
