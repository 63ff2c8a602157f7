#![forbid(unsafe_code)]

//! Browser host for [`Site`].
//!
//! Owns every listener, observer, timer and animation frame the page uses.
//! Callbacks hold only a `Weak` back-reference, so dropping the runtime (or
//! calling [`SiteRuntime::destroy`]) cancels everything.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::{Interval, Timeout};
use greycells_core::api::ApiRequest;
use greycells_core::config::{ApiEndpoints, SiteConfig};
use greycells_core::contacts::{DELETE_BUTTON_SELECTOR, DELETE_ID_ATTR, parse_delete_target};
use greycells_core::counter::CounterId;
use greycells_core::error::SiteResult;
use greycells_core::nav::{fragment_id, nav_link_selector};
use greycells_core::notification::{EXIT_ANIMATION, NotificationId};
use greycells_core::observe::ObserverOptions;
use greycells_core::reveal::{
    LAZY_IMAGE_SELECTOR, LAZY_SRC_ATTR, StyleDecl, hidden_style, hover_transform, reveal_selector,
    revealed_style,
};
use greycells_core::site::{ACTIVE_CLASS, AnchorTarget, Cmd, Key, Msg, PageFeatures, Site};
use greycells_core::subscription::{SubId, Subscription, SubscriptionSet};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, ScrollBehavior, ScrollToOptions};

use crate::dom::{self, PageDom};
use crate::http;
use crate::observer::OnceVisibility;
use crate::timestamp::LocaleTimestampFormatter;

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

struct PendingTimeout {
    done: Rc<Cell<bool>>,
    _handle: Timeout,
}

pub(crate) struct SiteRuntime {
    site: RefCell<Site>,
    dom: PageDom,
    endpoints: ApiEndpoints,
    counters: Vec<Element>,
    subscriptions: RefCell<SubscriptionSet>,
    intervals: RefCell<HashMap<SubId, Interval>>,
    timeouts: RefCell<Vec<PendingTimeout>>,
    frames: RefCell<HashMap<CounterId, AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
    observers: RefCell<Vec<OnceVisibility>>,
    notification: RefCell<Option<(NotificationId, Element)>>,
    destroyed: Cell<bool>,
}

impl SiteRuntime {
    /// Resolve the page, wire every handler and run the initial commands.
    pub fn start(config: SiteConfig) -> SiteResult<Rc<Self>> {
        let dom = PageDom::resolve()?;

        let mut features = PageFeatures::empty();
        features.set(PageFeatures::BACK_TO_TOP, dom.back_to_top.is_some());
        features.set(PageFeatures::TESTIMONIAL_NAV, dom.has_testimonial_nav());
        features.set(PageFeatures::CONTACTS_PANEL, dom.contacts_list.is_some());

        let counters = dom::query_all(&dom.document, ".stat-number[data-count]")?;
        let site = Site::new(config.clone(), features, dom.testimonial_cards.len())
            .with_timestamp_formatter(LocaleTimestampFormatter);

        let runtime = Rc::new(Self {
            site: RefCell::new(site),
            endpoints: config.api.clone(),
            counters,
            dom,
            subscriptions: RefCell::new(SubscriptionSet::new()),
            intervals: RefCell::new(HashMap::new()),
            timeouts: RefCell::new(Vec::new()),
            frames: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            notification: RefCell::new(None),
            destroyed: Cell::new(false),
        });

        if let Err(err) = runtime.dom.ensure_keyframes() {
            warn!(error = %err, "notification keyframes not installed");
        }
        for link in &config.preload {
            if let Err(err) = runtime.dom.preload(link) {
                warn!(href = %link.href, error = %err, "preload link not added");
            }
        }
        runtime.install_listeners(&config)?;
        runtime.install_observers(&config)?;

        let cmd = runtime.site.borrow_mut().init();
        runtime.execute(cmd);
        runtime.reconcile();
        info!("GreyCells Tech Consulting website initialized successfully!");
        Ok(runtime)
    }

    pub fn dispatch(self: &Rc<Self>, msg: Msg) {
        if self.destroyed.get() {
            return;
        }
        let cmd = self.site.borrow_mut().update(msg);
        self.execute(cmd);
        self.reconcile();
    }

    /// Drop every listener, observer, timer and frame.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.listeners.borrow_mut().clear();
        for observer in self.observers.borrow_mut().drain(..) {
            debug!(pending = observer.pending(), "observer disconnected");
        }
        let stopped = self.subscriptions.borrow_mut().stop_all();
        debug!(count = stopped.len(), "subscriptions stopped");
        self.intervals.borrow_mut().clear();
        self.timeouts.borrow_mut().clear();
        self.frames.borrow_mut().clear();
        if let Some((_, el)) = self.notification.borrow_mut().take() {
            el.remove();
        }
        info!("site controller destroyed");
    }

    // ── Wiring ────────────────────────────────────────────────────────────

    fn listen<F>(
        self: &Rc<Self>,
        target: &EventTarget,
        event: &'static str,
        prevent_default: bool,
        handler: F,
    ) where
        F: Fn(&Rc<Self>, &Event) + 'static,
    {
        let weak = Rc::downgrade(self);
        let options = if prevent_default {
            EventListenerOptions::enable_prevent_default()
        } else {
            EventListenerOptions::default()
        };
        let listener = EventListener::new_with_options(target, event, options, move |event| {
            if let Some(runtime) = weak.upgrade() {
                handler(&runtime, event);
            }
        });
        self.listeners.borrow_mut().push(listener);
    }

    fn on_click(self: &Rc<Self>, target: &EventTarget, msg: Msg) {
        self.listen(target, "click", false, move |runtime, _| {
            runtime.dispatch(msg.clone());
        });
    }

    fn install_listeners(self: &Rc<Self>, config: &SiteConfig) -> SiteResult<()> {
        let dom = &self.dom;

        self.on_click(&dom.menu_button, Msg::MenuToggled);
        for link in dom::query_all(&dom.document, ".nav-links a")? {
            self.on_click(&link, Msg::NavLinkClicked);
        }

        self.listen(&dom.window, "scroll", false, |runtime, _| {
            let scroll_y = runtime.dom.scroll_y();
            let sections = runtime.dom.sections();
            runtime.dispatch(Msg::Scrolled { scroll_y, sections });
        });

        if let Some(back_to_top) = &dom.back_to_top {
            self.on_click(back_to_top, Msg::BackToTopClicked);
        }

        for anchor in dom::query_all(&dom.document, "a[href^=\"#\"]")? {
            let href = anchor.get_attribute("href").unwrap_or_default();
            self.listen(&anchor, "click", true, move |runtime, event| {
                event.prevent_default();
                let target = fragment_id(&href)
                    .and_then(|id| runtime.dom.document.get_element_by_id(id))
                    .map(|el| AnchorTarget {
                        viewport_top: el.get_bounding_client_rect().top(),
                        page_offset: runtime.dom.scroll_y(),
                    });
                runtime.dispatch(Msg::AnchorClicked(target));
            });
        }

        if let Some(prev) = &dom.testimonial_prev {
            self.on_click(prev, Msg::TestimonialPrev);
        }
        if let Some(next) = &dom.testimonial_next {
            self.on_click(next, Msg::TestimonialNext);
        }

        self.listen(&dom.document, "keydown", false, |runtime, event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            match Key::from_dom(&event.key()) {
                Key::Other => {}
                key => runtime.dispatch(Msg::KeyDown(key)),
            }
        });

        self.listen(&dom.contact_form, "submit", true, |runtime, event| {
            event.prevent_default();
            let submission = match runtime.dom.form_submission() {
                Ok(submission) => submission,
                Err(err) => {
                    warn!(error = %err, "could not read contact form");
                    return;
                }
            };
            let submit_label = runtime
                .dom
                .submit_button()
                .and_then(|button| button.text_content())
                .unwrap_or_default();
            runtime.dispatch(Msg::FormSubmitted {
                submission,
                submit_label,
            });
        });

        if let Some(refresh) = &dom.refresh_button {
            self.on_click(refresh, Msg::RefreshContacts);
        }

        if let Some(list) = &dom.contacts_list {
            self.listen(list, "click", false, |runtime, event| {
                let button = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(DELETE_BUTTON_SELECTOR).ok().flatten());
                let Some(button) = button else {
                    return;
                };
                match button
                    .get_attribute(DELETE_ID_ATTR)
                    .as_deref()
                    .and_then(parse_delete_target)
                {
                    Some(id) => runtime.dispatch(Msg::DeleteRequested(id)),
                    None => warn!("delete control without a valid contact id"),
                }
            });
        }

        for rule in &config.hover_lift {
            for el in dom::query_all(&dom.document, &rule.selector)? {
                for (event, hovered) in [("mouseenter", true), ("mouseleave", false)] {
                    let transform = hover_transform(rule.lift_px, hovered);
                    let target = el.clone();
                    self.listen(&el, event, false, move |_, _| {
                        dom::apply_style(
                            &target,
                            &[StyleDecl {
                                property: "transform",
                                value: transform.clone(),
                            }],
                        );
                    });
                }
            }
        }
        Ok(())
    }

    fn install_observers(self: &Rc<Self>, config: &SiteConfig) -> SiteResult<()> {
        let mut observers = Vec::new();

        if !self.counters.is_empty() {
            let weak: Weak<Self> = Rc::downgrade(self);
            observers.push(OnceVisibility::observe(
                self.counters.clone(),
                &ObserverOptions::counters(&config.counter),
                move |index, el| {
                    let (Some(runtime), Ok(index)) = (weak.upgrade(), u32::try_from(index)) else {
                        return;
                    };
                    runtime.dispatch(Msg::CounterVisible {
                        counter: CounterId(index),
                        raw_target: el.get_attribute("data-count").unwrap_or_default(),
                    });
                },
            )?);
        }

        let reveal = dom::query_all(&self.dom.document, &reveal_selector(&config.reveal))?;
        if !reveal.is_empty() {
            for (index, el) in reveal.iter().enumerate() {
                dom::apply_style(el, &hidden_style(index, &config.reveal));
            }
            let revealed = revealed_style();
            observers.push(OnceVisibility::observe(
                reveal,
                &ObserverOptions::reveal(&config.reveal),
                move |_, el| dom::apply_style(el, &revealed),
            )?);
        }

        let images = dom::query_all(&self.dom.document, LAZY_IMAGE_SELECTOR)?;
        if !images.is_empty() {
            observers.push(OnceVisibility::observe(
                images,
                &ObserverOptions::lazy_images(&config.lazy_images),
                |_, img| {
                    let Some(src) = img.get_attribute(LAZY_SRC_ATTR) else {
                        return;
                    };
                    if let Err(err) = img.set_attribute("src", &src) {
                        warn!(error = ?err, "lazy image src not set");
                        return;
                    }
                    if let Err(err) = img.remove_attribute(LAZY_SRC_ATTR) {
                        warn!(error = ?err, "lazy image data-src not removed");
                    }
                },
            )?);
        }

        debug!(count = observers.len(), "visibility observers installed");
        self.observers.borrow_mut().extend(observers);
        Ok(())
    }

    // ── Command execution ─────────────────────────────────────────────────

    fn execute(self: &Rc<Self>, cmd: Cmd) {
        for cmd in cmd.into_vec() {
            self.apply(cmd);
        }
    }

    fn apply(self: &Rc<Self>, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Batch(_) => {}
            Cmd::SetClass {
                target,
                class,
                enabled,
            } => {
                if let Some(el) = self.dom.target(target) {
                    dom::set_class(el, class, enabled);
                }
            }
            Cmd::SetNavLinkActive { section_id, active } => {
                match dom::query(&self.dom.document, &nav_link_selector(&section_id)) {
                    Ok(Some(link)) => dom::set_class(&link, ACTIVE_CLASS, active),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(section_id = %section_id, error = %err, "nav link lookup failed");
                    }
                }
            }
            Cmd::ScrollTo { top } => {
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_behavior(ScrollBehavior::Smooth);
                self.dom.window.scroll_to_with_scroll_to_options(&options);
            }
            Cmd::SetCounterText { counter, text } => {
                if let Some(el) = self.counters.get(counter.0 as usize) {
                    el.set_text_content(Some(&text));
                }
            }
            Cmd::RequestFrame(counter) => {
                let weak = Rc::downgrade(self);
                let handle = request_animation_frame(move |_| {
                    if let Some(runtime) = weak.upgrade() {
                        runtime.frames.borrow_mut().remove(&counter);
                        runtime.dispatch(Msg::CounterFrame(counter));
                    }
                });
                self.frames.borrow_mut().insert(counter, handle);
            }
            Cmd::ShowTestimonial(index) => {
                for (i, card) in self.dom.testimonial_cards.iter().enumerate() {
                    dom::set_class(card, ACTIVE_CLASS, i == index);
                }
            }
            Cmd::ShowNotification { id, notification } => {
                match self.dom.show_notification(&notification) {
                    Ok(el) => *self.notification.borrow_mut() = Some((id, el)),
                    Err(err) => warn!(error = %err, "notification not shown"),
                }
            }
            Cmd::BeginNotificationExit(id) => {
                let shown = self.notification.borrow();
                if let Some((_, el)) = shown.as_ref().filter(|(n, _)| *n == id) {
                    dom::apply_style(
                        el,
                        &[StyleDecl {
                            property: "animation",
                            value: EXIT_ANIMATION.to_string(),
                        }],
                    );
                }
            }
            Cmd::RemoveNotification(id) => {
                let removed = self.notification.borrow_mut().take_if(|(n, _)| *n == id);
                if let Some((_, el)) = removed {
                    el.remove();
                }
            }
            Cmd::After { delay, msg } => self.schedule(delay, *msg),
            Cmd::SetSubmitButton { label, disabled } => {
                let Some(button) = self.dom.submit_button() else {
                    return;
                };
                button.set_text_content(Some(&label));
                let result = if disabled {
                    button.set_attribute("disabled", "")
                } else {
                    button.remove_attribute("disabled")
                };
                if let Err(err) = result {
                    warn!(error = ?err, "submit button not updated");
                }
            }
            Cmd::ResetForm => self.dom.contact_form.reset(),
            Cmd::Http(request) => self.send(request),
            Cmd::RenderContacts(html) => {
                if let Some(list) = &self.dom.contacts_list {
                    list.set_inner_html(&html);
                }
            }
            Cmd::Confirm { prompt, on_accept } => {
                if gloo::dialogs::confirm(&prompt) {
                    self.dispatch(*on_accept);
                } else {
                    debug!("confirmation declined");
                }
            }
        }
    }

    fn schedule(self: &Rc<Self>, delay: Duration, msg: Msg) {
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        let weak = Rc::downgrade(self);
        let handle = Timeout::new(millis(delay), move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.dispatch(msg);
            }
            flag.set(true);
        });
        let mut timeouts = self.timeouts.borrow_mut();
        timeouts.retain(|t| !t.done.get());
        timeouts.push(PendingTimeout {
            done,
            _handle: handle,
        });
    }

    fn send(self: &Rc<Self>, request: ApiRequest) {
        let endpoints = self.endpoints.clone();
        debug!(
            method = request.method().as_str(),
            url = %request.url(&endpoints),
            "sending request"
        );
        let weak = Rc::downgrade(self);
        spawn_local(async move {
            let outcome = http::send(&request, &endpoints).await;
            if let Some(runtime) = weak.upgrade() {
                runtime.dispatch(Msg::HttpCompleted {
                    request: request.kind(),
                    outcome,
                });
            }
        });
    }

    fn reconcile(self: &Rc<Self>) {
        let declared = self.site.borrow().subscriptions();
        let diff = self.subscriptions.borrow_mut().reconcile(declared);
        for id in diff.stop {
            self.intervals.borrow_mut().remove(&id);
        }
        for sub in diff.start {
            match sub {
                Subscription::Every {
                    id,
                    period,
                    message,
                } => {
                    let weak = Rc::downgrade(self);
                    let interval = Interval::new(millis(period), move || {
                        if let Some(runtime) = weak.upgrade() {
                            runtime.dispatch(message.clone());
                        }
                    });
                    self.intervals.borrow_mut().insert(id, interval);
                }
            }
        }
    }
}
