#![forbid(unsafe_code)]

//! Deterministic page simulator for testing.
//!
//! `PageSimulator` runs a [`Site`] without a browser. It executes every
//! [`Cmd`] against an in-memory [`PageState`], keeps a virtual clock for
//! timers and subscriptions, queues HTTP requests until the test answers
//! them, and answers confirmation prompts from a script.
//!
//! # Example
//!
//! ```
//! use greycells_core::config::SiteConfig;
//! use greycells_core::simulator::PageSimulator;
//! use greycells_core::site::{Msg, PageFeatures, Site};
//!
//! let mut sim = PageSimulator::new(Site::new(SiteConfig::default(), PageFeatures::all(), 3));
//! sim.init();
//! sim.send(Msg::TestimonialNext);
//! assert_eq!(sim.page().active_testimonial, Some(1));
//! ```

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Duration;

use crate::api::{ApiRequest, HttpOutcome};
use crate::counter::CounterId;
use crate::notification::{Notification, NotificationId};
use crate::site::{Cmd, Msg, Site, Target};
use crate::subscription::{SubId, Subscription, SubscriptionSet};

/// The toast currently on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotification {
    pub id: NotificationId,
    pub notification: Notification,
    pub leaving: bool,
}

/// Observable page state after executing commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub classes: BTreeSet<(Target, &'static str)>,
    /// Section ids whose nav link carries `active`.
    pub active_links: BTreeSet<String>,
    pub active_testimonial: Option<usize>,
    pub counter_texts: BTreeMap<CounterId, String>,
    pub notification: Option<ShownNotification>,
    /// Every toast shown, oldest first.
    pub notification_history: Vec<Notification>,
    pub contacts_html: Option<String>,
    /// Label and disabled flag of the submit button, once touched.
    pub submit_button: Option<(String, bool)>,
    pub form_resets: usize,
    pub scroll_targets: Vec<f64>,
}

impl PageState {
    #[must_use]
    pub fn has_class(&self, target: Target, class: &str) -> bool {
        self.classes.iter().any(|(t, c)| *t == target && *c == class)
    }
}

#[derive(Debug, Clone)]
enum TimerKind {
    Once(Msg),
    Every {
        sub: SubId,
        period: Duration,
        message: Msg,
    },
}

#[derive(Debug, Clone)]
struct Timer {
    due: Duration,
    seq: u64,
    kind: TimerKind,
}

/// Deterministic simulator for [`Site`].
pub struct PageSimulator {
    site: Site,
    page: PageState,
    now: Duration,
    seq: u64,
    timers: Vec<Timer>,
    subscriptions: SubscriptionSet,
    pending_frames: Vec<CounterId>,
    requests: Vec<ApiRequest>,
    in_flight: VecDeque<ApiRequest>,
    confirm_answers: VecDeque<bool>,
    prompts: Vec<String>,
    executed: Vec<Cmd>,
}

impl PageSimulator {
    /// The site is not initialized until [`init`](Self::init) is called.
    #[must_use]
    pub fn new(site: Site) -> Self {
        Self {
            site,
            page: PageState::default(),
            now: Duration::ZERO,
            seq: 0,
            timers: Vec::new(),
            subscriptions: SubscriptionSet::new(),
            pending_frames: Vec::new(),
            requests: Vec::new(),
            in_flight: VecDeque::new(),
            confirm_answers: VecDeque::new(),
            prompts: Vec::new(),
            executed: Vec::new(),
        }
    }

    pub fn init(&mut self) {
        let cmd = self.site.init();
        self.execute(cmd);
        self.reconcile();
    }

    /// Dispatch a message and execute the resulting commands.
    pub fn send(&mut self, msg: Msg) {
        self.dispatch(msg);
        self.reconcile();
    }

    /// Move the virtual clock forward, firing due timers in order.
    pub fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        while let Some(index) = self.next_due(target) {
            let timer = self.timers.remove(index);
            self.now = timer.due;
            match timer.kind {
                TimerKind::Once(msg) => self.dispatch(msg),
                TimerKind::Every {
                    sub,
                    period,
                    message,
                } => {
                    self.schedule(
                        timer.due + period,
                        TimerKind::Every {
                            sub,
                            period,
                            message: message.clone(),
                        },
                    );
                    self.dispatch(message);
                }
            }
            self.reconcile();
        }
        self.now = target;
    }

    /// Run queued animation frames until none remain or `max` frames ran.
    /// Returns the number of frames run.
    pub fn run_frames(&mut self, max: usize) -> usize {
        let mut frames = 0;
        while frames < max {
            let pending = std::mem::take(&mut self.pending_frames);
            if pending.is_empty() {
                break;
            }
            for counter in pending {
                self.dispatch(Msg::CounterFrame(counter));
            }
            self.reconcile();
            frames += 1;
        }
        frames
    }

    /// Complete the oldest in-flight request. Returns it, or `None` when
    /// nothing is waiting.
    pub fn respond(&mut self, outcome: HttpOutcome) -> Option<ApiRequest> {
        let request = self.in_flight.pop_front()?;
        self.send(Msg::HttpCompleted {
            request: request.kind(),
            outcome,
        });
        Some(request)
    }

    /// Script the answer to the next confirmation prompt. Unscripted
    /// prompts are accepted.
    pub fn answer_confirm(&mut self, accept: bool) {
        self.confirm_answers.push_back(accept);
    }

    #[must_use]
    pub fn site(&self) -> &Site {
        &self.site
    }

    #[must_use]
    pub fn page(&self) -> &PageState {
        &self.page
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Every request issued so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> &[ApiRequest] {
        &self.requests
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Every executed command in order, batches flattened.
    #[must_use]
    pub fn executed(&self) -> &[Cmd] {
        &self.executed
    }

    fn dispatch(&mut self, msg: Msg) {
        let cmd = self.site.update(msg);
        self.execute(cmd);
    }

    fn reconcile(&mut self) {
        let diff = self.subscriptions.reconcile(self.site.subscriptions());
        for id in diff.stop {
            self.timers
                .retain(|t| !matches!(t.kind, TimerKind::Every { sub, .. } if sub == id));
        }
        for sub in diff.start {
            match sub {
                Subscription::Every {
                    id,
                    period,
                    message,
                } => self.schedule(
                    self.now + period,
                    TimerKind::Every {
                        sub: id,
                        period,
                        message,
                    },
                ),
            }
        }
    }

    fn schedule(&mut self, due: Duration, kind: TimerKind) {
        self.seq += 1;
        self.timers.push(Timer {
            due,
            seq: self.seq,
            kind,
        });
    }

    fn next_due(&self, limit: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= limit)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(index, _)| index)
    }

    fn execute(&mut self, cmd: Cmd) {
        for cmd in cmd.into_vec() {
            self.executed.push(cmd.clone());
            self.apply(cmd);
        }
    }

    fn apply(&mut self, cmd: Cmd) {
        let page = &mut self.page;
        match cmd {
            Cmd::None | Cmd::Batch(_) => {}
            Cmd::SetClass {
                target,
                class,
                enabled,
            } => {
                if enabled {
                    page.classes.insert((target, class));
                } else {
                    page.classes.remove(&(target, class));
                }
            }
            Cmd::SetNavLinkActive { section_id, active } => {
                if active {
                    page.active_links.insert(section_id);
                } else {
                    page.active_links.remove(&section_id);
                }
            }
            Cmd::ScrollTo { top } => page.scroll_targets.push(top),
            Cmd::SetCounterText { counter, text } => {
                page.counter_texts.insert(counter, text);
            }
            Cmd::RequestFrame(counter) => {
                if !self.pending_frames.contains(&counter) {
                    self.pending_frames.push(counter);
                }
            }
            Cmd::ShowTestimonial(index) => page.active_testimonial = Some(index),
            Cmd::ShowNotification { id, notification } => {
                page.notification_history.push(notification.clone());
                page.notification = Some(ShownNotification {
                    id,
                    notification,
                    leaving: false,
                });
            }
            Cmd::BeginNotificationExit(id) => {
                if let Some(shown) = page.notification.as_mut().filter(|s| s.id == id) {
                    shown.leaving = true;
                }
            }
            Cmd::RemoveNotification(id) => {
                if page.notification.as_ref().is_some_and(|s| s.id == id) {
                    page.notification = None;
                }
            }
            Cmd::After { delay, msg } => {
                let due = self.now + delay;
                self.schedule(due, TimerKind::Once(*msg));
            }
            Cmd::SetSubmitButton { label, disabled } => {
                page.submit_button = Some((label, disabled));
            }
            Cmd::ResetForm => page.form_resets += 1,
            Cmd::Http(request) => {
                self.requests.push(request.clone());
                self.in_flight.push_back(request);
            }
            Cmd::RenderContacts(html) => page.contacts_html = Some(html),
            Cmd::Confirm { prompt, on_accept } => {
                self.prompts.push(prompt);
                if self.confirm_answers.pop_front().unwrap_or(true) {
                    self.dispatch(*on_accept);
                }
            }
        }
    }
}
