#![forbid(unsafe_code)]

//! Toast notifications.
//!
//! At most one notification exists at a time. Each one gets a fresh
//! [`NotificationId`]; timers scheduled for an older id are ignored once a
//! newer notification has replaced it.

/// Visual flavour of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    /// No background styling.
    Plain,
}

impl NotificationKind {
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Plain => "",
        }
    }

    #[must_use]
    pub const fn background(self) -> Option<&'static str> {
        match self {
            Self::Success => Some("linear-gradient(135deg, #10b981, #059669)"),
            Self::Error => Some("linear-gradient(135deg, #ef4444, #dc2626)"),
            Self::Plain => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Class shared by every toast element.
pub const NOTIFICATION_CLASS: &str = "notification";

/// Keyframes referenced by the entrance/exit animations.
pub const NOTIFICATION_KEYFRAMES: &str = "\
@keyframes slideIn {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
@keyframes slideOut {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}";

/// `animation` value applied when the toast starts leaving.
pub const EXIT_ANIMATION: &str = "slideOut 0.3s ease";

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    /// `class` attribute value, e.g. `"notification success"`.
    #[must_use]
    pub fn class_list(&self) -> String {
        match self.kind.class_name() {
            "" => NOTIFICATION_CLASS.to_string(),
            kind => format!("{NOTIFICATION_CLASS} {kind}"),
        }
    }

    /// Inline `style` for the toast element.
    #[must_use]
    pub fn css_text(&self) -> String {
        let mut css = String::from(
            "position: fixed; top: 100px; right: 20px; padding: 16px 24px; \
             border-radius: 8px; color: white; font-weight: 500; z-index: 10000; \
             animation: slideIn 0.3s ease;",
        );
        if let Some(background) = self.kind.background() {
            css.push_str(" background: ");
            css.push_str(background);
            css.push(';');
        }
        css
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Shown,
    /// Exit animation running; removal is pending.
    Leaving,
}

/// Tracks the single live notification.
#[derive(Debug, Clone, Default)]
pub struct NotificationSlot {
    next_id: u64,
    current: Option<(NotificationId, NotificationPhase)>,
}

impl NotificationSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new notification, replacing any existing one.
    pub fn show(&mut self) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.current = Some((id, NotificationPhase::Shown));
        id
    }

    /// Start the exit phase. Returns `false` for stale or already-leaving ids.
    pub fn begin_exit(&mut self, id: NotificationId) -> bool {
        match &mut self.current {
            Some((current, phase)) if *current == id && *phase == NotificationPhase::Shown => {
                *phase = NotificationPhase::Leaving;
                true
            }
            _ => false,
        }
    }

    /// Drop the notification. Returns `false` for stale ids.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        if self.current.is_some_and(|(current, _)| current == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<(NotificationId, NotificationPhase)> {
        self.current
    }
}
