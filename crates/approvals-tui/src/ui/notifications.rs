// Status-bar notifications for approval outcomes and template load problems
// Most severe notification wins; repeats within a short window are dropped

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// How long an identical message is suppressed after being pushed
const REPEAT_WINDOW: Duration = Duration::from_secs(2);

/// Notification priority levels (higher = more important)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    /// Glyph shown before the message in the status bar
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }

    /// How long a notification of this level stays up
    fn lifetime(self) -> Duration {
        match self {
            NotificationLevel::Info | NotificationLevel::Success => Duration::from_secs(3),
            NotificationLevel::Warning => Duration::from_secs(4),
            NotificationLevel::Error => Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration: Duration,
    pub shown_at: Option<Instant>,
}

impl Notification {
    fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            duration: level.lifetime(),
            shown_at: None,
        }
    }

    /// A request was rejected or similar neutral outcome (3 seconds)
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    /// A request was approved (3 seconds)
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    /// Alerts or state could not be derived; the page shows less (4 seconds)
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Warning)
    }

    /// A request cannot be presented at all (5 seconds)
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    /// Whether its display time ran out; never true before it was shown
    pub fn is_expired(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|shown| now.duration_since(shown) >= self.duration)
    }

    fn shown(mut self, now: Instant) -> Self {
        self.shown_at.get_or_insert(now);
        self
    }
}

/// The visible notification plus a backlog ordered by level, most severe first
#[derive(Debug, Default)]
pub struct NotificationQueue {
    current: Option<Notification>,
    backlog: VecDeque<Notification>,
    /// Message -> time after which it may be shown again
    suppressed_until: HashMap<String, Instant>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification. A more severe one replaces the visible one
    /// outright; otherwise it waits behind everything at least as severe.
    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    fn push_at(&mut self, notification: Notification, now: Instant) {
        self.suppressed_until.retain(|_, until| *until > now);
        if self.suppressed_until.contains_key(&notification.message) {
            return;
        }
        self.suppressed_until
            .insert(notification.message.clone(), now + REPEAT_WINDOW);

        let outranks = self
            .current
            .as_ref()
            .map_or(true, |current| notification.level > current.level);
        if outranks {
            self.current = Some(notification.shown(now));
            return;
        }

        let slot = self
            .backlog
            .iter()
            .take_while(|queued| queued.level >= notification.level)
            .count();
        self.backlog.insert(slot, notification);
    }

    /// The notification the status bar shows
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Hide the visible notification and show the next one, if any
    pub fn dismiss(&mut self) {
        self.current = None;
        self.promote(Instant::now());
    }

    /// Retire the visible notification once its time is up
    pub fn tick(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.current = None;
            self.promote(now);
        }
    }

    fn promote(&mut self, now: Instant) {
        if self.current.is_none() {
            self.current = self.backlog.pop_front().map(|next| next.shown(now));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.backlog.is_empty()
    }
}
