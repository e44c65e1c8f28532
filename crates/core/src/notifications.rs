//! Notifications
//!
//! Short-lived, user-facing messages. Each notification is shown in insertion order and
//! expires on its own timer, independently of the others.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::{Duration, Instant},
};

use rustc_hash::FxHashMap;

use crate::schedule::{DelayQueue, TaskId};

/// How long a notification stays visible by default.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(4000);

/// Lifetime used when `now + ttl` is past what [`Instant`] can represent.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Monotonic notification identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl Display for NotificationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification id
    pub id: NotificationId,

    /// Message text
    pub message: String,
}

/// Queue of visible notifications with their pending expiries.
#[derive(Debug)]
pub struct Notifications {
    visible: Vec<Notification>,
    expiries: DelayQueue<NotificationId>,
    timers: FxHashMap<NotificationId, TaskId>,
    ttl: Duration,
    next_id: u64,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_ttl(NOTIFICATION_TTL)
    }
}

impl Notifications {
    /// Create an empty queue using [`NOTIFICATION_TTL`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue with a custom lifetime per notification.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            visible: Vec::new(),
            expiries: DelayQueue::new(),
            timers: FxHashMap::default(),
            ttl,
            next_id: 0,
        }
    }

    /// Lifetime of each notification.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show `message` and schedule its removal one lifetime after `now`.
    pub fn push(&mut self, message: impl Into<String>, now: Instant) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        self.visible.push(Notification {
            id,
            message: message.into(),
        });

        let deadline = now
            .checked_add(self.ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);

        let timer = self.expiries.schedule(deadline, id);
        self.timers.insert(id, timer);

        id
    }

    /// Remove a notification whose timer fired. Unknown or already removed ids are ignored.
    ///
    /// Returns whether anything was removed.
    pub fn expire(&mut self, id: NotificationId) -> bool {
        self.timers.remove(&id);

        let before = self.visible.len();
        self.visible.retain(|notification| notification.id != id);

        self.visible.len() != before
    }

    /// Remove a notification ahead of its timer, cancelling the timer.
    ///
    /// Returns whether anything was removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(timer) = self.timers.remove(&id) {
            self.expiries.cancel(timer);
        }

        self.expire(id)
    }

    /// Expire every notification whose lifetime has elapsed at `now`.
    ///
    /// Returns the ids that were removed, earliest deadline first.
    pub fn poll(&mut self, now: Instant) -> Vec<NotificationId> {
        self.expiries
            .pop_due(now)
            .into_iter()
            .filter_map(|(_, id)| self.expire(id).then_some(id))
            .collect()
    }

    /// When the next notification is due to expire.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.expiries.next_deadline()
    }

    /// Visible notifications in insertion order.
    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }

    /// Number of visible notifications.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Check if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
