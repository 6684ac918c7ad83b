//! Dashboard toasts and the notification inbox behind the bell badge.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::NotificationId;
use tokio::time::Instant;

pub const TEACHER_TOAST_TTL: Duration = Duration::from_millis(3000);
pub const PARENT_TOAST_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    expires_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InboxItem {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
}

pub struct NotificationCenter {
    toast_ttl: Duration,
    toasts: Vec<Toast>,
    inbox: Vec<InboxItem>,
}

impl NotificationCenter {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            toast_ttl,
            toasts: Vec::new(),
            inbox: Vec::new(),
        }
    }

    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let id = NotificationId::random();
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            created_at: Utc::now(),
            expires_at: Instant::now() + self.toast_ttl,
        });
        id
    }

    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Drops expired toasts and returns what is still on screen, oldest first.
    pub fn visible_toasts(&mut self) -> &[Toast] {
        let now = Instant::now();
        self.toasts.retain(|toast| !toast.is_expired(now));
        &self.toasts
    }

    pub fn push_inbox(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        read: bool,
    ) -> NotificationId {
        let id = NotificationId::random();
        self.inbox.push(InboxItem {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            read,
        });
        id
    }

    pub fn inbox(&self) -> &[InboxItem] {
        &self.inbox
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.iter().filter(|item| !item.read).count()
    }

    /// Badge text; hidden when nothing is unread.
    pub fn badge(&self) -> Option<usize> {
        match self.unread_count() {
            0 => None,
            n => Some(n),
        }
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.inbox {
            item.read = true;
        }
    }
}
