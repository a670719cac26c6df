//! Notification center and its simulated source.

use crate::live::{EventSource, Recent, Ticker};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub issue_id: Option<String>,
}

/// NotificationCenter keeps the latest notifications, newest first
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    items: Recent<Notification>,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        NotificationCenter {
            items: Recent::new(capacity),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Returns false when no notification has that id.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for notification in self.items.iter_mut() {
            notification.read = true;
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Unread badge text, capped at "9+"; `None` when all are read.
    pub fn badge(&self) -> Option<String> {
        match self.unread_count() {
            0 => None,
            n if n > 9 => Some("9+".to_string()),
            n => Some(n.to_string()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAPACITY)
    }
}

struct Template {
    title: &'static str,
    message: &'static str,
    kind: NotificationKind,
    issue_id: &'static str,
}

static TEMPLATES: [Template; 3] = [
    Template {
        title: "New Issue Reported",
        message: "Pothole reported on Meerut Road requires attention",
        kind: NotificationKind::Info,
        issue_id: "new-issue-1",
    },
    Template {
        title: "Issue Resolved",
        message: "Streetlight repair on Ashok Vihar has been completed",
        kind: NotificationKind::Success,
        issue_id: "resolved-issue-1",
    },
    Template {
        title: "High Priority Alert",
        message: "Water main break reported at Sahibabad - urgent response needed",
        kind: NotificationKind::Warning,
        issue_id: "urgent-issue-1",
    },
];

/// SimulatedNotifications emits a canned notification on a fraction of ticks
pub struct SimulatedNotifications {
    rng: StdRng,
    probability: f64,
    ticker: Ticker,
    seq: u64,
}

impl SimulatedNotifications {
    pub fn new(period: Duration, probability: f64, seed: u64) -> Self {
        SimulatedNotifications {
            rng: StdRng::seed_from_u64(seed),
            probability: if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) },
            ticker: Ticker::new(period),
            seq: 0,
        }
    }
}

#[async_trait]
impl EventSource for SimulatedNotifications {
    type Event = Notification;

    async fn next_event(&mut self) -> Option<Notification> {
        if self.probability <= 0.0 {
            return None;
        }
        loop {
            self.ticker.tick().await;
            if !self.rng.gen_bool(self.probability) {
                continue;
            }
            let template = &TEMPLATES[self.rng.gen_range(0..TEMPLATES.len())];
            self.seq += 1;
            return Some(Notification {
                id: format!("notification-{}", self.seq),
                title: template.title.to_string(),
                message: template.message.to_string(),
                kind: template.kind,
                timestamp: Utc::now(),
                read: false,
                issue_id: Some(template.issue_id.to_string()),
            });
        }
    }
}
