//! Transient notification banners with independent auto-dismiss deadlines.

use std::time::{Duration, Instant};

use serde::Serialize;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Danger,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub fn css_suffix(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "check-circle",
            Severity::Danger => "exclamation-triangle",
            Severity::Warning => "exclamation-circle",
            Severity::Info => "info-circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

/// Stack of live notifications, newest first.
#[derive(Debug)]
pub struct NotificationCenter {
    ttl: Duration,
    next_id: u64,
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            active: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(
            0,
            Notification {
                id,
                message: message.into(),
                severity,
                expires_at: now + self.ttl,
            },
        );
        id
    }

    /// Drops every notification whose deadline has passed; returns how many.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|n| n.expires_at > now);
        before - self.active.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.iter().map(|n| n.expires_at).min()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}
