//! Bounded feed of recent user-visible activity.
//!
//! Records live in a ring behind one lock; the oldest are dropped once the
//! configured cap is exceeded. Every insert is also published to
//! [`ActivityTracker::subscribe`] receivers.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use reaper_core::MonitoringConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Info => "info",
            ActivityKind::Success => "success",
            ActivityKind::Warning => "warning",
            ActivityKind::Error => "error",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub title: String,
    pub kind: ActivityKind,
    pub timestamp: DateTime<Local>,
}

impl ActivityRecord {
    pub fn new(title: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            title: title.into(),
            kind,
            timestamp: Local::now(),
        }
    }

    /// Relative age for display: "Just now", "5m ago", "2h ago", "3d ago",
    /// then the date ("Jan 15").
    pub fn time_ago(&self, now: DateTime<Local>) -> String {
        let elapsed = now.signed_duration_since(self.timestamp);

        if elapsed.num_seconds() < 60 {
            "Just now".to_string()
        } else if elapsed.num_minutes() < 60 {
            format!("{}m ago", elapsed.num_minutes())
        } else if elapsed.num_hours() < 24 {
            format!("{}h ago", elapsed.num_hours())
        } else if elapsed.num_days() < 7 {
            format!("{}d ago", elapsed.num_days())
        } else {
            self.timestamp.format("%b %d").to_string()
        }
    }
}

struct Inner {
    records: Mutex<VecDeque<ActivityRecord>>,
    max: usize,
    events: broadcast::Sender<ActivityRecord>,
}

/// Thread-safe, cloneable handle to the activity feed.
#[derive(Clone)]
pub struct ActivityTracker {
    inner: Arc<Inner>,
}

impl ActivityTracker {
    /// Keep at most `max` records. A cap of zero keeps none, though inserts
    /// are still published to subscribers.
    pub fn new(max: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                records: Mutex::new(VecDeque::with_capacity(max)),
                max,
                events,
            }),
        }
    }

    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::new(config.max_recent_activities)
    }

    pub fn max(&self) -> usize {
        self.inner.max
    }

    /// Append a record, dropping the oldest beyond the cap.
    pub fn record(&self, title: impl Into<String>, kind: ActivityKind) -> ActivityRecord {
        let title = title.into();
        let record = {
            let mut records = self.inner.records.lock();
            // Stamped under the lock so insertion order matches timestamps
            let record = ActivityRecord::new(title, kind);
            records.push_back(record.clone());
            let excess = records.len().saturating_sub(self.inner.max);
            if excess > 0 {
                records.drain(..excess);
                tracing::debug!("Trimmed {} old activities", excess);
            }
            record
        };

        tracing::debug!("Activity added: {} (type: {})", record.title, record.kind);

        // No receivers is fine
        let _ = self.inner.events.send(record.clone());
        record
    }

    /// Retained records, newest first.
    pub fn recent(&self) -> Vec<ActivityRecord> {
        self.inner.records.lock().iter().rev().cloned().collect()
    }

    pub fn clear(&self) {
        self.inner.records.lock().clear();
        tracing::info!("All activities cleared");
    }

    pub fn len(&self) -> usize {
        self.inner.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.lock().is_empty()
    }

    /// Receive every record added after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityRecord> {
        self.inner.events.subscribe()
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::from_config(&MonitoringConfig::default())
    }
}

impl fmt::Debug for ActivityTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityTracker")
            .field("max", &self.inner.max)
            .field("len", &self.len())
            .finish()
    }
}
