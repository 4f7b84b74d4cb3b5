//! Activity log with observer callbacks
//!
//! [`LogBroadcaster`] records orchestration lifecycle events in creation
//! order and pushes each new entry to registered callbacks. It can be
//! shared across threads behind an `Arc`; observers either subscribe with
//! [`LogBroadcaster::register_callback`] or poll [`LogBroadcaster::get_logs`].

use chrono::{DateTime, Local};
use serde::Serialize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Callback invoked for every appended entry
pub type LogCallback = Arc<dyn Fn(&LogEntry) + Send + Sync>;

/// A single immutable activity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    agent: String,
    action: String,
    details: Option<String>,
    timestamp: DateTime<Local>,
}

impl LogEntry {
    /// Label of the agent (or coordinator) that produced the event
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// What happened
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Optional free-form detail
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Wall-clock creation time
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Creation time formatted as `HH:MM:SS`
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Handle returned by [`LogBroadcaster::register_callback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct State {
    entries: Vec<LogEntry>,
    subscribers: Vec<(SubscriptionId, LogCallback)>,
    next_id: u64,
}

/// Append-only activity log that fans entries out to subscribers
///
/// Appending and snapshotting the subscriber list happen in one short
/// critical section. Callbacks run outside of it, serialized by a separate
/// delivery lock so every subscriber sees entries in append order. A slow
/// subscriber therefore delays later `add_log` calls but never blocks
/// [`get_logs`](Self::get_logs). Callbacks must not call `add_log` on the
/// broadcaster that is notifying them.
#[derive(Default)]
pub struct LogBroadcaster {
    state: Mutex<State>,
    delivery: Mutex<()>,
}

impl LogBroadcaster {
    /// Create an empty broadcaster
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry and notify every subscriber in registration order
    ///
    /// A panicking subscriber is reported and skipped; the entry stays in
    /// the log and the remaining subscribers are still notified.
    pub fn add_log(
        &self,
        agent: impl Into<String>,
        action: impl Into<String>,
        details: Option<String>,
    ) -> LogEntry {
        let entry = LogEntry {
            agent: agent.into(),
            action: action.into(),
            details,
            timestamp: Local::now(),
        };

        info!(
            agent = %entry.agent,
            action = %entry.action,
            details = entry.details.as_deref().unwrap_or(""),
            "activity"
        );

        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);

        let subscribers: Vec<(SubscriptionId, LogCallback)> = {
            let mut state = self.state();
            state.entries.push(entry.clone());
            state.subscribers.clone()
        };

        for (id, callback) in subscribers {
            if catch_unwind(AssertUnwindSafe(|| callback(&entry))).is_err() {
                warn!(subscription = id.0, "Log subscriber panicked; entry kept");
            }
        }

        entry
    }

    /// Register a subscriber; the same callback may be registered twice
    pub fn register_callback<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LogEntry) + Send + Sync + 'static,
    {
        let mut state = self.state();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscriber; returns `false` if it was not registered
    pub fn unregister_callback(&self, id: SubscriptionId) -> bool {
        let mut state = self.state();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sub, _)| *sub != id);
        state.subscribers.len() != before
    }

    /// Snapshot of all entries in append order
    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.state().entries.clone()
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    /// Whether nothing has been logged yet
    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LogBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("LogBroadcaster")
            .field("entries", &state.entries.len())
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}
