//! Named timer registry
//!
//! Maps string keys to a single active repeating or one-shot timer each.
//! Starting a key that is already running replaces the old timer, so a key
//! can never accumulate two concurrently active timers; `stop_all` makes
//! teardown trivially leak-free.

use dashmap::DashMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Registry of named timers backed by tokio tasks
///
/// Stopping a key aborts its task before the next firing; a callback that is
/// already executing runs to completion. Callbacks may themselves start or
/// stop keys on the same scheduler (the registry is sharded, not globally
/// locked).
#[derive(Default)]
pub struct NamedScheduler {
    handles: DashMap<String, JoinHandle<()>>,
}

impl NamedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating timer under `key`, replacing any active timer there
    ///
    /// The first firing happens one full `period` after registration, never
    /// immediately.
    pub fn start_interval<F>(&self, key: impl Into<String>, callback: F, period: Duration)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = key.into();
        debug!(key = %key, ?period, "Starting interval timer");

        let handle = tokio::spawn(async move {
            let first = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(first, period);
            loop {
                ticker.tick().await;
                callback();
            }
        });

        self.register(key, handle);
    }

    /// Start a one-shot timer under `key`, replacing any active timer there
    pub fn start_timeout<F>(&self, key: impl Into<String>, callback: F, delay: Duration)
    where
        F: FnOnce() + Send + 'static,
    {
        let key = key.into();
        debug!(key = %key, ?delay, "Starting one-shot timer");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        self.register(key, handle);
    }

    fn register(&self, key: String, handle: JoinHandle<()>) {
        if let Some(previous) = self.handles.insert(key, handle) {
            previous.abort();
        }
    }

    /// Cancel and remove the timer under `key`; no-op when absent
    pub fn stop(&self, key: &str) {
        if let Some((_, handle)) = self.handles.remove(key) {
            handle.abort();
            debug!(key = %key, "Stopped timer");
        }
    }

    /// Stop every registered timer
    pub fn stop_all(&self) {
        self.handles.retain(|key, handle| {
            handle.abort();
            debug!(key = %key, "Stopped timer");
            false
        });
    }

    /// True while `key` has a timer that can still fire
    ///
    /// A one-shot that has already fired reports `false`.
    pub fn is_running(&self, key: &str) -> bool {
        self.handles
            .get(key)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for NamedScheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}
