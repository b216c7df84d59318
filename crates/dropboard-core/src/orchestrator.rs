//! Dashboard orchestration
//!
//! Composes the config source, the transformer, and the named scheduler on
//! the dashboard's cadences: carousel rotation, the reminder-window poll,
//! and the midnight cache refresh. Holds the latest view model; a failed
//! reload records the error and keeps the previous view on screen instead of
//! blanking it.

use crate::constants::{REMINDER_CHECK_INTERVAL, SLIDE_INTERVAL_DESKTOP, SLIDE_INTERVAL_MOBILE};
use crate::dates;
use crate::error::CoreError;
use crate::event::{DashboardEvent, EventBus};
use crate::models::ProcessedConfig;
use crate::scheduler::NamedScheduler;
use crate::source::{ConfigSource, SourceConfig};
use crate::transform;
use chrono::{DateTime, Datelike, Local, Timelike};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Scheduler keys owned by the orchestrator
pub const TIMER_ROTATE: &str = "carousel-rotation";
pub const TIMER_REMINDER: &str = "reminder-check";
pub const TIMER_REFRESH_TIMEOUT: &str = "refresh-timeout";
pub const TIMER_REFRESH_INTERVAL: &str = "refresh-interval";

/// Viewport class deciding the carousel rotation period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportClass {
    #[default]
    Desktop,
    Mobile,
}

impl ViewportClass {
    pub fn slide_interval(self) -> Duration {
        match self {
            ViewportClass::Desktop => SLIDE_INTERVAL_DESKTOP,
            ViewportClass::Mobile => SLIDE_INTERVAL_MOBILE,
        }
    }
}

/// A weekly time window during which the reminder banner is shown
#[derive(Debug, Clone)]
pub struct ReminderWindow {
    pub weekdays: Vec<chrono::Weekday>,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl Default for ReminderWindow {
    fn default() -> Self {
        Self {
            weekdays: crate::constants::REMINDER_WEEKDAYS.to_vec(),
            start_minutes: crate::constants::REMINDER_START_MINUTES,
            end_minutes: crate::constants::REMINDER_END_MINUTES,
        }
    }
}

impl ReminderWindow {
    /// True when `now` falls inside the window
    pub fn contains(&self, now: DateTime<Local>) -> bool {
        let minutes = now.hour() * 60 + now.minute();
        self.weekdays.contains(&now.weekday())
            && minutes >= self.start_minutes
            && minutes < self.end_minutes
    }
}

/// Everything the orchestrator needs to run
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub viewport: ViewportClass,
    pub reminder: ReminderWindow,
}

impl DashboardConfig {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            source: SourceConfig::new(location),
            viewport: ViewportClass::Desktop,
            reminder: ReminderWindow::default(),
        }
    }
}

#[derive(Default)]
struct DashboardState {
    view: Option<ProcessedConfig>,
    active_slide: usize,
    show_reminder: bool,
    last_error: Option<String>,
}

struct Inner {
    source: ConfigSource,
    scheduler: NamedScheduler,
    event_bus: EventBus,
    state: RwLock<DashboardState>,
    viewport: RwLock<ViewportClass>,
    reminder: ReminderWindow,
}

/// Drives the dashboard: load at start, rotate slides, poll the reminder
/// window, refresh the config cache at midnight
///
/// Cheap to clone; clones share the same state, scheduler, and bus.
#[derive(Clone)]
pub struct DashboardOrchestrator {
    inner: Arc<Inner>,
}

impl DashboardOrchestrator {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                source: ConfigSource::new(config.source),
                scheduler: NamedScheduler::new(),
                event_bus: EventBus::default_capacity(),
                state: RwLock::new(DashboardState::default()),
                viewport: RwLock::new(config.viewport),
                reminder: config.reminder,
            }),
        }
    }

    /// Load the config once and start every cadence
    pub async fn start(&self) {
        self.reload().await;
        self.start_rotation();
        self.start_reminder_poll();
        self.start_midnight_refresh();
    }

    /// Stop every timer; call exactly once at teardown
    pub fn shutdown(&self) {
        info!("Shutting down dashboard timers");
        self.inner.scheduler.stop_all();
    }

    /// Subscribe to dashboard events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.event_bus.subscribe()
    }

    /// Latest successfully derived view model, if any
    pub fn view(&self) -> Option<ProcessedConfig> {
        self.inner.state.read().view.clone()
    }

    pub fn active_slide(&self) -> usize {
        self.inner.state.read().active_slide
    }

    pub fn reminder_visible(&self) -> bool {
        self.inner.state.read().show_reminder
    }

    /// Message from the most recent failed load, cleared on success
    pub fn last_error(&self) -> Option<String> {
        self.inner.state.read().last_error.clone()
    }

    pub fn is_timer_running(&self, key: &str) -> bool {
        self.inner.scheduler.is_running(key)
    }

    /// Fetch (or reuse the cached document) and rebuild the view model
    ///
    /// Fetch and validation failures, and transform defects, all land in
    /// `last_error` + a `LoadFailed` event; the previous view survives and
    /// the timers keep running.
    pub async fn reload(&self) {
        match self.inner.source.get_config().await {
            Ok(config) => match transform::process_config(&config, Local::now()) {
                Ok(view) => self.apply_view(view),
                Err(e) => self.record_failure("Failed to process configuration data", &e),
            },
            Err(e) => self.record_failure("Failed to load configuration", &e),
        }
    }

    /// Invalidate the cached document and reload (the midnight path)
    pub async fn refresh_now(&self) {
        self.inner.source.invalidate().await;
        self.reload().await;
    }

    /// Jump the carousel to `index` and restart the rotation timer
    pub fn select_slide(&self, index: usize) {
        {
            let mut state = self.inner.state.write();
            state.active_slide = index;
        }
        self.restart_rotation();
        self.inner.event_bus.publish(DashboardEvent::SlideChanged(index));
    }

    /// Change the viewport class, restarting rotation with the new period
    pub fn set_viewport(&self, viewport: ViewportClass) {
        *self.inner.viewport.write() = viewport;
        debug!(?viewport, "Viewport changed");
        self.restart_rotation();
    }

    fn apply_view(&self, view: ProcessedConfig) {
        {
            let mut state = self.inner.state.write();
            state.view = Some(view);
            state.active_slide = 0;
            state.last_error = None;
        }
        self.restart_rotation();
        self.inner.event_bus.publish(DashboardEvent::ViewUpdated);
        info!("View model updated");
    }

    fn record_failure(&self, context: &str, error: &CoreError) {
        warn!(error = %error, context, "Config load failed; keeping previous view");
        let message = format!("{context}: {error}");
        self.inner.state.write().last_error = Some(message.clone());
        self.inner.event_bus.publish(DashboardEvent::LoadFailed(message));
    }

    fn start_rotation(&self) {
        let this = self.clone();
        let period = self.inner.viewport.read().slide_interval();
        self.inner
            .scheduler
            .start_interval(TIMER_ROTATE, move || this.advance_slide(), period);
    }

    fn restart_rotation(&self) {
        // Stop+start as a pair so a period change never leaves the old
        // interval running
        self.inner.scheduler.stop(TIMER_ROTATE);
        self.start_rotation();
    }

    fn advance_slide(&self) {
        let next = {
            let mut state = self.inner.state.write();
            let teams = state.view.as_ref().map(|view| view.teams.len()).unwrap_or(0);
            if teams == 0 {
                return;
            }
            state.active_slide = (state.active_slide + 1) % teams;
            state.active_slide
        };
        self.inner.event_bus.publish(DashboardEvent::SlideChanged(next));
    }

    fn start_reminder_poll(&self) {
        self.update_reminder();
        let this = self.clone();
        self.inner.scheduler.start_interval(
            TIMER_REMINDER,
            move || this.update_reminder(),
            REMINDER_CHECK_INTERVAL,
        );
    }

    fn update_reminder(&self) {
        let visible = self.inner.reminder.contains(Local::now());
        let changed = {
            let mut state = self.inner.state.write();
            let changed = state.show_reminder != visible;
            state.show_reminder = visible;
            changed
        };
        if changed {
            self.inner
                .event_bus
                .publish(DashboardEvent::ReminderChanged(visible));
        }
    }

    fn start_midnight_refresh(&self) {
        let delay = Duration::from_millis(dates::ms_until_midnight(Local::now()));
        let this = self.clone();
        self.inner.scheduler.start_timeout(
            TIMER_REFRESH_TIMEOUT,
            move || {
                let refresh = this.clone();
                tokio::spawn(async move { refresh.refresh_now().await });

                let steady = this.clone();
                this.inner.scheduler.start_interval(
                    TIMER_REFRESH_INTERVAL,
                    move || {
                        let refresh = steady.clone();
                        tokio::spawn(async move { refresh.refresh_now().await });
                    },
                    Duration::from_millis(crate::constants::DAY_IN_MS),
                );
            },
            delay,
        );
    }
}
