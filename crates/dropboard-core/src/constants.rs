//! Fixed cadences and default decoration values

use std::time::Duration;

/// One calendar day in milliseconds
pub const DAY_IN_MS: u64 = 1000 * 60 * 60 * 24;

/// Carousel rotation period on desktop-class viewports
pub const SLIDE_INTERVAL_DESKTOP: Duration = Duration::from_secs(10);

/// Carousel rotation period on handset-class viewports
pub const SLIDE_INTERVAL_MOBILE: Duration = Duration::from_secs(15);

/// Poll period for the reminder window check
pub const REMINDER_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// A birthday counts as "upcoming" within this many days
pub const UPCOMING_BIRTHDAY_WINDOW_DAYS: i64 = 7;

/// Decoration defaults for teams missing display fields
pub const DEFAULT_TEAM_NAME: &str = "Unnamed Team";
pub const DEFAULT_TEAM_ICON_COLOR: &str = "#38bdf8";
pub const DEFAULT_TEAM_BORDER_COLOR: &str = "#334155";

/// Config fetch retry policy
pub const FETCH_RETRY_COUNT: u32 = 2;
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Reminder window defaults: Mon-Fri, 17:00-17:30 local time
pub const REMINDER_WEEKDAYS: [chrono::Weekday; 5] = [
    chrono::Weekday::Mon,
    chrono::Weekday::Tue,
    chrono::Weekday::Wed,
    chrono::Weekday::Thu,
    chrono::Weekday::Fri,
];
pub const REMINDER_START_MINUTES: u32 = 17 * 60;
pub const REMINDER_END_MINUTES: u32 = 17 * 60 + 30;
