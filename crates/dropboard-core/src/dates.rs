//! Day-granularity date arithmetic
//!
//! Pure helpers shared by the config transformer and the refresh cadences:
//! start-of-day truncation, day-count differences, flexible parsing of the
//! date spellings that show up in config documents, and the two fixed output
//! formats used by the presentation layer.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

/// A month/day pair without a year (an annual date such as a birthday)
///
/// `month` is 1-12, `day` is 1-31. Calendar validity (Feb 30, Jun 31) is
/// checked when the pair is resolved to a concrete year in
/// [`next_occurrence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));

static DAY_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})[-/](\d{2})$").expect("valid regex"));

static DROP_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{2,4})$").expect("valid regex"));

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)(st|nd|rd|th)").expect("valid regex"));

/// Truncate an instant to its local calendar day
pub fn start_of_day(instant: DateTime<Local>) -> NaiveDate {
    instant.date_naive()
}

/// Whole days from `a` to `b` (negative when `b` precedes `a`)
///
/// Both sides are calendar days, so two instants on the same day are 0 days
/// apart regardless of time-of-day.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Parse an annual date from any of the accepted spellings
///
/// Tried in order, first success wins:
/// 1. `YYYY-MM-DD` (year ignored, month/day taken as written)
/// 2. `DD/MM` or `DD-MM` — two-digit numeric is always day-first
/// 3. ordinal suffixes stripped (`1st`, `22nd`, ...) then month-name formats
pub fn parse_flexible_date(input: &str) -> Option<MonthDay> {
    let trimmed = input.trim();

    parse_iso_month_day(trimmed)
        .or_else(|| parse_numeric_day_month(trimmed))
        .or_else(|| parse_calendar_month_day(trimmed))
}

/// Tier 1: exact `YYYY-MM-DD`
fn parse_iso_month_day(input: &str) -> Option<MonthDay> {
    let caps = ISO_DATE.captures(input)?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    in_month_day_range(month, day)
}

/// Tier 2: `DD/MM` or `DD-MM`, day first
fn parse_numeric_day_month(input: &str) -> Option<MonthDay> {
    let caps = DAY_MONTH.captures(input)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    in_month_day_range(month, day)
}

/// Tier 3: strip ordinal suffixes and try month-name spellings
fn parse_calendar_month_day(input: &str) -> Option<MonthDay> {
    let cleaned = ORDINAL_SUFFIX.replace_all(input, "$1");
    let cleaned = cleaned.trim();

    // Year-carrying spellings first
    const WITH_YEAR: [&str; 6] = [
        "%B %d, %Y", "%B %d %Y", "%b %d, %Y", "%b %d %Y", "%d %B %Y", "%d %b %Y",
    ];
    for fmt in WITH_YEAR {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(MonthDay {
                month: date.month(),
                day: date.day(),
            });
        }
    }

    // Yearless spellings: pin to a leap year so Feb 29 survives parsing
    const YEARLESS: [&str; 4] = ["%B %d %Y", "%b %d %Y", "%d %B %Y", "%d %b %Y"];
    let pinned = format!("{cleaned} 2000");
    for fmt in YEARLESS {
        if let Ok(date) = NaiveDate::parse_from_str(&pinned, fmt) {
            return Some(MonthDay {
                month: date.month(),
                day: date.day(),
            });
        }
    }

    None
}

fn in_month_day_range(month: u32, day: u32) -> Option<MonthDay> {
    if (1..=12).contains(&month) && (1..=31).contains(&day) {
        Some(MonthDay { month, day })
    } else {
        None
    }
}

/// Parse a drop date: `DD.MM.YY` / `DD.MM.YYYY` first, calendar fallback
///
/// Two-digit years are interpreted as 2000+YY.
pub fn parse_drop_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();

    if let Some(caps) = DROP_DATE.captures(trimmed) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let raw_year: i32 = caps[3].parse().ok()?;
        let year = if raw_year < 100 { 2000 + raw_year } else { raw_year };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    parse_calendar_date(trimmed)
}

/// General calendar parse of a full date (year required)
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Local).date_naive());
    }

    const FORMATS: [&str; 6] = [
        "%B %d, %Y", "%B %d %Y", "%b %d, %Y", "%b %d %Y", "%d %B %Y", "%d %b %Y",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

/// Next occurrence of an annual date on or after `today`
///
/// Builds the date in `today`'s year; if that day has already passed, the
/// same month/day next year. A pair that is not a real calendar day in the
/// chosen year (Feb 29 outside leap years) yields `None`.
pub fn next_occurrence(month_day: MonthDay, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month_day.month, month_day.day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month_day.month, month_day.day)
    }
}

/// Render an annual date for birthday display, e.g. `JANUARY 15`
pub fn format_annual_date(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B").to_string().to_uppercase(), date.day())
}

/// Render a drop date for roadmap display, e.g. `15 Jan`
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// Milliseconds from `now` until the next local midnight
pub fn ms_until_midnight(now: DateTime<Local>) -> u64 {
    let next_day = now.date_naive() + chrono::Days::new(1);
    let midnight = next_day.and_time(chrono::NaiveTime::MIN);

    // On a DST transition the local midnight can be ambiguous or skipped;
    // take the earliest valid instant.
    let midnight = match Local.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(instant) => instant,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => now + chrono::Duration::days(1),
    };

    (midnight - now).num_milliseconds().max(0) as u64
}
