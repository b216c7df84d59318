//! Decorated view model (what presentation binds to)

use crate::models::config::{BranchInfo, DropStatus, Milestone};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Release timeline with computed progress
///
/// `progress` is 0 for a zero-duration window; it is never produced by
/// dividing by zero.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionData {
    pub name: String,
    pub start_date: DateTime<Local>,
    pub end_date: DateTime<Local>,

    /// Whole days in the release window, 0 for a zero-duration window
    pub total_days: i64,

    /// Whole days remaining from now, 0 once the window has closed
    pub days_left: i64,

    /// Elapsed share of the window in percent, clamped to 0-100
    pub progress: i64,

    pub milestones: Vec<Milestone>,
    pub branches: Vec<BranchInfo>,
}

/// A decorated drop: recomputed status, display-rendered date
#[derive(Debug, Clone, Serialize)]
pub struct Drop {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub status: DropStatus,
}

/// A feature with its roster lists normalized to always be present
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: String,
    pub dev: Vec<String>,
    pub qa: Vec<String>,
}

/// A decorated team with display defaults applied
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    pub icon_color: String,
    pub border_color: String,
    pub features: Vec<Feature>,
}

/// A decorated birthday: `date` is the rendered next occurrence
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Birthday {
    pub name: String,
    pub date: String,
    pub days_away: i64,
    pub image: String,
}

/// The display-ready model derived from one config load
///
/// Created fresh on every successful load and replaces the previous
/// instance wholesale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedConfig {
    pub version_data: VersionData,
    pub weeks_left: f64,
    pub drops: Vec<Drop>,
    pub teams: Vec<Team>,

    /// At most the two nearest birthdays, ascending by `days_away`
    pub birthdays: Vec<Birthday>,

    /// First birthday within the upcoming window, if any
    pub upcoming_birthday: Option<Birthday>,

    /// Nearest birthday distinct (by position) from the upcoming one
    pub next_birthday: Option<Birthday>,

    pub has_upcoming_birthday: bool,
}
