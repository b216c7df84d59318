//! Raw config document models (as received, before decoration)

use serde::{Deserialize, Serialize};

/// A labeled point on the release timeline; display-only, nothing computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub date: String,
}

/// Static descriptive record for a release branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub title: String,
    pub branch: String,
    pub products: String,
}

/// A feature as it appears in the document: a bare title or a full record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFeature {
    Title(String),
    Full {
        title: String,
        #[serde(default)]
        dev: Option<Vec<String>>,
        #[serde(default)]
        qa: Option<Vec<String>>,
    },
}

/// Release timeline data as received; dates are still strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVersionData {
    pub name: String,
    pub start_date: String,
    pub end_date: String,

    #[serde(default)]
    pub total_days: i64,

    #[serde(default)]
    pub days_left: i64,

    #[serde(default)]
    pub progress: i64,

    #[serde(default)]
    pub milestones: Vec<Milestone>,

    #[serde(default)]
    pub branches: Vec<BranchInfo>,
}

/// Roadmap status bucket for a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropStatus {
    Completed,
    Current,
    #[default]
    Upcoming,
}

/// A release drop as received
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDrop {
    pub id: i64,
    pub name: String,
    pub date: String,

    /// Recomputed during decoration; an unknown value here is a hard
    /// validation failure, not defaulted
    #[serde(default)]
    pub status: DropStatus,
}

/// A team roster as received; display fields are defaulted at decoration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub icon_color: Option<String>,

    #[serde(default)]
    pub border_color: Option<String>,

    #[serde(default)]
    pub features: Vec<RawFeature>,
}

/// A team-member birthday as received
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBirthday {
    pub name: String,
    pub date: String,

    #[serde(default)]
    pub days_away: i64,

    /// Opaque markup passed through to presentation unmodified
    pub image: String,
}

/// The validated config document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub version_data: RawVersionData,
    pub drops: Vec<RawDrop>,
    pub teams: Vec<RawTeam>,
    pub birthdays: Vec<RawBirthday>,
}
