//! Data models for the dropboard config document
//!
//! `config` holds the raw shapes as validated from JSON, `view` holds the
//! decorated view model handed to presentation.

pub mod config;
pub mod view;

pub use config::{
    AppConfig, BranchInfo, DropStatus, Milestone, RawBirthday, RawDrop, RawFeature, RawTeam,
    RawVersionData,
};
pub use view::{Birthday, Drop, Feature, ProcessedConfig, Team, VersionData};
