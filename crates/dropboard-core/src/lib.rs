//! dropboard-core - Core library for dropboard
//!
//! Turns a release-dashboard config document into a decorated view model and
//! drives the periodic re-evaluation cadences: config validation, date
//! arithmetic, the transformer, a named timer scheduler, the cached config
//! source, and the orchestrator that composes them.

pub mod constants;
pub mod dates;
pub mod error;
pub mod event;
pub mod models;
pub mod orchestrator;
pub mod scheduler;
pub mod schema;
pub mod source;
pub mod transform;

pub use error::CoreError;
pub use event::{DashboardEvent, EventBus};
pub use models::{AppConfig, ProcessedConfig};
pub use orchestrator::{DashboardConfig, DashboardOrchestrator, ViewportClass};
pub use scheduler::NamedScheduler;
pub use source::{ConfigSource, SourceConfig};
