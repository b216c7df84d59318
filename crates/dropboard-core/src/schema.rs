//! Config document validation
//!
//! Validate-or-reject: an untyped JSON value either becomes a fully typed,
//! defaulted [`AppConfig`] or the whole document is rejected with the
//! violated field named. Default policy for optional fields lives in the
//! serde attributes on the raw models.

use crate::error::CoreError;
use crate::models::AppConfig;
use tracing::debug;

/// Validate a raw JSON value into a typed config document
///
/// Any missing required field, wrong primitive type, or unknown status
/// value rejects the document as a whole. Per-record data-quality issues
/// (an unparseable date string in an otherwise valid record) are not the
/// validator's concern; the transformer degrades gracefully on those.
pub fn validate(raw: serde_json::Value) -> Result<AppConfig, CoreError> {
    let config: AppConfig =
        serde_json::from_value(raw).map_err(|e| CoreError::Validation {
            message: e.to_string(),
            source: Some(e),
        })?;

    debug!(
        drops = config.drops.len(),
        teams = config.teams.len(),
        birthdays = config.birthdays.len(),
        "Config document validated"
    );
    Ok(config)
}

/// Validate a raw JSON string (fetch payloads, local files)
pub fn validate_str(raw: &str) -> Result<AppConfig, CoreError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| CoreError::Validation {
            message: format!("not a JSON document: {e}"),
            source: Some(e),
        })?;
    validate(value)
}
