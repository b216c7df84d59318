//! Config document source with retry and a memoized cache
//!
//! Loads the raw document from an HTTP(S) URL or a local file, validates it,
//! and caches the validated result until explicitly invalidated. Transport
//! failures are retried a fixed number of times with a fixed delay; a
//! rejected document is surfaced immediately. Concurrent callers share one
//! in-flight load, so at most one request is ever outstanding.

use crate::constants::{FETCH_RETRY_COUNT, FETCH_RETRY_DELAY};
use crate::error::CoreError;
use crate::models::AppConfig;
use crate::schema;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Where the config document lives and how stubbornly to fetch it
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// HTTP(S) URL or local filesystem path
    pub location: String,

    /// Retries after the first failed attempt
    pub retry_count: u32,

    /// Delay between attempts
    pub retry_delay: Duration,
}

impl SourceConfig {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            retry_count: FETCH_RETRY_COUNT,
            retry_delay: FETCH_RETRY_DELAY,
        }
    }

    pub fn with_retries(mut self, retry_count: u32, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self
    }
}

/// Cached, validating loader for the config document
pub struct ConfigSource {
    config: SourceConfig,
    client: reqwest::Client,
    cache: Mutex<Option<Arc<AppConfig>>>,
}

impl ConfigSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            cache: Mutex::new(None),
        }
    }

    /// Get the validated config, loading it on the first call
    ///
    /// Callers arriving while a load is in flight wait for that load and
    /// share its outcome rather than triggering their own.
    pub async fn get_config(&self) -> Result<Arc<AppConfig>, CoreError> {
        let mut cache = self.cache.lock().await;
        if let Some(config) = cache.as_ref() {
            return Ok(config.clone());
        }

        let config = Arc::new(self.load().await?);
        *cache = Some(config.clone());
        Ok(config)
    }

    /// Discard the cached document so the next call refetches
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
        debug!("Config cache invalidated");
    }

    /// Load and validate with the retry policy applied
    ///
    /// Only transport failures are retried; a document that fails validation
    /// will fail validation again, so it surfaces on the first attempt.
    async fn load(&self) -> Result<AppConfig, CoreError> {
        let mut last_error = None;

        for attempt in 0..=self.config.retry_count {
            if attempt > 0 {
                debug!(attempt, "Retrying config fetch after delay");
                sleep(self.config.retry_delay).await;
            }

            match self.fetch_raw(attempt).await {
                Ok(raw) => return schema::validate_str(&raw),
                Err(e) if e.is_retryable() => {
                    warn!(attempt, error = %e, "Config fetch attempt failed");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::FileNotFound {
            path: Path::new(&self.config.location).to_path_buf(),
        }))
    }

    /// One fetch attempt: HTTP for URLs, the filesystem otherwise
    async fn fetch_raw(&self, attempt: u32) -> Result<String, CoreError> {
        let location = &self.config.location;

        if location.starts_with("http://") || location.starts_with("https://") {
            let response = self
                .client
                .get(location)
                .header("Cache-Control", "no-cache")
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|e| CoreError::Fetch {
                    url: location.clone(),
                    attempts: attempt + 1,
                    source: e,
                })?;

            return response.text().await.map_err(|e| CoreError::Fetch {
                url: location.clone(),
                attempts: attempt + 1,
                source: e,
            });
        }

        let path = Path::new(location);
        tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CoreError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })
    }
}
