//! Engine configuration.
//!
//! Settings come from either:
//! - A host settings file, by embedding [`EngineConfig`] in any serde format
//! - The environment: `RASTERFX_WORKERS` sets the worker count
//!
//! Unset fields fall back to [`EngineConfig::default`].

use std::num::NonZeroUsize;
use std::thread;

use serde::Deserialize;
use tracing::debug;

use crate::error::{RasterError, RasterResult};

/// Environment variable holding the worker count.
pub const WORKERS_ENV: &str = "RASTERFX_WORKERS";

/// Worker pool settings for a [`FilterEngine`](crate::engine::FilterEngine).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of worker threads. `None` uses the hardware concurrency.
    pub workers: Option<usize>,
    /// Prefix for worker thread names; threads are named `{prefix}-{i}`.
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: None,
            thread_name: "rasterfx-worker".to_string(),
        }
    }
}

impl EngineConfig {
    /// Config with a fixed worker count.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: Some(workers),
            ..Self::default()
        }
    }

    /// Load from the process environment.
    ///
    /// # Errors
    /// [`RasterError::Config`] if `RASTERFX_WORKERS` is set but is not a
    /// positive integer.
    pub fn from_env() -> RasterResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> RasterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(WORKERS_ENV) {
            let workers = raw.trim().parse::<usize>().map_err(|e| {
                RasterError::Config(format!("{WORKERS_ENV}={raw:?} is not a worker count: {e}"))
            })?;
            debug!(workers, "worker count from environment");
            config.workers = Some(workers);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the settings without building anything.
    ///
    /// # Errors
    /// [`RasterError::Config`] for an explicit zero worker count.
    pub fn validate(&self) -> RasterResult<()> {
        if self.workers == Some(0) {
            return Err(RasterError::Config("worker count must be at least 1".into()));
        }
        Ok(())
    }

    /// Worker count to actually use: the configured value, or the hardware
    /// concurrency (at least 1) when unset.
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_hardware_concurrency() {
        let config = EngineConfig::default();
        assert_eq!(config.workers, None);
        assert!(config.resolved_workers() >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{"workers": 6}"#).unwrap();
        assert_eq!(config.workers, Some(6));
        assert_eq!(config.thread_name, "rasterfx-worker");
        assert_eq!(config.resolved_workers(), 6);
    }

    #[test]
    fn test_deserialize_empty_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_deserialize_thread_name() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"thread_name": "editor-filter"}"#).unwrap();
        assert_eq!(config.thread_name, "editor-filter");
        assert_eq!(config.workers, None);
    }

    #[test]
    fn test_lookup_reads_workers() {
        let config =
            EngineConfig::from_lookup(|k| (k == WORKERS_ENV).then(|| " 3 ".to_string())).unwrap();
        assert_eq!(config.workers, Some(3));
    }

    #[test]
    fn test_lookup_unset_is_default() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_lookup_rejects_bad_values() {
        for raw in ["zero", "-2", "0", ""] {
            let result = EngineConfig::from_lookup(|_| Some(raw.to_string()));
            assert!(matches!(result, Err(RasterError::Config(_))), "{raw:?}");
        }
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(EngineConfig::with_workers(0).validate().is_err());
        assert!(EngineConfig::with_workers(1).validate().is_ok());
    }
}
