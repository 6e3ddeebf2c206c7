//! Error types for configuration loading and validation.

use crate::model::{MetricName, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating `beacon.yaml`.
///
/// The CLI maps every variant to the configuration exit code.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid threshold for {metric}: good={good}, poor={poor} (need finite good < poor)")]
    InvalidThreshold {
        metric: MetricName,
        good: f64,
        poor: f64,
    },

    #[error("no threshold defined for tracked metric {metric}")]
    MissingThreshold { metric: MetricName },

    #[error("no recommendations defined for {metric} at severity {severity}")]
    MissingRecommendations {
        metric: MetricName,
        severity: Severity,
    },

    #[error("quality weights must sum to 1.0 (got {sum:.4})")]
    InvalidWeights { sum: f64 },

    #[error("{0}")]
    Invalid(String),
}
