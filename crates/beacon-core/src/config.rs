use crate::errors::ConfigError;
use crate::model::{MetricName, Page};
use crate::quality::QualityWeights;
use crate::recommendations::{RecommendationOverride, RecommendationTable};
use crate::thresholds::{Threshold, ThresholdTable};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_PATH: &str = "beacon.yaml";
pub const DEFAULT_HISTORY_CAP: usize = 90;

/// Raw `beacon.yaml` contents. Every section is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub thresholds: BTreeMap<MetricName, Threshold>,
    #[serde(default)]
    pub recommendations: BTreeMap<MetricName, RecommendationOverride>,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub experiments: ExperimentConfig,
    #[serde(default)]
    pub trends: TrendConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            pages: Vec::new(),
            thresholds: BTreeMap::new(),
            recommendations: BTreeMap::new(),
            history: HistoryConfig::default(),
            output_dir: None,
            experiments: ExperimentConfig::default(),
            trends: TrendConfig::default(),
            quality: QualityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    #[serde(default = "default_history_cap")]
    pub cap: usize,
    /// Relative paths resolve against the output directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_HISTORY_CAP,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Required confidence (90, 95 or 99) before declaring a winner or loser.
    #[serde(default = "default_confidence_level")]
    pub confidence_level: u8,
    #[serde(default = "default_min_samples")]
    pub min_samples_per_variant: u64,
}

fn default_confidence_level() -> u8 {
    95
}

fn default_min_samples() -> u64 {
    100
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
            min_samples_per_variant: default_min_samples(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendConfig {
    /// Relative change (percent) inside which a series counts as stable.
    #[serde(default = "default_stable_band")]
    pub stable_band_pct: f64,
}

fn default_stable_band() -> f64 {
    2.0
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            stable_band_pct: default_stable_band(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityConfig {
    #[serde(default)]
    pub weights: QualityWeights,
    #[serde(default)]
    pub min_score: Option<f64>,
}

/// Analytics backend settings read from the environment.
///
/// A real GA4 client is not part of Beacon; when `enabled` is set the CLI
/// logs a warning and keeps using simulated data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsSettings {
    pub property_id: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub enabled: bool,
}

/// Validated configuration used by every command.
#[derive(Debug, Clone)]
pub struct BeaconConfig {
    pub pages: Vec<Page>,
    pub thresholds: ThresholdTable,
    pub recommendations: RecommendationTable,
    pub history: HistoryConfig,
    pub output_dir: PathBuf,
    pub experiments: ExperimentConfig,
    pub trends: TrendConfig,
    pub quality: QualityConfig,
    /// sha256 of the config file bytes, when loaded from disk.
    pub digest: Option<String>,
    pub source_path: Option<PathBuf>,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            thresholds: ThresholdTable::default(),
            recommendations: RecommendationTable::default(),
            history: HistoryConfig::default(),
            output_dir: PathBuf::from("reports"),
            experiments: ExperimentConfig::default(),
            trends: TrendConfig::default(),
            quality: QualityConfig::default(),
            digest: None,
            source_path: None,
        }
    }
}

pub fn default_pages() -> Vec<Page> {
    vec![
        Page::new("/", "Home"),
        Page::new("/features", "Features"),
        Page::new("/pricing", "Pricing"),
        Page::new("/signup", "Sign up"),
        Page::new("/blog", "Blog"),
    ]
}

impl BeaconConfig {
    pub fn from_file(file: ConfigFile, digest: Option<String>) -> Result<Self, ConfigError> {
        if file.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: SUPPORTED_CONFIG_VERSION,
            });
        }
        let thresholds = ThresholdTable::with_overrides(&file.thresholds)?;
        let recommendations = RecommendationTable::with_overrides(&file.recommendations)?;
        file.quality.weights.validate()?;
        if let Some(min) = file.quality.min_score {
            validate_min_score(min)?;
        }
        if file.history.cap == 0 {
            return Err(ConfigError::Invalid("history.cap must be > 0".into()));
        }
        if !matches!(file.experiments.confidence_level, 90 | 95 | 99) {
            return Err(ConfigError::Invalid(format!(
                "experiments.confidence_level must be 90, 95 or 99 (got {})",
                file.experiments.confidence_level
            )));
        }
        if !(file.trends.stable_band_pct.is_finite() && file.trends.stable_band_pct >= 0.0) {
            return Err(ConfigError::Invalid(
                "trends.stable_band_pct must be a non-negative number".into(),
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for page in &file.pages {
            if !page.path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "page path must start with '/': {}",
                    page.path
                )));
            }
            if !seen.insert(page.path.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate page path: {}",
                    page.path
                )));
            }
        }

        Ok(Self {
            pages: if file.pages.is_empty() {
                default_pages()
            } else {
                file.pages
            },
            thresholds,
            recommendations,
            history: file.history,
            output_dir: file.output_dir.unwrap_or_else(|| PathBuf::from("reports")),
            experiments: file.experiments,
            trends: file.trends,
            quality: file.quality,
            digest,
            source_path: None,
        })
    }

    /// Location of the persisted trend history.
    pub fn history_path(&self) -> PathBuf {
        match &self.history.path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.output_dir.join(p),
            None => self.output_dir.join("history.json"),
        }
    }
}

/// A quality gate minimum must be a finite score in `0..=100`.
pub fn validate_min_score(min: f64) -> Result<(), ConfigError> {
    if min.is_finite() && (0.0..=100.0).contains(&min) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "quality.min_score must be between 0 and 100 (got {min})"
        )))
    }
}

pub fn load_config(path: &Path) -> Result<BeaconConfig, ConfigError> {
    let raw = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let file: ConfigFile = serde_yaml::from_slice(&raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let digest = hex::encode(Sha256::digest(&raw));
    let mut cfg = BeaconConfig::from_file(file, Some(digest))?;
    cfg.source_path = Some(path.to_path_buf());
    tracing::debug!(path = %path.display(), pages = cfg.pages.len(), "loaded config");
    Ok(cfg)
}

/// Load `path` when given (missing file is an error), otherwise the default
/// `beacon.yaml` when present, otherwise built-in defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<BeaconConfig, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_config(default)
            } else {
                Ok(BeaconConfig::default())
            }
        }
    }
}
