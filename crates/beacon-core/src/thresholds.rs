use crate::errors::ConfigError;
use crate::model::{MetricName, Rating};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Boundary pair for a metric. Values at or below `good` are good, values
/// above `poor` are poor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Threshold {
    pub good: f64,
    pub poor: f64,
}

impl Threshold {
    pub const fn new(good: f64, poor: f64) -> Self {
        Self { good, poor }
    }

    pub fn is_valid(&self) -> bool {
        self.good.is_finite() && self.poor.is_finite() && self.good < self.poor
    }
}

/// Bucket `value` against `threshold`. Total: every input yields a rating.
pub fn classify(value: f64, threshold: Threshold) -> Rating {
    if value <= threshold.good {
        Rating::Good
    } else if value > threshold.poor {
        Rating::Poor
    } else {
        Rating::NeedsImprovement
    }
}

/// Enum-keyed threshold map. Built from the defaults and validated so that
/// every tracked metric has a usable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    entries: BTreeMap<MetricName, Threshold>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let entries = MetricName::ALL
            .iter()
            .map(|m| (*m, default_threshold(*m)))
            .collect();
        Self { entries }
    }
}

/// Published Core Web Vitals boundaries.
pub fn default_threshold(metric: MetricName) -> Threshold {
    match metric {
        MetricName::Lcp => Threshold::new(2500.0, 4000.0),
        MetricName::Fid => Threshold::new(100.0, 300.0),
        MetricName::Inp => Threshold::new(200.0, 500.0),
        MetricName::Cls => Threshold::new(0.1, 0.25),
        MetricName::Fcp => Threshold::new(1800.0, 3000.0),
        MetricName::Ttfb => Threshold::new(800.0, 1800.0),
    }
}

impl ThresholdTable {
    /// Defaults with `overrides` applied, then validated.
    pub fn with_overrides(
        overrides: &BTreeMap<MetricName, Threshold>,
    ) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        for (metric, t) in overrides {
            table.entries.insert(*metric, *t);
        }
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for metric in MetricName::ALL {
            let t = self
                .entries
                .get(&metric)
                .ok_or(ConfigError::MissingThreshold { metric })?;
            if !t.is_valid() {
                return Err(ConfigError::InvalidThreshold {
                    metric,
                    good: t.good,
                    poor: t.poor,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, metric: MetricName) -> Threshold {
        self.entries
            .get(&metric)
            .copied()
            .unwrap_or_else(|| default_threshold(metric))
    }

    pub fn classify(&self, metric: MetricName, value: f64) -> Rating {
        classify(value, self.get(metric))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetricName, &Threshold)> {
        self.entries.iter()
    }
}
