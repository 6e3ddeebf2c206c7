//! Iteration-strategy trend analysis.

use crate::recommendations::{actions_for, ActionItem, TrendSignal};
use crate::report::ReportMeta;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// One optimization cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    pub number: u32,
    pub date: NaiveDate,
    /// Fraction in [0, 1].
    pub conversion_rate: f64,
    /// 0-100.
    pub quality_score: f64,
    pub lcp_p75_ms: f64,
    #[serde(default)]
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Improving,
    Declining,
    Stable,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Improving => "improving",
            Direction::Declining => "declining",
            Direction::Stable => "stable",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTrend {
    pub name: String,
    pub polarity: Polarity,
    pub first: f64,
    pub last: f64,
    /// Least-squares slope per iteration.
    pub slope: f64,
    pub change_pct: f64,
    pub direction: Direction,
    /// Trailing 3-point moving average, aligned with the input.
    pub moving_average: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub meta: ReportMeta,
    pub iterations: Vec<Iteration>,
    pub conversion: SeriesTrend,
    pub quality: SeriesTrend,
    pub lcp: SeriesTrend,
    pub signals: Vec<TrendSignal>,
    pub actions: Vec<ActionItem>,
}

/// Least-squares slope of `values` against their index. 0 for fewer than two
/// points.
pub fn slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

pub fn change_pct(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        (last - first) / first.abs() * 100.0
    }
}

pub fn series_trend(
    name: &str,
    values: &[f64],
    polarity: Polarity,
    stable_band_pct: f64,
) -> SeriesTrend {
    let first = values.first().copied().unwrap_or(0.0);
    let last = values.last().copied().unwrap_or(0.0);
    let change = change_pct(first, last);
    let direction = if change.abs() <= stable_band_pct {
        Direction::Stable
    } else {
        let rising = change > 0.0;
        match (rising, polarity) {
            (true, Polarity::HigherIsBetter) | (false, Polarity::LowerIsBetter) => {
                Direction::Improving
            }
            _ => Direction::Declining,
        }
    };
    SeriesTrend {
        name: name.to_string(),
        polarity,
        first,
        last,
        slope: slope(values),
        change_pct: change,
        direction,
        moving_average: moving_average(values, 3),
    }
}

pub fn signals(conversion: &SeriesTrend, quality: &SeriesTrend, lcp: &SeriesTrend) -> BTreeSet<TrendSignal> {
    let mut out = BTreeSet::new();
    match conversion.direction {
        Direction::Declining => {
            out.insert(TrendSignal::ConversionDeclining);
        }
        Direction::Stable => {
            out.insert(TrendSignal::ConversionStalled);
        }
        Direction::Improving => {}
    }
    if quality.direction == Direction::Declining {
        out.insert(TrendSignal::QualityDeclining);
    }
    if lcp.direction == Direction::Declining {
        out.insert(TrendSignal::PerformanceRegressing);
    }
    if [conversion, quality, lcp]
        .iter()
        .all(|t| t.direction == Direction::Improving)
    {
        out.insert(TrendSignal::StrongMomentum);
    }
    out
}

pub fn analyze(meta: ReportMeta, mut iterations: Vec<Iteration>, stable_band_pct: f64) -> TrendReport {
    iterations.sort_by_key(|i| i.number);
    let conv: Vec<f64> = iterations.iter().map(|i| i.conversion_rate).collect();
    let quality: Vec<f64> = iterations.iter().map(|i| i.quality_score).collect();
    let lcp: Vec<f64> = iterations.iter().map(|i| i.lcp_p75_ms).collect();

    let conversion = series_trend("conversion_rate", &conv, Polarity::HigherIsBetter, stable_band_pct);
    let quality = series_trend("quality_score", &quality, Polarity::HigherIsBetter, stable_band_pct);
    let lcp = series_trend("lcp_p75_ms", &lcp, Polarity::LowerIsBetter, stable_band_pct);

    let signal_set = if iterations.len() < 2 {
        BTreeSet::new()
    } else {
        signals(&conversion, &quality, &lcp)
    };
    let actions = actions_for(&signal_set);
    tracing::debug!(
        iterations = iterations.len(),
        signals = signal_set.len(),
        "analyzed trends"
    );

    TrendReport {
        meta,
        iterations,
        conversion,
        quality,
        lcp,
        signals: signal_set.into_iter().collect(),
        actions,
    }
}

/// Read iterations from a JSON array file.
pub fn load_iterations(path: &Path) -> anyhow::Result<Vec<Iteration>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("iterations file not found: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid iterations JSON in {}", path.display()))
}
