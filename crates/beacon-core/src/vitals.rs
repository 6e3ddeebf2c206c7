//! Core Web Vitals analysis: per-page classification, sample-weighted
//! aggregation across pages, and alerts.

use crate::history::HistoryEntry;
use crate::model::{MetricName, MetricSample, PageVitals, Rating, Severity};
use crate::recommendations::RecommendationTable;
use crate::report::ReportMeta;
use crate::thresholds::{Threshold, ThresholdTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSample {
    #[serde(flatten)]
    pub sample: MetricSample,
    pub threshold: Threshold,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub path: String,
    pub name: String,
    pub metrics: Vec<ClassifiedSample>,
    /// Worst rating across this page's metrics.
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAggregate {
    pub metric: MetricName,
    pub p75: f64,
    pub samples: u64,
    pub good_pct: f64,
    pub needs_improvement_pct: f64,
    pub poor_pct: f64,
    pub threshold: Threshold,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub page: String,
    pub page_name: String,
    pub metric: MetricName,
    pub value: f64,
    pub threshold: Threshold,
    pub rating: Rating,
    pub severity: Severity,
    pub recommendations: Vec<String>,
}

impl Alert {
    pub fn message(&self) -> String {
        let limit = match self.severity {
            Severity::Critical => self.threshold.poor,
            _ => self.threshold.good,
        };
        format!(
            "{} {} p75 {} exceeds {}",
            self.page,
            self.metric,
            self.metric.format_value(self.value),
            self.metric.format_value(limit)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsReport {
    pub meta: ReportMeta,
    pub overall: Rating,
    pub aggregates: Vec<MetricAggregate>,
    pub pages: Vec<PageAnalysis>,
    pub alerts: Vec<Alert>,
    /// Most recent trend history entries, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEntry>,
}

impl VitalsReport {
    pub fn critical_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.severity == Severity::Warning)
            .count()
    }

    pub fn aggregate(&self, metric: MetricName) -> Option<&MetricAggregate> {
        self.aggregates.iter().find(|a| a.metric == metric)
    }
}

/// Sample-weighted mean of `value` across `samples`. Zero total weight
/// yields 0.
pub fn weighted_mean<'a, I, F>(samples: I, value: F) -> f64
where
    I: IntoIterator<Item = &'a MetricSample>,
    F: Fn(&MetricSample) -> f64,
{
    let mut total = 0u64;
    let mut acc = 0.0;
    for s in samples {
        total += s.samples;
        acc += value(s) * s.samples as f64;
    }
    if total == 0 {
        0.0
    } else {
        acc / total as f64
    }
}

pub fn weighted_good_pct<'a, I>(samples: I) -> f64
where
    I: IntoIterator<Item = &'a MetricSample>,
{
    weighted_mean(samples, |s| s.good_pct)
}

pub fn aggregate_metric(
    pages: &[PageVitals],
    metric: MetricName,
    thresholds: &ThresholdTable,
) -> MetricAggregate {
    let samples: Vec<&MetricSample> = pages.iter().filter_map(|p| p.sample(metric)).collect();
    let p75 = weighted_mean(samples.iter().copied(), |s| s.p75);
    let threshold = thresholds.get(metric);
    MetricAggregate {
        metric,
        p75,
        samples: samples.iter().map(|s| s.samples).sum(),
        good_pct: weighted_good_pct(samples.iter().copied()),
        needs_improvement_pct: weighted_mean(samples.iter().copied(), |s| s.needs_improvement_pct),
        poor_pct: weighted_mean(samples.iter().copied(), |s| s.poor_pct),
        threshold,
        rating: crate::thresholds::classify(p75, threshold),
    }
}

pub fn analyze(
    meta: ReportMeta,
    vitals: &[PageVitals],
    thresholds: &ThresholdTable,
    recommendations: &RecommendationTable,
) -> VitalsReport {
    let mut pages = Vec::with_capacity(vitals.len());
    let mut alerts = Vec::new();

    for page in vitals {
        let metrics: Vec<ClassifiedSample> = page
            .metrics
            .iter()
            .map(|s| {
                let threshold = thresholds.get(s.metric);
                ClassifiedSample {
                    sample: s.clone(),
                    threshold,
                    rating: crate::thresholds::classify(s.p75, threshold),
                }
            })
            .collect();

        for m in &metrics {
            let severity = m.rating.severity();
            if severity == Severity::Ok {
                continue;
            }
            alerts.push(Alert {
                page: page.path.clone(),
                page_name: page.name.clone(),
                metric: m.sample.metric,
                value: m.sample.p75,
                threshold: m.threshold,
                rating: m.rating,
                severity,
                recommendations: recommendations.lookup(m.sample.metric, severity).to_vec(),
            });
        }

        let rating = metrics
            .iter()
            .map(|m| m.rating)
            .max()
            .unwrap_or(Rating::Good);
        pages.push(PageAnalysis {
            path: page.path.clone(),
            name: page.name.clone(),
            metrics,
            rating,
        });
    }

    alerts.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.page.cmp(&b.page))
            .then_with(|| a.metric.cmp(&b.metric))
    });

    let aggregates: Vec<MetricAggregate> = MetricName::ALL
        .iter()
        .filter(|m| vitals.iter().any(|p| p.sample(**m).is_some()))
        .map(|m| aggregate_metric(vitals, *m, thresholds))
        .collect();

    let overall = aggregates
        .iter()
        .map(|a| a.rating)
        .max()
        .unwrap_or(Rating::Good);

    tracing::debug!(
        pages = pages.len(),
        alerts = alerts.len(),
        overall = %overall,
        "analyzed vitals"
    );

    VitalsReport {
        meta,
        overall,
        aggregates,
        pages,
        alerts,
        history: Vec::new(),
    }
}
