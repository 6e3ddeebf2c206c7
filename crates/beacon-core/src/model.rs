use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser performance metrics tracked per landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricName {
    Lcp,
    Fid,
    Inp,
    Cls,
    Fcp,
    Ttfb,
}

impl MetricName {
    pub const ALL: [MetricName; 6] = [
        MetricName::Lcp,
        MetricName::Fid,
        MetricName::Inp,
        MetricName::Cls,
        MetricName::Fcp,
        MetricName::Ttfb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Lcp => "LCP",
            MetricName::Fid => "FID",
            MetricName::Inp => "INP",
            MetricName::Cls => "CLS",
            MetricName::Fcp => "FCP",
            MetricName::Ttfb => "TTFB",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricName::Lcp => "Largest Contentful Paint",
            MetricName::Fid => "First Input Delay",
            MetricName::Inp => "Interaction to Next Paint",
            MetricName::Cls => "Cumulative Layout Shift",
            MetricName::Fcp => "First Contentful Paint",
            MetricName::Ttfb => "Time to First Byte",
        }
    }

    /// CLS is a unitless score; everything else is milliseconds.
    pub fn unit(&self) -> &'static str {
        match self {
            MetricName::Cls => "",
            _ => "ms",
        }
    }

    pub fn format_value(&self, v: f64) -> String {
        match self {
            MetricName::Cls => format!("{:.3}", v),
            _ => format!("{:.0}ms", v),
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing a value against a (good, poor) threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Rating::Good => Severity::Ok,
            Rating::NeedsImprovement => Severity::Warning,
            Rating::Poor => Severity::Critical,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert level derived from a [`Rating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single p75 measurement with its rating distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric: MetricName,
    pub p75: f64,
    pub samples: u64,
    /// Share of page loads rated good (0-100).
    pub good_pct: f64,
    pub needs_improvement_pct: f64,
    pub poor_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageVitals {
    pub path: String,
    pub name: String,
    pub metrics: Vec<MetricSample>,
}

impl PageVitals {
    pub fn sample(&self, metric: MetricName) -> Option<&MetricSample> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

/// A tracked landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    pub path: String,
    pub name: String,
}

impl Page {
    pub fn new(path: &str, name: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
        }
    }
}

/// Per-page audit scores (0-100) for the non-performance quality categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAudit {
    pub path: String,
    pub accessibility: f64,
    pub seo: f64,
    pub best_practices: f64,
}
