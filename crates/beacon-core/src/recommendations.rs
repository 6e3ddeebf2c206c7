//! Canned recommendation tables.
//!
//! Lookups never fail: a key that is not in a table yields an empty list.

use crate::errors::ConfigError;
use crate::model::{MetricName, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const BUILTIN: &[(MetricName, Severity, &[&str])] = &[
    (
        MetricName::Lcp,
        Severity::Warning,
        &[
            "Preload the hero image and serve it in AVIF/WebP",
            "Inline critical CSS for above-the-fold content",
        ],
    ),
    (
        MetricName::Lcp,
        Severity::Critical,
        &[
            "Move the LCP element out of client-side rendering",
            "Serve the hero image from the CDN edge with fetchpriority=high",
            "Remove render-blocking third-party scripts from <head>",
        ],
    ),
    (
        MetricName::Fid,
        Severity::Warning,
        &["Defer non-critical JavaScript until after first input"],
    ),
    (
        MetricName::Fid,
        Severity::Critical,
        &[
            "Break up long tasks over 50ms on the main thread",
            "Load analytics and chat widgets after user interaction",
        ],
    ),
    (
        MetricName::Inp,
        Severity::Warning,
        &["Yield to the main thread inside click and input handlers"],
    ),
    (
        MetricName::Inp,
        Severity::Critical,
        &[
            "Move expensive event handler work to a web worker",
            "Reduce DOM size on interactive sections",
        ],
    ),
    (
        MetricName::Cls,
        Severity::Warning,
        &["Set explicit width and height on images and embeds"],
    ),
    (
        MetricName::Cls,
        Severity::Critical,
        &[
            "Reserve space for banners and late-loading widgets",
            "Use font-display: optional or size-adjusted fallback fonts",
        ],
    ),
    (
        MetricName::Fcp,
        Severity::Warning,
        &["Preconnect to font and asset origins"],
    ),
    (
        MetricName::Fcp,
        Severity::Critical,
        &[
            "Eliminate render-blocking stylesheets",
            "Reduce server response time before first paint",
        ],
    ),
    (
        MetricName::Ttfb,
        Severity::Warning,
        &["Enable edge caching for static landing pages"],
    ),
    (
        MetricName::Ttfb,
        Severity::Critical,
        &[
            "Serve landing pages statically instead of rendering per request",
            "Audit origin latency and redirect chains",
        ],
    ),
];

/// `(metric, severity) -> recommendations` lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationTable {
    entries: BTreeMap<(MetricName, Severity), Vec<String>>,
}

impl Default for RecommendationTable {
    fn default() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(m, s, recs)| ((*m, *s), recs.iter().map(|r| r.to_string()).collect()))
            .collect();
        Self { entries }
    }
}

/// Per-metric override block as written in `beacon.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendationOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<Vec<String>>,
}

impl RecommendationTable {
    pub fn with_overrides(
        overrides: &BTreeMap<MetricName, RecommendationOverride>,
    ) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        for (metric, o) in overrides {
            if let Some(w) = &o.warning {
                table.entries.insert((*metric, Severity::Warning), w.clone());
            }
            if let Some(c) = &o.critical {
                table.entries.insert((*metric, Severity::Critical), c.clone());
            }
        }
        table.validate()?;
        Ok(table)
    }

    /// Every tracked metric needs advice for both alerting severities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for metric in MetricName::ALL {
            for severity in [Severity::Warning, Severity::Critical] {
                if self.lookup(metric, severity).is_empty() {
                    return Err(ConfigError::MissingRecommendations { metric, severity });
                }
            }
        }
        Ok(())
    }

    pub fn lookup(&self, metric: MetricName, severity: Severity) -> &[String] {
        self.entries
            .get(&(metric, severity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &(MetricName, Severity)> {
        self.entries.keys()
    }
}

/// Convenience over the built-in table.
pub fn recommendations_for(metric: MetricName, severity: Severity) -> Vec<String> {
    BUILTIN
        .iter()
        .find(|(m, s, _)| *m == metric && *s == severity)
        .map(|(_, _, recs)| recs.iter().map(|r| r.to_string()).collect())
        .unwrap_or_default()
}

// --- Trend signals -> action items ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendSignal {
    ConversionDeclining,
    ConversionStalled,
    QualityDeclining,
    PerformanceRegressing,
    StrongMomentum,
}

impl TrendSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendSignal::ConversionDeclining => "conversion-declining",
            TrendSignal::ConversionStalled => "conversion-stalled",
            TrendSignal::QualityDeclining => "quality-declining",
            TrendSignal::PerformanceRegressing => "performance-regressing",
            TrendSignal::StrongMomentum => "strong-momentum",
        }
    }
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub area: String,
    pub action: String,
    pub expected_impact: String,
}

const SIGNAL_ACTIONS: &[(TrendSignal, Priority, &str, &str, &str)] = &[
    (
        TrendSignal::ConversionDeclining,
        Priority::P0,
        "conversion",
        "Roll back the last iteration's hero and CTA changes and re-test",
        "Recover lost sign-ups within one iteration",
    ),
    (
        TrendSignal::ConversionDeclining,
        Priority::P1,
        "conversion",
        "Review funnel drop-off between pricing and sign-up",
        "Locate the step losing visitors",
    ),
    (
        TrendSignal::ConversionStalled,
        Priority::P1,
        "experimentation",
        "Launch a bolder A/B test on headline and value proposition",
        "Break the plateau with a larger expected effect",
    ),
    (
        TrendSignal::QualityDeclining,
        Priority::P1,
        "quality",
        "Run an accessibility and SEO audit on pages changed last iteration",
        "Restore quality score above the gate",
    ),
    (
        TrendSignal::PerformanceRegressing,
        Priority::P0,
        "performance",
        "Bisect shipped changes for LCP regressions and add a performance budget",
        "Return LCP p75 under the good threshold",
    ),
    (
        TrendSignal::StrongMomentum,
        Priority::P3,
        "process",
        "Keep the current iteration cadence and document what worked",
        "Sustain the improvement rate",
    ),
];

/// Map a set of signals to action items, sorted by priority. An empty set
/// yields an empty list.
pub fn actions_for(signals: &BTreeSet<TrendSignal>) -> Vec<ActionItem> {
    let mut actions: Vec<ActionItem> = SIGNAL_ACTIONS
        .iter()
        .filter(|(s, ..)| signals.contains(s))
        .map(|(_, priority, area, action, impact)| ActionItem {
            priority: *priority,
            area: area.to_string(),
            action: action.to_string(),
            expected_impact: impact.to_string(),
        })
        .collect();
    actions.sort_by(|a, b| a.priority.cmp(&b.priority));
    actions.dedup_by(|a, b| a.action == b.action);
    actions
}
