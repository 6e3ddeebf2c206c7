pub mod html;
pub mod json;
pub mod markdown;
pub mod writer;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use writer::{write_report, OutputFormat, OutputLayout, WrittenFiles};

/// Current schema version for every report document.
pub const SCHEMA_VERSION: u32 = 1;

/// Run seeds are written as decimal strings: a full-range u64 does not
/// survive a round-trip through an IEEE double in JSON consumers. Bare
/// numbers are still accepted when reading hand-edited reports.
mod seed_text {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SeedRepr {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(seed: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
        seed.map(|n| n.to_string()).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        match Option::<SeedRepr>::deserialize(d)? {
            None => Ok(None),
            Some(SeedRepr::Number(n)) => Ok(Some(n)),
            Some(SeedRepr::Text(t)) => t
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("seed is not a u64: {t:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Vitals,
    Experiments,
    Trends,
    Quality,
}

impl ReportKind {
    /// Directory and file stem used under the output root.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Vitals => "vitals",
            ReportKind::Experiments => "experiments",
            ReportKind::Trends => "trends",
            ReportKind::Quality => "quality",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Vitals => "Core Web Vitals Dashboard",
            ReportKind::Experiments => "A/B Experiment Monitor",
            ReportKind::Trends => "Iteration Trend Analysis",
            ReportKind::Quality => "Landing Page Quality Score",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance block carried by every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub kind: ReportKind,
    pub run_id: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub generated_on: NaiveDate,
    /// Data source label, e.g. "simulated".
    pub source: String,
    /// Serialized as a decimal string or null.
    #[serde(default, with = "seed_text")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_digest: Option<String>,
    pub tool_version: String,
}

impl ReportMeta {
    pub fn new(kind: ReportKind, source: &str, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            kind,
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            generated_on: now.date_naive(),
            source: source.to_string(),
            seed: None,
            config_digest: None,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Same run, different report kind.
    pub fn for_kind(&self, kind: ReportKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config_digest(mut self, digest: Option<String>) -> Self {
        self.config_digest = digest;
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    #[cfg(test)]
    pub(crate) fn for_test(kind: ReportKind) -> Self {
        let now = NaiveDate::from_ymd_opt(2026, 3, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            .and_utc();
        Self::new(kind, "simulated", now)
            .with_run_id("test-run")
            .with_seed(Some(42))
    }
}

/// A report that can be written in every output format.
pub trait ReportDocument: Serialize {
    fn meta(&self) -> &ReportMeta;

    fn kind(&self) -> ReportKind {
        self.meta().kind
    }

    fn to_markdown(&self) -> String;

    fn to_html(&self) -> String;
}

impl ReportDocument for crate::vitals::VitalsReport {
    fn meta(&self) -> &ReportMeta {
        &self.meta
    }
    fn to_markdown(&self) -> String {
        markdown::vitals(self)
    }
    fn to_html(&self) -> String {
        html::vitals(self)
    }
}

impl ReportDocument for crate::experiment::ExperimentReport {
    fn meta(&self) -> &ReportMeta {
        &self.meta
    }
    fn to_markdown(&self) -> String {
        markdown::experiments(self)
    }
    fn to_html(&self) -> String {
        html::experiments(self)
    }
}

impl ReportDocument for crate::trends::TrendReport {
    fn meta(&self) -> &ReportMeta {
        &self.meta
    }
    fn to_markdown(&self) -> String {
        markdown::trends(self)
    }
    fn to_html(&self) -> String {
        html::trends(self)
    }
}

impl ReportDocument for crate::quality::QualityReport {
    fn meta(&self) -> &ReportMeta {
        &self.meta
    }
    fn to_markdown(&self) -> String {
        markdown::quality(self)
    }
    fn to_html(&self) -> String {
        html::quality(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_serializes_as_string() {
        let meta = ReportMeta::for_test(ReportKind::Vitals).with_seed(Some(17390767342376325021));
        let v: serde_json::Value = serde_json::to_value(&meta).unwrap();
        assert_eq!(v["seed"].as_str(), Some("17390767342376325021"));
        assert_eq!(v["schema_version"], 1);
        assert_eq!(v["kind"], "vitals");
        assert!(v.get("config_digest").is_none());

        let back: ReportMeta = serde_json::from_value(v).unwrap();
        assert_eq!(back.seed, Some(17390767342376325021));
    }

    #[test]
    fn missing_seed_is_null() {
        let meta = ReportMeta::for_test(ReportKind::Quality).with_seed(None);
        let v: serde_json::Value = serde_json::to_value(&meta).unwrap();
        assert!(v["seed"].is_null());
    }

    #[test]
    fn numeric_seed_is_accepted_and_junk_rejected() {
        let mut v = serde_json::to_value(ReportMeta::for_test(ReportKind::Trends)).unwrap();
        v["seed"] = serde_json::json!(42);
        let back: ReportMeta = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(back.seed, Some(42));

        v["seed"] = serde_json::json!("forty-two");
        let err = serde_json::from_value::<ReportMeta>(v).unwrap_err();
        assert!(err.to_string().contains("seed"), "{err}");
    }

    #[test]
    fn for_kind_keeps_run_identity() {
        let meta = ReportMeta::for_test(ReportKind::Vitals);
        let other = meta.for_kind(ReportKind::Trends);
        assert_eq!(other.run_id, meta.run_id);
        assert_eq!(other.kind, ReportKind::Trends);
        assert_eq!(meta.generated_at, "2026-03-15T09:30:00Z");
    }
}
