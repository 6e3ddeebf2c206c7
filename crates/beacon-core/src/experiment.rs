//! A/B experiment monitoring.
//!
//! Significance uses a pooled two-proportion z-score mapped onto a fixed
//! confidence table. It is an approximation for dashboard bucketing and not
//! a substitute for a proper statistical test.

use crate::config::ExperimentConfig;
use crate::report::ReportMeta;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative deviation from an even traffic split that raises a
/// sample-ratio-mismatch warning.
pub const SRM_TOLERANCE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub visitors: u64,
    pub conversions: u64,
}

impl Variant {
    pub fn new(name: &str, visitors: u64, conversions: u64) -> Self {
        Self {
            name: name.to_string(),
            visitors,
            conversions,
        }
    }

    pub fn conversion_rate(&self) -> f64 {
        if self.visitors == 0 {
            0.0
        } else {
            self.conversions as f64 / self.visitors as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub page: String,
    pub started_on: NaiveDate,
    pub control: Variant,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Winner,
    Loser,
    Inconclusive,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Winner => "winner",
            Outcome::Loser => "loser",
            Outcome::Inconclusive => "inconclusive",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentStatus {
    /// At least one challenger reached a decision.
    ReadyToConclude,
    Running,
    /// Arms are below the minimum sample size.
    CollectingData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAnalysis {
    pub name: String,
    pub visitors: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    /// Relative change vs control, in percent.
    pub lift_pct: f64,
    pub z_score: f64,
    /// 99, 95, 90, or 0 when below 90%.
    pub confidence: u8,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentAnalysis {
    pub id: String,
    pub name: String,
    pub page: String,
    pub started_on: NaiveDate,
    pub days_running: i64,
    pub control: Variant,
    pub control_rate: f64,
    pub variants: Vec<VariantAnalysis>,
    pub status: ExperimentStatus,
    pub warnings: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub meta: ReportMeta,
    pub confidence_level: u8,
    pub min_samples_per_variant: u64,
    pub experiments: Vec<ExperimentAnalysis>,
}

impl ExperimentReport {
    pub fn winners(&self) -> impl Iterator<Item = (&ExperimentAnalysis, &VariantAnalysis)> {
        self.experiments.iter().flat_map(|e| {
            e.variants
                .iter()
                .filter(|v| v.outcome == Outcome::Winner)
                .map(move |v| (e, v))
        })
    }
}

/// Relative lift of `variant` over `control` in percent; 0 when the control
/// rate is 0.
pub fn lift_pct(control_rate: f64, variant_rate: f64) -> f64 {
    if control_rate == 0.0 {
        0.0
    } else {
        (variant_rate - control_rate) / control_rate * 100.0
    }
}

/// Pooled two-proportion z-score. 0 when either arm is empty or the pooled
/// rate is degenerate.
pub fn z_score(control: &Variant, variant: &Variant) -> f64 {
    let (n1, n2) = (control.visitors as f64, variant.visitors as f64);
    if n1 == 0.0 || n2 == 0.0 {
        return 0.0;
    }
    let pooled = (control.conversions + variant.conversions) as f64 / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    if se == 0.0 || !se.is_finite() {
        return 0.0;
    }
    (variant.conversion_rate() - control.conversion_rate()) / se
}

/// Fixed lookup from |z| to a confidence bucket.
pub fn confidence_from_z(z: f64) -> u8 {
    let z = z.abs();
    if z >= 2.576 {
        99
    } else if z >= 1.96 {
        95
    } else if z >= 1.645 {
        90
    } else {
        0
    }
}

pub fn outcome(z: f64, confidence: u8, required: u8, enough_samples: bool) -> Outcome {
    if !enough_samples || confidence < required {
        Outcome::Inconclusive
    } else if z > 0.0 {
        Outcome::Winner
    } else if z < 0.0 {
        Outcome::Loser
    } else {
        Outcome::Inconclusive
    }
}

/// Arms whose share of traffic deviates from an even split by more than
/// [`SRM_TOLERANCE`] (relative).
pub fn sample_ratio_mismatches(exp: &Experiment) -> Vec<String> {
    let arms: Vec<&Variant> = std::iter::once(&exp.control)
        .chain(exp.variants.iter())
        .collect();
    let total: u64 = arms.iter().map(|v| v.visitors).sum();
    if total == 0 {
        return Vec::new();
    }
    let expected = total as f64 / arms.len() as f64;
    arms.iter()
        .filter(|v| ((v.visitors as f64 - expected) / expected).abs() > SRM_TOLERANCE)
        .map(|v| {
            format!(
                "sample-ratio-mismatch: {} received {} visitors (expected ~{:.0})",
                v.name, v.visitors, expected
            )
        })
        .collect()
}

fn next_steps(variants: &[VariantAnalysis], status: ExperimentStatus) -> Vec<String> {
    let mut steps = Vec::new();
    match status {
        ExperimentStatus::CollectingData => {
            steps.push("Keep the experiment running until every arm reaches the minimum sample size".into());
        }
        ExperimentStatus::Running => {
            steps.push("No significant difference yet; keep collecting data".into());
            steps.push("Consider a bolder variant if the test stays flat for two more weeks".into());
        }
        ExperimentStatus::ReadyToConclude => {
            if let Some(best) = variants
                .iter()
                .filter(|v| v.outcome == Outcome::Winner)
                .max_by(|a, b| a.lift_pct.total_cmp(&b.lift_pct))
            {
                steps.push(format!(
                    "Ship {} ({:+.1}% lift at {}% confidence)",
                    best.name, best.lift_pct, best.confidence
                ));
            }
            for v in variants.iter().filter(|v| v.outcome == Outcome::Loser) {
                steps.push(format!("Retire {} ({:+.1}% lift)", v.name, v.lift_pct));
            }
        }
    }
    steps
}

pub fn analyze_experiment(
    exp: &Experiment,
    cfg: &ExperimentConfig,
    today: NaiveDate,
) -> ExperimentAnalysis {
    let control_rate = exp.control.conversion_rate();
    let control_ok = exp.control.visitors >= cfg.min_samples_per_variant;

    let variants: Vec<VariantAnalysis> = exp
        .variants
        .iter()
        .map(|v| {
            let z = z_score(&exp.control, v);
            let confidence = confidence_from_z(z);
            let enough = control_ok && v.visitors >= cfg.min_samples_per_variant;
            VariantAnalysis {
                name: v.name.clone(),
                visitors: v.visitors,
                conversions: v.conversions,
                conversion_rate: v.conversion_rate(),
                lift_pct: lift_pct(control_rate, v.conversion_rate()),
                z_score: z,
                confidence,
                outcome: outcome(z, confidence, cfg.confidence_level, enough),
            }
        })
        .collect();

    let any_small = !control_ok
        || exp
            .variants
            .iter()
            .any(|v| v.visitors < cfg.min_samples_per_variant);
    let status = if variants.iter().any(|v| v.outcome != Outcome::Inconclusive) {
        ExperimentStatus::ReadyToConclude
    } else if any_small {
        ExperimentStatus::CollectingData
    } else {
        ExperimentStatus::Running
    };

    let mut warnings = sample_ratio_mismatches(exp);
    if exp.variants.is_empty() {
        warnings.push("experiment has no challenger variants".into());
    }

    ExperimentAnalysis {
        id: exp.id.clone(),
        name: exp.name.clone(),
        page: exp.page.clone(),
        started_on: exp.started_on,
        days_running: (today - exp.started_on).num_days().max(0),
        control: exp.control.clone(),
        control_rate,
        next_steps: next_steps(&variants, status),
        variants,
        status,
        warnings,
    }
}

pub fn analyze(
    meta: ReportMeta,
    experiments: &[Experiment],
    cfg: &ExperimentConfig,
) -> ExperimentReport {
    let today = meta.generated_on;
    let experiments: Vec<ExperimentAnalysis> = experiments
        .iter()
        .map(|e| analyze_experiment(e, cfg, today))
        .collect();
    tracing::debug!(experiments = experiments.len(), "analyzed experiments");
    ExperimentReport {
        meta,
        confidence_level: cfg.confidence_level,
        min_samples_per_variant: cfg.min_samples_per_variant,
        experiments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn experiment(control: Variant, variants: Vec<Variant>) -> Experiment {
        Experiment {
            id: "exp-hero".into(),
            name: "Hero headline".into(),
            page: "/".into(),
            started_on: date(1),
            control,
            variants,
        }
    }

    #[test]
    fn confidence_table_boundaries() {
        assert_eq!(confidence_from_z(0.0), 0);
        assert_eq!(confidence_from_z(1.644), 0);
        assert_eq!(confidence_from_z(1.645), 90);
        assert_eq!(confidence_from_z(1.96), 95);
        assert_eq!(confidence_from_z(-2.0), 95);
        assert_eq!(confidence_from_z(2.576), 99);
    }

    #[test]
    fn lift_handles_zero_control() {
        assert_eq!(lift_pct(0.0, 0.05), 0.0);
        assert!((lift_pct(0.04, 0.05) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_arm_has_zero_z() {
        let c = Variant::new("control", 0, 0);
        let v = Variant::new("b", 100, 10);
        assert_eq!(z_score(&c, &v), 0.0);
    }

    #[test]
    fn clear_winner_is_detected() {
        let exp = experiment(
            Variant::new("control", 5000, 200),
            vec![Variant::new("bold-cta", 5000, 300)],
        );
        let a = analyze_experiment(&exp, &ExperimentConfig::default(), date(15));
        let v = &a.variants[0];
        assert!(v.z_score > 2.576, "z = {}", v.z_score);
        assert_eq!(v.confidence, 99);
        assert_eq!(v.outcome, Outcome::Winner);
        assert!((v.lift_pct - 50.0).abs() < 1e-9);
        assert_eq!(a.status, ExperimentStatus::ReadyToConclude);
        assert_eq!(a.days_running, 14);
        assert!(a.next_steps[0].starts_with("Ship bold-cta"));
        assert!(a.warnings.is_empty());
    }

    #[test]
    fn clear_loser_is_detected() {
        let exp = experiment(
            Variant::new("control", 5000, 300),
            vec![Variant::new("long-form", 5000, 200)],
        );
        let a = analyze_experiment(&exp, &ExperimentConfig::default(), date(2));
        assert_eq!(a.variants[0].outcome, Outcome::Loser);
        assert!(a.next_steps.iter().any(|s| s.starts_with("Retire long-form")));
    }

    #[test]
    fn small_difference_is_inconclusive() {
        let exp = experiment(
            Variant::new("control", 2000, 80),
            vec![Variant::new("b", 2000, 84)],
        );
        let a = analyze_experiment(&exp, &ExperimentConfig::default(), date(2));
        assert_eq!(a.variants[0].outcome, Outcome::Inconclusive);
        assert_eq!(a.status, ExperimentStatus::Running);
    }

    #[test]
    fn below_min_samples_is_inconclusive() {
        let exp = experiment(
            Variant::new("control", 50, 1),
            vec![Variant::new("b", 50, 20)],
        );
        let a = analyze_experiment(&exp, &ExperimentConfig::default(), date(2));
        assert_eq!(a.variants[0].outcome, Outcome::Inconclusive);
        assert_eq!(a.status, ExperimentStatus::CollectingData);
    }

    #[test]
    fn stricter_confidence_level_demotes_winner() {
        // z is roughly 2.1: significant at 95 but not at 99.
        let exp = experiment(
            Variant::new("control", 4000, 160),
            vec![Variant::new("b", 4000, 200)],
        );
        let at_95 = analyze_experiment(&exp, &ExperimentConfig::default(), date(2));
        assert_eq!(at_95.variants[0].outcome, Outcome::Winner);

        let strict = ExperimentConfig {
            confidence_level: 99,
            ..Default::default()
        };
        let at_99 = analyze_experiment(&exp, &strict, date(2));
        assert_eq!(at_99.variants[0].outcome, Outcome::Inconclusive);
    }

    #[test]
    fn uneven_split_raises_srm_warning() {
        let exp = experiment(
            Variant::new("control", 6000, 200),
            vec![Variant::new("b", 4000, 150)],
        );
        let warnings = sample_ratio_mismatches(&exp);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("sample-ratio-mismatch: control"));
    }
}
