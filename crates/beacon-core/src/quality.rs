use crate::errors::ConfigError;
use crate::model::PageAudit;
use crate::report::ReportMeta;
use crate::vitals::VitalsReport;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityWeights {
    pub performance: f64,
    pub accessibility: f64,
    pub seo: f64,
    pub best_practices: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            performance: 0.40,
            accessibility: 0.25,
            seo: 0.20,
            best_practices: 0.15,
        }
    }
}

impl QualityWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parts = [self.performance, self.accessibility, self.seo, self.best_practices];
        let sum: f64 = parts.iter().sum();
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) || (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidWeights { sum });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub performance: f64,
    pub accessibility: f64,
    pub seo: f64,
    pub best_practices: f64,
}

impl CategoryScores {
    pub fn weighted(&self, w: &QualityWeights) -> f64 {
        self.performance * w.performance
            + self.accessibility * w.accessibility
            + self.seo * w.seo
            + self.best_practices * w.best_practices
    }

    pub fn weakest(&self) -> (&'static str, f64) {
        [
            ("performance", self.performance),
            ("accessibility", self.accessibility),
            ("seo", self.seo),
            ("best_practices", self.best_practices),
        ]
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or(("performance", self.performance))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageQuality {
    pub path: String,
    pub scores: CategoryScores,
    pub total: f64,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    pub min_score: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub meta: ReportMeta,
    pub weights: QualityWeights,
    pub scores: CategoryScores,
    pub total: f64,
    pub grade: Grade,
    pub pages: Vec<PageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<QualityGate>,
    pub recommendations: Vec<String>,
}

impl QualityReport {
    pub fn gate_failed(&self) -> bool {
        self.gate.as_ref().is_some_and(|g| !g.passed)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn category_advice(category: &str) -> &'static str {
    match category {
        "performance" => "Performance is the weakest category: work through the critical vitals alerts first",
        "accessibility" => "Accessibility is the weakest category: fix contrast, alt text and focus order on hero sections",
        "seo" => "SEO is the weakest category: add meta descriptions and structured data to landing pages",
        _ => "Best practices is the weakest category: resolve console errors and insecure third-party requests",
    }
}

/// Score pages using the vitals report for performance (mean good% across
/// metrics) and `audits` for the remaining categories.
pub fn score(
    meta: ReportMeta,
    vitals: &VitalsReport,
    audits: &[PageAudit],
    weights: &QualityWeights,
    min_score: Option<f64>,
) -> QualityReport {
    let mut pages = Vec::with_capacity(vitals.pages.len());
    for page in &vitals.pages {
        let performance = mean(page.metrics.iter().map(|m| m.sample.good_pct));
        let audit = audits.iter().find(|a| a.path == page.path);
        let scores = CategoryScores {
            performance,
            accessibility: audit.map(|a| a.accessibility).unwrap_or(0.0),
            seo: audit.map(|a| a.seo).unwrap_or(0.0),
            best_practices: audit.map(|a| a.best_practices).unwrap_or(0.0),
        };
        let total = scores.weighted(weights);
        pages.push(PageQuality {
            path: page.path.clone(),
            scores,
            total,
            grade: Grade::from_score(total),
        });
    }

    let scores = CategoryScores {
        performance: mean(vitals.aggregates.iter().map(|a| a.good_pct)),
        accessibility: mean(audits.iter().map(|a| a.accessibility)),
        seo: mean(audits.iter().map(|a| a.seo)),
        best_practices: mean(audits.iter().map(|a| a.best_practices)),
    };
    let total = scores.weighted(weights);
    let grade = Grade::from_score(total);

    let mut recommendations = Vec::new();
    if grade != Grade::A {
        let (weakest, _) = scores.weakest();
        recommendations.push(category_advice(weakest).to_string());
    }
    for p in pages.iter().filter(|p| p.grade >= Grade::D) {
        recommendations.push(format!(
            "{} scores {:.1} (grade {}); prioritise it in the next iteration",
            p.path, p.total, p.grade
        ));
    }

    let gate = min_score.map(|min| QualityGate {
        min_score: min,
        passed: total >= min,
    });
    tracing::debug!(total, grade = %grade, "computed quality score");

    QualityReport {
        meta,
        weights: *weights,
        scores,
        total,
        grade,
        pages,
        gate,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::RecommendationTable;
    use crate::report::{ReportKind, ReportMeta};
    use crate::thresholds::ThresholdTable;
    use crate::vitals::tests::fixture_pages;

    fn audits() -> Vec<PageAudit> {
        vec![
            PageAudit {
                path: "/".into(),
                accessibility: 90.0,
                seo: 80.0,
                best_practices: 100.0,
            },
            PageAudit {
                path: "/pricing".into(),
                accessibility: 70.0,
                seo: 80.0,
                best_practices: 80.0,
            },
        ]
    }

    fn vitals() -> VitalsReport {
        crate::vitals::analyze(
            ReportMeta::for_test(ReportKind::Vitals),
            &fixture_pages(),
            &ThresholdTable::default(),
            &RecommendationTable::default(),
        )
    }

    #[test]
    fn grades() {
        assert_eq!(Grade::from_score(95.0), Grade::A);
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.99), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(12.0), Grade::F);
    }

    #[test]
    fn default_weights_validate() {
        QualityWeights::default().validate().unwrap();
        let bad = QualityWeights {
            performance: 0.5,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidWeights { .. })));
    }

    #[test]
    fn scores_combine_vitals_and_audits() {
        let report = score(
            ReportMeta::for_test(ReportKind::Quality),
            &vitals(),
            &audits(),
            &QualityWeights::default(),
            Some(70.0),
        );
        // LCP 73.33 good%, CLS (90*100 + 70*50)/150 = 83.33 good%.
        assert!((report.scores.performance - 78.333_333).abs() < 1e-4);
        assert_eq!(report.scores.accessibility, 80.0);
        assert_eq!(report.scores.seo, 80.0);
        assert_eq!(report.scores.best_practices, 90.0);
        // 78.333*0.4 + 80*0.25 + 80*0.2 + 90*0.15
        assert!((report.total - 80.833_333).abs() < 1e-4);
        assert_eq!(report.grade, Grade::B);
        assert!(!report.gate_failed());
        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.pages[0].path, "/");
        assert!(report.recommendations[0].starts_with("Performance"));
    }

    #[test]
    fn gate_fails_below_min_score() {
        let report = score(
            ReportMeta::for_test(ReportKind::Quality),
            &vitals(),
            &audits(),
            &QualityWeights::default(),
            Some(85.0),
        );
        assert!(report.gate_failed());
    }

    #[test]
    fn missing_audit_scores_zero() {
        let report = score(
            ReportMeta::for_test(ReportKind::Quality),
            &vitals(),
            &[],
            &QualityWeights::default(),
            None,
        );
        assert_eq!(report.pages[1].scores.accessibility, 0.0);
        assert!(report.gate.is_none());
    }
}
