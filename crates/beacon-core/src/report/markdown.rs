use crate::experiment::ExperimentReport;
use crate::model::{Rating, Severity};
use crate::quality::QualityReport;
use crate::report::ReportMeta;
use crate::trends::{SeriesTrend, TrendReport};
use crate::vitals::VitalsReport;

fn rating_icon(r: Rating) -> &'static str {
    match r {
        Rating::Good => "✅",
        Rating::NeedsImprovement => "⚠️",
        Rating::Poor => "❌",
    }
}

fn header(md: &mut String, meta: &ReportMeta) {
    md.push_str(&format!("# {}\n\n", meta.kind.title()));
    md.push_str(&format!(
        "**Generated:** {} · **Source:** {} · **Run:** `{}`",
        meta.generated_at, meta.source, meta.run_id
    ));
    if let Some(seed) = meta.seed {
        md.push_str(&format!(" · **Seed:** {}", seed));
    }
    md.push_str("\n\n");
}

pub fn vitals(report: &VitalsReport) -> String {
    let mut md = String::new();
    header(&mut md, &report.meta);

    md.push_str(&format!(
        "## Overall: {} {}\n\n",
        rating_icon(report.overall),
        report.overall
    ));
    md.push_str(&format!(
        "{} critical · {} warning alerts across {} pages\n\n",
        report.critical_count(),
        report.warning_count(),
        report.pages.len()
    ));

    md.push_str("## Site-wide (sample-weighted)\n\n");
    md.push_str("| Metric | p75 | Good | Needs improvement | Poor | Samples | Rating |\n");
    md.push_str("|--------|-----|------|-------------------|------|---------|--------|\n");
    for a in &report.aggregates {
        md.push_str(&format!(
            "| {} | {} | {:.1}% | {:.1}% | {:.1}% | {} | {} {} |\n",
            a.metric,
            a.metric.format_value(a.p75),
            a.good_pct,
            a.needs_improvement_pct,
            a.poor_pct,
            a.samples,
            rating_icon(a.rating),
            a.rating
        ));
    }

    md.push_str("\n## Pages\n\n");
    for page in &report.pages {
        md.push_str(&format!(
            "### {} `{}` {}\n\n",
            page.name,
            page.path,
            rating_icon(page.rating)
        ));
        md.push_str("| Metric | p75 | Good | Threshold (good / poor) | Rating |\n");
        md.push_str("|--------|-----|------|-------------------------|--------|\n");
        for m in &page.metrics {
            let metric = m.sample.metric;
            md.push_str(&format!(
                "| {} | {} | {:.1}% | {} / {} | {} |\n",
                metric,
                metric.format_value(m.sample.p75),
                m.sample.good_pct,
                metric.format_value(m.threshold.good),
                metric.format_value(m.threshold.poor),
                m.rating
            ));
        }
        md.push('\n');
    }

    if !report.alerts.is_empty() {
        md.push_str("## Alerts\n\n");
        for alert in &report.alerts {
            let tag = match alert.severity {
                Severity::Critical => "🔴 **critical**",
                _ => "🟡 warning",
            };
            md.push_str(&format!("- {}: {}\n", tag, alert.message()));
            for rec in &alert.recommendations {
                md.push_str(&format!("  - {}\n", rec));
            }
        }
        md.push('\n');
    }

    if !report.history.is_empty() {
        md.push_str("## Recent history\n\n");
        md.push_str("| Date | LCP good | CLS good | INP good | Quality |\n");
        md.push_str("|------|----------|----------|----------|---------|\n");
        for h in &report.history {
            let pct = |m| {
                h.good_pct
                    .get(&m)
                    .map(|v| format!("{:.1}%", v))
                    .unwrap_or_else(|| "-".into())
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                h.date,
                pct(crate::model::MetricName::Lcp),
                pct(crate::model::MetricName::Cls),
                pct(crate::model::MetricName::Inp),
                h.quality_score
                    .map(|q| format!("{:.1}", q))
                    .unwrap_or_else(|| "-".into())
            ));
        }
        md.push('\n');
    }

    md
}

pub fn experiments(report: &ExperimentReport) -> String {
    let mut md = String::new();
    header(&mut md, &report.meta);
    md.push_str(&format!(
        "Decision rule: {}% confidence, at least {} visitors per arm.\n\n",
        report.confidence_level, report.min_samples_per_variant
    ));

    for exp in &report.experiments {
        md.push_str(&format!("## {} (`{}`)\n\n", exp.name, exp.id));
        md.push_str(&format!(
            "Page `{}` · started {} · {} days · status **{:?}**\n\n",
            exp.page, exp.started_on, exp.days_running, exp.status
        ));
        md.push_str("| Arm | Visitors | Conversions | Rate | Lift | z | Confidence | Outcome |\n");
        md.push_str("|-----|----------|-------------|------|------|---|------------|---------|\n");
        md.push_str(&format!(
            "| {} (control) | {} | {} | {:.2}% | - | - | - | - |\n",
            exp.control.name,
            exp.control.visitors,
            exp.control.conversions,
            exp.control_rate * 100.0
        ));
        for v in &exp.variants {
            let confidence = if v.confidence == 0 {
                "<90%".to_string()
            } else {
                format!("{}%", v.confidence)
            };
            md.push_str(&format!(
                "| {} | {} | {} | {:.2}% | {:+.1}% | {:.2} | {} | {} |\n",
                v.name,
                v.visitors,
                v.conversions,
                v.conversion_rate * 100.0,
                v.lift_pct,
                v.z_score,
                confidence,
                v.outcome
            ));
        }
        md.push('\n');
        for w in &exp.warnings {
            md.push_str(&format!("> ⚠️ {}\n", w));
        }
        if !exp.warnings.is_empty() {
            md.push('\n');
        }
        if !exp.next_steps.is_empty() {
            md.push_str("**Next steps**\n\n");
            for s in &exp.next_steps {
                md.push_str(&format!("- {}\n", s));
            }
            md.push('\n');
        }
    }
    if report.experiments.is_empty() {
        md.push_str("_No active experiments._\n");
    }
    md
}

fn trend_row(t: &SeriesTrend) -> String {
    format!(
        "| {} | {:.4} | {:.4} | {:+.1}% | {:.4} | {} |\n",
        t.name, t.first, t.last, t.change_pct, t.slope, t.direction
    )
}

pub fn trends(report: &TrendReport) -> String {
    let mut md = String::new();
    header(&mut md, &report.meta);

    md.push_str("## Trends\n\n");
    md.push_str("| Series | First | Last | Change | Slope/iteration | Direction |\n");
    md.push_str("|--------|-------|------|--------|-----------------|-----------|\n");
    md.push_str(&trend_row(&report.conversion));
    md.push_str(&trend_row(&report.quality));
    md.push_str(&trend_row(&report.lcp));

    md.push_str("\n## Iterations\n\n");
    md.push_str("| # | Date | Conversion | Quality | LCP p75 | Changes |\n");
    md.push_str("|---|------|------------|---------|---------|---------|\n");
    for it in &report.iterations {
        md.push_str(&format!(
            "| {} | {} | {:.2}% | {:.1} | {:.0}ms | {} |\n",
            it.number,
            it.date,
            it.conversion_rate * 100.0,
            it.quality_score,
            it.lcp_p75_ms,
            it.changes.join("; ")
        ));
    }

    if !report.signals.is_empty() {
        md.push_str("\n## Signals\n\n");
        for s in &report.signals {
            md.push_str(&format!("- `{}`\n", s));
        }
    }
    if !report.actions.is_empty() {
        md.push_str("\n## Recommended actions\n\n");
        md.push_str("| Priority | Area | Action | Expected impact |\n");
        md.push_str("|----------|------|--------|-----------------|\n");
        for a in &report.actions {
            md.push_str(&format!(
                "| {:?} | {} | {} | {} |\n",
                a.priority, a.area, a.action, a.expected_impact
            ));
        }
    }
    md
}

pub fn quality(report: &QualityReport) -> String {
    let mut md = String::new();
    header(&mut md, &report.meta);

    md.push_str(&format!(
        "## Score: {:.1} (grade {})\n\n",
        report.total, report.grade
    ));
    if let Some(gate) = &report.gate {
        md.push_str(&format!(
            "Quality gate (min {:.1}): {}\n\n",
            gate.min_score,
            if gate.passed { "✅ PASS" } else { "❌ FAIL" }
        ));
    }

    let s = &report.scores;
    let w = &report.weights;
    md.push_str("| Category | Score | Weight |\n");
    md.push_str("|----------|-------|--------|\n");
    md.push_str(&format!("| Performance | {:.1} | {:.2} |\n", s.performance, w.performance));
    md.push_str(&format!("| Accessibility | {:.1} | {:.2} |\n", s.accessibility, w.accessibility));
    md.push_str(&format!("| SEO | {:.1} | {:.2} |\n", s.seo, w.seo));
    md.push_str(&format!(
        "| Best practices | {:.1} | {:.2} |\n",
        s.best_practices, w.best_practices
    ));

    md.push_str("\n## Pages\n\n");
    md.push_str("| Page | Performance | Accessibility | SEO | Best practices | Total | Grade |\n");
    md.push_str("|------|-------------|---------------|-----|----------------|-------|-------|\n");
    for p in &report.pages {
        md.push_str(&format!(
            "| `{}` | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {} |\n",
            p.path,
            p.scores.performance,
            p.scores.accessibility,
            p.scores.seo,
            p.scores.best_practices,
            p.total,
            p.grade
        ));
    }

    if !report.recommendations.is_empty() {
        md.push_str("\n## Recommendations\n\n");
        for r in &report.recommendations {
            md.push_str(&format!("- {}\n", r));
        }
    }
    md
}
