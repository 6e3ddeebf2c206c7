//! Standalone HTML dashboards with inline CSS and no external assets.

use crate::experiment::{ExperimentReport, Outcome};
use crate::model::{MetricName, Rating, Severity};
use crate::quality::QualityReport;
use crate::report::ReportMeta;
use crate::trends::{Direction, SeriesTrend, TrendReport};
use crate::vitals::VitalsReport;

const STYLE: &str = r#"
  *, *::before, *::after { box-sizing: border-box; }
  body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    margin: 0; padding: 2rem; background: #0f172a; color: #e2e8f0; line-height: 1.5;
  }
  h1 { font-size: 1.75rem; font-weight: 700; color: #f1f5f9; margin: 0 0 0.25rem; }
  h2 { font-size: 1.125rem; font-weight: 600; color: #94a3b8; text-transform: uppercase;
       letter-spacing: 0.05em; margin: 2rem 0 0.75rem; border-bottom: 1px solid #1e293b;
       padding-bottom: 0.5rem; }
  .meta { color: #64748b; font-size: 0.875rem; margin-bottom: 2rem; }
  .meta span { margin-right: 1.5rem; }
  .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
           gap: 1rem; margin-bottom: 2rem; }
  .card { background: #1e293b; border: 1px solid #334155; border-radius: 0.5rem;
          padding: 1rem 1.25rem; }
  .card .label { font-size: 0.75rem; text-transform: uppercase; color: #64748b; }
  .card .value { font-size: 1.5rem; font-weight: 700; color: #f1f5f9; }
  table { width: 100%; border-collapse: collapse; font-size: 0.875rem; background: #1e293b;
          margin-bottom: 2rem; }
  th, td { padding: 0.625rem 1rem; text-align: left; border-top: 1px solid #334155; }
  th { font-weight: 600; color: #94a3b8; text-transform: uppercase; font-size: 0.75rem; }
  td { color: #cbd5e1; }
  ul { margin: 0.25rem 0 1rem; }
  .good { color: #34d399; }
  .needs-improvement { color: #fbbf24; }
  .poor { color: #f87171; }
  footer { margin-top: 3rem; padding-top: 1rem; border-top: 1px solid #1e293b;
           color: #475569; font-size: 0.8125rem; }
"#;

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn rating_class(r: Rating) -> &'static str {
    match r {
        Rating::Good => "good",
        Rating::NeedsImprovement => "needs-improvement",
        Rating::Poor => "poor",
    }
}

fn direction_class(d: Direction) -> &'static str {
    match d {
        Direction::Improving => "good",
        Direction::Stable => "needs-improvement",
        Direction::Declining => "poor",
    }
}

fn card(label: &str, value: &str, class: &str) -> String {
    format!(
        "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value {}\">{}</div></div>\n",
        html_escape(label),
        class,
        html_escape(value)
    )
}

fn document(meta: &ReportMeta, body: &str) -> String {
    let title = meta.kind.title();
    let seed = meta
        .seed
        .map(|s| format!("<span>Seed: {}</span>", s))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<h1>{title}</h1>
<div class="meta"><span>Generated: {generated}</span><span>Source: {source}</span><span>Run: {run}</span>{seed}</div>
{body}
<footer>beacon {version} &middot; schema v{schema}</footer>
</body>
</html>
"#,
        title = title,
        style = STYLE,
        generated = html_escape(&meta.generated_at),
        source = html_escape(&meta.source),
        run = html_escape(&meta.run_id),
        seed = seed,
        body = body,
        version = html_escape(&meta.tool_version),
        schema = meta.schema_version,
    )
}

pub fn vitals(report: &VitalsReport) -> String {
    let mut body = String::new();

    body.push_str("<div class=\"cards\">\n");
    body.push_str(&card(
        "Overall",
        report.overall.as_str(),
        rating_class(report.overall),
    ));
    body.push_str(&card(
        "Critical alerts",
        &report.critical_count().to_string(),
        if report.critical_count() > 0 { "poor" } else { "good" },
    ));
    body.push_str(&card(
        "Warnings",
        &report.warning_count().to_string(),
        if report.warning_count() > 0 {
            "needs-improvement"
        } else {
            "good"
        },
    ));
    for a in &report.aggregates {
        body.push_str(&card(
            a.metric.as_str(),
            &a.metric.format_value(a.p75),
            rating_class(a.rating),
        ));
    }
    body.push_str("</div>\n");

    body.push_str("<h2>Site-wide</h2>\n<table>\n<thead><tr><th>Metric</th><th>p75</th><th>Good</th><th>Needs improvement</th><th>Poor</th><th>Samples</th></tr></thead>\n<tbody>\n");
    for a in &report.aggregates {
        body.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td><td>{}</td></tr>\n",
            a.metric.label(),
            rating_class(a.rating),
            a.metric.format_value(a.p75),
            a.good_pct,
            a.needs_improvement_pct,
            a.poor_pct,
            a.samples
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    body.push_str("<h2>Pages</h2>\n<table>\n<thead><tr><th>Page</th>");
    for m in MetricName::ALL {
        body.push_str(&format!("<th>{}</th>", m));
    }
    body.push_str("</tr></thead>\n<tbody>\n");
    for page in &report.pages {
        body.push_str(&format!(
            "<tr><td class=\"{}\">{} <small>{}</small></td>",
            rating_class(page.rating),
            html_escape(&page.name),
            html_escape(&page.path)
        ));
        for metric in MetricName::ALL {
            match page.metrics.iter().find(|m| m.sample.metric == metric) {
                Some(m) => body.push_str(&format!(
                    "<td class=\"{}\">{}</td>",
                    rating_class(m.rating),
                    metric.format_value(m.sample.p75)
                )),
                None => body.push_str("<td>&ndash;</td>"),
            }
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>\n");

    if !report.alerts.is_empty() {
        body.push_str("<h2>Alerts</h2>\n<ul>\n");
        for alert in &report.alerts {
            let class = match alert.severity {
                Severity::Critical => "poor",
                _ => "needs-improvement",
            };
            body.push_str(&format!(
                "<li><span class=\"{}\">{}</span> {}<ul>",
                class,
                alert.severity,
                html_escape(&alert.message())
            ));
            for rec in &alert.recommendations {
                body.push_str(&format!("<li>{}</li>", html_escape(rec)));
            }
            body.push_str("</ul></li>\n");
        }
        body.push_str("</ul>\n");
    }

    if !report.history.is_empty() {
        body.push_str("<h2>History</h2>\n<table>\n<thead><tr><th>Date</th>");
        for m in MetricName::ALL {
            body.push_str(&format!("<th>{} good</th>", m));
        }
        body.push_str("<th>Quality</th></tr></thead>\n<tbody>\n");
        for h in &report.history {
            body.push_str(&format!("<tr><td>{}</td>", h.date));
            for m in MetricName::ALL {
                match h.good_pct.get(&m) {
                    Some(v) => body.push_str(&format!("<td>{:.1}%</td>", v)),
                    None => body.push_str("<td>&ndash;</td>"),
                }
            }
            match h.quality_score {
                Some(q) => body.push_str(&format!("<td>{:.1}</td>", q)),
                None => body.push_str("<td>&ndash;</td>"),
            }
            body.push_str("</tr>\n");
        }
        body.push_str("</tbody>\n</table>\n");
    }

    document(&report.meta, &body)
}

pub fn experiments(report: &ExperimentReport) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<p>Decision rule: {}% confidence with at least {} visitors per arm.</p>\n",
        report.confidence_level, report.min_samples_per_variant
    ));
    if report.experiments.is_empty() {
        body.push_str("<p>No active experiments.</p>\n");
    }
    for exp in &report.experiments {
        body.push_str(&format!(
            "<h2>{}</h2>\n<div class=\"meta\"><span>{}</span><span>Page {}</span><span>Started {} ({} days)</span><span>Status {:?}</span></div>\n",
            html_escape(&exp.name),
            html_escape(&exp.id),
            html_escape(&exp.page),
            exp.started_on,
            exp.days_running,
            exp.status
        ));
        body.push_str("<table>\n<thead><tr><th>Arm</th><th>Visitors</th><th>Conversions</th><th>Rate</th><th>Lift</th><th>z</th><th>Confidence</th><th>Outcome</th></tr></thead>\n<tbody>\n");
        body.push_str(&format!(
            "<tr><td>{} (control)</td><td>{}</td><td>{}</td><td>{:.2}%</td><td>&ndash;</td><td>&ndash;</td><td>&ndash;</td><td>&ndash;</td></tr>\n",
            html_escape(&exp.control.name),
            exp.control.visitors,
            exp.control.conversions,
            exp.control_rate * 100.0
        ));
        for v in &exp.variants {
            let class = match v.outcome {
                Outcome::Winner => "good",
                Outcome::Loser => "poor",
                Outcome::Inconclusive => "needs-improvement",
            };
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td><td>{:+.1}%</td><td>{:.2}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
                html_escape(&v.name),
                v.visitors,
                v.conversions,
                v.conversion_rate * 100.0,
                v.lift_pct,
                v.z_score,
                if v.confidence == 0 {
                    "&lt;90%".to_string()
                } else {
                    format!("{}%", v.confidence)
                },
                class,
                v.outcome
            ));
        }
        body.push_str("</tbody>\n</table>\n");
        if !exp.warnings.is_empty() || !exp.next_steps.is_empty() {
            body.push_str("<ul>\n");
            for w in &exp.warnings {
                body.push_str(&format!(
                    "<li class=\"needs-improvement\">{}</li>\n",
                    html_escape(w)
                ));
            }
            for s in &exp.next_steps {
                body.push_str(&format!("<li>{}</li>\n", html_escape(s)));
            }
            body.push_str("</ul>\n");
        }
    }
    document(&report.meta, &body)
}

fn trend_card(t: &SeriesTrend) -> String {
    card(
        &t.name,
        &format!("{:+.1}% {}", t.change_pct, t.direction),
        direction_class(t.direction),
    )
}

pub fn trends(report: &TrendReport) -> String {
    let mut body = String::new();
    body.push_str("<div class=\"cards\">\n");
    body.push_str(&trend_card(&report.conversion));
    body.push_str(&trend_card(&report.quality));
    body.push_str(&trend_card(&report.lcp));
    body.push_str("</div>\n");

    body.push_str("<h2>Iterations</h2>\n<table>\n<thead><tr><th>#</th><th>Date</th><th>Conversion</th><th>3-pt avg</th><th>Quality</th><th>LCP p75</th><th>Changes</th></tr></thead>\n<tbody>\n");
    for (i, it) in report.iterations.iter().enumerate() {
        let avg = report
            .conversion
            .moving_average
            .get(i)
            .copied()
            .unwrap_or(it.conversion_rate);
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}%</td><td>{:.2}%</td><td>{:.1}</td><td>{:.0}ms</td><td>{}</td></tr>\n",
            it.number,
            it.date,
            it.conversion_rate * 100.0,
            avg * 100.0,
            it.quality_score,
            it.lcp_p75_ms,
            html_escape(&it.changes.join("; "))
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    if !report.actions.is_empty() {
        body.push_str("<h2>Recommended actions</h2>\n<table>\n<thead><tr><th>Priority</th><th>Area</th><th>Action</th><th>Expected impact</th></tr></thead>\n<tbody>\n");
        for a in &report.actions {
            body.push_str(&format!(
                "<tr><td>{:?}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                a.priority,
                html_escape(&a.area),
                html_escape(&a.action),
                html_escape(&a.expected_impact)
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }
    document(&report.meta, &body)
}

pub fn quality(report: &QualityReport) -> String {
    let mut body = String::new();
    let total_class = match report.grade {
        crate::quality::Grade::A | crate::quality::Grade::B => "good",
        crate::quality::Grade::C => "needs-improvement",
        _ => "poor",
    };
    body.push_str("<div class=\"cards\">\n");
    body.push_str(&card(
        "Score",
        &format!("{:.1} ({})", report.total, report.grade),
        total_class,
    ));
    let s = &report.scores;
    for (label, v) in [
        ("Performance", s.performance),
        ("Accessibility", s.accessibility),
        ("SEO", s.seo),
        ("Best practices", s.best_practices),
    ] {
        body.push_str(&card(label, &format!("{:.1}", v), ""));
    }
    if let Some(gate) = &report.gate {
        body.push_str(&card(
            &format!("Gate (min {:.1})", gate.min_score),
            if gate.passed { "PASS" } else { "FAIL" },
            if gate.passed { "good" } else { "poor" },
        ));
    }
    body.push_str("</div>\n");

    body.push_str("<h2>Pages</h2>\n<table>\n<thead><tr><th>Page</th><th>Performance</th><th>Accessibility</th><th>SEO</th><th>Best practices</th><th>Total</th><th>Grade</th></tr></thead>\n<tbody>\n");
    for p in &report.pages {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td><td>{}</td></tr>\n",
            html_escape(&p.path),
            p.scores.performance,
            p.scores.accessibility,
            p.scores.seo,
            p.scores.best_practices,
            p.total,
            p.grade
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    if !report.recommendations.is_empty() {
        body.push_str("<h2>Recommendations</h2>\n<ul>\n");
        for r in &report.recommendations {
            body.push_str(&format!("<li>{}</li>\n", html_escape(r)));
        }
        body.push_str("</ul>\n");
    }
    document(&report.meta, &body)
}
