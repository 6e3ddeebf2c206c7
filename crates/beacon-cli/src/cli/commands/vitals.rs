use super::RunContext;
use crate::cli::args::{VitalsArgs, VitalsMode};
use crate::exit_codes;
use beacon_core::history::{append_entry, HistoryEntry};
use beacon_core::model::Severity;
use beacon_core::report::{OutputFormat, ReportKind};
use beacon_core::vitals::{self, VitalsReport};

/// History entries shown on the dashboard.
pub const DASHBOARD_HISTORY: usize = 14;

pub fn run(args: &VitalsArgs, ctx: &mut RunContext) -> anyhow::Result<i32> {
    let mut report = build(ctx)?;
    match args.mode {
        VitalsMode::Analyze => print_summary(&report),
        VitalsMode::Alerts => print_alerts(&report),
        VitalsMode::Report => {
            print_summary(&report);
            ctx.write(&report, &[OutputFormat::Json, OutputFormat::Markdown])?;
        }
        VitalsMode::Dashboard => {
            record_history(ctx, &mut report, None)?;
            ctx.write(&report, &[OutputFormat::Html])?;
        }
        VitalsMode::Full => {
            record_history(ctx, &mut report, None)?;
            print_summary(&report);
            ctx.write(&report, &OutputFormat::ALL)?;
        }
    }
    Ok(gate(&report, args.fail_on_critical))
}

pub fn build(ctx: &mut RunContext) -> anyhow::Result<VitalsReport> {
    let pages = ctx.source.page_vitals(&ctx.cfg.pages)?;
    Ok(vitals::analyze(
        ctx.meta(ReportKind::Vitals),
        &pages,
        &ctx.cfg.thresholds,
        &ctx.cfg.recommendations,
    ))
}

/// Append this run to the trend history and attach the recent entries to
/// the report for the dashboard.
pub fn record_history(
    ctx: &RunContext,
    report: &mut VitalsReport,
    quality_score: Option<f64>,
) -> anyhow::Result<()> {
    let path = ctx.cfg.history_path();
    let log = append_entry(
        &path,
        ctx.cfg.history.cap,
        HistoryEntry::from_vitals(report, quality_score),
    )?;
    tracing::info!(path = %path.display(), entries = log.len(), "recorded history");
    report.history = log.recent(DASHBOARD_HISTORY).cloned().collect();
    Ok(())
}

pub fn gate(report: &VitalsReport, fail_on_critical: bool) -> i32 {
    let critical = report.critical_count();
    if fail_on_critical && critical > 0 {
        eprintln!("{critical} critical alert(s); failing as requested");
        exit_codes::GATE_FAILED
    } else {
        exit_codes::SUCCESS
    }
}

fn print_summary(report: &VitalsReport) {
    println!("Core Web Vitals: overall {}", report.overall);
    for a in &report.aggregates {
        println!(
            "  {:<5} p75 {:>8}  good {:>5.1}%  {}",
            a.metric.as_str(),
            a.metric.format_value(a.p75),
            a.good_pct,
            a.rating
        );
    }
    println!(
        "  {} pages, {} critical, {} warning alerts",
        report.pages.len(),
        report.critical_count(),
        report.warning_count()
    );
}

fn print_alerts(report: &VitalsReport) {
    if report.alerts.is_empty() {
        println!("No alerts.");
        return;
    }
    for alert in &report.alerts {
        let tag = match alert.severity {
            Severity::Critical => "CRITICAL",
            _ => "WARNING ",
        };
        println!("{tag} {}", alert.message());
        for rec in &alert.recommendations {
            println!("         - {rec}");
        }
    }
}
