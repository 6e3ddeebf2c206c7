use super::RunContext;
use crate::cli::args::{TrendsArgs, TrendsMode};
use crate::exit_codes;
use beacon_core::report::{OutputFormat, ReportKind};
use beacon_core::trends::{self, TrendReport};
use std::path::Path;

pub fn run(args: &TrendsArgs, ctx: &mut RunContext) -> anyhow::Result<i32> {
    let report = build(ctx, args.iterations.as_deref())?;
    if matches!(args.mode, TrendsMode::Analyze | TrendsMode::Full) {
        print_summary(&report);
    }
    if matches!(args.mode, TrendsMode::Report | TrendsMode::Full) {
        ctx.write(&report, &OutputFormat::ALL)?;
    }
    Ok(exit_codes::SUCCESS)
}

pub fn build(ctx: &mut RunContext, iterations_file: Option<&Path>) -> anyhow::Result<TrendReport> {
    let mut meta = ctx.meta(ReportKind::Trends);
    let iterations = match iterations_file {
        Some(path) => {
            meta.source = format!("file:{}", path.display());
            meta.seed = None;
            trends::load_iterations(path)?
        }
        None => ctx.source.iterations()?,
    };
    Ok(trends::analyze(
        meta,
        iterations,
        ctx.cfg.trends.stable_band_pct,
    ))
}

fn print_summary(report: &TrendReport) {
    println!("Trends over {} iterations:", report.iterations.len());
    for t in [&report.conversion, &report.quality, &report.lcp] {
        println!(
            "  {:<16} {:+7.1}%  slope {:+.4}  {}",
            t.name, t.change_pct, t.slope, t.direction
        );
    }
    if report.signals.is_empty() {
        println!("  no signals");
    }
    for a in &report.actions {
        println!("  [{:?}] {}: {}", a.priority, a.area, a.action);
    }
}
