//! Full pipeline: vitals, quality, experiments, trends.

use super::RunContext;
use crate::cli::args::AllArgs;
use beacon_core::experiment;
use beacon_core::report::{OutputFormat, ReportKind};

pub fn run(args: &AllArgs, ctx: &mut RunContext) -> anyhow::Result<i32> {
    let mut vitals = super::vitals::build(ctx)?;
    // Quality is scored from the same vitals so the history entry carries it.
    let quality = super::quality::build(ctx, &vitals, args.min_score)?;
    super::vitals::record_history(ctx, &mut vitals, Some(quality.total))?;
    ctx.write(&vitals, &OutputFormat::ALL)?;
    ctx.write(&quality, &OutputFormat::ALL)?;

    let experiments = ctx.source.experiments(&ctx.cfg.pages)?;
    let experiments = experiment::analyze(
        ctx.meta(ReportKind::Experiments),
        &experiments,
        &ctx.cfg.experiments,
    );
    ctx.write(&experiments, &OutputFormat::ALL)?;

    let trends = super::trends::build(ctx, args.iterations.as_deref())?;
    ctx.write(&trends, &OutputFormat::ALL)?;

    println!(
        "vitals {} ({} critical) | quality {:.1} ({}) | {} experiments | {} trend signals",
        vitals.overall,
        vitals.critical_count(),
        quality.total,
        quality.grade,
        experiments.experiments.len(),
        trends.signals.len()
    );

    let codes = [
        super::vitals::gate(&vitals, args.fail_on_critical),
        super::quality::gate(&quality),
    ];
    Ok(codes.into_iter().max().unwrap_or(crate::exit_codes::SUCCESS))
}
