use super::RunContext;
use crate::cli::args::{ExperimentsArgs, ExperimentsMode};
use crate::exit_codes;
use beacon_core::experiment::{self, ExperimentReport};
use beacon_core::report::{OutputFormat, ReportKind};

pub fn run(args: &ExperimentsArgs, ctx: &mut RunContext) -> anyhow::Result<i32> {
    let experiments = ctx.source.experiments(&ctx.cfg.pages)?;
    let report = experiment::analyze(
        ctx.meta(ReportKind::Experiments),
        &experiments,
        &ctx.cfg.experiments,
    );
    if matches!(args.mode, ExperimentsMode::Monitor | ExperimentsMode::Full) {
        print_status(&report);
    }
    if matches!(args.mode, ExperimentsMode::Report | ExperimentsMode::Full) {
        ctx.write(&report, &OutputFormat::ALL)?;
    }
    Ok(exit_codes::SUCCESS)
}

fn print_status(report: &ExperimentReport) {
    println!(
        "Experiments: {} active ({}% confidence required)",
        report.experiments.len(),
        report.confidence_level
    );
    for e in &report.experiments {
        println!(
            "  {} {} on {} [{:?}, {} days]",
            e.id, e.name, e.page, e.status, e.days_running
        );
        for v in &e.variants {
            println!(
                "    {:<18} {:>6.2}%  lift {:+6.1}%  z {:+.2}  {}",
                v.name,
                v.conversion_rate * 100.0,
                v.lift_pct,
                v.z_score,
                v.outcome
            );
        }
        for w in &e.warnings {
            println!("    ! {w}");
        }
    }
    for (e, v) in report.winners() {
        println!("  winner: {} in {} ({:+.1}%)", v.name, e.name, v.lift_pct);
    }
}
