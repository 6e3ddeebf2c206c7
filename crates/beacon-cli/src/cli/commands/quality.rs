use super::RunContext;
use crate::cli::args::{QualityArgs, QualityMode};
use crate::exit_codes;
use beacon_core::quality::{self, QualityReport};
use beacon_core::report::{OutputFormat, ReportKind};
use beacon_core::vitals::VitalsReport;

pub fn run(args: &QualityArgs, ctx: &mut RunContext) -> anyhow::Result<i32> {
    let vitals = super::vitals::build(ctx)?;
    let report = build(ctx, &vitals, args.min_score)?;
    if matches!(args.mode, QualityMode::Score | QualityMode::Full) {
        print_summary(&report);
    }
    if matches!(args.mode, QualityMode::Report | QualityMode::Full) {
        ctx.write(&report, &OutputFormat::ALL)?;
    }
    Ok(gate(&report))
}

/// Score against `vitals`; `min_score` overrides the configured gate.
pub fn build(
    ctx: &mut RunContext,
    vitals: &VitalsReport,
    min_score: Option<f64>,
) -> anyhow::Result<QualityReport> {
    let audits = ctx.source.page_audits(&ctx.cfg.pages)?;
    Ok(quality::score(
        ctx.meta(ReportKind::Quality),
        vitals,
        &audits,
        &ctx.cfg.quality.weights,
        min_score.or(ctx.cfg.quality.min_score),
    ))
}

pub fn gate(report: &QualityReport) -> i32 {
    match &report.gate {
        Some(g) if !g.passed => {
            eprintln!(
                "quality gate failed: score {:.1} below minimum {:.1}",
                report.total, g.min_score
            );
            exit_codes::GATE_FAILED
        }
        _ => exit_codes::SUCCESS,
    }
}

fn print_summary(report: &QualityReport) {
    let s = &report.scores;
    println!("Quality score: {:.1} (grade {})", report.total, report.grade);
    println!(
        "  performance {:.1}  accessibility {:.1}  seo {:.1}  best practices {:.1}",
        s.performance, s.accessibility, s.seo, s.best_practices
    );
    for r in &report.recommendations {
        println!("  - {r}");
    }
}
