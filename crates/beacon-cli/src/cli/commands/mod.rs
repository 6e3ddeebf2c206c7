use super::args::*;
use beacon_core::config::{resolve_config, AnalyticsSettings, BeaconConfig};
use beacon_core::report::{write_report, OutputFormat, OutputLayout, ReportDocument, ReportKind, ReportMeta};
use beacon_core::MetricsSource;
use beacon_sim::SimulatedSource;
use chrono::Utc;

pub mod all;
pub mod experiments;
pub mod quality;
pub mod trends;
pub mod vitals;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let mut ctx = RunContext::build(&cli.global)?;
    match cli.cmd {
        Command::Vitals(args) => vitals::run(&args, &mut ctx),
        Command::Experiments(args) => experiments::run(&args, &mut ctx),
        Command::Trends(args) => trends::run(&args, &mut ctx),
        Command::Quality(args) => quality::run(&args, &mut ctx),
        Command::All(args) => all::run(&args, &mut ctx),
    }
}

/// Everything a command needs: validated config, data source, output
/// layout and the run's shared report metadata.
pub struct RunContext {
    pub cfg: BeaconConfig,
    pub source: Box<dyn MetricsSource>,
    pub layout: OutputLayout,
    /// Formats selected with `--format`; empty means no restriction.
    pub formats: Vec<OutputFormat>,
    meta: ReportMeta,
}

impl RunContext {
    pub fn build(global: &GlobalArgs) -> anyhow::Result<Self> {
        let mut cfg = resolve_config(global.config.as_deref())?;
        if let Some(dir) = &global.out_dir {
            cfg.output_dir = dir.clone();
        }

        let analytics = AnalyticsSettings::from(&global.analytics);
        if analytics.enabled {
            tracing::warn!(
                property_id = analytics.property_id.as_deref().unwrap_or("<unset>"),
                "GA4 integration is not available in this build; falling back to simulated data"
            );
        }

        let now = Utc::now();
        let source = SimulatedSource::new(global.seed, now.date_naive());
        let meta = ReportMeta::new(ReportKind::Vitals, source.label(), now)
            .with_seed(source.seed())
            .with_config_digest(cfg.digest.clone());
        tracing::debug!(run_id = %meta.run_id, seed = ?meta.seed, "starting run");

        Ok(Self {
            layout: OutputLayout::new(cfg.output_dir.clone()),
            formats: global.format.iter().map(|f| OutputFormat::from(*f)).collect(),
            source: Box::new(source),
            cfg,
            meta,
        })
    }

    /// Metadata for a report of `kind`, sharing this run's identity.
    pub fn meta(&self, kind: ReportKind) -> ReportMeta {
        self.meta.for_kind(kind)
    }

    /// `defaults` narrowed to the `--format` selection.
    pub fn formats_for(&self, defaults: &[OutputFormat]) -> Vec<OutputFormat> {
        if self.formats.is_empty() {
            return defaults.to_vec();
        }
        defaults
            .iter()
            .copied()
            .filter(|f| self.formats.contains(f))
            .collect()
    }

    /// Write `doc` in the selected formats and list the files on stdout.
    pub fn write<D: ReportDocument>(&self, doc: &D, defaults: &[OutputFormat]) -> anyhow::Result<()> {
        let formats = self.formats_for(defaults);
        if formats.is_empty() {
            tracing::warn!(kind = doc.kind().as_str(), "no output formats selected; nothing written");
            return Ok(());
        }
        let written = write_report(doc, &self.layout, &formats)?;
        for path in written.all() {
            println!("  wrote {}", path.display());
        }
        Ok(())
    }
}
