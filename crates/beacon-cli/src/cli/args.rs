use beacon_core::config::{validate_min_score, AnalyticsSettings};
use beacon_core::report::OutputFormat;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "beacon",
    version,
    about = "Landing-page analytics reports: Core Web Vitals, A/B experiments, iteration trends and quality scores"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: ./beacon.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for the simulated metrics source; the same seed reproduces a run
    #[arg(long, global = true, env = "BEACON_SEED")]
    pub seed: Option<u64>,

    /// Output root for reports and history (overrides `output_dir`)
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Restrict written formats, e.g. `--format json,html`
    #[arg(long, global = true, value_enum, value_delimiter = ',')]
    pub format: Vec<FormatArg>,

    #[command(flatten)]
    pub analytics: AnalyticsArgs,
}

/// GA4 connection settings. Only read so the fallback can be reported.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AnalyticsArgs {
    #[arg(long, global = true, env = "GA4_PROPERTY_ID", hide = true)]
    pub ga4_property_id: Option<String>,

    #[arg(long, global = true, env = "GA4_CREDENTIALS_PATH", hide = true)]
    pub ga4_credentials_path: Option<PathBuf>,

    /// Accepts `1/0`, `yes/no`, `on/off` as well as `true/false`.
    #[arg(
        long,
        global = true,
        env = "GA4_ENABLED",
        hide = true,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub ga4_enabled: bool,
}

impl From<&AnalyticsArgs> for AnalyticsSettings {
    fn from(a: &AnalyticsArgs) -> Self {
        Self {
            property_id: a.ga4_property_id.clone().filter(|s| !s.is_empty()),
            credentials_path: a.ga4_credentials_path.clone(),
            enabled: a.ga4_enabled,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Markdown,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Core Web Vitals: classify pages, alert, and render the dashboard
    Vitals(VitalsArgs),
    /// A/B experiments: significance, lift and next steps
    Experiments(ExperimentsArgs),
    /// Iteration trends: slopes, signals and recommended actions
    Trends(TrendsArgs),
    /// Weighted landing-page quality score with optional gate
    Quality(QualityArgs),
    /// Run every report in full mode
    All(AllArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VitalsMode {
    /// Print the summary only
    Analyze,
    /// Write the HTML dashboard and record history
    Dashboard,
    /// Print alerts only
    Alerts,
    /// Write JSON and Markdown reports
    Report,
    #[default]
    Full,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct VitalsArgs {
    #[arg(long, value_enum, default_value_t = VitalsMode::Full)]
    pub mode: VitalsMode,

    /// Exit 1 when any critical alert is raised
    #[arg(long)]
    pub fail_on_critical: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExperimentsMode {
    /// Print experiment status only
    Monitor,
    /// Write report files only
    Report,
    #[default]
    Full,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ExperimentsArgs {
    #[arg(long, value_enum, default_value_t = ExperimentsMode::Full)]
    pub mode: ExperimentsMode,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrendsMode {
    Analyze,
    Report,
    #[default]
    Full,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct TrendsArgs {
    #[arg(long, value_enum, default_value_t = TrendsMode::Full)]
    pub mode: TrendsMode,

    /// JSON array of iterations to analyze instead of simulated history
    #[arg(long)]
    pub iterations: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QualityMode {
    Score,
    Report,
    #[default]
    Full,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct QualityArgs {
    #[arg(long, value_enum, default_value_t = QualityMode::Full)]
    pub mode: QualityMode,

    /// Exit 1 when the total score is below this value (overrides config)
    #[arg(long, value_parser = parse_min_score)]
    pub min_score: Option<f64>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AllArgs {
    #[arg(long)]
    pub fail_on_critical: bool,

    #[arg(long, value_parser = parse_min_score)]
    pub min_score: Option<f64>,

    #[arg(long)]
    pub iterations: Option<PathBuf>,
}

fn parse_min_score(raw: &str) -> Result<f64, String> {
    let min: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    validate_min_score(min).map_err(|e| e.to_string())?;
    Ok(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "beacon",
            "vitals",
            "--mode",
            "alerts",
            "--seed",
            "7",
            "--format",
            "json,html",
        ])
        .unwrap();
        assert_eq!(cli.global.seed, Some(7));
        assert_eq!(cli.global.format, vec![FormatArg::Json, FormatArg::Html]);
        match cli.cmd {
            Command::Vitals(a) => {
                assert_eq!(a.mode, VitalsMode::Alerts);
                assert!(!a.fail_on_critical);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn modes_default_to_full() {
        let cli = Cli::try_parse_from(["beacon", "quality", "--min-score", "75"]).unwrap();
        match cli.cmd {
            Command::Quality(a) => {
                assert_eq!(a.mode, QualityMode::Full);
                assert_eq!(a.min_score, Some(75.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["beacon", "trends", "--mode", "Full"]).is_err());
        assert!(Cli::try_parse_from(["beacon", "trends", "--mode", "dashboard"]).is_err());
    }

    #[test]
    fn min_score_must_be_a_finite_percentage() {
        for bad in ["NaN", "inf", "-5", "100.5", "high"] {
            assert!(
                Cli::try_parse_from(["beacon", "quality", "--min-score", bad]).is_err(),
                "{bad} accepted"
            );
        }
        assert!(Cli::try_parse_from(["beacon", "all", "--min-score", "NaN"]).is_err());
        assert!(Cli::try_parse_from(["beacon", "all", "--min-score", "100"]).is_ok());
    }

    #[test]
    fn ga4_flag_is_a_switch() {
        let cli = Cli::try_parse_from(["beacon", "--ga4-enabled", "trends"]).unwrap();
        assert!(AnalyticsSettings::from(&cli.global.analytics).enabled);
    }
}
