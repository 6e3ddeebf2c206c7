use super::{ReportDocument, ReportKind};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Html];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
        }
    }

    /// Markdown has no `latest` alias.
    fn has_latest_alias(&self) -> bool {
        !matches!(self, OutputFormat::Markdown)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
        };
        f.write_str(s)
    }
}

/// Where reports land: `<root>/<kind>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dir_for(&self, kind: ReportKind) -> PathBuf {
        self.root.join(kind.as_str())
    }
}

/// Paths produced by one `write_report` call, dated files first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    pub dated: Vec<PathBuf>,
    pub latest: Vec<PathBuf>,
}

impl WrittenFiles {
    pub fn all(&self) -> impl Iterator<Item = &PathBuf> {
        self.dated.iter().chain(self.latest.iter())
    }
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Render `doc` in each requested format and write dated files plus the
/// `latest` aliases. Duplicate formats are written once.
pub fn write_report<D: ReportDocument>(
    doc: &D,
    layout: &OutputLayout,
    formats: &[OutputFormat],
) -> anyhow::Result<WrittenFiles> {
    let kind = doc.kind();
    let dir = layout.dir_for(kind);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut formats = formats.to_vec();
    formats.sort();
    formats.dedup();

    let stem = format!("{}-{}", kind.as_str(), doc.meta().generated_on.format("%Y-%m-%d"));
    let mut written = WrittenFiles::default();
    for format in formats {
        let body = match format {
            OutputFormat::Json => super::json::to_json(doc)?,
            OutputFormat::Markdown => doc.to_markdown(),
            OutputFormat::Html => doc.to_html(),
        };
        let dated = dir.join(format!("{}.{}", stem, format.extension()));
        write_file(&dated, &body)?;
        written.dated.push(dated);

        if format.has_latest_alias() {
            let latest = dir.join(format!("latest.{}", format.extension()));
            write_file(&latest, &body)?;
            written.latest.push(latest);
        }
    }

    tracing::info!(
        kind = kind.as_str(),
        dir = %dir.display(),
        files = written.dated.len() + written.latest.len(),
        "wrote report"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{self, QualityWeights};
    use crate::recommendations::RecommendationTable;
    use crate::report::ReportMeta;
    use crate::thresholds::ThresholdTable;
    use crate::vitals::{self, VitalsReport};

    fn report() -> VitalsReport {
        vitals::analyze(
            ReportMeta::for_test(ReportKind::Vitals),
            &vitals::tests::fixture_pages(),
            &ThresholdTable::default(),
            &RecommendationTable::default(),
        )
    }

    #[test]
    fn writes_dated_and_latest_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path().join("reports"));
        let written = write_report(&report(), &layout, &OutputFormat::ALL).unwrap();

        let base = dir.path().join("reports").join("vitals");
        assert_eq!(
            written.dated,
            vec![
                base.join("vitals-2026-03-15.json"),
                base.join("vitals-2026-03-15.md"),
                base.join("vitals-2026-03-15.html"),
            ]
        );
        assert_eq!(
            written.latest,
            vec![base.join("latest.json"), base.join("latest.html")]
        );
        for p in written.all() {
            assert!(p.exists(), "missing {}", p.display());
        }
        assert!(!base.join("latest.md").exists());

        let latest = std::fs::read_to_string(base.join("latest.json")).unwrap();
        let dated = std::fs::read_to_string(base.join("vitals-2026-03-15.json")).unwrap();
        assert_eq!(latest, dated);
        let back: VitalsReport = serde_json::from_str(&latest).unwrap();
        assert_eq!(back, report());
    }

    #[test]
    fn format_selection_limits_output() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let q = quality::score(
            ReportMeta::for_test(ReportKind::Quality),
            &report(),
            &[],
            &QualityWeights::default(),
            None,
        );
        let written = write_report(
            &q,
            &layout,
            &[OutputFormat::Markdown, OutputFormat::Markdown],
        )
        .unwrap();
        assert_eq!(written.dated, vec![dir.path().join("quality/quality-2026-03-15.md")]);
        assert!(written.latest.is_empty());
        assert!(!dir.path().join("quality/latest.json").exists());
    }

    #[test]
    fn unwritable_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let layout = OutputLayout::new(&file);
        let err = write_report(&report(), &layout, &[OutputFormat::Json]).unwrap_err();
        assert!(err.to_string().contains("failed to create output directory"));
    }
}
