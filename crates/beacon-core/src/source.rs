//! Data source seam. Analysis and reporting only see this trait, so a real
//! analytics backend can replace the simulator without touching them.

use crate::experiment::Experiment;
use crate::model::{Page, PageAudit, PageVitals};
use crate::trends::Iteration;

pub trait MetricsSource {
    /// Short label recorded in report metadata (e.g. "simulated").
    fn label(&self) -> &str;

    /// Seed used to produce the data, if the source is seeded.
    fn seed(&self) -> Option<u64> {
        None
    }

    fn page_vitals(&mut self, pages: &[Page]) -> anyhow::Result<Vec<PageVitals>>;

    fn page_audits(&mut self, pages: &[Page]) -> anyhow::Result<Vec<PageAudit>>;

    fn experiments(&mut self, pages: &[Page]) -> anyhow::Result<Vec<Experiment>>;

    fn iterations(&mut self) -> anyhow::Result<Vec<Iteration>>;
}
