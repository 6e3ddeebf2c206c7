use crate::{audits, experiments, iterations, vitals};
use beacon_core::experiment::Experiment;
use beacon_core::model::{Page, PageAudit, PageVitals};
use beacon_core::trends::Iteration;
use beacon_core::MetricsSource;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded stand-in for a real analytics backend.
///
/// The same seed and `today` always yield the same data, in call order.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    rng: StdRng,
    seed: u64,
    today: NaiveDate,
}

impl SimulatedSource {
    pub const LABEL: &'static str = "simulated";

    /// Seeded source. Without a seed one is drawn from entropy and still
    /// recorded, so any run can be replayed.
    pub fn new(seed: Option<u64>, today: NaiveDate) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, "seeded simulated metrics source");
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            today,
        }
    }
}

impl MetricsSource for SimulatedSource {
    fn label(&self) -> &str {
        Self::LABEL
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }

    fn page_vitals(&mut self, pages: &[Page]) -> anyhow::Result<Vec<PageVitals>> {
        Ok(pages
            .iter()
            .map(|p| vitals::simulate_page(&mut self.rng, p))
            .collect())
    }

    fn page_audits(&mut self, pages: &[Page]) -> anyhow::Result<Vec<PageAudit>> {
        Ok(audits::simulate_audits(&mut self.rng, pages))
    }

    fn experiments(&mut self, pages: &[Page]) -> anyhow::Result<Vec<Experiment>> {
        Ok(experiments::simulate_experiments(
            &mut self.rng,
            pages,
            self.today,
        ))
    }

    fn iterations(&mut self) -> anyhow::Result<Vec<Iteration>> {
        Ok(iterations::simulate_iterations(&mut self.rng, self.today))
    }
}
