use beacon_core::model::{Page, PageAudit};
use rand::Rng;

pub const AUDIT_SCORE_RANGE: (u32, u32) = (70, 100);

pub fn simulate_audits<R: Rng + ?Sized>(rng: &mut R, pages: &[Page]) -> Vec<PageAudit> {
    let mut score = || f64::from(rng.gen_range(AUDIT_SCORE_RANGE.0..=AUDIT_SCORE_RANGE.1));
    pages
        .iter()
        .map(|p| PageAudit {
            path: p.path.clone(),
            accessibility: score(),
            seo: score(),
            best_practices: score(),
        })
        .collect()
}
