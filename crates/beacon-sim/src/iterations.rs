use beacon_core::trends::Iteration;
use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

pub const ITERATION_COUNT: (u32, u32) = (8, 12);
/// Days between optimization cycles.
pub const CYCLE_DAYS: u64 = 14;

const CHANGES: &[&str] = &[
    "Rewrote hero headline",
    "Shortened sign-up form",
    "Compressed hero image",
    "Moved testimonials above the fold",
    "Added annual pricing toggle",
    "Deferred third-party scripts",
    "Inlined critical CSS",
    "Changed CTA colour",
    "Added FAQ section to pricing",
    "Preloaded web fonts",
];

/// Bounded random walk. Each step moves by at most `step`, and the value
/// never leaves [`lo`, `hi`].
fn walk<R: Rng + ?Sized>(rng: &mut R, current: f64, step: f64, lo: f64, hi: f64) -> f64 {
    (current + rng.gen_range(-step..=step)).clamp(lo, hi)
}

/// An iteration history ending at `today`, oldest first.
pub fn simulate_iterations<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Vec<Iteration> {
    let count = rng.gen_range(ITERATION_COUNT.0..=ITERATION_COUNT.1);
    let mut conversion: f64 = rng.gen_range(0.02..=0.05);
    let mut quality: f64 = rng.gen_range(60.0..=85.0);
    let mut lcp: f64 = rng.gen_range(2000.0..=3500.0);

    let mut out = Vec::with_capacity(count as usize);
    for number in 1..=count {
        let back = CYCLE_DAYS * u64::from(count - number);
        let date = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        let n_changes = rng.gen_range(1..=2);
        let changes = CHANGES
            .choose_multiple(rng, n_changes)
            .map(|c| c.to_string())
            .collect();

        out.push(Iteration {
            number,
            date,
            conversion_rate: (conversion * 10_000.0).round() / 10_000.0,
            quality_score: (quality * 10.0).round() / 10.0,
            lcp_p75_ms: lcp.round(),
            changes,
        });

        conversion = walk(rng, conversion, 0.004, 0.01, 0.10);
        quality = walk(rng, quality, 4.0, 0.0, 100.0);
        lcp = walk(rng, lcp, 250.0, 1200.0, 5000.0);
    }
    out
}
