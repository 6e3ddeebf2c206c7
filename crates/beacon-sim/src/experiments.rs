use beacon_core::experiment::{Experiment, Variant};
use beacon_core::model::Page;
use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

pub const CONTROL_RATE_RANGE: (f64, f64) = (0.02, 0.06);
/// Relative lift of a challenger over control.
pub const LIFT_RANGE: (f64, f64) = (-0.20, 0.25);
pub const VISITORS_RANGE: (u64, u64) = (800, 6000);

const IDEAS: &[(&str, &[&str])] = &[
    ("Hero headline", &["benefit-led", "question"]),
    ("Primary CTA copy", &["start-free", "see-demo"]),
    ("Pricing table layout", &["annual-first", "three-tier"]),
    ("Social proof placement", &["logos-above-fold"]),
    ("Sign-up form length", &["email-only", "two-step"]),
];

fn arm(name: &str, visitors: u64, rate: f64) -> Variant {
    let conversions = (visitors as f64 * rate.clamp(0.0, 1.0)).round() as u64;
    Variant::new(name, visitors, conversions.min(visitors))
}

/// Two or three running experiments spread over `pages`.
pub fn simulate_experiments<R: Rng + ?Sized>(
    rng: &mut R,
    pages: &[Page],
    today: NaiveDate,
) -> Vec<Experiment> {
    let count = rng.gen_range(2..=3);
    let mut ideas: Vec<_> = IDEAS.iter().collect();
    ideas.shuffle(rng);

    ideas
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, (name, challengers))| {
            let page = pages
                .choose(rng)
                .map(|p| p.path.clone())
                .unwrap_or_else(|| "/".to_string());
            let started_on = today
                .checked_sub_days(Days::new(rng.gen_range(3..=28)))
                .unwrap_or(today);

            let control_rate = rng.gen_range(CONTROL_RATE_RANGE.0..=CONTROL_RATE_RANGE.1);
            let control_visitors = rng.gen_range(VISITORS_RANGE.0..=VISITORS_RANGE.1);
            let control = arm("control", control_visitors, control_rate);

            let variants = challengers
                .iter()
                .map(|c| {
                    let lift = rng.gen_range(LIFT_RANGE.0..=LIFT_RANGE.1);
                    // Mostly even splits with the occasional skew.
                    let share = if rng.gen_bool(0.85) {
                        rng.gen_range(0.95..=1.05)
                    } else {
                        rng.gen_range(0.70..=1.30)
                    };
                    let visitors = ((control_visitors as f64 * share).round() as u64)
                        .clamp(VISITORS_RANGE.0, VISITORS_RANGE.1);
                    arm(c, visitors, control_rate * (1.0 + lift))
                })
                .collect();

            Experiment {
                id: format!("exp-{:03}", i + 1),
                name: name.to_string(),
                page,
                started_on,
                control,
                variants,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn experiments_within_ranges() {
        let pages = beacon_core::config::default_pages();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let exps = simulate_experiments(&mut rng, &pages, today());
            assert!((2..=3).contains(&exps.len()));
            for e in &exps {
                assert!(pages.iter().any(|p| p.path == e.page));
                assert!(e.started_on < today());
                assert!(!e.variants.is_empty());
                for v in std::iter::once(&e.control).chain(&e.variants) {
                    assert!((800..=6000).contains(&v.visitors));
                    assert!(v.conversions <= v.visitors);
                }
            }
        }
    }

    #[test]
    fn empty_page_list_targets_root() {
        let mut rng = StdRng::seed_from_u64(3);
        let exps = simulate_experiments(&mut rng, &[], today());
        assert!(exps.iter().all(|e| e.page == "/"));
    }
}
