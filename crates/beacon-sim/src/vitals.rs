use beacon_core::model::{MetricName, MetricSample, Page, PageVitals};
use rand::Rng;

/// Inclusive p75 range the simulator draws from.
pub fn p75_range(metric: MetricName) -> (f64, f64) {
    match metric {
        MetricName::Lcp => (1500.0, 3500.0),
        MetricName::Fid => (50.0, 250.0),
        MetricName::Inp => (100.0, 400.0),
        MetricName::Cls => (0.02, 0.20),
        MetricName::Fcp => (1000.0, 2800.0),
        MetricName::Ttfb => (300.0, 1200.0),
    }
}

pub const GOOD_PCT_RANGE: (f64, f64) = (55.0, 95.0);
pub const POOR_PCT_MIN: f64 = 2.0;
pub const POOR_PCT_MAX: f64 = 15.0;
pub const SAMPLES_RANGE: (u64, u64) = (500, 5000);

fn round_to(v: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (v * f).round() / f
}

pub fn simulate_sample<R: Rng + ?Sized>(rng: &mut R, metric: MetricName) -> MetricSample {
    let (lo, hi) = p75_range(metric);
    let p75 = match metric {
        MetricName::Cls => round_to(rng.gen_range(lo..=hi), 3),
        _ => rng.gen_range(lo..=hi).round(),
    };

    let good_pct = round_to(rng.gen_range(GOOD_PCT_RANGE.0..=GOOD_PCT_RANGE.1), 1);
    let poor_cap = POOR_PCT_MAX.min(100.0 - good_pct).max(POOR_PCT_MIN);
    let poor_pct = round_to(rng.gen_range(POOR_PCT_MIN..=poor_cap), 1);
    let needs_improvement_pct = round_to(100.0 - good_pct - poor_pct, 1);

    MetricSample {
        metric,
        p75,
        samples: rng.gen_range(SAMPLES_RANGE.0..=SAMPLES_RANGE.1),
        good_pct,
        needs_improvement_pct,
        poor_pct,
    }
}

pub fn simulate_page<R: Rng + ?Sized>(rng: &mut R, page: &Page) -> PageVitals {
    PageVitals {
        path: page.path.clone(),
        name: page.name.clone(),
        metrics: MetricName::ALL
            .into_iter()
            .map(|m| simulate_sample(rng, m))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            for metric in MetricName::ALL {
                let s = simulate_sample(&mut rng, metric);
                let (lo, hi) = p75_range(metric);
                assert!(s.p75 >= lo && s.p75 <= hi, "{metric} p75 {}", s.p75);
                assert!((55.0..=95.0).contains(&s.good_pct));
                assert!(s.poor_pct >= 2.0 && s.poor_pct <= 15.0);
                assert!(s.needs_improvement_pct >= -1e-9);
                assert!((s.good_pct + s.needs_improvement_pct + s.poor_pct - 100.0).abs() < 1e-6);
                assert!((500..=5000).contains(&s.samples));
            }
        }
    }

    #[test]
    fn page_has_every_metric() {
        let mut rng = StdRng::seed_from_u64(1);
        let v = simulate_page(&mut rng, &Page::new("/pricing", "Pricing"));
        assert_eq!(v.path, "/pricing");
        assert_eq!(v.metrics.len(), MetricName::ALL.len());
        assert!(v.sample(MetricName::Cls).is_some());
    }
}
