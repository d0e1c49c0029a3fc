/// Probabilistic `[min_bound, max_bound]` interval plus point estimate for a candidate's true
/// support over the full available point set, given it has been scored over `subset_total`
/// points and matched `matched` of them.
///
/// Uses a normal approximation to the hypergeometric distribution with the finite-population
/// correction `(available - subset_total) / (available - 1)`, which vanishes once every
/// available point has been inspected (`subset_total == available`), collapsing the interval
/// to the point estimate exactly as required by §4.4(c).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundEstimate {
    pub min_bound: f64,
    pub max_bound: f64,
    pub expected_value: f64,
}

/// 95%-style confidence z-score for the normal approximation.
const Z_SCORE: f64 = 1.96;

pub fn estimate(matched: usize, subset_total: usize, available: usize) -> BoundEstimate {
    let available = available as f64;

    if subset_total == 0 || available <= 0.0 {
        return BoundEstimate {
            min_bound: 0.0,
            max_bound: available,
            expected_value: 0.0,
        };
    }

    let subset_total_f = subset_total as f64;
    let matched_f = matched as f64;
    let expected_value = (matched_f * available / subset_total_f).min(available);

    if subset_total >= available as usize {
        return BoundEstimate {
            min_bound: expected_value,
            max_bound: expected_value,
            expected_value,
        };
    }

    let phat = matched_f / subset_total_f;
    let finite_population_correction =
        (available - subset_total_f) / (available - 1.0).max(1.0);
    let variance =
        available * available * phat * (1.0 - phat) * finite_population_correction / subset_total_f;
    let half_width = Z_SCORE * variance.max(0.0).sqrt();

    BoundEstimate {
        min_bound: (expected_value - half_width).max(0.0),
        max_bound: (expected_value + half_width).min(available),
        expected_value,
    }
}

/// Probability that, after `drawn_candidates` independent draws, none landed on a shape of
/// size `candidate_size` out of `available` points, under the uniform three-point /
/// uniform-level sampling approximation of §4.7.
pub fn overlook_probability(
    candidate_size: f64,
    available: usize,
    drawn_candidates: u64,
    max_level: u32,
) -> f64 {
    if available == 0 || candidate_size <= 0.0 {
        return 1.0;
    }

    let levels = (max_level.max(1)) as f64;
    let available = available as f64;
    let success_probability = candidate_size / (3.0 * available * levels);
    let miss_probability = (1.0 - success_probability).clamp(0.0, 1.0);

    miss_probability.powi(drawn_candidates as i32).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn full_inspection_collapses_interval() {
        let bound = estimate(42, 100, 100);
        assert_relative_eq!(bound.min_bound, bound.max_bound);
        assert_relative_eq!(bound.expected_value, 42.0);
    }

    #[test]
    fn estimate_respects_min_le_expected_le_max() {
        let bound = estimate(10, 200, 4_000);
        assert!(bound.min_bound <= bound.expected_value);
        assert!(bound.expected_value <= bound.max_bound);
    }

    #[test]
    fn interval_narrows_as_subset_total_grows() {
        let available = 10_000;
        let narrow = estimate(100, 8_000, available);
        let wide = estimate(100, 1_000, available);
        assert!(narrow.max_bound - narrow.min_bound <= wide.max_bound - wide.min_bound);
    }

    #[test]
    fn overlook_probability_decreases_with_more_draws() {
        let few = overlook_probability(500.0, 10_000, 10, 8);
        let many = overlook_probability(500.0, 10_000, 1_000, 8);
        assert!(many < few);
    }

    #[test]
    fn overlook_probability_is_bounded() {
        let p = overlook_probability(0.0, 10_000, 5, 8);
        assert_relative_eq!(p, 1.0);
    }
}
