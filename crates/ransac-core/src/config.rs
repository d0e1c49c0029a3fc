/// The five tunables of §6.1, plus the ambient knobs this expansion adds: the global-rescore
/// tolerance multiplier (§4.7 step 3, §9 open question) and an optional RNG seed for
/// reproducible runs. The octree leaf capacity (`bucket_size`) is a construction-time
/// parameter of [`crate::Engine::with_seed_and_bucket_size`] rather than a detection
/// parameter, since both octrees are built once before any `DetectionConfig` exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    pub probability: f64,
    pub min_points: usize,
    pub epsilon: f64,
    pub normal_threshold: f64,
    pub cluster_epsilon: f64,
    pub global_rescore_factor: f64,
    pub seed: Option<u64>,
}

impl DetectionConfig {
    pub fn new(
        probability: f64,
        min_points: usize,
        epsilon: f64,
        normal_threshold: f64,
        cluster_epsilon: f64,
    ) -> Result<Self, crate::Error> {
        Self {
            probability,
            min_points,
            epsilon,
            normal_threshold,
            cluster_epsilon,
            global_rescore_factor: 3.0,
            seed: None,
        }
        .validated()
    }

    pub fn with_global_rescore_factor(mut self, factor: f64) -> Self {
        self.global_rescore_factor = factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validated(self) -> Result<Self, crate::Error> {
        if !(0.0 < self.probability && self.probability <= 1.0) {
            return Err(crate::Error::InvalidProbability(self.probability));
        }
        if !(self.epsilon > 0.0) {
            return Err(crate::Error::InvalidEpsilon(self.epsilon));
        }
        if !(0.0..=1.0).contains(&self.normal_threshold) {
            return Err(crate::Error::InvalidNormalThreshold(self.normal_threshold));
        }
        if !(self.cluster_epsilon > 0.0) {
            return Err(crate::Error::InvalidClusterEpsilon(self.cluster_epsilon));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_probability() {
        assert!(DetectionConfig::new(0.0, 10, 0.01, 0.9, 0.02).is_err());
        assert!(DetectionConfig::new(1.5, 10, 0.01, 0.9, 0.02).is_err());
    }

    #[test]
    fn accepts_boundary_probability_of_one() {
        assert!(DetectionConfig::new(1.0, 10, 0.01, 0.9, 0.02).is_ok());
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        assert!(DetectionConfig::new(0.05, 10, 0.0, 0.9, 0.02).is_err());
    }
}
