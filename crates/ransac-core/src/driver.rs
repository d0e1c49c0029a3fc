use crate::assignment::AssignmentMap;
use crate::bound;
use crate::candidate::Candidate;
use crate::components;
use crate::config::DetectionConfig;
use crate::kind::{CandidateProbe, ShapeKind, ShapeKindRegistry, ShapeKindTag};
use crate::octree::{self, PointOctree};
use crate::point::{Point, PointStore};
use crate::shape::ExtractedShape;
use crate::subset_ladder::SubsetLadder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// The maximum number of consecutive failed candidate draws before the driver gives up on
/// the current point cloud (§7 `ProgressStall`).
const FAILED_IN_A_ROW_CEILING: u64 = 10_000;

/// Default octree leaf capacity (§3 "implementation choice, e.g., 10"), used when the
/// caller does not specify one via [`Engine::with_seed_and_bucket_size`].
pub const DEFAULT_BUCKET_SIZE: usize = 10;

/// The maximum number of rejection-sampling attempts to find an unassigned point index
/// before falling back to an exhaustive scan.
const UNASSIGNED_PICK_ATTEMPTS: usize = 256;

/// A snapshot handed to the optional progress callback once per outer detection loop
/// iteration. Purely observational — it has no effect on detection semantics.
#[derive(Debug, Clone, Copy)]
pub struct DetectionProgress {
    pub shapes_found: usize,
    pub available: usize,
    pub drawn_candidates: u64,
}

/// The efficient RANSAC shape-detection engine (§6.2).
///
/// Owns the point sequence, both octree variants, the subset ladder, the registered shape
/// kinds, and the single RNG that drives all sampling. Candidates are short-lived and owned
/// by the driver's internal pool during [`Engine::detect`].
pub struct Engine {
    points: PointStore,
    assignment: AssignmentMap,
    indexed_octree: PointOctree,
    ladder: SubsetLadder,
    registry: ShapeKindRegistry,
    rng: StdRng,
    extracted_shapes: Vec<ExtractedShape>,
}

impl Engine {
    /// Constructs octrees and the subset ladder from `points`; O(N log N). Uses a
    /// nondeterministic seed and the default octree leaf capacity (§3).
    pub fn new(points: Vec<Point>) -> Result<Self, crate::Error> {
        Self::with_seed(points, None)
    }

    /// As [`Engine::new`], but with the engine's single RNG seeded deterministically — the
    /// "construction-time parameter" of §5.
    pub fn with_seed(points: Vec<Point>, seed: Option<u64>) -> Result<Self, crate::Error> {
        Self::with_seed_and_bucket_size(points, seed, DEFAULT_BUCKET_SIZE)
    }

    /// As [`Engine::with_seed`], additionally overriding the octree leaf capacity (the
    /// `bucket_size` of §6.1) used to build both octree variants at construction time.
    pub fn with_seed_and_bucket_size(
        points: Vec<Point>,
        seed: Option<u64>,
        bucket_size: usize,
    ) -> Result<Self, crate::Error> {
        let points = PointStore::new(points)?;
        let mut rng = seed.map(StdRng::seed_from_u64).unwrap_or_else(StdRng::from_os_rng);

        let indexed_octree = octree::build_indexed(&points, bucket_size)?;
        let ladder = SubsetLadder::build(&points, &mut rng, bucket_size)?;
        let assignment = AssignmentMap::new(points.len());

        Ok(Self {
            points,
            assignment,
            indexed_octree,
            ladder,
            registry: ShapeKindRegistry::new(),
            rng,
            extracted_shapes: Vec::new(),
        })
    }

    /// Registers a shape kind. Must be called before [`Engine::detect`].
    pub fn register_kind(&mut self, kind: Box<dyn ShapeKind>) {
        self.registry.register(kind);
    }

    /// Runs the detection driver (§4.7). May be called more than once on the same engine: a
    /// later call only considers points still unassigned, extracting zero or more
    /// *additional* shapes (§6.2, §8 idempotence property).
    pub fn detect(&mut self, config: DetectionConfig) -> Result<(), crate::Error> {
        self.detect_with_progress(config, None)
    }

    /// As [`Engine::detect`], but invokes `on_progress` once per outer loop iteration — a
    /// cooperative observation hook (§5 "Cancellation"), not a cancellation mechanism.
    pub fn detect_with_progress(
        &mut self,
        config: DetectionConfig,
        mut on_progress: Option<&mut dyn FnMut(&DetectionProgress)>,
    ) -> Result<(), crate::Error> {
        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        if self.registry.is_empty() {
            return Ok(());
        }
        let missing = self.registry.missing_tags();
        if !missing.is_empty() {
            debug!(?missing, "detecting with a partial shape-kind registry");
        }

        let max_level = self.indexed_octree.max_level().max(1);
        let mut drawn_candidates: u64 = 0;
        let mut failed_in_a_row: u64 = 0;
        let mut pool: Vec<Candidate> = Vec::new();

        loop {
            if let Some(callback) = on_progress.as_deref_mut() {
                callback(&DetectionProgress {
                    shapes_found: self.extracted_shapes.len(),
                    available: self.assignment.available(),
                    drawn_candidates,
                });
            }

            let available = self.assignment.available();
            if available < config.min_points {
                break;
            }
            if bound::overlook_probability(
                config.min_points as f64,
                available,
                drawn_candidates,
                max_level,
            ) <= config.probability
            {
                break;
            }

            self.generate_candidates(
                &config,
                max_level,
                &mut pool,
                &mut drawn_candidates,
                &mut failed_in_a_row,
            );
            if failed_in_a_row > FAILED_IN_A_ROW_CEILING {
                debug!("progress stalled after {failed_in_a_row} consecutive failed draws");
                break;
            }

            let Some(best_index) = self.select_best(&mut pool, &config) else {
                break;
            };

            let mut best = pool.remove(best_index);
            self.rescore_on_global_octree(&mut best, &config);
            let filtered = self.apply_connected_component_filter(&best, &config);

            let available = self.assignment.available();
            let committed = bound::overlook_probability(
                best.expected_value,
                available,
                drawn_candidates,
                max_level,
            ) <= config.probability
                && filtered.len() >= config.min_points;

            if committed {
                let shape_id = self.extracted_shapes.len();
                self.assignment.assign_all(&filtered, shape_id);
                info!(
                    kind = %best.kind_tag,
                    points = filtered.len(),
                    "committed shape"
                );
                self.extracted_shapes.push(ExtractedShape::new(
                    shape_id,
                    best.kind_tag,
                    best.fit,
                    filtered,
                ));

                let new_available = self.assignment.available();
                pool.retain_mut(|candidate| {
                    candidate
                        .matched_indices
                        .retain(|&index| self.assignment.is_unassigned(index));
                    candidate.score = candidate.matched_indices.len();
                    let subset_total = self
                        .ladder
                        .cumulative_size(candidate.next_subset.saturating_sub(1));
                    let estimate = bound::estimate(candidate.score, subset_total.max(1), new_available);
                    candidate.min_bound = candidate.min_bound.min(estimate.min_bound);
                    candidate.max_bound = candidate.max_bound.min(estimate.max_bound);
                    candidate.expected_value = estimate.expected_value;
                    candidate.max_bound >= config.min_points as f64
                });
            }
        }

        Ok(())
    }

    fn kind_by_tag(&self, tag: ShapeKindTag) -> &dyn ShapeKind {
        self.registry
            .iter()
            .find(|kind| kind.tag() == tag)
            .expect("candidate tag must reference a registered kind")
    }

    fn generate_candidates(
        &mut self,
        config: &DetectionConfig,
        max_level: u32,
        pool: &mut Vec<Candidate>,
        drawn_candidates: &mut u64,
        failed_in_a_row: &mut u64,
    ) {
        let k_max = self.registry.max_minimal_sample_size();

        loop {
            let available = self.assignment.available();
            if available == 0 {
                return;
            }

            let pool_ready = pool.iter().any(|candidate| {
                bound::overlook_probability(
                    candidate.expected_value,
                    available,
                    *drawn_candidates,
                    max_level,
                ) <= config.probability
            });
            if pool_ready {
                return;
            }
            if *failed_in_a_row > FAILED_IN_A_ROW_CEILING {
                return;
            }

            *drawn_candidates += 1;

            let Some(seed_index) = self.pick_unassigned_index() else {
                return;
            };
            let seed = self.points.get(seed_index);
            let level = self.rng.random_range(0..=max_level);

            let Some(sample_indices) = self.indexed_octree.draw_sample_from_cell(
                &seed.position,
                level,
                k_max,
                &self.assignment,
                &mut self.rng,
            ) else {
                *failed_in_a_row += 1;
                continue;
            };

            let sample: Vec<Point> = sample_indices.iter().map(|&i| self.points.get(i)).collect();
            let mut produced_any = false;

            for kind in self.registry.iter() {
                let minimal = kind.minimal_sample_size();
                if minimal > sample.len() {
                    continue;
                }
                let Some(fit) = kind.fit(&sample[..minimal], config.epsilon, config.normal_threshold)
                else {
                    continue;
                };

                let mut candidate = Candidate::new(kind.tag(), fit);
                candidate.refine(
                    kind,
                    &self.ladder,
                    &self.assignment,
                    config.epsilon,
                    config.normal_threshold,
                    available,
                );
                if candidate.max_bound >= config.min_points as f64 {
                    pool.push(candidate);
                    produced_any = true;
                }
            }

            if produced_any {
                *failed_in_a_row = 0;
            } else {
                *failed_in_a_row += 1;
            }
        }
    }

    fn pick_unassigned_index(&mut self) -> Option<usize> {
        let n = self.points.len();
        for _ in 0..UNASSIGNED_PICK_ATTEMPTS {
            let candidate = self.rng.random_range(0..n);
            if self.assignment.is_unassigned(candidate) {
                return Some(candidate);
            }
        }
        let unassigned = self.assignment.unassigned_indices();
        if unassigned.is_empty() {
            return None;
        }
        let pick = self.rng.random_range(0..unassigned.len());
        Some(unassigned[pick])
    }

    /// Candidate selection (§4.5): sort by `max_bound`, refine the best, refine anyone still
    /// overlapping it, and repeat until the best dominates or a refinement round changes
    /// nothing.
    fn select_best(&self, pool: &mut Vec<Candidate>, config: &DetectionConfig) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }
        let available = self.assignment.available();

        loop {
            pool.sort_by(|a, b| {
                b.max_bound
                    .partial_cmp(&a.max_bound)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut any_refined = false;
            if !pool[0].is_fully_refined(&self.ladder) {
                let kind = self.kind_by_tag(pool[0].kind_tag);
                pool[0].refine(
                    kind,
                    &self.ladder,
                    &self.assignment,
                    config.epsilon,
                    config.normal_threshold,
                    available,
                );
                any_refined = true;
            }

            let best_min_bound = pool[0].min_bound;
            for candidate in pool.iter_mut().skip(1) {
                if candidate.max_bound < best_min_bound {
                    break;
                }
                if !candidate.is_fully_refined(&self.ladder) {
                    let kind = self.registry
                        .iter()
                        .find(|k| k.tag() == candidate.kind_tag)
                        .expect("registered kind");
                    candidate.refine(
                        kind,
                        &self.ladder,
                        &self.assignment,
                        config.epsilon,
                        config.normal_threshold,
                        available,
                    );
                    any_refined = true;
                }
            }

            let others_max_bound = pool[1..]
                .iter()
                .map(|c| c.max_bound)
                .fold(f64::NEG_INFINITY, f64::max);
            let dominates = pool[0].min_bound > others_max_bound;
            let all_refined = pool.iter().all(|c| c.is_fully_refined(&self.ladder));

            if dominates || !any_refined || all_refined {
                break;
            }
        }

        pool.sort_by(|a, b| {
            b.max_bound
                .partial_cmp(&a.max_bound)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Some(0)
    }

    fn rescore_on_global_octree(&self, candidate: &mut Candidate, config: &DetectionConfig) {
        let kind = self.kind_by_tag(candidate.kind_tag);
        let probe = CandidateProbe {
            kind,
            fit: &candidate.fit,
        };
        let (count, matched) = self.indexed_octree.score(
            &probe,
            &self.assignment,
            config.epsilon * config.global_rescore_factor,
            config.normal_threshold,
        );
        candidate.score = count;
        candidate.matched_indices = matched;
        candidate.min_bound = count as f64;
        candidate.max_bound = count as f64;
        candidate.expected_value = count as f64;
    }

    fn apply_connected_component_filter(
        &self,
        candidate: &Candidate,
        config: &DetectionConfig,
    ) -> Vec<usize> {
        let kind = self.kind_by_tag(candidate.kind_tag);
        components::largest_connected_component(
            &candidate.matched_indices,
            |index| kind.parametric_coords(&candidate.fit, &self.points.get(index).position),
            config.cluster_epsilon,
        )
    }

    /// Extracted shapes, in extraction order.
    pub fn shapes(&self) -> &[ExtractedShape] {
        &self.extracted_shapes
    }

    /// Indices with no owning shape, in ascending order.
    pub fn unassigned_indices(&self) -> Vec<usize> {
        self.assignment.unassigned_indices()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}
