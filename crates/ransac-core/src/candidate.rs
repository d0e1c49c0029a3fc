use crate::assignment::AssignmentMap;
use crate::bound;
use crate::kind::{CandidateProbe, FitParameters, ShapeKind, ShapeKindTag};
use crate::subset_ladder::SubsetLadder;

/// A tentatively-fitted shape under active evaluation.
///
/// `score` and `matched_indices` are cumulative across subsets `0..next_subset`. Candidates
/// are created and owned exclusively by the detection driver's candidate pool.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub kind_tag: ShapeKindTag,
    pub fit: FitParameters,
    pub score: usize,
    pub next_subset: usize,
    pub matched_indices: Vec<usize>,
    pub min_bound: f64,
    pub max_bound: f64,
    pub expected_value: f64,
}

impl Candidate {
    pub fn new(kind_tag: ShapeKindTag, fit: FitParameters) -> Self {
        Self {
            kind_tag,
            fit,
            score: 0,
            next_subset: 0,
            matched_indices: Vec::new(),
            min_bound: 0.0,
            max_bound: f64::INFINITY,
            expected_value: 0.0,
        }
    }

    pub fn is_fully_refined(&self, ladder: &SubsetLadder) -> bool {
        self.next_subset >= ladder.subset_count()
    }

    /// Scores the candidate against its next unexamined subset, accumulates the match,
    /// advances `next_subset`, and tightens the probabilistic bound.
    ///
    /// Bounds are clamped against their previous values so they never widen as more subsets
    /// are inspected, independent of any noise in the underlying interval formula.
    pub fn refine(
        &mut self,
        kind: &dyn ShapeKind,
        ladder: &SubsetLadder,
        assignment: &AssignmentMap,
        epsilon: f64,
        normal_threshold: f64,
        available: usize,
    ) {
        if self.is_fully_refined(ladder) {
            return;
        }

        let subset_index = self.next_subset;
        let probe = CandidateProbe {
            kind,
            fit: &self.fit,
        };
        let (matched_count, matched) =
            ladder
                .octree(subset_index)
                .score(&probe, assignment, epsilon, normal_threshold);

        self.score += matched_count;
        self.matched_indices.extend(matched);
        self.next_subset += 1;

        let subset_total = ladder.cumulative_size(subset_index);
        let estimate = bound::estimate(self.score, subset_total, available);

        self.min_bound = self.min_bound.max(estimate.min_bound);
        self.max_bound = self.max_bound.min(estimate.max_bound);
        self.expected_value = estimate.expected_value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn new_candidate_has_unbounded_max_bound() {
        let candidate = Candidate::new(
            ShapeKindTag::Plane,
            FitParameters::Plane {
                point: Point3::origin(),
                normal: Vector3::z(),
            },
        );
        assert_eq!(candidate.score, 0);
        assert_eq!(candidate.next_subset, 0);
        assert_eq!(candidate.min_bound, 0.0);
        assert!(candidate.max_bound.is_infinite());
    }
}
