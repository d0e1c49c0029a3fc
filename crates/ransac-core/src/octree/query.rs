use crate::assignment::AssignmentMap;
use crate::coords::bounding_box::HasAabb;
use crate::octree::Octree;
use crate::point::{Point, PointStore};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use rand::seq::SliceRandom;

/// A point carried alongside its stable index into the global [`PointStore`].
///
/// Both the indexed (global) and direct (per-subset) octree variants store this same
/// item type; a direct octree simply indexes a subset of the global indices, rather than
/// owning a physically separate contiguous slice.
#[derive(Debug, Clone, Copy)]
pub struct IndexedPoint {
    pub index: usize,
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl IndexedPoint {
    pub fn new(index: usize, point: Point) -> Self {
        Self {
            index,
            position: point.position,
            normal: point.normal,
        }
    }
}

impl HasAabb for IndexedPoint {
    fn center(&self) -> Point3<f64> {
        self.position
    }

    fn min(&self) -> Point3<f64> {
        self.position
    }

    fn max(&self) -> Point3<f64> {
        self.position
    }
}

/// Predicates a registered shape kind must provide for a fitted candidate, used by
/// [`Octree::score`] to test matched points without the octree depending on any
/// concrete shape kind.
pub trait ShapeProbe {
    /// Signed distance of `position` to the fitted surface.
    fn signed_distance(&self, position: &Point3<f64>) -> f64;

    /// Normal deviation (`1 - |cos(angle)|`) of `normal` against the fitted surface at `position`.
    fn normal_deviation(&self, position: &Point3<f64>, normal: &Vector3<f64>) -> f64;
}

pub type PointOctree = Octree<IndexedPoint>;

/// Builds the indexed octree over every point of the store.
pub fn build_indexed(points: &PointStore, bucket_size: usize) -> Result<PointOctree, crate::Error> {
    build_over_indices(points, &(0..points.len()).collect::<Vec<_>>(), bucket_size)
}

/// Builds a direct octree over the given subset of global indices.
pub fn build_direct(
    points: &PointStore,
    subset: &[usize],
    bucket_size: usize,
) -> Result<PointOctree, crate::Error> {
    build_over_indices(points, subset, bucket_size)
}

fn build_over_indices(
    points: &PointStore,
    indices: &[usize],
    bucket_size: usize,
) -> Result<PointOctree, crate::Error> {
    let items: Vec<IndexedPoint> = indices
        .iter()
        .map(|&index| IndexedPoint::new(index, points.get(index)))
        .collect();
    Octree::new(items, bucket_size, None)
}

impl PointOctree {
    /// Depth of the deepest leaf in the tree.
    pub fn max_level(&self) -> u32 {
        self.get_max_occupied_level().unwrap_or(0)
    }

    /// Draws `k` distinct unassigned point indices from the cell at `level` containing `seed`.
    ///
    /// Returns `None` if that cell holds fewer than `k` unassigned points.
    pub fn draw_sample_from_cell(
        &self,
        seed: &Point3<f64>,
        level: u32,
        k: usize,
        assignment: &AssignmentMap,
        rng: &mut impl Rng,
    ) -> Option<Vec<usize>> {
        let level = level.min(self.max_level());
        let target = self.bounds().locate(seed, level);

        let unassigned: Vec<usize> = self
            .cells()
            .iter()
            .filter(|(leaf_index, _)| {
                let clamped_level = leaf_index.level.min(level);
                leaf_index.ancestor_at_level(clamped_level) == target.ancestor_at_level(clamped_level)
            })
            .flat_map(|(_, items)| items.iter())
            .map(|item| item.index)
            .filter(|&index| assignment.is_unassigned(index))
            .collect();

        if unassigned.len() < k {
            return None;
        }

        let mut chosen = unassigned;
        chosen.shuffle(rng);
        chosen.truncate(k);
        Some(chosen)
    }

    /// Counts and collects the unassigned points that pass `probe`'s `epsilon`/`normal_threshold`
    /// tests against every occupied leaf whose cell cannot be ruled out by `epsilon` alone.
    ///
    /// The per-point distance predicates of every registered shape kind are 1-Lipschitz in
    /// the point position, so a leaf can be skipped outright once its bounding cube's
    /// circumscribed radius around the cell center already pushes the candidate's distance
    /// past `epsilon`.
    pub fn score(
        &self,
        probe: &impl ShapeProbe,
        assignment: &AssignmentMap,
        epsilon: f64,
        normal_threshold: f64,
    ) -> (usize, Vec<usize>) {
        let mut matched = Vec::new();

        for (leaf_index, items) in self.cells() {
            let cube = self.bounds().get_octant_bounding_cube(*leaf_index);
            let center_distance = probe.signed_distance(&cube.center()).abs();
            let circumscribed_radius = cube.diagonal().norm() / 2.0;
            if center_distance - circumscribed_radius > epsilon {
                continue;
            }

            for item in items {
                if !assignment.is_unassigned(item.index) {
                    continue;
                }
                if probe.signed_distance(&item.position).abs() > epsilon {
                    continue;
                }
                if probe.normal_deviation(&item.position, &item.normal) > normal_threshold {
                    continue;
                }
                matched.push(item.index);
            }
        }

        (matched.len(), matched)
    }
}
