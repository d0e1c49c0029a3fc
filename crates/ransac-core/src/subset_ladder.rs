use crate::octree::{self, PointOctree};
use crate::point::PointStore;
use rand::Rng;

/// Partitions the available point indices into `K` disjoint subsets of geometrically
/// growing size, each backed by its own direct octree.
///
/// Subset `0` is the smallest, subset `K - 1` the largest; together they cover every
/// point exactly once. Built once at engine construction and read-only afterwards.
#[derive(Debug)]
pub struct SubsetLadder {
    subsets: Vec<Vec<usize>>,
    octrees: Vec<PointOctree>,
}

impl SubsetLadder {
    pub fn build(
        points: &PointStore,
        rng: &mut impl Rng,
        bucket_size: usize,
    ) -> Result<Self, crate::Error> {
        let subsets = partition_indices(points.len(), rng);
        let octrees = subsets
            .iter()
            .map(|subset| octree::build_direct(points, subset, bucket_size))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { subsets, octrees })
    }

    pub fn subset_count(&self) -> usize {
        self.subsets.len()
    }

    pub fn subset(&self, index: usize) -> &[usize] {
        &self.subsets[index]
    }

    pub fn octree(&self, index: usize) -> &PointOctree {
        &self.octrees[index]
    }

    /// Total number of indices in subsets `0..=index`.
    pub fn cumulative_size(&self, index: usize) -> usize {
        self.subsets[..=index].iter().map(Vec::len).sum()
    }
}

/// `K = max(2, floor(log2(n)) - 9)`.
fn subset_count(n: usize) -> usize {
    let floor_log2 = (usize::BITS - 1 - n.leading_zeros()) as i64;
    (floor_log2 - 9).max(2) as usize
}

/// Builds the `K` disjoint subsets described in §4.2: repeatedly halve the still-unpicked
/// indices by flipping a fair coin over each adjacent pair, from the largest subset down
/// to the smallest; whatever remains after the last split becomes subset 0.
fn partition_indices(n: usize, rng: &mut impl Rng) -> Vec<Vec<usize>> {
    let k = subset_count(n);
    let mut subsets: Vec<Vec<usize>> = vec![Vec::new(); k];
    let mut remaining: Vec<usize> = (0..n).collect();

    for s in (1..k).rev() {
        let pair_count = remaining.len() / 2;
        let mut picked = Vec::with_capacity(pair_count);
        let mut kept = Vec::with_capacity(remaining.len() - pair_count);

        for i in 0..pair_count {
            let (a, b) = (remaining[2 * i], remaining[2 * i + 1]);
            if rng.random_bool(0.5) {
                picked.push(a);
                kept.push(b);
            } else {
                picked.push(b);
                kept.push(a);
            }
        }
        if remaining.len() % 2 == 1 {
            kept.push(*remaining.last().expect("odd remainder must have one element"));
        }

        subsets[s] = picked;
        remaining = kept;
    }
    subsets[0] = remaining;
    subsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn subset_count_respects_floor() {
        assert_eq!(subset_count(1), 2);
        assert_eq!(subset_count(100), 2);
        assert_eq!(subset_count(1 << 20), 11);
    }

    #[test]
    fn partition_is_disjoint_and_covers_every_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 5_000;
        let subsets = partition_indices(n, &mut rng);

        let mut seen = HashSet::new();
        for subset in &subsets {
            for &index in subset {
                assert!(seen.insert(index), "index {index} appeared twice");
            }
        }
        assert_eq!(seen.len(), n);
    }

    #[test]
    fn subsets_grow_geometrically() {
        let mut rng = StdRng::seed_from_u64(7);
        let subsets = partition_indices(1 << 16, &mut rng);
        for window in subsets.windows(2) {
            assert!(window[0].len() <= window[1].len() + window[1].len() / 4);
        }
    }
}
