use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Restricts a candidate's matched points to the single largest spatially-connected
/// component, using the shape kind's 2-D parametric embedding.
///
/// Matched points are binned into a grid of cells with side `cluster_epsilon`; an 8-neighbor
/// union-find over occupied cells then identifies connected components, and only the
/// indices belonging to the largest one are kept.
pub fn largest_connected_component(
    matched_indices: &[usize],
    parametric_coords: impl Fn(usize) -> (f64, f64),
    cluster_epsilon: f64,
) -> Vec<usize> {
    if matched_indices.is_empty() {
        return Vec::new();
    }

    let mut cell_of: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (position, &index) in matched_indices.iter().enumerate() {
        let (u, v) = parametric_coords(index);
        let cell = (
            (u / cluster_epsilon).floor() as i64,
            (v / cluster_epsilon).floor() as i64,
        );
        cell_of.entry(cell).or_default().push(position);
    }

    let mut union_find = UnionFind::new(matched_indices.len());
    for (&(cx, cy), positions) in &cell_of {
        for window in positions.windows(2) {
            union_find.union(window[0], window[1]);
        }

        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(neighbor_positions) = cell_of.get(&(cx + dx, cy + dy)) {
                    union_find.union(positions[0], neighbor_positions[0]);
                }
            }
        }
    }

    let mut component_sizes: HashMap<usize, usize> = HashMap::new();
    for position in 0..matched_indices.len() {
        *component_sizes.entry(union_find.find(position)).or_insert(0) += 1;
    }

    // Break size ties on the root index itself rather than `HashMap` iteration order, so the
    // choice of component is reproducible across processes (§8 property 6).
    let Some((&largest_root, _)) = component_sizes
        .iter()
        .max_by(|(&root_a, size_a), (&root_b, size_b)| size_a.cmp(size_b).then(root_b.cmp(&root_a)))
    else {
        return Vec::new();
    };

    matched_indices
        .iter()
        .enumerate()
        .filter(|(position, _)| union_find.find(*position) == largest_root)
        .map(|(_, &index)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cluster_keeps_every_point() {
        let indices = vec![0, 1, 2, 3];
        let coords = |index: usize| (index as f64 * 0.01, 0.0);
        let kept = largest_connected_component(&indices, coords, 0.05);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn two_distant_clusters_keep_only_the_larger() {
        let indices = vec![0, 1, 2, 10, 11];
        let coords = |index: usize| -> (f64, f64) {
            match index {
                0 | 1 | 2 => (index as f64 * 0.01, 0.0),
                _ => (5.0 + index as f64 * 0.01, 0.0),
            }
        };
        let kept = largest_connected_component(&indices, coords, 0.05);
        assert_eq!(kept, vec![0, 1, 2]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let kept = largest_connected_component(&[], |_| (0.0, 0.0), 0.05);
        assert!(kept.is_empty());
    }
}
