use nalgebra::{Point3, Vector3};
use ransac_core::Point;

/// Centroid of a sample's positions.
pub fn centroid(sample: &[Point]) -> Point3<f64> {
    let sum: Vector3<f64> = sample.iter().map(|p| p.position.coords).sum();
    Point3::from(sum / sample.len() as f64)
}

/// Picks the most numerically stable cross product among the sample's pairwise normals —
/// the axis direction of a cylinder, or a local approximation of a torus's axis for a
/// sample drawn from a small surface patch.
pub fn best_axis_direction(sample: &[Point]) -> Option<Vector3<f64>> {
    let mut best: Option<(f64, Vector3<f64>)> = None;
    for i in 0..sample.len() {
        for j in (i + 1)..sample.len() {
            let cross = sample[i].normal.cross(&sample[j].normal);
            let norm = cross.norm();
            if best.as_ref().is_none_or(|(best_norm, _)| norm > *best_norm) {
                best = Some((norm, cross));
            }
        }
    }
    let (norm, cross) = best?;
    if norm < 1e-6 {
        return None;
    }
    Some(cross / norm)
}

/// An arbitrary orthonormal basis for the plane perpendicular to `axis`.
pub fn orthonormal_basis(axis: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let helper = if axis.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    let basis_u = axis.cross(&helper).normalize();
    let basis_v = axis.cross(&basis_u).normalize();
    (basis_u, basis_v)
}
