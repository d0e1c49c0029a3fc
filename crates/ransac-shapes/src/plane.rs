use crate::common::orthonormal_basis;
use nalgebra::{Point3, Vector3};
use ransac_core::{FitParameters, Point, ShapeKind, ShapeKindTag};

/// Fits an unbounded plane from a point and an orientation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plane;

impl ShapeKind for Plane {
    fn tag(&self) -> ShapeKindTag {
        ShapeKindTag::Plane
    }

    fn minimal_sample_size(&self) -> usize {
        3
    }

    fn fit(&self, sample: &[Point], epsilon: f64, normal_threshold: f64) -> Option<FitParameters> {
        let [a, b, c] = sample else { return None };

        let mut normal = (a.normal + b.normal + c.normal) / 3.0;
        if normal.norm() < f64::EPSILON {
            return None;
        }
        normal = normal.normalize();

        for point in [a, b, c] {
            let deviation = 1.0 - point.normal.dot(&normal).abs();
            if deviation > normal_threshold {
                return None;
            }
        }

        let plane_point = a.position;
        for point in [a, b, c] {
            let residual = (point.position - plane_point).dot(&normal).abs();
            if residual > epsilon {
                return None;
            }
        }

        Some(FitParameters::Plane {
            point: plane_point,
            normal,
        })
    }

    fn signed_distance(&self, fit: &FitParameters, position: &Point3<f64>) -> f64 {
        let FitParameters::Plane { point, normal } = fit else {
            panic!("plane kind received a non-plane fit");
        };
        (position - point).dot(normal)
    }

    fn normal_deviation(&self, fit: &FitParameters, _position: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
        let FitParameters::Plane { normal: plane_normal, .. } = fit else {
            panic!("plane kind received a non-plane fit");
        };
        1.0 - plane_normal.dot(normal).abs()
    }

    fn parametric_coords(&self, fit: &FitParameters, position: &Point3<f64>) -> (f64, f64) {
        let FitParameters::Plane { point, normal } = fit else {
            panic!("plane kind received a non-plane fit");
        };
        let (basis_u, basis_v) = orthonormal_basis(normal);
        let offset = position - point;
        (offset.dot(&basis_u), offset.dot(&basis_v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn point(x: f64, y: f64, z: f64, n: Vector3<f64>) -> Point {
        Point::new(Point3::new(x, y, z), n)
    }

    #[test]
    fn fits_axis_aligned_plane_from_coplanar_points() {
        let normal = Vector3::z();
        let sample = [
            point(0.0, 0.0, 0.0, normal),
            point(1.0, 0.0, 0.0, normal),
            point(0.0, 1.0, 0.0, normal),
        ];

        let fit = Plane.fit(&sample, 1e-6, 0.1).expect("should fit");
        let distance = Plane.signed_distance(&fit, &Point3::new(5.0, 5.0, 0.0));
        assert!(distance.abs() < 1e-9);
    }

    #[test]
    fn rejects_sample_with_disagreeing_normals() {
        let sample = [
            point(0.0, 0.0, 0.0, Vector3::z()),
            point(1.0, 0.0, 0.0, Vector3::x()),
            point(0.0, 1.0, 0.0, Vector3::z()),
        ];
        assert!(Plane.fit(&sample, 1e-6, 0.1).is_none());
    }
}
