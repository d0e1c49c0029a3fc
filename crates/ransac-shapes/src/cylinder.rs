use crate::common::{best_axis_direction, centroid, orthonormal_basis};
use nalgebra::{Matrix3, Point3, Vector3};
use ransac_core::{FitParameters, Point, ShapeKind, ShapeKindTag};

/// Fits a cylinder: axis direction from two sample normals' cross product, axis point and
/// radius from a least-squares circle fit of the sample projected onto the plane
/// perpendicular to that axis (§4.3).
#[derive(Debug, Default, Clone, Copy)]
pub struct Cylinder;

impl ShapeKind for Cylinder {
    fn tag(&self) -> ShapeKindTag {
        ShapeKindTag::Cylinder
    }

    fn minimal_sample_size(&self) -> usize {
        4
    }

    fn fit(&self, sample: &[Point], epsilon: f64, normal_threshold: f64) -> Option<FitParameters> {
        let axis_direction = best_axis_direction(sample)?;
        let (basis_u, basis_v) = orthonormal_basis(&axis_direction);
        let origin = centroid(sample);

        let projected: Vec<(f64, f64)> = sample
            .iter()
            .map(|point| {
                let offset = point.position - origin;
                (offset.dot(&basis_u), offset.dot(&basis_v))
            })
            .collect();

        let (center_u, center_v, radius) = fit_circle(&projected)?;
        if radius <= 0.0 || !radius.is_finite() {
            return None;
        }
        let axis_point = origin + basis_u * center_u + basis_v * center_v;

        for point in sample {
            let offset = point.position - axis_point;
            let axial = offset.dot(&axis_direction);
            let radial = offset - axis_direction * axial;
            let residual = (radial.norm() - radius).abs();
            if residual > epsilon {
                return None;
            }
            if radial.norm() < f64::EPSILON {
                return None;
            }
            let deviation = 1.0 - radial.normalize().dot(&point.normal).abs();
            if deviation > normal_threshold {
                return None;
            }
        }

        Some(FitParameters::Cylinder {
            axis_point,
            axis_direction,
            radius,
        })
    }

    fn signed_distance(&self, fit: &FitParameters, position: &Point3<f64>) -> f64 {
        let FitParameters::Cylinder { axis_point, axis_direction, radius } = fit else {
            panic!("cylinder kind received a non-cylinder fit");
        };
        let offset = position - axis_point;
        let axial = offset.dot(axis_direction);
        let radial = offset - axis_direction * axial;
        radial.norm() - radius
    }

    fn normal_deviation(&self, fit: &FitParameters, position: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
        let FitParameters::Cylinder { axis_point, axis_direction, .. } = fit else {
            panic!("cylinder kind received a non-cylinder fit");
        };
        let offset = position - axis_point;
        let axial = offset.dot(axis_direction);
        let radial = offset - axis_direction * axial;
        if radial.norm() < f64::EPSILON {
            return 1.0;
        }
        1.0 - radial.normalize().dot(normal).abs()
    }

    fn parametric_coords(&self, fit: &FitParameters, position: &Point3<f64>) -> (f64, f64) {
        let FitParameters::Cylinder { axis_point, axis_direction, radius } = fit else {
            panic!("cylinder kind received a non-cylinder fit");
        };
        let (basis_u, basis_v) = orthonormal_basis(axis_direction);
        let offset = position - axis_point;
        let axial = offset.dot(axis_direction);
        let radial = offset - axis_direction * axial;
        let angle = radial.dot(&basis_v).atan2(radial.dot(&basis_u));
        (axial, angle * radius)
    }
}

/// Algebraic (Kasa) least-squares circle fit: minimizes `Σ (x² + y² + Dx + Ey + F)²`.
fn fit_circle(points: &[(f64, f64)]) -> Option<(f64, f64, f64)> {
    let mut normal_matrix = Matrix3::zeros();
    let mut rhs = Vector3::zeros();

    for &(x, y) in points {
        let row = Vector3::new(x, y, 1.0);
        let target = -(x * x + y * y);
        normal_matrix += row * row.transpose();
        rhs += row * target;
    }

    let solution = normal_matrix.try_inverse()? * rhs;
    let (d, e, f) = (solution.x, solution.y, solution.z);
    let center_u = -d / 2.0;
    let center_v = -e / 2.0;
    let radius_squared = center_u * center_u + center_v * center_v - f;
    if radius_squared <= 0.0 {
        return None;
    }
    Some((center_u, center_v, radius_squared.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn point_on_cylinder(angle: f64, axial: f64, radius: f64) -> Point {
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        let position = Point3::new(x, y, axial);
        let normal = Vector3::new(angle.cos(), angle.sin(), 0.0);
        Point::new(position, normal)
    }

    #[test]
    fn fits_cylinder_from_points_on_its_surface() {
        let radius = 2.0;
        let sample = [
            point_on_cylinder(0.0, 0.0, radius),
            point_on_cylinder(TAU / 4.0, 1.0, radius),
            point_on_cylinder(TAU / 2.0, -1.0, radius),
            point_on_cylinder(3.0 * TAU / 4.0, 0.5, radius),
        ];

        let fit = Cylinder.fit(&sample, 1e-6, 0.1).expect("should fit");
        let FitParameters::Cylinder { radius: fitted_radius, .. } = fit else {
            panic!("expected cylinder fit");
        };
        assert!((fitted_radius - radius).abs() < 1e-6);
    }
}
