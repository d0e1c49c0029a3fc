use crate::common::{best_axis_direction, centroid, orthonormal_basis};
use nalgebra::{Point3, Vector3};
use ransac_core::{FitParameters, Point, ShapeKind, ShapeKindTag};

/// Fits a torus assuming a shared axis of revolution (§4.3).
///
/// The axis direction is estimated the same way as [`crate::cylinder::Cylinder`]'s, from the
/// sample normals' pairwise cross products; since a RANSAC minimal sample is drawn from one
/// small octree cell, its points span a narrow arc of the major angle, where the tube locally
/// resembles a cylinder. The axis is then assumed to pass through the sample centroid, and the
/// major/minor radii are read off the points' radial distance and height relative to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Torus;

impl ShapeKind for Torus {
    fn tag(&self) -> ShapeKindTag {
        ShapeKindTag::Torus
    }

    fn minimal_sample_size(&self) -> usize {
        4
    }

    fn fit(&self, sample: &[Point], epsilon: f64, normal_threshold: f64) -> Option<FitParameters> {
        let axis_direction = best_axis_direction(sample)?;
        let axis_point = centroid(sample);

        let meridian: Vec<(f64, f64)> = sample
            .iter()
            .map(|point| {
                let offset = point.position - axis_point;
                let axial = offset.dot(&axis_direction);
                let radial = (offset - axis_direction * axial).norm();
                (radial, axial)
            })
            .collect();

        let major_radius = meridian.iter().map(|(rho, _)| rho).sum::<f64>() / meridian.len() as f64;
        if major_radius <= 0.0 {
            return None;
        }
        let minor_radius = meridian
            .iter()
            .map(|(rho, h)| ((rho - major_radius).powi(2) + h.powi(2)).sqrt())
            .sum::<f64>()
            / meridian.len() as f64;
        if minor_radius <= 0.0 || !minor_radius.is_finite() {
            return None;
        }

        let fit = FitParameters::Torus {
            center: axis_point,
            axis_direction,
            major_radius,
            minor_radius,
        };

        for point in sample {
            if self.signed_distance(&fit, &point.position).abs() > epsilon {
                return None;
            }
            if self.normal_deviation(&fit, &point.position, &point.normal) > normal_threshold {
                return None;
            }
        }

        Some(fit)
    }

    fn signed_distance(&self, fit: &FitParameters, position: &Point3<f64>) -> f64 {
        let (ring_center, tube_radius) = ring_center_and_tube_radius(fit, position);
        (position - ring_center).norm() - tube_radius
    }

    fn normal_deviation(&self, fit: &FitParameters, position: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
        let (ring_center, _) = ring_center_and_tube_radius(fit, position);
        let offset = position - ring_center;
        if offset.norm() < f64::EPSILON {
            return 1.0;
        }
        1.0 - offset.normalize().dot(normal).abs()
    }

    fn parametric_coords(&self, fit: &FitParameters, position: &Point3<f64>) -> (f64, f64) {
        let FitParameters::Torus { center, axis_direction, major_radius, minor_radius } = fit else {
            panic!("torus kind received a non-torus fit");
        };
        let (basis_u, basis_v) = orthonormal_basis(axis_direction);
        let offset = position - center;
        let axial = offset.dot(axis_direction);
        let radial_vector = offset - axis_direction * axial;
        let major_angle = radial_vector.dot(&basis_v).atan2(radial_vector.dot(&basis_u));

        let radial_distance = radial_vector.norm();
        let minor_angle = axial.atan2(radial_distance - major_radius);

        (major_angle * major_radius, minor_angle * minor_radius)
    }
}

/// The center of the meridian (tube cross-section) circle closest to `position`, and the
/// tube radius — used by both `signed_distance` and `normal_deviation`.
fn ring_center_and_tube_radius(fit: &FitParameters, position: &Point3<f64>) -> (Point3<f64>, f64) {
    let FitParameters::Torus { center, axis_direction, major_radius, minor_radius } = fit else {
        panic!("torus kind received a non-torus fit");
    };
    let offset = position - center;
    let axial = offset.dot(axis_direction);
    let radial_vector = offset - axis_direction * axial;
    let radial_direction = if radial_vector.norm() > f64::EPSILON {
        radial_vector.normalize()
    } else {
        orthonormal_basis(axis_direction).0
    };
    let ring_center = *center + radial_direction * (*major_radius);
    (ring_center, *minor_radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_on_torus(
        center: Point3<f64>,
        axis: Vector3<f64>,
        major_radius: f64,
        minor_radius: f64,
        major_angle: f64,
        minor_angle: f64,
    ) -> Point {
        let (basis_u, basis_v) = orthonormal_basis(&axis);
        let radial_direction = basis_u * major_angle.cos() + basis_v * major_angle.sin();
        let ring_center = center + radial_direction * major_radius;
        let position = ring_center
            + radial_direction * (minor_radius * minor_angle.cos())
            + axis * (minor_radius * minor_angle.sin());
        let normal = radial_direction * minor_angle.cos() + axis * minor_angle.sin();
        Point::new(position, normal)
    }

    #[test]
    fn fits_torus_from_a_narrow_local_patch() {
        let center = Point3::new(0.0, 0.0, 0.0);
        let axis = Vector3::z();
        let major_radius = 10.0;
        let minor_radius = 2.0;

        let sample = [
            point_on_torus(center, axis, major_radius, minor_radius, 0.0, 0.0),
            point_on_torus(center, axis, major_radius, minor_radius, 0.02, 0.3),
            point_on_torus(center, axis, major_radius, minor_radius, -0.02, -0.3),
            point_on_torus(center, axis, major_radius, minor_radius, 0.01, 1.5),
        ];

        let fit = Torus.fit(&sample, 1e-2, 0.2).expect("should fit");
        let FitParameters::Torus { major_radius: fitted_major, minor_radius: fitted_minor, .. } = fit
        else {
            panic!("expected torus fit");
        };
        assert!((fitted_major - major_radius).abs() < 0.5);
        assert!((fitted_minor - minor_radius).abs() < 0.5);
    }
}
