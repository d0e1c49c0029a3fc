use crate::common::orthonormal_basis;
use nalgebra::{Matrix3, Point3, Vector3};
use ransac_core::{FitParameters, Point, ShapeKind, ShapeKindTag};

/// Fits a right circular cone from three oriented points (§4.3).
///
/// The surface normal at any point is perpendicular to the generator line through the apex,
/// so `n_i · (apex - p_i) = 0` for each sample point — three linear equations in the apex's
/// three unknown coordinates. The axis direction follows from the normals alone: since
/// `n_i · axis` is the same constant (`sin(half_angle)`) at every surface point, the axis is
/// orthogonal to every pairwise difference of sample normals.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cone;

impl ShapeKind for Cone {
    fn tag(&self) -> ShapeKindTag {
        ShapeKindTag::Cone
    }

    fn minimal_sample_size(&self) -> usize {
        3
    }

    fn fit(&self, sample: &[Point], epsilon: f64, normal_threshold: f64) -> Option<FitParameters> {
        let [a, b, c] = sample else { return None };

        let mut axis_direction = (a.normal - b.normal).cross(&(a.normal - c.normal));
        if axis_direction.norm() < 1e-9 {
            return None;
        }
        axis_direction = axis_direction.normalize();

        let normal_matrix = Matrix3::from_rows(&[
            a.normal.transpose(),
            b.normal.transpose(),
            c.normal.transpose(),
        ]);
        let rhs = Vector3::new(
            a.normal.dot(&a.position.coords),
            b.normal.dot(&b.position.coords),
            c.normal.dot(&c.position.coords),
        );
        let apex = Point3::from(normal_matrix.try_inverse()? * rhs);

        let generator_sum: Vector3<f64> = [a, b, c]
            .iter()
            .map(|point| point.position - apex)
            .sum();
        if generator_sum.dot(&axis_direction) < 0.0 {
            axis_direction = -axis_direction;
        }

        let half_angle = [a, b, c]
            .iter()
            .map(|point| generator_angle(&apex, &axis_direction, point.position))
            .sum::<f64>()
            / 3.0;
        if !(0.01..(std::f64::consts::FRAC_PI_2 - 0.01)).contains(&half_angle) {
            return None;
        }

        let fit = FitParameters::Cone {
            apex,
            axis_direction,
            half_angle,
        };

        for point in [a, b, c] {
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
        let FitParameters::Cone { apex, axis_direction, half_angle } = fit else {
            panic!("cone kind received a non-cone fit");
        };
        let offset = position - apex;
        let axial = offset.dot(axis_direction);
        let radial = offset - axis_direction * axial;
        radial.norm() * half_angle.cos() - axial * half_angle.sin()
    }

    fn normal_deviation(&self, fit: &FitParameters, position: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
        let FitParameters::Cone { apex, axis_direction, half_angle } = fit else {
            panic!("cone kind received a non-cone fit");
        };
        let offset = position - apex;
        let axial = offset.dot(axis_direction);
        let radial = offset - axis_direction * axial;
        if radial.norm() < f64::EPSILON {
            return 1.0;
        }
        let ideal_normal = radial.normalize() * half_angle.cos() - axis_direction * half_angle.sin();
        1.0 - ideal_normal.dot(normal).abs()
    }

    fn parametric_coords(&self, fit: &FitParameters, position: &Point3<f64>) -> (f64, f64) {
        let FitParameters::Cone { apex, axis_direction, half_angle } = fit else {
            panic!("cone kind received a non-cone fit");
        };
        let (basis_u, basis_v) = orthonormal_basis(axis_direction);
        let offset = position - apex;
        let axial = offset.dot(axis_direction);
        let radial = offset - axis_direction * axial;
        let angle = radial.dot(&basis_v).atan2(radial.dot(&basis_u));
        let slant = axial / half_angle.cos().max(1e-9);
        (angle * slant * half_angle.sin(), axial)
    }
}

fn generator_angle(apex: &Point3<f64>, axis_direction: &Vector3<f64>, position: Point3<f64>) -> f64 {
    let generator = (position - apex).normalize();
    generator.dot(axis_direction).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn point_on_cone(apex: Point3<f64>, half_angle: f64, axial: f64, angle: f64) -> Point {
        let radius = axial * half_angle.tan();
        let position = apex + Vector3::new(radius * angle.cos(), radius * angle.sin(), axial);
        let radial = Vector3::new(angle.cos(), angle.sin(), 0.0);
        let normal = (radial * half_angle.cos() - Vector3::z() * half_angle.sin()).normalize();
        Point::new(position, normal)
    }

    #[test]
    fn fits_cone_from_points_on_its_surface() {
        let apex = Point3::new(0.0, 0.0, 0.0);
        let half_angle = 0.4;
        let sample = [
            point_on_cone(apex, half_angle, 2.0, 0.0),
            point_on_cone(apex, half_angle, 3.0, TAU / 3.0),
            point_on_cone(apex, half_angle, 4.0, 2.0 * TAU / 3.0),
        ];

        let fit = Cone.fit(&sample, 1e-6, 0.1).expect("should fit");
        let FitParameters::Cone { half_angle: fitted_angle, .. } = fit else {
            panic!("expected cone fit");
        };
        assert!((fitted_angle - half_angle).abs() < 1e-6);
    }
}
