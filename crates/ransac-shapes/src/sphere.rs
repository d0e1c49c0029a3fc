use nalgebra::{Point3, Vector3};
use ransac_core::{FitParameters, Point, ShapeKind, ShapeKindTag, SphericalPoint3};

/// Fits a sphere from two oriented points by intersecting their normal rays, confirmed
/// against two further sample points (`minimal_sample_size = 4`, per §4.3).
#[derive(Debug, Default, Clone, Copy)]
pub struct Sphere;

impl ShapeKind for Sphere {
    fn tag(&self) -> ShapeKindTag {
        ShapeKindTag::Sphere
    }

    fn minimal_sample_size(&self) -> usize {
        4
    }

    fn fit(&self, sample: &[Point], epsilon: f64, normal_threshold: f64) -> Option<FitParameters> {
        let [a, b, confirm_1, confirm_2] = sample else {
            return None;
        };

        let (center, radius) = intersect_normal_rays(a, b)?;
        if radius <= 0.0 || !radius.is_finite() {
            return None;
        }

        for point in [a, b, confirm_1, confirm_2] {
            let residual = ((point.position - center).norm() - radius).abs();
            if residual > epsilon {
                return None;
            }
            let outward = (point.position - center).normalize();
            let deviation = 1.0 - outward.dot(&point.normal).abs();
            if deviation > normal_threshold {
                return None;
            }
        }

        Some(FitParameters::Sphere { center, radius })
    }

    fn signed_distance(&self, fit: &FitParameters, position: &Point3<f64>) -> f64 {
        let FitParameters::Sphere { center, radius } = fit else {
            panic!("sphere kind received a non-sphere fit");
        };
        (position - center).norm() - radius
    }

    fn normal_deviation(&self, fit: &FitParameters, position: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
        let FitParameters::Sphere { center, .. } = fit else {
            panic!("sphere kind received a non-sphere fit");
        };
        let offset = position - center;
        if offset.norm() < f64::EPSILON {
            return 1.0;
        }
        1.0 - offset.normalize().dot(normal).abs()
    }

    fn parametric_coords(&self, fit: &FitParameters, position: &Point3<f64>) -> (f64, f64) {
        let FitParameters::Sphere { center, radius } = fit else {
            panic!("sphere kind received a non-sphere fit");
        };
        let relative: Point3<f64> = *position - center.coords;
        let spherical: SphericalPoint3<f64> = relative.into();
        (spherical.phi * radius, spherical.theta * radius)
    }
}

/// Finds the point equidistant from `a` and `b` along each point's outward normal ray, and
/// the common distance to it. Solves `a + s·na = b + t·nb` in the least-squares sense.
fn intersect_normal_rays(a: &Point, b: &Point) -> Option<(Point3<f64>, f64)> {
    let na = a.normal;
    let nb = b.normal;
    let delta = b.position - a.position;

    let a_dot_a = na.dot(&na);
    let a_dot_b = na.dot(&nb);
    let b_dot_b = nb.dot(&nb);
    let denominator = a_dot_a * b_dot_b - a_dot_b * a_dot_b;
    if denominator.abs() < 1e-12 {
        return None;
    }

    let d_dot_a = delta.dot(&na);
    let d_dot_b = delta.dot(&nb);

    let s = (d_dot_a * b_dot_b - d_dot_b * a_dot_b) / denominator;
    let t = (d_dot_a * a_dot_b - d_dot_b * a_dot_a) / denominator;

    let point_on_a = a.position + na * s;
    let point_on_b = b.position + nb * t;
    let center = nalgebra::center(&point_on_a, &point_on_b);

    let radius = ((a.position - center).norm() + (b.position - center).norm()) / 2.0;
    Some((center, radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, z: f64, center: Point3<f64>) -> Point {
        let position = Point3::new(x, y, z);
        let normal = (position - center).normalize();
        Point::new(position, normal)
    }

    #[test]
    fn fits_sphere_from_points_on_its_surface() {
        let center = Point3::new(1.0, 2.0, 3.0);
        let radius = 5.0;
        let sample = [
            point(center.x + radius, center.y, center.z, center),
            point(center.x, center.y + radius, center.z, center),
            point(center.x, center.y, center.z + radius, center),
            point(center.x - radius, center.y, center.z, center),
        ];

        let fit = Sphere.fit(&sample, 1e-6, 0.1).expect("should fit");
        let FitParameters::Sphere { center: fitted_center, radius: fitted_radius } = fit else {
            panic!("expected sphere fit");
        };
        assert!((fitted_center - center).norm() < 1e-6);
        assert!((fitted_radius - radius).abs() < 1e-6);
    }
}
