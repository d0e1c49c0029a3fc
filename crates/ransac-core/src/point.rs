use crate::coords::bounding_box::HasAabb;
use nalgebra::{Point3, Vector3};

/// A single point of the input cloud: a position plus a (possibly unoriented) surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Point {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

impl HasAabb for Point {
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

/// Owns the input point sequence and assigns each point a stable zero-based index.
///
/// The sequence may be permuted during construction (subset generation), but is never
/// reordered once detection starts.
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    pub fn new(points: Vec<Point>) -> Result<Self, crate::Error> {
        if points.is_empty() {
            return Err(crate::Error::EmptyInput());
        }

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Point {
        self.points[index]
    }
}
