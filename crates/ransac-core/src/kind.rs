use crate::octree::ShapeProbe;
use crate::point::Point;
use nalgebra::{Point3, Vector3};
use std::fmt;
use strum_macros::EnumIter;

/// Discriminates the primitive family a [`Candidate`](crate::candidate::Candidate) or
/// [`ExtractedShape`](crate::shape::ExtractedShape) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ShapeKindTag {
    Plane,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

impl fmt::Display for ShapeKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plane => "plane",
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Cone => "cone",
            Self::Torus => "torus",
        };
        write!(f, "{name}")
    }
}

/// The fitted numeric parameters of a shape, tagged by primitive family.
///
/// A closed tagged union rather than an open `Box<dyn Any>`: the reference library supports
/// exactly the five primitive families named in [`ShapeKindTag`], so every concrete
/// [`ShapeKind`] produces and consumes one of these variants directly.
#[derive(Debug, Clone, PartialEq)]
pub enum FitParameters {
    Plane {
        point: Point3<f64>,
        normal: Vector3<f64>,
    },
    Sphere {
        center: Point3<f64>,
        radius: f64,
    },
    Cylinder {
        axis_point: Point3<f64>,
        axis_direction: Vector3<f64>,
        radius: f64,
    },
    Cone {
        apex: Point3<f64>,
        axis_direction: Vector3<f64>,
        half_angle: f64,
    },
    Torus {
        center: Point3<f64>,
        axis_direction: Vector3<f64>,
        major_radius: f64,
        minor_radius: f64,
    },
}

impl FitParameters {
    pub fn tag(&self) -> ShapeKindTag {
        match self {
            Self::Plane { .. } => ShapeKindTag::Plane,
            Self::Sphere { .. } => ShapeKindTag::Sphere,
            Self::Cylinder { .. } => ShapeKindTag::Cylinder,
            Self::Cone { .. } => ShapeKindTag::Cone,
            Self::Torus { .. } => ShapeKindTag::Torus,
        }
    }
}

/// External contract a primitive family plugs into the engine through (§6.2).
///
/// Implementors live in a separate crate; the engine depends only on this trait.
pub trait ShapeKind: Send + Sync {
    fn tag(&self) -> ShapeKindTag;

    /// Number of oriented points a minimal sample must contain.
    fn minimal_sample_size(&self) -> usize;

    /// Attempts a fit from a minimal sample, rejecting it if the residual on the sample
    /// exceeds `epsilon` or any pairwise normal deviation exceeds `normal_threshold`.
    fn fit(&self, sample: &[Point], epsilon: f64, normal_threshold: f64) -> Option<FitParameters>;

    fn signed_distance(&self, fit: &FitParameters, position: &Point3<f64>) -> f64;

    /// `1 - |cos(angle)|` between `normal` and the fitted surface's normal at `position`.
    fn normal_deviation(
        &self,
        fit: &FitParameters,
        position: &Point3<f64>,
        normal: &Vector3<f64>,
    ) -> f64;

    /// A 2-D embedding used exclusively by the connected-component filter; need not be
    /// conformal, only locally metric within `cluster_epsilon`.
    fn parametric_coords(&self, fit: &FitParameters, position: &Point3<f64>) -> (f64, f64);
}

/// Binds a `&dyn ShapeKind` to one fitted instance so the octree can score it without
/// knowing about shape kinds at all.
pub struct CandidateProbe<'a> {
    pub kind: &'a dyn ShapeKind,
    pub fit: &'a FitParameters,
}

impl ShapeProbe for CandidateProbe<'_> {
    fn signed_distance(&self, position: &Point3<f64>) -> f64 {
        self.kind.signed_distance(self.fit, position)
    }

    fn normal_deviation(&self, position: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
        self.kind.normal_deviation(self.fit, position, normal)
    }
}

/// Small polymorphic table of registered primitive families.
#[derive(Default)]
pub struct ShapeKindRegistry {
    kinds: Vec<Box<dyn ShapeKind>>,
}

impl ShapeKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: Box<dyn ShapeKind>) {
        self.kinds.push(kind);
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ShapeKind> {
        self.kinds.iter().map(AsRef::as_ref)
    }

    pub fn max_minimal_sample_size(&self) -> usize {
        self.kinds
            .iter()
            .map(|kind| kind.minimal_sample_size())
            .max()
            .unwrap_or(0)
    }

    /// Tags named in [`ShapeKindTag`] with no registered kind backing them.
    pub fn missing_tags(&self) -> Vec<ShapeKindTag> {
        use strum::IntoEnumIterator;
        ShapeKindTag::iter()
            .filter(|tag| self.kinds.iter().all(|kind| kind.tag() != *tag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tags_reports_every_unregistered_kind_on_an_empty_registry() {
        use strum::IntoEnumIterator;
        let registry = ShapeKindRegistry::new();
        assert_eq!(registry.missing_tags().len(), ShapeKindTag::iter().count());
    }
}
