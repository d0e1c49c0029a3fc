use ransac_core::{ExtractedShape, FitParameters, ShapeKindTag};
use serde::{Deserialize, Serialize};

/// One row of a tabular point cloud file (`x,y,z,nx,ny,nz`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct PointRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub nx: f64,
    pub ny: f64,
    pub nz: f64,
}

/// The detection result document written by [`crate::DetectionWriter`] (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DetectionDocument {
    pub shapes: Vec<ShapeElement>,
    pub unassigned_indices: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ShapeElement {
    pub id: usize,
    pub kind_tag: String,
    pub fit_parameters: FitParametersElement,
    pub assigned_indices: Vec<usize>,
}

impl From<&ExtractedShape> for ShapeElement {
    fn from(shape: &ExtractedShape) -> Self {
        Self {
            id: shape.id,
            kind_tag: shape.kind_tag.to_string(),
            fit_parameters: FitParametersElement::from(&shape.fit),
            assigned_indices: shape.assigned_indices.clone(),
        }
    }
}

impl TryFrom<ShapeElement> for ExtractedShape {
    type Error = crate::Error;

    fn try_from(element: ShapeElement) -> Result<Self, Self::Error> {
        let kind_tag = parse_kind_tag(&element.kind_tag)?;
        let fit = FitParameters::try_from(element.fit_parameters)?;
        Ok(ExtractedShape::new(
            element.id,
            kind_tag,
            fit,
            element.assigned_indices,
        ))
    }
}

fn parse_kind_tag(value: &str) -> Result<ShapeKindTag, crate::Error> {
    match value {
        "plane" => Ok(ShapeKindTag::Plane),
        "sphere" => Ok(ShapeKindTag::Sphere),
        "cylinder" => Ok(ShapeKindTag::Cylinder),
        "cone" => Ok(ShapeKindTag::Cone),
        "torus" => Ok(ShapeKindTag::Torus),
        other => Err(crate::Error::UnknownShapeKind(other.to_string())),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct Vector3Element {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<nalgebra::Vector3<f64>> for Vector3Element {
    fn from(v: nalgebra::Vector3<f64>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vector3Element> for nalgebra::Vector3<f64> {
    fn from(v: Vector3Element) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Point3<f64>> for Vector3Element {
    fn from(p: nalgebra::Point3<f64>) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }
}

impl From<Vector3Element> for nalgebra::Point3<f64> {
    fn from(v: Vector3Element) -> Self {
        nalgebra::Point3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub(crate) enum FitParametersElement {
    Plane { point: Vector3Element, normal: Vector3Element },
    Sphere { center: Vector3Element, radius: f64 },
    Cylinder { axis_point: Vector3Element, axis_direction: Vector3Element, radius: f64 },
    Cone { apex: Vector3Element, axis_direction: Vector3Element, half_angle: f64 },
    Torus { center: Vector3Element, axis_direction: Vector3Element, major_radius: f64, minor_radius: f64 },
}

impl From<&FitParameters> for FitParametersElement {
    fn from(fit: &FitParameters) -> Self {
        match fit {
            FitParameters::Plane { point, normal } => Self::Plane {
                point: (*point).into(),
                normal: (*normal).into(),
            },
            FitParameters::Sphere { center, radius } => Self::Sphere {
                center: (*center).into(),
                radius: *radius,
            },
            FitParameters::Cylinder { axis_point, axis_direction, radius } => Self::Cylinder {
                axis_point: (*axis_point).into(),
                axis_direction: (*axis_direction).into(),
                radius: *radius,
            },
            FitParameters::Cone { apex, axis_direction, half_angle } => Self::Cone {
                apex: (*apex).into(),
                axis_direction: (*axis_direction).into(),
                half_angle: *half_angle,
            },
            FitParameters::Torus { center, axis_direction, major_radius, minor_radius } => Self::Torus {
                center: (*center).into(),
                axis_direction: (*axis_direction).into(),
                major_radius: *major_radius,
                minor_radius: *minor_radius,
            },
        }
    }
}

impl TryFrom<FitParametersElement> for FitParameters {
    type Error = crate::Error;

    fn try_from(element: FitParametersElement) -> Result<Self, Self::Error> {
        Ok(match element {
            FitParametersElement::Plane { point, normal } => FitParameters::Plane {
                point: point.into(),
                normal: normal.into(),
            },
            FitParametersElement::Sphere { center, radius } => FitParameters::Sphere {
                center: center.into(),
                radius,
            },
            FitParametersElement::Cylinder { axis_point, axis_direction, radius } => {
                FitParameters::Cylinder {
                    axis_point: axis_point.into(),
                    axis_direction: axis_direction.into(),
                    radius,
                }
            }
            FitParametersElement::Cone { apex, axis_direction, half_angle } => FitParameters::Cone {
                apex: apex.into(),
                axis_direction: axis_direction.into(),
                half_angle,
            },
            FitParametersElement::Torus { center, axis_direction, major_radius, minor_radius } => {
                FitParameters::Torus {
                    center: center.into(),
                    axis_direction: axis_direction.into(),
                    major_radius,
                    minor_radius,
                }
            }
        })
    }
}
