mod assignment;
mod bound;
mod candidate;
mod components;
pub mod config;
mod coords;
mod driver;
mod error;
pub mod kind;
pub mod octree;
mod point;
pub mod shape;
mod subset_ladder;

#[doc(inline)]
pub use crate::assignment::AssignmentMap;

#[doc(inline)]
pub use crate::bound::{overlook_probability, BoundEstimate};

#[doc(inline)]
pub use crate::candidate::Candidate;

#[doc(inline)]
pub use crate::config::DetectionConfig;

#[doc(inline)]
pub use crate::driver::{DetectionProgress, Engine};

#[doc(inline)]
pub use crate::error::Error;

#[doc(inline)]
pub use crate::kind::{CandidateProbe, FitParameters, ShapeKind, ShapeKindRegistry, ShapeKindTag};

#[doc(inline)]
pub use crate::point::{Point, PointStore};

#[doc(inline)]
pub use crate::shape::ExtractedShape;

#[doc(inline)]
pub use crate::subset_ladder::SubsetLadder;

#[doc(inline)]
pub use crate::coords::bounding_box::{AxisAlignedBoundingBox, AxisAlignedBoundingCube, HasAabb};

#[doc(inline)]
pub use crate::coords::spherical_point::SphericalPoint3;
