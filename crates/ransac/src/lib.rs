//! Efficient RANSAC detection of primitive shapes in unstructured 3D point clouds.
//!
//! Given a point cloud with per-point surface normals, the [`Engine`] repeatedly draws
//! minimal samples from an octree-accelerated hierarchy, refines their score bounds across
//! a ladder of geometrically sized random subsets, and commits the best candidate once its
//! overlook probability drops below a configured threshold. Per-shape-kind fitting
//! (plane, sphere, cylinder, cone, torus) is supplied through the [`ShapeKind`] plug-in
//! interface rather than hard-coded into the engine; [`ransac_shapes::register_all`] registers
//! the reference library's five kinds.
//!
//! Point-cloud and detection-result IO (`io`) lives in a sibling crate with its own
//! `serde`/`csv` dependency; the core engine has none.

pub use ransac_core::{
    AssignmentMap, AxisAlignedBoundingBox, AxisAlignedBoundingCube, BoundEstimate, Candidate,
    CandidateProbe, DetectionConfig, DetectionProgress, Engine, Error, ExtractedShape,
    FitParameters, HasAabb, Point, PointStore, ShapeKind, ShapeKindRegistry, ShapeKindTag,
    SubsetLadder, overlook_probability,
};

pub use ransac_shapes as shapes;

pub use ransac_io as io;
