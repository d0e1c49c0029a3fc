mod bounds;
mod graph;
mod index;
mod octree;
mod query;

#[doc(inline)]
pub use crate::octree::index::OctantIndex;

#[doc(inline)]
pub use crate::octree::graph::OctreeOccupancyGraph;

#[doc(inline)]
pub use crate::octree::index::VecOctantIndexExt;

#[doc(inline)]
pub use crate::octree::bounds::OctreeBounds;

#[doc(inline)]
pub use crate::octree::octree::Octree;

#[doc(inline)]
pub use crate::octree::query::{IndexedPoint, PointOctree, ShapeProbe, build_direct, build_indexed};
