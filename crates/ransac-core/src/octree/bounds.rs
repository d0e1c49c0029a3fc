use crate::octree::OctantIndex;
use crate::{AxisAlignedBoundingBox, AxisAlignedBoundingCube};
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeBounds {
    /// Bounding box of the content items
    bounding_box: AxisAlignedBoundingBox,

    /// Enclosing cube enlarged to have a power of two edge lengths
    enclosing_cube: AxisAlignedBoundingCube,
}

impl OctreeBounds {
    pub fn new(bounding_box: AxisAlignedBoundingBox) -> Self {
        let enclosing_cube =
            AxisAlignedBoundingCube::from_power_of_two_enclosing_box(&bounding_box);

        Self {
            bounding_box,
            enclosing_cube,
        }
    }

    pub fn bounding_box(&self) -> &AxisAlignedBoundingBox {
        &self.bounding_box
    }

    /// Enclosing cube enlarged to have a power of two edge lengths
    pub fn enclosing_cube(&self) -> &AxisAlignedBoundingCube {
        &self.enclosing_cube
    }

    /// Calculates the axis-aligned bounding cube for a specific octant within the enclosing cube.
    pub fn get_octant_bounding_cube(&self, index: OctantIndex) -> AxisAlignedBoundingCube {
        let octant_edge_length =
            self.enclosing_cube.edge_length() / (2usize.pow(index.level) as f64);

        let lower_bound = self.enclosing_cube.get_lower_bound();
        let octant_lower_bound_x = lower_bound.x + octant_edge_length * (index.x as f64);
        let octant_lower_bound_y = lower_bound.y + octant_edge_length * (index.y as f64);
        let octant_lower_bound_z = lower_bound.z + octant_edge_length * (index.z as f64);
        let octant_lower_bound = Point3::new(
            octant_lower_bound_x,
            octant_lower_bound_y,
            octant_lower_bound_z,
        );

        AxisAlignedBoundingCube::new(octant_lower_bound, octant_edge_length).expect("should work")
    }

    /// Locates the octant index that contains `point` at the given tree `level`.
    ///
    /// Indices are clamped into `[0, 2^level - 1]` so that a point exactly on the
    /// enclosing cube's upper boundary still resolves to a valid octant.
    pub fn locate(&self, point: &Point3<f64>, level: u32) -> OctantIndex {
        let octant_edge_length = self.enclosing_cube.edge_length() / (2usize.pow(level) as f64);
        let lower_bound = self.enclosing_cube.get_lower_bound();
        let maximum_index = 2_u64.pow(level).saturating_sub(1);

        let to_index = |value: f64, origin: f64| -> u64 {
            let raw = ((value - origin) / octant_edge_length).floor();
            if raw < 0.0 {
                0
            } else {
                (raw as u64).min(maximum_index)
            }
        };

        let x = to_index(point.x, lower_bound.x);
        let y = to_index(point.y, lower_bound.y);
        let z = to_index(point.z, lower_bound.z);

        OctantIndex::new_unchecked(level, x, y, z)
    }
}
