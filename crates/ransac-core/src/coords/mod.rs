pub mod bounding_box;
pub mod error;
pub mod morton;
pub mod spherical_point;
