use anyhow::Result;
use nalgebra::Point3;
use ransac::AxisAlignedBoundingBox;
use ransac::io::TabularPointReader;
use std::path::Path;
use tracing::info;

const NEAR_ZERO_NORMAL_LENGTH: f64 = 1e-6;

pub fn run(input_path: impl AsRef<Path>) -> Result<()> {
    info!("input path: {}", input_path.as_ref().display());

    let points = TabularPointReader::from_path(input_path)?.finish()?;
    info!("point count: {}", points.len());

    if points.is_empty() {
        return Ok(());
    }

    let mut lower_bound = points[0].position;
    let mut upper_bound = points[0].position;
    let mut near_zero_normals = 0usize;
    for point in &points {
        lower_bound = Point3::new(
            lower_bound.x.min(point.position.x),
            lower_bound.y.min(point.position.y),
            lower_bound.z.min(point.position.z),
        );
        upper_bound = Point3::new(
            upper_bound.x.max(point.position.x),
            upper_bound.y.max(point.position.y),
            upper_bound.z.max(point.position.z),
        );
        if point.normal.norm() < NEAR_ZERO_NORMAL_LENGTH {
            near_zero_normals += 1;
        }
    }
    let bounding_box = AxisAlignedBoundingBox::new(lower_bound, upper_bound)?;

    info!(
        "bounding box: [{}, {}, {}] .. [{}, {}, {}]",
        bounding_box.lower_bound().x,
        bounding_box.lower_bound().y,
        bounding_box.lower_bound().z,
        bounding_box.upper_bound().x,
        bounding_box.upper_bound().y,
        bounding_box.upper_bound().z,
    );
    info!(
        "near-zero-length normals: {near_zero_normals} / {} ({:.4}%)",
        points.len(),
        100.0 * near_zero_normals as f64 / points.len() as f64
    );

    Ok(())
}
