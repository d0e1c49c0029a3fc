use crate::arguments::Kind;
use anyhow::Result;
use ransac::io::{DetectionWriter, TabularPointReader};
use ransac::{DetectionConfig, Engine};
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[allow(clippy::too_many_arguments)]
pub fn run(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    kinds: &[Kind],
    probability: f64,
    min_points: usize,
    epsilon: f64,
    normal_threshold: f64,
    cluster_epsilon: f64,
    bucket_size: usize,
    global_rescore_factor: f64,
    seed: Option<u64>,
    pretty: bool,
) -> Result<()> {
    let started_at = Instant::now();

    let points = TabularPointReader::from_path(input_path)?.finish()?;
    info!("loaded {} points", points.len());

    let mut engine = Engine::with_seed_and_bucket_size(points, seed, bucket_size)?;
    for kind in kinds {
        engine.register_kind(kind.into_boxed());
    }

    let config = DetectionConfig::new(probability, min_points, epsilon, normal_threshold, cluster_epsilon)?
        .with_global_rescore_factor(global_rescore_factor);
    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };

    engine.detect(config)?;

    for shape in engine.shapes() {
        info!(
            "{}: {} points",
            shape.kind_tag,
            shape.assigned_indices.len()
        );
    }

    DetectionWriter::from_path(output_path)?
        .with_pretty_write(pretty)
        .finish(engine.shapes(), &engine.unassigned_indices())?;

    info!(
        "detected {} shapes in {}",
        engine.shapes().len(),
        humantime::format_duration(started_at.elapsed())
    );

    Ok(())
}
