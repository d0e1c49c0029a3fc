mod arguments;
mod commands;

use crate::arguments::{Arguments, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let arguments = Arguments::parse();

    match arguments.command {
        Commands::Detect {
            input_path,
            output_path,
            kinds,
            probability,
            min_points,
            epsilon,
            normal_threshold,
            cluster_epsilon,
            bucket_size,
            global_rescore_factor,
            seed,
            pretty,
        } => commands::detect::run(
            input_path,
            output_path,
            &kinds,
            probability,
            min_points,
            epsilon,
            normal_threshold,
            cluster_epsilon,
            bucket_size,
            global_rescore_factor,
            seed,
            pretty,
        ),
        Commands::Stats { input_path } => commands::stats::run(input_path),
    }
}
