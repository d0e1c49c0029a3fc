use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, propagate_version = true)]
pub struct Arguments {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run shape detection over a point cloud and write the extracted-shape document
    Detect {
        /// Path to the tabular point cloud file (`x,y,z,nx,ny,nz` CSV)
        #[clap(short, long)]
        input_path: PathBuf,

        /// Path the detection result document is written to (JSON)
        #[clap(short, long)]
        output_path: PathBuf,

        /// Shape kinds to register; defaults to all five reference kinds
        #[clap(long, value_enum, num_args = 0.., default_values_t = Kind::ALL)]
        kinds: Vec<Kind>,

        /// Maximum tolerated overlook probability per shape
        #[clap(long, default_value_t = 0.01)]
        probability: f64,

        /// Minimum support (point count) for a shape to be returned
        #[clap(long, default_value_t = 200)]
        min_points: usize,

        /// Maximum signed distance of a matched point to the fitted surface
        #[clap(long, default_value_t = 0.02)]
        epsilon: f64,

        /// Maximum normal deviation (1 - |cos|) of a matched point
        #[clap(long, default_value_t = 0.9)]
        normal_threshold: f64,

        /// Maximum intra-cluster gap for the connected-component filter
        #[clap(long, default_value_t = 0.05)]
        cluster_epsilon: f64,

        /// Octree leaf capacity
        #[clap(long, default_value_t = 10)]
        bucket_size: usize,

        /// Tolerance multiplier for the global-octree rescore pass
        #[clap(long, default_value_t = 3.0)]
        global_rescore_factor: f64,

        /// Seed for the engine's random generator, for reproducible runs
        #[clap(long)]
        seed: Option<u64>,

        /// Format the output with indentation and line breaks for readability
        #[clap(long, default_value_t = false)]
        pretty: bool,
    },

    /// Report point count, bounding box, and normal sanity without running detection
    Stats {
        /// Path to the tabular point cloud file (`x,y,z,nx,ny,nz` CSV)
        #[clap(short, long)]
        input_path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Plane,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Plane, Kind::Sphere, Kind::Cylinder, Kind::Cone, Kind::Torus];

    pub fn into_boxed(self) -> Box<dyn ransac::ShapeKind> {
        match self {
            Kind::Plane => Box::new(ransac::shapes::Plane),
            Kind::Sphere => Box::new(ransac::shapes::Sphere),
            Kind::Cylinder => Box::new(ransac::shapes::Cylinder),
            Kind::Cone => Box::new(ransac::shapes::Cone),
            Kind::Torus => Box::new(ransac::shapes::Torus),
        }
    }
}
