use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("point sequence must not be empty")]
    EmptyInput(),

    #[error("probability must lie in (0, 1], got `{0}`")]
    InvalidProbability(f64),

    #[error("epsilon must be strictly positive, got `{0}`")]
    InvalidEpsilon(f64),

    #[error("normal_threshold must lie in [0, 1], got `{0}`")]
    InvalidNormalThreshold(f64),

    #[error("cluster_epsilon must be strictly positive, got `{0}`")]
    InvalidClusterEpsilon(f64),

    #[error(transparent)]
    Octree(#[from] crate::coords::error::Error),
}
