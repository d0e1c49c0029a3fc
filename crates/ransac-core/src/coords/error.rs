use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("lower bound exceeds upper bound")]
    LowerBoundExceedsUpperBound,

    #[error(
        "octree level `{level}` only allows indices of up to `{maximum_index}`, but found ({x}, {y}, {z})"
    )]
    IndexOutOfBounds {
        level: u32,
        maximum_index: u64,
        x: u64,
        y: u64,
        z: u64,
    },
    #[error("index too large for this representation")]
    IndexTooLarge,
    #[error("edge length must be strictly positive")]
    InvalidNumber,

    #[error("cell already occupied")]
    CellAlreadyOccupied,

    #[error("point sequence has no minimum value")]
    NoMinValue,
    #[error("point sequence has no maximum value")]
    NoMaxValue,
}
