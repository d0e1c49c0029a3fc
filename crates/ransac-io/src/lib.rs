mod documents;
mod error;
mod points;
mod shapes;

#[doc(inline)]
pub use crate::error::Error;

#[doc(inline)]
pub use crate::points::{FILE_EXTENSION_POINTS_CSV_FORMAT, TabularPointReader, TabularPointWriter};

#[doc(inline)]
pub use crate::shapes::{
    Detection, DetectionReader, DetectionWriter, FILE_EXTENSION_DETECTION_JSON_FORMAT,
};
