use crate::Error;
use crate::Error::{InvalidFileExtension, NoFileExtension};
use crate::documents::{DetectionDocument, ShapeElement};
use ransac_core::ExtractedShape;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

pub const FILE_EXTENSION_DETECTION_JSON_FORMAT: &str = "json";

/// Sets up a reader for a detection result document (§4.8).
#[derive(Debug, Clone)]
pub struct DetectionReader<R: Read> {
    reader: R,
}

/// The shapes and still-unassigned indices read back from a detection result document.
#[derive(Debug, Clone)]
pub struct Detection {
    pub shapes: Vec<ExtractedShape>,
    pub unassigned_indices: Vec<usize>,
}

impl<R: Read> DetectionReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn finish(self) -> Result<Detection, Error> {
        let document: DetectionDocument = serde_json::from_reader(self.reader)?;
        let shapes = document
            .shapes
            .into_iter()
            .map(ExtractedShape::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Detection { shapes, unassigned_indices: document.unassigned_indices })
    }
}

impl DetectionReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let extension = path.as_ref().extension().ok_or(NoFileExtension())?;
        if extension != FILE_EXTENSION_DETECTION_JSON_FORMAT {
            return Err(InvalidFileExtension(
                extension.to_str().unwrap_or_default().to_string(),
            ));
        }
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

/// Sets up a writer for a detection result document, the reader's counterpart.
#[derive(Debug, Clone)]
pub struct DetectionWriter<W: Write> {
    writer: W,
    pretty_write: bool,
}

impl<W: Write> DetectionWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pretty_write: false }
    }

    pub fn with_pretty_write(mut self, pretty_write: bool) -> Self {
        self.pretty_write = pretty_write;
        self
    }

    pub fn finish(self, shapes: &[ExtractedShape], unassigned_indices: &[usize]) -> Result<(), Error> {
        let document = DetectionDocument {
            shapes: shapes.iter().map(ShapeElement::from).collect(),
            unassigned_indices: unassigned_indices.to_vec(),
        };
        if self.pretty_write {
            serde_json::to_writer_pretty(self.writer, &document)?;
        } else {
            serde_json::to_writer(self.writer, &document)?;
        }
        Ok(())
    }
}

impl DetectionWriter<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let extension = path.as_ref().extension().ok_or(NoFileExtension())?;
        if extension != FILE_EXTENSION_DETECTION_JSON_FORMAT {
            return Err(InvalidFileExtension(
                extension.to_str().unwrap_or_default().to_string(),
            ));
        }
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
        Ok(Self::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use ransac_core::{FitParameters, ShapeKindTag};

    #[test]
    fn round_trips_a_detection_document() {
        let shapes = vec![ExtractedShape::new(
            0,
            ShapeKindTag::Plane,
            FitParameters::Plane { point: Point3::origin(), normal: Vector3::z() },
            vec![1, 2, 3],
        )];
        let unassigned_indices = vec![4, 5];

        let mut buffer = Vec::new();
        DetectionWriter::new(&mut buffer)
            .finish(&shapes, &unassigned_indices)
            .expect("write should succeed");

        let detection = DetectionReader::new(buffer.as_slice()).finish().expect("read should succeed");
        assert_eq!(detection.shapes.len(), 1);
        assert_eq!(detection.shapes[0].kind_tag, ShapeKindTag::Plane);
        assert_eq!(detection.shapes[0].assigned_indices, vec![1, 2, 3]);
        assert_eq!(detection.unassigned_indices, unassigned_indices);
    }
}
