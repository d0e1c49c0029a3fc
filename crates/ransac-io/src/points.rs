use crate::Error;
use crate::Error::{InvalidFileExtension, NoFileExtension};
use crate::documents::PointRecord;
use nalgebra::{Point3, Vector3};
use ransac_core::Point;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

pub const FILE_EXTENSION_POINTS_CSV_FORMAT: &str = "csv";

/// Sets up a reader for a delimited tabular point cloud (`x,y,z,nx,ny,nz`), in the teacher's
/// streaming-builder style.
#[derive(Debug, Clone)]
pub struct TabularPointReader<R: Read> {
    reader: R,
    delimiter: u8,
    has_headers: bool,
}

impl<R: Read> TabularPointReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, delimiter: b',', has_headers: true }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn finish(self) -> Result<Vec<Point>, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .delimiter(self.delimiter)
            .from_reader(self.reader);

        let mut points = Vec::new();
        for result in rdr.deserialize() {
            let record: PointRecord = result?;
            let position = Point3::new(record.x, record.y, record.z);
            let normal = Vector3::new(record.nx, record.ny, record.nz);
            points.push(Point::new(position, normal));
        }
        Ok(points)
    }
}

impl TabularPointReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let extension = path.as_ref().extension().ok_or(NoFileExtension())?;
        if extension != FILE_EXTENSION_POINTS_CSV_FORMAT {
            return Err(InvalidFileExtension(
                extension.to_str().unwrap_or_default().to_string(),
            ));
        }
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

/// Sets up a writer for a delimited tabular point cloud, the reader's counterpart.
#[derive(Debug, Clone)]
pub struct TabularPointWriter<W: Write> {
    writer: W,
    delimiter: u8,
}

impl<W: Write> TabularPointWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn finish(self, points: &[Point]) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(self.writer);
        for point in points {
            wtr.serialize(PointRecord {
                x: point.position.x,
                y: point.position.y,
                z: point.position.z,
                nx: point.normal.x,
                ny: point.normal.y,
                nz: point.normal.z,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl TabularPointWriter<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let extension = path.as_ref().extension().ok_or(NoFileExtension())?;
        if extension != FILE_EXTENSION_POINTS_CSV_FORMAT {
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

    #[test]
    fn round_trips_points_through_csv() {
        let points = vec![
            Point::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0)),
            Point::new(Point3::new(-1.0, 0.5, 2.0), Vector3::new(1.0, 0.0, 0.0)),
        ];

        let mut buffer = Vec::new();
        TabularPointWriter::new(&mut buffer).finish(&points).expect("write should succeed");

        let read_back = TabularPointReader::new(buffer.as_slice()).finish().expect("read should succeed");
        assert_eq!(read_back.len(), points.len());
        for (original, read) in points.iter().zip(read_back.iter()) {
            assert!((original.position - read.position).norm() < 1e-12);
            assert!((original.normal - read.normal).norm() < 1e-12);
        }
    }
}
