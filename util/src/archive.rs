//! Flat CSV archives of point sequences
//!
//! Points are written as one `x,y` record per line, without a header, which is the format
//! consumed by the plotting tools used to inspect planning results.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use csv::WriterBuilder;
use nalgebra::Vector2;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not open archive file {0:?}: {1}")]
    Open(PathBuf, std::io::Error),

    #[error("Could not write record to archive: {0}")]
    Write(csv::Error),

    #[error("Could not flush archive: {0}")]
    Flush(std::io::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Write the points into the file at `path`, truncating any existing content.
///
/// A failure to open the file is reported immediately and not retried.
pub fn write_points_csv<P: AsRef<Path>>(
    path: P,
    points: &[Vector2<f64>],
) -> Result<(), ArchiveError> {
    let file = File::create(path.as_ref())
        .map_err(|e| ArchiveError::Open(path.as_ref().to_path_buf(), e))?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    for point in points {
        writer
            .write_record(&[point.x.to_string(), point.y.to_string()])
            .map_err(ArchiveError::Write)?;
    }

    writer.flush().map_err(ArchiveError::Flush)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_write_points_csv() {
        let path = std::env::temp_dir().join(format!("archive_test_{}.csv", std::process::id()));

        write_points_csv(
            &path,
            &[
                Vector2::new(0.0, 0.0),
                Vector2::new(1.5, -2.0),
                Vector2::new(-19.495, 0.444386),
            ],
        )
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(contents, "0,0\n1.5,-2\n-19.495,0.444386\n");
    }

    #[test]
    fn test_write_points_csv_bad_dir() {
        let result = write_points_csv(
            "/this/directory/does/not/exist/result.csv",
            &[Vector2::new(0.0, 0.0)],
        );

        assert!(matches!(result, Err(ArchiveError::Open(_, _))));
    }
}
