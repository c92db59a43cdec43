//! Recorded reference path source
//!
//! Reads the reference path from a CSV file recorded ahead of time. The first line of the file is
//! always skipped, whatever it contains, and is followed by one `x,y[,...]` record per point.
//! Blank lines and lines starting with `#` are ignored, as are any fields after the first two.
//! Coordinates must be finite.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use csv::{ReaderBuilder, StringRecord};
use log::debug;
use nalgebra::Vector2;

use crate::{loc::Pose2, path::Path};

use super::collab::{PathSource, PathSourceError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Path source which ignores the start and goal and returns the recorded path.
#[derive(Debug, Clone)]
pub struct CsvRefSource {
    pub file_path: PathBuf,

    /// Negate both coordinates of every point. Paths recorded in the vehicle frame of the
    /// recording setup are mirrored with respect to the map frame.
    pub mirror: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CsvRefSource {
    pub fn new<P: Into<PathBuf>>(file_path: P, mirror: bool) -> Self {
        Self {
            file_path: file_path.into(),
            mirror,
        }
    }

    /// Read all points from the file.
    pub fn read(&self) -> Result<Path, PathSourceError> {
        let file = File::open(&self.file_path)
            .map_err(|e| PathSourceError::Io(self.file_path.clone(), e))?;

        // The header line is dropped before the csv reader sees it, so that a header starting
        // with `#` isn't taken as a comment
        let mut file = BufReader::new(file);
        let mut header = String::new();
        file.read_line(&mut header)
            .map_err(|e| PathSourceError::Io(self.file_path.clone(), e))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut points_m = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| self.record_error(e))?;
            let point = parse_point(&record)?;

            points_m.push(if self.mirror { -point } else { point });
        }

        debug!(
            "Read {} reference path points from {:?}",
            points_m.len(),
            self.file_path
        );

        Ok(Path::from_points(points_m))
    }

    fn record_error(&self, e: csv::Error) -> PathSourceError {
        let line = e.position().map(file_line).unwrap_or(0);

        match e.into_kind() {
            csv::ErrorKind::Io(io) => PathSourceError::Io(self.file_path.clone(), io),
            kind => PathSourceError::Parse {
                line,
                reason: format!("{:?}", kind),
            },
        }
    }
}

impl PathSource for CsvRefSource {
    fn plan(&self, _start: &Pose2, _goal: &Pose2) -> Result<Path, PathSourceError> {
        self.read()
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Line in the file of a csv position, which counts from the line after the header.
fn file_line(position: &csv::Position) -> usize {
    position.line() as usize + 1
}

fn parse_point(record: &StringRecord) -> Result<Vector2<f64>, PathSourceError> {
    let line = record.position().map(file_line).unwrap_or(0);

    let field = |i: usize| -> Result<f64, PathSourceError> {
        let s = record.get(i).ok_or_else(|| PathSourceError::Parse {
            line,
            reason: format!("expected at least 2 fields, got {}", record.len()),
        })?;

        let value = s.parse::<f64>().map_err(|e| PathSourceError::Parse {
            line,
            reason: format!("field {} ({:?}): {}", i, s, e),
        })?;

        // inf, nan and out of range values such as 1e400 all parse
        if !value.is_finite() {
            return Err(PathSourceError::Parse {
                line,
                reason: format!("field {} ({:?}) is not finite", i, s),
            });
        }

        Ok(value)
    };

    Ok(Vector2::new(field(0)?, field(1)?))
}
