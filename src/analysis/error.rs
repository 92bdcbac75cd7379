//! Error types for the unwrap → center-of-mass → MSD/α₂ pipeline.
//!
//! Shape problems are split by stage: [`Error::Format`] for per-atom frame
//! files, [`Error::Shape`] for center-of-mass input whose width does not match
//! the molecule layout. Fatal per-chunk failures are wrapped in
//! [`Error::Chunk`] so the offending chunk index and file are always reported.

use std::path::PathBuf;

use crate::model::frames::FrameShapeError;
use crate::model::geometry::GeometryError;
use crate::model::masses::MassError;
use thiserror::Error;

/// Errors raised by the analysis stages.
#[derive(Debug, Error)]
pub enum Error {
    /// Column or line counts inconsistent with the declared entity count.
    #[error("frame data does not match the declared atom count: {detail}")]
    Format {
        /// Description of the mismatch.
        detail: String,
    },

    /// Missing or invalid box geometry.
    #[error("invalid box geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// Invalid atomic mass vector.
    #[error("invalid mass vector: {0}")]
    Mass(#[from] MassError),

    /// Flattened data not divisible into the expected per-molecule stride.
    #[error(
        "input has {columns} columns per frame, expected {expected} \
         ({num_mols} molecules × {num_atoms} atoms × 3)"
    )]
    Shape {
        /// Columns found per row.
        columns: usize,
        /// Columns required per row.
        expected: usize,
        /// Declared molecule count.
        num_mols: usize,
        /// Declared atoms per molecule.
        num_atoms: usize,
    },

    /// No chunk survived the minimum-frame gate.
    #[error("no valid chunks to average: all {total} chunks were skipped")]
    InsufficientData {
        /// Number of chunks offered to the accumulator.
        total: usize,
    },

    /// A run parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Underlying file I/O failure.
    #[error(transparent)]
    Io(#[from] crate::io::Error),

    /// A fatal failure while processing one chunk.
    #[error("chunk {index} ({}) failed", .path.display())]
    Chunk {
        /// Chunk index.
        index: usize,
        /// File being read or written.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
}

impl From<FrameShapeError> for Error {
    fn from(e: FrameShapeError) -> Self {
        Error::Format {
            detail: e.to_string(),
        }
    }
}

impl Error {
    /// Creates a [`Format`](Error::Format) error.
    pub fn format(detail: impl Into<String>) -> Self {
        Self::Format {
            detail: detail.into(),
        }
    }

    /// Wraps `source` with the chunk index and file it concerns.
    pub fn chunk(index: usize, path: impl Into<PathBuf>, source: Error) -> Self {
        Self::Chunk {
            index,
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Strips [`Chunk`](Error::Chunk) wrappers and returns the innermost error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Chunk { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_error_names_index_and_path() {
        let err = Error::chunk(4, "/sim/out/data/xyz_4.dat", Error::format("row 2 has 5 columns"));
        let msg = err.to_string();
        assert!(msg.contains("chunk 4"));
        assert!(msg.contains("xyz_4.dat"));
        assert!(matches!(err.root(), Error::Format { .. }));
    }

    #[test]
    fn chunk_error_leaves_cause_to_source_chain() {
        use std::error::Error as _;

        let err = Error::chunk(2, "/sim/out/com_data/com_2.dat", Error::format("ragged rows"));
        assert_eq!(err.to_string(), "chunk 2 (/sim/out/com_data/com_2.dat) failed");
        let cause = err.source().unwrap().to_string();
        assert!(cause.contains("ragged rows"));
    }

    #[test]
    fn shape_error_message() {
        let err = Error::Shape {
            columns: 17,
            expected: 18,
            num_mols: 2,
            num_atoms: 3,
        };
        assert_eq!(
            err.to_string(),
            "input has 17 columns per frame, expected 18 (2 molecules × 3 atoms × 3)"
        );
    }
}
