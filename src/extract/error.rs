use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to launch '{}' for chunk {chunk}: {source}", .program.display())]
    Spawn {
        chunk: usize,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("VMD exited with {status} on chunk {chunk} (see '{}')", .log.display())]
    ExitStatus {
        chunk: usize,
        status: String,
        log: PathBuf,
    },

    #[error("chunk {chunk} produced no frame file at '{}'", .path.display())]
    MissingOutput { chunk: usize, path: PathBuf },

    #[error("frame file '{}' for chunk {chunk} is invalid: {detail}", .path.display())]
    Validation {
        chunk: usize,
        path: PathBuf,
        detail: String,
    },

    #[error("invalid extraction setting: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] crate::io::Error),
}

impl Error {
    pub fn validation(chunk: usize, path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Validation {
            chunk,
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Chunk index the failure concerns, if any.
    pub fn chunk(&self) -> Option<usize> {
        match self {
            Error::Spawn { chunk, .. }
            | Error::ExitStatus { chunk, .. }
            | Error::MissingOutput { chunk, .. }
            | Error::Validation { chunk, .. } => Some(*chunk),
            Error::InvalidParameter(_) | Error::Io(_) => None,
        }
    }
}
