use std::path::PathBuf;

use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line {line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("{format} rows are ragged: line {line} has {found} columns, earlier rows have {expected}")]
    Width {
        format: Format,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to move finished output into place at '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    /// Returns `true` if the file was read but its contents are unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Parse { .. } | Error::Width { .. })
    }

    /// Returns `true` if the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io { source } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
