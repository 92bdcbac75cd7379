use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or checking a pipeline configuration file.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is not valid TOML or does not match the expected layout.
    #[error("failed to parse pipeline configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file could not be read.
    #[error("failed to read configuration file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value is present but out of range.
    #[error("invalid value for '{key}': {detail}")]
    Invalid { key: &'static str, detail: String },
}

impl Error {
    pub fn invalid(key: &'static str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            detail: detail.into(),
        }
    }
}
