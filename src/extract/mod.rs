//! Frame extraction through VMD.
//!
//! Binary trajectories are never parsed here. For each chunk a Tcl script is
//! rendered into `scripts/`, VMD runs it in text mode with its output captured
//! under `logs/`, and the resulting `data/xyz_{i}.dat` is checked before the
//! next stage may read it.

mod error;
mod script;
mod vmd;

use std::path::PathBuf;

use crate::io::ChunkLayout;

pub use error::Error;
pub use script::{render as render_script, selection};
pub use vmd::{extract_chunk, validate_output};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// VMD executable.
    pub vmd: PathBuf,
    /// Topology file stem inside each chunk directory.
    pub psf: String,
    /// Trajectory file stem inside each chunk directory.
    pub dcd: String,
    /// Molecules (residues) selected from each frame.
    pub num_mols: usize,
    /// Atoms per frame the output must hold, when known.
    pub expected_atoms: Option<usize>,
    /// Thread count handed to VMD.
    pub threads: usize,
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_mols == 0 {
            return Err(Error::InvalidParameter("molecule count must be at least 1".into()));
        }
        if self.threads == 0 {
            return Err(Error::InvalidParameter("thread count must be at least 1".into()));
        }
        if self.psf.is_empty() || self.dcd.is_empty() {
            return Err(Error::InvalidParameter("psf and dcd file stems must not be empty".into()));
        }
        Ok(())
    }
}

/// Totals of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractReport {
    pub chunks: usize,
    pub frames: usize,
}

/// Extracts chunks `0..num_chunks` one after another, stopping at the first failure.
///
/// `on_chunk` is called with each chunk index before VMD starts on it.
pub fn extract_chunks<F>(
    layout: &ChunkLayout,
    num_chunks: usize,
    config: &ExtractConfig,
    mut on_chunk: F,
) -> Result<ExtractReport, Error>
where
    F: FnMut(usize),
{
    config.validate()?;
    log::info!(
        "extracting {} chunks with {} ({} threads)",
        num_chunks,
        config.vmd.display(),
        config.threads
    );

    let mut report = ExtractReport::default();
    for chunk in 0..num_chunks {
        on_chunk(chunk);
        report.frames += extract_chunk(layout, chunk, config)?;
        report.chunks += 1;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_counts() {
        let mut config = ExtractConfig {
            vmd: PathBuf::from("vmd"),
            psf: "system".into(),
            dcd: "traj".into(),
            num_mols: 10,
            expected_atoms: None,
            threads: 4,
        };
        assert!(config.validate().is_ok());

        config.threads = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidParameter(_))));

        config.threads = 4;
        config.num_mols = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn zero_chunks_is_a_no_op() {
        let layout = ChunkLayout::new("/nonexistent", "in", "out");
        let config = ExtractConfig {
            vmd: PathBuf::from("vmd"),
            psf: "system".into(),
            dcd: "traj".into(),
            num_mols: 1,
            expected_atoms: None,
            threads: 1,
        };
        let mut seen = Vec::new();
        assert_eq!(
            extract_chunks(&layout, 0, &config, |c| seen.push(c)).unwrap(),
            ExtractReport::default()
        );
        assert!(seen.is_empty());
    }

    #[test]
    fn invalid_config_fails_before_any_chunk() {
        let layout = ChunkLayout::new("/nonexistent", "in", "out");
        let config = ExtractConfig {
            vmd: PathBuf::from("vmd"),
            psf: String::new(),
            dcd: "traj".into(),
            num_mols: 1,
            expected_atoms: None,
            threads: 1,
        };
        let mut seen = Vec::new();
        let err = extract_chunks(&layout, 3, &config, |c| seen.push(c)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(seen.is_empty());
    }
}
