//! TOML pipeline configuration.
//!
//! Every key is optional so a file can hold only the settings shared across
//! runs while the command line supplies the rest. [`PipelineConfig::validate`]
//! checks the values that are present; completeness is the caller's concern.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use error::Error;

/// Annotated example configuration shipped with the crate.
pub const EXAMPLE_CONFIG: &str = include_str!("../../resources/pipeline.example.toml");

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub layout: LayoutSection,
    pub system: SystemSection,
    pub unwrap: UnwrapSection,
    pub msd: MsdSection,
    pub extract: ExtractSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub base_dir: Option<PathBuf>,
    pub in_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub num_chunks: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemSection {
    pub num_mols: Option<usize>,
    /// Atoms per molecule.
    pub num_atoms: Option<usize>,
    pub masses: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnwrapSection {
    pub xsc: Option<PathBuf>,
    pub stride: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MsdSection {
    pub min_frames: Option<usize>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractSection {
    pub vmd: Option<PathBuf>,
    pub psf: Option<String>,
    pub dcd: Option<String>,
    pub threads: Option<usize>,
}

fn positive(key: &'static str, value: Option<usize>) -> Result<(), Error> {
    match value {
        Some(0) => Err(Error::invalid(key, "must be at least 1")),
        _ => Ok(()),
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects zero counts, a zero stride, and non-positive or mismatched masses.
    pub fn validate(&self) -> Result<(), Error> {
        positive("layout.num_chunks", self.layout.num_chunks)?;
        positive("system.num_mols", self.system.num_mols)?;
        positive("system.num_atoms", self.system.num_atoms)?;
        positive("unwrap.stride", self.unwrap.stride)?;
        positive("msd.min_frames", self.msd.min_frames)?;
        positive("extract.threads", self.extract.threads)?;

        if let Some(masses) = &self.system.masses {
            if masses.is_empty() {
                return Err(Error::invalid("system.masses", "must list at least one mass"));
            }
            if let Some(m) = masses.iter().find(|m| !m.is_finite() || **m <= 0.0) {
                return Err(Error::invalid(
                    "system.masses",
                    format!("every mass must be positive, found {}", m),
                ));
            }
            if let Some(n) = self.system.num_atoms {
                if n != masses.len() {
                    return Err(Error::invalid(
                        "system.masses",
                        format!("{} masses given for {} atoms per molecule", masses.len(), n),
                    ));
                }
            }
        }

        if matches!(&self.msd.label, Some(label) if label.trim().is_empty()) {
            return Err(Error::invalid("msd.label", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_config_parses() {
        let config = PipelineConfig::from_toml_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.layout.num_chunks, Some(10));
        assert_eq!(config.system.masses.as_deref(), Some(&[15.999, 1.008, 1.008][..]));
        assert_eq!(config.unwrap.xsc, Some(PathBuf::from("restart_equil.xsc")));
        assert_eq!(config.msd.label, None);
        assert_eq!(config.extract.threads, Some(64));
    }

    #[test]
    fn empty_file_yields_all_defaults() {
        assert_eq!(
            PipelineConfig::from_toml_str("").unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn partial_sections_are_allowed() {
        let config = PipelineConfig::from_toml_str("[msd]\nmin_frames = 50\n").unwrap();
        assert_eq!(config.msd.min_frames, Some(50));
        assert!(config.layout.base_dir.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PipelineConfig::from_toml_str("[msd]\nmin_frame = 50\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn zero_counts_are_rejected() {
        for text in [
            "[layout]\nnum_chunks = 0\n",
            "[unwrap]\nstride = 0\n",
            "[msd]\nmin_frames = 0\n",
            "[system]\nnum_mols = 0\n",
        ] {
            let err = PipelineConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, Error::Invalid { .. }), "{text}");
        }
    }

    #[test]
    fn masses_must_be_positive_and_match_atom_count() {
        let err = PipelineConfig::from_toml_str("[system]\nmasses = [1.0, -2.0]\n").unwrap_err();
        assert!(matches!(err, Error::Invalid { key: "system.masses", .. }));

        let err = PipelineConfig::from_toml_str("[system]\nnum_atoms = 3\nmasses = [1.0, 2.0]\n")
            .unwrap_err();
        assert!(err.to_string().contains("2 masses given for 3 atoms"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PipelineConfig::load(Path::new("/nonexistent/mforge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mforge.toml"));
    }
}
