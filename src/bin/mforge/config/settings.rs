use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use msd_forge::{ChunkLayout, ExtractConfig, MassVector, PipelineConfig};

fn require<T: Clone>(value: &Option<T>, flag: &str, key: &str) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| anyhow!("Missing {} (or `{}` in the configuration file)", flag, key))
}

pub struct LayoutSettings {
    pub layout: ChunkLayout,
    pub num_chunks: usize,
}

/// `in_dir` is only required when trajectories are read.
pub fn build_layout_settings(config: &PipelineConfig, need_input: bool) -> Result<LayoutSettings> {
    let section = &config.layout;
    let base_dir = section.base_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let in_dir = if need_input {
        require(&section.in_dir, "--in-dir", "layout.in_dir")?
    } else {
        section.in_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    };
    let out_dir = require(&section.out_dir, "--out-dir", "layout.out_dir")?;
    let num_chunks = require(&section.num_chunks, "--chunks", "layout.num_chunks")?;

    if need_input && !base_dir.join(&in_dir).is_dir() {
        bail!(
            "Trajectory directory '{}' does not exist",
            base_dir.join(&in_dir).display()
        );
    }

    Ok(LayoutSettings {
        layout: ChunkLayout::new(base_dir, in_dir, out_dir),
        num_chunks,
    })
}

pub struct SystemSettings {
    pub num_mols: usize,
    /// Atoms per molecule.
    pub num_atoms: usize,
    pub masses: Option<MassVector>,
}

impl SystemSettings {
    pub fn atoms_total(&self) -> usize {
        self.num_mols * self.num_atoms
    }
}

/// The atom count may be given explicitly or implied by the mass list.
pub fn build_system_settings(config: &PipelineConfig, need_masses: bool) -> Result<SystemSettings> {
    let section = &config.system;
    let num_mols = require(&section.num_mols, "--mols", "system.num_mols")?;

    let masses = match &section.masses {
        Some(m) => Some(MassVector::new(m.clone()).context("Invalid --masses")?),
        None if need_masses => bail!(
            "Missing --masses (or `system.masses` in the configuration file)"
        ),
        None => None,
    };

    let num_atoms = match (section.num_atoms, &masses) {
        (Some(n), _) => n,
        (None, Some(m)) => m.len(),
        (None, None) => bail!(
            "Missing --atoms (or `system.num_atoms` in the configuration file)"
        ),
    };

    Ok(SystemSettings {
        num_mols,
        num_atoms,
        masses,
    })
}

pub struct UnwrapSettings {
    pub xsc: PathBuf,
    pub stride: usize,
}

pub fn build_unwrap_settings(config: &PipelineConfig, layout: &ChunkLayout) -> Result<UnwrapSettings> {
    let xsc = require(&config.unwrap.xsc, "--xsc", "unwrap.xsc")?;
    Ok(UnwrapSettings {
        xsc: layout.resolve(&xsc),
        stride: config.unwrap.stride.unwrap_or(1),
    })
}

pub struct MsdSettings {
    pub min_frames: usize,
    pub label: String,
}

pub fn build_msd_settings(config: &PipelineConfig, layout: &ChunkLayout) -> Result<MsdSettings> {
    Ok(MsdSettings {
        min_frames: require(&config.msd.min_frames, "--min-frames", "msd.min_frames")?,
        label: config
            .msd
            .label
            .clone()
            .unwrap_or_else(|| layout.default_label()),
    })
}

pub fn build_extract_settings(
    config: &PipelineConfig,
    system: &SystemSettings,
) -> Result<ExtractConfig> {
    let section = &config.extract;
    let threads = section.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    Ok(ExtractConfig {
        vmd: section.vmd.clone().unwrap_or_else(|| PathBuf::from("vmd")),
        psf: require(&section.psf, "--psf", "extract.psf")?,
        dcd: require(&section.dcd, "--dcd", "extract.dcd")?,
        num_mols: system.num_mols,
        expected_atoms: Some(system.atoms_total()),
        threads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(text: &str) -> PipelineConfig {
        PipelineConfig::from_toml_str(text).unwrap()
    }

    #[test]
    fn layout_defaults_base_and_input_dirs() {
        let cfg = config("[layout]\nout_dir = \"nvt\"\nnum_chunks = 3\n");
        let settings = build_layout_settings(&cfg, false).unwrap();
        assert_eq!(settings.num_chunks, 3);
        assert_eq!(settings.layout.work_dir(), PathBuf::from("./nvt"));
    }

    #[test]
    fn missing_values_name_flag_and_key() {
        let err = build_layout_settings(&config("[layout]\nout_dir = \"nvt\"\n"), false)
            .err()
            .unwrap();
        let msg = err.to_string();
        assert!(msg.contains("--chunks"));
        assert!(msg.contains("layout.num_chunks"));
    }

    #[test]
    fn atom_count_falls_back_to_mass_list() {
        let cfg = config("[system]\nnum_mols = 10\nmasses = [15.999, 1.008, 1.008]\n");
        let system = build_system_settings(&cfg, true).unwrap();
        assert_eq!(system.num_atoms, 3);
        assert_eq!(system.atoms_total(), 30);
    }

    #[test]
    fn masses_required_only_when_asked() {
        let cfg = config("[system]\nnum_mols = 10\nnum_atoms = 3\n");
        assert!(build_system_settings(&cfg, false).is_ok());
        assert!(build_system_settings(&cfg, true).is_err());
    }

    #[test]
    fn label_defaults_to_output_directory_name() {
        let cfg = config("[layout]\nout_dir = \"runs/nvt\"\nnum_chunks = 1\n[msd]\nmin_frames = 5\n");
        let layout = build_layout_settings(&cfg, false).unwrap().layout;
        let msd = build_msd_settings(&cfg, &layout).unwrap();
        assert_eq!(msd.label, "nvt");
        assert_eq!(msd.min_frames, 5);
    }

    #[test]
    fn xsc_is_resolved_against_base_dir() {
        let cfg = config(
            "[layout]\nbase_dir = \"/sim\"\nout_dir = \"nvt\"\nnum_chunks = 1\n[unwrap]\nxsc = \"equil.xsc\"\n",
        );
        let layout = build_layout_settings(&cfg, false).unwrap().layout;
        let unwrap = build_unwrap_settings(&cfg, &layout).unwrap();
        assert_eq!(unwrap.xsc, PathBuf::from("/sim/equil.xsc"));
        assert_eq!(unwrap.stride, 1);
    }
}
