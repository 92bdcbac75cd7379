use msd_forge::PipelineConfig;

use crate::cli::{ExtractOptions, LayoutOptions, MsdOptions, SystemOptions, UnwrapOptions};

/// Copies every value given on the command line over the file configuration.
pub trait Overlay {
    fn apply(&self, config: &mut PipelineConfig);
}

fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        slot.clone_from(value);
    }
}

impl Overlay for LayoutOptions {
    fn apply(&self, config: &mut PipelineConfig) {
        let layout = &mut config.layout;
        set(&mut layout.base_dir, &self.base_dir);
        set(&mut layout.in_dir, &self.in_dir);
        set(&mut layout.out_dir, &self.out_dir);
        set(&mut layout.num_chunks, &self.num_chunks);
    }
}

impl Overlay for SystemOptions {
    fn apply(&self, config: &mut PipelineConfig) {
        let system = &mut config.system;
        set(&mut system.num_mols, &self.num_mols);
        set(&mut system.num_atoms, &self.num_atoms);
        if !self.masses.is_empty() {
            system.masses = Some(self.masses.clone());
        }
    }
}

impl Overlay for UnwrapOptions {
    fn apply(&self, config: &mut PipelineConfig) {
        set(&mut config.unwrap.xsc, &self.xsc);
        set(&mut config.unwrap.stride, &self.stride);
    }
}

impl Overlay for MsdOptions {
    fn apply(&self, config: &mut PipelineConfig) {
        set(&mut config.msd.min_frames, &self.min_frames);
        set(&mut config.msd.label, &self.label);
    }
}

impl Overlay for ExtractOptions {
    fn apply(&self, config: &mut PipelineConfig) {
        let extract = &mut config.extract;
        set(&mut extract.vmd, &self.vmd);
        set(&mut extract.psf, &self.psf);
        set(&mut extract.dcd, &self.dcd);
        set(&mut extract.threads, &self.threads);
    }
}
