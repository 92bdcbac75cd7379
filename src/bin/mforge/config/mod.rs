mod overlay;
mod settings;

pub use overlay::Overlay;
pub use settings::{
    LayoutSettings, MsdSettings, SystemSettings, UnwrapSettings, build_extract_settings,
    build_layout_settings, build_msd_settings, build_system_settings, build_unwrap_settings,
};

use std::path::Path;

use anyhow::{Context, Result};
use msd_forge::PipelineConfig;

/// Loads the configuration file (if any), applies command-line overrides, and
/// validates the merged values.
pub fn resolve(path: Option<&Path>, overlays: &[&dyn Overlay]) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(p) => PipelineConfig::load(p)
            .with_context(|| format!("Failed to load configuration from {}", p.display()))?,
        None => PipelineConfig::default(),
    };

    for overlay in overlays {
        overlay.apply(&mut config);
    }

    config.validate().context("Invalid pipeline settings")?;
    Ok(config)
}
