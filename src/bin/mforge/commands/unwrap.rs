use anyhow::{Context, Result};

use msd_forge::BoxGeometry;
use msd_forge::analysis::{StageReport, load_geometry, unwrap_chunks};

use crate::cli::UnwrapArgs;
use crate::config::{
    LayoutSettings, Overlay, SystemSettings, UnwrapSettings, build_layout_settings,
    build_system_settings, build_unwrap_settings, resolve,
};
use crate::display::{Context as DisplayContext, Progress, print_run_summary};

const TOTAL_STEPS: u8 = 2;
pub(super) const GEOMETRY_STEP: &str = "Reading box geometry";
pub(super) const UNWRAP_STEP: &str = "Unwrapping periodic coordinates";

pub fn run_unwrap(args: UnwrapArgs, ctx: DisplayContext) -> Result<()> {
    let config = resolve(
        args.common.config.as_deref(),
        &[&args.layout as &dyn Overlay, &args.system, &args.unwrap],
    )?;
    let layout = build_layout_settings(&config, false)?;
    let system = build_system_settings(&config, false)?;
    let unwrap = build_unwrap_settings(&config, &layout.layout)?;

    if ctx.interactive {
        print_run_summary(
            "Unwrapping",
            &[
                ("Chunks", layout.num_chunks.to_string()),
                (
                    "Atoms / Frame",
                    format!(
                        "{} ({} × {})",
                        system.atoms_total(),
                        system.num_mols,
                        system.num_atoms
                    ),
                ),
                ("XSC", unwrap.xsc.display().to_string()),
                ("Stride", unwrap.stride.to_string()),
            ],
        );
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);
    let geometry = geometry_step(&mut progress, &unwrap)?;
    unwrap_step(&mut progress, &layout, &system, &unwrap, &geometry)?;
    progress.finish();

    Ok(())
}

pub(super) fn geometry_step(progress: &mut Progress, unwrap: &UnwrapSettings) -> Result<BoxGeometry> {
    progress.step(GEOMETRY_STEP);
    let geometry = load_geometry(&unwrap.xsc)
        .with_context(|| format!("Failed to read box geometry from {}", unwrap.xsc.display()))?;

    let [lx, ly, lz] = geometry.lengths();
    let substeps = [
        "Read last record of the extended-system file".to_string(),
        format!("Box {:.3} × {:.3} × {:.3} Å", lx, ly, lz),
    ];
    let substeps_ref: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step(GEOMETRY_STEP, &substeps_ref);

    Ok(geometry)
}

pub(super) fn unwrap_step(
    progress: &mut Progress,
    layout: &LayoutSettings,
    system: &SystemSettings,
    unwrap: &UnwrapSettings,
    geometry: &BoxGeometry,
) -> Result<StageReport> {
    progress.step(UNWRAP_STEP);
    let report = unwrap_chunks(
        &layout.layout,
        layout.num_chunks,
        system.atoms_total(),
        geometry,
        unwrap.stride,
    )
    .context("Unwrapping failed")?;

    let mut substeps = vec![
        format!("Minimum-image correction over {} chunks", report.chunks),
        format!("Write {} frames → unwrapped/", report.frames),
    ];
    if unwrap.stride > 1 {
        substeps.insert(0, format!("Keep 1 of every {} frames", unwrap.stride));
    }
    let substeps_ref: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step(UNWRAP_STEP, &substeps_ref);

    Ok(report)
}
