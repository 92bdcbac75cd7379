use anyhow::{Context, Result, anyhow};

use msd_forge::analysis::{StageReport, reduce_chunks};

use crate::cli::ComArgs;
use crate::config::{
    LayoutSettings, Overlay, SystemSettings, build_layout_settings, build_system_settings, resolve,
};
use crate::display::{Context as DisplayContext, Progress, print_run_summary};

const TOTAL_STEPS: u8 = 1;
pub(super) const STEP: &str = "Reducing to centers of mass";

pub fn run_com(args: ComArgs, ctx: DisplayContext) -> Result<()> {
    let config = resolve(
        args.common.config.as_deref(),
        &[&args.layout as &dyn Overlay, &args.system],
    )?;
    let layout = build_layout_settings(&config, false)?;
    let system = build_system_settings(&config, true)?;

    if ctx.interactive {
        print_run_summary(
            "Center of Mass",
            &[
                ("Chunks", layout.num_chunks.to_string()),
                ("Molecules", system.num_mols.to_string()),
                ("Atoms / Mol", system.num_atoms.to_string()),
            ],
        );
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);
    com_step(&mut progress, &layout, &system)?;
    progress.finish();

    Ok(())
}

pub(super) fn com_step(
    progress: &mut Progress,
    layout: &LayoutSettings,
    system: &SystemSettings,
) -> Result<StageReport> {
    let masses = system
        .masses
        .as_ref()
        .ok_or_else(|| anyhow!("Missing --masses (or `system.masses` in the configuration file)"))?;

    progress.step(STEP);
    let report = reduce_chunks(&layout.layout, layout.num_chunks, system.num_mols, masses)
        .context("Center-of-mass reduction failed")?;

    let substeps = [
        format!(
            "Mass-weighted average of {} atoms (M = {:.3})",
            masses.len(),
            masses.total()
        ),
        format!("Write {} frames → com_data/", report.frames),
    ];
    let substeps_ref: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step(STEP, &substeps_ref);

    Ok(report)
}
