use anyhow::{Context, Result};

use msd_forge::EnsembleStats;
use msd_forge::analysis::{SeriesFiles, aggregate_chunks};

use crate::cli::MsdArgs;
use crate::config::{
    LayoutSettings, MsdSettings, Overlay, SystemSettings, build_layout_settings,
    build_msd_settings, build_system_settings, resolve,
};
use crate::display::{
    Context as DisplayContext, Progress, print_ensemble_summary, print_run_summary,
    print_skipped_chunks,
};

const TOTAL_STEPS: u8 = 1;
pub(super) const STEP: &str = "Averaging MSD(t) and α₂(t)";

pub fn run_msd(args: MsdArgs, ctx: DisplayContext) -> Result<()> {
    let config = resolve(
        args.common.config.as_deref(),
        &[&args.layout as &dyn Overlay, &args.system, &args.msd],
    )?;
    let layout = build_layout_settings(&config, false)?;
    let num_mols = config
        .system
        .num_mols
        .context("Missing --mols (or `system.num_mols` in the configuration file)")?;
    let msd = build_msd_settings(&config, &layout.layout)?;

    if ctx.interactive {
        print_run_summary(
            "Ensemble Averaging",
            &[
                ("Chunks", layout.num_chunks.to_string()),
                ("Molecules", num_mols.to_string()),
                ("Min Frames", format!("{} per chunk", msd.min_frames)),
                ("Label", msd.label.clone()),
            ],
        );
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);
    let (stats, files) = msd_step(&mut progress, &layout, num_mols, &msd)?;
    progress.finish();

    if ctx.interactive {
        report(&stats, &files);
    }

    Ok(())
}

/// Shared with the full pipeline, which already knows the system.
pub(super) fn msd_step_for(
    progress: &mut Progress,
    layout: &LayoutSettings,
    system: &SystemSettings,
    msd: &MsdSettings,
) -> Result<(EnsembleStats, SeriesFiles)> {
    msd_step(progress, layout, system.num_mols, msd)
}

fn msd_step(
    progress: &mut Progress,
    layout: &LayoutSettings,
    num_mols: usize,
    msd: &MsdSettings,
) -> Result<(EnsembleStats, SeriesFiles)> {
    progress.step(STEP);
    let (stats, files) = aggregate_chunks(
        &layout.layout,
        layout.num_chunks,
        num_mols,
        msd.min_frames,
        &msd.label,
    )
    .context("Ensemble averaging failed")?;

    let mut substeps = vec![format!(
        "Fold {} of {} chunks over {} lags",
        stats.used,
        stats.total_chunks(),
        stats.msd.lags()
    )];
    if !stats.skipped.is_empty() {
        substeps.push(format!("Skip {} chunks (see below)", stats.skipped.len()));
    }
    if stats.molecule_averaged {
        substeps.push(format!("Average over {} molecules", num_mols));
    }
    substeps.push(format!("Write MSDs/ and alpha2s/ ({})", msd.label));
    let substeps_ref: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step(STEP, &substeps_ref);

    Ok((stats, files))
}

pub(super) fn report(stats: &EnsembleStats, files: &SeriesFiles) {
    print_ensemble_summary(stats, files);
    print_skipped_chunks(&stats.skipped);
}
