use anyhow::{Context, Result};

use msd_forge::ExtractConfig;
use msd_forge::extract::{ExtractReport, extract_chunks};

use crate::cli::ExtractArgs;
use crate::config::{
    LayoutSettings, Overlay, build_extract_settings, build_layout_settings, build_system_settings,
    resolve,
};
use crate::display::{Context as DisplayContext, Progress, print_run_summary};

const TOTAL_STEPS: u8 = 1;
const STEP: &str = "Extracting frames with VMD";

pub fn run_extract(args: ExtractArgs, ctx: DisplayContext) -> Result<()> {
    let config = resolve(
        args.common.config.as_deref(),
        &[&args.layout as &dyn Overlay, &args.system, &args.extract],
    )?;
    let layout = build_layout_settings(&config, true)?;
    let system = build_system_settings(&config, false)?;
    let extract = build_extract_settings(&config, &system)?;

    if ctx.interactive {
        print_run_summary("Extraction", &summary_rows(&layout, &extract));
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);
    extract_step(&mut progress, &layout, &extract)?;
    progress.finish();

    Ok(())
}

pub(super) fn summary_rows(
    layout: &LayoutSettings,
    extract: &ExtractConfig,
) -> Vec<(&'static str, String)> {
    vec![
        ("Chunks", layout.num_chunks.to_string()),
        ("Molecules", extract.num_mols.to_string()),
        ("VMD", extract.vmd.display().to_string()),
        ("Inputs", format!("{}.psf, {}.dcd", extract.psf, extract.dcd)),
        ("Threads", extract.threads.to_string()),
        ("Work Dir", layout.layout.work_dir().display().to_string()),
    ]
}

pub(super) fn extract_step(
    progress: &mut Progress,
    settings: &LayoutSettings,
    extract: &ExtractConfig,
) -> Result<ExtractReport> {
    let layout = &settings.layout;
    let n = settings.num_chunks;

    progress.step(STEP);
    let report = extract_chunks(layout, n, extract, |chunk| {
        progress.chunk(chunk, n);
    })
    .context("Frame extraction failed")?;

    let substeps = [
        format!("Render {} Tcl scripts → scripts/", report.chunks),
        format!("Run VMD ({} threads), logs → logs/", extract.threads),
        format!("Validate {} frames → data/", report.frames),
    ];
    let substeps_ref: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step(STEP, &substeps_ref);

    Ok(report)
}
