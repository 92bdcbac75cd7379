use anyhow::{Context, Result};

use crate::cli::RunArgs;
use crate::config::{
    Overlay, build_extract_settings, build_layout_settings, build_msd_settings,
    build_system_settings, build_unwrap_settings, resolve,
};
use crate::display::{Context as DisplayContext, Progress, print_run_summary};

use super::com::com_step;
use super::extract::{extract_step, summary_rows};
use super::msd::{msd_step_for, report};
use super::unwrap::{geometry_step, unwrap_step};

pub fn run_pipeline(args: RunArgs, ctx: DisplayContext) -> Result<()> {
    let config = resolve(
        args.common.config.as_deref(),
        &[
            &args.layout as &dyn Overlay,
            &args.system,
            &args.extract,
            &args.unwrap,
            &args.msd,
        ],
    )?;

    let run_extract = !args.skip_extract;
    let layout = build_layout_settings(&config, run_extract)?;
    let system = build_system_settings(&config, true)?;
    let unwrap = build_unwrap_settings(&config, &layout.layout)?;
    let msd = build_msd_settings(&config, &layout.layout)?;
    let extract = if run_extract {
        Some(build_extract_settings(&config, &system)?)
    } else {
        None
    };

    if ctx.interactive {
        let mut rows = match &extract {
            Some(e) => summary_rows(&layout, e),
            None => vec![
                ("Chunks", layout.num_chunks.to_string()),
                ("Molecules", system.num_mols.to_string()),
                ("Work Dir", layout.layout.work_dir().display().to_string()),
            ],
        };
        rows.push(("Atoms / Mol", system.num_atoms.to_string()));
        rows.push(("XSC", unwrap.xsc.display().to_string()));
        rows.push(("Min Frames", format!("{} per chunk", msd.min_frames)));
        rows.push(("Label", msd.label.clone()));
        print_run_summary("Pipeline", &rows);
    }

    let total_steps = if run_extract { 5 } else { 4 };
    let mut progress = Progress::new(ctx.interactive, total_steps);

    match &extract {
        Some(e) => {
            extract_step(&mut progress, &layout, e)?;
        }
        None => {
            log::info!("skipping extraction, reading existing frame files");
            layout.layout.create_dirs().with_context(|| {
                format!(
                    "Failed to create output directories under {}",
                    layout.layout.work_dir().display()
                )
            })?;
        }
    }

    let geometry = geometry_step(&mut progress, &unwrap)?;
    unwrap_step(&mut progress, &layout, &system, &unwrap, &geometry)?;
    com_step(&mut progress, &layout, &system)?;
    let (stats, files) = msd_step_for(&mut progress, &layout, &system, &msd)?;
    progress.finish();

    if ctx.interactive {
        report(&stats, &files);
    }

    Ok(())
}
