//! File-level drivers that run one analysis step over every chunk of a layout.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::com::reduce_to_com;
use super::error::Error;
use super::msd::{ChunkContribution, EnsembleAccumulator, EnsembleStats, SkipReason, SkippedChunk};
use super::unwrap::unwrap;
use crate::io::{self, ChunkLayout, Format, Table};
use crate::model::frames::FrameSeq;
use crate::model::geometry::{BoxGeometry, GeometryError};
use crate::model::masses::MassVector;

/// Totals of a per-chunk stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageReport {
    /// Chunks processed.
    pub chunks: usize,
    /// Frames written across all chunks.
    pub frames: usize,
}

impl StageReport {
    fn from_frames(frames: &[usize]) -> Self {
        Self {
            chunks: frames.len(),
            frames: frames.iter().sum(),
        }
    }
}

/// Reads the cell lengths from the last record of an extended-system file.
pub fn load_geometry(path: &Path) -> Result<BoxGeometry, Error> {
    let record = io::read_xsc(path)?.ok_or(GeometryError::EmptyRecord)?;
    let geometry = BoxGeometry::from_xsc_fields(&record.fields)?;
    log::debug!(
        "box geometry from {} (line {}): {:?}",
        path.display(),
        record.line,
        geometry.lengths()
    );
    Ok(geometry)
}

/// Reads per-atom frames, reporting ragged rows as a [`Error::Format`] problem.
fn read_frames(path: &Path, format: Format) -> Result<Table, Error> {
    io::read_table(path, format).map_err(|e| match e {
        io::Error::Width {
            line,
            expected,
            found,
            ..
        } => Error::format(format!(
            "line {} has {} columns, earlier rows have {}",
            line, found, expected
        )),
        other => other.into(),
    })
}

fn frames_from_table(table: Table, entities: usize) -> Result<FrameSeq, Error> {
    if table.is_empty() {
        return Err(Error::format("file holds no frames"));
    }
    if table.columns != entities * 3 {
        return Err(Error::format(format!(
            "{} columns per row, expected {} ({} atoms × 3)",
            table.columns,
            entities * 3,
            entities
        )));
    }
    Ok(FrameSeq::from_flat(entities, table.values)?)
}

/// Unwraps a single chunk and returns the number of frames written.
pub fn unwrap_chunk(
    layout: &ChunkLayout,
    index: usize,
    num_atoms_total: usize,
    geometry: &BoxGeometry,
    stride: usize,
) -> Result<usize, Error> {
    let input = layout.wrapped_file(index);
    let output = layout.unwrapped_file(index);

    let run = || -> Result<usize, Error> {
        let table = read_frames(&input, Format::Wrapped)?;
        let wrapped = frames_from_table(table, num_atoms_total)?.strided(stride);
        let unwrapped = unwrap(&wrapped, geometry);
        io::write_table(&output, unwrapped.as_flat(), unwrapped.frame_len())?;
        Ok(unwrapped.frames())
    };

    let frames = run().map_err(|e| Error::chunk(index, &input, e))?;
    log::debug!("chunk {}: unwrapped {} frames -> {}", index, frames, output.display());
    Ok(frames)
}

/// Unwraps chunks `0..num_chunks` in parallel.
pub fn unwrap_chunks(
    layout: &ChunkLayout,
    num_chunks: usize,
    num_atoms_total: usize,
    geometry: &BoxGeometry,
    stride: usize,
) -> Result<StageReport, Error> {
    if num_atoms_total == 0 {
        return Err(Error::InvalidParameter("atom count must be at least 1".into()));
    }
    if stride == 0 {
        return Err(Error::InvalidParameter("stride must be at least 1".into()));
    }

    log::info!(
        "unwrapping {} chunks ({} atoms, stride {})",
        num_chunks,
        num_atoms_total,
        stride
    );
    let frames = (0..num_chunks)
        .into_par_iter()
        .map(|i| unwrap_chunk(layout, i, num_atoms_total, geometry, stride))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StageReport::from_frames(&frames))
}

/// Reduces one unwrapped chunk to centers of mass and returns the frame count.
pub fn reduce_chunk(
    layout: &ChunkLayout,
    index: usize,
    num_mols: usize,
    masses: &MassVector,
) -> Result<usize, Error> {
    let input = layout.unwrapped_file(index);
    let output = layout.com_file(index);

    let run = || -> Result<usize, Error> {
        let expected = num_mols * masses.len() * 3;
        let table = io::read_table(&input, Format::Unwrapped).map_err(|e| match e {
            io::Error::Width {
                expected: first,
                found,
                ..
            } => Error::Shape {
                columns: if found != expected { found } else { first },
                expected,
                num_mols,
                num_atoms: masses.len(),
            },
            other => other.into(),
        })?;
        if table.is_empty() {
            return Err(Error::format("file holds no frames"));
        }
        if table.columns != expected {
            return Err(Error::Shape {
                columns: table.columns,
                expected,
                num_mols,
                num_atoms: masses.len(),
            });
        }
        let frames = FrameSeq::from_flat(num_mols * masses.len(), table.values)?;
        let com = reduce_to_com(&frames, masses, num_mols)?;
        io::write_table(&output, com.as_flat(), com.frame_len())?;
        Ok(com.frames())
    };

    let frames = run().map_err(|e| Error::chunk(index, &input, e))?;
    log::debug!("chunk {}: reduced {} frames -> {}", index, frames, output.display());
    Ok(frames)
}

/// Reduces chunks `0..num_chunks` to centers of mass in parallel.
pub fn reduce_chunks(
    layout: &ChunkLayout,
    num_chunks: usize,
    num_mols: usize,
    masses: &MassVector,
) -> Result<StageReport, Error> {
    if num_mols == 0 {
        return Err(Error::InvalidParameter("molecule count must be at least 1".into()));
    }

    log::info!(
        "reducing {} chunks to centers of mass ({} molecules × {} atoms)",
        num_chunks,
        num_mols,
        masses.len()
    );
    let frames = (0..num_chunks)
        .into_par_iter()
        .map(|i| reduce_chunk(layout, i, num_mols, masses))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StageReport::from_frames(&frames))
}

/// Output paths of the aggregation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesFiles {
    pub msd: PathBuf,
    pub alpha2: PathBuf,
}

/// Folds every center-of-mass chunk into the ensemble and writes MSD(t) and α₂(t).
///
/// Chunks are read one at a time in index order. Missing, unparsable, or
/// too-short chunks are skipped with a warning; any other I/O failure aborts.
/// The series spans the shortest included chunk.
pub fn aggregate_chunks(
    layout: &ChunkLayout,
    num_chunks: usize,
    num_mols: usize,
    min_frames: usize,
    label: &str,
) -> Result<(EnsembleStats, SeriesFiles), Error> {
    let mut acc = EnsembleAccumulator::new(num_mols, min_frames)?;
    log::info!(
        "averaging {} chunks (at least {} frames each)",
        num_chunks,
        min_frames
    );

    for index in 0..num_chunks {
        let path = layout.com_file(index);
        let outcome = match io::read_table(&path, Format::CenterOfMass) {
            Ok(table) => com_from_table(table, num_mols)
                .and_then(|com| ChunkContribution::from_com(&com, num_mols, min_frames)),
            Err(e) if e.is_not_found() => Err(SkipReason::Missing),
            Err(e) if e.is_malformed() => Err(SkipReason::Malformed(e.to_string())),
            Err(e) => return Err(Error::chunk(index, path, e.into())),
        };

        match outcome {
            Ok(contribution) => {
                log::debug!("chunk {}: included ({} frames)", index, contribution.lags());
                acc.add(&contribution)?;
            }
            Err(reason) => {
                log::warn!("skipping chunk {} ({}): {}", index, path.display(), reason);
                acc.skip(SkippedChunk {
                    index,
                    path: Some(path),
                    reason,
                });
            }
        }
    }

    let stats = acc.finalize()?;
    let files = SeriesFiles {
        msd: layout.msd_file(label),
        alpha2: layout.alpha2_file(label),
    };
    io::write_table(&files.msd, stats.msd.as_flat(), stats.msd.columns())?;
    io::write_table(&files.alpha2, stats.alpha2.as_flat(), stats.alpha2.columns())?;

    log::info!(
        "ensemble built from {} of {} chunks over {} lags -> {}",
        stats.used,
        stats.total_chunks(),
        stats.msd.lags(),
        files.msd.display()
    );
    Ok((stats, files))
}

fn com_from_table(table: Table, num_mols: usize) -> Result<FrameSeq, SkipReason> {
    if !table.is_empty() && table.columns != num_mols * 3 {
        return Err(SkipReason::Malformed(format!(
            "{} columns per row, expected {} ({} molecules × 3)",
            table.columns,
            num_mols * 3,
            num_mols
        )));
    }
    FrameSeq::from_flat(num_mols, table.values).map_err(|e| SkipReason::Malformed(e.to_string()))
}
