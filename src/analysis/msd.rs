//! Ensemble mean-square displacement and non-Gaussian parameter.
//!
//! Every chunk is an independent time origin: its displacements are measured
//! from its own first frame, and lag `t` of every chunk is averaged with lag
//! `t` of every other chunk. The flow is
//!
//! 1. [`ChunkContribution::from_com`]: pure per-chunk `|Δr(t)|²` and `|Δr(t)|⁴`,
//! 2. [`EnsembleAccumulator::add`] / [`EnsembleAccumulator::skip`]: fold or
//!    record each chunk,
//! 3. [`EnsembleAccumulator::finalize`]: one division by the valid-chunk count,
//!    optional molecule averaging, and
//!    `α₂(t) = 3⟨|Δr|⁴⟩ / (5⟨|Δr|²⟩²) − 1`.

use std::fmt;
use std::path::PathBuf;

use super::error::Error;
use crate::model::frames::FrameSeq;
use crate::model::series::Series;

/// Molecule averaging kicks in above this many molecules.
pub const MOLECULE_AVERAGING_THRESHOLD: usize = 2;

/// Why a chunk was left out of the ensemble average.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Fewer frames than the per-chunk minimum.
    TooShort { frames: usize, required: usize },
    /// The chunk file does not exist.
    Missing,
    /// The chunk file could not be parsed or has the wrong molecule count.
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooShort { frames, required } => {
                write!(f, "only {} frames, {} required", frames, required)
            }
            SkipReason::Missing => write!(f, "file not found"),
            SkipReason::Malformed(detail) => write!(f, "malformed: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedChunk {
    pub index: usize,
    pub path: Option<PathBuf>,
    pub reason: SkipReason,
}

/// Squared and quartic displacements of one chunk at every lag it spans,
/// laid out `lags × num_mols`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkContribution {
    num_mols: usize,
    r2: Vec<f64>,
    r4: Vec<f64>,
}

impl ChunkContribution {
    /// Measures displacements from frame 0 over every frame of `com`.
    ///
    /// Chunks with fewer than `min_frames` frames are rejected.
    pub fn from_com(com: &FrameSeq, num_mols: usize, min_frames: usize) -> Result<Self, SkipReason> {
        if com.entities() != num_mols {
            return Err(SkipReason::Malformed(format!(
                "{} molecules per frame, expected {}",
                com.entities(),
                num_mols
            )));
        }
        if com.frames() < min_frames.max(1) {
            return Err(SkipReason::TooShort {
                frames: com.frames(),
                required: min_frames.max(1),
            });
        }

        let origin = com.frame(0);
        let mut r2 = Vec::with_capacity(com.frames() * num_mols);

        for frame in com.iter_frames() {
            for (pos, org) in frame.chunks_exact(3).zip(origin.chunks_exact(3)) {
                let dx = pos[0] - org[0];
                let dy = pos[1] - org[1];
                let dz = pos[2] - org[2];
                r2.push(dx * dx + dy * dy + dz * dz);
            }
        }
        let r4 = r2.iter().map(|v| v * v).collect();

        Ok(Self { num_mols, r2, r4 })
    }

    pub fn lags(&self) -> usize {
        self.r2.len() / self.num_mols
    }

    /// `|Δr(t)|²` laid out `lags × num_mols`.
    pub fn squared(&self) -> &[f64] {
        &self.r2
    }

    /// `|Δr(t)|⁴` laid out `lags × num_mols`.
    pub fn quartic(&self) -> &[f64] {
        &self.r4
    }
}

/// Final ensemble statistics and the bookkeeping of how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleStats {
    /// ⟨|Δr(t)|²⟩ per lag.
    pub msd: Series,
    /// ⟨|Δr(t)|⁴⟩ per lag.
    pub quartic: Series,
    /// α₂(t) per lag; `NaN` wherever the MSD is zero, always at `t = 0`.
    pub alpha2: Series,
    /// Chunks that entered the average.
    pub used: usize,
    /// Chunks left out, in chunk order.
    pub skipped: Vec<SkippedChunk>,
    /// Whether the per-molecule series were averaged into one column.
    pub molecule_averaged: bool,
}

impl EnsembleStats {
    pub fn total_chunks(&self) -> usize {
        self.used + self.skipped.len()
    }
}

/// Running ensemble sums over valid chunks.
///
/// The lag window starts at the length of the first included chunk and
/// shrinks to the shortest chunk folded in after it, so every lag in the
/// final series is averaged over the same set of chunks.
#[derive(Debug, Clone)]
pub struct EnsembleAccumulator {
    num_mols: usize,
    min_frames: usize,
    sum_r2: Vec<f64>,
    sum_r4: Vec<f64>,
    used: usize,
    skipped: Vec<SkippedChunk>,
}

impl EnsembleAccumulator {
    /// Creates an empty accumulator for `num_mols` molecules that admits
    /// chunks of at least `min_frames` frames.
    pub fn new(num_mols: usize, min_frames: usize) -> Result<Self, Error> {
        if num_mols == 0 {
            return Err(Error::InvalidParameter(
                "molecule count must be at least 1".into(),
            ));
        }
        if min_frames == 0 {
            return Err(Error::InvalidParameter(
                "minimum frames per chunk must be at least 1".into(),
            ));
        }
        Ok(Self {
            num_mols,
            min_frames,
            sum_r2: Vec::new(),
            sum_r4: Vec::new(),
            used: 0,
            skipped: Vec::new(),
        })
    }

    pub fn num_mols(&self) -> usize {
        self.num_mols
    }

    pub fn min_frames(&self) -> usize {
        self.min_frames
    }

    /// Current lag window; zero until a chunk has been folded in.
    pub fn lags(&self) -> usize {
        self.sum_r2.len() / self.num_mols
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn skipped(&self) -> &[SkippedChunk] {
        &self.skipped
    }

    /// Folds one chunk's contribution into the sums, truncating the window
    /// when the chunk is shorter than every chunk before it.
    pub fn add(&mut self, contribution: &ChunkContribution) -> Result<(), Error> {
        if contribution.num_mols != self.num_mols {
            return Err(Error::InvalidParameter(format!(
                "contribution covers {} molecules, accumulator expects {}",
                contribution.num_mols, self.num_mols
            )));
        }
        if contribution.lags() < self.min_frames {
            return Err(Error::InvalidParameter(format!(
                "contribution spans {} frames, at least {} required",
                contribution.lags(),
                self.min_frames
            )));
        }

        if self.used == 0 {
            self.sum_r2 = contribution.r2.clone();
            self.sum_r4 = contribution.r4.clone();
        } else {
            let len = self.sum_r2.len().min(contribution.r2.len());
            if len < self.sum_r2.len() {
                log::debug!(
                    "lag window shrinks from {} to {}",
                    self.lags(),
                    contribution.lags()
                );
            }
            self.sum_r2.truncate(len);
            self.sum_r4.truncate(len);
            for (acc, v) in self.sum_r2.iter_mut().zip(&contribution.r2) {
                *acc += v;
            }
            for (acc, v) in self.sum_r4.iter_mut().zip(&contribution.r4) {
                *acc += v;
            }
        }
        self.used += 1;
        Ok(())
    }

    pub fn skip(&mut self, skipped: SkippedChunk) {
        self.skipped.push(skipped);
    }

    /// Builds the contribution of `com` and folds it in, or records the skip.
    pub fn offer(&mut self, index: usize, path: Option<PathBuf>, com: &FrameSeq) -> Result<(), Error> {
        match ChunkContribution::from_com(com, self.num_mols, self.min_frames) {
            Ok(contribution) => self.add(&contribution),
            Err(reason) => {
                self.skip(SkippedChunk {
                    index,
                    path,
                    reason,
                });
                Ok(())
            }
        }
    }

    /// Divides by the valid-chunk count and derives α₂(t).
    pub fn finalize(self) -> Result<EnsembleStats, Error> {
        if self.used == 0 {
            return Err(Error::InsufficientData {
                total: self.skipped.len(),
            });
        }

        let n = self.used as f64;
        let per_mol_r2 = Series::new(self.num_mols, self.sum_r2).map(|v| v / n);
        let per_mol_r4 = Series::new(self.num_mols, self.sum_r4).map(|v| v / n);

        let molecule_averaged = self.num_mols > MOLECULE_AVERAGING_THRESHOLD;
        let (msd, quartic) = if molecule_averaged {
            (per_mol_r2.mean_over_columns(), per_mol_r4.mean_over_columns())
        } else {
            (per_mol_r2, per_mol_r4)
        };

        let alpha2 = Series::new(
            msd.columns(),
            msd.as_flat()
                .iter()
                .zip(quartic.as_flat())
                .map(|(&r2, &r4)| non_gaussian(r2, r4))
                .collect(),
        );

        Ok(EnsembleStats {
            msd,
            quartic,
            alpha2,
            used: self.used,
            skipped: self.skipped,
            molecule_averaged,
        })
    }
}

/// `α₂ = 3⟨r⁴⟩ / (5⟨r²⟩²) − 1`, or `NaN` when `⟨r²⟩` is zero.
#[inline]
pub fn non_gaussian(r2: f64, r4: f64) -> f64 {
    if r2 == 0.0 {
        f64::NAN
    } else {
        3.0 * r4 / (5.0 * r2 * r2) - 1.0
    }
}

/// Averages in-memory center-of-mass chunks.
///
/// Chunks with fewer than `min_frames` frames or a different molecule count
/// are skipped and reported in [`EnsembleStats::skipped`]. The series spans
/// the shortest included chunk.
pub fn aggregate(
    chunks: &[FrameSeq],
    num_mols: usize,
    min_frames: usize,
) -> Result<EnsembleStats, Error> {
    let mut acc = EnsembleAccumulator::new(num_mols, min_frames)?;
    for (index, com) in chunks.iter().enumerate() {
        acc.offer(index, None, com)?;
    }
    acc.finalize()
}
