//! Post-processing of chunked molecular-dynamics trajectories into per-molecule
//! dynamical statistics: mean-square displacement MSD(t) and the non-Gaussian
//! parameter α₂(t).
//!
//! # Features
//!
//! - **Unwrapping** — minimum-image removal of periodic-boundary jumps in an
//!   axis-aligned rectangular box
//! - **Center-of-mass reduction** — mass-weighted collapse of each molecule of
//!   a single species to one point
//! - **Ensemble statistics** — every trajectory chunk is an independent time
//!   origin; MSD(t) and α₂(t) are averaged across chunks aligned by lag
//! - **Extraction** — per-chunk VMD scripts turn `(psf, dcd)` pairs into
//!   plain-text frame files
//! - **Chunk layout** — one object owns every input and output path of a run
//!
//! # Quick Start
//!
//! Two equal-mass atoms moving together along x, one chunk, three frames:
//!
//! ```
//! use msd_forge::{AnalysisError, BoxGeometry, FrameSeq, MassVector};
//! use msd_forge::{aggregate, reduce_to_com, unwrap};
//!
//! let wrapped = FrameSeq::from_flat(
//!     2,
//!     vec![
//!         0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
//!         1.0, 0.0, 0.0, 1.0, 0.0, 0.0,
//!         2.0, 0.0, 0.0, 2.0, 0.0, 0.0,
//!     ],
//! )?;
//! let geometry = BoxGeometry::new(10.0, 10.0, 10.0)?;
//! let masses = MassVector::new(vec![1.0, 1.0])?;
//!
//! let unwrapped = unwrap(&wrapped, &geometry);
//! let com = reduce_to_com(&unwrapped, &masses, 1)?;
//! let stats = aggregate(&[com], 1, 3)?;
//!
//! assert_eq!(stats.msd.as_flat(), &[0.0, 1.0, 4.0]);
//! assert!(stats.alpha2.value(0, 0).is_nan());
//! assert!((stats.alpha2.value(1, 0) + 0.4).abs() < 1e-12);
//! # Ok::<(), AnalysisError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`analysis`] — Unwrapping, center-of-mass reduction, ensemble statistics,
//!   and the per-chunk stage drivers that read and write files
//! - [`extract`] — VMD script rendering and process driver
//! - [`io`] — Flat-text tables, `.xsc` records, atomic writes, [`ChunkLayout`]
//! - [`config`] — TOML pipeline configuration
//!
//! # Data Types
//!
//! - [`FrameSeq`] — Flat `frames × entities × 3` buffer with shape-checked access
//! - [`BoxGeometry`] — Cell edge lengths
//! - [`MassVector`] — Per-atom masses of the molecular species
//! - [`Series`] — Lag-indexed result table
//! - [`EnsembleStats`] — MSD(t), α₂(t), and chunk accounting

pub mod analysis;
pub mod config;
pub mod extract;
pub mod io;
mod model;

pub use model::frames::{FrameSeq, FrameShapeError};
pub use model::geometry::{Axis, BoxGeometry, GeometryError};
pub use model::masses::{MassError, MassVector};
pub use model::series::Series;

pub use analysis::{
    EnsembleAccumulator, EnsembleStats, SkipReason, SkippedChunk, aggregate, reduce_to_com, unwrap,
};
pub use config::PipelineConfig;
pub use extract::ExtractConfig;
pub use io::ChunkLayout;

pub use analysis::Error as AnalysisError;
pub use config::Error as ConfigError;
pub use extract::Error as ExtractError;
