//! Core data structures flowing through the analysis pipeline.
//!
//! - [`frames`] – Flat, shape-checked per-frame position buffers ([`FrameSeq`]).
//! - [`geometry`] – Rectangular simulation cell lengths ([`BoxGeometry`]).
//! - [`masses`] – Per-atom masses of the molecular species ([`MassVector`]).
//! - [`series`] – Lag-indexed result tables ([`Series`]).
//!
//! Per-atom and per-molecule trajectories share the same [`FrameSeq`] type;
//! only the entity count differs.
//!
//! [`FrameSeq`]: frames::FrameSeq
//! [`BoxGeometry`]: geometry::BoxGeometry
//! [`MassVector`]: masses::MassVector
//! [`Series`]: series::Series

pub mod frames;
pub mod geometry;
pub mod masses;
pub mod series;
