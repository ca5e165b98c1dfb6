// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![doc = r"Face-adjacency overlap and surface statistics for sparse voxel bodies.

Bodies arrive as run-length-encoded x-spans at fixed `(y, z)`. This crate
provides:
- The geometry model (`RleRun`, `SparseBody`, `BodyPair`, output records).
- A row index keyed by `(y, z)` holding x-sorted intervals (`SpatialIndex`).
- Binary-search probes over one row (`predecessor`, `exact_match`).
- The adjacency accumulator shared by both engines.
- `compute_overlap`: touching voxel faces between every pair of bodies.
- `compute_stats`: volume and exposed surface area per body.

Design notes:
- Adjacency is 6-connected: two voxels touch when they share a unit face.
- Pair identity is canonicalized as `(min_id, max_id)`.
- Ranked outputs break ties by ascending body id, so results are fully
  deterministic for a given input set.
- Inputs are trusted: runs are not checked for overlap or ordering. Malformed
  runs yield meaningless counts but never panic.
"]

/// Adjacency accumulation over index rows.
pub mod accumulate;
mod error;
/// Geometry model: runs, bodies, intervals, pairs, records.
pub mod geometry;
/// Row index keyed by `(y, z)`.
pub mod index;
mod overlap;
/// Binary-search primitives over one sorted row.
pub mod search;
mod stats;

pub use accumulate::{ContactCounts, ContactKey, Probe};
pub use error::OverlapError;
pub use geometry::{BodyId, BodyPair, BodyStats, OverlapRecord, RleRun, SparseBody, XInterval};
pub use index::{RowKey, SpatialIndex};
pub use overlap::{compute_overlap, halve_double_counts};
pub use stats::{body_stats, compute_stats};
