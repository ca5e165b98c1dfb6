// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;

/// Identifier of a labelled body (segment) in the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BodyId(pub u32);

impl BodyId {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for BodyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A contiguous span of voxels along x at a fixed `(y, z)`.
///
/// Covers `x..x + length`. Well-formed runs have `length > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RleRun {
    /// First voxel on the x axis.
    pub x: i32,
    /// Row coordinate.
    pub y: i32,
    /// Plane coordinate.
    pub z: i32,
    /// Number of voxels in the run.
    pub length: i32,
}

impl RleRun {
    /// Builds a run starting at `(x, y, z)` covering `length` voxels.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32, length: i32) -> Self {
        Self { x, y, z, length }
    }

    /// Exclusive end of the run on the x axis, widened so it cannot overflow.
    #[must_use]
    pub fn end(&self) -> i64 {
        i64::from(self.x) + i64::from(self.length)
    }

    /// Voxel count, treating non-positive lengths as empty.
    #[must_use]
    pub fn voxels(&self) -> u32 {
        u32::try_from(self.length).unwrap_or(0)
    }
}

/// A body described by its RLE runs.
///
/// Runs are expected in ascending `(z, y, x)` or `(y, z, x)` order as
/// produced by the volume server; the engines sort what they index and do
/// not otherwise rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseBody {
    id: BodyId,
    runs: Vec<RleRun>,
}

impl SparseBody {
    /// Wraps the runs of body `id`.
    #[must_use]
    pub fn new(id: u32, runs: Vec<RleRun>) -> Self {
        Self {
            id: BodyId(id),
            runs,
        }
    }

    /// Body id.
    #[must_use]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Runs in input order.
    #[must_use]
    pub fn runs(&self) -> &[RleRun] {
        &self.runs
    }

    /// Number of runs; the engines use it as a proxy for memory footprint.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Total voxel count, saturating at `u32::MAX`.
    #[must_use]
    pub fn volume(&self) -> u32 {
        self.runs
            .iter()
            .fold(0u32, |acc, run| acc.saturating_add(run.voxels()))
    }
}

/// A run projected into its `(y, z)` row: owner plus x extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XInterval {
    /// Owning body.
    pub body: BodyId,
    /// First voxel on the x axis.
    pub x: i32,
    /// Number of voxels.
    pub length: i32,
}

impl XInterval {
    /// Exclusive end on the x axis.
    #[must_use]
    pub fn end(&self) -> i64 {
        i64::from(self.x) + i64::from(self.length)
    }
}

/// Unordered pair of bodies, stored as `(min, max)`.
///
/// The fields are private so the only way in is [`BodyPair::new`], which
/// canonicalizes; `BodyPair::new(a, b) == BodyPair::new(b, a)` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyPair {
    body1: BodyId,
    body2: BodyId,
}

impl BodyPair {
    /// Canonical pair of `a` and `b`.
    #[must_use]
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if b < a {
            Self { body1: b, body2: a }
        } else {
            Self { body1: a, body2: b }
        }
    }

    /// Smaller id.
    #[must_use]
    pub fn body1(&self) -> BodyId {
        self.body1
    }

    /// Larger id.
    #[must_use]
    pub fn body2(&self) -> BodyId {
        self.body2
    }

    /// Returns `true` if either member is `id`.
    #[must_use]
    pub fn contains(&self, id: BodyId) -> bool {
        self.body1 == id || self.body2 == id
    }
}

/// Number of touching voxel faces between two bodies.
///
/// With the `serde` feature it serializes as the triple `[body1, body2, faces]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "[u32; 3]", from = "[u32; 3]"))]
pub struct OverlapRecord {
    /// Smaller id of the pair.
    pub body1: BodyId,
    /// Larger id of the pair.
    pub body2: BodyId,
    /// Touching face count (always positive in engine output).
    pub faces: u32,
}

/// Size and exposed surface of one body.
///
/// With the `serde` feature it serializes as the triple `[body, volume, surface_area]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "[u32; 3]", from = "[u32; 3]"))]
pub struct BodyStats {
    /// Body id.
    pub body: BodyId,
    /// Voxel count.
    pub volume: u32,
    /// Voxel faces not shared with another voxel of the same body.
    pub surface_area: u32,
}

impl From<OverlapRecord> for [u32; 3] {
    fn from(r: OverlapRecord) -> Self {
        [r.body1.get(), r.body2.get(), r.faces]
    }
}

impl From<[u32; 3]> for OverlapRecord {
    fn from([body1, body2, faces]: [u32; 3]) -> Self {
        Self {
            body1: BodyId(body1),
            body2: BodyId(body2),
            faces,
        }
    }
}

impl From<BodyStats> for [u32; 3] {
    fn from(s: BodyStats) -> Self {
        [s.body.get(), s.volume, s.surface_area]
    }
}

impl From<[u32; 3]> for BodyStats {
    fn from([body, volume, surface_area]: [u32; 3]) -> Self {
        Self {
            body: BodyId(body),
            volume,
            surface_area,
        }
    }
}
