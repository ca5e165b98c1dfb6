// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use rustc_hash::FxHashMap;

use crate::geometry::{BodyId, SparseBody, XInterval};

/// Key of one index row: every voxel in a row shares `y` and `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey {
    /// Row coordinate.
    pub y: i32,
    /// Plane coordinate.
    pub z: i32,
}

impl RowKey {
    /// Builds the key for `(y, z)`.
    #[must_use]
    pub const fn new(y: i32, z: i32) -> Self {
        Self { y, z }
    }

    /// The four rows whose voxels can share a y- or z-face with this row,
    /// or `None` where the neighbour coordinate would leave `i32`.
    #[must_use]
    pub fn neighbours(self) -> [Option<Self>; 4] {
        [
            self.y.checked_add(1).map(|y| Self::new(y, self.z)),
            self.y.checked_sub(1).map(|y| Self::new(y, self.z)),
            self.z.checked_add(1).map(|z| Self::new(self.y, z)),
            self.z.checked_sub(1).map(|z| Self::new(self.y, z)),
        ]
    }
}

/// Map from `(y, z)` to the x-intervals in that row, sorted ascending by `x`.
///
/// Built once per engine call and read-only afterwards. Rows only exist for
/// keys that received at least one run.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    rows: FxHashMap<RowKey, Vec<XInterval>>,
}

impl SpatialIndex {
    /// Indexes every run of every body except `exclude`.
    #[must_use]
    pub fn build(bodies: &[SparseBody], exclude: Option<BodyId>) -> Self {
        Self::from_bodies(bodies.iter().filter(|b| Some(b.id()) != exclude))
    }

    /// Indexes the runs of a single body.
    #[must_use]
    pub fn for_body(body: &SparseBody) -> Self {
        Self::from_bodies(core::iter::once(body))
    }

    fn from_bodies<'a, I>(bodies: I) -> Self
    where
        I: IntoIterator<Item = &'a SparseBody>,
    {
        let mut index = Self::default();
        for body in bodies {
            index.insert(body);
        }
        for row in index.rows.values_mut() {
            row.sort_unstable_by_key(|iv| iv.x);
        }
        index
    }

    // Runs of one body usually come grouped by row, so consecutive runs with
    // the same key are flushed as one batch.
    fn insert(&mut self, body: &SparseBody) {
        let id = body.id();
        let mut batch: Vec<XInterval> = Vec::new();
        let mut current: Option<RowKey> = None;
        for run in body.runs() {
            let key = RowKey::new(run.y, run.z);
            if current != Some(key) {
                if let Some(prev) = current {
                    self.flush(prev, &mut batch);
                }
                current = Some(key);
            }
            batch.push(XInterval {
                body: id,
                x: run.x,
                length: run.length,
            });
        }
        if let Some(prev) = current {
            self.flush(prev, &mut batch);
        }
    }

    fn flush(&mut self, key: RowKey, batch: &mut Vec<XInterval>) {
        if batch.is_empty() {
            return;
        }
        self.rows.entry(key).or_default().append(batch);
    }

    /// The sorted intervals of row `key`, if any run landed there.
    #[must_use]
    pub fn row(&self, key: RowKey) -> Option<&[XInterval]> {
        self.rows.get(&key).map(Vec::as_slice)
    }

    /// Number of non-empty rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of indexed intervals.
    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}
