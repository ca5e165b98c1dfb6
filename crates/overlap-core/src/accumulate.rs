// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use rustc_hash::FxHashMap;

use crate::geometry::{BodyId, BodyPair, RleRun, XInterval};
use crate::index::{RowKey, SpatialIndex};
use crate::search::{exact_match, predecessor};

/// Who is probing the index, which decides what counts as a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// A run of this body looks for other bodies; its own intervals are skipped.
    Body(BodyId),
    /// A body probes an index of itself; every interval counts as an
    /// internal contact.
    SelfContact,
}

impl Probe {
    fn skips(self, owner: BodyId) -> bool {
        matches!(self, Self::Body(id) if id == owner)
    }

    /// Map key under which a contact with an interval of `owner` is recorded.
    #[must_use]
    pub fn key(self, owner: BodyId) -> ContactKey {
        match self {
            Self::Body(id) => ContactKey::Pair(BodyPair::new(id, owner)),
            Self::SelfContact => ContactKey::Internal(owner),
        }
    }
}

/// Key of the contact map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactKey {
    /// Faces shared between two different bodies.
    Pair(BodyPair),
    /// Faces a body shares with itself.
    Internal(BodyId),
}

/// Face-contact tallies accumulated while probing.
#[derive(Debug, Clone, Default)]
pub struct ContactCounts {
    counts: FxHashMap<ContactKey, u32>,
}

impl ContactCounts {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `faces` to `key`, saturating at `u32::MAX`.
    pub fn add(&mut self, key: ContactKey, faces: u32) {
        let slot = self.counts.entry(key).or_insert(0);
        *slot = slot.saturating_add(faces);
    }

    /// Current tally for `key` (zero if never touched).
    #[must_use]
    pub fn get(&self, key: ContactKey) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct keys recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Cross-body tallies, in no particular order.
    pub fn pairs(&self) -> impl Iterator<Item = (BodyPair, u32)> + '_ {
        self.counts.iter().filter_map(|(key, &n)| match key {
            ContactKey::Pair(pair) => Some((*pair, n)),
            ContactKey::Internal(_) => None,
        })
    }

    /// Mutable access to the cross-body tallies.
    pub fn pairs_mut(&mut self) -> impl Iterator<Item = (BodyPair, &mut u32)> + '_ {
        self.counts.iter_mut().filter_map(|(key, n)| match key {
            ContactKey::Pair(pair) => Some((*pair, n)),
            ContactKey::Internal(_) => None,
        })
    }
}

fn faces_u32(faces: i64) -> u32 {
    u32::try_from(faces).unwrap_or(u32::MAX)
}

/// Counts faces shared between the probe span `[xmin, xmax)` and the
/// intervals of an adjacent row.
///
/// Only intervals whose start lies in `..xmax` can overlap the span; of those,
/// everything before the predecessor of `xmin - 1` ends before `xmin` (rows
/// never hold overlapping voxels), so the scan is limited to that window.
pub fn accumulate(
    counts: &mut ContactCounts,
    row: &[XInterval],
    xmin: i64,
    xmax: i64,
    probe: Probe,
) {
    if xmax <= xmin {
        return;
    }
    let Some(max_idx) = predecessor(row, xmax - 1) else {
        return;
    };
    let min_idx = predecessor(row, xmin - 1).unwrap_or(0);
    let Some(window) = row.get(min_idx..=max_idx) else {
        return;
    };

    for iv in window {
        if probe.skips(iv.body) {
            continue;
        }
        let mut start = i64::from(iv.x);
        let mut length = i64::from(iv.length);
        if start < xmin {
            length -= xmin - start;
            start = xmin;
        }
        if length > 0 {
            let faces = length.min(xmax - start);
            counts.add(probe.key(iv.body), faces_u32(faces));
        }
    }
}

/// Counts the x-faces at either end of `[xmin, xmax)` within its own row:
/// an interval ending at `xmin - 1` and an interval starting at `xmax`.
pub fn touch_row_ends(
    counts: &mut ContactCounts,
    row: &[XInterval],
    xmin: i64,
    xmax: i64,
    probe: Probe,
) {
    if let Some(iv) = predecessor(row, xmin - 1).map(|i| row[i]) {
        if !probe.skips(iv.body) && iv.end() == xmin {
            counts.add(probe.key(iv.body), 1);
        }
    }
    if let Some(iv) = exact_match(row, xmax).map(|i| row[i]) {
        if !probe.skips(iv.body) {
            counts.add(probe.key(iv.body), 1);
        }
    }
}

/// Probes all six face directions of `run` against `index`.
pub fn probe_run(counts: &mut ContactCounts, index: &SpatialIndex, run: &RleRun, probe: Probe) {
    let xmin = i64::from(run.x);
    let xmax = run.end();
    let key = RowKey::new(run.y, run.z);

    for neighbour in key.neighbours().into_iter().flatten() {
        if let Some(row) = index.row(neighbour) {
            accumulate(counts, row, xmin, xmax, probe);
        }
    }
    if let Some(row) = index.row(key) {
        touch_row_ends(counts, row, xmin, xmax, probe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(body: u32, x: i32, length: i32) -> XInterval {
        XInterval {
            body: BodyId(body),
            x,
            length,
        }
    }

    fn pair(a: u32, b: u32) -> ContactKey {
        ContactKey::Pair(BodyPair::new(BodyId(a), BodyId(b)))
    }

    #[test]
    fn accumulate_clips_to_probe_span() {
        // Row: body 2 covers [0,4), body 3 covers [6,12).
        let row = [iv(2, 0, 4), iv(3, 6, 6)];
        let mut counts = ContactCounts::new();
        accumulate(&mut counts, &row, 2, 8, Probe::Body(BodyId(1)));
        assert_eq!(counts.get(pair(1, 2)), 2);
        assert_eq!(counts.get(pair(1, 3)), 2);
    }

    #[test]
    fn accumulate_skips_own_body_and_rows_out_of_reach() {
        let row = [iv(1, 0, 10), iv(2, 20, 5)];
        let mut counts = ContactCounts::new();
        accumulate(&mut counts, &row, 0, 10, Probe::Body(BodyId(1)));
        assert!(counts.is_empty());

        accumulate(&mut counts, &row, -10, -5, Probe::Body(BodyId(9)));
        assert!(counts.is_empty());
    }

    #[test]
    fn accumulate_ignores_intervals_ending_before_span() {
        let row = [iv(2, 0, 3), iv(3, 3, 1)];
        let mut counts = ContactCounts::new();
        accumulate(&mut counts, &row, 4, 6, Probe::Body(BodyId(1)));
        assert!(counts.is_empty());
    }

    #[test]
    fn accumulate_tolerates_empty_span() {
        let row = [iv(2, 0, 3), iv(3, 5, 1)];
        let mut counts = ContactCounts::new();
        accumulate(&mut counts, &row, 6, 2, Probe::Body(BodyId(1)));
        assert!(counts.is_empty());
    }

    #[test]
    fn self_contact_counts_every_interval() {
        let row = [iv(4, 0, 3)];
        let mut counts = ContactCounts::new();
        accumulate(&mut counts, &row, 0, 3, Probe::SelfContact);
        assert_eq!(counts.get(ContactKey::Internal(BodyId(4))), 3);
        assert_eq!(counts.pairs().count(), 0);
    }

    #[test]
    fn row_ends_need_exact_touch() {
        // Probe [5,8): body 2 ends at 4 (touch), body 3 starts at 8 (touch).
        let row = [iv(2, 1, 4), iv(1, 5, 3), iv(3, 8, 2)];
        let mut counts = ContactCounts::new();
        touch_row_ends(&mut counts, &row, 5, 8, Probe::Body(BodyId(1)));
        assert_eq!(counts.get(pair(1, 2)), 1);
        assert_eq!(counts.get(pair(1, 3)), 1);

        // A gap of one voxel on either side is not a touch.
        let gapped = [iv(2, 0, 4), iv(3, 9, 2)];
        let mut counts = ContactCounts::new();
        touch_row_ends(&mut counts, &gapped, 5, 8, Probe::Body(BodyId(1)));
        assert!(counts.is_empty());
    }

    #[test]
    fn counts_saturate() {
        let mut counts = ContactCounts::new();
        counts.add(pair(1, 2), u32::MAX);
        counts.add(pair(2, 1), 5);
        assert_eq!(counts.get(pair(1, 2)), u32::MAX);
        assert_eq!(counts.len(), 1);
    }
}
