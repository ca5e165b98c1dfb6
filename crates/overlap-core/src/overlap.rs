// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pairwise face overlap across a body set.
use rustc_hash::FxHashSet;
use tracing::{debug, instrument};

use crate::accumulate::{probe_run, ContactCounts, Probe};
use crate::error::OverlapError;
use crate::geometry::{BodyId, OverlapRecord, SparseBody};
use crate::index::SpatialIndex;

/// Counts touching voxel faces between every pair of `bodies`.
///
/// Bodies are ordered by run count. The smallest (`first`) is left out of the
/// shared index and the largest (`last`) is never scanned, which keeps memory
/// proportional to everything but the smallest body. Every other pair is found
/// once from each side, so those counts are halved afterwards (see
/// [`halve_double_counts`]).
///
/// Returns pairs with at least one shared face, most faces first; equal
/// counts are ordered by ascending `(body1, body2)`.
///
/// # Errors
/// [`OverlapError::NoBodies`] for an empty set, and
/// [`OverlapError::DuplicateBody`] if an id occurs twice (contacts between
/// same-id bodies would be indistinguishable from self contact).
#[instrument(skip_all, fields(bodies = bodies.len()))]
pub fn compute_overlap(mut bodies: Vec<SparseBody>) -> Result<Vec<OverlapRecord>, OverlapError> {
    let mut seen = FxHashSet::default();
    seen.reserve(bodies.len());
    for body in &bodies {
        if !seen.insert(body.id()) {
            return Err(OverlapError::DuplicateBody(body.id()));
        }
    }

    bodies.sort_by_key(SparseBody::run_count);
    let (Some(first), Some(last)) = (bodies.first(), bodies.last()) else {
        return Err(OverlapError::NoBodies);
    };
    let (first, last) = (first.id(), last.id());

    let index = SpatialIndex::build(&bodies, Some(first));
    debug!(
        rows = index.row_count(),
        intervals = index.interval_count(),
        "indexed bodies"
    );

    let mut counts = ContactCounts::new();
    for body in &bodies[..bodies.len() - 1] {
        let probe = Probe::Body(body.id());
        for run in body.runs() {
            probe_run(&mut counts, &index, run, probe);
        }
    }

    halve_double_counts(&mut counts, first, last);

    let mut out: Vec<OverlapRecord> = counts
        .pairs()
        .filter(|&(_, faces)| faces > 0)
        .map(|(pair, faces)| OverlapRecord {
            body1: pair.body1(),
            body2: pair.body2(),
            faces,
        })
        .collect();
    out.sort_unstable_by(|a, b| {
        b.faces
            .cmp(&a.faces)
            .then(a.body1.cmp(&b.body1))
            .then(a.body2.cmp(&b.body2))
    });
    debug!(pairs = out.len(), "overlap computed");
    Ok(out)
}

/// Halves every pair tally that involves neither `first` nor `last`.
///
/// `first` is absent from the index and `last` is never scanned, so a pair
/// touching either is discovered from one side only; every other pair is
/// discovered once from each member.
pub fn halve_double_counts(counts: &mut ContactCounts, first: BodyId, last: BodyId) {
    let mut halved = 0usize;
    for (pair, faces) in counts.pairs_mut() {
        if !pair.contains(first) && !pair.contains(last) {
            *faces /= 2;
            halved += 1;
        }
    }
    debug!(halved, "double counts corrected");
}
