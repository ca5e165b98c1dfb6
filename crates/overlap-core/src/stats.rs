// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-body volume and exposed surface area.
use tracing::{debug, instrument};

use crate::accumulate::{probe_run, ContactCounts, ContactKey, Probe};
use crate::geometry::{BodyStats, SparseBody};
use crate::index::SpatialIndex;

/// Volume and surface area of one body, independent of any other body.
///
/// Each run of length `n` exposes at most `4n + 2` faces: four sides per
/// voxel plus the two x end caps. Probing the body against its own index
/// finds every face shared between two of its voxels, once from each side,
/// which is exactly the number of faces hidden from the outside.
#[must_use]
pub fn body_stats(body: &SparseBody) -> BodyStats {
    let index = SpatialIndex::for_body(body);

    let mut max_faces = 0u32;
    let mut counts = ContactCounts::new();
    for run in body.runs() {
        let run_faces = run.voxels().saturating_mul(4).saturating_add(2);
        max_faces = max_faces.saturating_add(run_faces);
        probe_run(&mut counts, &index, run, Probe::SelfContact);
    }
    let hidden = counts.get(ContactKey::Internal(body.id()));

    BodyStats {
        body: body.id(),
        volume: body.volume(),
        surface_area: max_faces.saturating_sub(hidden),
    }
}

/// [`body_stats`] for every body, largest surface area first; equal areas are
/// ordered by ascending body id.
#[instrument(skip_all, fields(bodies = bodies.len()))]
pub fn compute_stats(bodies: &[SparseBody]) -> Vec<BodyStats> {
    let mut out: Vec<BodyStats> = bodies.iter().map(body_stats).collect();
    out.sort_unstable_by(|a, b| {
        b.surface_area
            .cmp(&a.surface_area)
            .then(a.body.cmp(&b.body))
    });
    debug!(bodies = out.len(), "stats computed");
    out
}
