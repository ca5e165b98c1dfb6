// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Synthetic body fixtures shared by the benchmarks.

use overlap_core::{RleRun, SparseBody};

/// Splits an `edge`³ cube into `count` bodies, one contiguous band of `z`
/// planes each, so every neighbouring pair shares a full `edge`² face.
///
/// Each body is encoded with one run per `(y, z)` row, in `(z, y)` order.
pub fn stacked_slabs(edge: i32, count: u32) -> Vec<SparseBody> {
    let count_i = i32::try_from(count.max(1)).unwrap_or(i32::MAX);
    let planes = (edge / count_i).max(1);
    (0..count_i)
        .map(|slab| {
            let z0 = slab * planes;
            let runs = (z0..z0 + planes)
                .flat_map(|z| (0..edge).map(move |y| RleRun::new(0, y, z, edge)))
                .collect();
            SparseBody::new(slab.unsigned_abs() + 1, runs)
        })
        .collect()
}

/// One body shaped as a comb: `teeth` single-voxel-wide runs per row with
/// gaps between them, over an `edge`² grid of rows.
pub fn comb(edge: i32, teeth: i32) -> SparseBody {
    let runs = (0..edge)
        .flat_map(|z| {
            (0..edge).flat_map(move |y| (0..teeth).map(move |t| RleRun::new(t * 2, y, z, 1)))
        })
        .collect();
    SparseBody::new(1, runs)
}
