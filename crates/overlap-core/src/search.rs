// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

// Both searches expect `row` sorted ascending by `x`, as every row of a
// `SpatialIndex` is. Coordinates are `i64` so callers can probe `xmin - 1`
// and `xmax` at the edges of the `i32` range.
use crate::geometry::XInterval;

/// Index of the rightmost interval with `x <= xval`, or `None` when every
/// interval starts after `xval` (including the empty row).
#[must_use]
pub fn predecessor(row: &[XInterval], xval: i64) -> Option<usize> {
    let after = row.partition_point(|iv| i64::from(iv.x) <= xval);
    after.checked_sub(1)
}

/// Index of the interval starting exactly at `xval`.
#[must_use]
pub fn exact_match(row: &[XInterval], xval: i64) -> Option<usize> {
    predecessor(row, xval).filter(|&i| i64::from(row[i].x) == xval)
}
