// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Precondition failures reported by the engines.
use thiserror::Error;

use crate::geometry::BodyId;

/// Errors emitted by [`compute_overlap`](crate::compute_overlap).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlapError {
    /// The body set was empty.
    #[error("at least one body required")]
    NoBodies,
    /// The same body id appeared more than once in one request.
    #[error("duplicate body id: {0}")]
    DuplicateBody(BodyId),
}
