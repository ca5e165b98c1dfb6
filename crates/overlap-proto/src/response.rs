// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON response bodies. Each is an object with a single array-valued key;
//! the engine records inside serialize as `[u32; 3]` triples.

use overlap_core::{BodyStats, OverlapRecord};
use serde::{Deserialize, Serialize};

/// `{"overlap-list": [[body1, body2, faces], ...]}`, most faces first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapResponse {
    /// Touching pairs; pairs with no shared face are omitted.
    #[serde(rename = "overlap-list")]
    pub overlap_list: Vec<OverlapRecord>,
}

impl From<&[OverlapRecord]> for OverlapResponse {
    fn from(records: &[OverlapRecord]) -> Self {
        Self {
            overlap_list: records
                .iter()
                .filter(|r| r.faces > 0)
                .copied()
                .collect(),
        }
    }
}

/// `{"body-stats": [[body, volume, surface_area], ...]}`, largest area first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// One entry per requested body.
    #[serde(rename = "body-stats")]
    pub body_stats: Vec<BodyStats>,
}

impl From<&[BodyStats]> for StatsResponse {
    fn from(stats: &[BodyStats]) -> Self {
        Self {
            body_stats: stats.to_vec(),
        }
    }
}
