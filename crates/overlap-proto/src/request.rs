// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Service requests: JSON bodies and HTML form posts.

use std::collections::HashSet;

use overlap_core::BodyId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which computation a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Pairwise face overlap.
    Overlap,
    /// Per-body volume and surface area.
    Stats,
}

impl Operation {
    /// Fewest bodies a request must name.
    #[must_use]
    pub const fn min_bodies(self) -> usize {
        match self {
            Self::Overlap => 2,
            Self::Stats => 1,
        }
    }
}

/// Errors raised while parsing or validating a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Body was not valid JSON or did not match the request shape.
    #[error("JSON did not pass validation: {0}")]
    Json(#[from] serde_json::Error),
    /// Fewer bodies than the operation needs.
    #[error("at least {min} bodies required, got {got}")]
    TooFewBodies {
        /// Required minimum.
        min: usize,
        /// Bodies supplied.
        got: usize,
    },
    /// A body id listed twice.
    #[error("duplicate body id: {0}")]
    DuplicateBody(u64),
    /// A body id outside `1..=u32::MAX`.
    #[error("body id out of range: {0}")]
    BodyOutOfRange(u64),
    /// The uuid was empty or contained characters other than ASCII letters and digits.
    #[error("invalid uuid: {0:?}")]
    InvalidUuid(String),
    /// A form body list entry was not an integer.
    #[error("invalid body list entry: {0:?}")]
    InvalidBodyList(String),
}

/// JSON request accepted by the overlap and stats endpoints.
///
/// ```json
/// { "dvid-server": "emdata1:80", "uuid": "4234", "bodies": [100, 140, 233] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodiesRequest {
    /// DVID `host:port`; looked up on the proxy when absent.
    #[serde(
        rename = "dvid-server",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dvid_server: Option<String>,
    /// DVID node (version) uuid.
    pub uuid: String,
    /// Body ids to fetch.
    pub bodies: Vec<u64>,
}

/// A request that passed validation for one [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    /// DVID `host:port`, if the caller supplied one.
    pub dvid_server: Option<String>,
    /// DVID node uuid.
    pub uuid: String,
    /// Distinct body ids, in request order.
    pub bodies: Vec<BodyId>,
}

impl BodiesRequest {
    /// Parses a JSON request body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, RequestError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Checks the request against the constraints of `op`.
    pub fn validate(self, op: Operation) -> Result<ValidRequest, RequestError> {
        if self.uuid.is_empty() || !self.uuid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RequestError::InvalidUuid(self.uuid));
        }
        if self.bodies.len() < op.min_bodies() {
            return Err(RequestError::TooFewBodies {
                min: op.min_bodies(),
                got: self.bodies.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.bodies.len());
        let mut bodies = Vec::with_capacity(self.bodies.len());
        for &raw in &self.bodies {
            let id = u32::try_from(raw)
                .ok()
                .filter(|&id| id != 0)
                .ok_or(RequestError::BodyOutOfRange(raw))?;
            if !seen.insert(id) {
                return Err(RequestError::DuplicateBody(raw));
            }
            bodies.push(BodyId(id));
        }

        let dvid_server = self
            .dvid_server
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        Ok(ValidRequest {
            dvid_server,
            uuid: self.uuid,
            bodies,
        })
    }
}

/// Fields posted by the HTML form front end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormRequest {
    /// DVID `host:port`; empty means "ask the proxy".
    #[serde(default)]
    pub dvidserver: String,
    /// DVID node uuid.
    #[serde(default)]
    pub uuid: String,
    /// Comma-separated body ids, e.g. `"3, 4, 34"`.
    #[serde(default)]
    pub bodies: String,
}

impl FormRequest {
    /// Converts the form fields into a JSON-equivalent request.
    pub fn into_request(self) -> Result<BodiesRequest, RequestError> {
        let bodies = self
            .bodies
            .split(',')
            .map(str::trim)
            .map(|entry| {
                entry
                    .parse::<u64>()
                    .map_err(|_| RequestError::InvalidBodyList(entry.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dvid_server = Some(self.dvidserver).filter(|s| !s.trim().is_empty());
        Ok(BodiesRequest {
            dvid_server,
            uuid: self.uuid.trim().to_owned(),
            bodies,
        })
    }
}
