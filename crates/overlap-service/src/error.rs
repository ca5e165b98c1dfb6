// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Handler errors and their HTTP mapping.

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use overlap_core::OverlapError;
use overlap_proto::RequestError;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, warn};

use crate::dvid::DvidError;

/// Everything a request handler can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or invalid request.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// Form body could not be read.
    #[error("form could not be read: {0}")]
    Form(#[from] FormRejection),
    /// DVID or proxy failure.
    #[error(transparent)]
    Dvid(#[from] DvidError),
    /// Engine rejected the body set.
    #[error(transparent)]
    Overlap(#[from] OverlapError),
    /// Blocking computation panicked or was cancelled.
    #[error("computation failed: {0}")]
    Task(#[from] JoinError),
}

impl ServiceError {
    /// Status code the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(err = %self, "request failed");
        } else {
            warn!(err = %self, "bad request");
        }
        (status, self.to_string()).into_response()
    }
}
