// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire formats around the overlap engine: the DVID sparsevol stream a body is
//! fetched as, and the JSON (or form) requests and responses of the service.
#![forbid(unsafe_code)]

pub mod request;
pub mod response;
pub mod sparsevol;

pub use request::{BodiesRequest, FormRequest, Operation, RequestError, ValidRequest};
pub use response::{OverlapResponse, StatsResponse};
pub use sparsevol::{decode_sparse_body, encode_sparse_body, DecodeError};
