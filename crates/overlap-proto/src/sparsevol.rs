// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sparse-volume RLE stream served by DVID for one body.
//!
//! Layout (little-endian):
//! - bytes 0..8: header, two `u32` words (encoding descriptor and voxel
//!   count); not interpreted here
//! - bytes 8..12: run count `n` as `u32`
//! - then `n` × 16 bytes: `x, y, z, length` as 4 × `i32`
//!
//! Bytes after the last run are ignored.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use overlap_core::{BodyId, RleRun, SparseBody};
use thiserror::Error;

/// Size of the two leading header words.
pub const HEADER_BYTES: usize = 8;
/// Size of one encoded run.
pub const RUN_BYTES: usize = 16;

/// Errors raised while decoding a sparsevol stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream ended inside the header or run count.
    #[error("sparse body encoding incorrect: header needs {needed} bytes, got {got}")]
    TruncatedHeader {
        /// Bytes required for header plus run count.
        needed: usize,
        /// Bytes available.
        got: usize,
    },
    /// The stream ended before every announced run was read.
    #[error("sparse body encoding incorrect: expected {expected} runs, stream holds {complete}")]
    TruncatedRuns {
        /// Runs announced by the header.
        expected: u32,
        /// Complete runs present.
        complete: usize,
    },
}

/// Decodes the sparsevol stream of body `id`.
pub fn decode_sparse_body(id: BodyId, mut buf: impl Buf) -> Result<SparseBody, DecodeError> {
    let prefix = HEADER_BYTES + 4;
    if buf.remaining() < prefix {
        return Err(DecodeError::TruncatedHeader {
            needed: prefix,
            got: buf.remaining(),
        });
    }
    buf.advance(HEADER_BYTES);
    let announced = buf.get_u32_le();

    let complete = buf.remaining() / RUN_BYTES;
    let count = usize::try_from(announced).unwrap_or(usize::MAX);
    if complete < count {
        return Err(DecodeError::TruncatedRuns {
            expected: announced,
            complete,
        });
    }

    let mut runs = Vec::with_capacity(count);
    for _ in 0..count {
        let x = buf.get_i32_le();
        let y = buf.get_i32_le();
        let z = buf.get_i32_le();
        let length = buf.get_i32_le();
        runs.push(RleRun::new(x, y, z, length));
    }
    Ok(SparseBody::new(id.get(), runs))
}

/// Encodes `body` as a sparsevol stream with a zeroed header.
///
/// Used to serve fixtures; DVID fills the header with a descriptor and voxel
/// count that the decoder skips.
#[must_use]
pub fn encode_sparse_body(body: &SparseBody) -> Bytes {
    let mut out = BytesMut::with_capacity(HEADER_BYTES + 4 + body.run_count() * RUN_BYTES);
    out.put_u32_le(0);
    out.put_u32_le(body.volume());
    out.put_u32_le(u32::try_from(body.run_count()).unwrap_or(u32::MAX));
    for run in body.runs() {
        out.put_i32_le(run.x);
        out.put_i32_le(run.y);
        out.put_i32_le(run.z);
        out.put_i32_le(run.length);
    }
    out.freeze()
}
