//! Payload encoding for stored states

use crate::error::{FlResult, ResultExt};
use crate::state::TaskFileState;

/// Encode a state as gzip-compressed JSON
pub(super) fn encode_state(state: &TaskFileState) -> FlResult<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let json = serde_json::to_vec(state).storage_context("Failed to serialize state")?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .storage_context("Failed to compress state")?;
    encoder.finish().storage_context("Failed to finish compression")
}

/// Decode a payload written by [`encode_state`]
pub(super) fn decode_state(payload: &[u8]) -> FlResult<TaskFileState> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(payload);
    let mut json = Vec::new();
    decoder
        .read_to_end(&mut json)
        .storage_context("Failed to decompress state")?;
    serde_json::from_slice(&json).storage_context("Failed to deserialize state")
}
