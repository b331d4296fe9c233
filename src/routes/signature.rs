//! Block-signature upload endpoint.
//!
//! `POST /signature` — multipart form with a `blocksize` field (MiB) and a
//! `data` field (the payload to hash). Domain failures are reported inside
//! the 200 response body, never via HTTP status: clients always get the same
//! JSON envelope and switch on `error`.

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use crate::config::{BYTES_PER_MIB, MAX_BLOCK_SIZE_MIB};
use crate::engine::geometry::{block_count, blocks_per_worker};
use crate::engine::scheduler::compute_signature;
use crate::signature::Signature;
use crate::state::AppState;

/// Response envelope for `POST /signature`. Exactly one of the fields is
/// non-empty.
#[derive(Debug, Serialize)]
pub struct SignatureResponse {
    /// Terse failure message, empty on success.
    pub error: String,
    /// Per-block digests, empty on failure.
    pub signature: Signature,
}

impl SignatureResponse {
    fn ok(signature: Signature) -> Self {
        Self {
            error: String::new(),
            signature,
        }
    }

    fn err(message: &str) -> Self {
        Self {
            error: message.to_string(),
            signature: Signature::default(),
        }
    }
}

/// `POST /signature` — hash an uploaded payload block by block.
///
/// Always returns 200; failures are carried in the `error` field:
///
/// | Error                             | Cause                                 |
/// |-----------------------------------|---------------------------------------|
/// | `Unexpected format of block size` | `blocksize` missing or not an integer |
/// | `Unsupported block size`          | outside `1..=2047` MiB                |
/// | `Unable to read data`             | `data` missing or body unreadable     |
/// | `Unable to hash input file`       | a block could not be hashed           |
///
/// Detailed causes are logged server-side and never echoed to the client.
pub async fn post_signature(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<SignatureResponse> {
    let Ok(mut multipart) = multipart else {
        return Json(SignatureResponse::err("Unable to read data"));
    };

    let mut block_size_text: Option<String> = None;
    let mut data: Option<Bytes> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().map(ToString::to_string);
                match name.as_deref() {
                    Some("blocksize") => match field.text().await {
                        Ok(text) => block_size_text = Some(text),
                        Err(e) => {
                            error!("Failed to read blocksize field: {e}");
                            return Json(SignatureResponse::err(
                                "Unexpected format of block size",
                            ));
                        }
                    },
                    Some("data") => match field.bytes().await {
                        Ok(bytes) => data = Some(bytes),
                        Err(e) => {
                            error!("Failed to buffer upload: {e}");
                            return Json(SignatureResponse::err("Unable to read data"));
                        }
                    },
                    // Unknown fields are skipped, not errors.
                    _ => {}
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Malformed multipart request: {e}");
                return Json(SignatureResponse::err("Unable to read data"));
            }
        }
    }

    let Ok(block_size_mib) = block_size_text.unwrap_or_default().parse::<i64>() else {
        return Json(SignatureResponse::err("Unexpected format of block size"));
    };
    let Some(block_size_mib) = u64::try_from(block_size_mib)
        .ok()
        .filter(|v| (1..=MAX_BLOCK_SIZE_MIB).contains(v))
    else {
        return Json(SignatureResponse::err("Unsupported block size"));
    };
    let Some(data) = data else {
        return Json(SignatureResponse::err("Unable to read data"));
    };

    let block_size = block_size_mib * BYTES_PER_MIB;
    let size = data.len() as u64;
    let batch = blocks_per_worker(block_count(size, block_size), state.config.hash.workers);

    // The engine is synchronous; keep it off the runtime's I/O workers.
    let result =
        tokio::task::spawn_blocking(move || compute_signature(&data[..], size, block_size, batch))
            .await;

    match result {
        Ok((signature, None)) => {
            info!(blocks = signature.len(), block_size_mib, size, "Signed upload");
            Json(SignatureResponse::ok(signature))
        }
        Ok((_, Some(failure))) => {
            error!("Unable to hash upload: {failure}");
            Json(SignatureResponse::err("Unable to hash input file"))
        }
        Err(e) => {
            error!("Hashing task failed: {e}");
            Json(SignatureResponse::err("Unable to hash input file"))
        }
    }
}
