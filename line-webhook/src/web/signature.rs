//! LINE webhook signature verification.
//!
//! LINE signs every webhook with `base64(HMAC-SHA256(channel_secret, body))`
//! and sends the result in the `x-line-signature` header.
//! Reference: https://developers.line.biz/en/reference/messaging-api/#signature-validation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Compute the base64 HMAC-SHA256 signature of `body` under `secret`.
///
/// Returns `None` only if the MAC rejects the key, which HMAC never does.
pub fn compute_signature(secret: &[u8], body: &[u8]) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => {
            warn!("line_signature_invalid_key");
            return None;
        }
    };
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Verify a LINE webhook signature.
///
/// # Arguments
///
/// * `secret` - The channel secret; empty puts the receiver in open mode
/// * `body` - The exact request body bytes as received
/// * `signature` - The `x-line-signature` header value
///
/// # Returns
///
/// `true` if the signature matches, or unconditionally when no secret is
/// configured (a warning is logged on every such call).
pub fn verify(secret: &[u8], body: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        warn!("line_channel_secret_unset_skipping_verification");
        return true;
    }

    let provided = match STANDARD.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(
                actual_length = signature.len(),
                "line_signature_invalid_encoding"
            );
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => {
            warn!("line_signature_invalid_key");
            return false;
        }
    };
    mac.update(body);

    // verify_slice compares in constant time
    match mac.verify_slice(&provided) {
        Ok(()) => true,
        Err(_) => {
            warn!(
                provided_length = provided.len(),
                body_length = body.len(),
                "line_signature_mismatch"
            );
            false
        }
    }
}
