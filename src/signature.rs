//! Gateway callback signatures
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the shared secret and
//! sends the lower-case hex digest alongside the callback.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signature errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// The shared secret could not key the MAC.
    #[error("invalid signing key")]
    InvalidKey,

    /// The supplied signature does not match the payload.
    #[error("signature mismatch")]
    Mismatch,
}

fn mac(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_invalid_length| SignatureError::InvalidKey)?;

    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    Ok(mac)
}

/// Sign a gateway order / payment pair.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKey`] if the secret cannot key the MAC.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> Result<String, SignatureError> {
    let digest = mac(secret, order_id, payment_id)?.finalize().into_bytes();

    Ok(hex::encode(digest))
}

/// Verify a callback signature in constant time.
///
/// # Errors
///
/// Returns [`SignatureError::Mismatch`] when the signature is not valid hex or does not match.
pub fn verify(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let expected = hex::decode(signature.trim()).map_err(|_invalid_hex| SignatureError::Mismatch)?;

    mac(secret, order_id, payment_id)?
        .verify_slice(&expected)
        .map_err(|_mismatch| SignatureError::Mismatch)
}
