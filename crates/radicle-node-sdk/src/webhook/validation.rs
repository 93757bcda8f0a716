//! Webhook signature validation implementation.
//!
//! The node signs each delivery with HMAC-SHA256 over the raw body using the
//! secret supplied when the webhook was registered. The signature header
//! carries the bare lowercase hex digest, without a `sha256=` prefix.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::ValidationError;

type HmacSha256 = Hmac<Sha256>;

/// Validates node webhook signatures using HMAC-SHA256.
///
/// # Security
///
/// - Uses constant-time comparison to prevent timing attacks
/// - Never logs secrets or signature values
///
/// # Examples
///
/// ```rust
/// use radicle_node_sdk::webhook::SignatureValidator;
///
/// let validator = SignatureValidator::new("shared-secret");
/// let payload = br#"{"action":"created"}"#;
/// let signature = validator.sign(payload).unwrap();
///
/// assert!(validator.validate(payload, &signature).unwrap());
/// assert!(!validator.validate(b"tampered", &signature).unwrap());
/// ```
#[derive(Clone)]
pub struct SignatureValidator {
    secret: Vec<u8>,
}

impl SignatureValidator {
    /// Create a validator for the given shared secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Compute the signature the node would send for `payload`.
    pub fn sign(&self, payload: &[u8]) -> Result<String, ValidationError> {
        Ok(hex::encode(self.compute_hmac(payload)?))
    }

    /// Validate a webhook signature.
    ///
    /// The expected value is `hex(HMAC-SHA256(secret, payload))` and the
    /// comparison is byte-for-byte on the hex text. Surrounding whitespace is
    /// ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Signature is valid
    /// * `Ok(false)` - Signature does not match (tampered payload or wrong secret)
    /// * `Err` - The HMAC could not be computed
    pub fn validate(&self, payload: &[u8], signature: &str) -> Result<bool, ValidationError> {
        let expected = self.sign(payload)?;
        Ok(self.constant_time_compare(signature.trim().as_bytes(), expected.as_bytes()))
    }

    fn compute_hmac(&self, payload: &[u8]) -> Result<Vec<u8>, ValidationError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|e| ValidationError::HmacError {
                message: format!("Failed to create HMAC instance: {}", e),
            })?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn constant_time_compare(&self, a: &[u8], b: &[u8]) -> bool {
        // Length is not secret
        if a.len() != b.len() {
            return false;
        }
        a.ct_eq(b).into()
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for SignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureValidator")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
