//! HMAC helpers for signing session cookies.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Signs a payload using HMAC-SHA256, hex-encoded.
pub fn sign_payload(payload: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a payload signature using constant-time comparison.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    let expected = sign_payload(payload, secret);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_hex_sha256() {
        let signature = sign_payload(b"payload", "secret");
        assert_eq!(signature.len(), 64);
        assert_eq!(signature, sign_payload(b"payload", "secret"));
    }

    #[test]
    fn test_signature_verification() {
        let payload = br#"{"user":{"plan":"pro"}}"#;
        let secret = "session_secret_123";

        let signature = sign_payload(payload, secret);
        assert!(verify_signature(payload, &signature, secret));
        assert!(!verify_signature(payload, &signature, "wrong_secret"));
        assert!(!verify_signature(b"tampered", &signature, secret));
        assert!(!verify_signature(payload, "", secret));
    }
}
