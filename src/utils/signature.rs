//! Webhook signature verification.
//!
//! Signature header format: `t=<unix seconds>,v1=<hex hmac>`. The HMAC-SHA256
//! is computed over `{timestamp}.{raw body}` with the shared webhook secret.
//! Timestamps further than five minutes from now are rejected to stop replays.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{Result, StoreError};

type HmacSha256 = Hmac<Sha256>;

const TOLERANCE_SECONDS: i64 = 300;

pub fn verify_webhook_signature(payload: &str, sig_header: &str, secret: &str) -> Result<()> {
    let mut timestamp: Option<i64> = None;
    let mut signature: Option<&str> = None;

    for part in sig_header.split(',') {
        if let Some(value) = part.strip_prefix("t=") {
            timestamp = value.trim().parse().ok();
        } else if let Some(value) = part.strip_prefix("v1=") {
            signature = Some(value.trim());
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| StoreError::payment_signature("missing timestamp in signature header"))?;
    let signature = signature
        .ok_or_else(|| StoreError::payment_signature("missing v1 signature in header"))?;

    let now = chrono::Utc::now().timestamp();
    if (now - timestamp).abs() > TOLERANCE_SECONDS {
        return Err(StoreError::payment_signature(
            "signature timestamp outside tolerance",
        ));
    }

    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| StoreError::payment_signature(e.to_string()))?;
    mac.update(signed_payload.as_bytes());

    let expected = hex::decode(signature)
        .map_err(|_| StoreError::payment_signature("signature is not valid hex"))?;

    // verify_slice is constant-time
    mac.verify_slice(&expected)
        .map_err(|_| StoreError::payment_signature("signature mismatch"))
}

/// Sign a payload the way a gateway would. Used by tests and the mock flow.
pub fn sign_webhook_payload(payload: &str, secret: &str, timestamp: i64) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(signed_payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={},v1={}", timestamp, signature)
}
