use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

/// Reads the payload of a JWT without verifying its signature. Only used for
/// display data such as the user's name; never for authorization decisions.
pub fn decode_claims(token: &str) -> Option<Value> {
    let mut parts = token.split('.');
    parts.next()?;
    let payload = parts.next()?;
    parts.next()?;
    let decoded = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&decoded).ok()
}

pub fn claim_str(token: &str, claim: &str) -> Option<String> {
    decode_claims(token)?
        .get(claim)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
