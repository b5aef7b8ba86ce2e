//! Signed OAuth `state` values.
//!
//! Format: `{public_id}.{issued_at_unix}.{sig}` where `sig` is the hex
//! HMAC-SHA256 of the creator id and the issue time, keyed by the state
//! secret. The callback recovers the creator from the state alone, so no
//! server-side session is needed.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::OAuthError;

type HmacSha256 = Hmac<Sha256>;

/// How long a state value stays valid after issue.
pub const STATE_MAX_AGE_SECS: i64 = 15 * 60;

fn signature(secret: &str, public_id: Uuid, issued_at: i64) -> Result<String, OAuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| OAuthError::InvalidState("unusable state secret".to_string()))?;
    mac.update(public_id.as_bytes());
    mac.update(&issued_at.to_be_bytes());
    let digest = mac.finalize().into_bytes();
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Sign a state value for `public_id`, issued at `now`.
///
/// # Errors
///
/// Returns [`OAuthError::InvalidState`] if the secret cannot key the MAC.
pub fn sign_state(secret: &str, public_id: Uuid, now: DateTime<Utc>) -> Result<String, OAuthError> {
    let issued_at = now.timestamp();
    let sig = signature(secret, public_id, issued_at)?;
    Ok(format!("{public_id}.{issued_at}.{sig}"))
}

/// Verify a state value and return the creator's public id.
///
/// # Errors
///
/// Returns [`OAuthError::InvalidState`] if the value is malformed, the
/// signature does not match, or it is older than [`STATE_MAX_AGE_SECS`].
pub fn verify_state(secret: &str, state: &str, now: DateTime<Utc>) -> Result<Uuid, OAuthError> {
    let mut parts = state.splitn(3, '.');
    let (Some(id), Some(issued), Some(sig)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(OAuthError::InvalidState("malformed".to_string()));
    };

    let public_id =
        Uuid::parse_str(id).map_err(|_| OAuthError::InvalidState("bad creator id".to_string()))?;
    let issued_at: i64 = issued
        .parse()
        .map_err(|_| OAuthError::InvalidState("bad timestamp".to_string()))?;

    let expected = signature(secret, public_id, issued_at)?;
    if !bool::from(expected.as_bytes().ct_eq(sig.as_bytes())) {
        return Err(OAuthError::InvalidState("signature mismatch".to_string()));
    }

    let age = now.timestamp() - issued_at;
    if !(0..=STATE_MAX_AGE_SECS).contains(&age) {
        return Err(OAuthError::InvalidState("expired".to_string()));
    }

    Ok(public_id)
}
