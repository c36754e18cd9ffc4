//! Email activation tokens.
//!
//! The emailed token is random; only its blake3 digest is stored. The user
//! id travels next to it as URL-safe base64 (`uidb64`).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use time::{Duration, OffsetDateTime};

pub const TOKEN_TTL: Duration = Duration::days(3);
const TOKEN_BYTES: usize = 32;

/// A freshly issued token and the digest to persist.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub digest: String,
}

pub fn issue() -> IssuedToken {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    let token = URL_SAFE_NO_PAD.encode(bytes);
    let digest = digest(&token);
    IssuedToken { token, digest }
}

pub fn digest(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

/// Constant-time comparison of `token` against a stored hex digest.
pub fn matches(token: &str, stored_digest: &str) -> bool {
    match blake3::Hash::from_hex(stored_digest) {
        Ok(stored) => stored == blake3::hash(token.as_bytes()),
        Err(_) => false,
    }
}

pub fn is_expired(sent_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    now - sent_at > TOKEN_TTL
}

pub fn encode_uid(user_id: i64) -> String {
    URL_SAFE_NO_PAD.encode(user_id.to_string())
}

/// Accepts padded or unpadded input.
pub fn decode_uid(uidb64: &str) -> Option<i64> {
    let bytes = URL_SAFE_NO_PAD
        .decode(uidb64.trim_end_matches('='))
        .ok()?;
    std::str::from_utf8(&bytes).ok()?.parse().ok()
}
