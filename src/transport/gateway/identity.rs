//! Caller identity: a bearer token mapped to a user id, or a client-declared
//! device id. Tokens are stored as SHA-256 hashes and compared in constant
//! time.

use crate::config::GatewayUser;
use crate::error::AuthError;
use crate::ratelimit::Identity;
use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};

pub const DEVICE_ID_HEADER: &str = "x-device-id";
const MAX_DEVICE_ID_LEN: usize = 128;

/// SHA-256 hash a token for storage (never store plaintext).
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Opaque bearer-token validation.
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    /// User id for a valid token, `None` otherwise.
    fn authenticate(&self, bearer: &str) -> Option<String>;
}

/// Static users from `[[gateway.users]]`.
pub struct TokenHashIdentityProvider {
    users: Vec<GatewayUser>,
}

impl TokenHashIdentityProvider {
    pub fn new(users: &[GatewayUser]) -> Self {
        Self {
            users: users
                .iter()
                .map(|user| GatewayUser {
                    user_id: user.user_id.clone(),
                    token_sha256: user.token_sha256.to_ascii_lowercase(),
                })
                .collect(),
        }
    }
}

impl IdentityProvider for TokenHashIdentityProvider {
    fn name(&self) -> &str {
        "token_hash"
    }

    fn authenticate(&self, bearer: &str) -> Option<String> {
        if bearer.is_empty() {
            return None;
        }
        let hash = hash_token(bearer);
        // Scan every entry so timing does not reveal the match position.
        let mut found = None;
        for user in &self.users {
            if constant_time_eq(&hash, &user.token_sha256) && found.is_none() {
                found = Some(user.user_id.clone());
            }
        }
        found
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn valid_device_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_DEVICE_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

/// Resolve the caller.
///
/// A presented bearer must be valid even when a device id is also sent; a
/// valid bearer takes precedence so a device id cannot stand in for a user.
pub fn resolve_identity(
    headers: &HeaderMap,
    provider: &dyn IdentityProvider,
    require_user_auth: bool,
) -> Result<Identity, AuthError> {
    if let Some(raw) = headers.get(header::AUTHORIZATION) {
        let token = raw
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidBearer)?;
        return provider
            .authenticate(token)
            .map(Identity::User)
            .ok_or(AuthError::InvalidBearer);
    }

    if require_user_auth {
        return Err(AuthError::Missing);
    }

    let device = headers
        .get(DEVICE_ID_HEADER)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::InvalidDevice("not valid ASCII".into()))?
        .trim();
    if !valid_device_id(device) {
        return Err(AuthError::InvalidDevice(format!(
            "expected 1-{MAX_DEVICE_ID_LEN} chars of [A-Za-z0-9._:-]"
        )));
    }
    Ok(Identity::Device(device.to_string()))
}
