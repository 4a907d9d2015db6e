//! In-memory bearer-token sessions.
//!
//! Tokens are handed to the client once; the store keeps only their SHA-256
//! hashes. Sessions expire after [`SESSION_TTL`], or
//! [`REMEMBER_ME_TTL`] when the user asked to be remembered.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::models::enums::Role;
use crate::models::User;

pub const SESSION_TTL: Duration = Duration::from_secs(12 * 3600);
pub const REMEMBER_ME_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Who a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    expires_at: Instant,
}

/// Token returned to the client after login or registration.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub expires_in_secs: u64,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<[u8; 32], Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, user: &User, remember_me: bool) -> IssuedSession {
        self.cleanup();
        let ttl = if remember_me { REMEMBER_ME_TTL } else { SESSION_TTL };
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            Session {
                user_id: user.id,
                email: user.email.clone(),
                role: user.role,
                expires_at: Instant::now() + ttl,
            },
        );
        IssuedSession {
            token,
            expires_in_secs: ttl.as_secs(),
        }
    }

    /// Resolve a presented token. Expired sessions are dropped on sight.
    pub fn validate(&mut self, token: &str) -> Option<Session> {
        let key = hash_token(token);
        let session = self.sessions.get(&key)?;
        if Instant::now() >= session.expires_at {
            self.sessions.remove(&key);
            return None;
        }
        Some(session.clone())
    }

    /// Owner of a live session, without touching the store.
    pub fn user_for(&self, token: &str) -> Option<i64> {
        self.sessions
            .get(&hash_token(token))
            .filter(|s| Instant::now() < s.expires_at)
            .map(|s| s.user_id)
    }

    /// Returns `true` if the token named a live session.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }

    /// Drop every session of one user, e.g. after a role change.
    pub fn revoke_user(&mut self, user_id: i64) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user_id != user_id);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, s| now < s.expires_at);
    }
}
