//! Axum-based HTTP gateway for the generation endpoints.
//!
//! Every `/ai/*` request passes identity, then the rate limiter, then body
//! validation before any model or store call. Generation failures never
//! surface: the body is fallback content with a 200.

mod defense;
mod handlers;
pub mod identity;
mod server;

pub use identity::{IdentityProvider, TokenHashIdentityProvider, hash_token};
pub use server::{build_app, build_state, run_gateway, run_gateway_with_listener};

use crate::generation::Orchestrator;
use crate::ratelimit::RateLimiter;
use crate::safety::SafetyGate;
use crate::store::RecordStore;
use std::sync::Arc;
use std::time::Duration;

/// Maximum request body size (64KB) -- prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Model calls one request can make: the safety classifier, then generation.
pub const MAX_MODEL_CALLS_PER_REQUEST: u32 = 2;

/// Request timeout -- prevents slow-loris attacks. Leaves one spare model
/// budget on top of the worst case so the orchestrator always times out
/// first and answers with fallback content.
pub fn request_deadline(model_timeout: Duration) -> Duration {
    model_timeout.saturating_mul(MAX_MODEL_CALLS_PER_REQUEST + 1)
}

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub safety: SafetyGate,
    pub rate_limiter: Arc<RateLimiter>,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn RecordStore>,
    /// Reject device-only callers.
    pub require_user_auth: bool,
}
