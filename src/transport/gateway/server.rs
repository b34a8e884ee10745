use super::handlers::{
    handle_health, handle_not_found, handle_quests, handle_ready, handle_reset, handle_safety,
    handle_script,
};
use super::identity::{IdentityProvider, TokenHashIdentityProvider};
use super::{AppState, MAX_BODY_SIZE, request_deadline};

use crate::config::Config;
use crate::generation::Orchestrator;
use crate::ratelimit::RateLimiter;
use crate::safety::SafetyGate;
use crate::store;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway until Ctrl-C.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be exposed to the network.\n\
             Fix: use --host 127.0.0.1 (default) or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let bind_host = host.trim_start_matches('[').trim_end_matches(']');
    let listener = tokio::net::TcpListener::bind((bind_host, port))
        .await
        .with_context(|| format!("bind gateway socket {host}:{port}"))?;

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("gateway.shutdown_requested");
        }
        on_signal.cancel();
    });

    run_gateway_with_listener(host, listener, config, shutdown).await
}

/// Wire every collaborator the handlers need from `config`.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let orchestrator = Arc::new(
        Orchestrator::from_config(config).context("build generation orchestrator")?,
    );
    if !orchestrator.provider_configured() {
        warn!("GEMINI_API_KEY not set; every generation will use fallback content");
    }
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(TokenHashIdentityProvider::new(&config.gateway.users));
    let store = store::create_store(&config.store, &config.data_dir())
        .await
        .context("create record store for gateway")?;

    Ok(AppState {
        safety: SafetyGate::new(Arc::clone(&orchestrator)),
        orchestrator,
        rate_limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
        identity,
        store,
        require_user_auth: config.gateway.require_user_auth,
    })
}

/// Run the HTTP gateway from a pre-bound listener until `shutdown` fires.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
    shutdown: CancellationToken,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_state(&config).await?;
    print_gateway_banner(&display_addr, &state);

    let app = build_app(state, &config.gateway.cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("serve HTTP gateway")?;

    info!(addr = %display_addr, "gateway.stopped");
    Ok(())
}

fn print_gateway_banner(display_addr: &str, state: &AppState) {
    println!("Ruach Compass API listening on {display_addr}");
    println!("  GET  /health");
    println!("  GET  /health/ready");
    println!("  POST /ai/quests");
    println!("  POST /ai/script");
    println!("  POST /ai/reset");
    println!("  POST /ai/safety");
    println!("  Store: {}", state.store.name());
    if state.require_user_auth {
        println!("  Bearer token required");
    }
    if !state.orchestrator.provider_configured() {
        println!("  WARNING: GEMINI_API_KEY not set, serving fallback content only");
    }
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let deadline = request_deadline(state.orchestrator.timeout());
    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/health/ready", get(handle_ready))
        .route("/ai/quests", post(handle_quests))
        .route("/ai/script", post(handle_script))
        .route("/ai/reset", post(handle_reset))
        .route("/ai/safety", post(handle_safety))
        .fallback(handle_not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            deadline,
        ));

    if !cors_origins.is_empty() {
        let origins: Vec<_> = cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                    axum::http::HeaderName::from_static(super::identity::DEVICE_ID_HEADER),
                ]),
        );
    }

    app
}
