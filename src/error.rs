use serde::Serialize;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Ruach Compass.
///
/// Only [`CompassError::Validation`], [`CompassError::Auth`] and
/// [`CompassError::RateLimit`] ever reach an HTTP caller. Model and parsing
/// failures live in [`GenerationError`] and are absorbed by the orchestrator.
#[derive(Debug, Error)]
pub enum CompassError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Request validation ──────────────────────────────────────────────
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    // ── Rate limiting ───────────────────────────────────────────────────
    #[error("rate limit: {0}")]
    RateLimit(#[from] RateLimitError),

    // ── Identity ────────────────────────────────────────────────────────
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    // ── Record store ────────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CompassError>;

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} timed out after {timeout_secs}s")]
    Timeout { provider: String, timeout_secs: u64 },

    #[error("provider {provider} returned no text")]
    EmptyResponse { provider: String },

    #[error("provider {provider} has no API key configured")]
    MissingKey { provider: String },
}

// ─── Validation errors ──────────────────────────────────────────────────────

/// One structural problem found in a request or model payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted field path, e.g. `dailyState.energy`. Empty for the root.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{} issue(s): {}", issues.len(), summarize(issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationIssue>> for ValidationError {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }
}

// ─── Rate limit errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum RateLimitError {
    #[error("{identity} exhausted the {policy} window (retry after {retry_after_secs}s)")]
    Exhausted {
        identity: String,
        policy: &'static str,
        retry_after_secs: u64,
    },
}

impl RateLimitError {
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::Exhausted {
                retry_after_secs, ..
            } => *retry_after_secs,
        }
    }
}

// ─── Identity errors ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("no identity presented")]
    Missing,

    #[error("bearer token rejected")]
    InvalidBearer,

    #[error("device id rejected: {0}")]
    InvalidDevice(String),
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend not available: {0}")]
    BackendUnavailable(String),

    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("payload encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

// ─── Generation failures (absorbed, never surfaced) ─────────────────────────

/// Why a model-backed generation attempt did not produce content.
///
/// Every variant degrades to a fallback; the kind is kept for logs.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("no JSON payload found in model output")]
    ExtractionFailed,

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::ExtractionFailed => "extraction_failed",
            Self::SchemaMismatch(_) => "schema_mismatch",
        }
    }
}
