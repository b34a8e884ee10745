use serde::{Deserialize, Serialize};

/// A bearer-token user. Only the SHA-256 hex of the token is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayUser {
    pub user_id: String,
    pub token_sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 3001)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Allow binding to a non-loopback address (default: false)
    #[serde(default)]
    pub allow_public_bind: bool,
    /// Allowed CORS origins. Empty disables the CORS layer.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Reject device-only requests (default: false)
    #[serde(default)]
    pub require_user_auth: bool,
    #[serde(default)]
    pub users: Vec<GatewayUser>,
}

fn default_gateway_port() -> u16 {
    3001
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            allow_public_bind: false,
            cors_origins: Vec::new(),
            require_user_auth: false,
            users: Vec::new(),
        }
    }
}
