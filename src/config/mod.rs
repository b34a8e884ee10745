pub mod schema;

pub use schema::{
    Config, GatewayConfig, GatewayUser, GenerationConfig, RateLimitConfig, StoreBackend,
    StoreConfig,
};
