mod core;
mod gateway;
mod generation;
mod rate_limit;
mod store;

pub use core::Config;
pub use gateway::{GatewayConfig, GatewayUser};
pub use generation::GenerationConfig;
pub use rate_limit::RateLimitConfig;
pub use store::{StoreBackend, StoreConfig};
