mod factory;
pub mod gemini;
mod http_client;
mod scrub;
pub mod traits;

pub use factory::create_provider;
pub use gemini::GeminiProvider;
pub use http_client::build_provider_client_with_timeout;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{Provider, SamplingParams};
