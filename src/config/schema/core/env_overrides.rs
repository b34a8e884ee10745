use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("RUACH_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY"))
            && !key.trim().is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("RUACH_MODEL")
            && !model.is_empty()
        {
            self.model = model;
        }

        if let Ok(base) = std::env::var("RUACH_API_BASE_URL")
            && !base.is_empty()
        {
            self.api_base_url = Some(base);
        }

        if let Ok(port_str) =
            std::env::var("RUACH_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) = std::env::var("RUACH_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(secs) = std::env::var("RUACH_REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
            && secs > 0
        {
            self.request_timeout_secs = secs;
        }

        if let Ok(path) = std::env::var("RUACH_STORE_PATH")
            && !path.is_empty()
        {
            self.store.path = Some(shellexpand::tilde(&path).into_owned().into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;

    #[test]
    fn ruach_prefix_wins_over_generic_names() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _port = EnvVarGuard::set("RUACH_GATEWAY_PORT", "4100");
        let _generic = EnvVarGuard::set("PORT", "5100");
        let _host = EnvVarGuard::unset("RUACH_GATEWAY_HOST");
        let _host_generic = EnvVarGuard::set("HOST", "0.0.0.0");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.gateway.port, 4100);
        assert_eq!(config.gateway.host, "0.0.0.0");
    }

    #[test]
    fn gemini_key_fills_api_key() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ruach = EnvVarGuard::unset("RUACH_API_KEY");
        let _gemini = EnvVarGuard::set("GEMINI_API_KEY", "g-123");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.api_key.as_deref(), Some("g-123"));
    }

    #[test]
    fn malformed_values_are_ignored() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _port = EnvVarGuard::set("RUACH_GATEWAY_PORT", "not-a-port");
        let _generic = EnvVarGuard::unset("PORT");
        let _timeout = EnvVarGuard::set("RUACH_REQUEST_TIMEOUT_SECS", "0");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.gateway.port, 3001);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
