use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// SQLite database file. Defaults to `records.db` next to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_are_lowercase() {
        let decoded: StoreConfig = toml::from_str(r#"backend = "sqlite""#).unwrap();
        assert_eq!(decoded.backend, StoreBackend::Sqlite);
        assert!(decoded.path.is_none());

        let bad: Result<StoreConfig, _> = toml::from_str(r#"backend = "redis""#);
        assert!(bad.is_err());
    }
}
