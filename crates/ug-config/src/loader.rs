//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "usergate.toml",
    "./config/config.toml",
    "/etc/usergate/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) but reads overrides through `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file(&lookup) {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, &lookup);

        Ok(config)
    }

    fn find_config_file<F>(&self, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured config file does not exist");
        }

        if let Some(path) = lookup("UG_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

fn apply_overrides<F>(config: &mut AppConfig, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = lookup("UG_HTTP_PORT").and_then(|v| v.parse().ok()) {
        config.http.port = port;
    }
    if let Some(val) = lookup("UG_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = lookup("UG_CORS_ORIGINS") {
        config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
    }

    // Database
    if let Some(val) = lookup("UG_DATABASE_URL") {
        config.database.url = val;
    }
    if let Some(max) = lookup("UG_DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
        config.database.max_connections = max;
    }

    // Auth
    if let Some(val) = lookup("UG_JWT_SECRET") {
        config.auth.jwt_secret = val;
    }
    if let Some(ttl) = lookup("UG_TOKEN_TTL_SECS").and_then(|v| v.parse().ok()) {
        config.auth.token_ttl_secs = ttl;
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 9000\n\n[auth]\njwt_secret = \"file-secret\"").unwrap();

        let env = vars(&[
            ("UG_JWT_SECRET", "env-secret"),
            ("UG_CORS_ORIGINS", "http://a.test, http://b.test"),
            ("UG_TOKEN_TTL_SECS", "60"),
        ]);
        let config = ConfigLoader::with_path(file.path())
            .load_with(|k| env.get(k).cloned())
            .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.auth.jwt_secret, "env-secret");
        assert_eq!(config.auth.token_ttl_secs, 60);
        assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_unparseable_numbers_are_ignored() {
        let env = vars(&[("UG_HTTP_PORT", "not-a-port"), ("UG_DATABASE_MAX_CONNECTIONS", "-1")]);
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::with_path(dir.path().join("missing.toml"))
            .load_with(|k| env.get(k).cloned())
            .unwrap();

        assert_eq!(config.http.port, 4000);
        assert_eq!(config.database.max_connections, 10);
    }
}
