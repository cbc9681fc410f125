use anyhow::{bail, Context};
use juno_common::models::auth::Role;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variables consulted when the config file leaves a backend
/// setting empty, in priority order.
pub const API_KEY_ENV: &str = "JUNO_API_KEY";
pub const BASE_URL_ENV: &[&str] = &["JUNO_BASE_URL", "NEXT_PUBLIC_JUNO_BASE_URL"];

/// Connection settings for the Juno backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Backend settings after environment fallbacks have been applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBackend {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    /// Fill unset values from the environment. `lookup` is `std::env::var`
    /// in production; tests pass a map.
    pub fn resolve<F>(&self, lookup: F) -> anyhow::Result<ResolvedBackend>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let base_url = non_empty(self.base_url.clone())
            .or_else(|| BASE_URL_ENV.iter().find_map(|name| non_empty(lookup(name))));
        let base_url = match base_url {
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => bail!(
                "Backend base URL not configured (set backend.base_url or {})",
                BASE_URL_ENV.join(" / ")
            ),
        };
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("Backend base URL must start with http:// or https://: {}", base_url);
        }

        let api_key = non_empty(self.api_key.clone()).or_else(|| non_empty(lookup(API_KEY_ENV)));
        if api_key.is_none() {
            tracing::warn!("{} not set; email analytics will be unavailable", API_KEY_ENV);
        }

        Ok(ResolvedBackend {
            base_url,
            api_key,
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

fn default_cookie_name() -> String {
    "jwt-token".to_string()
}

fn default_max_age() -> u64 {
    3600
}

fn default_secure() -> bool {
    true
}

/// Session cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
    /// Mark the cookie `Secure`. Turn off only for plain-HTTP development.
    #[serde(default = "default_secure")]
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_secs: default_max_age(),
            secure: default_secure(),
        }
    }
}

/// Static UI bundle to serve for page routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Pending signup to preload into the account request queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRequestSeed {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub user_type: Role,
    pub project_name: Option<String>,
}

fn default_max_pending() -> usize {
    crate::account_requests::DEFAULT_MAX_PENDING
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

/// Dashboard configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub ui: Option<UiConfig>,
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub account_requests: Vec<AccountRequestSeed>,
    /// Cap on queued signups; public submissions fail once it is reached.
    #[serde(default = "default_max_pending")]
    pub max_pending_account_requests: usize,
}

/// Load dashboard config from a YAML file with JUNO__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("JUNO")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
backend:
  base_url: "https://api.juno.example"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.listen, "0.0.0.0:3000");
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("https://api.juno.example")
        );
        assert_eq!(config.session.cookie_name, "jwt-token");
        assert_eq!(config.session.max_age_secs, 3600);
        assert!(config.session.secure);
        assert!(config.ui.is_none());
        assert!(config.account_requests.is_empty());
        assert_eq!(config.max_pending_account_requests, 1000);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listen: "127.0.0.1:8080"
backend:
  base_url: "http://localhost:4000"
  api_key: "juno-key"
  timeout_secs: 15
session:
  cookie_name: "juno-session"
  max_age_secs: 600
  secure: false
ui:
  dir: "./ui/dist"
cors:
  allowed_origins:
    - "http://localhost:5173"
account_requests:
  - name: "Dana"
    email: "dana@example.com"
    password: "pending-pass"
    user_type: ADMIN
    project_name: "billing"
max_pending_account_requests: 50
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert_eq!(config.backend.timeout_secs, Some(15));
        assert_eq!(config.session.cookie_name, "juno-session");
        assert!(!config.session.secure);
        assert_eq!(config.ui.unwrap().dir, "./ui/dist");
        assert_eq!(
            config.cors.unwrap().allowed_origins,
            vec!["http://localhost:5173"]
        );
        assert_eq!(config.account_requests.len(), 1);
        assert_eq!(config.account_requests[0].user_type, Role::Admin);
        assert_eq!(config.max_pending_account_requests, 50);
    }

    #[test]
    fn test_resolve_prefers_config_values() {
        let backend = BackendConfig {
            base_url: Some("https://file.example/".to_string()),
            api_key: Some("file-key".to_string()),
            timeout_secs: Some(3),
        };
        let resolved = backend
            .resolve(env(&[
                ("JUNO_BASE_URL", "https://env.example"),
                ("JUNO_API_KEY", "env-key"),
            ]))
            .unwrap();
        assert_eq!(resolved.base_url, "https://file.example");
        assert_eq!(resolved.api_key.as_deref(), Some("file-key"));
        assert_eq!(resolved.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_resolve_env_fallbacks() {
        let resolved = BackendConfig::default()
            .resolve(env(&[
                ("NEXT_PUBLIC_JUNO_BASE_URL", "https://public.example"),
                ("JUNO_API_KEY", "env-key"),
            ]))
            .unwrap();
        assert_eq!(resolved.base_url, "https://public.example");
        assert_eq!(resolved.api_key.as_deref(), Some("env-key"));
        assert_eq!(resolved.timeout, None);

        let resolved = BackendConfig::default()
            .resolve(env(&[
                ("JUNO_BASE_URL", "https://private.example"),
                ("NEXT_PUBLIC_JUNO_BASE_URL", "https://public.example"),
            ]))
            .unwrap();
        assert_eq!(resolved.base_url, "https://private.example");
        assert_eq!(resolved.api_key, None);
    }

    #[test]
    fn test_resolve_missing_base_url() {
        let err = BackendConfig {
            base_url: Some("  ".to_string()),
            ..Default::default()
        }
        .resolve(env(&[]))
        .unwrap_err();
        assert!(err.to_string().contains("base URL not configured"));
    }

    #[test]
    fn test_resolve_rejects_non_http_url() {
        let err = BackendConfig::default()
            .resolve(env(&[("JUNO_BASE_URL", "ftp://juno")]))
            .unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_load_config_from_file() {
        let yaml = r#"
listen: "127.0.0.1:9000"
backend:
  base_url: "http://localhost:4000"
session:
  secure: false
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file.flush().unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.listen, "127.0.0.1:9000");
        assert!(!config.session.secure);
        assert_eq!(config.session.cookie_name, "jwt-token");
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/dashboard-config.yaml").is_err());
    }
}
