//! Configuration loading.
//!
//! Configuration is loaded from (in order of precedence, highest first):
//! 1. Environment variables prefixed with `ASKNOTES_` (e.g. `ASKNOTES_BIND_ADDR`)
//! 2. `asknotes.toml` in the working directory, if present
//! 3. Default values
//!
//! The upstream API key is not part of this struct. It is read from
//! [`API_KEY_ENV`] on every upstream call.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "asknotes.toml";

/// Environment variable holding the upstream bearer token.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DB_PATH: &str = ".asknotes_db";
pub const DEFAULT_UPSTREAM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Path of the proxy route on this server.
pub const PROXY_PATH: &str = "/api/ask";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind_addr: String,
    /// Directory of the sled database backing the note store.
    pub db_path: PathBuf,
    /// Chat-completions endpoint the proxy forwards to.
    pub upstream_url: String,
    /// Model identifier sent with every upstream request.
    pub model: String,
    /// System turn prepended to every conversation.
    pub system_prompt: String,
    /// Where the note controller sends queries. Unset means this server's own
    /// `/api/ask`, derived from `bind_addr`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            proxy_url: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, `asknotes.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Load configuration using a specific TOML file path.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or validation fails.
    pub fn load_from(config_file: PathBuf) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ASKNOTES_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The proxy endpoint the note controller should call.
    #[must_use]
    pub fn proxy_endpoint(&self) -> String {
        match &self.proxy_url {
            Some(url) => url.clone(),
            None => local_proxy_url(&self.bind_addr),
        }
    }

    /// Check that URLs parse and required strings are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("upstream_url", self.upstream_url.clone()),
            ("proxy_url", self.proxy_endpoint()),
        ] {
            let parsed = Url::parse(&value)
                .map_err(|e| Error::config_validation(format!("{name} '{value}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::config_validation(format!(
                    "{name} must be http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }

        if self.model.trim().is_empty() {
            return Err(Error::config_validation("model must not be empty"));
        }

        if self.bind_addr.trim().is_empty() {
            return Err(Error::config_validation("bind_addr must not be empty"));
        }

        Ok(())
    }
}

/// `http://{bind_addr}/api/ask`, with wildcard hosts replaced by loopback.
fn local_proxy_url(bind_addr: &str) -> String {
    let host_port = match bind_addr.rsplit_once(':') {
        Some(("0.0.0.0", port)) => format!("127.0.0.1:{port}"),
        Some(("[::]", port)) => format!("[::1]:{port}"),
        _ => bind_addr.to_string(),
    };
    format!("http://{host_port}{PROXY_PATH}")
}

/// Read the upstream API key. Absent is not an error here.
#[must_use]
pub fn api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "deepseek/deepseek-chat-v3.1:free");
        assert_eq!(config.system_prompt, "You are a helpful AI assistant.");
    }

    #[test]
    fn test_validate_rejects_bad_upstream_url() {
        let config = Config {
            upstream_url: "not a url".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("upstream_url"));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = Config {
            proxy_url: Some("ftp://example.com/api/ask".to_string()),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("proxy_url"));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let config = Config {
            model: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load_from(PathBuf::from("does-not-exist.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "asknotes.toml",
                r#"
                    bind_addr = "0.0.0.0:8080"
                    model = "some/other-model"
                "#,
            )?;
            jail.set_env("ASKNOTES_MODEL", "env/model");

            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.model, "env/model");
            assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
            assert_eq!(config.proxy_endpoint(), "http://127.0.0.1:8080/api/ask");
            Ok(())
        });
    }

    #[test]
    fn test_proxy_endpoint_follows_bind_addr() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ASKNOTES_BIND_ADDR", "127.0.0.1:8080");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.proxy_url, None);
            assert_eq!(config.proxy_endpoint(), "http://127.0.0.1:8080/api/ask");
            Ok(())
        });
    }

    #[test]
    fn test_proxy_endpoint_defaults_and_overrides() {
        assert_eq!(
            Config::default().proxy_endpoint(),
            "http://127.0.0.1:3000/api/ask"
        );

        let ipv6 = Config {
            bind_addr: "[::]:4000".to_string(),
            ..Config::default()
        };
        assert_eq!(ipv6.proxy_endpoint(), "http://[::1]:4000/api/ask");

        let explicit = Config {
            bind_addr: "0.0.0.0:8080".to_string(),
            proxy_url: Some("http://proxy.internal/api/ask".to_string()),
            ..Config::default()
        };
        assert_eq!(explicit.proxy_endpoint(), "http://proxy.internal/api/ask");
    }

    #[test]
    fn test_proxy_url_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ASKNOTES_PROXY_URL", "http://10.0.0.5:3000/api/ask");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.proxy_endpoint(), "http://10.0.0.5:3000/api/ask");
            Ok(())
        });
    }
}
