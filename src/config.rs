//! Configuration module.
//!
//! Settings live in a single `flickr.toml` (path configurable on the command
//! line). Every key is optional; missing keys take the stock defaults and
//! unknown keys are rejected to catch typos early.
//!
//! ```toml
//! [flickr]
//! api_key = ""                 # or FLICKR_API_KEY
//! shared_secret = ""           # or FLICKR_API_SECRET
//! endpoint = "https://api.flickr.com/services/rest/"
//! timeout_secs = 30
//!
//! [cache]
//! enabled = true
//! dir = ".flickr-cache"
//!
//! [player]
//! content_type = "application/x-shockwave-flash"
//! url = "http://www.flickr.com/apps/video/stewart.swf?v=109786"
//! classid = "clsid:D27CDB6E-AE6D-11cf-96B8-444553540000"
//! bgcolor = "#000000"
//! allow_fullscreen = true
//! lang = "en-us"
//! ```
//!
//! ## Credentials
//!
//! The API key and shared secret are resolved once at startup by
//! [`resolve_credentials`]: environment variables win over the config file.
//! Missing credentials are not fatal at load time. The binary logs the
//! problem and carries on; the first real API call then fails with
//! [`ApiError::MissingCredentials`](crate::api::ApiError::MissingCredentials).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const API_KEY_ENV: &str = "FLICKR_API_KEY";
pub const API_SECRET_ENV: &str = "FLICKR_API_SECRET";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error(
        "Flickr credentials not configured: set FLICKR_API_KEY and FLICKR_API_SECRET or [flickr] in the config file"
    )]
    MissingCredentials,
}

/// Top-level configuration loaded from `flickr.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedConfig {
    /// API endpoint and credentials.
    pub flickr: ApiConfig,
    /// Memoization of API responses and rendered fragments.
    pub cache: CacheConfig,
    /// Constants of the embedded video player.
    pub player: PlayerConfig,
}

impl EmbedConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.flickr.endpoint).is_err() {
            return Err(ConfigError::Validation(format!(
                "flickr.endpoint is not a valid URL: {}",
                self.flickr.endpoint
            )));
        }
        if self.flickr.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "flickr.timeout_secs must be non-zero".into(),
            ));
        }
        if self.cache.dir.trim().is_empty() {
            return Err(ConfigError::Validation("cache.dir must not be empty".into()));
        }
        if self.player.url.trim().is_empty() || self.player.content_type.trim().is_empty() {
            return Err(ConfigError::Validation(
                "player.url and player.content_type must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// API key. Overridden by `FLICKR_API_KEY`.
    pub api_key: String,
    /// Shared secret. Overridden by `FLICKR_API_SECRET`.
    pub shared_secret: String,
    /// REST endpoint.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            shared_secret: String::new(),
            endpoint: "https://api.flickr.com/services/rest/".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Persist memoized results to disk between runs.
    pub enabled: bool,
    /// Directory holding the memo files.
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: ".flickr-cache".to_string(),
        }
    }
}

/// Fixed metadata of the embedded video player.
///
/// Passed by reference into the video renderer; never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub content_type: String,
    pub url: String,
    pub classid: String,
    pub bgcolor: String,
    pub allow_fullscreen: bool,
    /// `intl_lang` player parameter.
    pub lang: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            content_type: "application/x-shockwave-flash".to_string(),
            url: "http://www.flickr.com/apps/video/stewart.swf?v=109786".to_string(),
            classid: "clsid:D27CDB6E-AE6D-11cf-96B8-444553540000".to_string(),
            bgcolor: "#000000".to_string(),
            allow_fullscreen: true,
            lang: "en-us".to_string(),
        }
    }
}

/// API key and shared secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub shared_secret: String,
}

/// Load configuration from a TOML file.
///
/// A missing file yields the stock defaults. A file that exists but doesn't
/// parse, or fails validation, is an error.
pub fn load_config(path: &Path) -> Result<EmbedConfig, ConfigError> {
    if !path.exists() {
        return Ok(EmbedConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<EmbedConfig, ConfigError> {
    let config: EmbedConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Resolve credentials from the process environment and the config file.
pub fn resolve_credentials(config: &ApiConfig) -> Result<Credentials, ConfigError> {
    resolve_credentials_with(config, |name| std::env::var(name).ok())
}

/// Resolve credentials with an explicit environment lookup.
///
/// Each value is taken from the environment when set and non-empty,
/// otherwise from the config file.
pub fn resolve_credentials_with(
    config: &ApiConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, ConfigError> {
    let pick = |name: &str, fallback: &str| {
        env(name)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| Some(fallback.to_string()).filter(|v| !v.trim().is_empty()))
    };
    match (
        pick(API_KEY_ENV, &config.api_key),
        pick(API_SECRET_ENV, &config.shared_secret),
    ) {
        (Some(api_key), Some(shared_secret)) => Ok(Credentials {
            api_key,
            shared_secret,
        }),
        _ => Err(ConfigError::MissingCredentials),
    }
}

/// Returns a fully-commented stock `flickr.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# flickr-embed configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Flickr API
# ---------------------------------------------------------------------------
[flickr]
# Credentials. The FLICKR_API_KEY and FLICKR_API_SECRET environment
# variables (or a .env file) take precedence over these values.
api_key = ""
shared_secret = ""

# REST endpoint.
endpoint = "https://api.flickr.com/services/rest/"

# Per-request timeout in seconds.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Cache
# ---------------------------------------------------------------------------
[cache]
# Keep API responses and rendered tags between runs. Entries never expire;
# delete the directory to refetch.
enabled = true
dir = ".flickr-cache"

# ---------------------------------------------------------------------------
# Video player
# ---------------------------------------------------------------------------
[player]
content_type = "application/x-shockwave-flash"
url = "http://www.flickr.com/apps/video/stewart.swf?v=109786"
classid = "clsid:D27CDB6E-AE6D-11cf-96B8-444553540000"
bgcolor = "#000000"
allow_fullscreen = true
lang = "en-us"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = EmbedConfig::default();
        assert_eq!(config.flickr.endpoint, "https://api.flickr.com/services/rest/");
        assert_eq!(config.flickr.timeout_secs, 30);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.dir, ".flickr-cache");
        assert_eq!(config.player.bgcolor, "#000000");
        assert!(config.player.allow_fullscreen);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
[cache]
enabled = false
"#,
        )
        .unwrap();
        assert!(!config.cache.enabled);
        // Defaults preserved
        assert_eq!(config.cache.dir, ".flickr-cache");
        assert_eq!(config.player.lang, "en-us");
    }

    #[test]
    fn parse_player_override() {
        let config = parse_config(
            r##"
[player]
bgcolor = "#ffffff"
allow_fullscreen = false
"##,
        )
        .unwrap();
        assert_eq!(config.player.bgcolor, "#ffffff");
        assert!(!config.player.allow_fullscreen);
        assert_eq!(
            config.player.classid,
            "clsid:D27CDB6E-AE6D-11cf-96B8-444553540000"
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let result = parse_config(
            r#"
[flickr]
apikey = "x"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(parse_config("[renders]\nsize = \"m\"\n").is_err());
    }

    #[test]
    fn validate_bad_endpoint() {
        let result = parse_config("[flickr]\nendpoint = \"not a url\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_timeout() {
        let mut config = EmbedConfig::default();
        config.flickr.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn validate_empty_cache_dir() {
        let mut config = EmbedConfig::default();
        config.cache.dir = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(EmbedConfig::default().validate().is_ok());
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("flickr.toml")).unwrap();
        assert!(config.cache.enabled);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flickr.toml");
        fs::write(&path, "[cache]\ndir = \"cache\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.cache.dir, "cache");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flickr.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    fn api_config(key: &str, secret: &str) -> ApiConfig {
        ApiConfig {
            api_key: key.into(),
            shared_secret: secret.into(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn credentials_from_config_file() {
        let creds = resolve_credentials_with(&api_config("k", "s"), |_| None).unwrap();
        assert_eq!(creds.api_key, "k");
        assert_eq!(creds.shared_secret, "s");
    }

    #[test]
    fn credentials_env_overrides_file() {
        let creds = resolve_credentials_with(&api_config("k", "s"), |name| match name {
            API_KEY_ENV => Some("env-key".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.api_key, "env-key");
        assert_eq!(creds.shared_secret, "s");
    }

    #[test]
    fn credentials_empty_env_falls_back_to_file() {
        let creds =
            resolve_credentials_with(&api_config("k", "s"), |_| Some(String::new())).unwrap();
        assert_eq!(creds.api_key, "k");
    }

    #[test]
    fn credentials_missing_is_error() {
        let result = resolve_credentials_with(&api_config("k", ""), |_| None);
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));
    }

    // =========================================================================
    // stock_config_toml
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config = parse_config(stock_config_toml()).unwrap();
        let defaults = EmbedConfig::default();
        assert_eq!(config.flickr.endpoint, defaults.flickr.endpoint);
        assert_eq!(config.cache.dir, defaults.cache.dir);
        assert_eq!(config.player, defaults.player);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[flickr]"));
        assert!(content.contains("[cache]"));
        assert!(content.contains("[player]"));
    }
}
