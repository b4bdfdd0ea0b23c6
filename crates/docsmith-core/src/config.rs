//! Application settings loaded once at startup.
//!
//! Precedence: process environment > settings file (`DOCSMITH_CONFIG`, default
//! `config/docsmith`) > built-in defaults. The gateway calls `dotenvy::dotenv()` before
//! `Settings::load`, so keys in `.env` arrive through the environment layer.

use serde::Deserialize;
use std::fmt;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_APP_NAME: &str = "AI Wrappers";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Read-only runtime configuration.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | ANTHROPIC_API_KEY | (empty) | Upstream credential. Blank means generation endpoints answer 503. |
/// | ANTHROPIC_BASE_URL | https://api.anthropic.com | Provider base URL (point at a proxy or a local stub). |
/// | MODEL_NAME | claude-sonnet-4-5-20250929 | Model identifier sent with every generation. |
/// | APP_NAME | AI Wrappers | Display name embedded in the HTML pages. |
/// | DEBUG | false | Raises the default log level to `debug`. |
/// | BIND_ADDR | 127.0.0.1:8000 | Listen address for the gateway. |
#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
    pub model_name: String,
    pub app_name: String,
    #[serde(default)]
    pub debug: bool,
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anthropic_api_key: String::new(),
            anthropic_base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            debug: false,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, the optional settings file, and the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("DOCSMITH_CONFIG").unwrap_or_else(|_| "config/docsmith".to_string());
        Self::load_from(&config_path, config::Environment::default())
    }

    /// Same as [`Settings::load`] with an explicit file path and environment source.
    pub fn load_from(
        config_path: &str,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let built = config::Config::builder()
            .set_default("anthropic_api_key", "")?
            .set_default("anthropic_base_url", DEFAULT_BASE_URL)?
            .set_default("model_name", DEFAULT_MODEL)?
            .set_default("app_name", DEFAULT_APP_NAME)?
            .set_default("debug", false)?
            .set_default("bind_addr", DEFAULT_BIND_ADDR)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(environment)
            .build()?;

        built.try_deserialize()
    }

    /// Settings with the given credential and every other field at its default.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            anthropic_api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// True when an upstream credential is present. Whitespace-only keys count as absent.
    pub fn is_configured(&self) -> bool {
        !self.anthropic_api_key.trim().is_empty()
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub fn default_log_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.is_configured() { "<set>" } else { "<unset>" };
        f.debug_struct("Settings")
            .field("anthropic_api_key", &key)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("model_name", &self.model_name)
            .field("app_name", &self.app_name)
            .field("debug", &self.debug)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}
