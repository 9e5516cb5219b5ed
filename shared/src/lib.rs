pub mod buttondown;
pub mod dawum;

use crate::error::ConfigError;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

pub const ENV_VAR_PREFIX: &str = "POLL_WATCHER__";
pub const API_KEY_ENV_VAR: &str = "BUTTONDOWN_API_KEY";
pub const SETTINGS_FILE: &str = "Settings.toml";
pub const STATE_FILE: &str = "data/last-check.json";
pub const ARCHIVE_URL: &str = "https://DEIN-USERNAME.github.io/poll-watcher/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub dawum: DawumConfig,
    pub buttondown: ButtondownConfig,
    pub state: StateConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DawumConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for DawumConfig {
    fn default() -> Self {
        Self {
            url: dawum::DAWUM_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ButtondownConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl ButtondownConfig {
    /// The credential, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for ButtondownConfig {
    fn default() -> Self {
        Self {
            url: buttondown::EMAILS_ENDPOINT.to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

// Keeps the credential out of `config = ?config` log lines.
impl std::fmt::Debug for ButtondownConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtondownConfig")
            .field("url", &self.url)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    pub path: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: STATE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub archive_url: String,
    pub max_surveys: usize,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            archive_url: ARCHIVE_URL.to_string(),
            max_surveys: 5,
        }
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(figment().extract::<Config>()?)
}

fn figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .merge(
            Env::raw()
                .only(&[API_KEY_ENV_VAR])
                .map(|_| "buttondown.api_key".into()),
        )
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] crate::ConfigError),
        #[error("failed to build HTTP client: {0}")]
        HttpClient(#[from] reqwest::Error),
    }
}
