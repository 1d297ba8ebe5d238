use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TOKEN_ENV_VAR: &str = "TWITTER_BEARER_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No bearer token: set TWITTER_BEARER_TOKEN or bearer_token in the config file")]
    MissingToken,
}

/// Bearer token used to authenticate every API call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bearer_token: Option<String>,
    pub api: ApiConfig,
    pub report: ReportConfig,
    pub stream: StreamConfig,
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub stream_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitter.com/1.1".to_string(),
            stream_url: "https://stream.twitter.com/1.1".to_string(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub user: String,
    pub count: usize,
    pub text_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            user: "elonmusk".to_string(),
            count: 200,
            text_width: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub output: PathBuf,
    pub track: Vec<String>,
    /// Print each raw item to stdout as well as appending it.
    pub echo: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("tweets.json"),
            track: Vec::new(),
            echo: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Extra or overriding lexicon entries, word -> polarity.
    pub words: HashMap<String, f64>,
}

impl Config {
    /// `~/.tweetlens/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".tweetlens").join("config.toml"))
    }

    /// Load from an explicit path, or from the default location when `path` is
    /// `None`. A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The environment variable wins over the config file.
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        self.credential_from(std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn credential_from(&self, env_token: Option<String>) -> Result<Credential, ConfigError> {
        env_token
            .filter(|token| !token.is_empty())
            .or_else(|| self.bearer_token.clone())
            .filter(|token| !token.is_empty())
            .map(Credential::new)
            .ok_or(ConfigError::MissingToken)
    }
}
