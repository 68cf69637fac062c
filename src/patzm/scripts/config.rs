use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::patzm::scripts::error::{Result, ToolError};

const CONFIG_DIR: &str = "patzm-scripts";
const CONFIG_FILE: &str = "config.toml";

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gist: GistConfig,
}

/// The `[gist]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GistConfig {
    /// Personal access token with the `gist` scope.
    pub token: Option<String>,
    /// Alternative API root, e.g. for GitHub Enterprise.
    pub api_url: Option<String>,
}

impl Config {
    /// Location of the per-user configuration file, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parses the file at `path`. A missing file yields the default config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file");
            return Ok(Self::default());
        }
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Loads the configuration from [`Config::default_path`].
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// API root to talk to, without a trailing slash.
    pub fn api_url(&self) -> String {
        self.gist
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Resolves the API token used to authenticate against the gist store.
pub trait CredentialProvider {
    fn token(&self) -> Result<String>;
}

/// A token handed over explicitly, e.g. via `--auth-token`.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl CredentialProvider for StaticToken {
    fn token(&self) -> Result<String> {
        non_empty(Some(self.0.as_str()))
    }
}

/// Reads the token from the `[gist]` table of a loaded [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: Config,
}

impl ConfigFile {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl CredentialProvider for ConfigFile {
    fn token(&self) -> Result<String> {
        non_empty(self.config.gist.token.as_deref())
    }
}

/// Picks the explicit token when present, falling back to the config file.
pub fn credentials(explicit: Option<String>, config: &Config) -> Box<dyn CredentialProvider> {
    match explicit.filter(|token| !token.trim().is_empty()) {
        Some(token) => Box::new(StaticToken(token)),
        None => Box::new(ConfigFile::new(config.clone())),
    }
}

fn non_empty(token: Option<&str>) -> Result<String> {
    token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(ToolError::MissingCredentials)
}
