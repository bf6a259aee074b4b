//! Client configuration
//!
//! `ClientConfig` is passed explicitly to `MailosaurClient::new`. For
//! convenience it can be loaded from (in order of priority):
//! 1. JSON file (~/.config/mailosaur/mailosaur.json)
//! 2. Environment variables (MAILOSAUR_API_KEY, MAILOSAUR_BASE_URL, MAILOSAUR_SMTP_HOST)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::wait::WaitOptions;

/// Config filename in the Mailosaur config directory
const CONFIG_FILE: &str = "mailosaur.json";

/// Service endpoint used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://mailosaur.com/";

/// Host used for generated addresses when none is configured
pub const DEFAULT_SMTP_HOST: &str = "mailosaur.io";

/// Settings for a `MailosaurClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Always ends with `/` so relative API paths join beneath it
    pub base_url: Url,
    /// Domain used when generating disposable addresses
    pub smtp_host: String,
    /// Upper bound for any single HTTP request
    pub request_timeout: Duration,
    /// Defaults for `wait_for`
    pub wait: WaitOptions,
}

/// On-disk config file format
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    api_key: String,
    base_url: Option<String>,
    smtp_host: Option<String>,
    request_timeout_secs: Option<u64>,
    wait_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Default per-request timeout
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a config for the production service
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            wait: WaitOptions::default(),
        }
    }

    /// Point the client at another deployment (e.g. a sandbox)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_smtp_host(mut self, smtp_host: impl Into<String>) -> Self {
        self.smtp_host = smtp_host.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Load config from the config file, falling back to the environment
    pub fn load() -> Result<Self> {
        if ::config::config_exists(CONFIG_FILE) {
            let file: ConfigFile = ::config::load_json(CONFIG_FILE)?;
            return Self::from_config_file(file);
        }

        Self::from_env()
    }

    /// Load config from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file: ConfigFile = ::config::load_json_file(path)?;
        Self::from_config_file(file)
    }

    /// Parse config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json).context("Failed to parse config JSON")?;
        Self::from_config_file(file)
    }

    fn from_config_file(file: ConfigFile) -> Result<Self> {
        if file.api_key.trim().is_empty() {
            anyhow::bail!("Config file has an empty 'apiKey'");
        }

        let mut config = Self::new(file.api_key);
        if let Some(base_url) = file.base_url {
            config = config.with_base_url(&base_url)?;
        }
        if let Some(smtp_host) = file.smtp_host {
            config.smtp_host = smtp_host;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.wait_timeout_secs {
            config.wait = config.wait.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MAILOSAUR_API_KEY")
            .context("MAILOSAUR_API_KEY environment variable not set")?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = non_empty_env("MAILOSAUR_BASE_URL") {
            config = config
                .with_base_url(&base_url)
                .context("MAILOSAUR_BASE_URL is not a valid URL")?;
        }
        if let Some(smtp_host) = non_empty_env("MAILOSAUR_SMTP_HOST") {
            config.smtp_host = smtp_host;
        }
        Ok(config)
    }

    /// Get the default config file path (~/.config/mailosaur/mailosaur.json)
    pub fn default_config_path() -> Option<PathBuf> {
        ::config::config_path(CONFIG_FILE)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a base URL and make sure it ends with a slash
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    let url = Url::parse(&raw).with_context(|| format!("Invalid base URL: {}", raw))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Base URL cannot have paths joined to it: {}", raw);
    }
    Ok(url)
}
