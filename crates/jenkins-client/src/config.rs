// ABOUTME: Connection settings for a Jenkins server.
// ABOUTME: Loaded from a TOML file with JENKINS_* environment overrides.

use anyhow::{Context, Result, bail};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const ENV_URL: &str = "JENKINS_URL";
pub const ENV_USERNAME: &str = "JENKINS_USERNAME";
pub const ENV_PASSWORD: &str = "JENKINS_PASSWORD";
pub const ENV_CA_CERT: &str = "JENKINS_CA_CERT";

/// Settings used to build a Jenkins client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the Jenkins server (e.g., "https://jenkins.example.com")
    pub server_url: String,
    /// User to authenticate as
    pub username: Option<String>,
    /// Password or API token for `username`
    #[serde(deserialize_with = "protect_optional")]
    pub password: Option<SecretString>,
    /// PEM bundle used to verify the server certificate
    pub ca_cert: Option<PathBuf>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            username: None,
            password: None,
            ca_cert: None,
            timeout_secs: 30,
        }
    }
}

fn protect_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<SecretString>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(SecretString::from))
}

impl ClientConfig {
    /// Load config from a TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: ClientConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        tracing::debug!(path = %path.display(), server = %config.server_url, "loaded jenkins config");
        Ok(config)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply JENKINS_* overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_URL) {
            self.server_url = url;
        }
        if let Some(username) = get(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.password = Some(SecretString::from(password));
        }
        if let Some(ca_cert) = get(ENV_CA_CERT) {
            self.ca_cert = Some(PathBuf::from(ca_cert));
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse and check the server URL.
    ///
    /// Only http and https are accepted. A password without a username is
    /// rejected because Jenkins basic auth needs both.
    pub fn server(&self) -> Result<Url> {
        let url = Url::parse(&self.server_url)
            .with_context(|| format!("Invalid Jenkins server URL: {}", self.server_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            bail!("Unsupported Jenkins URL scheme: {}", url.scheme());
        }
        if self.timeout_secs == 0 {
            bail!("Jenkins request timeout must be at least one second");
        }
        if self.password.is_some() && self.username.is_none() {
            bail!("A Jenkins password was set without a username");
        }

        Ok(url)
    }
}
