//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use osp_handshake::credentials::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
use osp_handshake::{ClientConfig, Credentials};
use serde::{Deserialize, Serialize};

/// CLI configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verify TLS certificates of the service and identity providers.
    #[serde(default)]
    pub verify_tls: bool,

    /// Per-request timeout in seconds. Unset waits indefinitely.
    pub timeout_secs: Option<u64>,

    /// Username presented to the identity provider.
    pub username: Option<String>,

    /// Password presented to the identity provider.
    pub password: Option<String>,
}

impl CliConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> crate::CliResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading configuration");
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::CliError::Config(format!(
                    "failed to parse {}: {e}",
                    config_path.display()
                ))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to `path`, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> crate::CliResult<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::CliError::Config(format!("failed to serialize config: {e}"))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Gets the default configuration file path.
    pub fn config_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            crate::CliError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".osp").join("osp.toml"))
    }

    /// Resolves credentials; arguments take precedence over the file.
    #[must_use]
    pub fn credentials(&self, username: Option<&str>, password: Option<&str>) -> Credentials {
        let username = username
            .or(self.username.as_deref())
            .unwrap_or(DEFAULT_USERNAME);
        let password = password
            .or(self.password.as_deref())
            .unwrap_or(DEFAULT_PASSWORD);
        Credentials::new(username, password)
    }

    /// Resolves transport settings; arguments take precedence over the file.
    #[must_use]
    pub fn client_config(
        &self,
        verify_tls: Option<bool>,
        timeout_secs: Option<u64>,
    ) -> ClientConfig {
        ClientConfig::default()
            .with_verify_tls(verify_tls.unwrap_or(self.verify_tls))
            .with_timeout(timeout_secs.or(self.timeout_secs).map(Duration::from_secs))
    }
}
