use std::sync::OnceLock;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{ClientResult, ConfigSnafu};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_USER_ID: u64 = 1;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// Prefix for environment overrides, e.g. `MEDASSIST_BASE_URL`.
pub const ENV_PREFIX: &str = "MEDASSIST_";
/// Base URL variable understood by earlier dashboard deployments.
pub const LEGACY_BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_id")]
    pub user_id: u64,
    /// Zero disables the per-request deadline.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

static ASK_CONFIG: OnceLock<AskConfig> = OnceLock::new();

impl AskConfig {
    /// Layers the environment over `figment`: the legacy variable first, prefixed keys last.
    pub fn merge_env(figment: Figment) -> Figment {
        figment
            .merge(
                Env::raw()
                    .only(&[LEGACY_BASE_URL_ENV])
                    .map(|_| "base_url".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn figment() -> Figment {
        Self::merge_env(Figment::from(Serialized::defaults(Self::default())))
    }

    pub fn from_figment(figment: &Figment) -> ClientResult<Self> {
        let config = figment.extract::<Self>().context(ConfigSnafu {
            stage: "extract-ask-config",
        })?;
        Ok(config.normalized())
    }

    pub fn load() -> ClientResult<Self> {
        Self::from_figment(&Self::figment())
    }

    /// Pins the process-wide configuration. Returns false when one was already resolved.
    pub fn install(self) -> bool {
        ASK_CONFIG.set(self.normalized()).is_ok()
    }

    /// Process-wide configuration, resolved from the environment on first use unless installed.
    pub fn global() -> &'static AskConfig {
        ASK_CONFIG.get_or_init(|| match Self::load() {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(error = %error, "failed to load ask config; using defaults");
                Self::default()
            }
        })
    }

    pub fn normalized(mut self) -> Self {
        let base_url = self.base_url.trim().trim_end_matches('/');
        self.base_url = if base_url.is_empty() {
            default_base_url()
        } else {
            base_url.to_string()
        };

        // The backend rejects ids below 1.
        if self.user_id == 0 {
            self.user_id = default_user_id();
        }

        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/ask", self.base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_id() -> u64 {
    DEFAULT_USER_ID
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_point_at_loopback() {
        Jail::expect_with(|_jail| {
            let config = AskConfig::load().expect("defaults should load");

            assert_eq!(config, AskConfig::default());
            assert_eq!(config.endpoint(), "http://127.0.0.1:8000/ask");
            assert_eq!(config.request_timeout(), Some(Duration::from_secs(60)));
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_wins_over_legacy_variable() {
        Jail::expect_with(|jail| {
            jail.set_env(LEGACY_BASE_URL_ENV, "http://legacy.local:9000");
            let legacy_only = AskConfig::load().expect("legacy env should load");
            assert_eq!(legacy_only.base_url, "http://legacy.local:9000");

            jail.set_env("MEDASSIST_BASE_URL", "https://ask.example.org/api/");
            jail.set_env("MEDASSIST_USER_ID", "7");
            jail.set_env("MEDASSIST_REQUEST_TIMEOUT_SECS", "0");
            let config = AskConfig::load().expect("prefixed env should load");

            assert_eq!(config.base_url, "https://ask.example.org/api");
            assert_eq!(config.endpoint(), "https://ask.example.org/api/ask");
            assert_eq!(config.user_id, 7);
            assert_eq!(config.request_timeout(), None);
            Ok(())
        });
    }

    #[test]
    fn normalization_restores_blank_and_zero_values() {
        let config = AskConfig {
            base_url: "   ".to_string(),
            user_id: 0,
            request_timeout_secs: 5,
        }
        .normalized();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_id, DEFAULT_USER_ID);
    }
}
