use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json, Serialized};
use medassist_ask::AskConfig;
use medassist_chat::DEFAULT_GREETING;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "medassist";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub ask: AskConfig,
    /// Welcome message seeded into new sessions. Blank disables it.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ask: AskConfig::default(),
            greeting: default_greeting(),
        }
    }
}

impl Settings {
    pub fn normalized(mut self) -> Self {
        self.ask = self.ask.normalized();
        self.greeting = self.greeting.trim().to_string();
        self
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to load settings from {path:?} on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        path: PathBuf,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
}

/// Read-only settings resolved once at startup: defaults, then the JSON file, then environment.
pub struct SettingsStore {
    settings: Settings,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".medassist"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from_disk(&config_path);
        Self {
            settings,
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn figment(path: &Path) -> Figment {
        AskConfig::merge_env(
            Figment::from(Serialized::defaults(Settings::default())).merge(Json::file(path)),
        )
    }

    pub fn try_load_from(path: &Path) -> Result<Settings, SettingsError> {
        let settings = Self::figment(path)
            .extract::<Settings>()
            .context(ExtractSnafu {
                stage: "extract-settings",
                path: path.to_path_buf(),
            })?;
        Ok(settings.normalized())
    }

    fn load_from_disk(path: &Path) -> Settings {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }

        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!("{error}. using defaults");
                Settings::default()
            }
        }
    }
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn file_values_are_overridden_by_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE_NAME,
                r#"{
                    "base_url": "http://clinic.local:8000/",
                    "user_id": 4,
                    "greeting": "  Welcome back.  "
                }"#,
            )?;
            jail.set_env("MEDASSIST_USER_ID", "9");

            let store = SettingsStore::new(PathBuf::from(SETTINGS_FILE_NAME));
            let settings = store.settings();

            assert_eq!(settings.ask.base_url, "http://clinic.local:8000");
            assert_eq!(settings.ask.user_id, 9);
            assert_eq!(settings.greeting, "Welcome back.");
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let store = SettingsStore::new(PathBuf::from("absent.json"));

            assert_eq!(store.settings(), &Settings::default());
            assert_eq!(store.settings().greeting, DEFAULT_GREETING);
            Ok(())
        });
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(SETTINGS_FILE_NAME, r#"{ "user_id": "not-a-number" }"#)?;
            let path = PathBuf::from(SETTINGS_FILE_NAME);

            assert!(SettingsStore::try_load_from(&path).is_err());
            assert_eq!(
                SettingsStore::new(path).settings(),
                &Settings::default()
            );
            Ok(())
        });
    }
}
