//! Client configuration.
//!
//! A [`Config`] is an explicit value owned by the client and handed by
//! reference to the fetchers; nothing is stored globally.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::model::Language;

pub const DEFAULT_RES_URL: &str = "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/";
pub const DEFAULT_API_URL: &str = "https://api.mihomo.me/sr_info/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = concat!("Mar-7th/mihomo.rs/", env!("CARGO_PKG_VERSION"));

/// Which languages `ensure_index` provisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalizationMode {
    /// Only [`Config::language`].
    #[default]
    Single,
    /// Every language of [`Language::ALL`].
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    pub mode: LocalizationMode,
    /// Root of the metadata cache: `<index_path>/<lang>/<file>.json`.
    pub index_path: PathBuf,
    /// Base URL of the static resource host, with trailing slash.
    pub res_url: String,
    /// Player-data endpoint; the UID is appended verbatim.
    pub api_url: String,
    pub proxy: Option<String>,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            mode: LocalizationMode::default(),
            index_path: default_index_path(),
            res_url: DEFAULT_RES_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_mode(mut self, mode: LocalizationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_index_path(mut self, index_path: impl Into<PathBuf>) -> Self {
        self.index_path = index_path.into();
        self
    }

    pub fn with_res_url(mut self, res_url: impl Into<String>) -> Self {
        self.res_url = res_url.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Languages `ensure_index` covers under the current mode.
    pub fn languages(&self) -> Vec<Language> {
        match self.mode {
            LocalizationMode::Single => vec![self.language],
            LocalizationMode::All => Language::ALL.to_vec(),
        }
    }

    pub fn language_dir(&self, language: Language) -> PathBuf {
        self.index_path.join(language.code())
    }

    pub fn index_url(&self, language: Language, file: &str) -> String {
        format!("{}index_min/{}/{}", self.res_url, language.code(), file)
    }

    pub fn profile_url(&self, uid: &str) -> String {
        format!("{}{}", self.api_url, uid)
    }
}

/// Platform cache directory, falling back to `./data/index` when the
/// platform does not report one.
pub fn default_index_path() -> PathBuf {
    directories::ProjectDirs::from("me", "mihomo", "mihomo")
        .map(|dirs| dirs.cache_dir().join("index"))
        .unwrap_or_else(|| PathBuf::from("data").join("index"))
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls() {
        let config = Config::default()
            .with_res_url("http://res.local/")
            .with_api_url("http://api.local/uid/");
        assert_eq!(
            config.index_url(Language::Jp, "avatars.json"),
            "http://res.local/index_min/jp/avatars.json"
        );
        assert_eq!(config.profile_url("100"), "http://api.local/uid/100");
    }

    #[test]
    fn test_languages_follow_mode() {
        let config = Config::default().with_language(Language::Kr);
        assert_eq!(config.languages(), vec![Language::Kr]);
        let config = config.with_mode(LocalizationMode::All);
        assert_eq!(config.languages().len(), Language::ALL.len());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_value(json!({
            "language": "de",
            "mode": "all",
            "timeout": 3
        }))
        .unwrap();
        assert_eq!(config.language, Language::De);
        assert_eq!(config.mode, LocalizationMode::All);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.proxy.is_none());
    }
}
