use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chat::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::vocabulary::Vocabulary;

pub const CONFIG_FILE: &str = "config.json";
pub const CONTENT_FILE: &str = "content.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid namespace {0:?}: must be one word and not 'help' or 'clear'")]
    InvalidNamespace(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// The namespace verb, e.g. `portfolio` in `portfolio about`.
    pub namespace: String,
    /// Portfolio owner, used by the chat assistant and the header line.
    pub owner: String,
    /// Product title on the welcome and home screens.
    pub title: String,
    pub content_path: Option<PathBuf>,
    pub chat: ChatConfig,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            namespace: Vocabulary::DEFAULT_NAMESPACE.to_string(),
            owner: "Alex Rivera".to_string(),
            title: "Termfolio".to_string(),
            content_path: None,
            chat: ChatConfig::default(),
        }
    }

    /// Load from the default data directory with environment overrides.
    /// Not validated: callers apply their own overrides, then [`validate`].
    ///
    /// [`validate`]: CoreConfig::validate
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(default_data_dir(), |key| std::env::var(key).ok())
    }

    /// [`CoreConfig::load_from`] followed by [`CoreConfig::apply_env_with`].
    pub fn load_with<P, F>(data_dir: P, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_from(data_dir)?;
        config.apply_env_with(lookup);
        Ok(config)
    }

    /// Read `<data_dir>/config.json` if present, otherwise use defaults.
    pub fn load_from<P: AsRef<Path>>(data_dir: P) -> Result<Self, ConfigError> {
        let data_dir = data_dir.as_ref();
        let path = data_dir.join(CONFIG_FILE);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str::<Self>(&json).map_err(|source| {
                ConfigError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        config.data_dir = data_dir.to_path_buf();
        tracing::debug!(data_dir = %config.data_dir.display(), "Loaded config");
        Ok(config)
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(namespace) = var("TERMFOLIO_NAMESPACE") {
            self.namespace = namespace;
        }
        if let Some(path) = var("TERMFOLIO_CONTENT") {
            self.content_path = Some(PathBuf::from(path));
        }
        if let Some(key) = var("TERMFOLIO_GEMINI_API_KEY").or_else(|| var("GEMINI_API_KEY")) {
            self.chat.api_key = Some(key);
        }
        if let Some(model) = var("TERMFOLIO_GEMINI_MODEL") {
            self.chat.model = model;
        }
    }

    /// Command-line overrides. They win over the file and the environment.
    pub fn apply_overrides(&mut self, namespace: Option<&str>, content_path: Option<&Path>) {
        if let Some(namespace) = namespace {
            self.namespace = namespace.to_string();
        }
        if let Some(path) = content_path {
            self.content_path = Some(path.to_path_buf());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Vocabulary::validate_namespace(&self.namespace) {
            return Err(ConfigError::InvalidNamespace(self.namespace.clone()));
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(&self.namespace)
    }

    /// Content file to load: the configured path, else `content.json` in the
    /// data directory when it exists. `None` means the bundled sample.
    pub fn content_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.content_path {
            return Some(path.clone());
        }
        let candidate = self.data_dir.join(CONTENT_FILE);
        candidate.is_file().then_some(candidate)
    }

    /// Login handle for the header line: the owner's first name, lowercased.
    pub fn handle(&self) -> String {
        self.owner
            .split_whitespace()
            .next()
            .unwrap_or("user")
            .to_lowercase()
    }

    /// `user@host ~ /home/user`
    pub fn header_line(&self) -> String {
        let handle = self.handle();
        format!("{handle}@{} ~ /home/{handle}", self.namespace.to_lowercase())
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termfolio")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.namespace, "portfolio");
        assert_eq!(config.chat.model, "gemini-2.0-flash");
        assert_eq!(config.chat.api_key, None);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "namespace": "arbaazcode", "chat": { "api_key": "k" } }"#,
        )
        .unwrap();
        let config = CoreConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.namespace, "arbaazcode");
        assert_eq!(config.title, "Termfolio");
        assert_eq!(config.chat.api_key.as_deref(), Some("k"));
        assert_eq!(config.chat.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ nope").unwrap();
        let err = CoreConfig::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = CoreConfig::new("/tmp/x");
        config.apply_env_with(env(&[
            ("TERMFOLIO_NAMESPACE", "folio"),
            ("TERMFOLIO_CONTENT", "/data/me.json"),
            ("GEMINI_API_KEY", "fallback"),
            ("TERMFOLIO_GEMINI_MODEL", "gemini-pro"),
        ]));
        assert_eq!(config.namespace, "folio");
        assert_eq!(config.content_path, Some(PathBuf::from("/data/me.json")));
        assert_eq!(config.chat.api_key.as_deref(), Some("fallback"));
        assert_eq!(config.chat.model, "gemini-pro");
    }

    #[test]
    fn prefixed_key_wins_and_empty_values_are_ignored() {
        let mut config = CoreConfig::new("/tmp/x");
        config.apply_env_with(env(&[
            ("TERMFOLIO_GEMINI_API_KEY", "primary"),
            ("GEMINI_API_KEY", "fallback"),
            ("TERMFOLIO_NAMESPACE", "  "),
        ]));
        assert_eq!(config.chat.api_key.as_deref(), Some("primary"));
        assert_eq!(config.namespace, "portfolio");
    }

    #[test]
    fn bad_env_namespace_can_be_overridden_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut config =
            CoreConfig::load_with(dir.path(), env(&[("TERMFOLIO_NAMESPACE", "help")])).unwrap();
        assert_eq!(config.namespace, "help");
        assert!(config.validate().is_err());

        config.apply_overrides(Some("folio"), Some(Path::new("/data/me.json")));
        assert!(config.validate().is_ok());
        assert_eq!(config.namespace, "folio");
        assert_eq!(config.content_path, Some(PathBuf::from("/data/me.json")));
    }

    #[test]
    fn overrides_leave_unset_fields_alone() {
        let mut config = CoreConfig::new("/tmp/x");
        config.apply_overrides(None, None);
        assert_eq!(config, CoreConfig::new("/tmp/x"));
    }

    #[test]
    fn validate_rejects_bad_namespace() {
        let mut config = CoreConfig::new("/tmp/x");
        assert!(config.validate().is_ok());
        config.namespace = "help".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidNamespace(_))));
        config.namespace = "two words".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn content_file_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CoreConfig::new(dir.path());
        assert_eq!(config.content_file(), None);

        std::fs::write(dir.path().join(CONTENT_FILE), "{}").unwrap();
        assert_eq!(config.content_file(), Some(dir.path().join(CONTENT_FILE)));

        config.content_path = Some(PathBuf::from("/elsewhere.json"));
        assert_eq!(config.content_file(), Some(PathBuf::from("/elsewhere.json")));
    }

    #[test]
    fn header_line_uses_owner_handle() {
        let mut config = CoreConfig::new("/tmp/x");
        assert_eq!(config.header_line(), "alex@portfolio ~ /home/alex");
        config.owner = String::new();
        assert_eq!(config.handle(), "user");
    }
}
