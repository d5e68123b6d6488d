//! Configuration loading, validation, and write-back.
//!
//! The recipient registry lives inside the configuration file as a
//! comma-joined field. It is the only field rewritten at runtime, and an
//! update replaces the whole file in one read-modify-write pass. The process
//! is the single writer; the replace is not atomic at the filesystem level.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Errors that abort the process before any work happens.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("missing or empty config field: {0}")]
    MissingField(&'static str),

    #[error("invalid source url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Telegram credential and recipient registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSection {
    /// Bot token used for every API call.
    pub token: String,
    /// Comma-joined recipient chat ids; grows as new chats message the bot.
    #[serde(default)]
    pub chat_ids: String,
}

/// Where to look and what to look for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Page listing macOS releases.
    pub url: String,
    /// Substring that selects the release-table row to watch.
    pub search_token: String,
}

/// On-disk state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSection {
    /// File holding the last notified version record.
    pub version_file: PathBuf,
}

/// Full configuration as it appears on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramSection,
    pub source: SourceSection,
    pub state: StateSection,
}

impl Config {
    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.token.trim().is_empty() {
            return Err(ConfigError::MissingField("telegram.token"));
        }
        if self.source.url.trim().is_empty() {
            return Err(ConfigError::MissingField("source.url"));
        }
        Url::parse(&self.source.url).map_err(|source| ConfigError::InvalidUrl {
            url: self.source.url.clone(),
            source,
        })?;
        if self.source.search_token.is_empty() {
            return Err(ConfigError::MissingField("source.search_token"));
        }
        if self.state.version_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("state.version_file"));
        }
        Ok(())
    }

    /// Serialize the whole configuration back to `path`, replacing the file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let rendered = toml::to_string_pretty(self).context("failed to serialize configuration")?;
        fs::write(path, rendered)
            .with_context(|| format!("failed to write config file: {}", path.display()))
    }

    /// The recipient registry as a set. Empty segments are dropped.
    pub fn recipients(&self) -> BTreeSet<String> {
        self.telegram
            .chat_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Replace the recipient registry field. Order carries no meaning; the
    /// set's iteration order just keeps the persisted form deterministic.
    pub fn set_recipients(&mut self, recipients: &BTreeSet<String>) {
        self.telegram.chat_ids = recipients.iter().cloned().collect::<Vec<_>>().join(",");
    }
}

/// Resolve the configuration file path.
///
/// Explicit flag wins, then the `MACWATCH_CONFIG` environment variable, then
/// `./macwatch.toml` if present, then `~/.macwatch/config.toml`.
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var("MACWATCH_CONFIG") {
        return PathBuf::from(env_path);
    }

    let cwd_config = PathBuf::from("macwatch.toml");
    if cwd_config.exists() {
        return cwd_config;
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".macwatch")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"
[telegram]
token = "123456:ABC-DEF"
chat_ids = "111,222"

[source]
url = "https://support.apple.com/en-us/100100"
search_token = "macOS Sequoia"

[state]
version_file = "/tmp/macwatch-last-version.txt"
"#;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_good_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, GOOD);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.telegram.token, "123456:ABC-DEF");
        assert_eq!(config.source.search_token, "macOS Sequoia");
        assert_eq!(config.recipients().len(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[telegram]
token = "123456:ABC-DEF"
"#,
        );

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_token_is_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, &GOOD.replace("123456:ABC-DEF", ""));

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("telegram.token")));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            &GOOD.replace("https://support.apple.com/en-us/100100", "not a url"),
        );

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_recipients_split_drops_empty_segments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, &GOOD.replace("111,222", "111, 222,,333"));

        let config = Config::load(&path).unwrap();
        let recipients = config.recipients();
        assert_eq!(recipients.len(), 3);
        assert!(recipients.contains("222"));
    }

    #[test]
    fn test_save_round_trips_recipients() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, GOOD);

        let mut config = Config::load(&path).unwrap();
        let mut recipients = config.recipients();
        recipients.insert("333".to_string());
        config.set_recipients(&recipients);
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.recipients(), recipients);
        assert_eq!(reloaded.telegram.token, "123456:ABC-DEF");
    }

    #[test]
    fn test_resolve_explicit_path_wins() {
        let path = resolve_config_path(Some("/etc/macwatch/custom.toml"));
        assert_eq!(path, PathBuf::from("/etc/macwatch/custom.toml"));
    }
}
