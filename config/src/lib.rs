//! Configuration loading for marg.
//!
//! Read once at startup from `~/.marg/config.toml`; a missing file means
//! defaults. Environment variables (`MARG_API_URL`, `MARG_TIMEOUT_SECS`)
//! override the file, which keeps ad-hoc runs against a non-default backend
//! one shell line away.
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 30
//!
//! [auth]
//! token = "..."
//!
//! [app]
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//! reveal_cps = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;

const CONFIG_DIR: &str = ".marg";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REVEAL_CPS: u32 = 60;

#[derive(Debug, Default, Deserialize)]
pub struct MargConfig {
    pub api: Option<ApiConfig>,
    pub auth: Option<AuthConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Default, Deserialize)]
pub struct AuthConfig {
    pub token: Option<String>,
}

// Manual Debug impl to prevent leaking the token in logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.token.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("AuthConfig").field("token", &token).finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and checkboxes.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable the character-reveal effect on assistant replies.
    #[serde(default)]
    pub reduced_motion: bool,
    /// Reveal speed in characters per second.
    pub reveal_cps: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl MargConfig {
    /// `~/.marg/config.toml`, when a home directory exists.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the default config file. `Ok(None)` when it does not exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }

    /// Backend base URL: `MARG_API_URL`, then the file, then localhost.
    #[must_use]
    pub fn base_url(&self) -> String {
        if let Ok(url) = env::var("MARG_API_URL")
            && !url.trim().is_empty()
        {
            return url;
        }
        self.api
            .as_ref()
            .and_then(|api| api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Bounded per-request timeout: `MARG_TIMEOUT_SECS`, then the file,
    /// then 30 seconds.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = env::var("MARG_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .or_else(|| self.api.as_ref().and_then(|api| api.timeout_secs))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// The identity gate: a present, non-empty token counts as signed in.
    /// Display-only; nothing in the session engine consults it.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth
            .as_ref()
            .and_then(|auth| auth.token.as_deref())
            .is_some_and(|token| !token.trim().is_empty())
    }

    #[must_use]
    pub fn reveal_cps(&self) -> u32 {
        self.app
            .as_ref()
            .and_then(|app| app.reveal_cps)
            .filter(|cps| *cps > 0)
            .unwrap_or(DEFAULT_REVEAL_CPS)
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthConfig, MargConfig};
    use std::io::Write;

    fn parse(raw: &str) -> MargConfig {
        toml::from_str(raw).expect("test config parses")
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = MargConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn loads_sections_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://10.0.0.2:9000\"\ntimeout_secs = 5\n\n[auth]\ntoken = \"abc\""
        )
        .unwrap();

        let config = MargConfig::load_from(&path).unwrap().expect("file exists");
        assert_eq!(config.base_url(), "http://10.0.0.2:9000");
        assert_eq!(config.request_timeout().as_secs(), 5);
        assert!(config.is_authenticated());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = MargConfig::load_from(&path).unwrap_err();
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn defaults_apply_when_sections_are_absent() {
        let config = MargConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout().as_secs(), 30);
        assert!(!config.is_authenticated());
        assert_eq!(config.reveal_cps(), 60);
    }

    #[test]
    fn blank_token_does_not_authenticate() {
        let config = parse("[auth]\ntoken = \"  \"");
        assert!(!config.is_authenticated());
    }

    #[test]
    fn debug_masks_the_token() {
        let auth = AuthConfig {
            token: Some("secret".to_string()),
        };
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn zero_reveal_cps_falls_back_to_default() {
        let config = parse("[app]\nreveal_cps = 0");
        assert_eq!(config.reveal_cps(), 60);
    }
}
