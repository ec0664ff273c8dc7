use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::models::UserId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available")]
    NoConfigDir,
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Session persisted between runs: which backend to talk to, the opaque
/// bearer token handed out at login, and the id of the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppState {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_id: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    fn toml_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("com", "jobmatch", "jobmatch")?;
        Some(proj.config_dir().join("session.toml"))
    }

    pub fn load() -> Self {
        match Self::toml_path() {
            Some(path) => Self::load_from(&path),
            None => Self::new(),
        }
    }

    /// Missing or unreadable files yield a fresh session.
    pub fn load_from(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("no session at {}: {}", path.display(), e);
                return Self::new();
            }
        };
        match toml::from_str::<AppState>(&text) {
            Ok(state) => state,
            Err(e) => {
                warn!("ignoring malformed session file {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::toml_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml).map_err(io_err)
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_in(&mut self, token: String, user_id: Option<UserId>) {
        self.token = Some(token);
        self.user_id = user_id;
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user_id = None;
    }

    /// The base URL to use, preferring an explicit override (command line or
    /// `JOBMATCH_API_URL`).
    pub fn base_url<'a>(&'a self, override_url: Option<&'a str>) -> &'a str {
        match override_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => &self.base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir()
            .join(format!("jobmatch-test-{}-{}", std::process::id(), nanos))
            .join(name)
    }

    #[test]
    fn session_survives_save_and_load() {
        let path = scratch_path("session.toml");
        let mut state = AppState::new();
        state.sign_in("abc.def".to_string(), Some(12));
        state.save_to(&path).unwrap();

        let loaded = AppState::load_from(&path);
        assert_eq!(loaded, state);
        assert!(loaded.is_logged_in());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let path = scratch_path("absent.toml");
        assert_eq!(AppState::load_from(&path), AppState::new());

        let broken = scratch_path("broken.toml");
        fs::create_dir_all(broken.parent().unwrap()).unwrap();
        fs::write(&broken, "base_url = [").unwrap();
        assert_eq!(AppState::load_from(&broken).base_url, DEFAULT_BASE_URL);
        let _ = fs::remove_dir_all(broken.parent().unwrap());
    }

    #[test]
    fn sign_out_clears_credentials() {
        let mut state = AppState::new();
        state.sign_in("t".into(), Some(3));
        state.sign_out();
        assert!(!state.is_logged_in());
        assert_eq!(state.user_id, None);
    }

    #[test]
    fn override_url_wins_when_set() {
        let state = AppState::new();
        assert_eq!(state.base_url(None), DEFAULT_BASE_URL);
        assert_eq!(state.base_url(Some("  ")), DEFAULT_BASE_URL);
        assert_eq!(state.base_url(Some("http://api:3001")), "http://api:3001");
    }
}
