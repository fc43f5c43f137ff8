use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://www.paprikaapp.com/api/v1";
const DEFAULT_MAX_WORKERS: usize = 5;

/// Settings file (JSON, every field optional). Each field can be overridden
/// with a `PAPRIKA_*` environment variable, and some again by command-line
/// flags; the flags win.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub database: Option<PathBuf>,
    pub max_workers: usize,
    pub paprika_username: Option<String>,
    pub paprika_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            database: None,
            max_workers: DEFAULT_MAX_WORKERS,
            paprika_username: None,
            paprika_password: None,
        }
    }
}

impl Config {
    /// Load the config file (explicit path, or the platform default), then
    /// apply environment overrides. A missing default file just means
    /// defaults; a missing explicit one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "pantry").map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = env::var("PAPRIKA_ENDPOINT") {
            self.endpoint = v;
        }
        if let Ok(v) = env::var("PAPRIKA_DATABASE") {
            self.database = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("PAPRIKA_MAX_WORKERS") {
            self.max_workers = v
                .parse()
                .with_context(|| format!("Invalid PAPRIKA_MAX_WORKERS: '{v}'"))?;
        }
        if let Ok(v) = env::var("PAPRIKA_USERNAME") {
            self.paprika_username = Some(v);
        }
        if let Ok(v) = env::var("PAPRIKA_PASSWORD") {
            self.paprika_password = Some(v);
        }
        Ok(())
    }

    /// Resolve the database path: command-line flag, then config file, then
    /// the platform data directory. Parent directories are created on
    /// demand.
    pub fn database_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        let path = if let Some(p) = flag {
            p.to_path_buf()
        } else if let Some(p) = &self.database {
            p.clone()
        } else {
            let dirs = ProjectDirs::from("", "", "pantry")
                .context("Could not determine home directory")?;
            dirs.data_dir().join("pantry.db")
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_workers, 5);
        assert!(config.database.is_none());
        assert!(config.paprika_username.is_none());
        assert!(config.paprika_password.is_none());
    }

    #[test]
    fn test_load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "endpoint": "https://example.test/api/v1",
                "database": "/tmp/recipes.db",
                "max_workers": 2,
                "paprika_username": "me@example.test",
                "paprika_password": "hunter2"
            }"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.endpoint, "https://example.test/api/v1");
        assert_eq!(
            config.database.as_deref(),
            Some(Path::new("/tmp/recipes.db"))
        );
        assert_eq!(config.max_workers, 2);
        assert_eq!(config.paprika_username.as_deref(), Some("me@example.test"));
        assert_eq!(config.paprika_password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"paprika_username": "me"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_workers, 5);
        assert_eq!(config.paprika_username.as_deref(), Some("me"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_database_path_prefers_flag() {
        let dir = tempfile::tempdir().unwrap();
        let flag = dir.path().join("flag.db");
        let config = Config {
            database: Some(dir.path().join("config.db")),
            ..Config::default()
        };

        let resolved = config.database_path(Some(&flag)).unwrap();
        assert_eq!(resolved, flag);
    }

    #[test]
    fn test_database_path_falls_back_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let configured = dir.path().join("nested").join("config.db");
        let config = Config {
            database: Some(configured.clone()),
            ..Config::default()
        };

        let resolved = config.database_path(None).unwrap();
        assert_eq!(resolved, configured);
        // Parent directory was created on demand
        assert!(configured.parent().unwrap().is_dir());
    }
}
