//! Runtime configuration.
//!
//! Built once per invocation and passed to whatever needs it. Sources, lowest
//! precedence first:
//! 1. Built-in defaults (the platform data directory, e.g.
//!    `~/Library/Application Support/tracklog` on macOS)
//! 2. `tracklog.toml` in the data directory
//! 3. `TRACKLOG_DATA_DIR` / `TRACKLOG_LIBRARY` environment variables
//! 4. Command-line overrides

#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracklog_core::errors::{ExError, ExErrorKind};
use tracklog_core::logging_facility::Profile;
use tracklog_store::{ExportFileProvider, SqliteStore};

pub const APPLICATION_NAME: &str = "tracklog";
pub const CONFIG_FILE_NAME: &str = "tracklog.toml";
pub const DEFAULT_DB_FILE: &str = "tracklog.db";
pub const DEFAULT_LIBRARY_FILE: &str = "library.json";

pub const ENV_DATA_DIR: &str = "TRACKLOG_DATA_DIR";
pub const ENV_LIBRARY: &str = "TRACKLOG_LIBRARY";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub library_path: PathBuf,
    pub log_profile: Profile,
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub library_path: Option<PathBuf>,
    pub log_profile: Option<String>,
}

/// Contents of `tracklog.toml`; relative paths are relative to the data dir
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    db: Option<PathBuf>,
    library: Option<PathBuf>,
    log_profile: Option<String>,
}

impl Config {
    /// Resolve from the process environment
    ///
    /// # Errors
    ///
    /// See [`Config::resolve`].
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ExError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: unreadable TOML, an unknown log profile, or no data
    ///   directory given and no home directory to derive one from
    /// - `Io`: the config file exists but cannot be read
    pub fn resolve<F>(overrides: &ConfigOverrides, env: F) -> Result<Self, ExError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match overrides
            .data_dir
            .clone()
            .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
        {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let file = read_file_config(&data_dir.join(CONFIG_FILE_NAME))?;

        let db_path = overrides
            .db_path
            .clone()
            .or_else(|| file.db.map(|p| data_dir.join(p)))
            .unwrap_or_else(|| data_dir.join(DEFAULT_DB_FILE));

        let library_path = overrides
            .library_path
            .clone()
            .or_else(|| env(ENV_LIBRARY).map(PathBuf::from))
            .or_else(|| file.library.map(|p| data_dir.join(p)))
            .unwrap_or_else(|| data_dir.join(DEFAULT_LIBRARY_FILE));

        let log_profile = match overrides.log_profile.as_deref().or(file.log_profile.as_deref()) {
            None => Profile::Development,
            Some(name) => Profile::parse(name).ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("load_config")
                    .with_field("log_profile")
                    .with_message(format!("Unknown log profile '{}'", name))
                    .with_candidates(vec!["development".to_string(), "production".to_string()])
            })?,
        };

        Ok(Self {
            data_dir,
            db_path,
            library_path,
            log_profile,
        })
    }

    /// Create the data directory if needed and open the store
    ///
    /// # Errors
    ///
    /// `Io` when the directory cannot be created; `Persistence` from the store
    pub fn open_store(&self) -> Result<SqliteStore, ExError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracklog_store::errors::io_error("create_data_dir", e)
                    .with_message(format!("Cannot create {}", parent.display()))
            })?;
        }
        SqliteStore::open(&self.db_path)
    }

    pub fn provider(&self) -> ExportFileProvider {
        ExportFileProvider::new(&self.library_path)
    }
}

/// Per-user data directory for the platform
///
/// # Errors
///
/// `InvalidConfig` when the home directory cannot be determined
pub fn default_data_dir() -> Result<PathBuf, ExError> {
    ProjectDirs::from("", "", APPLICATION_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_field("data_dir")
                .with_message(format!(
                    "Cannot locate a home directory; set {} or pass --data-dir",
                    ENV_DATA_DIR
                ))
        })
}

fn read_file_config(path: &Path) -> Result<FileConfig, ExError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(e) => return Err(tracklog_store::errors::io_error("load_config", e)),
    };

    toml::from_str(&content).map_err(|e| {
        ExError::new(ExErrorKind::InvalidConfig)
            .with_op("load_config")
            .with_message(format!("{}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let config = Config::resolve(&overrides, env_from(&[])).unwrap();
        assert_eq!(config.db_path, dir.path().join("tracklog.db"));
        assert_eq!(config.library_path, dir.path().join("library.json"));
        assert_eq!(config.log_profile, Profile::Development);
    }

    #[test]
    fn test_default_data_dir_is_per_user() {
        match default_data_dir() {
            Ok(dir) => {
                assert!(dir.is_absolute());
                assert!(dir.to_string_lossy().contains(APPLICATION_NAME));

                let config = Config::resolve(&ConfigOverrides::default(), env_from(&[])).unwrap();
                assert_eq!(config.data_dir, dir);
                assert_eq!(config.db_path, dir.join(DEFAULT_DB_FILE));
            }
            Err(err) => {
                assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
                assert_eq!(err.field(), Some("data_dir"));
            }
        }
    }

    #[test]
    fn test_file_then_env_then_cli() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "db = \"state.db\"\nlibrary = \"export.yaml\"\nlog_profile = \"production\"\n",
        )
        .unwrap();
        let data_dir = dir.path().to_str().unwrap();

        let from_file = Config::resolve(
            &ConfigOverrides::default(),
            env_from(&[(ENV_DATA_DIR, data_dir)]),
        )
        .unwrap();
        assert_eq!(from_file.db_path, dir.path().join("state.db"));
        assert_eq!(from_file.library_path, dir.path().join("export.yaml"));
        assert_eq!(from_file.log_profile, Profile::Production);

        let from_env = Config::resolve(
            &ConfigOverrides::default(),
            env_from(&[(ENV_DATA_DIR, data_dir), (ENV_LIBRARY, "/tmp/lib.json")]),
        )
        .unwrap();
        assert_eq!(from_env.library_path, PathBuf::from("/tmp/lib.json"));

        let from_cli = Config::resolve(
            &ConfigOverrides {
                library_path: Some(PathBuf::from("cli.json")),
                db_path: Some(PathBuf::from("cli.db")),
                ..Default::default()
            },
            env_from(&[(ENV_DATA_DIR, data_dir), (ENV_LIBRARY, "/tmp/lib.json")]),
        )
        .unwrap();
        assert_eq!(from_cli.library_path, PathBuf::from("cli.json"));
        assert_eq!(from_cli.db_path, PathBuf::from("cli.db"));
    }

    #[test]
    fn test_bad_toml_is_invalid_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "dbb = 1\n").unwrap();
        let overrides = ConfigOverrides {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let err = Config::resolve(&overrides, env_from(&[])).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let overrides = ConfigOverrides {
            data_dir: Some(PathBuf::from("/nonexistent-tracklog-dir")),
            log_profile: Some("loud".to_string()),
            ..Default::default()
        };
        let err = Config::resolve(&overrides, env_from(&[])).unwrap_err();
        assert_eq!(err.field(), Some("log_profile"));
    }

    #[test]
    fn test_open_store_creates_data_dir() {
        let dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            data_dir: Some(dir.path().join("nested")),
            ..Default::default()
        };
        let config = Config::resolve(&overrides, env_from(&[])).unwrap();

        config.open_store().unwrap();
        assert!(config.db_path.exists());
    }
}
