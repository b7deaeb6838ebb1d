//! Configuration loading and resolution
//!
//! Resolution priority, highest first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! The command line and environment are handled together by the binary
//! (clap `env` fallbacks) and folded in with [`ServiceConfig::apply_overrides`].

use crate::api::keys::{ApiKeys, DEFAULT_API_KEYS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Service configuration, as read from `config.toml`
///
/// Every field has a default, so a partial (or absent) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Folder holding the `music`, `description` and `cover` folders
    pub assets_root: PathBuf,
    pub music_dir: String,
    pub description_dir: String,
    pub cover_dir: String,
    /// SQLite database file holding the alarms table
    pub database_path: PathBuf,
    /// Accepted API keys
    pub api_keys: Vec<String>,
    /// Restrict every alarm to the key that created it
    pub alarm_scoping: bool,
    /// Require an API key for `GET /sounds`
    pub catalog_requires_key: bool,
    /// Drop and recreate the alarms table at startup
    pub reset_database_on_start: bool,
    /// OpenAPI document (JSON) served at `/doc`; embedded copy when unset
    pub openapi_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            assets_root: PathBuf::from("./assets"),
            music_dir: "music".to_string(),
            description_dir: "description".to_string(),
            cover_dir: "cover".to_string(),
            database_path: PathBuf::from("alarms.db"),
            api_keys: DEFAULT_API_KEYS.iter().map(|k| k.to_string()).collect(),
            alarm_scoping: true,
            catalog_requires_key: true,
            reset_database_on_start: false,
            openapi_path: None,
        }
    }
}

/// Values supplied on the command line or through the environment
///
/// `None` means "not supplied": the file/default value stands.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub assets_root: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub api_keys: Option<Vec<String>>,
    pub alarm_scoping: Option<bool>,
    pub reset_database_on_start: Option<bool>,
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// the platform config locations are searched; finding nothing is not
    /// an error and yields the compiled defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_file() {
                Some(p) => p,
                None => {
                    info!("No config file found, using compiled defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        if config.api_keys.iter().all(|k| k.is_empty()) {
            warn!("Configuration lists no usable API keys; every protected request will be rejected");
        }
        Ok(config)
    }

    /// Fold command-line/environment values over the file values
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(root) = overrides.assets_root {
            self.assets_root = root;
        }
        if let Some(db) = overrides.database_path {
            self.database_path = db;
        }
        if let Some(keys) = overrides.api_keys {
            self.api_keys = keys;
        }
        if let Some(scoping) = overrides.alarm_scoping {
            self.alarm_scoping = scoping;
        }
        if let Some(reset) = overrides.reset_database_on_start {
            self.reset_database_on_start = reset;
        }
    }

    /// Allow-list built from the configured keys
    pub fn api_keys(&self) -> ApiKeys {
        ApiKeys::new(self.api_keys.iter().cloned())
    }

    /// Directory layout scanned by the catalog builder
    pub fn catalog_layout(&self) -> CatalogLayout {
        CatalogLayout {
            music_dir: self.assets_root.join(&self.music_dir),
            description_dir: self.assets_root.join(&self.description_dir),
            cover_dir: self.assets_root.join(&self.cover_dir),
            ..CatalogLayout::default()
        }
    }
}

/// Where catalog files live and how they are named
///
/// A sound is the triple `<music_dir>/<stem>.<audio_extension>`,
/// `<description_dir>/<stem>.<description_extension>` and
/// `<cover_dir>/<stem>.<cover_extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    pub music_dir: PathBuf,
    pub description_dir: PathBuf,
    pub cover_dir: PathBuf,
    pub audio_extension: String,
    pub description_extension: String,
    pub cover_extension: String,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self::under(Path::new("./assets"))
    }
}

impl CatalogLayout {
    /// Standard `music`/`description`/`cover` layout below `root`
    pub fn under(root: &Path) -> Self {
        Self {
            music_dir: root.join("music"),
            description_dir: root.join("description"),
            cover_dir: root.join("cover"),
            audio_extension: "mp3".to_string(),
            description_extension: "txt".to_string(),
            cover_extension: "jpg".to_string(),
        }
    }

    /// Audio file by full file name, as requested from `/audio`
    pub fn audio_path(&self, file_name: &str) -> PathBuf {
        self.music_dir.join(file_name)
    }

    /// Cover file by full file name, as requested from `/cover`
    pub fn cover_file_path(&self, file_name: &str) -> PathBuf {
        self.cover_dir.join(file_name)
    }

    pub fn description_path(&self, stem: &str) -> PathBuf {
        self.description_dir
            .join(format!("{}.{}", stem, self.description_extension))
    }

    pub fn cover_path(&self, stem: &str) -> PathBuf {
        self.cover_file_path(&self.cover_file_name(stem))
    }

    /// Cover file name paired with an audio file name
    pub fn cover_file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.cover_extension)
    }
}

/// Default config file for the platform, if one exists
///
/// `SKM_CONFIG` wins, then `<config dir>/skm/config.toml`, then
/// `/etc/skm/config.toml` on Linux.
fn default_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SKM_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("skm").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/skm/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
