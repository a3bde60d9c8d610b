//! Configuration lookup.
//!
//! Components read their settings through the [`ConfigSource`] trait, a
//! section/option lookup with an optional fallback. [`IniConfig`] is the
//! INI-file implementation used by the application:
//!
//! ```ini
//! [shortcuts]
//! start = <control>s
//! stop = <control>p
//! reset = <control>r
//! ```
//!
//! ```
//! use tempo::config::{ConfigSource, IniConfig};
//!
//! let config = IniConfig::from_str("[shortcuts]\nstart = <control>b\n").unwrap();
//! assert_eq!(config.get("shortcuts", "start", None).unwrap(), "<control>b");
//! assert_eq!(config.get("shortcuts", "stop", Some("<control>p")).unwrap(), "<control>p");
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use parking_lot::RwLock;
use tempo_core::Signal;
use tempo_core::logging::targets;

/// Errors raised by configuration lookups and persistence.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The section does not exist and no fallback was given.
    #[error("configuration section '{section}' not found")]
    MissingSection { section: String },

    /// The option does not exist and no fallback was given.
    #[error("configuration option '{section}.{option}' not found")]
    MissingOption { section: String, option: String },

    /// The configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// Reading or writing the configuration file failed.
    #[error("failed to access configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Key-value configuration lookup.
pub trait ConfigSource: Send + Sync {
    /// Look up `option` in `section`.
    ///
    /// Returns `fallback` when the section or option is absent. Fails only
    /// when the value is absent and no fallback was given.
    fn get(&self, section: &str, option: &str, fallback: Option<&str>) -> ConfigResult<String>;
}

/// A configuration change: `(section, option, new value)`.
pub type ConfigChange = (String, String, String);

/// INI-backed configuration.
pub struct IniConfig {
    ini: RwLock<Ini>,
    changed: Signal<ConfigChange>,
}

impl IniConfig {
    /// File name used inside the platform configuration directory.
    pub const FILE_NAME: &'static str = "tempo.conf";

    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::from_ini(Ini::new())
    }

    fn from_ini(ini: Ini) -> Self {
        Self {
            ini: RwLock::new(ini),
            changed: Signal::new(),
        }
    }

    /// Parse configuration from INI text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        let ini = Ini::load_from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self::from_ini(ini))
    }

    /// Load configuration from a file.
    ///
    /// A missing file yields an empty configuration.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    target: targets::CONFIG,
                    path = %path.display(),
                    "no configuration file, using defaults"
                );
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded configuration");
        Self::from_str(&text)
    }

    /// Write the configuration to a file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        self.ini.read().write_to_file(path).map_err(io_error)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Default configuration file location for this platform.
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tempo")
            .map(|dirs| dirs.config_dir().join(Self::FILE_NAME))
    }

    /// Set an option and announce the change on [`changed`](Self::changed).
    pub fn set(&self, section: &str, option: &str, value: &str) {
        self.ini
            .write()
            .with_section(Some(section))
            .set(option, value);
        tracing::debug!(target: targets::CONFIG, section, option, value, "configuration changed");
        self.changed
            .emit((section.to_string(), option.to_string(), value.to_string()));
    }

    /// Remove an option, returning its previous value.
    pub fn remove(&self, section: &str, option: &str) -> Option<String> {
        self.ini.write().delete_from(Some(section), option)
    }

    /// Whether a section exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.ini.read().section(Some(section)).is_some()
    }

    /// Signal emitted after every [`set`](Self::set).
    pub fn changed(&self) -> &Signal<ConfigChange> {
        &self.changed
    }
}

impl Default for IniConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for IniConfig {
    fn get(&self, section: &str, option: &str, fallback: Option<&str>) -> ConfigResult<String> {
        let ini = self.ini.read();
        let value = ini
            .section(Some(section))
            .map(|props| props.get(option).map(str::to_string));

        match (value, fallback) {
            (Some(Some(value)), _) => Ok(value),
            (_, Some(fallback)) => Ok(fallback.to_string()),
            (None, None) => Err(ConfigError::MissingSection {
                section: section.to_string(),
            }),
            (Some(None), None) => Err(ConfigError::MissingOption {
                section: section.to_string(),
                option: option.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for IniConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ini = self.ini.read();
        let sections: Vec<&str> = ini.sections().flatten().collect();
        f.debug_struct("IniConfig")
            .field("sections", &sections)
            .finish()
    }
}
