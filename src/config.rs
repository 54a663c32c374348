//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bookcat/bookcat.toml`
//! 3. Local config: `<dir>/.bookcat.toml` (usually the working directory)
//! 4. Environment variables: `BOOKCAT_*` prefix
//! 5. Command line (`--file`), applied by the CLI layer

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::MalformedLinePolicy;
use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".bookcat.toml";

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub on_malformed: Option<MalformedLinePolicy>,
    pub featured: Option<Vec<String>>,
}

/// Unified configuration for bookcat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Data file with one `name,isbn,year-month-day` record per line
    pub data_file: PathBuf,
    /// How to treat lines that cannot be parsed
    pub on_malformed: MalformedLinePolicy,
    /// Names looked up by `bookcat show`
    pub featured: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.txt"),
            on_malformed: MalformedLinePolicy::Skip,
            featured: vec!["Animal Farm".into(), "War and Peace".into()],
        }
    }
}

/// Get the XDG config directory for bookcat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bookcat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bookcat.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            on_malformed: overlay.on_malformed.unwrap_or(self.on_malformed),
            featured: overlay
                .featured
                .clone()
                .unwrap_or_else(|| self.featured.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.bookcat.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = current.apply_env_overrides(Self::env_source())?;

        current.expand_paths();

        Ok(current)
    }

    fn env_source() -> Environment {
        Environment::with_prefix("BOOKCAT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("featured")
    }

    /// Apply BOOKCAT_* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge) - they are explicit user overrides.
    fn apply_env_overrides(mut self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_string("data_file"))? {
            self.data_file = PathBuf::from(val);
        }
        if let Some(val) = optional(config.get_string("on_malformed"))? {
            self.on_malformed = parse_policy(&val)?;
        }
        // A single name that parses as a number or bool arrives as a scalar.
        let featured = match config.get::<Vec<String>>("featured") {
            Err(ConfigError::NotFound(_)) => None,
            Ok(names) => Some(names),
            Err(_) => Some(vec![config.get_string("featured").map_err(config_err)?]),
        };
        if let Some(names) = featured {
            self.featured = names
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    /// Replace the data file, as done for `--file` on the command line.
    pub fn with_data_file(mut self, path: PathBuf) -> Self {
        self.data_file = path;
        self.expand_paths();
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bookcat configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bookcat/bookcat.toml
#   Local:  ./.bookcat.toml
#   Env:    BOOKCAT_* environment variables (BOOKCAT_FEATURED is comma-separated)
#   CLI:    --file <PATH>

# Data file, one `name,isbn,year-month-day` record per line
# data_file = "data.txt"

# Malformed lines: "skip" (report and continue) or "abort" (fail the load)
# on_malformed = "skip"

# Books looked up by `bookcat show`
# featured = ["Animal Farm", "War and Peace"]
"#
        .to_string()
    }
}

fn parse_policy(value: &str) -> Result<MalformedLinePolicy, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "skip" => Ok(MalformedLinePolicy::Skip),
        "abort" => Ok(MalformedLinePolicy::Abort),
        other => Err(ApplicationError::Config {
            message: format!("on_malformed: expected 'skip' or 'abort', got '{other}'"),
        }),
    }
}

/// An absent key keeps the current value; any other failure is a config error.
fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
