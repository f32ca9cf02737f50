//! Where the CLI finds its configuration and how command-line flags refine it.
//!
//! A run takes its settings from the first source that exists:
//!
//! 1. the file named by `--config`, which must exist;
//! 2. `tableau/config.toml` under the working directory;
//! 3. `config.toml` in the user's platform config directory;
//! 4. the built-in defaults.
//!
//! Files are validated as soon as they are read, so a bad value is reported
//! against the file it came from rather than surfacing later as a scene
//! error. `--seed` and `--fps` are applied on top and checked again.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tableau::{TableauError, config::AppConfig};

use crate::Args;

const LOCAL_CONFIG: &str = "tableau/config.toml";

/// Problems with a configuration file, each naming the file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("cannot read configuration file {}: {source}", .path.display())]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("cannot parse configuration file {}: {source}", .path.display())]
    Syntax { path: PathBuf, source: toml::de::Error },

    #[error("invalid value in configuration file {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl From<ConfigError> for TableauError {
    fn from(err: ConfigError) -> Self {
        TableauError::Configuration(err.to_string())
    }
}

/// The place a run's configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named with `--config`.
    Explicit(PathBuf),
    /// `tableau/config.toml` under the working directory.
    Local(PathBuf),
    /// The platform config directory.
    User(PathBuf),
    Defaults,
}

impl ConfigSource {
    /// Picks the first source that applies. An explicit path is taken as
    /// given; whether it exists is only checked by [`ConfigSource::load`].
    pub fn discover(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }

        let local = Path::new(LOCAL_CONFIG);
        if local.is_file() {
            return Self::Local(local.to_path_buf());
        }

        match ProjectDirs::from("com", "tableau", "tableau") {
            Some(dirs) => {
                let user = dirs.config_dir().join("config.toml");
                if user.is_file() {
                    return Self::User(user);
                }
                debug!(path = user.display().to_string(); "No user configuration file");
            }
            None => debug!("No platform config directory"),
        }
        Self::Defaults
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Local(path) | Self::User(path) => Some(path),
            Self::Defaults => None,
        }
    }

    /// Reads and validates the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, unreadable, not
    /// valid TOML, or holds a value [`AppConfig::validate`] rejects.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let Some(path) = self.path() else {
            debug!("Using default configuration");
            return Ok(AppConfig::default());
        };
        info!(source:% = self; "Loading configuration");

        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::Missing(path.to_path_buf()),
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|err| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: reason(err),
        })?;
        Ok(config)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{} (--config)", path.display()),
            Self::Local(path) => write!(f, "{} (working directory)", path.display()),
            Self::User(path) => write!(f, "{} (user config directory)", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Strips the generic prefix so the message reads naturally after the path.
fn reason(err: TableauError) -> String {
    match err {
        TableauError::Configuration(reason) => reason,
        other => other.to_string(),
    }
}

/// Configuration from the discovered source with `--seed` and `--fps`
/// applied.
///
/// # Errors
///
/// Returns `TableauError::Configuration` when the source cannot be loaded
/// or an override produces an invalid configuration.
pub fn resolve_config(args: &Args) -> Result<AppConfig, TableauError> {
    let source = ConfigSource::discover(args.config.as_deref().map(Path::new));
    let mut config = source.load()?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(fps) = args.fps {
        config = config.with_fps(fps);
    }
    config.validate().map_err(|err| {
        TableauError::Configuration(format!(
            "command-line overrides on {source}: {}",
            reason(err)
        ))
    })?;
    Ok(config)
}
