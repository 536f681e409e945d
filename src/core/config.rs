use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{backends::SchedulerError, resolver::{AUTO, BackendRequest}};


const APP_NAME: &str = "clusterlib";
const CONFIG_NAME: &str = "config";
/// Default key/value store, in the user's home directory.
pub const DEFAULT_DATABASE_FILE: &str = "job.sqlite3";

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("IO Error: {0}")]
  ConfyError(#[from] confy::ConfyError),
  #[error("Invalid default backend: {0}")]
  InvalidBackend(#[from] SchedulerError),
  #[error("Could not determine the home directory")]
  HomeDirNotFound,
}

#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
pub struct ClusterlibConfig {
  /// Backend request used when none is given on the command line.
  pub backend: Option<String>,
  pub database: Option<PathBuf>,
}

impl ClusterlibConfig {
  /// The explicit request if any, then the configured default, then "auto".
  pub fn backend_request(&self, requested: Option<&str>) -> String {
    requested
      .or(self.backend.as_deref())
      .unwrap_or(AUTO)
      .to_string()
  }

  pub fn database_path(&self, requested: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = requested.or(self.database.as_deref()) {
      return Ok(path.to_path_buf());
    }
    dirs::home_dir()
      .map(|home| home.join(DEFAULT_DATABASE_FILE))
      .ok_or(ConfigError::HomeDirNotFound)
  }

  pub fn set_backend(&mut self, backend: &str) -> Result<(), ConfigError> {
    backend.parse::<BackendRequest>()?;
    self.backend = Some(backend.to_string());
    Ok(())
  }
}

pub fn get_config_global() -> Result<ClusterlibConfig, ConfigError> {
  let config: ClusterlibConfig = confy::load(APP_NAME, CONFIG_NAME)?;
  Ok(config)
}

pub fn set_config_global(config: &ClusterlibConfig) -> Result<(), ConfigError> {
  confy::store(APP_NAME, CONFIG_NAME, config)?;
  Ok(())
}

pub fn get_config_global_path() -> Result<PathBuf, ConfigError> {
  Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
}

pub fn get_config_from(path: &Path) -> Result<ClusterlibConfig, ConfigError> {
  let config: ClusterlibConfig = confy::load_path(path)?;
  Ok(config)
}

pub fn set_config_to(path: &Path, config: &ClusterlibConfig) -> Result<(), ConfigError> {
  confy::store_path(path, config)?;
  Ok(())
}
