use std::{
  env,
  ffi::{OsStr, OsString},
  path::{MAIN_SEPARATOR, Path, PathBuf},
};

use log::debug;


/// Environment variable that overrides backend auto-detection.
pub const BACKEND_ENV_VAR: &str = "CLUSTERLIB_BACKEND";

/// Snapshot of the process state the scheduler core depends on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
  pub search_path: Option<OsString>,
  pub backend_override: Option<String>,
}

impl Environment {
  pub fn from_process() -> Self {
    Environment {
      search_path: env::var_os("PATH"),
      backend_override: env::var(BACKEND_ENV_VAR).ok(),
    }
  }

  pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
    self.search_path = Some(search_path.into());
    self
  }

  pub fn with_backend_override(mut self, backend: impl Into<String>) -> Self {
    self.backend_override = Some(backend.into());
    self
  }

  pub fn locator(&self) -> SearchPathLocator {
    SearchPathLocator {
      search_path: self.search_path.clone(),
    }
  }
}

pub trait Locate {
  fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Finds executables the way a shell would, on the given search path.
#[derive(Debug, Clone, Default)]
pub struct SearchPathLocator {
  search_path: Option<OsString>,
}

impl Locate for SearchPathLocator {
  fn locate(&self, program: &str) -> Option<PathBuf> {
    locate(program, self.search_path.as_deref())
  }
}

pub fn locate(program: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
  if program.contains(MAIN_SEPARATOR) || program.contains('/') {
    let path = PathBuf::from(program);
    return is_executable(&path).then_some(path);
  }

  let found = search_dirs(search_path?).find_map(|dir| {
    let candidate = dir.join(program);
    is_executable(&candidate).then_some(candidate)
  });
  debug!("Locating '{}': {:?}", program, found);
  found
}

/// Directories of a search path, unquoted. Empty entries name no directory.
pub(crate) fn search_dirs(search_path: &OsStr) -> impl Iterator<Item = PathBuf> + '_ {
  env::split_paths(search_path)
    .map(|dir| strip_quotes(&dir))
    .filter(|dir| !dir.as_os_str().is_empty())
}

fn strip_quotes(dir: &Path) -> PathBuf {
  match dir.to_str() {
    Some(s) => PathBuf::from(s.trim_matches('"')),
    None => dir.to_path_buf(),
  }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;
  match std::fs::metadata(path) {
    Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
    Err(_) => false,
  }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
  path.is_file()
}
