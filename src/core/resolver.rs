use std::str::FromStr;

use log::debug;

use crate::core::{
  backends::{Backend, SchedulerError},
  environment::{Environment, Locate},
};


pub const AUTO: &str = "auto";

/// A backend as requested by a caller, before detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendRequest {
  Auto,
  Explicit(Backend),
}

impl FromStr for BackendRequest {
  type Err = SchedulerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == AUTO {
      return Ok(BackendRequest::Auto);
    }
    Backend::from_str(s)
      .map(BackendRequest::Explicit)
      .map_err(|_| SchedulerError::ConfigurationError(s.to_string()))
  }
}

/// Resolve `requested` ("auto" or a backend name) to a concrete backend.
///
/// Explicit names are returned without probing. For "auto", the override
/// variable of `env` wins when it names a backend (an empty value counts as
/// unset); otherwise each backend's administrative command is looked up in
/// [`Backend::PROBE_ORDER`].
pub fn resolve(
  requested: &str,
  env: &Environment,
  locator: &dyn Locate,
) -> Result<Backend, SchedulerError> {
  match requested.parse::<BackendRequest>()? {
    BackendRequest::Explicit(backend) => Ok(backend),
    BackendRequest::Auto => {
      if let Some(value) = env.backend_override.as_deref().filter(|v| !v.is_empty()) {
        if let BackendRequest::Explicit(backend) = value.parse::<BackendRequest>()? {
          debug!("Backend {} selected through environment override", backend);
          return Ok(backend);
        }
      }
      probe(locator)
    }
  }
}

fn probe(locator: &dyn Locate) -> Result<Backend, SchedulerError> {
  for backend in Backend::PROBE_ORDER {
    let admin = backend.spec().admin_command;
    if let Some(path) = locator.locate(admin) {
      debug!("Detected {} backend through {}", backend, path.display());
      return Ok(backend);
    }
  }
  Err(SchedulerError::BackendUnavailable(
    Backend::PROBE_ORDER.to_vec(),
  ))
}
