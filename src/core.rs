pub mod backends;
pub mod config;
pub mod dispatch;
pub mod environment;
pub mod launcher;
pub mod parsers;
pub mod queue;
pub mod resolver;
pub mod storage;
pub mod submit;

#[cfg(test)]
pub(crate) mod tests;

use std::{collections::HashSet, path::Path};

use log::info;

use crate::core::{
  backends::{Backend, SchedulerError},
  environment::Environment,
  queue::SystemRunner,
  submit::JobDescription,
};

/// Entry point bundling backend resolution, submission and queue status.
///
/// Every call looks at the environment afresh, so the answer follows a
/// changing `PATH` or `CLUSTERLIB_BACKEND` between calls.
pub struct Clusterlib {
  environment: Option<Environment>,
}

#[derive(thiserror::Error, Debug)]
pub enum ClusterlibError {
  #[error("Scheduler Error: {0}")]
  SchedulerError(#[from] SchedulerError),
  #[error("Dispatch Error: {0}")]
  DispatchError(#[from] dispatch::DispatchError),
  #[error("Storage Error: {0}")]
  StorageError(#[from] storage::StorageError),
  #[error("Config Error: {0}")]
  ConfigError(#[from] config::ConfigError),
  #[error("Parser Error: {0}")]
  ParserError(#[from] parsers::ParserError),
}

impl Clusterlib {
  pub fn new() -> Self {
    let _ = env_logger::try_init();
    Clusterlib { environment: None }
  }

  /// Use a fixed environment instead of the live process one.
  pub fn with_environment(environment: Environment) -> Self {
    let _ = env_logger::try_init();
    Clusterlib {
      environment: Some(environment),
    }
  }

  fn environment(&self) -> Environment {
    match &self.environment {
      Some(environment) => environment.clone(),
      None => Environment::from_process(),
    }
  }

  pub fn resolve_backend(&self, requested: &str) -> Result<Backend, ClusterlibError> {
    let env = self.environment();
    Ok(resolver::resolve(requested, &env, &env.locator())?)
  }

  pub fn submit(&self, job: &JobDescription, requested: &str) -> Result<String, ClusterlibError> {
    let env = self.environment();
    Ok(submit::build(job, requested, &env, &env.locator())?)
  }

  /// Build and run the submission command, returning the scheduler job id.
  pub fn dispatch(&self, job: &JobDescription, requested: &str) -> Result<String, ClusterlibError> {
    let command = self.submit(job, requested)?;
    Ok(dispatch::dispatch(&command)?)
  }

  pub fn queued_or_running_jobs(&self, user: Option<&str>) -> Vec<String> {
    let env = self.environment();
    queue::queued_or_running_jobs(user, &env.locator(), &SystemRunner)
  }

  /// Jobs of `jobs_file` that are neither queued nor recorded as done in `database`.
  pub fn plan_launch(
    &self,
    jobs_file: &Path,
    database: &Path,
    user: Option<&str>,
  ) -> Result<Vec<JobDescription>, ClusterlibError> {
    let jobs = parsers::parse_jobs_from_file(jobs_file)?;
    let queued: HashSet<String> = self.queued_or_running_jobs(user).into_iter().collect();
    let done = storage::load(database, None)?;
    let planned: Vec<JobDescription> = launcher::plan_submissions(&jobs, &queued, &done)
      .into_iter()
      .cloned()
      .collect();
    info!(
      "{} of {} jobs need a submission",
      planned.len(),
      jobs.len()
    );
    Ok(planned)
  }
}

impl Default for Clusterlib {
  fn default() -> Self {
    Self::new()
  }
}
