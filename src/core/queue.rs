mod sge;
mod slurm;


use std::{
  io,
  path::Path,
  process::{Command, Stdio},
};

use log::{debug, warn};

use crate::core::{
  backends::{Backend, SchedulerError},
  environment::Locate,
};

pub use sge::SgeXmlParser;
pub use slurm::SlurmLineParser;

/// Decodes the raw output of a backend status command into job names.
pub trait QueueParser {
  fn parse(&self, raw: &[u8]) -> Result<Vec<String>, SchedulerError>;
}

pub fn get_parser(backend: Backend) -> &'static dyn QueueParser {
  match backend {
    Backend::Sge => &SgeXmlParser,
    Backend::Slurm => &SlurmLineParser,
  }
}

/// Exit status and standard output of a finished status command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
  pub success: bool,
  pub stdout: Vec<u8>,
}

pub trait StatusRunner {
  fn capture(&self, program: &Path, args: &[String]) -> io::Result<CapturedOutput>;
}

/// Runs status commands as child processes, discarding their stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl StatusRunner for SystemRunner {
  fn capture(&self, program: &Path, args: &[String]) -> io::Result<CapturedOutput> {
    let output = Command::new(program)
      .args(args)
      .stdin(Stdio::null())
      .stderr(Stdio::null())
      .output()?;
    Ok(CapturedOutput {
      success: output.status.success(),
      stdout: output.stdout,
    })
  }
}

pub fn status_args(backend: Backend, user: Option<&str>) -> Vec<String> {
  let spec = backend.spec();
  let mut args: Vec<String> = spec.status_args.iter().map(|a| a.to_string()).collect();
  if let Some(user) = user {
    args.push(spec.user_flag.to_string());
    args.push(user.to_string());
  }
  args
}

/// Queued or running job names reported by a single backend.
///
/// `Ok(vec![])` when the status command is not installed; an error when it
/// fails to run, exits non-zero, or prints something its parser rejects.
pub fn query_backend(
  backend: Backend,
  user: Option<&str>,
  locator: &dyn Locate,
  runner: &dyn StatusRunner,
) -> Result<Vec<String>, SchedulerError> {
  let command = backend.spec().status_command;
  let Some(program) = locator.locate(command) else {
    debug!("{} not found, {} contributes no jobs", command, backend);
    return Ok(Vec::new());
  };

  let args = status_args(backend, user);
  let output = runner
    .capture(&program, &args)
    .map_err(|e| SchedulerError::StatusCommandFailed {
      backend,
      message: format!("could not run {}: {}", program.display(), e),
    })?;
  if !output.success {
    return Err(SchedulerError::StatusCommandFailed {
      backend,
      message: format!("{} {} exited with an error", command, args.join(" ")),
    });
  }
  get_parser(backend).parse(&output.stdout)
}

/// Names of queued or running jobs across every backend, Sge first.
///
/// Never fails: a backend whose status tool is missing, errors out, or
/// prints unparsable output contributes nothing. Heterogeneous clusters
/// routinely expose partial scheduler installations.
pub fn queued_or_running_jobs(
  user: Option<&str>,
  locator: &dyn Locate,
  runner: &dyn StatusRunner,
) -> Vec<String> {
  let mut jobs = Vec::new();
  for backend in Backend::STATUS_ORDER {
    match query_backend(backend, user, locator, runner) {
      Ok(names) => jobs.extend(names),
      Err(e) => warn!("Ignoring {} queue: {}", backend, e),
    }
  }
  jobs
}
