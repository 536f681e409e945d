use std::path::{Component, Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{
  backends::{Backend, SchedulerError, template_for},
  environment::{Environment, Locate},
  resolver::resolve,
};


/// Backend-neutral description of a job to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
  pub job_name: String,
  /// Wall-time limit, `HH:MM:SS`.
  pub time: String,
  /// Memory limit in megabytes.
  pub memory: u64,
  pub email: Option<String>,
  /// Notification triggers in the vocabulary of the target backend.
  pub email_options: Option<String>,
  pub log_directory: Option<PathBuf>,
  pub shell_script: String,
  pub job_command: String,
}

impl Default for JobDescription {
  fn default() -> Self {
    JobDescription {
      job_name: "job".to_string(),
      time: "24:00:00".to_string(),
      memory: 4000,
      email: None,
      email_options: None,
      log_directory: None,
      shell_script: "#!/bin/bash".to_string(),
      job_command: String::new(),
    }
  }
}

impl JobDescription {
  pub fn new(job_command: impl Into<String>) -> Self {
    JobDescription {
      job_command: job_command.into(),
      ..Default::default()
    }
  }
}

/// Build the submission command for `job`, resolving `requested` first.
pub fn build(
  job: &JobDescription,
  requested: &str,
  env: &Environment,
  locator: &dyn Locate,
) -> Result<String, SchedulerError> {
  let backend = resolve(requested, env, locator)?;
  Ok(build_submit_command(job, backend))
}

/// Render `job` as `echo '<script>' | <launcher> <options>` for `backend`.
pub fn build_submit_command(job: &JobDescription, backend: Backend) -> String {
  let templates = template_for(backend);
  let memory = job.memory.to_string();

  let mut options = vec![
    templates.job_name.fill(&[job.job_name.as_str()]),
    templates.time.fill(&[job.time.as_str()]),
    templates.memory.fill(&[memory.as_str()]),
  ];
  if let Some(email) = &job.email {
    options.push(templates.email.fill(&[email.as_str()]));
  }
  if let Some(email_options) = &job.email_options {
    options.push(templates.email_options.fill(&[email_options.as_str()]));
  }
  if let Some(log_directory) = &job.log_directory {
    let directory = absolute_directory(log_directory);
    let directory = directory.to_string_lossy();
    let option = match backend {
      Backend::Sge => templates.log_directory.fill(&[&*directory]),
      Backend::Slurm => templates
        .log_directory
        .fill(&[&*directory, job.job_name.as_str()]),
    };
    options.push(option);
  }

  format!(
    "echo '{}\n{}' | {} {}",
    escape_single_quotes(&job.shell_script),
    escape_single_quotes(&job.job_command),
    backend.spec().launcher,
    options.join(" ")
  )
}

/// Close the quote, emit an escaped quote, reopen.
pub fn escape_single_quotes(s: &str) -> String {
  s.replace('\'', "'\\''")
}

/// Lexically absolute form of `path`: joined to the working directory,
/// with `.`, `..` and trailing separators removed. Never touches the path itself.
pub fn absolute_directory(path: &Path) -> PathBuf {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    match std::env::current_dir() {
      Ok(cwd) => cwd.join(path),
      Err(e) => {
        warn!("Could not read working directory, keeping {:?}: {}", path, e);
        path.to_path_buf()
      }
    }
  };

  let mut normalized = PathBuf::new();
  for component in joined.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}
