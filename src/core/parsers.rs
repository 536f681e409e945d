mod utils;

#[cfg(test)]
mod tests;

use log::debug;
use saphyr::YamlOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::parsers::utils::{
  field, first_document, read_document, required_string, sequence_field, string_field,
};
use crate::core::submit::JobDescription;

#[derive(Error, Debug)]
pub enum ParserError {
  #[error("IO Error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("YAML parsing failed: {0}")]
  YamlParseFailed(#[from] saphyr::ScanError),
  #[error("YAML file is empty!")]
  YamlEmpty,
  #[error("Missing Key: {0}")]
  MissingKey(String),
  #[error("Wrong type for '{0}', expected {1}")]
  WrongType(String, String),
  #[error("Key '{0}' is not allowed here")]
  UnexpectedKey(String),
}

/// Parse a jobs file. Relative log directories are taken relative to the file.
pub fn parse_jobs_from_file(path: &Path) -> Result<Vec<JobDescription>, ParserError> {
  debug!("Loading jobs from file: {:?}", path);
  let yaml = read_document(path)?;
  let base_dir = path.parent().unwrap_or(Path::new("."));
  parse_jobs(&yaml, base_dir)
}

pub fn parse_jobs_from_str(text: &str, base_dir: &Path) -> Result<Vec<JobDescription>, ParserError> {
  let yaml = first_document(text)?;
  parse_jobs(&yaml, base_dir)
}

/// Build job descriptions from the `defaults` mapping and the `jobs` sequence.
pub fn parse_jobs(yaml: &YamlOwned, base_dir: &Path) -> Result<Vec<JobDescription>, ParserError> {
  let mut defaults = JobDescription::default();
  if let Some(node) = field(yaml, "defaults") {
    if field(node, "command").is_some() {
      return Err(ParserError::UnexpectedKey("defaults.command".to_string()));
    }
    apply_fields(&mut defaults, node, base_dir)?;
  }

  let mut jobs = Vec::new();
  for node in sequence_field(yaml, "jobs")? {
    let mut job = defaults.clone();
    job.job_command = required_string(node, "command")?;
    apply_fields(&mut job, node, base_dir)?;
    jobs.push(job);
  }
  debug!("Parsed {} jobs", jobs.len());
  Ok(jobs)
}

fn apply_fields(job: &mut JobDescription, node: &YamlOwned, base_dir: &Path) -> Result<(), ParserError> {
  if let Some(name) = string_field(node, "name")? {
    job.job_name = name;
  }
  if let Some(time) = string_field(node, "time")? {
    job.time = time;
  }
  if let Some(memory) = field(node, "memory") {
    job.memory = parse_memory(memory)?;
  }
  if let Some(email) = string_field(node, "email")? {
    job.email = Some(email);
  }
  if let Some(email_options) = string_field(node, "email_options")? {
    job.email_options = Some(email_options);
  }
  if let Some(log_directory) = string_field(node, "log_directory")? {
    let path = PathBuf::from(log_directory);
    job.log_directory = Some(if path.is_absolute() {
      path
    } else {
      base_dir.join(path)
    });
  }
  if let Some(shell_script) = string_field(node, "shell_script")? {
    job.shell_script = shell_script;
  }
  Ok(())
}

/// Megabytes, as an integer or a string of digits.
fn parse_memory(node: &YamlOwned) -> Result<u64, ParserError> {
  let memory = match node.as_integer() {
    Some(i) => u64::try_from(i).ok(),
    None => node.as_str().and_then(|s| s.trim().parse::<u64>().ok()),
  };
  memory.ok_or_else(|| {
    ParserError::WrongType("memory".to_string(), "non-negative integer".to_string())
  })
}
