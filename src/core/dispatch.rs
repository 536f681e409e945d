use std::process::{Command, Stdio};

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;


static SUBMISSION_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
  [
    // Sge: "Your job 42 ("job") has been submitted"
    Regex::new(r"^Your job (\S+)").unwrap(),
    // Slurm: "Submitted batch job 42"
    Regex::new(r"^Submitted batch job (\S+)").unwrap(),
  ]
});

#[derive(Error, Debug)]
pub enum DispatchError {
  #[error("Could not spawn submission shell: {0}")]
  SpawnError(#[from] std::io::Error),
  #[error("Submission failed ({status}): {stderr}")]
  SubmissionFailed { status: String, stderr: String },
  #[error("Failed to parse job id from command output:\n{output}\ncmd:\n{command}")]
  UnrecognizedOutput { command: String, output: String },
}

/// Run a submission command through `sh -c` and return the scheduler job id.
pub fn dispatch(command: &str) -> Result<String, DispatchError> {
  debug!("Dispatching: {}", command);
  let output = Command::new("sh")
    .arg("-c")
    .arg(command)
    .stdin(Stdio::null())
    .output()?;

  if !output.status.success() {
    return Err(DispatchError::SubmissionFailed {
      status: output.status.to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    });
  }

  let stdout = String::from_utf8_lossy(&output.stdout);
  let job_id = parse_job_id(&stdout).ok_or_else(|| DispatchError::UnrecognizedOutput {
    command: command.to_string(),
    output: stdout.to_string(),
  })?;
  info!("Submitted job {}", job_id);
  Ok(job_id)
}

/// Extract the job id from the launcher's confirmation message.
pub fn parse_job_id(output: &str) -> Option<String> {
  let output = output.trim_start();
  SUBMISSION_PATTERNS
    .iter()
    .find_map(|pattern| pattern.captures(output))
    .map(|captures| captures[1].to_string())
}
