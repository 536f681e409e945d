use crate::core::{
  backends::{Backend, SchedulerError},
  queue::QueueParser,
};

/// Parses `squeue --noheader -o %j`: one job name per line, spaces allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlurmLineParser;

impl QueueParser for SlurmLineParser {
  fn parse(&self, raw: &[u8]) -> Result<Vec<String>, SchedulerError> {
    let text = std::str::from_utf8(raw).map_err(|e| SchedulerError::OutputParseError {
      backend: Backend::Slurm,
      message: e.to_string(),
    })?;
    Ok(
      text
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect(),
    )
  }
}
