use roxmltree::Document;

use crate::core::{
  backends::{Backend, SchedulerError},
  queue::QueueParser,
};

/// Element holding the job name in `qstat -xml` output.
const JOB_NAME_TAG: &str = "JB_name";

#[derive(Debug, Default, Clone, Copy)]
pub struct SgeXmlParser;

impl QueueParser for SgeXmlParser {
  fn parse(&self, raw: &[u8]) -> Result<Vec<String>, SchedulerError> {
    let text = std::str::from_utf8(raw).map_err(|e| parse_error(e.to_string()))?;
    if text.trim().is_empty() {
      return Ok(Vec::new());
    }

    let document = Document::parse(text).map_err(|e| parse_error(e.to_string()))?;
    Ok(
      document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == JOB_NAME_TAG)
        .map(|node| node.text().unwrap_or_default().to_string())
        .collect(),
    )
  }
}

fn parse_error(message: String) -> SchedulerError {
  SchedulerError::OutputParseError {
    backend: Backend::Sge,
    message,
  }
}
