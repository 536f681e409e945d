use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::core::submit::JobDescription;


/// Jobs that still need a submission, in their original order.
///
/// A job is skipped while a job with the same name is queued or running, and
/// once its command is recorded in the `done` store.
pub fn plan_submissions<'a>(
  jobs: &'a [JobDescription],
  queued: &HashSet<String>,
  done: &BTreeMap<String, serde_json::Value>,
) -> Vec<&'a JobDescription> {
  jobs
    .iter()
    .filter(|job| {
      if queued.contains(&job.job_name) {
        debug!("Skipping {}: already queued or running", job.job_name);
        false
      } else if done.contains_key(&job.job_command) {
        debug!("Skipping {}: already completed", job.job_name);
        false
      } else {
        true
      }
    })
    .collect()
}
