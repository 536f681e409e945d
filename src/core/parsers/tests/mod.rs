use std::{fs, path::Path, path::PathBuf};

use crate::core::{
  parsers::{ParserError, parse_jobs_from_file, parse_jobs_from_str},
  submit::JobDescription,
};

const JOBS: &str = r##"
defaults:
  time: "01:00:00"
  memory: 2000
  email: me@example.com
  log_directory: logs
jobs:
  - name: job-param=0
    command: python main.py --param 0
  - name: job-param=1
    command: python main.py --param 1
    memory: "8000"
    email_options: ALL
    log_directory: /scratch/logs
  - command: echo 'no name'
    shell_script: "#!/bin/sh"
"##;

#[test]
fn jobs_inherit_defaults() {
  let jobs = parse_jobs_from_str(JOBS, Path::new("/campaign")).unwrap();
  assert_eq!(jobs.len(), 3);

  assert_eq!(
    jobs[0],
    JobDescription {
      job_name: "job-param=0".to_string(),
      time: "01:00:00".to_string(),
      memory: 2000,
      email: Some("me@example.com".to_string()),
      email_options: None,
      log_directory: Some(PathBuf::from("/campaign/logs")),
      shell_script: "#!/bin/bash".to_string(),
      job_command: "python main.py --param 0".to_string(),
    }
  );
}

#[test]
fn per_job_values_override_defaults() {
  let jobs = parse_jobs_from_str(JOBS, Path::new("/campaign")).unwrap();
  assert_eq!(jobs[1].memory, 8000);
  assert_eq!(jobs[1].email_options.as_deref(), Some("ALL"));
  assert_eq!(jobs[1].log_directory, Some(PathBuf::from("/scratch/logs")));
  assert_eq!(jobs[1].time, "01:00:00");
}

#[test]
fn unnamed_jobs_keep_the_default_name() {
  let jobs = parse_jobs_from_str(JOBS, Path::new("/campaign")).unwrap();
  assert_eq!(jobs[2].job_name, "job");
  assert_eq!(jobs[2].job_command, "echo 'no name'");
  assert_eq!(jobs[2].shell_script, "#!/bin/sh");
}

#[test]
fn command_is_required() {
  let result = parse_jobs_from_str("jobs:\n  - name: a\n", Path::new("."));
  assert!(matches!(result, Err(ParserError::MissingKey(key)) if key == "command"));
}

#[test]
fn jobs_must_be_a_sequence() {
  assert!(matches!(
    parse_jobs_from_str("jobs: nope\n", Path::new(".")),
    Err(ParserError::WrongType(key, _)) if key == "jobs"
  ));
  assert!(matches!(
    parse_jobs_from_str("defaults: {}\n", Path::new(".")),
    Err(ParserError::MissingKey(_))
  ));
}

#[test]
fn defaults_cannot_carry_a_command() {
  let text = "defaults:\n  command: run\njobs: []\n";
  assert!(matches!(
    parse_jobs_from_str(text, Path::new(".")),
    Err(ParserError::UnexpectedKey(_))
  ));
}

#[test]
fn invalid_memory_is_rejected() {
  for memory in ["-1", "lots", "[1, 2]"] {
    let text = format!("jobs:\n  - command: run\n    memory: {memory}\n");
    assert!(
      matches!(
        parse_jobs_from_str(&text, Path::new(".")),
        Err(ParserError::WrongType(_, _))
      ),
      "memory {memory} should be rejected"
    );
  }
}

#[test]
fn wrong_types_name_the_offending_key() {
  let text = "jobs:\n  - command: run\n    email: [a, b]\n";
  match parse_jobs_from_str(text, Path::new(".")) {
    Err(e @ ParserError::WrongType(..)) => {
      assert_eq!(e.to_string(), "Wrong type for 'email', expected string")
    }
    other => panic!("unexpected result {:?}", other),
  }
}

#[test]
fn empty_document_is_an_error() {
  assert!(matches!(
    parse_jobs_from_str("", Path::new(".")),
    Err(ParserError::YamlEmpty)
  ));
}

#[test]
fn relative_log_directories_follow_the_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("jobs.yaml");
  fs::write(&path, JOBS).unwrap();

  let jobs = parse_jobs_from_file(&path).unwrap();
  assert_eq!(jobs[0].log_directory, Some(dir.path().join("logs")));
}

#[test]
fn missing_file_is_an_io_error() {
  let dir = tempfile::tempdir().unwrap();
  assert!(matches!(
    parse_jobs_from_file(&dir.path().join("missing.yaml")),
    Err(ParserError::IoError(_))
  ));
}
