use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use serde_json::json;

use crate::core::{
  Clusterlib, ClusterlibError,
  backends::{Backend, SchedulerError},
  environment::Environment,
  storage,
  submit::JobDescription,
};

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
  let path = dir.join(name);
  fs::write(&path, contents).unwrap();
  path
}

/// Create a shell script that `Locate` accepts as an executable.
pub fn write_executable(dir: &Path, name: &str) -> PathBuf {
  let path = write_file(dir, name, "#!/bin/sh\nexit 0\n");
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  }
  path
}

fn empty_environment() -> (tempfile::TempDir, Environment) {
  let dir = tempfile::tempdir().unwrap();
  let env = Environment::default().with_search_path(dir.path());
  (dir, env)
}

#[test]
fn explicit_backend_resolves_without_any_scheduler() {
  let (_dir, env) = empty_environment();
  let clusterlib = Clusterlib::with_environment(env);
  assert_eq!(clusterlib.resolve_backend("sge").unwrap(), Backend::Sge);
  assert!(matches!(
    clusterlib.resolve_backend("auto"),
    Err(ClusterlibError::SchedulerError(SchedulerError::BackendUnavailable(_)))
  ));
}

#[test]
fn submit_follows_the_detected_backend() {
  let (dir, env) = empty_environment();
  write_executable(dir.path(), "scontrol");
  let clusterlib = Clusterlib::with_environment(env);

  assert_eq!(
    clusterlib.submit(&JobDescription::new("run"), "auto").unwrap(),
    "echo '#!/bin/bash\nrun' | sbatch --job-name=job --time=24:00:00 --mem=4000"
  );
}

#[test]
fn submit_rejects_unknown_backends() {
  let (_dir, env) = empty_environment();
  let clusterlib = Clusterlib::with_environment(env);
  assert!(matches!(
    clusterlib.submit(&JobDescription::new(""), "unknown"),
    Err(ClusterlibError::SchedulerError(SchedulerError::ConfigurationError(_)))
  ));
}

#[test]
fn queue_is_empty_without_schedulers() {
  let (_dir, env) = empty_environment();
  let clusterlib = Clusterlib::with_environment(env);
  assert_eq!(clusterlib.queued_or_running_jobs(None), Vec::<String>::new());
  assert!(clusterlib.queued_or_running_jobs(Some("alice")).is_empty());
}

#[cfg(unix)]
#[test]
fn queue_runs_the_installed_status_command() {
  use std::os::unix::fs::PermissionsExt;

  let (dir, env) = empty_environment();
  let squeue = write_file(
    dir.path(),
    "squeue",
    "#!/bin/sh\necho 'sleepy job'\necho other\necho oops >&2\n",
  );
  fs::set_permissions(&squeue, fs::Permissions::from_mode(0o755)).unwrap();
  let qstat = write_file(dir.path(), "qstat", "#!/bin/sh\nexit 1\n");
  fs::set_permissions(&qstat, fs::Permissions::from_mode(0o755)).unwrap();

  let clusterlib = Clusterlib::with_environment(env);
  assert_eq!(
    clusterlib.queued_or_running_jobs(None),
    vec!["sleepy job", "other"]
  );
}

#[test]
fn plan_launch_skips_completed_commands() {
  let (dir, env) = empty_environment();
  let jobs_file = write_file(
    dir.path(),
    "jobs.yaml",
    "jobs:\n  - name: a\n    command: run a\n  - name: b\n    command: run b\n",
  );
  let database = dir.path().join("job.sqlite3");
  let done: BTreeMap<String, serde_json::Value> = [("run a".to_string(), json!("JOB DONE"))].into();
  storage::store(&done, &database).unwrap();

  let clusterlib = Clusterlib::with_environment(env);
  let planned = clusterlib.plan_launch(&jobs_file, &database, None).unwrap();
  assert_eq!(planned.len(), 1);
  assert_eq!(planned[0].job_name, "b");
}

#[test]
fn plan_launch_without_database_plans_everything() {
  let (dir, env) = empty_environment();
  let jobs_file = write_file(dir.path(), "jobs.yaml", "jobs:\n  - command: run\n");

  let clusterlib = Clusterlib::with_environment(env);
  let planned = clusterlib
    .plan_launch(&jobs_file, &dir.path().join("none.sqlite3"), None)
    .unwrap();
  assert_eq!(planned, vec![JobDescription::new("run")]);
}

#[test]
fn fixed_environment_constructor_installs_the_logger() {
  let (_dir, env) = empty_environment();
  let _clusterlib = Clusterlib::with_environment(env);
  assert!(env_logger::try_init().is_err());
}
