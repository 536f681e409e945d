use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;


/// Cluster batch schedulers known to clusterlib.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
  Slurm,
  Sge,
}

impl Backend {
  /// Order used when auto-detecting the backend.
  pub const PROBE_ORDER: [Backend; 2] = [Backend::Slurm, Backend::Sge];
  /// Order in which queued job names are concatenated.
  pub const STATUS_ORDER: [Backend; 2] = [Backend::Sge, Backend::Slurm];

  pub fn spec(&self) -> &'static BackendSpec {
    match self {
      Backend::Slurm => &SLURM,
      Backend::Sge => &SGE,
    }
  }
}

#[derive(Error, Debug)]
pub enum SchedulerError {
  #[error("Unsupported backend '{0}', expected one of: auto, slurm, sge")]
  ConfigurationError(String),
  #[error("No scheduler backend detected (probed: {})", join_backends(.0))]
  BackendUnavailable(Vec<Backend>),
  #[error("Could not parse {backend} status output: {message}")]
  OutputParseError { backend: Backend, message: String },
  #[error("{backend} status command failed: {message}")]
  StatusCommandFailed { backend: Backend, message: String },
}

fn join_backends(backends: &[Backend]) -> String {
  backends
    .iter()
    .map(|b| b.to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Logical submission options, independent of the scheduler flag syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum JobOption {
  JobName,
  Time,
  Memory,
  Email,
  EmailOptions,
  LogDirectory,
}

/// Flag pattern where every `{}` is a substitution slot, filled in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionTemplate(pub &'static str);

impl OptionTemplate {
  pub fn slots(&self) -> usize {
    self.0.matches("{}").count()
  }

  pub fn fill(&self, values: &[&str]) -> String {
    let mut pieces = self.0.split("{}");
    let mut values = values.iter();
    let mut out = String::with_capacity(self.0.len() + 16);
    if let Some(first) = pieces.next() {
      out.push_str(first);
    }
    for piece in pieces {
      out.push_str(values.next().copied().unwrap_or_default());
      out.push_str(piece);
    }
    out
  }
}

#[derive(Debug, PartialEq, Eq)]
pub struct OptionTemplates {
  pub job_name: OptionTemplate,
  pub time: OptionTemplate,
  pub memory: OptionTemplate,
  pub email: OptionTemplate,
  pub email_options: OptionTemplate,
  /// Sge takes the directory only, Slurm the directory and the job name.
  pub log_directory: OptionTemplate,
}

impl OptionTemplates {
  pub fn get(&self, option: JobOption) -> &OptionTemplate {
    match option {
      JobOption::JobName => &self.job_name,
      JobOption::Time => &self.time,
      JobOption::Memory => &self.memory,
      JobOption::Email => &self.email,
      JobOption::EmailOptions => &self.email_options,
      JobOption::LogDirectory => &self.log_directory,
    }
  }
}

/// Everything clusterlib needs to know about one scheduler.
#[derive(Debug, PartialEq, Eq)]
pub struct BackendSpec {
  /// Only checked for presence, never executed.
  pub admin_command: &'static str,
  pub launcher: &'static str,
  pub status_command: &'static str,
  pub status_args: &'static [&'static str],
  pub user_flag: &'static str,
  pub templates: OptionTemplates,
}

static SLURM: BackendSpec = BackendSpec {
  admin_command: "scontrol",
  launcher: "sbatch",
  status_command: "squeue",
  status_args: &["--noheader", "-o", "%j"],
  user_flag: "-u",
  templates: OptionTemplates {
    job_name: OptionTemplate("--job-name={}"),
    time: OptionTemplate("--time={}"),
    memory: OptionTemplate("--mem={}"),
    email: OptionTemplate("--mail-user={}"),
    email_options: OptionTemplate("--mail-type={}"),
    log_directory: OptionTemplate("-o {}/{}.%j.txt"),
  },
};

static SGE: BackendSpec = BackendSpec {
  admin_command: "qmod",
  launcher: "qsub",
  status_command: "qstat",
  status_args: &["-xml"],
  user_flag: "-u",
  templates: OptionTemplates {
    job_name: OptionTemplate("-N \"{}\""),
    time: OptionTemplate("-l h_rt={}"),
    memory: OptionTemplate("-l h_vmem={}M"),
    email: OptionTemplate("-M {}"),
    email_options: OptionTemplate("-m {}"),
    log_directory: OptionTemplate("-j y -o '{}/$JOB_NAME.$JOB_ID.txt'"),
  },
};

pub fn template_for(backend: Backend) -> &'static OptionTemplates {
  &backend.spec().templates
}
