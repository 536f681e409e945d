mod utils;

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clusterlib::core::{
  Clusterlib,
  config::{self, ClusterlibConfig},
  storage,
  submit::JobDescription,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the backend that would be used for submissions
  Backend {
    #[arg(long)]
    backend: Option<String>,
  },
  /// Print (or dispatch) the submission command of a single job
  Submit {
    #[arg(long)]
    command: String,
    #[arg(long, default_value = "job")]
    name: String,
    #[arg(long, default_value = "24:00:00")]
    time: String,
    #[arg(long, default_value_t = 4000)]
    memory: u64,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    email_options: Option<String>,
    #[arg(long)]
    log_directory: Option<PathBuf>,
    #[arg(long, default_value = "#!/bin/bash")]
    shell_script: String,
    #[arg(long)]
    backend: Option<String>,
    /// Run the command and print the scheduler job id
    #[arg(long)]
    dispatch: bool,
  },
  /// List queued or running job names
  Queue {
    #[arg(long)]
    user: Option<String>,
  },
  /// Submit the jobs of a YAML file that are neither queued nor done
  Launch {
    file: PathBuf,
    #[arg(long)]
    database: Option<PathBuf>,
    #[arg(long)]
    backend: Option<String>,
    #[arg(long)]
    user: Option<String>,
    /// Dispatch the planned jobs instead of printing their commands
    #[arg(long)]
    submit: bool,
  },
  /// Record a value in the key/value store
  Store {
    key: String,
    value: String,
    #[arg(long)]
    database: Option<PathBuf>,
  },
  /// Print values of the key/value store as JSON
  Load {
    keys: Vec<String>,
    #[arg(long)]
    database: Option<PathBuf>,
  },
  /// Persist default settings
  Config {
    #[arg(long)]
    backend: Option<String>,
    #[arg(long)]
    database: Option<PathBuf>,
  },
}

pub fn main() -> Result<()> {
  let cli = Cli::parse();
  let clusterlib = Clusterlib::new();
  match cli.command {
    Some(command) => run(command, &clusterlib, || {
      config::get_config_global().context("Failed to load configuration")
    }),
    None => Ok(()),
  }
}

/// Run one subcommand. Settings are loaded only by the commands that read them.
fn run(
  command: Commands,
  clusterlib: &Clusterlib,
  load_settings: impl Fn() -> Result<ClusterlibConfig>,
) -> Result<()> {
  match command {
    Commands::Backend { backend } => {
      let settings = load_settings()?;
      let backend = clusterlib.resolve_backend(&settings.backend_request(backend.as_deref()))?;
      println!("{}", backend);
    }
    Commands::Submit {
      command,
      name,
      time,
      memory,
      email,
      email_options,
      log_directory,
      shell_script,
      backend,
      dispatch,
    } => {
      let job = JobDescription {
        job_name: name,
        time,
        memory,
        email,
        email_options,
        log_directory,
        shell_script,
        job_command: command,
      };
      let requested = load_settings()?.backend_request(backend.as_deref());
      if dispatch {
        println!("{}", clusterlib.dispatch(&job, &requested)?);
      } else {
        println!("{}", clusterlib.submit(&job, &requested)?);
      }
    }
    Commands::Queue { user } => {
      for name in clusterlib.queued_or_running_jobs(user.as_deref()) {
        println!("{}", name);
      }
    }
    Commands::Launch {
      file,
      database,
      backend,
      user,
      submit,
    } => {
      let settings = load_settings()?;
      let database = settings.database_path(database.as_deref())?;
      let requested = settings.backend_request(backend.as_deref());
      let planned = clusterlib
        .plan_launch(&file, &database, user.as_deref())
        .with_context(|| format!("Failed to plan jobs from {:?}", file))?;
      for job in &planned {
        if submit {
          let job_id = clusterlib.dispatch(job, &requested)?;
          println!("{}\t{}", job.job_name, job_id);
        } else {
          println!("{}", clusterlib.submit(job, &requested)?);
        }
      }
    }
    Commands::Store {
      key,
      value,
      database,
    } => {
      let database = load_settings()?.database_path(database.as_deref())?;
      let mapping: BTreeMap<String, serde_json::Value> =
        [(key, utils::parse_store_value(&value))].into();
      storage::store(&mapping, &database)
        .with_context(|| format!("Failed to store into {:?}", database))?;
    }
    Commands::Load { keys, database } => {
      let database = load_settings()?.database_path(database.as_deref())?;
      let keys = (!keys.is_empty()).then_some(keys);
      let values = storage::load(&database, keys.as_deref())
        .with_context(|| format!("Failed to load from {:?}", database))?;
      println!("{}", serde_json::to_string_pretty(&values)?);
    }
    Commands::Config { backend, database } => {
      let mut updated = load_settings()?;
      if let Some(backend) = backend {
        updated.set_backend(&backend)?;
      }
      if let Some(database) = database {
        updated.database = Some(database);
      }
      config::set_config_global(&updated).context("Failed to save configuration")?;
      println!(
        "✅ Configuration saved to {:?}",
        config::get_config_global_path()?
      );
    }
  }
  Ok(())
}
