//! Submit and inspect jobs on a shared cluster without caring whether it
//! runs SLURM or Sun Grid Engine.

pub mod core;

pub use crate::core::{
  Clusterlib, ClusterlibError,
  backends::Backend,
  storage::{load, store},
  submit::JobDescription,
};
