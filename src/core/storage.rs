//! Small key/value store in a SQLite file, shared by the jobs of a campaign.
//!
//! Launchers use it to remember which commands already completed before
//! submitting them again. Several jobs may write to the same file at once,
//! so connections wait on the database lock instead of failing.

pub mod models;
pub mod schema;


use diesel::{connection::SimpleConnection, prelude::*};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::debug;
use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  time::Duration,
};
use thiserror::Error;

use self::{
  models::{Entry, NewEntry},
  schema::entries,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for a concurrent writer to release the lock.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(7200);

/// SQLite caps the number of bound parameters per statement.
const KEYS_PER_QUERY: usize = 500;

#[derive(Error, Debug)]
pub enum StorageError {
  #[error("Database path is not valid UTF-8: {0:?}")]
  InvalidPath(PathBuf),
  #[error("Could not connect to database: {0}")]
  ConnectionError(#[from] diesel::ConnectionError),
  #[error("Database migration error: {0}")]
  MigrationError(#[from] Box<dyn std::error::Error + Send + Sync>),
  #[error("Database operation error: {0}")]
  OperationError(String),
}

impl From<diesel::result::Error> for StorageError {
  fn from(e: diesel::result::Error) -> Self {
    StorageError::OperationError(e.to_string())
  }
}

pub struct Storage {
  conn: SqliteConnection,
}

impl Storage {
  pub fn open(path: &Path) -> Result<Self, StorageError> {
    Self::open_with_timeout(path, DEFAULT_TIMEOUT)
  }

  pub fn open_with_timeout(path: &Path, timeout: Duration) -> Result<Self, StorageError> {
    let database_url = path
      .to_str()
      .ok_or_else(|| StorageError::InvalidPath(path.to_path_buf()))?;
    let mut conn =
      SqliteConnection::establish(database_url).map_err(StorageError::ConnectionError)?;
    conn.batch_execute(&format!("PRAGMA busy_timeout = {};", timeout.as_millis()))?;
    conn
      .run_pending_migrations(MIGRATIONS)
      .map_err(StorageError::MigrationError)?;

    debug!("Connected to key/value store at {}.", database_url);
    Ok(Storage { conn })
  }

  /// Insert every pair in one transaction. Existing keys are never overwritten:
  /// a duplicate aborts the whole call.
  pub fn insert_entries(
    &mut self,
    mapping: &BTreeMap<String, serde_json::Value>,
  ) -> Result<(), StorageError> {
    self.conn.transaction::<_, diesel::result::Error, _>(|conn| {
      for (key, value) in mapping {
        diesel::insert_into(entries::table)
          .values(&NewEntry { key, value })
          .execute(conn)?;
      }
      Ok(())
    })?;
    Ok(())
  }

  /// Entries for `keys`, or every entry when `keys` is `None`.
  /// Keys missing from the store are absent from the result.
  pub fn get_entries(
    &mut self,
    keys: Option<&[String]>,
  ) -> Result<BTreeMap<String, serde_json::Value>, StorageError> {
    let rows: Vec<Entry> = match keys {
      None => entries::table
        .select(Entry::as_select())
        .load::<Entry>(&mut self.conn)?,
      Some(keys) => {
        let mut rows = Vec::with_capacity(keys.len());
        for chunk in keys.chunks(KEYS_PER_QUERY) {
          let found = entries::table
            .filter(entries::key.eq_any(chunk))
            .select(Entry::as_select())
            .load::<Entry>(&mut self.conn)?;
          rows.extend(found);
        }
        rows
      }
    };
    Ok(rows.into_iter().map(|entry| (entry.key, entry.value)).collect())
  }
}

/// Store `mapping` in the database at `location`, creating it if needed.
pub fn store(
  mapping: &BTreeMap<String, serde_json::Value>,
  location: &Path,
) -> Result<(), StorageError> {
  Storage::open(location)?.insert_entries(mapping)
}

/// Load `keys` (all keys when `None`) from `location`.
/// A missing database is an empty store and is not created.
pub fn load(
  location: &Path,
  keys: Option<&[String]>,
) -> Result<BTreeMap<String, serde_json::Value>, StorageError> {
  if !location.exists() {
    debug!("No key/value store at {:?}.", location);
    return Ok(BTreeMap::new());
  }
  Storage::open(location)?.get_entries(keys)
}
