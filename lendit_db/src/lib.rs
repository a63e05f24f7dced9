#[macro_use]
extern crate diesel;
#[macro_use]
extern crate strum_macros;

pub mod aggregates;
pub mod newtypes;
pub mod schema;
pub mod source;
pub mod views;

use crate::{newtypes::UserId, source::vote::VoteTarget};
use chrono::NaiveDateTime;
use diesel::{
  connection::SimpleConnection,
  r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection},
  result::Error,
  sqlite::SqliteConnection,
  Connection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde::{Deserialize, Serialize};
use std::{env, env::VarError, ops::DerefMut};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Replaces the body of soft-deleted posts and comments. The row itself,
/// its votes and its children stay.
pub const DELETED_REPLACEMENT_TEXT: &str = "*deleted by creator*";

pub trait Crud {
  type InsertForm;
  type UpdateForm;
  type IdType;
  fn create(conn: &mut SqliteConnection, form: &Self::InsertForm) -> Result<Self, Error>
  where
    Self: Sized;
  fn read(conn: &mut SqliteConnection, id: Self::IdType) -> Result<Self, Error>
  where
    Self: Sized;
  fn update(
    _conn: &mut SqliteConnection,
    _id: Self::IdType,
    _form: &Self::UpdateForm,
  ) -> Result<Self, Error>
  where
    Self: Sized,
  {
    Err(Error::NotFound)
  }
  fn delete(_conn: &mut SqliteConnection, _id: Self::IdType) -> Result<usize, Error>
  where
    Self: Sized,
  {
    Err(Error::NotFound)
  }
}

pub trait Joinable {
  type Form;
  fn join(conn: &mut SqliteConnection, form: &Self::Form) -> Result<Self, Error>
  where
    Self: Sized;
  fn leave(conn: &mut SqliteConnection, form: &Self::Form) -> Result<usize, Error>
  where
    Self: Sized;
}

/// The vote ledger seam. `like` is an upsert: a racing duplicate insert for
/// the same (voter, target) pair falls back to updating the existing row.
pub trait Likeable {
  type Form;
  fn like(conn: &mut SqliteConnection, form: &Self::Form) -> Result<Self, Error>
  where
    Self: Sized;
  fn read_for_target(
    conn: &mut SqliteConnection,
    user_id: UserId,
    target: VoteTarget,
  ) -> Result<Option<Self>, Error>
  where
    Self: Sized;
  fn score_for_target(conn: &mut SqliteConnection, target: VoteTarget) -> Result<i64, Error>;
}

pub trait MaybeOptional<T> {
  fn get_optional(self) -> Option<T>;
}

impl<T> MaybeOptional<T> for T {
  fn get_optional(self) -> Option<T> {
    Some(self)
  }
}

impl<T> MaybeOptional<T> for Option<T> {
  fn get_optional(self) -> Option<T> {
    self
  }
}

pub trait ViewToVec {
  type DbTuple;
  fn from_tuple_to_vec(tuple: Vec<Self::DbTuple>) -> Vec<Self>
  where
    Self: Sized;
}

/// Ranking policy for post listings, root comment lists and every sibling
/// group inside a comment tree.
#[derive(EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RankType {
  #[default]
  Best,
  New,
}

pub fn naive_now() -> NaiveDateTime {
  chrono::prelude::Utc::now().naive_utc()
}

pub fn fuzzy_search(q: &str) -> String {
  let replaced = q.replace(' ', "%");
  format!("%{}%", replaced)
}

pub fn limit_and_offset(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
  let page = page.unwrap_or(1);
  let limit = limit.unwrap_or(10);
  let offset = limit * (page - 1);
  (limit, offset)
}

pub fn get_database_url_from_env() -> Result<String, VarError> {
  env::var("LENDIT_DATABASE_URL")
}

/// SQLite needs per-connection pragmas: referential actions (SET NULL on
/// user removal, cascades) only run with foreign_keys on, and the busy
/// timeout keeps concurrent writers from failing fast with SQLITE_BUSY.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    conn
      .batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
      .map_err(diesel::r2d2::Error::QueryError)
  }
}

pub fn build_db_pool(db_url: &str, pool_size: u32) -> Result<DbPool, diesel::r2d2::PoolError> {
  let manager = ConnectionManager::<SqliteConnection>::new(db_url);
  let pool = Pool::builder()
    .max_size(pool_size)
    .connection_customizer(Box::new(ConnectionOptions))
    .build(manager)?;
  let mut conn = pool.get()?;
  conn
    .deref_mut()
    .run_pending_migrations(MIGRATIONS)
    .expect("run migrations");
  tracing::info!("database ready at {}", db_url);
  Ok(pool)
}

pub fn establish_unpooled_connection() -> SqliteConnection {
  let db_url = get_database_url_from_env().unwrap_or_else(|_| ":memory:".to_string());
  let mut conn = SqliteConnection::establish(&db_url)
    .unwrap_or_else(|_| panic!("Error connecting to {}", db_url));
  conn
    .batch_execute("PRAGMA foreign_keys = ON;")
    .expect("enable foreign keys");
  conn.run_pending_migrations(MIGRATIONS).expect("load migrations");
  conn
}
