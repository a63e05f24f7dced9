use lendit_db::{
  newtypes::{CommentId, PostId, UserId},
  source::{comment::Comment, post::Post, sub::Sub, user::User_},
  Crud,
  DbConnection,
  DbPool,
};
use lendit_utils::error::{LenditErrorExt, LenditErrorType, LenditResult};

pub mod comment;
pub mod post;
pub mod search;
pub mod sub;
pub mod user;
pub mod vote;

#[cfg(test)]
pub(crate) mod test_utils;

/// Everything an operation needs from the surrounding application.
/// Transport, routing and authentication live outside; the web layer hands
/// each operation the already-authenticated actor.
pub struct LenditContext {
  pool: DbPool,
}

impl LenditContext {
  pub fn create(pool: DbPool) -> Self {
    LenditContext { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  pub fn conn(&self) -> LenditResult<DbConnection> {
    Ok(self.pool.get()?)
  }
}

/// A single boundary operation: deserialized request in, serializable
/// response or taxonomy error out.
pub trait Perform {
  type Response: serde::Serialize + Send;

  fn perform(&self, context: &LenditContext, actor: Option<UserId>)
    -> LenditResult<Self::Response>;
}

/// Writes require an authenticated actor. Rejected before any ledger or
/// table access.
pub(crate) fn require_user(
  conn: &mut diesel::SqliteConnection,
  actor: Option<UserId>,
) -> LenditResult<User_> {
  let user_id = actor.ok_or(LenditErrorType::NotLoggedIn)?;
  User_::read(conn, user_id).with_lendit_type(LenditErrorType::NotLoggedIn)
}

pub(crate) fn get_user_by_name(
  conn: &mut diesel::SqliteConnection,
  username: &str,
) -> LenditResult<User_> {
  User_::read_from_name(conn, username)
    .with_lendit_type(LenditErrorType::CouldntFindUser(username.to_string()))
}

pub(crate) fn get_sub_by_title(
  conn: &mut diesel::SqliteConnection,
  title: &str,
) -> LenditResult<Sub> {
  Sub::read_from_title(conn, title)
    .with_lendit_type(LenditErrorType::CouldntFindSub(title.to_string()))
}

pub(crate) fn get_post(
  conn: &mut diesel::SqliteConnection,
  post_id: PostId,
) -> LenditResult<Post> {
  Post::read(conn, post_id).with_lendit_type(LenditErrorType::CouldntFindPost)
}

pub(crate) fn get_comment(
  conn: &mut diesel::SqliteConnection,
  comment_id: CommentId,
) -> LenditResult<Comment> {
  Comment::read(conn, comment_id).with_lendit_type(LenditErrorType::CouldntFindComment)
}
