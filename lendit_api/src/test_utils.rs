use crate::LenditContext;
use lendit_db::{
  build_db_pool,
  newtypes::UserId,
  source::{comment::*, post::*, sub::*, user::*},
  Crud,
  Joinable,
};

/// A context over a fresh in-memory database. Pool size 1 so every
/// operation in a test shares the same `:memory:` connection.
pub(crate) fn test_context() -> LenditContext {
  let pool = build_db_pool(":memory:", 1).expect("build test pool");
  LenditContext::create(pool)
}

pub(crate) struct TestData {
  pub author: User_,
  pub voter: User_,
  pub sub: Sub,
  pub post: Post,
  pub comment: Comment,
}

/// Two users, a sub the author moderates and both are members of, one post
/// and one root comment by the author.
pub(crate) fn seed(context: &LenditContext) -> TestData {
  let conn = &mut context.conn().unwrap();

  let author = User_::create(
    conn,
    &UserInsertForm {
      name: "author".into(),
      ..UserInsertForm::default()
    },
  )
  .unwrap();
  let voter = User_::create(
    conn,
    &UserInsertForm {
      name: "voter".into(),
      ..UserInsertForm::default()
    },
  )
  .unwrap();
  let sub = Sub::create(
    conn,
    &SubInsertForm {
      title: "microloans".into(),
      description: None,
    },
  )
  .unwrap();
  for user_id in [author.id, voter.id] {
    SubMembership::join(
      conn,
      &SubMembershipForm {
        sub_id: sub.id,
        user_id,
      },
    )
    .unwrap();
  }
  SubModerator::join(
    conn,
    &SubModeratorForm {
      sub_id: sub.id,
      user_id: author.id,
    },
  )
  .unwrap();
  let post = Post::create(
    conn,
    &PostInsertForm {
      sub_id: sub.id,
      creator_id: Some(author.id),
      title: "A starter loan".into(),
      body: Some("Looking for 50 to get going".into()),
      published: None,
    },
  )
  .unwrap();
  let comment = Comment::create(
    conn,
    &CommentInsertForm {
      post_id: post.id,
      creator_id: Some(author.id),
      body: "I can vouch for this".into(),
      ..CommentInsertForm::default()
    },
  )
  .unwrap();

  TestData {
    author,
    voter,
    sub,
    post,
    comment,
  }
}

pub(crate) fn karma_of(context: &LenditContext, user_id: UserId) -> i64 {
  let conn = &mut context.conn().unwrap();
  User_::read(conn, user_id).unwrap().karma
}
