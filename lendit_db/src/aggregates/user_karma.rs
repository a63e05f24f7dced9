use crate::{
  newtypes::UserId,
  schema::{comment, post, vote},
  source::{user::User_, vote::VoteTargetKind},
};
use diesel::{dsl::sum, prelude::*, result::Error};

/// Karma of a user: the sum of every vote cast on content they authored,
/// over both ledgers. A full recompute rather than an incremental delta, so
/// the invariant stays auditable with a single query pair.
pub fn recompute(conn: &mut SqliteConnection, user_id: UserId) -> Result<i64, Error> {
  let comment_karma: i64 = vote::table
    .inner_join(comment::table.on(vote::target_id.eq(comment::id)))
    .filter(vote::target_kind.eq(VoteTargetKind::Comment.as_i16()))
    .filter(comment::creator_id.eq(user_id))
    .select(sum(vote::score))
    .first::<Option<i64>>(conn)?
    .unwrap_or(0);

  let post_karma: i64 = vote::table
    .inner_join(post::table.on(vote::target_id.eq(post::id)))
    .filter(vote::target_kind.eq(VoteTargetKind::Post.as_i16()))
    .filter(post::creator_id.eq(user_id))
    .select(sum(vote::score))
    .first::<Option<i64>>(conn)?
    .unwrap_or(0);

  Ok(comment_karma + post_karma)
}

/// Recompute and persist. Callers run this inside the same transaction as
/// the vote mutation that made it necessary.
pub fn refresh(conn: &mut SqliteConnection, user_id: UserId) -> Result<User_, Error> {
  let karma = recompute(conn, user_id)?;
  User_::update_karma(conn, user_id, karma)
}

#[cfg(test)]
mod tests {
  use crate::{
    aggregates::user_karma,
    establish_unpooled_connection,
    source::{comment::*, post::*, sub::*, user::*, vote::*},
    Crud,
    Likeable,
  };
  use pretty_assertions::assert_eq;

  #[test]
  fn test_recompute_spans_both_ledgers() {
    let conn = &mut establish_unpooled_connection();

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
    let bystander = User_::create(
      conn,
      &UserInsertForm {
        name: "bystander".into(),
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
    let post = Post::create(
      conn,
      &PostInsertForm {
        sub_id: sub.id,
        creator_id: Some(author.id),
        title: "A starter loan".into(),
        body: None,
        published: None,
      },
    )
    .unwrap();
    let comment = Comment::create(
      conn,
      &CommentInsertForm {
        post_id: post.id,
        creator_id: Some(author.id),
        body: "a comment".into(),
        ..CommentInsertForm::default()
      },
    )
    .unwrap();
    // a second comment by someone else, voted on: must not count for author
    let other_comment = Comment::create(
      conn,
      &CommentInsertForm {
        post_id: post.id,
        creator_id: Some(bystander.id),
        body: "unrelated".into(),
        ..CommentInsertForm::default()
      },
    )
    .unwrap();

    assert_eq!(0, user_karma::recompute(conn, author.id).unwrap());

    Vote::like(conn, &VoteForm::new(voter.id, VoteTarget::Comment(comment.id), UPVOTE)).unwrap();
    Vote::like(conn, &VoteForm::new(voter.id, VoteTarget::Post(post.id), UPVOTE)).unwrap();
    Vote::like(
      conn,
      &VoteForm::new(voter.id, VoteTarget::Comment(other_comment.id), UPVOTE),
    )
    .unwrap();

    assert_eq!(2, user_karma::recompute(conn, author.id).unwrap());
    assert_eq!(1, user_karma::recompute(conn, bystander.id).unwrap());

    Vote::like(conn, &VoteForm::new(bystander.id, VoteTarget::Post(post.id), DOWNVOTE)).unwrap();
    assert_eq!(1, user_karma::recompute(conn, author.id).unwrap());

    let refreshed = user_karma::refresh(conn, author.id).unwrap();
    assert_eq!(1, refreshed.karma);
    assert_eq!(1, User_::read(conn, author.id).unwrap().karma);
  }
}
