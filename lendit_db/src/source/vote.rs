use crate::{
  naive_now,
  newtypes::{CommentId, PostId, UserId},
  schema::vote,
  Likeable,
};
use chrono::NaiveDateTime;
use diesel::{
  dsl::{insert_into, sum},
  prelude::*,
  result::Error,
};
use serde::{Deserialize, Serialize};

pub const UPVOTE: i16 = 1;
pub const DOWNVOTE: i16 = -1;
pub const NO_VOTE: i16 = 0;

/// Tag stored in the ledger's `target_kind` column. Comments and posts share
/// one ledger; the tag plus the unique index keeps the two constraints
/// independent per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteTargetKind {
  Comment = 0,
  Post = 1,
}

impl VoteTargetKind {
  pub fn as_i16(self) -> i16 {
    self as i16
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum VoteTarget {
  Comment(CommentId),
  Post(PostId),
}

impl VoteTarget {
  pub fn kind(&self) -> VoteTargetKind {
    match self {
      VoteTarget::Comment(_) => VoteTargetKind::Comment,
      VoteTarget::Post(_) => VoteTargetKind::Post,
    }
  }

  pub fn id(&self) -> i32 {
    match self {
      VoteTarget::Comment(comment_id) => comment_id.0,
      VoteTarget::Post(post_id) => post_id.0,
    }
  }
}

#[derive(Clone, Queryable, Identifiable, PartialEq, Debug, Serialize)]
#[diesel(table_name = vote)]
pub struct Vote {
  pub id: i32,
  pub user_id: UserId,
  pub target_kind: i16,
  pub target_id: i32,
  /// -1, 0 or +1. An un-vote keeps the row at 0.
  pub score: i16,
  pub published: NaiveDateTime,
  pub updated: Option<NaiveDateTime>,
}

#[derive(Insertable, AsChangeset, Clone)]
#[diesel(table_name = vote)]
pub struct VoteForm {
  pub user_id: UserId,
  pub target_kind: i16,
  pub target_id: i32,
  pub score: i16,
}

impl VoteForm {
  pub fn new(user_id: UserId, target: VoteTarget, score: i16) -> Self {
    VoteForm {
      user_id,
      target_kind: target.kind().as_i16(),
      target_id: target.id(),
      score,
    }
  }
}

impl Likeable for Vote {
  type Form = VoteForm;

  /// Upsert on the (voter, target) unique index. Two racing first-votes
  /// serialize through the constraint; the loser becomes an update of the
  /// same row, so the caller never sees the conflict.
  fn like(conn: &mut SqliteConnection, form: &VoteForm) -> Result<Self, Error> {
    insert_into(vote::table)
      .values(form)
      .on_conflict((vote::user_id, vote::target_kind, vote::target_id))
      .do_update()
      .set((form, vote::updated.eq(naive_now())))
      .get_result::<Self>(conn)
  }

  fn read_for_target(
    conn: &mut SqliteConnection,
    user_id: UserId,
    target: VoteTarget,
  ) -> Result<Option<Self>, Error> {
    vote::table
      .filter(vote::user_id.eq(user_id))
      .filter(vote::target_kind.eq(target.kind().as_i16()))
      .filter(vote::target_id.eq(target.id()))
      .first::<Self>(conn)
      .optional()
  }

  /// Display vote count of a target: the sum over its vote multiset, not a
  /// separate up/down pair.
  fn score_for_target(conn: &mut SqliteConnection, target: VoteTarget) -> Result<i64, Error> {
    vote::table
      .filter(vote::target_kind.eq(target.kind().as_i16()))
      .filter(vote::target_id.eq(target.id()))
      .select(sum(vote::score))
      .first::<Option<i64>>(conn)
      .map(|total| total.unwrap_or(0))
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    establish_unpooled_connection,
    source::{comment::*, post::*, sub::*, user::*, vote::*},
    Crud,
    Likeable,
  };
  use diesel::prelude::*;
  use pretty_assertions::assert_eq;

  fn setup(conn: &mut SqliteConnection) -> (User_, User_, Post, Comment) {
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
    (author, voter, post, comment)
  }

  fn ledger_row_count(conn: &mut SqliteConnection) -> i64 {
    use crate::schema::vote;
    vote::table.count().get_result(conn).unwrap()
  }

  #[test]
  fn test_upsert_keeps_one_row_per_voter_and_target() {
    let conn = &mut establish_unpooled_connection();
    let (_author, voter, post, comment) = setup(conn);
    let comment_target = VoteTarget::Comment(comment.id);
    let post_target = VoteTarget::Post(post.id);

    let first = Vote::like(conn, &VoteForm::new(voter.id, comment_target, UPVOTE)).unwrap();
    assert_eq!(UPVOTE, first.score);
    assert_eq!(1, ledger_row_count(conn));

    // a second write for the same pair updates in place
    let second = Vote::like(conn, &VoteForm::new(voter.id, comment_target, DOWNVOTE)).unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(DOWNVOTE, second.score);
    assert_eq!(1, ledger_row_count(conn));
    assert!(second.updated.is_some());

    // the post ledger is independent of the comment ledger
    let post_vote = Vote::like(conn, &VoteForm::new(voter.id, post_target, UPVOTE)).unwrap();
    assert_ne!(first.id, post_vote.id);
    assert_eq!(2, ledger_row_count(conn));
  }

  #[test]
  fn test_score_for_target_sums_the_multiset() {
    let conn = &mut establish_unpooled_connection();
    let (author, voter, _post, comment) = setup(conn);
    let target = VoteTarget::Comment(comment.id);

    assert_eq!(0, Vote::score_for_target(conn, target).unwrap());

    Vote::like(conn, &VoteForm::new(voter.id, target, UPVOTE)).unwrap();
    Vote::like(conn, &VoteForm::new(author.id, target, UPVOTE)).unwrap();
    assert_eq!(2, Vote::score_for_target(conn, target).unwrap());

    Vote::like(conn, &VoteForm::new(author.id, target, DOWNVOTE)).unwrap();
    assert_eq!(0, Vote::score_for_target(conn, target).unwrap());

    // zero-valued rows stay in the ledger and count for nothing
    Vote::like(conn, &VoteForm::new(author.id, target, NO_VOTE)).unwrap();
    assert_eq!(1, Vote::score_for_target(conn, target).unwrap());
    assert_eq!(2, ledger_row_count(conn));
  }

  #[test]
  fn test_read_for_target() {
    let conn = &mut establish_unpooled_connection();
    let (_author, voter, post, comment) = setup(conn);

    assert_eq!(
      None,
      Vote::read_for_target(conn, voter.id, VoteTarget::Post(post.id)).unwrap()
    );

    Vote::like(conn, &VoteForm::new(voter.id, VoteTarget::Post(post.id), UPVOTE)).unwrap();
    let found = Vote::read_for_target(conn, voter.id, VoteTarget::Post(post.id))
      .unwrap()
      .unwrap();
    assert_eq!(UPVOTE, found.score);

    // same ids, different kind: no crosstalk between the ledgers
    assert_eq!(
      None,
      Vote::read_for_target(conn, voter.id, VoteTarget::Comment(comment.id)).unwrap()
    );
  }
}
