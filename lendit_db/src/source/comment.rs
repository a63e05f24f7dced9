use crate::{
  naive_now,
  newtypes::{CommentId, PostId, UserId},
  schema::comment,
  Crud,
  DELETED_REPLACEMENT_TEXT,
};
use chrono::NaiveDateTime;
use diesel::{dsl::insert_into, prelude::*, result::Error};
use serde::Serialize;

#[derive(Clone, Queryable, Identifiable, PartialEq, Debug, Serialize)]
#[diesel(table_name = comment)]
pub struct Comment {
  pub id: CommentId,
  pub post_id: PostId,
  /// Cleared when the author is removed or the comment is soft-deleted.
  pub creator_id: Option<UserId>,
  /// None for root comments. A parent's `post_id` always equals this
  /// comment's `post_id`; threads never span posts.
  pub parent_id: Option<CommentId>,
  pub body: String,
  pub deleted: bool,
  /// Denormalized net vote count, refreshed by the vote operation.
  pub upvotes: i64,
  pub published: NaiveDateTime,
  pub updated: Option<NaiveDateTime>,
}

#[derive(Insertable, Clone, Default)]
#[diesel(table_name = comment)]
pub struct CommentInsertForm {
  pub post_id: PostId,
  pub creator_id: Option<UserId>,
  pub parent_id: Option<CommentId>,
  pub body: String,
  pub published: Option<NaiveDateTime>,
}

#[derive(AsChangeset, Clone, Default)]
#[diesel(table_name = comment)]
pub struct CommentUpdateForm {
  pub body: Option<String>,
  pub updated: Option<Option<NaiveDateTime>>,
}

impl Crud for Comment {
  type InsertForm = CommentInsertForm;
  type UpdateForm = CommentUpdateForm;
  type IdType = CommentId;

  fn create(conn: &mut SqliteConnection, form: &CommentInsertForm) -> Result<Self, Error> {
    insert_into(comment::table)
      .values(form)
      .get_result::<Self>(conn)
  }

  fn read(conn: &mut SqliteConnection, comment_id: CommentId) -> Result<Self, Error> {
    comment::table.find(comment_id).first::<Self>(conn)
  }

  fn update(
    conn: &mut SqliteConnection,
    comment_id: CommentId,
    form: &CommentUpdateForm,
  ) -> Result<Self, Error> {
    diesel::update(comment::table.find(comment_id))
      .set(form)
      .get_result::<Self>(conn)
  }
}

impl Comment {
  /// The whole flat comment set of a post, one bulk read regardless of
  /// thread depth. Insertion order, so tree assembly tie-breaks are stable.
  pub fn for_post(conn: &mut SqliteConnection, post_id: PostId) -> Result<Vec<Self>, Error> {
    comment::table
      .filter(comment::post_id.eq(post_id))
      .order_by(comment::id.asc())
      .load::<Self>(conn)
  }

  /// Soft delete: scrub the body and author, keep the row so replies stay
  /// attached at their place in the thread.
  pub fn mark_deleted(conn: &mut SqliteConnection, comment_id: CommentId) -> Result<Self, Error> {
    diesel::update(comment::table.find(comment_id))
      .set((
        comment::body.eq(DELETED_REPLACEMENT_TEXT),
        comment::creator_id.eq(None::<UserId>),
        comment::deleted.eq(true),
        comment::updated.eq(naive_now()),
      ))
      .get_result::<Self>(conn)
  }

  pub fn update_upvotes(
    conn: &mut SqliteConnection,
    comment_id: CommentId,
    new_upvotes: i64,
  ) -> Result<Self, Error> {
    diesel::update(comment::table.find(comment_id))
      .set(comment::upvotes.eq(new_upvotes))
      .get_result::<Self>(conn)
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    establish_unpooled_connection,
    source::{comment::*, post::*, sub::*, user::*},
    Crud,
    DELETED_REPLACEMENT_TEXT,
  };
  use pretty_assertions::assert_eq;

  fn setup(conn: &mut diesel::SqliteConnection) -> (User_, Post) {
    let user = User_::create(
      conn,
      &UserInsertForm {
        name: "terry".into(),
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
        creator_id: Some(user.id),
        title: "A starter loan".into(),
        body: None,
        published: None,
      },
    )
    .unwrap();
    (user, post)
  }

  #[test]
  fn test_crud() {
    let conn = &mut establish_unpooled_connection();
    let (user, post) = setup(conn);

    let comment_form = CommentInsertForm {
      post_id: post.id,
      creator_id: Some(user.id),
      body: "A test comment".into(),
      ..CommentInsertForm::default()
    };
    let inserted_comment = Comment::create(conn, &comment_form).unwrap();

    let expected_comment = Comment {
      id: inserted_comment.id,
      post_id: post.id,
      creator_id: Some(user.id),
      parent_id: None,
      body: "A test comment".into(),
      deleted: false,
      upvotes: 0,
      published: inserted_comment.published,
      updated: None,
    };

    let child_comment = Comment::create(
      conn,
      &CommentInsertForm {
        post_id: post.id,
        creator_id: Some(user.id),
        parent_id: Some(inserted_comment.id),
        body: "A child comment".into(),
        published: None,
      },
    )
    .unwrap();

    let read_comment = Comment::read(conn, inserted_comment.id).unwrap();
    assert_eq!(expected_comment, inserted_comment);
    assert_eq!(expected_comment, read_comment);
    assert_eq!(Some(inserted_comment.id), child_comment.parent_id);

    let flat = Comment::for_post(conn, post.id).unwrap();
    assert_eq!(vec![inserted_comment.id, child_comment.id],
               flat.into_iter().map(|c| c.id).collect::<Vec<_>>());
  }

  #[test]
  fn test_soft_delete_never_detaches_children() {
    let conn = &mut establish_unpooled_connection();
    let (user, post) = setup(conn);

    let parent = Comment::create(
      conn,
      &CommentInsertForm {
        post_id: post.id,
        creator_id: Some(user.id),
        body: "parent".into(),
        ..CommentInsertForm::default()
      },
    )
    .unwrap();
    let child = Comment::create(
      conn,
      &CommentInsertForm {
        post_id: post.id,
        creator_id: Some(user.id),
        parent_id: Some(parent.id),
        body: "child".into(),
        published: None,
      },
    )
    .unwrap();

    let deleted_parent = Comment::mark_deleted(conn, parent.id).unwrap();
    assert!(deleted_parent.deleted);
    assert_eq!(DELETED_REPLACEMENT_TEXT, deleted_parent.body);
    assert_eq!(None, deleted_parent.creator_id);
    assert_eq!(parent.published, deleted_parent.published);

    // the child still points at the scrubbed parent
    let child_after = Comment::read(conn, child.id).unwrap();
    assert_eq!(Some(parent.id), child_after.parent_id);
  }
}
