use crate::{
  naive_now,
  newtypes::{PostId, SubId, UserId},
  schema::post,
  Crud,
  DELETED_REPLACEMENT_TEXT,
};
use chrono::NaiveDateTime;
use diesel::{dsl::insert_into, prelude::*, result::Error};
use serde::Serialize;

#[derive(Clone, Queryable, Identifiable, PartialEq, Debug, Serialize)]
#[diesel(table_name = post)]
pub struct Post {
  pub id: PostId,
  pub sub_id: SubId,
  /// Cleared when the author is removed or the post is soft-deleted.
  pub creator_id: Option<UserId>,
  pub title: String,
  pub body: String,
  pub deleted: bool,
  /// Denormalized net vote count, refreshed by the vote operation.
  pub upvotes: i64,
  pub published: NaiveDateTime,
  pub updated: Option<NaiveDateTime>,
}

#[derive(Insertable, Clone, Default)]
#[diesel(table_name = post)]
pub struct PostInsertForm {
  pub sub_id: SubId,
  pub creator_id: Option<UserId>,
  pub title: String,
  pub body: Option<String>,
  pub published: Option<NaiveDateTime>,
}

#[derive(AsChangeset, Clone, Default)]
#[diesel(table_name = post)]
pub struct PostUpdateForm {
  pub title: Option<String>,
  pub body: Option<String>,
  pub updated: Option<Option<NaiveDateTime>>,
}

impl Crud for Post {
  type InsertForm = PostInsertForm;
  type UpdateForm = PostUpdateForm;
  type IdType = PostId;

  fn create(conn: &mut SqliteConnection, form: &PostInsertForm) -> Result<Self, Error> {
    insert_into(post::table)
      .values(form)
      .get_result::<Self>(conn)
  }

  fn read(conn: &mut SqliteConnection, post_id: PostId) -> Result<Self, Error> {
    post::table.find(post_id).first::<Self>(conn)
  }

  fn update(
    conn: &mut SqliteConnection,
    post_id: PostId,
    form: &PostUpdateForm,
  ) -> Result<Self, Error> {
    diesel::update(post::table.find(post_id))
      .set(form)
      .get_result::<Self>(conn)
  }
}

impl Post {
  /// Soft delete: scrub the body, drop the author reference, keep the row,
  /// its votes and its creation date.
  pub fn mark_deleted(conn: &mut SqliteConnection, post_id: PostId) -> Result<Self, Error> {
    diesel::update(post::table.find(post_id))
      .set((
        post::body.eq(DELETED_REPLACEMENT_TEXT),
        post::creator_id.eq(None::<UserId>),
        post::deleted.eq(true),
        post::updated.eq(naive_now()),
      ))
      .get_result::<Self>(conn)
  }

  pub fn update_upvotes(
    conn: &mut SqliteConnection,
    post_id: PostId,
    new_upvotes: i64,
  ) -> Result<Self, Error> {
    diesel::update(post::table.find(post_id))
      .set(post::upvotes.eq(new_upvotes))
      .get_result::<Self>(conn)
  }

  pub fn for_creator(conn: &mut SqliteConnection, creator_id: UserId) -> Result<Vec<Self>, Error> {
    post::table
      .filter(post::creator_id.eq(creator_id))
      .order_by(post::id.asc())
      .load::<Self>(conn)
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    establish_unpooled_connection,
    source::{post::*, sub::*, user::*},
    Crud,
    DELETED_REPLACEMENT_TEXT,
  };
  use pretty_assertions::assert_eq;

  #[test]
  fn test_crud() {
    let conn = &mut establish_unpooled_connection();

    let inserted_user = User_::create(
      conn,
      &UserInsertForm {
        name: "terry".into(),
        ..UserInsertForm::default()
      },
    )
    .unwrap();

    let inserted_sub = Sub::create(
      conn,
      &SubInsertForm {
        title: "microloans".into(),
        description: None,
      },
    )
    .unwrap();

    let new_post = PostInsertForm {
      sub_id: inserted_sub.id,
      creator_id: Some(inserted_user.id),
      title: "A starter loan".into(),
      body: Some("Looking for 50 to get going".into()),
      published: None,
    };

    let inserted_post = Post::create(conn, &new_post).unwrap();

    let expected_post = Post {
      id: inserted_post.id,
      sub_id: inserted_sub.id,
      creator_id: Some(inserted_user.id),
      title: "A starter loan".into(),
      body: "Looking for 50 to get going".into(),
      deleted: false,
      upvotes: 0,
      published: inserted_post.published,
      updated: None,
    };

    let read_post = Post::read(conn, inserted_post.id).unwrap();
    assert_eq!(expected_post, inserted_post);
    assert_eq!(expected_post, read_post);

    let updated_post = Post::update(
      conn,
      inserted_post.id,
      &PostUpdateForm {
        body: Some("Looking for 75 after all".into()),
        updated: Some(Some(crate::naive_now())),
        ..PostUpdateForm::default()
      },
    )
    .unwrap();
    assert_eq!("Looking for 75 after all", updated_post.body);
    assert!(updated_post.updated.is_some());

    assert_eq!(
      vec![inserted_post.id],
      Post::for_creator(conn, inserted_user.id)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect::<Vec<_>>()
    );
  }

  #[test]
  fn test_soft_delete_keeps_row_and_votes_metadata() {
    let conn = &mut establish_unpooled_connection();

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
        body: Some("original body".into()),
        published: None,
      },
    )
    .unwrap();

    let deleted = Post::mark_deleted(conn, post.id).unwrap();

    assert!(deleted.deleted);
    assert_eq!(DELETED_REPLACEMENT_TEXT, deleted.body);
    assert_eq!(None, deleted.creator_id);
    // title, timestamps and the row itself survive
    assert_eq!(post.title, deleted.title);
    assert_eq!(post.published, deleted.published);
    assert!(Post::read(conn, post.id).is_ok());
  }
}
