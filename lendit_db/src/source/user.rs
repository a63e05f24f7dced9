use crate::{naive_now, newtypes::UserId, schema::user_, Crud};
use chrono::NaiveDateTime;
use diesel::{dsl::insert_into, prelude::*, result::Error};
use serde::Serialize;

#[derive(Clone, Queryable, Identifiable, PartialEq, Debug, Serialize)]
#[diesel(table_name = user_)]
pub struct User_ {
  pub id: UserId,
  pub name: String,
  pub email: Option<String>,
  /// Derived from the vote ledger, recomputed after every vote mutation.
  pub karma: i64,
  pub admin: bool,
  pub published: NaiveDateTime,
  pub updated: Option<NaiveDateTime>,
}

#[derive(Insertable, Clone, Default)]
#[diesel(table_name = user_)]
pub struct UserInsertForm {
  pub name: String,
  pub email: Option<String>,
  pub admin: Option<bool>,
}

impl Crud for User_ {
  type InsertForm = UserInsertForm;
  type UpdateForm = UserInsertForm;
  type IdType = UserId;

  fn create(conn: &mut SqliteConnection, form: &UserInsertForm) -> Result<Self, Error> {
    insert_into(user_::table)
      .values(form)
      .get_result::<Self>(conn)
  }

  fn read(conn: &mut SqliteConnection, user_id: UserId) -> Result<Self, Error> {
    user_::table.find(user_id).first::<Self>(conn)
  }
}

impl User_ {
  pub fn read_from_name(conn: &mut SqliteConnection, name: &str) -> Result<Self, Error> {
    user_::table.filter(user_::name.eq(name)).first::<Self>(conn)
  }

  pub fn read_from_email(conn: &mut SqliteConnection, email: &str) -> Result<Self, Error> {
    user_::table
      .filter(user_::email.eq(email))
      .first::<Self>(conn)
  }

  pub fn update_karma(
    conn: &mut SqliteConnection,
    user_id: UserId,
    new_karma: i64,
  ) -> Result<Self, Error> {
    diesel::update(user_::table.find(user_id))
      .set((user_::karma.eq(new_karma), user_::updated.eq(naive_now())))
      .get_result::<Self>(conn)
  }

  pub fn list_by_name(
    conn: &mut SqliteConnection,
    search_term: &str,
  ) -> Result<Vec<Self>, Error> {
    user_::table
      .filter(user_::name.like(crate::fuzzy_search(search_term)))
      .order_by(user_::id.asc())
      .load::<Self>(conn)
  }
}
