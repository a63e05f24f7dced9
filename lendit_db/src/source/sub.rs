use crate::{
  fuzzy_search,
  limit_and_offset,
  newtypes::{SubId, UserId},
  schema::{sub, sub_membership, sub_moderator},
  Crud,
  Joinable,
};
use chrono::NaiveDateTime;
use diesel::{dsl::insert_into, prelude::*, result::Error};
use serde::Serialize;
use std::str::FromStr;

#[derive(Clone, Queryable, Identifiable, PartialEq, Debug, Serialize)]
#[diesel(table_name = sub)]
pub struct Sub {
  pub id: SubId,
  pub title: String,
  pub description: String,
  pub published: NaiveDateTime,
  pub updated: Option<NaiveDateTime>,
}

#[derive(Insertable, Clone, Default)]
#[diesel(table_name = sub)]
pub struct SubInsertForm {
  pub title: String,
  pub description: Option<String>,
}

/// The virtual subs. They are computed on read, never persisted, and their
/// titles are reserved: creating a real sub (or posting) under one fails.
#[derive(EnumString, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PseudoSub {
  Home,
  Popular,
  All,
}

impl PseudoSub {
  pub fn parse(title: &str) -> Option<Self> {
    PseudoSub::from_str(title).ok()
  }

  pub fn description(&self) -> &'static str {
    match self {
      PseudoSub::Home => {
        "A collection of requests from the subs you're interested in. Your own personal frontpage."
      }
      PseudoSub::Popular => "The most popular requests from all over the site are collected here.",
      PseudoSub::All => "The most active requests from all over the site.",
    }
  }
}

impl Crud for Sub {
  type InsertForm = SubInsertForm;
  type UpdateForm = SubInsertForm;
  type IdType = SubId;

  fn create(conn: &mut SqliteConnection, form: &SubInsertForm) -> Result<Self, Error> {
    insert_into(sub::table).values(form).get_result::<Self>(conn)
  }

  fn read(conn: &mut SqliteConnection, sub_id: SubId) -> Result<Self, Error> {
    sub::table.find(sub_id).first::<Self>(conn)
  }
}

impl Sub {
  pub fn read_from_title(conn: &mut SqliteConnection, title: &str) -> Result<Self, Error> {
    sub::table.filter(sub::title.eq(title)).first::<Self>(conn)
  }

  pub fn list(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
  ) -> Result<Vec<Self>, Error> {
    let mut query = sub::table.into_boxed();
    if let Some(search_term) = search_term {
      query = query.filter(sub::title.like(fuzzy_search(&search_term)));
    }
    let (limit, offset) = limit_and_offset(page, limit);
    query
      .order_by(sub::id.asc())
      .limit(limit)
      .offset(offset)
      .load::<Self>(conn)
  }

  pub fn member_count(conn: &mut SqliteConnection, sub_id: SubId) -> Result<i64, Error> {
    sub_membership::table
      .filter(sub_membership::sub_id.eq(sub_id))
      .count()
      .get_result(conn)
  }

  pub fn moderator_count(conn: &mut SqliteConnection, sub_id: SubId) -> Result<i64, Error> {
    sub_moderator::table
      .filter(sub_moderator::sub_id.eq(sub_id))
      .count()
      .get_result(conn)
  }
}

#[derive(Clone, Queryable, Identifiable, PartialEq, Debug, Serialize)]
#[diesel(table_name = sub_membership)]
pub struct SubMembership {
  pub id: i32,
  pub sub_id: SubId,
  pub user_id: UserId,
  pub published: NaiveDateTime,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = sub_membership)]
pub struct SubMembershipForm {
  pub sub_id: SubId,
  pub user_id: UserId,
}

impl Joinable for SubMembership {
  type Form = SubMembershipForm;

  /// Re-joining an already joined sub keeps the original row.
  fn join(conn: &mut SqliteConnection, form: &SubMembershipForm) -> Result<Self, Error> {
    insert_into(sub_membership::table)
      .values(form)
      .on_conflict((sub_membership::sub_id, sub_membership::user_id))
      .do_nothing()
      .execute(conn)?;
    sub_membership::table
      .filter(sub_membership::sub_id.eq(form.sub_id))
      .filter(sub_membership::user_id.eq(form.user_id))
      .first::<Self>(conn)
  }

  fn leave(conn: &mut SqliteConnection, form: &SubMembershipForm) -> Result<usize, Error> {
    diesel::delete(
      sub_membership::table
        .filter(sub_membership::sub_id.eq(form.sub_id))
        .filter(sub_membership::user_id.eq(form.user_id)),
    )
    .execute(conn)
  }
}

impl SubMembership {
  pub fn is_member(
    conn: &mut SqliteConnection,
    sub_id: SubId,
    user_id: UserId,
  ) -> Result<bool, Error> {
    sub_membership::table
      .filter(sub_membership::sub_id.eq(sub_id))
      .filter(sub_membership::user_id.eq(user_id))
      .select(sub_membership::id)
      .first::<i32>(conn)
      .optional()
      .map(|found| found.is_some())
  }

  pub fn subs_for_user(conn: &mut SqliteConnection, user_id: UserId) -> Result<Vec<Sub>, Error> {
    sub_membership::table
      .inner_join(sub::table)
      .filter(sub_membership::user_id.eq(user_id))
      .order_by(sub::id.asc())
      .select(sub::all_columns)
      .load::<Sub>(conn)
  }
}

#[derive(Clone, Queryable, Identifiable, PartialEq, Debug, Serialize)]
#[diesel(table_name = sub_moderator)]
pub struct SubModerator {
  pub id: i32,
  pub sub_id: SubId,
  pub user_id: UserId,
  pub published: NaiveDateTime,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = sub_moderator)]
pub struct SubModeratorForm {
  pub sub_id: SubId,
  pub user_id: UserId,
}

impl Joinable for SubModerator {
  type Form = SubModeratorForm;

  fn join(conn: &mut SqliteConnection, form: &SubModeratorForm) -> Result<Self, Error> {
    insert_into(sub_moderator::table)
      .values(form)
      .on_conflict((sub_moderator::sub_id, sub_moderator::user_id))
      .do_nothing()
      .execute(conn)?;
    sub_moderator::table
      .filter(sub_moderator::sub_id.eq(form.sub_id))
      .filter(sub_moderator::user_id.eq(form.user_id))
      .first::<Self>(conn)
  }

  fn leave(conn: &mut SqliteConnection, form: &SubModeratorForm) -> Result<usize, Error> {
    diesel::delete(
      sub_moderator::table
        .filter(sub_moderator::sub_id.eq(form.sub_id))
        .filter(sub_moderator::user_id.eq(form.user_id)),
    )
    .execute(conn)
  }
}

impl SubModerator {
  pub fn is_moderator(
    conn: &mut SqliteConnection,
    sub_id: SubId,
    user_id: UserId,
  ) -> Result<bool, Error> {
    sub_moderator::table
      .filter(sub_moderator::sub_id.eq(sub_id))
      .filter(sub_moderator::user_id.eq(user_id))
      .select(sub_moderator::id)
      .first::<i32>(conn)
      .optional()
      .map(|found| found.is_some())
  }

  pub fn subs_for_user(conn: &mut SqliteConnection, user_id: UserId) -> Result<Vec<Sub>, Error> {
    sub_moderator::table
      .inner_join(sub::table)
      .filter(sub_moderator::user_id.eq(user_id))
      .order_by(sub::id.asc())
      .select(sub::all_columns)
      .load::<Sub>(conn)
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    establish_unpooled_connection,
    source::{sub::*, user::*},
    Crud,
    Joinable,
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

    let new_sub = SubInsertForm {
      title: "microloans".into(),
      description: Some("small loans between neighbors".into()),
    };

    let inserted_sub = Sub::create(conn, &new_sub).unwrap();

    let expected_sub = Sub {
      id: inserted_sub.id,
      title: "microloans".into(),
      description: "small loans between neighbors".into(),
      published: inserted_sub.published,
      updated: None,
    };

    let read_sub = Sub::read_from_title(conn, "microloans").unwrap();
    assert_eq!(expected_sub, inserted_sub);
    assert_eq!(expected_sub, read_sub);

    // membership join is idempotent
    let membership_form = SubMembershipForm {
      sub_id: inserted_sub.id,
      user_id: inserted_user.id,
    };
    let joined = SubMembership::join(conn, &membership_form).unwrap();
    let joined_again = SubMembership::join(conn, &membership_form).unwrap();
    assert_eq!(joined, joined_again);
    assert!(SubMembership::is_member(conn, inserted_sub.id, inserted_user.id).unwrap());
    assert_eq!(1, Sub::member_count(conn, inserted_sub.id).unwrap());

    let left = SubMembership::leave(conn, &membership_form).unwrap();
    assert_eq!(1, left);
    assert!(!SubMembership::is_member(conn, inserted_sub.id, inserted_user.id).unwrap());

    // leaving twice deletes nothing
    let left_again = SubMembership::leave(conn, &membership_form).unwrap();
    assert_eq!(0, left_again);

    let moderator_form = SubModeratorForm {
      sub_id: inserted_sub.id,
      user_id: inserted_user.id,
    };
    SubModerator::join(conn, &moderator_form).unwrap();
    assert!(SubModerator::is_moderator(conn, inserted_sub.id, inserted_user.id).unwrap());
    assert_eq!(
      vec!["microloans".to_string()],
      SubModerator::subs_for_user(conn, inserted_user.id)
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect::<Vec<_>>()
    );
  }

  #[test]
  fn test_duplicate_title_rejected() {
    let conn = &mut establish_unpooled_connection();
    let form = SubInsertForm {
      title: "microloans".into(),
      description: None,
    };
    Sub::create(conn, &form).unwrap();
    assert!(Sub::create(conn, &form).is_err());
  }

  #[test]
  fn test_pseudo_sub_titles_are_reserved() {
    for title in ["Home", "home", "hOme", "Popular", "All"] {
      assert!(PseudoSub::parse(title).is_some());
    }
    assert!(PseudoSub::parse("microloans").is_none());
  }
}
