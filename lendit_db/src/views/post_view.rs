use crate::{
  fuzzy_search,
  limit_and_offset,
  newtypes::{PostId, SubId, UserId},
  schema::{post, sub, sub_membership, user_},
  source::post::Post,
  MaybeOptional,
  RankType,
  ViewToVec,
};
use diesel::{prelude::*, result::Error};
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct PostView {
  pub post: Post,
  pub creator_name: Option<String>,
  pub sub_title: String,
}

type PostViewTuple = (Post, Option<String>, String);

impl ViewToVec for PostView {
  type DbTuple = PostViewTuple;
  fn from_tuple_to_vec(items: Vec<Self::DbTuple>) -> Vec<Self> {
    items
      .into_iter()
      .map(|a| PostView {
        post: a.0,
        creator_name: a.1,
        sub_title: a.2,
      })
      .collect()
  }
}

impl PostView {
  pub fn read(conn: &mut SqliteConnection, post_id: PostId) -> Result<Self, Error> {
    let (post, creator_name, sub_title) = post::table
      .find(post_id)
      .left_join(user_::table.on(post::creator_id.eq(user_::id.nullable())))
      .inner_join(sub::table)
      .select((post::all_columns, user_::name.nullable(), sub::title))
      .first::<PostViewTuple>(conn)?;
    Ok(PostView {
      post,
      creator_name,
      sub_title,
    })
  }
}

/// Which feed a listing draws from. The pseudo-sub feeds are computed here
/// on read; nothing about them is ever persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostListing {
  /// A persisted sub.
  Sub(SubId),
  /// `home` for a signed-in reader: only their subscribed subs.
  Subscribed(UserId),
  /// `popular`: net vote count above the threshold.
  Popular(i64),
  /// `all`, and `home` for anonymous readers.
  All,
}

pub struct PostQueryBuilder<'a> {
  conn: &'a mut SqliteConnection,
  listing: PostListing,
  rank: RankType,
  for_creator_id: Option<UserId>,
  search_term: Option<String>,
  page: Option<i64>,
  limit: Option<i64>,
}

impl<'a> PostQueryBuilder<'a> {
  pub fn create(conn: &'a mut SqliteConnection) -> Self {
    PostQueryBuilder {
      conn,
      listing: PostListing::All,
      rank: RankType::Best,
      for_creator_id: None,
      search_term: None,
      page: None,
      limit: None,
    }
  }

  pub fn listing(mut self, listing: PostListing) -> Self {
    self.listing = listing;
    self
  }

  pub fn rank(mut self, rank: RankType) -> Self {
    self.rank = rank;
    self
  }

  pub fn for_creator_id<T: MaybeOptional<UserId>>(mut self, for_creator_id: T) -> Self {
    self.for_creator_id = for_creator_id.get_optional();
    self
  }

  pub fn search_term<T: MaybeOptional<String>>(mut self, search_term: T) -> Self {
    self.search_term = search_term.get_optional();
    self
  }

  pub fn page<T: MaybeOptional<i64>>(mut self, page: T) -> Self {
    self.page = page.get_optional();
    self
  }

  pub fn limit<T: MaybeOptional<i64>>(mut self, limit: T) -> Self {
    self.limit = limit.get_optional();
    self
  }

  pub fn list(self) -> Result<Vec<PostView>, Error> {
    let mut query = post::table
      .left_join(user_::table.on(post::creator_id.eq(user_::id.nullable())))
      .inner_join(sub::table)
      .select((post::all_columns, user_::name.nullable(), sub::title))
      .into_boxed();

    query = match self.listing {
      PostListing::Sub(sub_id) => query.filter(post::sub_id.eq(sub_id)),
      PostListing::Subscribed(user_id) => {
        let subscribed = sub_membership::table
          .filter(sub_membership::user_id.eq(user_id))
          .select(sub_membership::sub_id);
        query.filter(post::sub_id.eq_any(subscribed))
      }
      PostListing::Popular(threshold) => query.filter(post::upvotes.gt(threshold)),
      PostListing::All => query,
    };

    if let Some(for_creator_id) = self.for_creator_id {
      query = query.filter(post::creator_id.eq(for_creator_id));
    }

    if let Some(search_term) = self.search_term {
      let pattern = fuzzy_search(&search_term);
      query = query.filter(
        post::title
          .like(pattern.clone())
          .or(post::body.like(pattern)),
      );
    }

    query = match self.rank {
      RankType::Best => query
        .order_by(post::upvotes.desc())
        .then_order_by(post::id.asc()),
      RankType::New => query
        .order_by(post::published.desc())
        .then_order_by(post::id.desc()),
    };

    let (limit, offset) = limit_and_offset(self.page, self.limit);
    let res = query
      .limit(limit)
      .offset(offset)
      .load::<PostViewTuple>(self.conn)?;

    Ok(PostView::from_tuple_to_vec(res))
  }
}
