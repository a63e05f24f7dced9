use crate::user::UserSummary;
use lendit_db::{source::sub::Sub, views::post_view::PostView};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct Search {
  pub q: String,
}

/// One round trip, a result list per entity type.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchResponse {
  pub posts: Vec<PostView>,
  pub subs: Vec<Sub>,
  pub users: Vec<UserSummary>,
}
