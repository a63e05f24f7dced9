use lendit_db::{newtypes::SubId, source::sub::Sub};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct CreateSub {
  pub title: String,
  pub description: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubResponse {
  pub sub: Sub,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetSub {
  pub title: String,
}

/// Detail view of a persisted sub or one of the virtual ones. The virtual
/// subs carry no id and no counts.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubDetailResponse {
  pub sub_id: Option<SubId>,
  pub title: String,
  pub description: String,
  pub members: Option<i64>,
  pub moderators: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListSubs {
  pub search_term: Option<String>,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListSubsResponse {
  pub subs: Vec<Sub>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FollowSub {
  pub sub_title: String,
  /// false unsubscribes.
  pub follow: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FollowSubResponse {
  pub sub_title: String,
  pub joined: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListUserSubs {
  pub username: String,
}
