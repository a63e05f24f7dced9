use chrono::NaiveDateTime;
use lendit_db::source::user::User_;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct Register {
  pub name: String,
  pub email: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
  pub user: User_,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserDetails {
  pub username: String,
}

/// Public profile. No email here.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserDetailsResponse {
  pub name: String,
  pub karma: i64,
  pub published: NaiveDateTime,
  pub subs: Vec<String>,
  pub moderated_subs: Vec<String>,
}

/// Compact form used by search results.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
  pub name: String,
  pub karma: i64,
}
