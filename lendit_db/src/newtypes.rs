use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
  Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
  DieselNewType,
)]
pub struct UserId(pub i32);

#[derive(
  Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
  DieselNewType,
)]
pub struct SubId(pub i32);

#[derive(
  Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
  DieselNewType,
)]
pub struct PostId(pub i32);

#[derive(
  Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
  DieselNewType,
)]
pub struct CommentId(pub i32);

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for PostId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for CommentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
