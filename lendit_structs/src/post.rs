use lendit_db::{newtypes::PostId, views::post_view::PostView, RankType};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct CreatePost {
  pub sub_title: String,
  pub title: String,
  pub body: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EditPost {
  pub post_id: PostId,
  pub body: String,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct DeletePost {
  pub post_id: PostId,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct GetPost {
  pub post_id: PostId,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PostResponse {
  pub post_view: PostView,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListPosts {
  /// A persisted sub title, or one of the virtual feeds `home`, `popular`
  /// and `all`.
  pub sub_title: String,
  pub rank: Option<RankType>,
  pub search_term: Option<String>,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListUserPosts {
  pub username: String,
  pub rank: Option<RankType>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListPostsResponse {
  pub posts: Vec<PostView>,
}
