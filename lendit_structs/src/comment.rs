use lendit_db::{
  newtypes::{CommentId, PostId},
  source::comment::Comment,
  views::comment_tree::CommentTreeNode,
  RankType,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct CreateComment {
  pub post_id: PostId,
  pub parent_id: Option<CommentId>,
  pub body: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EditComment {
  pub comment_id: CommentId,
  pub body: String,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct DeleteComment {
  pub comment_id: CommentId,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CommentResponse {
  pub comment: Comment,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ListCommentTree {
  pub post_id: PostId,
  pub rank: Option<RankType>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListCommentTreeResponse {
  pub comments: Vec<CommentTreeNode>,
}
