use crate::{
  newtypes::{CommentId, PostId},
  schema::{comment, user_},
  source::comment::Comment,
  RankType,
};
use chrono::NaiveDateTime;
use diesel::{prelude::*, result::Error};
use serde::Serialize;
use std::collections::HashMap;

/// One node of the assembled thread. Leaves carry an empty `children` list.
#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct CommentTreeNode {
  pub id: CommentId,
  pub body: String,
  pub creator_name: Option<String>,
  pub upvotes: i64,
  pub deleted: bool,
  pub published: NaiveDateTime,
  pub children: Vec<CommentTreeNode>,
}

/// The ordered comment forest of a post, built from ONE bulk fetch of the
/// flat comment set joined with author names. Query count stays O(1) per
/// post no matter how deep the thread goes.
pub fn for_post(
  conn: &mut SqliteConnection,
  post_id: PostId,
  rank: RankType,
) -> Result<Vec<CommentTreeNode>, Error> {
  let flat = comment::table
    .left_join(user_::table.on(comment::creator_id.eq(user_::id.nullable())))
    .filter(comment::post_id.eq(post_id))
    .order_by(comment::id.asc())
    .select((comment::all_columns, user_::name.nullable()))
    .load::<(Comment, Option<String>)>(conn)?;
  Ok(build_forest(flat, rank))
}

/// Groups the flat set by `parent_id`, sorts every sibling group with the
/// ranking policy, and recursively attaches children. Pure so ordering
/// properties are checkable without a database.
pub fn build_forest(
  flat: Vec<(Comment, Option<String>)>,
  rank: RankType,
) -> Vec<CommentTreeNode> {
  let mut children_of: HashMap<CommentId, Vec<CommentTreeNode>> = HashMap::new();
  let mut roots: Vec<CommentTreeNode> = Vec::new();

  for (comment, creator_name) in flat {
    let parent_id = comment.parent_id;
    let node = CommentTreeNode {
      id: comment.id,
      body: comment.body,
      creator_name,
      upvotes: comment.upvotes,
      deleted: comment.deleted,
      published: comment.published,
      children: Vec::new(),
    };
    match parent_id {
      Some(parent_id) => children_of.entry(parent_id).or_default().push(node),
      None => roots.push(node),
    }
  }

  sort_siblings(&mut roots, rank);
  roots
    .into_iter()
    .map(|root| attach(root, &mut children_of, rank))
    .collect()
}

fn attach(
  mut node: CommentTreeNode,
  children_of: &mut HashMap<CommentId, Vec<CommentTreeNode>>,
  rank: RankType,
) -> CommentTreeNode {
  if let Some(mut siblings) = children_of.remove(&node.id) {
    sort_siblings(&mut siblings, rank);
    node.children = siblings
      .into_iter()
      .map(|child| attach(child, children_of, rank))
      .collect();
  }
  node
}

/// Best: net votes descending, ties in creation order. New: newest first.
/// Both tie-breaks are total, so output order is independent of input order.
fn sort_siblings(siblings: &mut [CommentTreeNode], rank: RankType) {
  match rank {
    RankType::Best => siblings.sort_by(|a, b| b.upvotes.cmp(&a.upvotes).then(a.id.cmp(&b.id))),
    RankType::New => siblings.sort_by(|a, b| b.published.cmp(&a.published).then(b.id.cmp(&a.id))),
  }
}
