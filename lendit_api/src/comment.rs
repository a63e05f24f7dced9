use crate::{get_comment, get_post, require_user, LenditContext, Perform};
use lendit_db::{
  naive_now,
  newtypes::UserId,
  source::comment::{Comment, CommentInsertForm, CommentUpdateForm},
  views::comment_tree,
  Crud,
};
use lendit_structs::comment::{
  CommentResponse,
  CreateComment,
  DeleteComment,
  EditComment,
  ListCommentTree,
  ListCommentTreeResponse,
};
use lendit_utils::error::{LenditErrorType, LenditResult};

impl Perform for CreateComment {
  type Response = CommentResponse;

  #[tracing::instrument(skip(context))]
  fn perform(
    &self,
    context: &LenditContext,
    actor: Option<UserId>,
  ) -> LenditResult<CommentResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    if self.body.trim().is_empty() {
      return Err(LenditErrorType::InvalidBodyField.into());
    }

    let post = get_post(conn, self.post_id)?;

    // a reply stays inside its parent's post; threads never span posts
    if let Some(parent_id) = self.parent_id {
      let parent = get_comment(conn, parent_id)?;
      if parent.post_id != post.id {
        return Err(LenditErrorType::CommentParentPostMismatch.into());
      }
    }

    let form = CommentInsertForm {
      post_id: post.id,
      creator_id: Some(user.id),
      parent_id: self.parent_id,
      body: self.body.clone(),
      published: None,
    };
    let comment = Comment::create(conn, &form)?;

    Ok(CommentResponse { comment })
  }
}

impl Perform for EditComment {
  type Response = CommentResponse;

  fn perform(
    &self,
    context: &LenditContext,
    actor: Option<UserId>,
  ) -> LenditResult<CommentResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    if self.body.trim().is_empty() {
      return Err(LenditErrorType::InvalidBodyField.into());
    }

    let orig_comment = get_comment(conn, self.comment_id)?;
    if orig_comment.creator_id != Some(user.id) {
      return Err(LenditErrorType::NoCommentEditAllowed.into());
    }

    let form = CommentUpdateForm {
      body: Some(self.body.clone()),
      updated: Some(Some(naive_now())),
    };
    let comment = Comment::update(conn, self.comment_id, &form)?;

    Ok(CommentResponse { comment })
  }
}

impl Perform for DeleteComment {
  type Response = CommentResponse;

  /// Reddit-style delete: the body and author reference are scrubbed but
  /// the comment, its votes, its voters and its creation date remain.
  fn perform(
    &self,
    context: &LenditContext,
    actor: Option<UserId>,
  ) -> LenditResult<CommentResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    let orig_comment = get_comment(conn, self.comment_id)?;
    if orig_comment.creator_id != Some(user.id) {
      return Err(LenditErrorType::NoCommentEditAllowed.into());
    }

    let comment = Comment::mark_deleted(conn, self.comment_id)?;

    Ok(CommentResponse { comment })
  }
}

impl Perform for ListCommentTree {
  type Response = ListCommentTreeResponse;

  /// The post's comments, nested and ordered: one bulk fetch, the ranking
  /// policy applied to the root list and to every sibling group.
  #[tracing::instrument(skip(context))]
  fn perform(
    &self,
    context: &LenditContext,
    _actor: Option<UserId>,
  ) -> LenditResult<ListCommentTreeResponse> {
    let conn = &mut context.conn()?;

    let post = get_post(conn, self.post_id)?;
    let rank = self.rank.unwrap_or_default();
    let comments = comment_tree::for_post(conn, post.id, rank)?;

    Ok(ListCommentTreeResponse { comments })
  }
}
