use crate::{require_user, LenditContext, Perform};
use diesel::Connection;
use lendit_db::{
  aggregates::user_karma,
  newtypes::UserId,
  source::{
    comment::Comment,
    post::Post,
    vote::{Vote, VoteForm, VoteTarget, DOWNVOTE, NO_VOTE, UPVOTE},
  },
  Crud,
  Likeable,
};
use lendit_structs::vote::{CreateVote, VoteResponse};
use lendit_utils::error::{LenditError, LenditErrorExt, LenditErrorType, LenditResult};

impl Perform for CreateVote {
  type Response = VoteResponse;

  /// Toggle semantics per (actor, target): no vote yet creates the
  /// requested vote; repeating the current vote resets it to 0; anything
  /// else moves straight to the requested value. The ledger write, the
  /// target's count refresh and the author's karma recompute commit
  /// together or not at all.
  #[tracing::instrument(skip(context))]
  fn perform(&self, context: &LenditContext, actor: Option<UserId>) -> LenditResult<VoteResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    if ![UPVOTE, NO_VOTE, DOWNVOTE].contains(&self.score) {
      return Err(LenditErrorType::InvalidVoteValue.into());
    }

    let target = self.target;
    let requested_score = self.score;

    conn.transaction::<VoteResponse, LenditError, _>(|conn| {
      // the target must exist, and its author is needed for the karma step
      let author_id = match target {
        VoteTarget::Comment(comment_id) => {
          Comment::read(conn, comment_id)
            .with_lendit_type(LenditErrorType::CouldntFindComment)?
            .creator_id
        }
        VoteTarget::Post(post_id) => {
          Post::read(conn, post_id)
            .with_lendit_type(LenditErrorType::CouldntFindPost)?
            .creator_id
        }
      };

      let new_score = match Vote::read_for_target(conn, user.id, target)? {
        // double vote cancels
        Some(existing) if existing.score == requested_score => NO_VOTE,
        // DOWN to UP (and the reverse) skips through neutral in one step
        _ => requested_score,
      };

      let vote = Vote::like(conn, &VoteForm::new(user.id, target, new_score))?;

      let upvotes = Vote::score_for_target(conn, target)?;
      match target {
        VoteTarget::Comment(comment_id) => {
          Comment::update_upvotes(conn, comment_id, upvotes)?;
        }
        VoteTarget::Post(post_id) => {
          Post::update_upvotes(conn, post_id, upvotes)?;
        }
      }

      // soft-deleted content has no author anymore; karma goes untouched
      if let Some(author_id) = author_id {
        user_karma::refresh(conn, author_id)?;
      }

      Ok(VoteResponse {
        score: vote.score,
        upvotes,
      })
    })
  }
}
