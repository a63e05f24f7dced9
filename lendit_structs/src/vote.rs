use lendit_db::source::vote::VoteTarget;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct CreateVote {
  pub target: VoteTarget,
  /// -1, 0 or +1. Sending the score the voter already has cancels the vote.
  pub score: i16,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct VoteResponse {
  /// The voter's resulting vote on the target.
  pub score: i16,
  /// The target's updated net vote count.
  pub upvotes: i64,
}
