//! Sample-data generation. Lives outside the operation core and drives it
//! strictly through the public operations, the same way a web layer would.

use fake::{
  faker::lorem::en::{Paragraph, Sentence, Word},
  Fake,
};
use lendit_api::{LenditContext, Perform};
use lendit_db::{
  newtypes::{PostId, UserId},
  source::vote::{VoteTarget, DOWNVOTE, UPVOTE},
};
use lendit_structs::{
  comment::CreateComment,
  post::CreatePost,
  sub::{CreateSub, FollowSub},
  user::Register,
  vote::CreateVote,
};
use lendit_utils::{error::LenditResult, settings::SeedConfig};
use rand::{seq::SliceRandom, Rng};

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
  pub users: usize,
  pub subs: usize,
  pub posts: usize,
  pub comments: usize,
  pub votes: usize,
}

pub fn run(context: &LenditContext, config: &SeedConfig) -> LenditResult<SeedSummary> {
  let rng = &mut rand::thread_rng();
  let mut summary = SeedSummary::default();

  let mut users: Vec<UserId> = Vec::new();
  for i in 0..config.users {
    let name = format!("{}_{}", Word().fake::<String>(), i);
    let user = Register { name, email: None }.perform(context, None)?.user;
    users.push(user.id);
    summary.users += 1;
  }

  // each sub tracks its members; only members may post there
  let mut subs: Vec<(String, Vec<UserId>)> = Vec::new();
  for i in 0..config.subs {
    let title = format!("{}_{}", Word().fake::<String>(), i);
    let creator = *users.choose(rng).expect("at least one user");
    let sub = CreateSub {
      title,
      description: Some(Sentence(3..8).fake()),
    }
    .perform(context, Some(creator))?
    .sub;

    let mut members = vec![creator];
    for user_id in &users {
      if *user_id != creator && rng.gen_bool(0.6) {
        FollowSub {
          sub_title: sub.title.clone(),
          follow: true,
        }
        .perform(context, Some(*user_id))?;
        members.push(*user_id);
      }
    }
    subs.push((sub.title, members));
    summary.subs += 1;
  }

  let mut posts: Vec<PostId> = Vec::new();
  for (sub_title, members) in &subs {
    for _ in 0..config.posts_per_sub {
      let author = *members.choose(rng).expect("subs always have a member");
      let post = CreatePost {
        sub_title: sub_title.clone(),
        title: Sentence(3..8).fake(),
        body: Some(Paragraph(1..3).fake()),
      }
      .perform(context, Some(author))?
      .post_view
      .post;
      posts.push(post.id);
      summary.posts += 1;
    }
  }

  for post_id in &posts {
    // roughly half the comments reply to an earlier comment on the post
    let mut thread = Vec::new();
    for _ in 0..config.comments_per_post {
      let author = *users.choose(rng).expect("at least one user");
      let parent_id = if thread.is_empty() || rng.gen_bool(0.5) {
        None
      } else {
        thread.choose(rng).copied()
      };
      let comment = CreateComment {
        post_id: *post_id,
        parent_id,
        body: Paragraph(1..3).fake(),
      }
      .perform(context, Some(author))?
      .comment;
      thread.push(comment.id);
      summary.comments += 1;
    }

    for user_id in &users {
      if rng.gen_bool(0.5) {
        let score = if rng.gen_bool(0.8) { UPVOTE } else { DOWNVOTE };
        CreateVote {
          target: VoteTarget::Post(*post_id),
          score,
        }
        .perform(context, Some(*user_id))?;
        summary.votes += 1;
      }
      if let Some(comment_id) = thread.choose(rng) {
        if rng.gen_bool(0.4) {
          let score = if rng.gen_bool(0.8) { UPVOTE } else { DOWNVOTE };
          CreateVote {
            target: VoteTarget::Comment(*comment_id),
            score,
          }
          .perform(context, Some(*user_id))?;
          summary.votes += 1;
        }
      }
    }
  }

  Ok(summary)
}
