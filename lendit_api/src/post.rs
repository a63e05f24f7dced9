use crate::{get_post, get_sub_by_title, get_user_by_name, require_user, LenditContext, Perform};
use lendit_db::{
  naive_now,
  newtypes::UserId,
  source::{
    post::{Post, PostInsertForm, PostUpdateForm},
    sub::{PseudoSub, SubMembership, SubModerator},
  },
  views::post_view::{PostListing, PostQueryBuilder, PostView},
  Crud,
};
use lendit_structs::post::{
  CreatePost,
  DeletePost,
  EditPost,
  GetPost,
  ListPosts,
  ListPostsResponse,
  ListUserPosts,
  PostResponse,
};
use lendit_utils::{
  error::{LenditErrorExt, LenditErrorType, LenditResult},
  settings::Settings,
  utils::is_valid_post_title,
};

impl Perform for CreatePost {
  type Response = PostResponse;

  #[tracing::instrument(skip(context))]
  fn perform(&self, context: &LenditContext, actor: Option<UserId>) -> LenditResult<PostResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    if PseudoSub::parse(&self.sub_title).is_some() {
      return Err(LenditErrorType::ReservedSubTitle(self.sub_title.clone()).into());
    }
    let sub = get_sub_by_title(conn, &self.sub_title)?;

    if !is_valid_post_title(&self.title) {
      return Err(LenditErrorType::InvalidPostTitle.into());
    }
    // posting is for members only
    if !SubMembership::is_member(conn, sub.id, user.id)? {
      return Err(LenditErrorType::NotSubMember.into());
    }

    let form = PostInsertForm {
      sub_id: sub.id,
      creator_id: Some(user.id),
      title: self.title.trim().to_owned(),
      body: self.body.clone(),
      published: None,
    };
    let post = Post::create(conn, &form)?;
    let post_view = PostView::read(conn, post.id)?;

    Ok(PostResponse { post_view })
  }
}

/// Authors edit their own posts; sub moderators and admins may step in.
fn check_post_edit_allowed(
  conn: &mut diesel::SqliteConnection,
  post: &Post,
  user: &lendit_db::source::user::User_,
) -> LenditResult<()> {
  if post.creator_id == Some(user.id)
    || user.admin
    || SubModerator::is_moderator(conn, post.sub_id, user.id)?
  {
    Ok(())
  } else {
    Err(LenditErrorType::NoPostEditAllowed.into())
  }
}

impl Perform for EditPost {
  type Response = PostResponse;

  fn perform(&self, context: &LenditContext, actor: Option<UserId>) -> LenditResult<PostResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    let orig_post = get_post(conn, self.post_id)?;
    check_post_edit_allowed(conn, &orig_post, &user)?;

    let form = PostUpdateForm {
      body: Some(self.body.clone()),
      updated: Some(Some(naive_now())),
      ..PostUpdateForm::default()
    };
    Post::update(conn, self.post_id, &form)?;
    let post_view = PostView::read(conn, self.post_id)?;

    Ok(PostResponse { post_view })
  }
}

impl Perform for DeletePost {
  type Response = PostResponse;

  /// Soft delete, same shape as comment deletion: scrub and keep.
  fn perform(&self, context: &LenditContext, actor: Option<UserId>) -> LenditResult<PostResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    let orig_post = get_post(conn, self.post_id)?;
    check_post_edit_allowed(conn, &orig_post, &user)?;

    Post::mark_deleted(conn, self.post_id)?;
    let post_view = PostView::read(conn, self.post_id)?;

    Ok(PostResponse { post_view })
  }
}

impl Perform for GetPost {
  type Response = PostResponse;

  fn perform(&self, context: &LenditContext, _actor: Option<UserId>) -> LenditResult<PostResponse> {
    let conn = &mut context.conn()?;
    let post_view = PostView::read(conn, self.post_id)
      .with_lendit_type(LenditErrorType::CouldntFindPost)?;
    Ok(PostResponse { post_view })
  }
}

impl Perform for ListPosts {
  type Response = ListPostsResponse;

  /// Feeds: a persisted sub by title, or the virtual `home` / `popular` /
  /// `all`. Home falls back to everything for anonymous readers.
  #[tracing::instrument(skip(context))]
  fn perform(
    &self,
    context: &LenditContext,
    actor: Option<UserId>,
  ) -> LenditResult<ListPostsResponse> {
    let conn = &mut context.conn()?;

    let listing = match PseudoSub::parse(&self.sub_title) {
      Some(PseudoSub::Home) => match actor {
        Some(user_id) => PostListing::Subscribed(user_id),
        None => PostListing::All,
      },
      Some(PseudoSub::Popular) => PostListing::Popular(Settings::get().popular_threshold),
      Some(PseudoSub::All) => PostListing::All,
      None => PostListing::Sub(get_sub_by_title(conn, &self.sub_title)?.id),
    };

    let posts = PostQueryBuilder::create(conn)
      .listing(listing)
      .rank(self.rank.unwrap_or_default())
      .search_term(self.search_term.clone())
      .page(self.page)
      .limit(self.limit)
      .list()?;

    Ok(ListPostsResponse { posts })
  }
}

impl Perform for ListUserPosts {
  type Response = ListPostsResponse;

  fn perform(
    &self,
    context: &LenditContext,
    _actor: Option<UserId>,
  ) -> LenditResult<ListPostsResponse> {
    let conn = &mut context.conn()?;
    let user = get_user_by_name(conn, &self.username)?;

    let posts = PostQueryBuilder::create(conn)
      .for_creator_id(user.id)
      .rank(self.rank.unwrap_or_default())
      .list()?;

    Ok(ListPostsResponse { posts })
  }
}
