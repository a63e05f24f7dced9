use crate::{get_sub_by_title, get_user_by_name, require_user, LenditContext, Perform};
use lendit_db::{
  newtypes::UserId,
  source::sub::{
    PseudoSub,
    Sub,
    SubInsertForm,
    SubMembership,
    SubMembershipForm,
    SubModerator,
    SubModeratorForm,
  },
  Crud,
  Joinable,
};
use lendit_structs::sub::{
  CreateSub,
  FollowSub,
  FollowSubResponse,
  GetSub,
  ListSubs,
  ListSubsResponse,
  ListUserSubs,
  SubDetailResponse,
  SubResponse,
};
use lendit_utils::{
  error::{LenditErrorExt, LenditErrorType, LenditResult},
  utils::is_valid_sub_title,
};

impl Perform for CreateSub {
  type Response = SubResponse;

  /// The creator becomes the sub's first moderator and member.
  #[tracing::instrument(skip(context))]
  fn perform(&self, context: &LenditContext, actor: Option<UserId>) -> LenditResult<SubResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;

    if PseudoSub::parse(&self.title).is_some() {
      return Err(LenditErrorType::ReservedSubTitle(self.title.clone()).into());
    }
    if !is_valid_sub_title(&self.title) {
      return Err(LenditErrorType::InvalidSubTitle.into());
    }

    let form = SubInsertForm {
      title: self.title.clone(),
      description: self.description.clone(),
    };
    let sub = Sub::create(conn, &form).with_lendit_type(LenditErrorType::SubAlreadyExists)?;

    SubModerator::join(
      conn,
      &SubModeratorForm {
        sub_id: sub.id,
        user_id: user.id,
      },
    )?;
    SubMembership::join(
      conn,
      &SubMembershipForm {
        sub_id: sub.id,
        user_id: user.id,
      },
    )?;

    Ok(SubResponse { sub })
  }
}

impl Perform for GetSub {
  type Response = SubDetailResponse;

  /// The virtual subs answer here too, with their canned description and
  /// no counts; they are never read from (or written to) the sub table.
  fn perform(
    &self,
    context: &LenditContext,
    _actor: Option<UserId>,
  ) -> LenditResult<SubDetailResponse> {
    let conn = &mut context.conn()?;

    if let Some(pseudo) = PseudoSub::parse(&self.title) {
      return Ok(SubDetailResponse {
        sub_id: None,
        title: pseudo.to_string(),
        description: pseudo.description().to_owned(),
        members: None,
        moderators: None,
      });
    }

    let sub = get_sub_by_title(conn, &self.title)?;
    let members = Sub::member_count(conn, sub.id)?;
    let moderators = Sub::moderator_count(conn, sub.id)?;

    Ok(SubDetailResponse {
      sub_id: Some(sub.id),
      title: sub.title,
      description: sub.description,
      members: Some(members),
      moderators: Some(moderators),
    })
  }
}

impl Perform for ListSubs {
  type Response = ListSubsResponse;

  fn perform(
    &self,
    context: &LenditContext,
    _actor: Option<UserId>,
  ) -> LenditResult<ListSubsResponse> {
    let conn = &mut context.conn()?;
    let subs = Sub::list(conn, self.search_term.clone(), self.page, self.limit)?;
    Ok(ListSubsResponse { subs })
  }
}

impl Perform for FollowSub {
  type Response = FollowSubResponse;

  /// Subscribing twice is a no-op; unsubscribing without a membership is
  /// reported as missing.
  #[tracing::instrument(skip(context))]
  fn perform(
    &self,
    context: &LenditContext,
    actor: Option<UserId>,
  ) -> LenditResult<FollowSubResponse> {
    let conn = &mut context.conn()?;
    let user = require_user(conn, actor)?;
    let sub = get_sub_by_title(conn, &self.sub_title)?;

    let form = SubMembershipForm {
      sub_id: sub.id,
      user_id: user.id,
    };
    if self.follow {
      SubMembership::join(conn, &form)?;
    } else {
      let left = SubMembership::leave(conn, &form)?;
      if left == 0 {
        return Err(LenditErrorType::NotSubMember.into());
      }
    }

    Ok(FollowSubResponse {
      sub_title: sub.title,
      joined: self.follow,
    })
  }
}

impl Perform for ListUserSubs {
  type Response = ListSubsResponse;

  fn perform(
    &self,
    context: &LenditContext,
    _actor: Option<UserId>,
  ) -> LenditResult<ListSubsResponse> {
    let conn = &mut context.conn()?;
    let user = get_user_by_name(conn, &self.username)?;
    let subs = SubMembership::subs_for_user(conn, user.id)?;
    Ok(ListSubsResponse { subs })
  }
}
