use crate::{get_user_by_name, LenditContext, Perform};
use lendit_db::{
  newtypes::UserId,
  source::{
    sub::{SubMembership, SubModerator},
    user::{UserInsertForm, User_},
  },
  Crud,
};
use lendit_structs::user::{
  GetUserDetails,
  Register,
  UserDetailsResponse,
  UserResponse,
};
use lendit_utils::{
  error::{LenditErrorType, LenditResult},
  utils::is_valid_username,
};

impl Perform for Register {
  type Response = UserResponse;

  #[tracing::instrument(skip(context))]
  fn perform(&self, context: &LenditContext, _actor: Option<UserId>) -> LenditResult<UserResponse> {
    let conn = &mut context.conn()?;

    if !is_valid_username(&self.name) {
      return Err(LenditErrorType::InvalidUsername.into());
    }
    if User_::read_from_name(conn, &self.name).is_ok() {
      return Err(LenditErrorType::UsernameAlreadyExists.into());
    }
    if let Some(email) = &self.email {
      if User_::read_from_email(conn, email).is_ok() {
        return Err(LenditErrorType::EmailAlreadyExists.into());
      }
    }

    let form = UserInsertForm {
      name: self.name.clone(),
      email: self.email.clone(),
      admin: None,
    };
    let user = User_::create(conn, &form)?;

    Ok(UserResponse { user })
  }
}

impl Perform for GetUserDetails {
  type Response = UserDetailsResponse;

  /// Public profile: karma plus subscribed and moderated sub titles.
  fn perform(
    &self,
    context: &LenditContext,
    _actor: Option<UserId>,
  ) -> LenditResult<UserDetailsResponse> {
    let conn = &mut context.conn()?;
    let user = get_user_by_name(conn, &self.username)?;

    let subs = SubMembership::subs_for_user(conn, user.id)?
      .into_iter()
      .map(|s| s.title)
      .collect();
    let moderated_subs = SubModerator::subs_for_user(conn, user.id)?
      .into_iter()
      .map(|s| s.title)
      .collect();

    Ok(UserDetailsResponse {
      name: user.name,
      karma: user.karma,
      published: user.published,
      subs,
      moderated_subs,
    })
  }
}
