use crate::{LenditContext, Perform};
use lendit_db::{
  newtypes::UserId,
  source::{sub::Sub, user::User_},
  views::post_view::PostQueryBuilder,
};
use lendit_structs::{
  search::{Search, SearchResponse},
  user::UserSummary,
};
use lendit_utils::error::LenditResult;

impl Perform for Search {
  type Response = SearchResponse;

  /// One query param, one round trip: matching posts, subs and users.
  #[tracing::instrument(skip(context))]
  fn perform(&self, context: &LenditContext, _actor: Option<UserId>) -> LenditResult<SearchResponse> {
    let conn = &mut context.conn()?;

    let posts = PostQueryBuilder::create(conn)
      .search_term(self.q.clone())
      .list()?;
    let subs = Sub::list(conn, Some(self.q.clone()), None, None)?;
    let users = User_::list_by_name(conn, &self.q)?
      .into_iter()
      .map(|u| UserSummary {
        name: u.name,
        karma: u.karma,
      })
      .collect();

    Ok(SearchResponse { posts, subs, users })
  }
}
