use serde::{Deserialize, Serialize};
use std::{
  backtrace::Backtrace,
  fmt,
  fmt::{Debug, Display},
};

pub type LenditResult<T> = Result<T, LenditError>;

#[derive(Display, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, EnumIter, Hash)]
#[serde(tag = "error", content = "message", rename_all = "snake_case")]
#[non_exhaustive]
pub enum LenditErrorType {
  NotLoggedIn,
  NotFound,
  CouldntFindUser(String),
  CouldntFindSub(String),
  CouldntFindPost,
  CouldntFindComment,
  InvalidVoteValue,
  ReservedSubTitle(String),
  SubAlreadyExists,
  NotSubMember,
  UsernameAlreadyExists,
  EmailAlreadyExists,
  InvalidUsername,
  InvalidSubTitle,
  InvalidPostTitle,
  InvalidBodyField,
  NoPostEditAllowed,
  NoCommentEditAllowed,
  CommentParentPostMismatch,
  Unknown(String),
}

pub struct LenditError {
  pub error_type: LenditErrorType,
  pub inner: anyhow::Error,
  pub context: Backtrace,
}

impl<T> From<T> for LenditError
where
  T: Into<anyhow::Error>,
{
  fn from(t: T) -> Self {
    let cause = t.into();
    let error_type = match cause.downcast_ref::<diesel::result::Error>() {
      Some(&diesel::NotFound) => LenditErrorType::NotFound,
      _ => LenditErrorType::Unknown(format!("{}", &cause)),
    };
    LenditError {
      error_type,
      inner: cause,
      context: Backtrace::capture(),
    }
  }
}

impl Debug for LenditError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LenditError")
      .field("message", &self.error_type)
      .field("inner", &self.inner)
      .field("context", &self.context)
      .finish()
  }
}

impl Display for LenditError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}: ", &self.error_type)?;
    writeln!(f, "{}", self.inner)?;
    fmt::Display::fmt(&self.context, f)
  }
}

impl From<LenditErrorType> for LenditError {
  fn from(error_type: LenditErrorType) -> Self {
    let inner = anyhow::anyhow!("{}", error_type);
    LenditError {
      error_type,
      inner,
      context: Backtrace::capture(),
    }
  }
}

pub trait LenditErrorExt<T, E: Into<anyhow::Error>> {
  fn with_lendit_type(self, error_type: LenditErrorType) -> LenditResult<T>;
}

impl<T, E: Into<anyhow::Error>> LenditErrorExt<T, E> for Result<T, E> {
  fn with_lendit_type(self, error_type: LenditErrorType) -> LenditResult<T> {
    self.map_err(|error| LenditError {
      error_type,
      inner: error.into(),
      context: Backtrace::capture(),
    })
  }
}

pub trait LenditErrorExt2<T> {
  fn with_lendit_type(self, error_type: LenditErrorType) -> LenditResult<T>;
  fn into_anyhow(self) -> Result<T, anyhow::Error>;
}

impl<T> LenditErrorExt2<T> for LenditResult<T> {
  fn with_lendit_type(self, error_type: LenditErrorType) -> LenditResult<T> {
    self.map_err(|mut e| {
      e.error_type = error_type;
      e
    })
  }

  // can't be a From impl, it would overlap with the blanket Into<anyhow::Error> one
  fn into_anyhow(self) -> Result<T, anyhow::Error> {
    self.map_err(|e| e.inner)
  }
}
