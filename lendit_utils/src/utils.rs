use regex::Regex;

lazy_static! {
  static ref VALID_USERNAME_REGEX: Regex =
    Regex::new(r"^[a-zA-Z0-9_]{3,30}$").expect("compile username regex");
  static ref VALID_SUB_TITLE_REGEX: Regex =
    Regex::new(r"^[a-z0-9_]{3,40}$").expect("compile sub title regex");
}

const POST_TITLE_MAX_LENGTH: usize = 150;

pub fn is_valid_username(name: &str) -> bool {
  VALID_USERNAME_REGEX.is_match(name)
}

pub fn is_valid_sub_title(title: &str) -> bool {
  VALID_SUB_TITLE_REGEX.is_match(title)
}

/// Title must be non-blank and at most 150 characters.
pub fn is_valid_post_title(title: &str) -> bool {
  let trimmed = title.trim();
  !trimmed.is_empty() && trimmed.chars().count() <= POST_TITLE_MAX_LENGTH
}
