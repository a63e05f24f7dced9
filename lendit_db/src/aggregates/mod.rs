pub mod user_karma;
