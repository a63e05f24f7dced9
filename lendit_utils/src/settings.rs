use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

static CONFIG_FILE: &str = "config/lendit.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Settings {
  pub database: DatabaseConfig,
  /// Minimum net vote count for a post to show up in the `popular` pseudo-sub.
  pub popular_threshold: i64,
  pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
  /// Path of the SQLite database file.
  pub file: String,
  pub pool_size: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SeedConfig {
  pub users: u32,
  pub subs: u32,
  pub posts_per_sub: u32,
  pub comments_per_post: u32,
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      database: DatabaseConfig::default(),
      popular_threshold: 1,
      seed: SeedConfig::default(),
    }
  }
}

impl Default for DatabaseConfig {
  fn default() -> Self {
    DatabaseConfig {
      file: "lendit.sqlite3".into(),
      pool_size: 5,
    }
  }
}

impl Default for SeedConfig {
  fn default() -> Self {
    SeedConfig {
      users: 10,
      subs: 3,
      posts_per_sub: 5,
      comments_per_post: 8,
    }
  }
}

lazy_static! {
  static ref SETTINGS: RwLock<Settings> = RwLock::new(match Settings::init() {
    Ok(c) => c,
    Err(e) => panic!("{}", e),
  });
}

impl Settings {
  /// Builds the config from defaults, then an optional config file, then the
  /// environment (prefix LENDIT, double underscore as the level separator,
  /// e.g. `LENDIT_DATABASE__FILE=/tmp/dev.sqlite3`).
  fn init() -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(Config::try_from(&Settings::default())?)
      .add_source(File::with_name(CONFIG_FILE).required(false))
      .add_source(Environment::with_prefix("LENDIT").separator("__"))
      .build()?
      .try_deserialize()
  }

  pub fn get() -> Self {
    SETTINGS.read().expect("read settings").to_owned()
  }
}
