pub mod seed;

use lendit_api::LenditContext;
use lendit_db::build_db_pool;
use lendit_utils::{error::LenditResult, settings::Settings};

/// Opens the configured database, applies pending migrations and wraps the
/// pool in an operation context.
pub fn build_context() -> LenditResult<LenditContext> {
  let settings = Settings::get();
  let pool = build_db_pool(&settings.database.file, settings.database.pool_size)?;
  Ok(LenditContext::create(pool))
}
