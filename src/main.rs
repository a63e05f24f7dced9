use clap::Parser;
use lendit::{build_context, seed};
use lendit_utils::{error::LenditResult, settings::Settings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lendit", about = "Community lending platform backend")]
struct CmdArgs {
  /// Populate the database with generated sample data after migrating.
  #[arg(long)]
  seed: bool,
}

fn main() -> LenditResult<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let args = CmdArgs::parse();
  let settings = Settings::get();
  let context = build_context()?;

  if args.seed {
    let summary = seed::run(&context, &settings.seed)?;
    tracing::info!(
      "seeded {} users, {} subs, {} posts, {} comments, {} votes",
      summary.users,
      summary.subs,
      summary.posts,
      summary.comments,
      summary.votes
    );
  }

  Ok(())
}
