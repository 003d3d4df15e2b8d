use clap::Parser;
use command::{Cli, Command};
use selectstart::context::Error;
use selectstart::logs::init_logging;

mod command;
mod commands;
mod context;

#[tokio::main]
async fn main() -> Result<(), Error> {
	init_logging();

	let cli = Cli::parse();
	match cli.command {
		Command::Leaderboard(args) => {
			commands::leaderboard::run(args).await?;
		}
		Command::Promote(args) => {
			commands::admin::run(args, true)?;
		}
		Command::Demote(args) => {
			commands::admin::run(args, false)?;
		}
		Command::Sync(args) => {
			commands::sync::run(args).await?;
		}
	}

	Ok(())
}
