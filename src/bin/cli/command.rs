#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// Preview a challenge leaderboard
	Leaderboard(crate::commands::leaderboard::Args),

	/// Grant challenge admin rights to a registered member
	Promote(crate::commands::admin::Args),

	/// Revoke challenge admin rights from a member
	Demote(crate::commands::admin::Args),

	/// Fetch and store the progress of every member
	Sync(crate::commands::sync::Args),
}
