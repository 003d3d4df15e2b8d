use anyhow::anyhow;

use crate::challenge::period::Period;
use crate::context::{Error, ErrorKind, PoiseContext, TagError, TaggedError, UserContext};

pub mod arcade;
pub mod challenge;
pub mod discord;
pub mod leaderboard;
pub mod tiebreaker;
pub mod user;

// {{{ Help
/// Show this help menu
#[poise::command(prefix_command, track_edits, slash_command)]
pub async fn help(
	ctx: PoiseContext<'_>,
	#[description = "Specific command to show help about"]
	#[autocomplete = "poise::builtins::autocomplete_command"]
	command: Option<String>,
) -> Result<(), Error> {
	poise::builtins::help(
		ctx,
		command.as_deref(),
		poise::builtins::HelpConfiguration {
			extra_text_at_bottom: "Months are written as YYYY-MM, and default to the current one.",
			show_subcommands: true,
			..Default::default()
		},
	)
	.await?;
	Ok(())
}
// }}}
// {{{ Command list
/// Every command the bot registers.
pub fn all() -> Vec<poise::Command<UserContext, Error>> {
	vec![
		help(),
		leaderboard::leaderboard(),
		challenge::challenge(),
		tiebreaker::tiebreaker(),
		user::user(),
		user::whois_menu(),
		arcade::arcade(),
	]
}
// }}}
// {{{ Argument parsing
/// Parses an optional `YYYY-MM` argument, defaulting to the current month.
pub fn parse_period(month: Option<&str>) -> Result<Period, TaggedError> {
	match month {
		None => Ok(Period::current()),
		Some(month) => month.trim().parse().map_err(|_| {
			anyhow!("`{month}` is not a valid month. Use the YYYY-MM format, like `2024-03`.")
				.tag(ErrorKind::User)
		}),
	}
}
// }}}
